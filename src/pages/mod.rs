//! Page objects for the storefront
//!
//! Each page object owns its locators and exposes one method per user
//! action. Failed interactions are logged and returned with context.

pub mod checkout;
pub mod expect;
pub mod home;
pub mod login;
pub mod logout;
pub mod my_account;
pub mod product;
pub mod registration;
pub mod search_results;
pub mod shopping_cart;

use anyhow::Result;
use std::future::Future;

pub use checkout::CheckoutPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use logout::LogoutPage;
pub use my_account::MyAccountPage;
pub use product::ProductPage;
pub use registration::{RegistrationData, RegistrationPage};
pub use search_results::SearchResultsPage;
pub use shopping_cart::ShoppingCartPage;

/// Run one page interaction, logging it on failure
pub(crate) async fn step<T, Fut>(action: &str, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match fut.await {
        Ok(value) => {
            log::debug!("{}", action);
            Ok(value)
        }
        Err(e) => {
            log::error!("Exception while {}: {:#}", action, e);
            Err(e.context(format!("Failed while {}", action)))
        }
    }
}
