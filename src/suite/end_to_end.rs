//! Register, log out, log back in, buy, check the cart total

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use super::shopping::{open_product, search};
use super::{Scenario, ASSERT_TIMEOUT_MS, TAG_END_TO_END};
use crate::driver::traits::Page;
use crate::pages::{
    expect, HomePage, LoginPage, MyAccountPage, ProductPage, RegistrationData, RegistrationPage,
};
use crate::utils::config::StoreData;

async fn perform_registration(page: &Arc<dyn Page>) -> Result<RegistrationData> {
    let home = HomePage::new(Arc::clone(page));
    home.click_my_account().await?;
    home.click_register().await?;

    let data = RegistrationData::random();
    let confirmation = RegistrationPage::new(Arc::clone(page))
        .complete_registration(&data)
        .await?;
    expect::to_have_text(
        page.as_ref(),
        confirmation,
        "Your Account Has Been Created!",
        expect::DEFAULT_TIMEOUT_MS,
    )
    .await?;
    Ok(data)
}

async fn perform_logout(page: &Arc<dyn Page>) -> Result<()> {
    let logout = MyAccountPage::new(Arc::clone(page)).click_logout().await?;
    expect::to_be_visible(page.as_ref(), logout.continue_button(), ASSERT_TIMEOUT_MS).await?;
    logout.click_continue().await?;
    expect::to_have_title(page.as_ref(), "Your Store", expect::DEFAULT_TIMEOUT_MS).await
}

async fn perform_login(page: &Arc<dyn Page>, email: &str, password: &str) -> Result<()> {
    let home = HomePage::new(Arc::clone(page));
    home.click_my_account().await?;
    home.click_login().await?;

    LoginPage::new(Arc::clone(page)).login(email, password).await?;
    let heading = MyAccountPage::new(Arc::clone(page)).heading();
    expect::to_be_visible(page.as_ref(), heading, ASSERT_TIMEOUT_MS).await
}

async fn add_product_to_cart(page: &Arc<dyn Page>, store: &StoreData) -> Result<()> {
    let results = search(page, &store.product_name).await?;
    let product = open_product(&results, &store.product_name).await?;
    product.set_quantity(&store.product_quantity).await?;
    product.add_to_cart().await?;
    expect::to_be_visible(page.as_ref(), product.confirmation_message(), ASSERT_TIMEOUT_MS).await
}

async fn verify_shopping_cart(page: &Arc<dyn Page>, store: &StoreData) -> Result<()> {
    let product = ProductPage::new(Arc::clone(page));
    product.click_items_to_navigate_to_cart().await?;
    let cart = product.click_view_cart().await?;
    log::info!("Navigated to shopping cart");

    expect::to_have_text(
        page.as_ref(),
        cart.total_price(),
        &store.total_price,
        expect::DEFAULT_TIMEOUT_MS,
    )
    .await
}

fn done(step: &str) {
    println!("  {} {}", "✓".green(), step);
}

pub fn end_to_end_flow(store: Arc<StoreData>) -> Scenario {
    Scenario::new("test_end_to_end_flow", &[TAG_END_TO_END], move |page| {
        let store = Arc::clone(&store);
        async move {
            let account = perform_registration(&page).await?;
            done("Registration completed");

            perform_logout(&page).await?;
            done("Logout completed");

            perform_login(&page, &account.email, &account.password).await?;
            done("Login completed");

            add_product_to_cart(&page, &store).await?;
            done("Product added to cart");

            verify_shopping_cart(&page, &store).await?;
            done("Shopping cart verified");
            Ok(())
        }
    })
}
