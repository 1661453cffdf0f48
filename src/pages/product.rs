use anyhow::Result;
use std::sync::Arc;

use super::expect;
use super::step;
use super::ShoppingCartPage;
use crate::driver::traits::Page;

pub const TXT_QUANTITY: &str = r#"input[name="quantity"]"#;
pub const BTN_ADD_TO_CART: &str = "#button-cart";
pub const MSG_CONFIRMATION: &str = ".alert.alert-success.alert-dismissible";
pub const BTN_ITEMS: &str = "#cart";
pub const LNK_VIEW_CART: &str = r#"strong:has-text("View Cart")"#;

pub struct ProductPage {
    page: Arc<dyn Page>,
}

impl ProductPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    /// Replace the quantity field value
    pub async fn set_quantity(&self, quantity: &str) -> Result<()> {
        step("setting quantity", async {
            self.page.fill(TXT_QUANTITY, "").await?;
            self.page.fill(TXT_QUANTITY, quantity).await
        })
        .await
    }

    pub async fn add_to_cart(&self) -> Result<()> {
        step("clicking 'Add to Cart'", self.page.click(BTN_ADD_TO_CART)).await
    }

    pub fn confirmation_message(&self) -> &'static str {
        MSG_CONFIRMATION
    }

    pub async fn click_items_to_navigate_to_cart(&self) -> Result<()> {
        step("clicking cart items button", self.page.click(BTN_ITEMS)).await
    }

    pub async fn click_view_cart(&self) -> Result<ShoppingCartPage> {
        step("clicking 'View Cart'", self.page.click(LNK_VIEW_CART)).await?;
        Ok(ShoppingCartPage::new(Arc::clone(&self.page)))
    }

    /// Set quantity, add to cart and wait for the success alert
    pub async fn add_product_to_cart(&self, quantity: &str) -> Result<()> {
        step("adding product to cart", async {
            self.set_quantity(quantity).await?;
            self.add_to_cart().await?;
            expect::to_be_visible(
                self.page.as_ref(),
                MSG_CONFIRMATION,
                expect::DEFAULT_TIMEOUT_MS,
            )
            .await
        })
        .await
    }
}
