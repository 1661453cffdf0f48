use anyhow::Result;
use std::sync::Arc;

use super::step;
use super::CheckoutPage;
use crate::driver::traits::Page;

pub const LBL_TOTAL_PRICE: &str =
    "xpath=//*[@id='content']/div[2]/div/table//strong[text()='Total:']//following::td";
pub const BTN_CHECKOUT: &str = "a.btn.btn-primary";

pub struct ShoppingCartPage {
    page: Arc<dyn Page>,
}

impl ShoppingCartPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub fn total_price(&self) -> &'static str {
        LBL_TOTAL_PRICE
    }

    pub async fn click_on_checkout(&self) -> Result<CheckoutPage> {
        step("clicking checkout button", self.page.click(BTN_CHECKOUT)).await?;
        Ok(CheckoutPage::new(Arc::clone(&self.page)))
    }
}
