use anyhow::Result;
use std::sync::Arc;

use super::step;
use super::HomePage;
use crate::driver::traits::Page;

pub const BTN_CONTINUE: &str = ".btn.btn-primary";

/// Confirmation page shown after logging out
pub struct LogoutPage {
    page: Arc<dyn Page>,
}

impl LogoutPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub fn continue_button(&self) -> &'static str {
        BTN_CONTINUE
    }

    /// Continue back to the home page
    pub async fn click_continue(&self) -> Result<HomePage> {
        step("clicking 'Continue'", self.page.click(BTN_CONTINUE)).await?;
        Ok(HomePage::new(Arc::clone(&self.page)))
    }
}
