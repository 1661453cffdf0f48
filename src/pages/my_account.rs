use anyhow::Result;
use std::sync::Arc;

use super::step;
use super::LogoutPage;
use crate::driver::traits::Page;

pub const MSG_HEADING: &str = r#"h2:has-text("My Account")"#;
pub const LNK_LOGOUT: &str = "text='Logout'";
/// The first "Logout" match is in the header dropdown; the sidebar link is second
const LNK_LOGOUT_INDEX: usize = 1;

pub struct MyAccountPage {
    page: Arc<dyn Page>,
}

impl MyAccountPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub fn heading(&self) -> &'static str {
        MSG_HEADING
    }

    pub async fn title(&self) -> Result<String> {
        self.page.title().await
    }

    pub async fn click_logout(&self) -> Result<LogoutPage> {
        step(
            "clicking Logout link",
            self.page.click_nth(LNK_LOGOUT, LNK_LOGOUT_INDEX),
        )
        .await?;
        Ok(LogoutPage::new(Arc::clone(&self.page)))
    }
}
