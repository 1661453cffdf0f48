use anyhow::Result;
use std::sync::Arc;

use super::step;
use crate::driver::traits::Page;

pub const LNK_MY_ACCOUNT: &str = r#"span:has-text("My Account")"#;
pub const LNK_REGISTER: &str = r#"a:has-text("Register")"#;
pub const LNK_LOGIN: &str = r#"a:has-text("Login")"#;
pub const TXT_SEARCH_BOX: &str = r#"input[placeholder="Search"]"#;
pub const BTN_SEARCH: &str = r#"#search button[type="button"]"#;

/// Landing page with the account menu and search bar
pub struct HomePage {
    page: Arc<dyn Page>,
}

impl HomePage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub async fn title(&self) -> Result<String> {
        self.page.title().await
    }

    pub async fn click_my_account(&self) -> Result<()> {
        step("clicking 'My Account'", self.page.click(LNK_MY_ACCOUNT)).await
    }

    pub async fn click_register(&self) -> Result<()> {
        step("clicking 'Register'", self.page.click(LNK_REGISTER)).await
    }

    pub async fn click_login(&self) -> Result<()> {
        step("clicking 'Login'", self.page.click(LNK_LOGIN)).await
    }

    pub async fn enter_product_name(&self, product_name: &str) -> Result<()> {
        step(
            &format!("entering product name '{}'", product_name),
            self.page.fill(TXT_SEARCH_BOX, product_name),
        )
        .await
    }

    pub async fn click_search(&self) -> Result<()> {
        step("clicking 'Search'", self.page.click(BTN_SEARCH)).await
    }
}
