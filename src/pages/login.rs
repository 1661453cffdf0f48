use anyhow::Result;
use std::sync::Arc;

use super::step;
use crate::driver::traits::Page;

pub const TXT_EMAIL: &str = "#input-email";
pub const TXT_PASSWORD: &str = "#input-password";
pub const BTN_LOGIN: &str = r#"input[value="Login"]"#;
pub const MSG_ERROR: &str = ".alert.alert-danger.alert-dismissible";

pub struct LoginPage {
    page: Arc<dyn Page>,
}

impl LoginPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub async fn set_email(&self, email: &str) -> Result<()> {
        step("entering email", self.page.fill(TXT_EMAIL, email)).await
    }

    pub async fn set_password(&self, password: &str) -> Result<()> {
        step("entering password", self.page.fill(TXT_PASSWORD, password)).await
    }

    pub async fn click_login(&self) -> Result<()> {
        step("clicking Login button", self.page.click(BTN_LOGIN)).await
    }

    /// Email, password, submit
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.set_email(email).await?;
        self.set_password(password).await?;
        self.click_login().await
    }

    /// Selector of the warning shown after a rejected login
    pub fn error_message(&self) -> &'static str {
        MSG_ERROR
    }
}
