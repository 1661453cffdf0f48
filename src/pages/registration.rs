use anyhow::Result;
use std::sync::Arc;

use super::step;
use crate::driver::traits::Page;

pub const TXT_FIRSTNAME: &str = "#input-firstname";
pub const TXT_LASTNAME: &str = "#input-lastname";
pub const TXT_EMAIL: &str = "#input-email";
pub const TXT_TELEPHONE: &str = "#input-telephone";
pub const TXT_PASSWORD: &str = "#input-password";
pub const TXT_CONFIRM_PASSWORD: &str = "#input-confirm";
pub const CHK_POLICY: &str = r#"input[name="agree"]"#;
pub const BTN_CONTINUE: &str = r#"input[value="Continue"]"#;
pub const MSG_CONFIRMATION: &str = r#"h1:has-text("Your Account Has Been Created!")"#;

/// Form values for a new account
#[derive(Debug, Clone)]
pub struct RegistrationData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
    pub password: String,
}

impl RegistrationData {
    pub fn random() -> Self {
        use crate::utils::random_data as rd;
        Self {
            first_name: rd::first_name(),
            last_name: rd::last_name(),
            email: rd::email(),
            telephone: rd::phone_number(),
            password: rd::password(10),
        }
    }
}

pub struct RegistrationPage {
    page: Arc<dyn Page>,
}

impl RegistrationPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub async fn set_first_name(&self, first_name: &str) -> Result<()> {
        step("entering first name", self.page.fill(TXT_FIRSTNAME, first_name)).await
    }

    pub async fn set_last_name(&self, last_name: &str) -> Result<()> {
        step("entering last name", self.page.fill(TXT_LASTNAME, last_name)).await
    }

    pub async fn set_email(&self, email: &str) -> Result<()> {
        step("entering email", self.page.fill(TXT_EMAIL, email)).await
    }

    pub async fn set_telephone(&self, telephone: &str) -> Result<()> {
        step("entering telephone", self.page.fill(TXT_TELEPHONE, telephone)).await
    }

    pub async fn set_password(&self, password: &str) -> Result<()> {
        step("entering password", self.page.fill(TXT_PASSWORD, password)).await
    }

    pub async fn set_confirm_password(&self, password: &str) -> Result<()> {
        step(
            "confirming password",
            self.page.fill(TXT_CONFIRM_PASSWORD, password),
        )
        .await
    }

    pub async fn set_privacy_policy(&self) -> Result<()> {
        step("accepting privacy policy", self.page.check(CHK_POLICY)).await
    }

    pub async fn click_continue(&self) -> Result<()> {
        step("clicking 'Continue'", self.page.click(BTN_CONTINUE)).await
    }

    pub fn confirmation_message(&self) -> &'static str {
        MSG_CONFIRMATION
    }

    /// Fill and submit the whole form. Returns the confirmation selector.
    pub async fn complete_registration(&self, data: &RegistrationData) -> Result<&'static str> {
        self.set_first_name(&data.first_name).await?;
        self.set_last_name(&data.last_name).await?;
        self.set_email(&data.email).await?;
        self.set_telephone(&data.telephone).await?;
        self.set_password(&data.password).await?;
        self.set_confirm_password(&data.password).await?;
        self.set_privacy_policy().await?;
        self.click_continue().await?;
        Ok(MSG_CONFIRMATION)
    }
}
