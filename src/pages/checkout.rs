use anyhow::Result;
use std::sync::Arc;

use super::step;
use crate::driver::traits::Page;

pub const RADIO_GUEST: &str = r#"input[value="guest"]"#;
pub const BTN_CONTINUE: &str = "#button-account";
pub const TXT_FIRST_NAME: &str = "#input-payment-firstname";
pub const TXT_LAST_NAME: &str = "#input-payment-lastname";
pub const TXT_ADDRESS1: &str = "#input-payment-address-1";
pub const TXT_ADDRESS2: &str = "#input-payment-address-2";
pub const TXT_CITY: &str = "#input-payment-city";
pub const TXT_PIN: &str = "#input-payment-postcode";
pub const DRP_COUNTRY: &str = "#input-payment-country";
pub const DRP_STATE: &str = "#input-payment-zone";
pub const BTN_CONTINUE_BILLING_ADDRESS: &str = "#button-payment-address";
pub const BTN_CONTINUE_DELIVERY_ADDRESS: &str = "#button-shipping-address";
pub const TXT_DELIVERY_COMMENT: &str = r#"textarea[name="comment"]"#;
pub const BTN_CONTINUE_SHIPPING_METHOD: &str = "#button-shipping-method";
pub const CHK_TERMS: &str = r#"input[name="agree"]"#;
pub const BTN_CONTINUE_PAYMENT_METHOD: &str = "#button-payment-method";
pub const LBL_TOTAL_PRICE: &str = r#"strong:has-text("Total:") + td"#;
pub const BTN_CONFIRM_ORDER: &str = "#button-confirm";
pub const LBL_ORDER_CONFIRMATION: &str = "#content h1";

/// Multi-step checkout: options, billing, delivery, payment, confirm
pub struct CheckoutPage {
    page: Arc<dyn Page>,
}

impl CheckoutPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub async fn title(&self) -> Result<String> {
        self.page.title().await
    }

    /// Only "Guest Checkout" changes the form; other options keep the default
    pub async fn choose_checkout_option(&self, option: &str) -> Result<()> {
        if option.eq_ignore_ascii_case("guest checkout") {
            step("choosing guest checkout", self.page.click(RADIO_GUEST)).await?;
        }
        Ok(())
    }

    pub async fn click_continue(&self) -> Result<()> {
        step("clicking Continue", self.page.click(BTN_CONTINUE)).await
    }

    pub async fn set_first_name(&self, value: &str) -> Result<()> {
        self.page.fill(TXT_FIRST_NAME, value).await
    }

    pub async fn set_last_name(&self, value: &str) -> Result<()> {
        self.page.fill(TXT_LAST_NAME, value).await
    }

    pub async fn set_address1(&self, value: &str) -> Result<()> {
        self.page.fill(TXT_ADDRESS1, value).await
    }

    pub async fn set_address2(&self, value: &str) -> Result<()> {
        self.page.fill(TXT_ADDRESS2, value).await
    }

    pub async fn set_city(&self, value: &str) -> Result<()> {
        self.page.fill(TXT_CITY, value).await
    }

    pub async fn set_pin(&self, value: &str) -> Result<()> {
        self.page.fill(TXT_PIN, value).await
    }

    pub async fn set_country(&self, country: &str) -> Result<()> {
        self.page.select_option(DRP_COUNTRY, country).await
    }

    pub async fn set_state(&self, state: &str) -> Result<()> {
        self.page.select_option(DRP_STATE, state).await
    }

    pub async fn click_continue_after_billing_address(&self) -> Result<()> {
        self.page.click(BTN_CONTINUE_BILLING_ADDRESS).await
    }

    pub async fn click_continue_after_delivery_address(&self) -> Result<()> {
        self.page.click(BTN_CONTINUE_DELIVERY_ADDRESS).await
    }

    pub async fn set_delivery_method_comment(&self, message: &str) -> Result<()> {
        self.page.fill(TXT_DELIVERY_COMMENT, message).await
    }

    pub async fn click_continue_after_delivery_method(&self) -> Result<()> {
        self.page.click(BTN_CONTINUE_SHIPPING_METHOD).await
    }

    pub async fn select_terms_and_conditions(&self) -> Result<()> {
        self.page.check(CHK_TERMS).await
    }

    pub async fn click_continue_after_payment_method(&self) -> Result<()> {
        self.page.click(BTN_CONTINUE_PAYMENT_METHOD).await
    }

    pub fn total_price(&self) -> &'static str {
        LBL_TOTAL_PRICE
    }

    pub async fn click_confirm_order(&self) -> Result<()> {
        step("confirming order", self.page.click(BTN_CONFIRM_ORDER)).await
    }

    pub fn order_confirmation(&self) -> &'static str {
        LBL_ORDER_CONFIRMATION
    }
}
