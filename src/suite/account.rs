use anyhow::{bail, Result};
use std::sync::Arc;

use super::{Scenario, ASSERT_TIMEOUT_MS, TAG_REGRESSION, TAG_SANITY};
use crate::driver::traits::Page;
use crate::error::skip;
use crate::pages::{expect, HomePage, LoginPage, MyAccountPage, RegistrationData, RegistrationPage};
use crate::utils::config::StoreData;
use crate::utils::data_reader::LoginRow;

const HOME_TITLE: &str = "Your Store";
const ACCOUNT_CREATED: &str = "Your Account Has Been Created!";

/// Credentials of the configured account, or a skip when none is set
fn account(store: &StoreData) -> Result<(String, String)> {
    match (&store.email, &store.password) {
        (Some(email), Some(password)) => Ok((email.clone(), password.clone())),
        _ => skip("no store account configured (store.email / store.password)"),
    }
}

async fn open_login(page: &Arc<dyn Page>) -> Result<LoginPage> {
    let home = HomePage::new(Arc::clone(page));
    home.click_my_account().await?;
    home.click_login().await?;
    Ok(LoginPage::new(Arc::clone(page)))
}

pub fn invalid_user_login(store: Arc<StoreData>) -> Scenario {
    Scenario::new("test_invalid_userlogin", &[], move |page| {
        let store = Arc::clone(&store);
        async move {
            let login = open_login(&page).await?;
            login.set_email(&store.invalid_email).await?;
            login.set_password(&store.invalid_password).await?;
            login.click_login().await?;

            expect::to_be_visible(page.as_ref(), login.error_message(), ASSERT_TIMEOUT_MS).await
        }
    })
}

pub fn valid_user_login(store: Arc<StoreData>) -> Scenario {
    Scenario::new("test_valid_userlogin", &[], move |page| {
        let store = Arc::clone(&store);
        async move {
            let (email, password) = account(&store)?;
            let login = open_login(&page).await?;
            login.set_email(&email).await?;
            login.set_password(&password).await?;
            login.click_login().await?;

            let my_account = MyAccountPage::new(Arc::clone(&page));
            expect::to_be_visible(page.as_ref(), my_account.heading(), ASSERT_TIMEOUT_MS).await
        }
    })
}

pub fn user_logout(store: Arc<StoreData>) -> Scenario {
    Scenario::new("test_user_logout", &[TAG_SANITY, TAG_REGRESSION], move |page| {
        let store = Arc::clone(&store);
        async move {
            let (email, password) = account(&store)?;
            let login = open_login(&page).await?;
            login.login(&email, &password).await?;

            let my_account = MyAccountPage::new(Arc::clone(&page));
            expect::to_be_visible(page.as_ref(), my_account.heading(), ASSERT_TIMEOUT_MS).await?;

            let logout = my_account.click_logout().await?;
            expect::to_be_visible(page.as_ref(), logout.continue_button(), ASSERT_TIMEOUT_MS)
                .await?;
            logout.click_continue().await?;

            expect::to_have_title(page.as_ref(), HOME_TITLE, expect::DEFAULT_TIMEOUT_MS).await
        }
    })
}

pub fn user_registration() -> Scenario {
    Scenario::new("test_user_registration", &[], |page| async move {
        let home = HomePage::new(Arc::clone(&page));
        home.click_my_account().await?;
        home.click_register().await?;

        let registration = RegistrationPage::new(Arc::clone(&page));
        let confirmation = registration
            .complete_registration(&RegistrationData::random())
            .await?;

        expect::to_have_text(
            page.as_ref(),
            confirmation,
            ACCOUNT_CREATED,
            expect::DEFAULT_TIMEOUT_MS,
        )
        .await
    })
}

/// One scenario per data row, named after the row
pub fn login_data_driven(row: LoginRow) -> Scenario {
    let name = format!("test_login_data_driven[{}]", row.test_name);
    let row = Arc::new(row);
    Scenario::new(name, &[], move |page| {
        let row = Arc::clone(&row);
        async move {
            if row.email.is_empty() && row.expects_success() {
                bail!("row '{}' expects success but has no email", row.test_name);
            }
            let login = open_login(&page).await?;
            login.login(&row.email, &row.password).await?;

            let target = if row.expects_success() {
                MyAccountPage::new(Arc::clone(&page)).heading()
            } else {
                login.error_message()
            };
            expect::to_be_visible(page.as_ref(), target, ASSERT_TIMEOUT_MS).await
        }
    })
}
