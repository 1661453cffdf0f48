//! Storefront scenarios
//!
//! Every scenario is a named, tagged body that receives a page already
//! navigated to the store's base URL.

pub mod account;
pub mod end_to_end;
pub mod shopping;

use anyhow::Result;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use crate::driver::traits::Page;
use crate::utils::config::StoreData;
use crate::utils::data_reader;

/// Visibility timeout used by the scenarios' expectations
pub const ASSERT_TIMEOUT_MS: u64 = 3000;

pub const TAG_SANITY: &str = "sanity";
pub const TAG_REGRESSION: &str = "regression";
pub const TAG_END_TO_END: &str = "end_to_end";

type ScenarioBody = Box<dyn Fn(Arc<dyn Page>) -> LocalBoxFuture<'static, Result<()>>>;

pub struct Scenario {
    pub name: String,
    pub tags: Vec<&'static str>,
    body: ScenarioBody,
}

impl Scenario {
    pub fn new<F, Fut>(name: impl Into<String>, tags: &[&'static str], body: F) -> Self
    where
        F: Fn(Arc<dyn Page>) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        Self {
            name: name.into(),
            tags: tags.to_vec(),
            body: Box::new(move |page| body(page).boxed_local()),
        }
    }

    pub fn run(&self, page: Arc<dyn Page>) -> LocalBoxFuture<'static, Result<()>> {
        (self.body)(page)
    }

    /// Matches when every tag is present and the name contains `filter`
    pub fn matches(&self, tags: &[String], filter: Option<&str>) -> bool {
        let tags_match = tags.iter().all(|t| self.tags.contains(&t.as_str()));
        let name_match = filter.map_or(true, |f| self.name.contains(f));
        tags_match && name_match
    }
}

/// Every scenario, in run order. `login_data` feeds the data-driven login.
pub fn scenarios(store: &StoreData, login_data: &Path) -> Vec<Scenario> {
    let store = Arc::new(store.clone());
    let mut all = vec![shopping::add_product_to_cart(Arc::clone(&store))];

    all.extend(
        data_reader::read_login_data(login_data)
            .into_iter()
            .map(account::login_data_driven),
    );

    all.extend([
        end_to_end::end_to_end_flow(Arc::clone(&store)),
        account::invalid_user_login(Arc::clone(&store)),
        account::valid_user_login(Arc::clone(&store)),
        account::user_logout(Arc::clone(&store)),
        shopping::product_search(Arc::clone(&store)),
        account::user_registration(),
    ]);
    all
}

/// Scenarios selected by `tags` (all must match) and a name substring
pub fn select(all: Vec<Scenario>, tags: &[String], filter: Option<&str>) -> Vec<Scenario> {
    all.into_iter().filter(|s| s.matches(tags, filter)).collect()
}
