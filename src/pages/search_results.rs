use anyhow::Result;
use std::sync::Arc;

use super::step;
use super::ProductPage;
use crate::driver::traits::Page;

pub const SEARCH_PAGE_HEADER: &str = r#"#content h1:has-text("Search -")"#;
pub const SEARCH_PRODUCTS: &str = "h4 > a";

/// Product listing shown after a search
pub struct SearchResultsPage {
    page: Arc<dyn Page>,
}

impl SearchResultsPage {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    pub fn header(&self) -> &'static str {
        SEARCH_PAGE_HEADER
    }

    async fn find_product(&self, product_name: &str) -> Result<Option<usize>> {
        let titles = self.page.texts(SEARCH_PRODUCTS).await?;
        Ok(titles.iter().position(|t| t.trim() == product_name))
    }

    /// Whether a result titled exactly `product_name` is listed.
    /// Lookup errors are logged and read as "not listed".
    pub async fn is_product_exist(&self, product_name: &str) -> bool {
        match self.find_product(product_name).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                log::error!("Error while checking product existence: {:#}", e);
                false
            }
        }
    }

    /// Open the product page of `product_name`, `None` when it is not listed
    pub async fn select_product(&self, product_name: &str) -> Result<Option<ProductPage>> {
        let Some(index) = self.find_product(product_name).await? else {
            log::warn!("Product not found: {}", product_name);
            return Ok(None);
        };
        step(
            &format!("selecting product '{}'", product_name),
            self.page.click_nth(SEARCH_PRODUCTS, index),
        )
        .await?;
        Ok(Some(ProductPage::new(Arc::clone(&self.page))))
    }

    pub async fn product_count(&self) -> Result<usize> {
        self.page.count(SEARCH_PRODUCTS).await
    }
}
