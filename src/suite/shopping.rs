use anyhow::{anyhow, Result};
use std::sync::Arc;

use super::{Scenario, ASSERT_TIMEOUT_MS, TAG_REGRESSION, TAG_SANITY};
use crate::driver::traits::Page;
use crate::pages::{expect, HomePage, ProductPage, SearchResultsPage};
use crate::utils::config::StoreData;

/// Search the store for `product_name` and wait for the results header
pub(crate) async fn search(page: &Arc<dyn Page>, product_name: &str) -> Result<SearchResultsPage> {
    let home = HomePage::new(Arc::clone(page));
    home.enter_product_name(product_name).await?;
    home.click_search().await?;

    let results = SearchResultsPage::new(Arc::clone(page));
    expect::to_be_visible(page.as_ref(), results.header(), ASSERT_TIMEOUT_MS).await?;
    Ok(results)
}

pub(crate) async fn open_product(
    results: &SearchResultsPage,
    product_name: &str,
) -> Result<ProductPage> {
    results
        .select_product(product_name)
        .await?
        .ok_or_else(|| anyhow!("Product '{}' not found in search results", product_name))
}

pub fn product_search(store: Arc<StoreData>) -> Scenario {
    Scenario::new("test_product_search", &[], move |page| {
        let store = Arc::clone(&store);
        async move {
            let results = search(&page, &store.product_name).await?;
            log::info!("Number of products found: {}", results.product_count().await?);

            if !results.is_product_exist(&store.product_name).await {
                anyhow::bail!("'{}' is not in the search results", store.product_name);
            }
            Ok(())
        }
    })
}

pub fn add_product_to_cart(store: Arc<StoreData>) -> Scenario {
    Scenario::new(
        "test_add_product_to_cart",
        &[TAG_SANITY, TAG_REGRESSION],
        move |page| {
            let store = Arc::clone(&store);
            async move {
                let results = search(&page, &store.product_name).await?;
                let product = open_product(&results, &store.product_name).await?;
                product.set_quantity(&store.product_quantity).await?;
                product.add_to_cart().await?;

                expect::to_be_visible(
                    page.as_ref(),
                    product.confirmation_message(),
                    ASSERT_TIMEOUT_MS,
                )
                .await
            }
        },
    )
}
