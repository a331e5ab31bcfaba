use anyhow::Context;

use storefront_catalog::{CatalogConfig, CatalogView, JsonCatalogProvider};

/// Render page 1 of a catalog export with default filters, as the listing
/// page would, and print the view as JSON.
///
/// The snapshot path comes from the first argument or `STOREFRONT_CATALOG_PATH`.
fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let mut config = CatalogConfig::from_env().context("invalid catalog configuration")?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.catalog_path = Some(path.into());
    }
    let path = config.catalog_path()?.to_path_buf();

    let provider = JsonCatalogProvider::new(path.clone());
    let mut view = CatalogView::from_config(&config);
    let result = view
        .load(&provider)
        .with_context(|| format!("failed to load catalog from {}", path.display()))?;

    tracing::info!(
        products = result.total_count,
        pages = result.total_pages,
        page_size = config.page_size.get(),
        "catalog preview ready"
    );

    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
