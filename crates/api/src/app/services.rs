use std::sync::Arc;

use catalog_core::{DomainResult, ProductId};
use catalog_infra::{InMemoryProductStore, ProductStore};
use catalog_products::{Product, ProductDraft, ProductFilter};

/// Shared application services handed to handlers via `Extension`.
#[derive(Clone)]
pub struct AppServices {
    products: Arc<dyn ProductStore>,
}

impl AppServices {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Dev/test wiring: a fresh in-memory catalog.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()))
    }

    pub fn products_create(&self, draft: ProductDraft) -> DomainResult<Product> {
        let new = draft.into_new()?;
        let product = self.products.insert(new);
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub fn products_get(&self, id: ProductId) -> Option<Product> {
        self.products.get(id)
    }

    pub fn products_list(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products.list(filter)
    }

    /// Validation runs before the lookup, so a nameless body is rejected even
    /// for an unknown id.
    pub fn products_update(&self, id: ProductId, draft: ProductDraft) -> DomainResult<Product> {
        let update = draft.into_update()?;
        let product = self.products.update(id, update)?;
        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    pub fn products_delete(&self, id: ProductId) -> DomainResult<()> {
        self.products.remove(id)?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub fn products_reset(&self) {
        self.products.reset();
    }
}
