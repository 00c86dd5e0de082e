use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use catalog_core::{DomainError, DomainResult, ProductId};
use catalog_products::{NewProduct, Product, ProductFilter, ProductUpdate};

/// Product storage abstraction used by the HTTP layer.
pub trait ProductStore: Send + Sync {
    /// Persist a validated product under the next identifier in sequence.
    fn insert(&self, product: NewProduct) -> Product;
    fn get(&self, id: ProductId) -> Option<Product>;
    /// Products matching `filter`, ordered by ascending id.
    fn list(&self, filter: &ProductFilter) -> Vec<Product>;
    fn update(&self, id: ProductId, update: ProductUpdate) -> DomainResult<Product>;
    fn remove(&self, id: ProductId) -> DomainResult<Product>;
    /// Drop every product and restart the id sequence at [`ProductId::FIRST`].
    fn reset(&self);
    fn count(&self) -> usize;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn insert(&self, product: NewProduct) -> Product {
        (**self).insert(product)
    }

    fn get(&self, id: ProductId) -> Option<Product> {
        (**self).get(id)
    }

    fn list(&self, filter: &ProductFilter) -> Vec<Product> {
        (**self).list(filter)
    }

    fn update(&self, id: ProductId, update: ProductUpdate) -> DomainResult<Product> {
        (**self).update(id, update)
    }

    fn remove(&self, id: ProductId) -> DomainResult<Product> {
        (**self).remove(id)
    }

    fn reset(&self) {
        (**self).reset()
    }

    fn count(&self) -> usize {
        (**self).count()
    }
}

#[derive(Debug)]
struct Catalog {
    products: BTreeMap<ProductId, Product>,
    next_id: ProductId,
}

impl Catalog {
    fn empty() -> Self {
        Self {
            products: BTreeMap::new(),
            next_id: ProductId::FIRST,
        }
    }
}

/// In-memory product store for tests/dev.
///
/// A poisoned lock is recovered rather than propagated: every mutation leaves
/// the map consistent before it can panic.
#[derive(Debug)]
pub struct InMemoryProductStore {
    inner: RwLock<Catalog>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Catalog::empty()),
        }
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: ProductId) -> DomainError {
    DomainError::not_found(format!("product with id '{id}'"))
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, product: NewProduct) -> Product {
        let mut catalog = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = catalog.next_id;
        catalog.next_id = id.next();

        let product = product.with_id(id);
        catalog.products.insert(id, product.clone());
        tracing::debug!(product_id = %id, name = %product.name, "product stored");
        product
    }

    fn get(&self, id: ProductId) -> Option<Product> {
        if !id.is_assigned() {
            return None;
        }
        let catalog = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        catalog.products.get(&id).cloned()
    }

    fn list(&self, filter: &ProductFilter) -> Vec<Product> {
        let catalog = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        catalog
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    fn update(&self, id: ProductId, update: ProductUpdate) -> DomainResult<Product> {
        let mut catalog = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let product = catalog.products.get_mut(&id).ok_or_else(|| not_found(id))?;
        product.apply_update(update);
        tracing::debug!(product_id = %id, "product updated");
        Ok(product.clone())
    }

    fn remove(&self, id: ProductId) -> DomainResult<Product> {
        let mut catalog = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let removed = catalog.products.remove(&id).ok_or_else(|| not_found(id))?;
        tracing::debug!(product_id = %id, "product removed");
        Ok(removed)
    }

    fn reset(&self) {
        let mut catalog = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = catalog.products.len();
        *catalog = Catalog::empty();
        tracing::info!(dropped, "product catalog reset");
    }

    fn count(&self) -> usize {
        let catalog = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        catalog.products.len()
    }
}
