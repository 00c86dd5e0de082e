use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, ProductId};

/// A stored product.
///
/// `count` and `price` are numeric by meaning but travel as opaque text; the
/// catalog never parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub color: String,
    pub count: String,
    pub price: String,
    pub description: String,
}

impl Product {
    /// Overwrite the fields supplied by `update`; omitted fields keep their value.
    pub fn apply_update(&mut self, update: ProductUpdate) {
        self.name = update.name;
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(count) = update.count {
            self.count = count;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
    }
}

/// Raw request payload for creating or updating a product.
///
/// Every field is optional at this level so that a missing `name` surfaces as
/// a domain validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductDraft {
    fn required_name(&self) -> DomainResult<String> {
        match &self.name {
            Some(name) if !name.trim().is_empty() => Ok(name.clone()),
            Some(_) => Err(DomainError::validation("name cannot be empty")),
            None => Err(DomainError::validation("name is required")),
        }
    }

    /// Validate the draft for creation. Absent optional fields become empty text.
    pub fn into_new(self) -> DomainResult<NewProduct> {
        let name = self.required_name()?;
        Ok(NewProduct {
            name,
            category: self.category.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            count: self.count.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }

    /// Validate the draft for an update. `name` is required on every update.
    pub fn into_update(self) -> DomainResult<ProductUpdate> {
        let name = self.required_name()?;
        Ok(ProductUpdate {
            name,
            category: self.category,
            color: self.color,
            count: self.count,
            price: self.price,
            description: self.description,
        })
    }
}

/// A validated product that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub color: String,
    pub count: String,
    pub price: String,
    pub description: String,
}

impl NewProduct {
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            color: self.color,
            count: self.count,
            price: self.price,
            description: self.description,
        }
    }
}

/// A validated update: a new name plus the optional fields to replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub count: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

/// Exact-match query over the catalog. Unset criteria match everything.
///
/// Deserializes straight from the `GET /products` query string; unknown
/// parameters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ProductFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            category: None,
            name: Some(name.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.name.is_none()
    }

    /// Case-sensitive equality on every criterion that is set.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| product.category == c);
        let name_ok = self.name.as_deref().is_none_or(|n| product.name == n);
        category_ok && name_ok
    }
}
