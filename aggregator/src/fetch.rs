//! The contract every backend transport implements.

use crate::errors::FetchError;
use crate::records::Record;
use async_trait::async_trait;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Product,
    Seller,
    Brand,
    Category,
    Image,
}

impl ResourceKind {
    /// Collection name used in backend URLs and metric tags.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Product => "products",
            ResourceKind::Seller => "sellers",
            ResourceKind::Brand => "brands",
            ResourceKind::Category => "categories",
            ResourceKind::Image => "images",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource kind together with the key it is looked up by.
///
/// Products are the only kind keyed by slug; every other kind is keyed by id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lookup {
    ProductBySlug(String),
    Seller(i64),
    Brand(i64),
    Category(i64),
    Image(i64),
}

impl Lookup {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Lookup::ProductBySlug(_) => ResourceKind::Product,
            Lookup::Seller(_) => ResourceKind::Seller,
            Lookup::Brand(_) => ResourceKind::Brand,
            Lookup::Category(_) => ResourceKind::Category,
            Lookup::Image(_) => ResourceKind::Image,
        }
    }

    /// The key as it appears in a backend URL path segment.
    pub fn key(&self) -> String {
        match self {
            Lookup::ProductBySlug(slug) => slug.clone(),
            Lookup::Seller(id) | Lookup::Brand(id) | Lookup::Category(id) | Lookup::Image(id) => {
                id.to_string()
            }
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.key())
    }
}

/// One wire-encoding profile for talking to the backend lookup services.
///
/// Implementations own their pooled connections. They are built once at
/// startup and shared by every request and every concurrent sub-fetch, so
/// `fetch` only takes `&self`.
#[async_trait]
pub trait FetchClient: Send + Sync {
    fn name(&self) -> &'static str;

    /// Performs one round trip and decodes the record matching `lookup`.
    ///
    /// Returns `FetchError::NotFound` when the backend has no such record.
    async fn fetch(&self, lookup: &Lookup) -> Result<Record, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_display() {
        assert_eq!(
            Lookup::ProductBySlug("nome-do-produto-5".into()).to_string(),
            "products/nome-do-produto-5"
        );
        assert_eq!(Lookup::Category(12).to_string(), "categories/12");
        assert_eq!(Lookup::Image(7).kind(), ResourceKind::Image);
    }
}
