//! Records as served by the backend lookup services.
//!
//! Field names match the JSON and MessagePack wire schemas.

use crate::fetch::ResourceKind;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub original: f64,
    pub special_price: f64,
}

/// The primary resource. Reference lists keep the backend's order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub seller_id: i64,
    pub brand_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<i64>,
}

/// Backends encode an empty reference list as `null` (JSON) or `nil` (MessagePack).
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<i64>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub country: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub url: String,
}

/// A decoded record of any kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Product(Product),
    Seller(Seller),
    Brand(Brand),
    Category(Category),
    Image(Image),
}

impl Record {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Record::Product(_) => ResourceKind::Product,
            Record::Seller(_) => ResourceKind::Seller,
            Record::Brand(_) => ResourceKind::Brand,
            Record::Category(_) => ResourceKind::Category,
            Record::Image(_) => ResourceKind::Image,
        }
    }

    pub fn into_product(self) -> Option<Product> {
        match self {
            Record::Product(product) => Some(product),
            _ => None,
        }
    }

    pub fn into_seller(self) -> Option<Seller> {
        match self {
            Record::Seller(seller) => Some(seller),
            _ => None,
        }
    }

    pub fn into_brand(self) -> Option<Brand> {
        match self {
            Record::Brand(brand) => Some(brand),
            _ => None,
        }
    }

    pub fn into_category(self) -> Option<Category> {
        match self {
            Record::Category(category) => Some(category),
            _ => None,
        }
    }

    pub fn into_image(self) -> Option<Image> {
        match self {
            Record::Image(image) => Some(image),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_product(categories: serde_json::Value, images: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 8,
            "name": "Nome do produto 8",
            "slug": "nome-do-produto-8",
            "description": "Descrição do Produto 8",
            "price": {"original": 30.0, "special_price": 3.0},
            "seller_id": 2,
            "brand_id": 4,
            "categories": categories,
            "images": images,
        })
    }

    #[test]
    fn test_null_reference_lists_are_empty() {
        let product: Product =
            serde_json::from_value(wire_product(json!(null), json!(null))).unwrap();
        assert!(product.categories.is_empty());
        assert!(product.images.is_empty());

        let product: Product =
            serde_json::from_value(wire_product(json!([3, 1]), json!(null))).unwrap();
        assert_eq!(product.categories, vec![3, 1]);
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_missing_reference_lists_are_empty() {
        let mut value = wire_product(json!([]), json!([]));
        let object = value.as_object_mut().unwrap();
        object.remove("categories");
        object.remove("images");

        let product: Product = serde_json::from_value(value).unwrap();
        assert!(product.categories.is_empty());
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_wrong_reference_list_type_is_rejected() {
        assert!(serde_json::from_value::<Product>(wire_product(json!("1,2"), json!([]))).is_err());
    }
}
