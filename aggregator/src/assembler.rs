//! Builds the externally visible composite from a product and its enrichment.
//!
//! The composite is the same whichever backend encoding produced the records.
//! Unresolved references are kept as explicit `null`s so callers can tell
//! them apart from records with empty fields.

use crate::orchestrator::Enrichment;
use crate::records::{Brand, Category, Image, Price, Product, Record, Seller};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompositeResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub seller: Option<Seller>,
    pub brand: Option<Brand>,
    /// One entry per `Product::categories` reference, in reference order
    pub categories: Vec<Option<Category>>,
    /// One entry per `Product::images` reference, in reference order
    pub images: Vec<Option<Image>>,
}

impl CompositeResponse {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Maps plan-ordered slots onto the composite shape.
///
/// Reference lists always come out with the product's lengths; a missing
/// or mismatched slot is rendered as absent.
pub fn compose(product: Product, enrichment: Enrichment) -> CompositeResponse {
    let mut slots = enrichment.slots.into_iter();
    let mut next = || slots.next().flatten();

    let seller = next().and_then(Record::into_seller);
    let brand = next().and_then(Record::into_brand);
    let categories = product
        .categories
        .iter()
        .map(|_| next().and_then(Record::into_category))
        .collect();
    let images = product
        .images
        .iter()
        .map(|_| next().and_then(Record::into_image))
        .collect();

    CompositeResponse {
        id: product.id,
        name: product.name,
        slug: product.slug,
        description: product.description,
        price: product.price,
        seller,
        brand,
        categories,
        images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::sample_product;
    use serde_json::json;

    fn seller() -> Record {
        Record::Seller(Seller {
            id: 3,
            name: "Seller C".into(),
        })
    }

    fn brand() -> Record {
        Record::Brand(Brand {
            id: 9,
            name: "Brand 9".into(),
            description: "Referência em sustentabilidade.".into(),
            country: "Estados Unidos".into(),
            active: false,
        })
    }

    fn category() -> Record {
        Record::Category(Category {
            id: 12,
            name: "Category 12".into(),
        })
    }

    fn image() -> Record {
        Record::Image(Image {
            id: 7,
            url: "https://example.com/image7.jpg".into(),
        })
    }

    #[test]
    fn test_compose_full() {
        let enrichment = Enrichment {
            slots: vec![Some(seller()), Some(brand()), Some(category()), Some(image())],
        };
        let composite = compose(sample_product(), enrichment);

        let value = serde_json::to_value(&composite).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 5,
                "name": "Nome do produto 5",
                "slug": "nome-do-produto-5",
                "description": "Descrição do Produto 5",
                "price": {"original": 42.0, "special_price": 7.0},
                "seller": {"id": 3, "name": "Seller C"},
                "brand": {
                    "id": 9,
                    "name": "Brand 9",
                    "description": "Referência em sustentabilidade.",
                    "country": "Estados Unidos",
                    "active": false
                },
                "categories": [{"id": 12, "name": "Category 12"}],
                "images": [{"id": 7, "url": "https://example.com/image7.jpg"}]
            })
        );
    }

    #[test]
    fn test_absent_serializes_as_null() {
        let enrichment = Enrichment {
            slots: vec![Some(seller()), None, None, Some(image())],
        };
        let composite = compose(sample_product(), enrichment);

        let value = serde_json::to_value(&composite).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("brand"));
        assert_eq!(object["brand"], serde_json::Value::Null);
        assert_eq!(object["categories"], json!([null]));
        assert_eq!(object["seller"]["id"], 3);
    }

    #[test]
    fn test_lengths_follow_references() {
        let mut product = sample_product();
        product.categories = vec![1, 2, 3];
        product.images = vec![4, 5];

        // Fewer slots than references still yields full-length lists
        let composite = compose(
            product,
            Enrichment {
                slots: vec![Some(seller())],
            },
        );
        assert_eq!(composite.categories, vec![None, None, None]);
        assert_eq!(composite.images, vec![None, None]);
        assert!(composite.brand.is_none());
    }

    #[test]
    fn test_mismatched_record_is_absent() {
        let enrichment = Enrichment {
            slots: vec![Some(brand()), Some(brand()), Some(image()), Some(image())],
        };
        let composite = compose(sample_product(), enrichment);

        assert!(composite.seller.is_none());
        assert!(composite.brand.is_some());
        assert_eq!(composite.categories, vec![None]);
        assert_eq!(composite.images.len(), 1);
        assert!(composite.images[0].is_some());
    }
}
