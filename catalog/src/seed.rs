//! Deterministic generator for the catalog tables.
//!
//! References are spread over the referenced tables with fixed strides, so
//! the same [`SeedConfig`] always produces the same catalog.

use crate::config::SeedConfig;
use crate::store::Catalog;
use crate::types::{Brand, Category, Image, Price, Product, Seller};

const BRAND_DESCRIPTIONS: [&str; 5] = [
    "Marca premium com presença global.",
    "Referência em sustentabilidade.",
    "Foco em design minimalista e funcional.",
    "Marca líder em tecnologia de consumo.",
    "Conhecida por produtos acessíveis e duráveis.",
];

const BRAND_COUNTRIES: [&str; 4] = ["Brasil", "Estados Unidos", "Alemanha", "Japão"];

/// Maps `n` onto `1..=modulus` using a stride coprime with most table sizes.
fn spread(n: i64, stride: i64, modulus: i64) -> i64 {
    (n * stride).rem_euclid(modulus) + 1
}

fn product(id: i64, config: &SeedConfig) -> Product {
    let refs = config.refs_per_product as i64;
    let categories = (0..refs)
        .map(|k| spread(id + k, 37, config.categories))
        .collect();
    let images = (0..refs).map(|k| spread(id + k, 53, config.images)).collect();

    Product {
        id,
        name: format!("Nome do produto {id}"),
        slug: format!("nome-do-produto-{id}"),
        description: format!("Descrição do Produto {id}"),
        price: Price {
            original: spread(id, 17, 100) as f64,
            special_price: spread(id, 7, 10) as f64,
        },
        seller_id: spread(id, 31, config.sellers),
        brand_id: spread(id, 41, config.brands),
        categories,
        images,
    }
}

impl Catalog {
    /// Builds a catalog populated according to `config`.
    pub fn seeded(config: &SeedConfig) -> Self {
        let mut catalog = Catalog::new();

        for id in 1..=config.sellers {
            catalog.insert_seller(Seller {
                id,
                name: format!("Seller {id}"),
            });
        }

        for id in 1..=config.brands {
            let i = id as usize;
            catalog.insert_brand(Brand {
                id,
                name: format!("Brand {id}"),
                description: BRAND_DESCRIPTIONS[i % BRAND_DESCRIPTIONS.len()].to_string(),
                country: BRAND_COUNTRIES[i % BRAND_COUNTRIES.len()].to_string(),
                active: id % 2 == 0,
            });
        }

        for id in 1..=config.categories {
            catalog.insert_category(Category {
                id,
                name: format!("Category {id}"),
            });
        }

        for id in 1..=config.images {
            catalog.insert_image(Image {
                id,
                url: format!("https://example.com/image{id}.jpg"),
            });
        }

        if config.sellers > 0 && config.brands > 0 && config.categories > 0 && config.images > 0 {
            for id in 1..=config.products {
                catalog.insert_product(product(id, config));
            }
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;

    #[test]
    fn test_seed_sizes() {
        let catalog = Catalog::seeded(&SeedConfig::default());
        assert_eq!(Product::table(&catalog).len(), 100);
        assert_eq!(Seller::table(&catalog).len(), 100);
        assert_eq!(Brand::table(&catalog).len(), 100);
        assert_eq!(Category::table(&catalog).len(), 100);
        assert_eq!(Image::table(&catalog).len(), 100);
    }

    #[test]
    fn test_references_resolve() {
        let config = SeedConfig {
            products: 20,
            sellers: 3,
            brands: 4,
            categories: 5,
            images: 6,
            refs_per_product: 3,
        };
        let catalog = Catalog::seeded(&config);

        for product in Product::table(&catalog).iter() {
            assert!(catalog.get::<Seller>(product.seller_id).is_some());
            assert!(catalog.get::<Brand>(product.brand_id).is_some());
            assert_eq!(product.categories.len(), 3);
            assert_eq!(product.images.len(), 3);
            for id in &product.categories {
                assert!(catalog.get::<Category>(*id).is_some());
            }
            for id in &product.images {
                assert!(catalog.get::<Image>(*id).is_some());
            }
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let config = SeedConfig::default();
        let a = Catalog::seeded(&config);
        let b = Catalog::seeded(&config);
        assert_eq!(
            a.product_by_slug("nome-do-produto-5"),
            b.product_by_slug("nome-do-produto-5")
        );
    }

    #[test]
    fn test_brand_fields() {
        let catalog = Catalog::seeded(&SeedConfig::default());
        let brand = catalog.get::<Brand>(2).unwrap();
        assert_eq!(brand.name, "Brand 2");
        assert_eq!(brand.country, "Alemanha");
        assert!(brand.active);
        assert!(!catalog.get::<Brand>(3).unwrap().active);
    }
}
