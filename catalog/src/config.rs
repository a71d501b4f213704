use serde::Deserialize;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Seed needs at least one {0}")]
    EmptyTable(&'static str),
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Sizes of the generated tables.
#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    pub products: i64,
    pub sellers: i64,
    pub brands: i64,
    pub categories: i64,
    pub images: i64,
    /// Number of category and image references carried by each product
    pub refs_per_product: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            products: 100,
            sellers: 100,
            brands: 100,
            categories: 100,
            images: 100,
            refs_per_product: 1,
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.listener.port == 0 {
            return Err(ValidationError::InvalidPort);
        }

        let seed = &self.seed;
        for (count, kind) in [
            (seed.sellers, "seller"),
            (seed.brands, "brand"),
            (seed.categories, "category"),
            (seed.images, "image"),
        ] {
            if count < 1 && seed.products > 0 {
                return Err(ValidationError::EmptyTable(kind));
            }
        }

        Ok(())
    }
}
