//! Protobuf messages exchanged with the gRPC lookup services.

use crate::records;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Slug {
    #[prost(string, tag = "1")]
    pub slug: String,
}

/// Request message for every id-keyed lookup (`SellerId`, `BrandRequest`,
/// `CategoryId` and `ImageId` share this layout).
#[derive(Clone, PartialEq, prost::Message)]
pub struct ResourceId {
    #[prost(int32, tag = "1")]
    pub id: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Price {
    #[prost(float, tag = "1")]
    pub original: f32,
    #[prost(float, tag = "2")]
    pub special_price: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Product {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub slug: String,
    #[prost(string, tag = "4")]
    pub description: String,
    #[prost(message, optional, tag = "5")]
    pub price: Option<Price>,
    #[prost(int32, tag = "6")]
    pub seller_id: i32,
    #[prost(int32, tag = "7")]
    pub brand_id: i32,
    #[prost(int32, repeated, tag = "8")]
    pub categories: Vec<i32>,
    #[prost(int32, repeated, tag = "9")]
    pub images: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Seller {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Brand {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub country: String,
    #[prost(bool, tag = "5")]
    pub active: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Category {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Image {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub url: String,
}

impl From<Price> for records::Price {
    fn from(price: Price) -> Self {
        records::Price {
            original: f64::from(price.original),
            special_price: f64::from(price.special_price),
        }
    }
}

impl From<Product> for records::Product {
    fn from(product: Product) -> Self {
        records::Product {
            id: product.id.into(),
            name: product.name,
            slug: product.slug,
            description: product.description,
            // proto3 leaves unset messages empty
            price: product.price.map(Into::into).unwrap_or_default(),
            seller_id: product.seller_id.into(),
            brand_id: product.brand_id.into(),
            categories: product.categories.into_iter().map(i64::from).collect(),
            images: product.images.into_iter().map(i64::from).collect(),
        }
    }
}

impl From<Seller> for records::Seller {
    fn from(seller: Seller) -> Self {
        records::Seller {
            id: seller.id.into(),
            name: seller.name,
        }
    }
}

impl From<Brand> for records::Brand {
    fn from(brand: Brand) -> Self {
        records::Brand {
            id: brand.id.into(),
            name: brand.name,
            description: brand.description,
            country: brand.country,
            active: brand.active,
        }
    }
}

impl From<Category> for records::Category {
    fn from(category: Category) -> Self {
        records::Category {
            id: category.id.into(),
            name: category.name,
        }
    }
}

impl From<Image> for records::Image {
    fn from(image: Image) -> Self {
        records::Image {
            id: image.id.into(),
            url: image.url,
        }
    }
}
