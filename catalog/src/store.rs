//! In-memory lookup tables backing the catalog endpoints.
//!
//! Every table is ordered by id so listings come back in a stable order.
//! Products are additionally indexed by lower-cased slug.

use crate::types::{Brand, Category, Image, Product, Seller};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// A record that is uniquely keyed by a numeric id within its own kind.
pub trait Record: Serialize + Clone + Send + Sync + 'static {
    /// Collection name, also used as the URL segment and metric tag.
    const KIND: &'static str;

    fn id(&self) -> i64;

    fn table(catalog: &Catalog) -> &LookupTable<Self>;
}

#[derive(Clone, Debug)]
pub struct LookupTable<T> {
    rows: BTreeMap<i64, T>,
}

impl<T> Default for LookupTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Record> LookupTable<T> {
    /// Inserts or replaces the row with the same id.
    pub fn insert(&mut self, row: T) {
        self.rows.insert(row.id(), row);
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Products keyed by id, with a case-insensitive slug index.
#[derive(Clone, Debug, Default)]
pub struct ProductTable {
    table: LookupTable<Product>,
    by_slug: HashMap<String, i64>,
}

impl ProductTable {
    pub fn insert(&mut self, product: Product) {
        if let Some(previous) = self.table.get(product.id) {
            self.by_slug.remove(&previous.slug.to_lowercase());
        }
        self.by_slug.insert(product.slug.to_lowercase(), product.id);
        self.table.insert(product);
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Product> {
        self.by_slug
            .get(&slug.to_lowercase())
            .and_then(|id| self.table.get(*id))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: ProductTable,
    sellers: LookupTable<Seller>,
    brands: LookupTable<Brand>,
    categories: LookupTable<Category>,
    images: LookupTable<Image>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.get_by_slug(slug)
    }

    pub fn get<T: Record>(&self, id: i64) -> Option<&T> {
        T::table(self).get(id)
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product);
    }

    pub fn insert_seller(&mut self, seller: Seller) {
        self.sellers.insert(seller);
    }

    pub fn insert_brand(&mut self, brand: Brand) {
        self.brands.insert(brand);
    }

    pub fn insert_category(&mut self, category: Category) {
        self.categories.insert(category);
    }

    pub fn insert_image(&mut self, image: Image) {
        self.images.insert(image);
    }
}

impl Record for Product {
    const KIND: &'static str = "products";

    fn id(&self) -> i64 {
        self.id
    }

    fn table(catalog: &Catalog) -> &LookupTable<Self> {
        &catalog.products.table
    }
}

impl Record for Seller {
    const KIND: &'static str = "sellers";

    fn id(&self) -> i64 {
        self.id
    }

    fn table(catalog: &Catalog) -> &LookupTable<Self> {
        &catalog.sellers
    }
}

impl Record for Brand {
    const KIND: &'static str = "brands";

    fn id(&self) -> i64 {
        self.id
    }

    fn table(catalog: &Catalog) -> &LookupTable<Self> {
        &catalog.brands
    }
}

impl Record for Category {
    const KIND: &'static str = "categories";

    fn id(&self) -> i64 {
        self.id
    }

    fn table(catalog: &Catalog) -> &LookupTable<Self> {
        &catalog.categories
    }
}

impl Record for Image {
    const KIND: &'static str = "images";

    fn id(&self) -> i64 {
        self.id
    }

    fn table(catalog: &Catalog) -> &LookupTable<Self> {
        &catalog.images
    }
}
