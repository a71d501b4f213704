use crate::errors::FetchError;
use crate::fetch::{FetchClient, Lookup};
use crate::records::{Brand, Category, Image, Price, Product, Record, Seller};
use async_trait::async_trait;
use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory backend with per-lookup latency and injected failures.
#[derive(Default)]
pub struct MockBackend {
    responses: HashMap<Lookup, Result<Record, FetchError>>,
    delays: HashMap<Lookup, Duration>,
    panics: HashSet<Lookup>,
    calls: Mutex<Vec<Lookup>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, lookup: Lookup, record: Record) -> Self {
        self.responses.insert(lookup, Ok(record));
        self
    }

    pub fn with_product(self, product: Product) -> Self {
        let lookup = Lookup::ProductBySlug(product.slug.to_lowercase());
        self.with_response(lookup, Record::Product(product))
    }

    pub fn with_seller(self, seller: Seller) -> Self {
        self.with_response(Lookup::Seller(seller.id), Record::Seller(seller))
    }

    pub fn with_brand(self, brand: Brand) -> Self {
        self.with_response(Lookup::Brand(brand.id), Record::Brand(brand))
    }

    pub fn with_category(self, category: Category) -> Self {
        self.with_response(Lookup::Category(category.id), Record::Category(category))
    }

    pub fn with_image(self, image: Image) -> Self {
        self.with_response(Lookup::Image(image.id), Record::Image(image))
    }

    pub fn with_failure(mut self, lookup: Lookup, error: FetchError) -> Self {
        self.responses.insert(lookup, Err(error));
        self
    }

    pub fn with_delay(mut self, lookup: Lookup, delay: Duration) -> Self {
        self.delays.insert(lookup, delay);
        self
    }

    /// Makes the lookup panic mid-call.
    pub fn with_panic(mut self, lookup: Lookup) -> Self {
        self.panics.insert(lookup);
        self
    }

    /// Removes a record so the lookup answers not-found.
    pub fn without(mut self, lookup: &Lookup) -> Self {
        self.responses.remove(lookup);
        self
    }

    /// Every lookup received so far, in arrival order.
    pub fn calls(&self) -> Vec<Lookup> {
        self.calls.lock().unwrap().clone()
    }

    pub fn secondary_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|lookup| !matches!(lookup, Lookup::ProductBySlug(_)))
            .count()
    }
}

#[async_trait]
impl FetchClient for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, lookup: &Lookup) -> Result<Record, FetchError> {
        self.calls.lock().unwrap().push(lookup.clone());

        if let Some(delay) = self.delays.get(lookup) {
            tokio::time::sleep(*delay).await;
        }

        if self.panics.contains(lookup) {
            panic!("backend crashed while serving {lookup}");
        }

        self.responses
            .get(lookup)
            .cloned()
            .unwrap_or(Err(FetchError::NotFound))
    }
}

/// `nome-do-produto-5` with seller 3, brand 9, category 12 and image 7.
pub fn sample_product() -> Product {
    Product {
        id: 5,
        name: "Nome do produto 5".into(),
        slug: "nome-do-produto-5".into(),
        description: "Descrição do Produto 5".into(),
        price: Price {
            original: 42.0,
            special_price: 7.0,
        },
        seller_id: 3,
        brand_id: 9,
        categories: vec![12],
        images: vec![7],
    }
}

/// A healthy backend holding [`sample_product`] and everything it references.
pub fn sample_backend() -> MockBackend {
    MockBackend::new()
        .with_product(sample_product())
        .with_seller(Seller {
            id: 3,
            name: "Seller C".into(),
        })
        .with_brand(Brand {
            id: 9,
            name: "Brand 9".into(),
            description: "Referência em sustentabilidade.".into(),
            country: "Estados Unidos".into(),
            active: false,
        })
        .with_category(Category {
            id: 12,
            name: "Category 12".into(),
        })
        .with_image(Image {
            id: 7,
            url: "https://example.com/image7.jpg".into(),
        })
}

/// Recorder keeping counter and gauge values by metric name, for use with
/// `metrics::with_local_recorder`.
#[derive(Default)]
pub struct TestRecorder {
    counters: Mutex<HashMap<String, Arc<AtomicU64>>>,
    gauges: Mutex<HashMap<String, Arc<AtomicU64>>>,
}

impl TestRecorder {
    /// Sum over every label set of the counter `name`.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.split('{').next() == Some(name))
            .map(|(_, value)| value.load(Ordering::SeqCst))
            .sum()
    }

    /// Current value of the unlabelled gauge `name`. Panics if it was never registered.
    pub fn gauge(&self, name: &str) -> f64 {
        let gauges = self.gauges.lock().unwrap();
        f64::from_bits(gauges[name].load(Ordering::SeqCst))
    }

    fn handle(map: &Mutex<HashMap<String, Arc<AtomicU64>>>, key: &Key) -> Arc<AtomicU64> {
        let labels: Vec<String> = key
            .labels()
            .map(|label| format!("{}={}", label.key(), label.value()))
            .collect();
        let name = match labels.is_empty() {
            true => key.name().to_string(),
            false => format!("{}{{{}}}", key.name(), labels.join(",")),
        };
        map.lock().unwrap().entry(name).or_default().clone()
    }
}

impl Recorder for TestRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        Counter::from_arc(Self::handle(&self.counters, key))
    }

    fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Self::handle(&self.gauges, key))
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}
