//! Metrics definitions for the catalog.

use shared::metrics_defs::{MetricDef, MetricType};

pub const LOOKUP: MetricDef = MetricDef {
    name: "catalog.lookup",
    metric_type: MetricType::Counter,
    description: "Number of single-record lookups. Tagged with kind, found.",
};

pub const ALL_METRICS: &[MetricDef] = &[LOOKUP];
