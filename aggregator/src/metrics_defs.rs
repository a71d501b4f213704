use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "bff.request.duration",
    metric_type: MetricType::Histogram,
    description: "Aggregation request duration in seconds. Tagged with strategy, status.",
};

pub const REQUESTS_INFLIGHT: MetricDef = MetricDef {
    name: "bff.requests.inflight",
    metric_type: MetricType::Gauge,
    description: "Number of aggregation requests currently being processed",
};

pub const SUBFETCH_ABSENT: MetricDef = MetricDef {
    name: "bff.subfetch.absent",
    metric_type: MetricType::Counter,
    description: "Sub-fetches recorded as absent, for any reason. Tagged with kind.",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUEST_DURATION, REQUESTS_INFLIGHT, SUBFETCH_ABSENT];
