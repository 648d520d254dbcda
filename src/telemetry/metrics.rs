use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("receipt-toolkit"));

// --- Image provider metrics ---

pub static IMAGE_OPERATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("gen_ai.client.operation.duration")
        .with_description("Duration of image generation calls in seconds")
        .with_unit("s")
        .build()
});

pub static IMAGE_RETRY_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.retry.count")
        .with_description("Number of image generation retries")
        .with_unit("{retry}")
        .build()
});

pub static IMAGE_ERROR_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.error.count")
        .with_description("Number of image generation errors")
        .with_unit("{error}")
        .build()
});

// --- Domain metrics ---

pub static RECEIPTS_GENERATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("receipts.generated")
        .with_description("Synthetic receipts generated")
        .with_unit("{receipt}")
        .build()
});

pub static RECEIPTS_VALIDATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("receipts.validated")
        .with_description("Receipts run through validation")
        .with_unit("{receipt}")
        .build()
});

pub static RECEIPTS_PARSED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("receipts.parsed")
        .with_description("Receipt texts parsed")
        .with_unit("{receipt}")
        .build()
});

// --- HTTP metrics ---

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
        ])
        .build()
});
