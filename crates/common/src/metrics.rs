use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static SEARCH_CACHE_HITS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "spaceship_search_cache_hits_total",
        "Name searches answered from the search cache"
    )
    .expect("register search_cache_hits_total")
});

pub static SEARCH_CACHE_MISSES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "spaceship_search_cache_misses_total",
        "Name searches that had to query storage"
    )
    .expect("register search_cache_misses_total")
});

pub static WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "spaceship_writes_total",
        "Spaceship writes by operation",
        &["op"]
    )
    .expect("register writes_total")
});

pub static NEGATIVE_ID_LOOKUPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "spaceship_negative_id_lookups_total",
        "Get-by-id requests made with a negative id"
    )
    .expect("register negative_id_lookups_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
