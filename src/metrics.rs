use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("puzzle_requests_total", "Total number of puzzle requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("puzzle_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("puzzle_cache_misses_total", "Total cache misses").unwrap();
    pub static ref CACHE_READ_FAULTS: Counter = register_counter!(
        "puzzle_cache_read_faults_total",
        "Cache lookups that failed and were treated as misses"
    )
    .unwrap();
    pub static ref CACHE_WRITE_FAULTS: Counter = register_counter!(
        "puzzle_cache_write_faults_total",
        "Cache writes that failed after generation"
    )
    .unwrap();
    pub static ref PROVIDER_FAILURES: Counter = register_counter!(
        "puzzle_provider_failures_total",
        "Failed calls to the generation provider"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "puzzle_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
}
