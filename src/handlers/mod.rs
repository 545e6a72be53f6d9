mod generate;
mod health;
mod metrics;

pub use generate::{generate_handler, method_not_allowed};
pub use health::health_handler;
pub use metrics::metrics_handler;
