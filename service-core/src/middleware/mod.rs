pub mod metrics;
pub mod response_headers;
pub mod tracing;

pub use metrics::metrics_middleware;
pub use response_headers::json_cors_headers_middleware;
pub use tracing::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
