mod request_id;
mod telemetry;

pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_tracing, TracingConfig};
