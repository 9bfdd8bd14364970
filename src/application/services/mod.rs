mod conversion_worker;
mod dispatcher;

pub use conversion_worker::{ConversionWorker, WorkerError};
pub use dispatcher::{ConversionRequest, Dispatcher, SubmitError};
