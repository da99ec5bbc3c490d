pub mod cancel;
pub mod error;
pub mod logging;
pub mod response;
pub mod time;

pub use cancel::{CancelHandle, CancelToken};
pub use error::AppError;
pub use response::{BaseResponse, DeleteOutcome, ResultStatus};
