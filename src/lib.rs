pub mod config;
pub mod db;
pub mod domain;
pub mod state;
pub mod tenant;
pub mod utils;

pub use state::AppState;
pub use tenant::{IdentityProvider, TenantContext, TenantId};
pub use utils::{AppError, BaseResponse, CancelHandle, CancelToken, DeleteOutcome, ResultStatus};
