pub mod auth;
pub mod response;

pub use auth::{require_role, AuthUser};
pub use response::{ApiResponse, ApiResult};
