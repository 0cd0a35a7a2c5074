// middleware/mod.rs - Request middleware and response helpers

pub mod response;
pub mod route_matcher;
pub mod session;

pub use response::{ApiResponse, ApiResult};
pub use route_matcher::{classify, RouteClass};
pub use session::{session_middleware, sign_in_url, CurrentSession};
