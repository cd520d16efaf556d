//! Client side of the item list: HTTP access plus the async list session.

pub mod api;
pub mod session;

pub use api::{ApiError, ApiResult, HttpItemsApi, ItemsApi, DEFAULT_SERVER_URL};
pub use session::ListSession;
