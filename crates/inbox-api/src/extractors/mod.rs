//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, ids and paging.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::AuthUser;
pub use pagination::{NotificationFilter, Pagination, PaginationParams};
pub use path::IdPath;
pub use validated::ValidatedJson;
