//! Axum extractors for request handling
//!
//! Custom extractors for tenant scoping, validation, and pagination.

mod pagination;
mod path;
mod query;
mod tenant;
mod validated;

pub use pagination::{Pagination, PaginationParams};
pub use path::parse_path_id;
pub use query::{ChannelFilter, DeliveryFilter};
pub use tenant::{Tenant, TENANT_ID_HEADER};
pub use validated::ValidatedJson;
