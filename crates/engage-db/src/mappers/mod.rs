//! Entity to model mappers
//!
//! This module provides conversions between domain entities (engage-core) and database models.
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs and helpers: Prepare entity data for database operations

mod broadcast;
mod channel_account;
mod customer;
mod enums;
mod immediate;
mod inbound_log;
mod outbox;
mod rule;

pub use broadcast::delivery_count;
pub use customer::content_from_model;
pub use enums::content_table;
pub use immediate::audience_to_value;
pub use rule::RuleInsert;
