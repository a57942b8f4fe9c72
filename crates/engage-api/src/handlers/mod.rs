//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod broadcasts;
pub mod channel_accounts;
pub mod deliveries;
pub mod health;
pub mod immediates;
pub mod inbound;
pub mod rules;
