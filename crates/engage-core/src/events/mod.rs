//! Domain events crossing the worker boundary

mod delivery_status;

pub use delivery_status::DeliveryStatusUpdated;
