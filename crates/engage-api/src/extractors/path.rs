//! Path parameter parsing

use std::str::FromStr;

use crate::response::ApiError;

/// Parse a typed id out of a path segment
pub fn parse_path_id<T: FromStr>(value: &str, name: &str) -> Result<T, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}
