pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod users;

use uuid::Uuid;

use crate::error::ApiError;

/// Malformed identifiers short-circuit to 404
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("Invalid id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_not_found() {
        let err = parse_id("not-a-uuid").expect_err("must reject");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn well_formed_id_parses() {
        assert!(parse_id("2a9b1a40-0000-4000-8000-000000000001").is_ok());
    }
}
