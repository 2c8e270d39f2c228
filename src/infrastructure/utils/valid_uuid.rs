use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path id, rejecting anything that is not a UUID.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::InvalidInput("malformatted id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_ids() {
        let err = valid_uuid("5a422aa71b54a676234d17f8").unwrap_err();
        assert_eq!(err.to_string(), "malformatted id");
    }

    #[test]
    fn accepts_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(valid_uuid(&id.to_string()).unwrap(), id);
    }
}
