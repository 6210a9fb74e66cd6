/// Rejects identifiers that are not UUIDs before they reach the database
pub fn parse_id<'a>(field: &'static str, value: &'a str) -> Result<&'a str, super::DomainError> {
    match uuid::Uuid::parse_str(value) {
        Ok(_) => Ok(value),
        Err(_) => Err(super::DomainError::InvalidId {
            field,
            value: value.to_string(),
        }),
    }
}
