use crate::domain::models::document::IdentifierError;

#[derive(Debug)]
pub enum ApplicationError {
    InvalidIdentifier(String),
    UnsupportedMediaType(String),
    PayloadTooLarge,
    EmptyPayload,
    BadRequest(String),
    AlreadyExists(String),
    NotFound,
    StorageUnavailable(String),
    MetadataInconsistency { storage_key: String, cause: String },
    DatabaseError(String),
}

impl From<IdentifierError> for ApplicationError {
    fn from(error: IdentifierError) -> Self {
        ApplicationError::InvalidIdentifier(error.to_string())
    }
}
