use crate::{application::error::ApplicationError, domain::models::document::PDF_CONTENT_TYPE};

/// Format and size policy applied to every upload before any hashing or I/O.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionValidator {
    max_size: u64,
}

impl AdmissionValidator {
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn validate(
        &self,
        declared_content_type: &str,
        byte_length: u64,
    ) -> Result<(), ApplicationError> {
        if declared_content_type != PDF_CONTENT_TYPE {
            return Err(ApplicationError::UnsupportedMediaType(
                declared_content_type.to_string(),
            ));
        }
        if byte_length == 0 {
            return Err(ApplicationError::EmptyPayload);
        }
        if byte_length > self.max_size {
            return Err(ApplicationError::PayloadTooLarge);
        }
        Ok(())
    }
}
