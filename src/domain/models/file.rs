use bytes::Bytes;

/// Raw upload as received from the caller, before admission.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Bytes,
    pub mime_type: String,
}

impl FileData {
    pub fn new(content: Bytes, mime_type: String) -> Self {
        Self { content, mime_type }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Result of a create-if-absent write against the blob store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    Conflict,
}
