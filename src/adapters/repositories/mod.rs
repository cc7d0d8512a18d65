mod memory_document_repository;
mod pg_document_repository;

pub use memory_document_repository::MemoryDocumentRepository;
pub use pg_document_repository::PgDocumentRepository;
