pub mod document_dto;
