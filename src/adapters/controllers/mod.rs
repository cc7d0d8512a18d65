pub mod document_controller;
pub mod health_controller;
