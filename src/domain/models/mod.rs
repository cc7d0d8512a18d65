pub mod document;
pub mod file;
