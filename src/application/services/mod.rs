mod admission;
#[cfg(test)]
pub mod fakes;
mod link_service;
mod storage_service;
mod upload_service;

pub use admission::AdmissionValidator;
pub use link_service::LinkService;
pub use storage_service::StorageService;
pub use upload_service::UploadService;
