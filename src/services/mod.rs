//! Services
//!
//! Business logic that spans more than one repository call or touches the
//! filesystem.

pub mod assignment_service;
pub mod upload_service;

pub use assignment_service::AssignmentService;
pub use upload_service::{MultipartForm, UploadStore, UploadedFile};
