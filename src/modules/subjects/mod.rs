pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_subject_admin_router, init_subjects_router};
