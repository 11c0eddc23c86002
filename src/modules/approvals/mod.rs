pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_approvals_router, init_teacher_verification_router};
