//! Request handler module
//!
//! Responsible for request routing dispatch: the activities API, static page
//! assets, the root redirect and health probes.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
