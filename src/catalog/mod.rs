//! Activity catalog module
//!
//! Holds the extracurricular activities offered by the school and the
//! students registered for each one. The catalog lives in process memory
//! for the lifetime of the server; nothing is written back to disk.

mod error;
mod seed;
mod store;

pub use error::{CatalogError, SeedError};
pub use seed::{default_catalog, load_catalog, load_seed_file};
pub use store::{Activity, Catalog, CatalogStore, SharedCatalogStore};
