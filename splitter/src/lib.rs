//! Bill splitting engine: divide a restaurant bill among diners, keep a
//! history of finished bills and suggest the names of frequent companions.
//!
//! Front ends drive everything through [`backend::io`]; see
//! [`backend::initialize_backend`] to wire the services to a store.

pub mod backend;

pub use backend::{initialize_backend, initialize_file_backend, AppState};
