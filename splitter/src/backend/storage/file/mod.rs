pub mod connection;
pub mod manifest;

pub use connection::FileConnection;
pub use manifest::{StoreManifest, StoreManifestRepository};
