//! # Domain Module
//!
//! Business logic for splitting a restaurant bill among the people at the
//! table. Nothing here knows about the CLI or how blobs are persisted; the
//! services talk to storage only through the repositories.
//!
//! ## Module Organization
//!
//! - **split_service**: per-diner allocation in consumption or equal mode
//! - **frequent_name_service**: ranked registry of names used on past bills
//! - **bill_history_service**: finalized bill snapshots, newest first
//! - **draft_service**: the bill currently being entered
//! - **settings_service**: service percentage, currency and theme
//! - **share_service**: plain-text summary for chat apps
//! - **money**: currency formatting and price parsing
//!
//! ## Business Rules
//!
//! - Amounts are kept unrounded; two decimals only appear when formatting
//! - An item assigned to everyone follows the table as diners come and go
//! - History holds at most 20 bills and the name registry at most 30 names
//! - Finalizing a bill and recording its names are separate steps

pub mod bill_history_service;
pub mod draft_service;
pub mod errors;
pub mod frequent_name_service;
pub mod money;
pub mod settings_service;
pub mod share_service;
pub mod split_service;

pub use bill_history_service::*;
pub use draft_service::*;
pub use errors::*;
pub use frequent_name_service::*;
pub use settings_service::*;
pub use share_service::*;
pub use split_service::SplitService;
