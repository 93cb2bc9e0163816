//! # Backend Module
//!
//! All non-UI logic of the bill splitter, in three layers:
//!
//! ```text
//! CLI
//!     ↓
//! IO Layer (commands taking request DTOs, returning response DTOs)
//!     ↓
//! Domain Layer (split engine, name ranking, history, draft, settings)
//!     ↓
//! Storage Layer (key-value blobs on disk or in memory)
//! ```
//!
//! The backend does not care which front end drives it. The CLI in this
//! crate only ever calls into [`io`].

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::backend::domain::{
    BillHistoryService, DraftService, FrequentNameService, SettingsService, ShareService,
    SplitService,
};
use crate::backend::storage::{
    BillHistoryRepository, DraftRepository, FileConnection, FrequentNameRepository,
    KeyValueStore, SettingsRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub split_service: SplitService,
    pub frequent_name_service: FrequentNameService,
    pub bill_history_service: BillHistoryService,
    pub draft_service: DraftService,
    pub settings_service: SettingsService,
    pub share_service: ShareService,
}

/// Wire every service to the given store
pub fn initialize_backend(store: Arc<dyn KeyValueStore>) -> AppState {
    info!("Setting up domain model");
    let frequent_name_service =
        FrequentNameService::new(FrequentNameRepository::new(Arc::clone(&store)));
    let bill_history_service =
        BillHistoryService::new(BillHistoryRepository::new(Arc::clone(&store)));
    let draft_service = DraftService::new(DraftRepository::new(Arc::clone(&store)));
    let settings_service = SettingsService::new(SettingsRepository::new(store));

    info!("Setting up application state");
    AppState {
        split_service: SplitService::new(),
        frequent_name_service,
        bill_history_service,
        draft_service,
        settings_service,
        share_service: ShareService::new(),
    }
}

/// Backend persisted under `data_dir`, or the platform data directory
pub fn initialize_file_backend(data_dir: Option<&Path>) -> Result<AppState> {
    info!("Setting up file store");
    let connection = match data_dir {
        Some(dir) => FileConnection::new(dir)?,
        None => FileConnection::new_default()?,
    };
    info!("Using data directory {}", connection.base_directory().display());

    Ok(initialize_backend(Arc::new(connection)))
}
