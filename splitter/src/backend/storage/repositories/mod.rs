pub mod bill_history_repository;
pub mod draft_repository;
pub mod frequent_name_repository;
pub mod settings_repository;

pub use bill_history_repository::BillHistoryRepository;
pub use draft_repository::DraftRepository;
pub use frequent_name_repository::FrequentNameRepository;
pub use settings_repository::SettingsRepository;
