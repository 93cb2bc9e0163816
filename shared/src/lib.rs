use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sentinel stored in `assignedTo` for an item shared by the whole table
pub const ALL_DINERS: &str = "all";

/// A person sharing the bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diner {
    pub id: String,
    pub name: String,
    /// Toggled from the summary view once the diner has settled up
    #[serde(default)]
    pub paid: bool,
}

impl Diner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Self::generate_id(),
            name: name.into(),
            paid: false,
        }
    }

    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Who an item is assigned to.
///
/// `Everyone` is resolved against the diner list at computation time, so an
/// item assigned to the whole table follows diners being added or removed.
/// On the wire this is the plain id array used by the persisted blobs, with
/// `["all"]` standing for `Everyone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum Assignment {
    Everyone,
    Explicit(Vec<String>),
}

impl Assignment {
    pub fn explicit<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Assignment::Explicit(ids.into_iter().map(Into::into).collect())
    }

    /// True for an explicit assignment naming no diner at all
    pub fn is_empty(&self) -> bool {
        matches!(self, Assignment::Explicit(ids) if ids.is_empty())
    }

    /// Whether the diner is named by this assignment (always true for `Everyone`)
    pub fn includes(&self, diner_id: &str) -> bool {
        match self {
            Assignment::Everyone => true,
            Assignment::Explicit(ids) => ids.iter().any(|id| id == diner_id),
        }
    }
}

impl From<Vec<String>> for Assignment {
    fn from(ids: Vec<String>) -> Self {
        if ids.iter().any(|id| id == ALL_DINERS) {
            Assignment::Everyone
        } else {
            Assignment::Explicit(ids)
        }
    }
}

impl From<Assignment> for Vec<String> {
    fn from(assignment: Assignment) -> Self {
        match assignment {
            Assignment::Everyone => vec![ALL_DINERS.to_string()],
            Assignment::Explicit(ids) => ids,
        }
    }
}

fn default_shared() -> bool {
    true
}

/// A priced line on the bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Total cost when shared, cost per assignee otherwise
    pub price: f64,
    pub assigned_to: Assignment,
    /// Older records carry no flag; they were always divided among assignees
    #[serde(default = "default_shared")]
    pub is_shared: bool,
}

impl Item {
    pub fn new(name: impl Into<String>, price: f64, assigned_to: Assignment, is_shared: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            assigned_to,
            is_shared,
        }
    }
}

/// Strategy for allocating the table's cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivisionMode {
    /// Each diner pays for what was assigned to them
    #[default]
    Consumption,
    /// Flat per-capita split of the table's real cost
    Equal,
}

impl fmt::Display for DivisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivisionMode::Consumption => write!(f, "consumption"),
            DivisionMode::Equal => write!(f, "equal"),
        }
    }
}

/// Derived per-diner breakdown, recomputed on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinerSummary {
    pub diner: Diner,
    pub subtotal: f64,
    pub service: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub per_diner: Vec<DinerSummary>,
    pub grand_total: f64,
}

impl BillSummary {
    pub fn paid_count(&self) -> usize {
        self.per_diner.iter().filter(|s| s.diner.paid).count()
    }
}

/// Immutable snapshot of a finalized bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBill {
    pub id: String,
    /// RFC 3339 timestamp of finalization
    pub date: String,
    pub diners: Vec<Diner>,
    pub items: Vec<Item>,
    pub service_percent: f64,
    pub currency: String,
    pub total: f64,
    #[serde(default)]
    pub division_mode: DivisionMode,
}

impl SavedBill {
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    pub fn paid_diners(&self) -> impl Iterator<Item = &Diner> {
        self.diners.iter().filter(|d| d.paid)
    }
}

/// One entry of the frequent-name registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentDiner {
    /// Casing of the most recent use
    pub name: String,
    pub count: u32,
    /// RFC 3339 timestamp of the most recent use
    pub last_used: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Global application settings. Fields missing from a stored blob take
/// their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    #[serde(deserialize_with = "lenient_service_percent")]
    pub service_percent: u32,
    pub currency: String,
    pub theme: Theme,
}

impl AppSettings {
    pub const MAX_SERVICE_PERCENT: u32 = 100;
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            service_percent: 10,
            currency: "CUP".to_string(),
            theme: Theme::Light,
        }
    }
}

/// Accept any stored number for the service percent, rounded and clamped
/// to `0..=MAX_SERVICE_PERCENT`; `null` falls back to the default
fn lenient_service_percent<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<f64>::deserialize(deserializer)?;
    Ok(match stored {
        Some(percent) if percent.is_finite() => {
            percent.round().clamp(0.0, f64::from(AppSettings::MAX_SERVICE_PERCENT)) as u32
        }
        _ => AppSettings::default().service_percent,
    })
}

/// Step of the in-progress bill flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStep {
    #[default]
    Setup,
    Items,
    Summary,
}

/// The bill currently being entered
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    #[serde(default)]
    pub diners: Vec<Diner>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub step: BillStep,
    #[serde(default)]
    pub division_mode: DivisionMode,
}

impl BillDraft {
    pub fn is_empty(&self) -> bool {
        self.diners.is_empty() && self.items.is_empty()
    }

    pub fn diner_names(&self) -> Vec<String> {
        self.diners.iter().map(|d| d.name.clone()).collect()
    }
}

/// Currency known to the formatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Request / response types for the command layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddDinerRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameDinerRequest {
    pub diner_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinerRequest {
    pub diner_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinerResponse {
    pub diner: Diner,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    /// Raw price as typed; unparsable input counts as zero
    pub price_input: String,
    pub assigned_to: Assignment,
    pub is_shared: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub item_id: String,
    pub name: String,
    pub price_input: String,
    pub assigned_to: Assignment,
    pub is_shared: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item: Item,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDivisionModeRequest {
    pub division_mode: DivisionMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetStepRequest {
    pub step: BillStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDraftResponse {
    pub draft: BillDraft,
    /// Real cost of every item on the bill, formatted
    pub formatted_items_total: String,
}

/// A diner's line of the summary, formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedDinerSummary {
    pub diner_id: String,
    pub name: String,
    pub paid: bool,
    pub subtotal: String,
    pub service: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummaryResponse {
    pub summary: BillSummary,
    pub formatted_diners: Vec<FormattedDinerSummary>,
    pub formatted_grand_total: String,
    pub service_percent: u32,
    pub currency: String,
    pub division_mode: DivisionMode,
    pub paid_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeBillResponse {
    pub bill: SavedBill,
    pub share_text: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillHistoryResponse {
    pub bills: Vec<SavedBill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRequest {
    pub bill_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteBillResponse {
    pub deleted: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestNamesRequest {
    pub query: String,
    /// Names already at the table
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopNamesRequest {
    pub limit: usize,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameListResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub service_percent: Option<u32>,
    pub currency: Option<String>,
    pub theme: Option<Theme>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: AppSettings,
    pub success_message: String,
}
