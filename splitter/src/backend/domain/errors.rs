//! Validation errors for changes to the in-progress bill.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DinerError {
    #[error("Diner name cannot be empty")]
    EmptyName,
    #[error("{0} is already at the table")]
    DuplicateName(String),
    #[error("Diner not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ItemError {
    #[error("Item name cannot be empty")]
    EmptyName,
    #[error("Price must be a number")]
    InvalidPrice,
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Item must be assigned to at least one diner")]
    NoAssignees,
    #[error("Item is assigned to an unknown diner: {0}")]
    UnknownDiner(String),
    #[error("Item not found: {0}")]
    NotFound(String),
}
