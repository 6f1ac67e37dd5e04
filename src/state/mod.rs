//! Client-side state machines for the alert list and alert detail screens

pub mod detail;
pub mod list;

pub use detail::{AlertDetailState, DetailRoute, EditBuffer, SaveOutcome};
pub use list::{
    AlertListState, BulkUpdateOutcome, FilterCriteria, FilterUpdate, ListRequest, ReloadOutcome,
};

use std::fmt;

/// Why a write was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No rows are selected
    EmptySelection,
    /// No target status was chosen
    MissingStatus,
    /// None of the selected rows carries an alert id
    NoAlertIds,
    /// No alert is loaded
    NoAlertLoaded,
    /// The note text is blank
    BlankNote,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::EmptySelection => "no alerts selected",
            SkipReason::MissingStatus => "no status chosen",
            SkipReason::NoAlertIds => "selected alerts have no ids",
            SkipReason::NoAlertLoaded => "no alert loaded",
            SkipReason::BlankNote => "note is blank",
        };
        f.write_str(text)
    }
}
