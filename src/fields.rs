//! Field selectors used by the search command.

use clap::ValueEnum;

/// Which part of a task a search query is matched against.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "snake_case")]
pub enum SearchField {
    Id,
    Title,
    Description,
    #[value(alias = "date")]
    DueDate,
    /// Title and description joined by a space.
    #[default]
    All,
}
