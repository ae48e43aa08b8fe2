use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::DomainError;

/// The single active screen of the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    List,
    Form,
    Details,
    Search,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::List => write!(f, "list"),
            ViewMode::Form => write!(f, "form"),
            ViewMode::Details => write!(f, "details"),
            ViewMode::Search => write!(f, "search"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(ViewMode::List),
            "form" => Ok(ViewMode::Form),
            "details" => Ok(ViewMode::Details),
            "search" => Ok(ViewMode::Search),
            other => Err(DomainError::UnknownViewMode(other.to_string())),
        }
    }
}
