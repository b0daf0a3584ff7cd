//! Alert value objects: closed value sets accepted by the Opsgenie API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alert priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
    P4,
    P5,
}

impl Priority {
    pub const ALL: [&'static str; 5] = ["P1", "P2", "P3", "P4", "P5"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
            Priority::P5 => "P5",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of an alert's three addressable names an identifier refers to.
///
/// | Variant | Wire value | Meaning |
/// |---------|-----------|---------|
/// | `Id` | `id` | Internal alert id (default) |
/// | `Tiny` | `tiny` | Short numeric tiny id |
/// | `Name` | `name` | User-defined alias |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    #[default]
    Id,
    Name,
    Tiny,
}

impl IdentifierType {
    pub const ALL: [&'static str; 3] = ["id", "name", "tiny"];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::Id => "id",
            IdentifierType::Name => "name",
            IdentifierType::Tiny => "tiny",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IdentifierType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(IdentifierType::Id),
            "name" => Ok(IdentifierType::Name),
            "tiny" => Ok(IdentifierType::Tiny),
            other => Err(format!("unknown identifier type '{}'", other)),
        }
    }
}

/// Identifier type of a saved search (list alerts only accepts id or name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchIdentifierType {
    Id,
    Name,
}

impl SearchIdentifierType {
    pub const ALL: [&'static str; 2] = ["id", "name"];
}

/// Sorting order of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [&'static str; 2] = ["asc", "desc"];
}

/// Paging direction for note and log listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    Next,
    Prev,
}

impl PageDirection {
    pub const ALL: [&'static str; 2] = ["next", "prev"];
}

/// Kind of entity an alert is routed to or made visible to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    User,
    Team,
    Escalation,
    Schedule,
}

impl RecipientType {
    pub const ALL: [&'static str; 4] = ["user", "team", "escalation", "schedule"];
}
