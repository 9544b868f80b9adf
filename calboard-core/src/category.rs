//! Event categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// The fixed set of categories an event can belong to.
///
/// The category carries no behavior on the server; clients use it to pick a
/// display color. `Unknown` stands for any name outside the six: clients may
/// hold such records, but they never pass validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Exercise,
    Eating,
    Work,
    Relax,
    Family,
    Social,
    #[serde(other)]
    Unknown,
}

impl Category {
    /// All valid categories in display order. The first one is the form default.
    pub const ALL: [Category; 6] = [
        Category::Exercise,
        Category::Eating,
        Category::Work,
        Category::Relax,
        Category::Family,
        Category::Social,
    ];

    /// Wire name (lower-case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Exercise => "exercise",
            Category::Eating => "eating",
            Category::Work => "work",
            Category::Relax => "relax",
            Category::Family => "family",
            Category::Social => "social",
            Category::Unknown => "unknown",
        }
    }

    /// Human-readable label used in forms.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Exercise => "Exercise",
            Category::Eating => "Eating",
            Category::Work => "Work",
            Category::Relax => "Relax",
            Category::Family => "Family",
            Category::Social => "Social",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
                EventError::validation(format!(
                    "`{}` is not a valid category (expected one of: {})",
                    s,
                    allowed.join(", ")
                ))
            })
    }
}
