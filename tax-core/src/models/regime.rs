use serde::{Deserialize, Serialize};

/// The two statutory computation methods a taxpayer may choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    New,
    Old,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New Tax Regime",
            Self::Old => "Old Tax Regime",
        }
    }
}

/// Outcome of comparing the two regimes' total tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    New,
    Old,
    Equal,
}

impl Recommendation {
    /// The regime to choose, or `None` when both cost the same.
    pub fn regime(&self) -> Option<Regime> {
        match self {
            Self::New => Some(Regime::New),
            Self::Old => Some(Regime::Old),
            Self::Equal => None,
        }
    }
}
