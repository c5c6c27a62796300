//! Points-action vocabulary shared by the climbing and guide ledgers.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// The four ledger mutations.
///
/// A closed enum so adding a fifth action is a compile-time-checked change at
/// every match site, not a stringly-typed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsAction {
    /// Grant points and count an expedition.
    Add,
    /// Mirror of `Add`, floored at zero everywhere.
    Remove,
    /// Correction: overwrite the cumulative total, touch nothing else.
    Set,
    /// Grant points without counting an expedition.
    Bonus,
}

impl PointsAction {
    /// Label used in audit log records and confirmation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Set => "Set",
            Self::Bonus => "Bonus",
        }
    }
}

impl FromStr for PointsAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "set" => Ok(Self::Set),
            "bonus" => Ok(Self::Bonus),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown points action '{}'.",
                other
            ))),
        }
    }
}

/// Expedition difficulty tiers tracked in `difficulty_stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Self::Easy),
            "Medium" => Ok(Self::Medium),
            "Hard" => Ok(Self::Hard),
            "Extreme" => Ok(Self::Extreme),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown difficulty '{}'.",
                other
            ))),
        }
    }
}

/// Optional expedition metadata attached to an `Add`/`Remove` action.
///
/// `Set` and `Bonus` never carry context; the service ignores it for those
/// actions even if supplied.
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    /// Mountain name counted in `expedition_history`.
    pub mountain: Option<String>,
    /// Difficulty tier counted in `difficulty_stats`.
    pub difficulty: Option<Difficulty>,
}

impl ActionContext {
    /// Context with neither mountain nor difficulty.
    pub fn none() -> Self {
        Self::default()
    }
}
