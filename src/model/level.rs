//! Level policy: threshold tables mapping cumulative points to named tiers.
//!
//! The tables are data, not code - they deserialize from the level file named
//! in configuration, and built-in defaults ship for both the climbing and
//! guide ladders. Everything here is pure; the external rank-sync side effect
//! consumes the selected tier elsewhere.

use serde::{Deserialize, Serialize};

/// One named tier in a ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    /// Display name of the tier.
    pub name: String,
    /// Minimum cumulative points for this tier.
    pub threshold: i64,
    /// External role identifier the tier maps to (Roblox group role for the
    /// climbing ladder).
    pub role_id: u64,
    /// Numeric rank of that role inside the external group.
    pub group_rank: u32,
}

/// Ordered ladder of tiers with ascending thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelTier>", into = "Vec<LevelTier>")]
pub struct LevelTable {
    tiers: Vec<LevelTier>,
}

impl LevelTable {
    /// Builds a table from a list of tiers.
    ///
    /// Tiers are sorted ascending by threshold. The table must be non-empty
    /// and its lowest threshold must be 0 so every non-negative point total
    /// selects a tier.
    ///
    /// # Arguments
    /// - `tiers` - Tier list in any order
    ///
    /// # Returns
    /// - `Ok(LevelTable)` - Validated, sorted table
    /// - `Err(String)` - Reason the table is unusable
    pub fn new(mut tiers: Vec<LevelTier>) -> Result<Self, String> {
        if tiers.is_empty() {
            return Err("level table must contain at least one tier".to_string());
        }

        tiers.sort_by_key(|t| t.threshold);

        if tiers[0].threshold != 0 {
            return Err(format!(
                "lowest tier '{}' must have threshold 0, found {}",
                tiers[0].name, tiers[0].threshold
            ));
        }

        Ok(Self { tiers })
    }

    /// Selects the tier for a cumulative point total.
    ///
    /// The selected tier is the highest threshold less than or equal to
    /// `points`; a total exactly on a boundary resolves to the higher tier.
    pub fn level_for(&self, points: i64) -> &LevelTier {
        self.tiers
            .iter()
            .rev()
            .find(|tier| points >= tier.threshold)
            .unwrap_or(&self.tiers[0])
    }

    /// Whether moving from `old_points` to `new_points` crosses a tier
    /// boundary in either direction.
    ///
    /// Handles demotion as well as promotion; remove actions can demote.
    pub fn has_leveled_up(&self, old_points: i64, new_points: i64) -> bool {
        self.level_for(old_points).name != self.level_for(new_points).name
    }

    /// Inclusive numeric group-rank range covered by this ladder.
    ///
    /// Accounts whose current external group rank lies outside this span hold
    /// a role the ladder does not own (staff, booster, donor) and are skipped
    /// by rank sync.
    pub fn rank_span(&self) -> (u32, u32) {
        let min = self.tiers.iter().map(|t| t.group_rank).min().unwrap_or(0);
        let max = self.tiers.iter().map(|t| t.group_rank).max().unwrap_or(0);
        (min, max)
    }

    /// All tiers, ascending by threshold.
    pub fn tiers(&self) -> &[LevelTier] {
        &self.tiers
    }

    /// Built-in climbing ladder (Lunar Points).
    pub fn default_climbing() -> Self {
        Self::new(vec![
            tier("Climber", 0, 41_238_101, 10),
            tier("Trailblazer", 250, 41_238_102, 30),
            tier("Pathfinder", 750, 41_238_103, 50),
            tier("Mountaineer", 1_500, 41_238_104, 70),
            tier("Summiteer", 3_000, 41_238_105, 90),
            tier("Alpinist", 5_000, 41_238_106, 110),
            tier("Lunar Pioneer", 8_000, 41_238_107, 130),
            tier("Lunatic", 12_000, 41_238_108, 151),
        ])
        .expect("built-in climbing table is valid")
    }

    /// Built-in guide ladder (hosting points).
    pub fn default_guide() -> Self {
        Self::new(vec![
            tier("Trainee Guide", 0, 41_238_201, 15),
            tier("Assistant Guide", 150, 41_238_202, 35),
            tier("Senior Guide", 400, 41_238_203, 55),
            tier("Expedition Leader", 900, 41_238_204, 75),
            tier("Master Guide", 1_600, 41_238_205, 95),
        ])
        .expect("built-in guide table is valid")
    }
}

impl TryFrom<Vec<LevelTier>> for LevelTable {
    type Error = String;

    fn try_from(tiers: Vec<LevelTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<LevelTable> for Vec<LevelTier> {
    fn from(table: LevelTable) -> Self {
        table.tiers
    }
}

fn tier(name: &str, threshold: i64, role_id: u64, group_rank: u32) -> LevelTier {
    LevelTier {
        name: name.to_string(),
        threshold,
        role_id,
        group_rank,
    }
}

/// Both ladders, as loaded from the level file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTables {
    pub climbing: LevelTable,
    pub guide: LevelTable,
}

impl Default for LevelTables {
    fn default() -> Self {
        Self {
            climbing: LevelTable::default_climbing(),
            guide: LevelTable::default_guide(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_highest_threshold_at_or_below() {
        let table = LevelTable::default_climbing();

        assert_eq!(table.level_for(0).name, "Climber");
        assert_eq!(table.level_for(249).name, "Climber");
        // A total exactly on a boundary resolves to the higher tier.
        assert_eq!(table.level_for(250).name, "Trailblazer");
        assert_eq!(table.level_for(999_999).name, "Lunatic");
    }

    #[test]
    fn detects_promotion_and_demotion() {
        let table = LevelTable::default_climbing();

        assert!(table.has_leveled_up(200, 300));
        assert!(table.has_leveled_up(300, 200));
        assert!(!table.has_leveled_up(0, 249));
    }

    #[test]
    fn rejects_table_without_zero_threshold() {
        let result = LevelTable::new(vec![tier("Floating", 100, 1, 1)]);
        assert!(result.is_err());

        let result = LevelTable::new(Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn sorts_tiers_on_construction() {
        let table = LevelTable::new(vec![
            tier("High", 500, 2, 20),
            tier("Low", 0, 1, 10),
        ])
        .unwrap();

        assert_eq!(table.tiers()[0].name, "Low");
        assert_eq!(table.level_for(500).name, "High");
    }

    #[test]
    fn rank_span_covers_ladder() {
        let table = LevelTable::default_climbing();
        assert_eq!(table.rank_span(), (10, 151));
    }

    #[test]
    fn round_trips_through_json() {
        let tables = LevelTables::default();
        let json = serde_json::to_string(&tables).unwrap();
        let back: LevelTables = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tables);
    }

    #[test]
    fn json_with_unsorted_tiers_is_normalized() {
        let json = r#"[
            {"name": "Veteran", "threshold": 100, "role_id": 2, "group_rank": 2},
            {"name": "Rookie", "threshold": 0, "role_id": 1, "group_rank": 1}
        ]"#;
        let table: LevelTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.level_for(50).name, "Rookie");
        assert_eq!(table.level_for(100).name, "Veteran");
    }
}
