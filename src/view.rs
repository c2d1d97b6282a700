//! Derived directory view: filtering and sorting.
//!
//! [`project`] is a pure function of the records, the criteria and the sort
//! settings. It is recomputed from scratch whenever any of them change.
//!
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::{Influencer, Platform, Score, Tier};

/// Inclusive score bounds. `min <= max` always holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScoreRange {
    min: Score,
    max: Score,
}

impl ScoreRange {
    /// Build a range; reversed bounds are swapped.
    pub fn new(a: Score, b: Score) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn min(&self) -> Score {
        self.min
    }

    pub fn max(&self) -> Score {
        self.max
    }

    pub fn contains(&self, score: Score) -> bool {
        self.min <= score && score <= self.max
    }

    /// Move the lower bound, never past the upper one.
    pub fn with_min(self, min: Score) -> Self {
        Self { min: min.min(self.max), max: self.max }
    }

    /// Move the upper bound, never below the lower one.
    pub fn with_max(self, max: Score) -> Self {
        Self { min: self.min, max: max.max(self.min) }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self { min: Score::MIN, max: Score::MAX }
    }
}

/// Filters applied conjunctively. Empty fields pass everything through.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name_query: String,
    pub tiers: BTreeSet<Tier>,
    pub platforms: BTreeSet<Platform>,
    pub score_range: ScoreRange,
}

impl FilterCriteria {
    pub fn toggle_tier(&mut self, tier: Tier) {
        if !self.tiers.remove(&tier) {
            self.tiers.insert(tier);
        }
    }

    pub fn toggle_platform(&mut self, platform: Platform) {
        if !self.platforms.remove(&platform) {
            self.platforms.insert(platform);
        }
    }

    /// True when no filter narrows the collection.
    pub fn is_empty(&self) -> bool {
        self.name_query.is_empty()
            && self.tiers.is_empty()
            && self.platforms.is_empty()
            && self.score_range.is_full()
    }

    /// Check one record against every criterion.
    pub fn matches(&self, record: &Influencer) -> bool {
        self.matches_name(record)
            && (self.tiers.is_empty() || self.tiers.contains(&record.tier))
            && (self.platforms.is_empty() || !self.platforms.is_disjoint(&record.platforms))
            && self.score_range.contains(record.score)
    }

    fn matches_name(&self, record: &Influencer) -> bool {
        if self.name_query.is_empty() {
            return true;
        }
        record
            .name
            .to_lowercase()
            .contains(&self.name_query.to_lowercase())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateAdded,
    Score,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::DateAdded => "Date Added",
            SortKey::Score => "Score",
        }
    }

    pub fn config_name(self) -> &'static str {
        match self {
            SortKey::DateAdded => "date_added",
            SortKey::Score => "score",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date_added" | "dateadded" | "date" => Some(SortKey::DateAdded),
            "score" => Some(SortKey::Score),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "Ascending",
            SortOrder::Desc => "Descending",
        }
    }

    pub fn config_name(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Sort key and direction. Defaults to newest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    fn compare(&self, a: &Influencer, b: &Influencer) -> Ordering {
        let ord = match self.key {
            SortKey::DateAdded => a.date_added.cmp(&b.date_added),
            SortKey::Score => a.score.cmp(&b.score),
        };
        // Reverse the comparator rather than the output so equal keys keep input order.
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Filter then stably sort `records`. Does not touch its inputs.
pub fn project(records: &[Influencer], criteria: &FilterCriteria, sort: &SortSpec) -> Vec<Influencer> {
    let mut out: Vec<Influencer> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();
    // `sort_by` is stable: ties stay in insertion order.
    out.sort_by(|a, b| sort.compare(a, b));
    out
}
