//! In-memory directory store.
//!
//! [`DirectoryStore`] owns the canonical records for one session and exposes
//! add/update/remove plus the derived [`view`](DirectoryStore::view). Records
//! are kept in insertion order, which is the input order the stable view sort
//! preserves for equal keys.
//!
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Influencer, InfluencerId, NewInfluencer};
use crate::view::{self, FilterCriteria, SortSpec};

/// Consecutive id collisions tolerated before `add` gives up.
pub const MAX_ID_ATTEMPTS: usize = 64;

/// Source of candidate record ids. Candidates may collide; the store checks.
pub trait IdGenerator {
    fn next_id(&mut self) -> InfluencerId;
}

/// Source of creation timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Random 8-hex-digit ids taken from a v4 UUID.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> InfluencerId {
        let simple = Uuid::new_v4().simple().to_string();
        InfluencerId::new(&simple[..8])
    }
}

/// Monotonic ids `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 1 }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> InfluencerId {
        let id = InfluencerId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct DirectoryStore {
    records: Vec<Influencer>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl DirectoryStore {
    /// Empty store with random ids and the system clock.
    pub fn new() -> Self {
        Self::with_parts(Box::new(RandomIds), Box::new(SystemClock))
    }

    pub fn with_parts(ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        Self { records: Vec::new(), ids, clock }
    }

    /// Store pre-populated with existing records (e.g. the sample set).
    pub fn from_records(records: Vec<Influencer>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.extend(records)?;
        Ok(store)
    }

    /// Append existing records verbatim, rejecting ids already present.
    pub fn extend(&mut self, records: Vec<Influencer>) -> Result<(), StoreError> {
        for record in records {
            if self.contains(&record.id) {
                return Err(StoreError::DuplicateId(record.id));
            }
            self.records.push(record);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Influencer] {
        &self.records
    }

    pub fn contains(&self, id: &InfluencerId) -> bool {
        self.records.iter().any(|r| &r.id == id)
    }

    pub fn get(&self, id: &InfluencerId) -> Option<&Influencer> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Create a record with a fresh id and the current time.
    pub fn add(&mut self, input: NewInfluencer) -> Result<Influencer, StoreError> {
        let id = self.fresh_id()?;
        let record = input.into_record(id, self.clock.now());
        info!(id = %record.id, name = %record.name, "influencer added");
        self.records.push(record.clone());
        Ok(record)
    }

    /// Replace the stored record with the same id, keeping its position.
    ///
    /// `date_added` is taken from `record` as-is; callers carry it over.
    pub fn update(&mut self, record: Influencer) -> Result<Influencer, StoreError> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))?;
        *slot = record.clone();
        info!(id = %record.id, name = %record.name, "influencer updated");
        Ok(record)
    }

    /// Remove a record and hand it back.
    pub fn remove(&mut self, id: &InfluencerId) -> Result<Influencer, StoreError> {
        let idx = self
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let removed = self.records.remove(idx);
        info!(id = %removed.id, name = %removed.name, "influencer removed");
        Ok(removed)
    }

    /// Filtered, sorted projection. Recomputed on every call.
    pub fn view(&self, criteria: &FilterCriteria, sort: &SortSpec) -> Vec<Influencer> {
        view::project(&self.records, criteria, sort)
    }

    fn fresh_id(&mut self) -> Result<InfluencerId, StoreError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !self.contains(&candidate) {
                return Ok(candidate);
            }
            debug!(id = %candidate, attempt, "id collision, regenerating");
        }
        Err(StoreError::IdSpaceExhausted { attempts: MAX_ID_ATTEMPTS })
    }
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryStore")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Platform, Score, Tier, DEFAULT_PICTURE};
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::collections::VecDeque;

    struct ScriptedIds(VecDeque<&'static str>);

    impl IdGenerator for ScriptedIds {
        fn next_id(&mut self) -> InfluencerId {
            InfluencerId::new(self.0.pop_front().unwrap_or("exhausted"))
        }
    }

    /// Advances one minute per call.
    struct StepClock(Cell<i64>);

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let n = self.0.get();
            self.0.set(n + 1);
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(n)
        }
    }

    fn input(name: &str, score: i64) -> NewInfluencer {
        NewInfluencer {
            name: name.to_string(),
            profile_picture: DEFAULT_PICTURE.to_string(),
            tier: Tier::Silver,
            platforms: [Platform::YouTube].into_iter().collect(),
            score: Score::clamped(score),
        }
    }

    #[test]
    fn add_retries_on_collision() {
        let ids = ScriptedIds(VecDeque::from(["a", "a", "a", "b"]));
        let mut store = DirectoryStore::with_parts(Box::new(ids), Box::new(StepClock(Cell::new(0))));
        let first = store.add(input("One", 1)).unwrap();
        let second = store.add(input("Two", 2)).unwrap();
        assert_eq!(first.id.as_str(), "a");
        assert_eq!(second.id.as_str(), "b");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&first.id).unwrap().name, "One");
    }

    #[test]
    fn add_gives_up_on_a_stuck_generator() {
        struct Stuck;
        impl IdGenerator for Stuck {
            fn next_id(&mut self) -> InfluencerId {
                InfluencerId::new("same")
            }
        }
        let mut store = DirectoryStore::with_parts(Box::new(Stuck), Box::new(SystemClock));
        store.add(input("One", 1)).unwrap();
        let err = store.add(input("Two", 2)).unwrap_err();
        assert_eq!(err, StoreError::IdSpaceExhausted { attempts: MAX_ID_ATTEMPTS });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_stamps_creation_time() {
        let mut store = DirectoryStore::with_parts(
            Box::new(SequentialIds::new("t")),
            Box::new(StepClock(Cell::new(0))),
        );
        let a = store.add(input("A", 1)).unwrap();
        let b = store.add(input("B", 1)).unwrap();
        assert!(a.date_added < b.date_added);
        assert_eq!(a.id.as_str(), "t-1");
    }

    #[test]
    fn update_keeps_position_and_reports_missing() {
        let mut store = DirectoryStore::with_parts(Box::new(SequentialIds::new("t")), Box::new(SystemClock));
        let a = store.add(input("A", 1)).unwrap();
        store.add(input("B", 1)).unwrap();
        let mut edited = a.clone();
        edited.name = "A2".into();
        store.update(edited).unwrap();
        assert_eq!(store.records()[0].name, "A2");
        assert_eq!(store.records()[0].date_added, a.date_added);

        let mut ghost = a;
        ghost.id = InfluencerId::new("ghost");
        assert_eq!(
            store.update(ghost).unwrap_err(),
            StoreError::NotFound(InfluencerId::new("ghost"))
        );
    }

    #[test]
    fn remove_twice_is_not_found() {
        let mut store = DirectoryStore::new();
        let a = store.add(input("A", 1)).unwrap();
        assert_eq!(store.remove(&a.id).unwrap().name, "A");
        assert_eq!(store.remove(&a.id).unwrap_err(), StoreError::NotFound(a.id.clone()));
        assert!(store.is_empty());
    }

    #[test]
    fn extend_rejects_duplicates() {
        let mut store = DirectoryStore::new();
        let a = store.add(input("A", 1)).unwrap();
        let err = store.extend(vec![a.clone()]).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(a.id));
    }
}
