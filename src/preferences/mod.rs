//! Learner preferences: selected skill level, completed and bookmarked
//! topics, and whether onboarding has been done.
//!
//! Every mutation is written back to the [`Storage`] right away. Reading is
//! forgiving: a missing or malformed entry only resets its own field, and ids
//! that are malformed or absent from the catalog are dropped.

pub mod progress;
pub mod storage;

use std::collections::{BTreeSet, HashSet};

use log::{debug, error, warn};

use crate::catalog::{Catalog, SkillLevel, TopicId};
use crate::error::StorageError;

pub use progress::ProgressReport;
pub use storage::{InMemoryStorage, JsonFileStorage, Storage};

pub const COMPLETED_TOPICS_KEY: &str = "completedTopics";
pub const BOOKMARKED_TOPICS_KEY: &str = "bookmarkedTopics";
pub const SKILL_LEVEL_KEY: &str = "skillLevel";
pub const ONBOARDING_KEY: &str = "hasCompletedOnboarding";

pub struct Preferences {
    storage: Box<dyn Storage>,
    known_topics: HashSet<TopicId>,
    skill_level: SkillLevel,
    completed_topics: BTreeSet<TopicId>,
    bookmarked_topics: BTreeSet<TopicId>,
    has_completed_onboarding: bool,
}

impl Preferences {
    /// Reads preferences from `storage`, keeping only ids present in `catalog`.
    pub fn load(storage: Box<dyn Storage>, catalog: &Catalog) -> Self {
        let mut preferences = Self {
            storage,
            known_topics: catalog.topic_ids().cloned().collect(),
            skill_level: SkillLevel::default(),
            completed_topics: BTreeSet::new(),
            bookmarked_topics: BTreeSet::new(),
            has_completed_onboarding: false,
        };
        preferences.load_progress();
        preferences
    }

    pub fn skill_level(&self) -> SkillLevel {
        self.skill_level
    }

    pub fn completed_topics(&self) -> &BTreeSet<TopicId> {
        &self.completed_topics
    }

    pub fn bookmarked_topics(&self) -> &BTreeSet<TopicId> {
        &self.bookmarked_topics
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.has_completed_onboarding
    }

    pub fn is_completed(&self, topic_id: &str) -> bool {
        self.resolve(topic_id)
            .map_or(false, |id| self.completed_topics.contains(&id))
    }

    pub fn is_bookmarked(&self, topic_id: &str) -> bool {
        self.resolve(topic_id)
            .map_or(false, |id| self.bookmarked_topics.contains(&id))
    }

    /// Returns whether the topic is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, topic_id: &str) -> bool {
        let Some(id) = self.resolve(topic_id) else {
            return false;
        };
        let bookmarked = if self.bookmarked_topics.remove(&id) {
            false
        } else {
            self.bookmarked_topics.insert(id);
            true
        };
        self.persist();
        bookmarked
    }

    pub fn mark_completed(&mut self, topic_id: &str) {
        let Some(id) = self.resolve(topic_id) else {
            return;
        };
        self.completed_topics.insert(id);
        self.persist();
    }

    pub fn set_skill_level(&mut self, level: SkillLevel) {
        self.skill_level = level;
        self.persist();
    }

    /// Records the level picked on first launch and marks onboarding done.
    pub fn complete_onboarding(&mut self, level: SkillLevel) {
        self.skill_level = level;
        self.has_completed_onboarding = true;
        self.persist();
    }

    /// Writes every field in one batch.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let entries = [
            (COMPLETED_TOPICS_KEY, encode_ids(&self.completed_topics)?),
            (BOOKMARKED_TOPICS_KEY, encode_ids(&self.bookmarked_topics)?),
            (SKILL_LEVEL_KEY, self.skill_level.raw_value().to_string()),
            (ONBOARDING_KEY, self.has_completed_onboarding.to_string()),
        ];
        self.storage.set_all(&entries)
    }

    pub fn into_storage(self) -> Box<dyn Storage> {
        self.storage
    }

    fn persist(&mut self) {
        if let Err(err) = self.save() {
            error!("Failed to save preferences: {}", err);
        }
    }

    fn resolve(&self, raw: &str) -> Option<TopicId> {
        TopicId::parse(raw).filter(|id| self.known_topics.contains(id))
    }

    fn load_progress(&mut self) {
        if let Some(ids) = self.read_ids(COMPLETED_TOPICS_KEY) {
            self.completed_topics = ids;
        }
        if let Some(ids) = self.read_ids(BOOKMARKED_TOPICS_KEY) {
            self.bookmarked_topics = ids;
        }
        if let Some(raw) = self.read(SKILL_LEVEL_KEY) {
            match SkillLevel::from_raw_value(&raw) {
                Some(level) => self.skill_level = level,
                None => warn!("Ignoring unknown skill level {:?}", raw),
            }
        }
        if let Some(raw) = self.read(ONBOARDING_KEY) {
            match raw.parse::<bool>() {
                Ok(done) => self.has_completed_onboarding = done,
                Err(_) => warn!("Ignoring malformed onboarding flag {:?}", raw),
            }
        }
        debug!(
            "Loaded preferences: level {}, {} completed, {} bookmarked",
            self.skill_level,
            self.completed_topics.len(),
            self.bookmarked_topics.len()
        );
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("Could not read {}: {}", key, err);
                None
            }
        }
    }

    /// `None` when the entry is absent or not a JSON array of strings.
    fn read_ids(&self, key: &str) -> Option<BTreeSet<TopicId>> {
        let raw = self.read(key)?;
        let values: Vec<String> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!("Ignoring malformed {}: {}", key, err);
                return None;
            }
        };
        let ids = values
            .iter()
            .filter_map(|value| {
                let id = self.resolve(value);
                if id.is_none() {
                    warn!("Dropping unknown topic id {:?} from {}", value, key);
                }
                id
            })
            .collect();
        Some(ids)
    }
}

fn encode_ids(ids: &BTreeSet<TopicId>) -> Result<String, StorageError> {
    let raw: Vec<&str> = ids.iter().map(TopicId::as_str).collect();
    Ok(serde_json::to_string(&raw)?)
}
