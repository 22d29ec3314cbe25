//! The lesson catalog: topics, lessons, code samples and quizzes.
//!
//! The catalog is loaded once at startup, either from the JSON asset embedded
//! in the binary or from an external file with the same layout, and is never
//! mutated afterwards.

pub mod filter;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::error::CatalogError;
use crate::quiz::Quiz;

pub use filter::filter;

const BUILTIN_CATALOG: &str = include_str!("../../data/topics.json");
const MAX_TOPIC_ID_LEN: usize = 64;

/// Stable identifier of a topic, e.g. `swiftui-basics`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct TopicId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a valid topic id")]
pub struct InvalidTopicId(pub String);

impl TopicId {
    /// Returns `None` for anything that is not a lowercase ascii slug.
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = !raw.is_empty()
            && raw.len() <= MAX_TOPIC_ID_LEN
            && !raw.starts_with('-')
            && !raw.ends_with('-')
            && raw
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        well_formed.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TopicId {
    type Error = InvalidTopicId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(InvalidTopicId(value))
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown skill level `{0}` (expected beginner, intermediate or advanced)")]
pub struct ParseSkillLevelError(pub String);

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
    ];

    /// The value written to preference storage.
    pub fn raw_value(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        }
    }

    /// Strict inverse of [`SkillLevel::raw_value`].
    pub fn from_raw_value(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.raw_value() == raw)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "leaf.fill",
            SkillLevel::Intermediate => "bolt.fill",
            SkillLevel::Advanced => "star.fill",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = ParseSkillLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.raw_value().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseSkillLevelError(s.to_string()))
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum TopicCategory {
    #[serde(rename = "UI")]
    Ui,
    Data,
    Advanced,
}

impl fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TopicCategory::Ui => "UI",
            TopicCategory::Data => "Data",
            TopicCategory::Advanced => "Advanced",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodeSample {
    pub id: String,
    pub title: String,
    pub code: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub code_samples: Vec<CodeSample>,
    #[serde(default)]
    pub tips: Vec<String>,
    pub quiz: Quiz,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: TopicCategory,
    pub skill_level: SkillLevel,
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub external_links: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    topics: Vec<Topic>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_reader(BUILTIN_CATALOG.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading catalog from {}", path.display());
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_topics(document.topics)
    }

    /// Builds a catalog after checking ids are unique and every quiz is answerable.
    pub fn from_topics(topics: Vec<Topic>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for topic in &topics {
            if !seen.insert(&topic.id) {
                return Err(CatalogError::DuplicateTopic {
                    id: topic.id.to_string(),
                });
            }
            if topic.lessons.is_empty() {
                return Err(CatalogError::EmptyTopic {
                    topic: topic.id.to_string(),
                });
            }
            for lesson in &topic.lessons {
                let quiz = &lesson.quiz;
                if quiz.options.len() < 2 {
                    return Err(CatalogError::TooFewOptions {
                        topic: topic.id.to_string(),
                        quiz: quiz.id.clone(),
                        found: quiz.options.len(),
                    });
                }
                if quiz.correct_answer_index >= quiz.options.len() {
                    return Err(CatalogError::AnswerOutOfRange {
                        topic: topic.id.to_string(),
                        quiz: quiz.id.clone(),
                        index: quiz.correct_answer_index,
                        options: quiz.options.len(),
                    });
                }
            }
        }
        debug!("Catalog loaded with {} topics", topics.len());
        Ok(Self { topics })
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id.as_str() == id)
    }

    pub fn lesson(&self, topic_id: &str, index: usize) -> Option<&Lesson> {
        self.topic(topic_id)?.lessons.get(index)
    }

    pub fn topic_ids(&self) -> impl Iterator<Item = &TopicId> {
        self.topics.iter().map(|topic| &topic.id)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
