//! Lesson catalog and learner progress for the Hello iOS course.

pub mod catalog;
pub mod config;
pub mod error;
pub mod preferences;
pub mod quiz;

pub use catalog::{Catalog, SkillLevel, Topic, TopicCategory, TopicId};
pub use config::Config;
pub use error::{Error, Result};
pub use preferences::{Preferences, ProgressReport};
pub use quiz::{PracticeSession, Quiz, QuizOutcome};
