use std::collections::BTreeMap;

use crate::catalog::{Catalog, SkillLevel};
use crate::preferences::Preferences;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelProgress {
    pub completed: usize,
    pub total: usize,
}

/// Completion counts over the catalog, overall and per skill level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub total_topics: usize,
    pub completed_topics: usize,
    pub bookmarked_topics: usize,
    pub by_level: BTreeMap<SkillLevel, LevelProgress>,
}

impl ProgressReport {
    pub fn new(catalog: &Catalog, preferences: &Preferences) -> Self {
        let mut by_level: BTreeMap<SkillLevel, LevelProgress> = SkillLevel::ALL
            .into_iter()
            .map(|level| (level, LevelProgress::default()))
            .collect();
        let mut completed_topics = 0;

        for topic in catalog.topics() {
            let entry = by_level.entry(topic.skill_level).or_default();
            entry.total += 1;
            if preferences.is_completed(topic.id.as_str()) {
                entry.completed += 1;
                completed_topics += 1;
            }
        }

        Self {
            total_topics: catalog.len(),
            completed_topics,
            bookmarked_topics: preferences.bookmarked_topics().len(),
            by_level,
        }
    }

    /// Whole-number percentage, 0 for an empty catalog.
    pub fn percent_complete(&self) -> usize {
        if self.total_topics == 0 {
            return 0;
        }
        self.completed_topics * 100 / self.total_topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{InMemoryStorage, Storage};

    #[test]
    fn counts_completed_topics_per_level() {
        let catalog = Catalog::builtin().unwrap();
        let mut preferences = Preferences::load(InMemoryStorage::new().erase(), &catalog);
        preferences.mark_completed("swift-basics");
        preferences.mark_completed("combine-framework");
        preferences.mark_completed("swift-concurrency");
        preferences.toggle_bookmark("app-architecture");

        let report = ProgressReport::new(&catalog, &preferences);
        assert_eq!(report.total_topics, 11);
        assert_eq!(report.completed_topics, 3);
        assert_eq!(report.bookmarked_topics, 1);
        assert_eq!(report.percent_complete(), 27);
        assert_eq!(
            report.by_level[&SkillLevel::Beginner],
            LevelProgress { completed: 1, total: 2 }
        );
        assert_eq!(
            report.by_level[&SkillLevel::Intermediate],
            LevelProgress { completed: 0, total: 4 }
        );
        assert_eq!(
            report.by_level[&SkillLevel::Advanced],
            LevelProgress { completed: 2, total: 5 }
        );
    }
}
