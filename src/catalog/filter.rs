use super::{SkillLevel, Topic};

/// Topics whose title or description contains `query` (ignoring case) and
/// whose level equals `skill_level` when one is given. Catalog order is kept.
pub fn filter<'a>(topics: &'a [Topic], query: &str, skill_level: Option<SkillLevel>) -> Vec<&'a Topic> {
    let query = query.to_lowercase();
    topics
        .iter()
        .filter(|topic| matches_query(topic, &query))
        .filter(|topic| skill_level.map_or(true, |level| topic.skill_level == level))
        .collect()
}

fn matches_query(topic: &Topic, lowered_query: &str) -> bool {
    lowered_query.is_empty()
        || topic.title.to_lowercase().contains(lowered_query)
        || topic.description.to_lowercase().contains(lowered_query)
}
