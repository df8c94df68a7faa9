//! Context registry: named conversation channels, most recent first.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A named, described channel shown in the contexts list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub id: String,
    /// Slug form (lowercase, words joined with `-`).
    pub name: String,
    pub description: String,
    pub last_updated: DateTime<Utc>,
}

impl Context {
    fn new(name: String, description: String, last_updated: DateTime<Utc>) -> Self {
        Self {
            id: format!("ctx-{}", uuid::Uuid::new_v4()),
            name,
            description,
            last_updated,
        }
    }
}

/// Built-in contexts: (name, description, hours since last update).
const SEED: [(&str, &str, i64); 5] = [
    ("general", "General discussions and announcements", 2),
    ("work-projects", "Work-related projects and tasks", 24),
    ("personal-goals", "Personal development and goal setting", 48),
    ("learning", "Study materials and learning discussions", 72),
    ("random", "Random thoughts and casual conversations", 96),
];

/// Normalize a display name into a context slug: trim, lowercase, whitespace runs become `-`.
pub fn slugify(display_name: &str) -> String {
    display_name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Ordered list of contexts. New entries go to the front; nothing is edited or removed.
#[derive(Debug, Clone)]
pub struct ContextRegistry {
    contexts: Vec<Context>,
    default_description: String,
}

impl ContextRegistry {
    pub fn empty(default_description: impl Into<String>) -> Self {
        Self {
            contexts: Vec::new(),
            default_description: default_description.into(),
        }
    }

    /// Registry holding the built-in seed contexts, aged relative to `now`.
    pub fn seeded(now: DateTime<Utc>, default_description: impl Into<String>) -> Self {
        let contexts = SEED
            .iter()
            .map(|(name, description, hours)| {
                Context::new(
                    name.to_string(),
                    description.to_string(),
                    now - Duration::hours(*hours),
                )
            })
            .collect();
        Self {
            contexts,
            default_description: default_description.into(),
        }
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Create a context from a display name and prepend it. Blank names are ignored.
    pub fn add_context(&mut self, display_name: &str, description: Option<&str>) -> Option<&Context> {
        self.add_context_at(display_name, description, Utc::now())
    }

    /// Same as [`add_context`](Self::add_context) with an explicit timestamp.
    pub fn add_context_at(
        &mut self,
        display_name: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<&Context> {
        let name = slugify(display_name);
        if name.is_empty() {
            return None;
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_description.clone());
        log::debug!("adding context #{}", name);
        self.contexts.insert(0, Context::new(name, description, now));
        self.contexts.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_normalizes_whitespace_and_case() {
        assert_eq!(slugify("My Project"), "my-project");
        assert_eq!(slugify("  Q4   Planning \t"), "q4-planning");
        assert_eq!(slugify("single"), "single");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn seeded_has_five_most_recent_first() {
        let now = Utc::now();
        let registry = ContextRegistry::seeded(now, "No description");
        assert_eq!(registry.len(), 5);
        let names: Vec<&str> = registry.contexts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["general", "work-projects", "personal-goals", "learning", "random"]
        );
        assert!(registry
            .contexts()
            .windows(2)
            .all(|w| w[0].last_updated > w[1].last_updated));
    }

    #[test]
    fn add_context_prepends_with_placeholder() {
        let mut registry = ContextRegistry::seeded(Utc::now(), "No description");
        let added = registry.add_context("My Project", Some("")).expect("added");
        assert_eq!(added.name, "my-project");
        assert_eq!(added.description, "No description");
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.contexts()[0].name, "my-project");
        assert_eq!(registry.contexts()[1].name, "general");
    }

    #[test]
    fn add_context_keeps_given_description() {
        let mut registry = ContextRegistry::empty("No description");
        registry.add_context("Reading", Some("Books to finish"));
        assert_eq!(registry.contexts()[0].description, "Books to finish");
        registry.add_context("Travel", None);
        assert_eq!(registry.contexts()[0].description, "No description");
        assert_eq!(registry.contexts()[1].name, "reading");
    }

    #[test]
    fn blank_name_is_ignored() {
        let mut registry = ContextRegistry::seeded(Utc::now(), "No description");
        assert!(registry.add_context("", None).is_none());
        assert!(registry.add_context("   ", Some("ignored")).is_none());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn context_serializes_with_camel_case_timestamp() {
        let now = Utc::now();
        let mut registry = ContextRegistry::empty("No description");
        let added = registry.add_context_at("Inbox", None, now).expect("added").clone();
        let json = serde_json::to_value(&added).unwrap();
        assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("inbox"));
        assert!(json.get("lastUpdated").and_then(|v| v.as_str()).is_some());
        let back: Context = serde_json::from_value(json).unwrap();
        assert_eq!(back.last_updated, now);
    }

    #[test]
    fn add_context_at_stamps_given_time() {
        let now = Utc::now();
        let mut registry = ContextRegistry::empty("No description");
        let added = registry.add_context_at("Later", None, now).expect("added");
        assert_eq!(added.last_updated, now);
    }
}
