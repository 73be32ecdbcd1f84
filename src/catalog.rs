//! Document catalog: feed loading, search, and filtering
//!
//! The catalog is a small in-memory list fed from a JSON file. A missing
//! or malformed feed is not fatal: the built-in sample set takes its
//! place so the shelf still renders offline.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// How long search input must be quiet before a query is applied
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// One catalog record from the feed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub title: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pages: u32,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Errors loading the catalog feed
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read feed {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed feed {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Shelf presentation of the catalog grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatalogView {
    #[default]
    Grid,
    List,
}

impl CatalogView {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

/// Search/filter state for the listing page
#[derive(Clone, Debug, Default)]
pub struct CatalogFilter {
    /// Free-text query, matched case-insensitively
    pub query: String,
    /// Exact category, empty selects all
    pub category: String,
    pub view: CatalogView,
}

/// The document catalog
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load the feed file
    pub fn from_feed(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        let entries =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: display.clone(),
                source,
            })?;
        info!("loaded catalog feed from {display}");
        Ok(Self::new(entries))
    }

    /// Load the feed, falling back to the built-in sample set when it is
    /// missing or malformed.
    #[must_use]
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::from_feed(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!("{err}; using built-in sample catalog");
                Self::new(Self::builtin_samples())
            }
        }
    }

    /// The fixed sample records used when no feed is available
    #[must_use]
    pub fn builtin_samples() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry {
                id: 1,
                title: "DR (CDR) N K Natrajan SSB INTERVIEW COMPLETE GUIDE".to_string(),
                filename: "DR_CDR)_N_K_Natrajan_SSB_INTERVIEW_COMPLETE_GUIDE.pdf".to_string(),
                thumbnail: Some(
                    "DR_CDR)_N_K_Natrajan_SSB_INTERVIEW_COMPLETE_GUIDE.jpg".to_string(),
                ),
                description: Some(
                    "A comprehensive technical manual demonstrating dual-page reading experience"
                        .to_string(),
                ),
                pages: 238,
                category: "Technical".to_string(),
                author: Some("DR (CDR) N K Natrajan".to_string()),
            },
            CatalogEntry {
                id: 2,
                title: "Programming Guide".to_string(),
                filename: "sample2.pdf".to_string(),
                thumbnail: Some("default.jpg".to_string()),
                description: Some(
                    "Complete programming reference with code examples".to_string(),
                ),
                pages: 85,
                category: "Programming".to_string(),
                author: Some("Programming Expert".to_string()),
            },
            CatalogEntry {
                id: 3,
                title: "Design Principles".to_string(),
                filename: "sample3.pdf".to_string(),
                thumbnail: Some("default.jpg".to_string()),
                description: Some(
                    "Modern design principles and best practices".to_string(),
                ),
                pages: 64,
                category: "Design".to_string(),
                author: Some("Design Guru".to_string()),
            },
        ]
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unique categories in first-seen order, for the filter control
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(entry.category.as_str());
            }
        }
        seen
    }

    /// Apply the search query and category filter. An empty result is an
    /// empty-state for the caller to present, never an error.
    #[must_use]
    pub fn filtered(&self, filter: &CatalogFilter) -> Vec<&CatalogEntry> {
        let query = filter.query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| query.is_empty() || entry_matches(entry, &query))
            .filter(|entry| filter.category.is_empty() || entry.category == filter.category)
            .collect()
    }

    /// Shelf heading: total count, or filtered-of-total when a filter is
    /// active
    #[must_use]
    pub fn shelf_title(&self, visible: usize) -> String {
        let total = self.entries.len();
        if visible == total {
            format!("Your Shelf ({total})")
        } else {
            format!("Your Shelf ({visible} of {total})")
        }
    }

    #[must_use]
    pub fn entry_by_filename(&self, filename: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.filename == filename)
    }

    /// Title for a document being opened: the feed title when the
    /// filename is known, otherwise the filename cleaned up for display.
    #[must_use]
    pub fn display_title(&self, filename: &str) -> String {
        self.entry_by_filename(filename)
            .map_or_else(|| fallback_title(filename), |e| e.title.clone())
    }
}

/// Case-insensitive substring match over title, description, author, and
/// category. The query must already be lowercased.
fn entry_matches(entry: &CatalogEntry, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);
    contains(&entry.title)
        || entry.description.as_deref().is_some_and(contains)
        || entry.author.as_deref().is_some_and(contains)
        || contains(&entry.category)
}

/// Strip the extension and underscores from a filename for display
#[must_use]
pub fn fallback_title(filename: &str) -> String {
    filename
        .strip_suffix(".pdf")
        .unwrap_or(filename)
        .replace('_', " ")
}

/// Trailing-edge debouncer for search input. The caller reports input
/// events and polls for readiness; the pending query fires once the
/// configured quiet period has passed.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an input event at `now`, pushing the deadline out
    pub fn input(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per burst, when the quiet period has elapsed
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
