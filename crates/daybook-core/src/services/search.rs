//! Search across tasks, files and links

use serde::{Deserialize, Serialize};

use crate::models::{FileRecord, Link, Task};

/// Which collections a search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    All,
    Tasks,
    Files,
    Links,
}

impl SearchScope {
    fn includes_tasks(&self) -> bool {
        matches!(self, SearchScope::All | SearchScope::Tasks)
    }

    fn includes_files(&self) -> bool {
        matches!(self, SearchScope::All | SearchScope::Files)
    }

    fn includes_links(&self) -> bool {
        matches!(self, SearchScope::All | SearchScope::Links)
    }
}

impl std::str::FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SearchScope::All),
            "tasks" | "task" => Ok(SearchScope::Tasks),
            "files" | "file" => Ok(SearchScope::Files),
            "links" | "link" => Ok(SearchScope::Links),
            _ => Err(format!("Unknown search scope: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResults {
    pub tasks: Vec<Task>,
    pub files: Vec<FileRecord>,
    pub links: Vec<Link>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.tasks.len() + self.files.len() + self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn task_matches(task: &Task, needle: &str) -> bool {
    contains_ci(&task.title, needle) || contains_ci(&task.description, needle)
}

fn link_matches(link: &Link, needle: &str) -> bool {
    link.title.as_deref().is_some_and(|t| contains_ci(t, needle))
        || link.description.as_deref().is_some_and(|d| contains_ci(d, needle))
        || contains_ci(&link.url, needle)
}

/// Case-insensitive substring search.
///
/// Tasks match on title or description, files on name, links on title,
/// description or URL. A blank query matches nothing.
pub fn search(
    query: &str,
    scope: SearchScope,
    tasks: &[Task],
    files: &[FileRecord],
    links: &[Link],
) -> SearchResults {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }

    let mut results = SearchResults::default();
    if scope.includes_tasks() {
        results.tasks = tasks.iter().filter(|t| task_matches(t, &needle)).cloned().collect();
    }
    if scope.includes_files() {
        results.files = files
            .iter()
            .filter(|f| contains_ci(&f.file_name, &needle))
            .cloned()
            .collect();
    }
    if scope.includes_links() {
        results.links = links.iter().filter(|l| link_matches(l, &needle)).cloned().collect();
    }
    log::debug!("Search {:?} in {:?}: {} hits", query, scope, results.total());
    results
}

/// File list filtering by name and MIME type.
///
/// An empty `term` keeps every name. `mime_filter` matches either a full
/// type (`image/png`) or a major type prefix (`image`); `None` or `"all"`
/// keeps every type.
pub fn filter_files<'a>(files: &'a [FileRecord], term: &str, mime_filter: Option<&str>) -> Vec<&'a FileRecord> {
    let needle = term.trim().to_lowercase();
    let mime = mime_filter
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty() && m != "all");

    files
        .iter()
        .filter(|f| needle.is_empty() || contains_ci(&f.file_name, &needle))
        .filter(|f| match &mime {
            None => true,
            Some(m) => {
                let file_type = f.file_type.to_lowercase();
                file_type == *m || file_type.split('/').next() == Some(m.as_str())
            }
        })
        .collect()
}
