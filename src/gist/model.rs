//! GitHub gist payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A gist as returned by the REST API.
///
/// List endpoints omit file contents; `GET /gists/{id}` includes them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Gist {
    pub id: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Keyed by filename, in the order the API sent them.
    #[serde(default)]
    pub files: IndexMap<String, GistFile>,
}

impl Gist {
    /// The filename the gist is sorted and displayed by.
    pub fn first_filename(&self) -> Option<&str> {
        self.files.keys().next().map(String::as_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GistFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub raw_url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// Present on single-gist responses.
    #[serde(default)]
    pub content: Option<String>,
    /// Set when `content` was cut at 1 MB; the full text is at `raw_url`.
    #[serde(default)]
    pub truncated: Option<bool>,
}

/// Body of `POST /gists`.
#[derive(Serialize, Debug)]
pub struct NewGist<'a> {
    pub description: &'a str,
    pub public: bool,
    pub files: BTreeMap<&'a str, FileContent<'a>>,
}

/// Body of `PATCH /gists/{id}`. A `None` entry deletes that file.
#[derive(Serialize, Debug)]
pub struct GistUpdate<'a> {
    pub files: BTreeMap<&'a str, Option<FileContent<'a>>>,
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct FileContent<'a> {
    pub content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_list_entry() {
        let json = r#"{
            "id": "aa5a315d61ae9438b18d",
            "html_url": "https://gist.github.com/aa5a315d61ae9438b18d",
            "description": null,
            "public": true,
            "created_at": "2025-11-06T18:22:03Z",
            "updated_at": "2025-11-07T08:00:00Z",
            "files": {
                "zeta.py": {"filename": "zeta.py", "raw_url": "https://gist/raw/zeta.py", "size": 12},
                "Alpha.md": {"filename": "Alpha.md", "raw_url": "https://gist/raw/Alpha.md", "size": 3}
            },
            "owner": {"login": "octocat"}
        }"#;
        let gist: Gist = serde_json::from_str(json).unwrap();
        assert_eq!(gist.first_filename(), Some("zeta.py"));
        assert_eq!(gist.files.keys().collect::<Vec<_>>(), ["zeta.py", "Alpha.md"]);
        assert_eq!(gist.created_at.to_rfc3339(), "2025-11-06T18:22:03+00:00");
        assert!(gist.files["zeta.py"].content.is_none());
    }

    #[test]
    fn test_update_body_serializes_deletions_as_null() {
        let mut files = BTreeMap::new();
        files.insert("keep.txt", Some(FileContent { content: "hi" }));
        files.insert("drop.txt", None);
        let body = serde_json::to_string(&GistUpdate { files }).unwrap();
        assert_eq!(body, r#"{"files":{"drop.txt":null,"keep.txt":{"content":"hi"}}}"#);
    }
}
