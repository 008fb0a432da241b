use chrono::{DateTime, SubsecRound, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stored timestamps keep microsecond precision so values survive a
/// round trip through the database unchanged.
const TIMESTAMP_PRECISION: u16 = 6;

/// Ordered mapping from file path to file contents.
pub type FileMap = IndexMap<String, FileEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
    pub code: String,
}

impl FileEntry {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub files: FileMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Refreshes `updated_at`, guaranteeing it moves forward even when two
    /// mutations land within the same clock tick.
    pub fn touch(&mut self) {
        let now = timestamp_now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }
}

/// Current time truncated to the precision the store persists.
#[must_use]
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(TIMESTAMP_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        let now = timestamp_now();
        let mut files = FileMap::new();
        files.insert("/App.js".to_string(), FileEntry::new("export default 1"));
        Project {
            id: "p1".to_string(),
            name: "Demo".to_string(),
            files,
            owner_id: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_project_json_uses_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("isPublic").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("ownerId").is_none());
        assert_eq!(value["files"]["/App.js"]["code"], "export default 1");
    }

    #[test]
    fn test_file_entry_rejects_unknown_shape() {
        let result: Result<FileMap, _> =
            serde_json::from_str(r#"{"/a.js": {"code": "x", "extra": 1}}"#);
        assert!(result.is_err());

        let result: Result<FileMap, _> = serde_json::from_str(r#"{"/a.js": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_touch_always_advances() {
        let mut project = sample();
        let before = project.updated_at;
        project.touch();
        project.touch();
        assert!(project.updated_at > before);
    }
}
