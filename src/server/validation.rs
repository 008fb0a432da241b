use crate::server::response::ApiError;
use crate::types::FileMap;

const MAX_PROJECT_NAME_LEN: usize = 200;
const MAX_FILE_PATH_LEN: usize = 1024;

pub fn validate_project_name(name: &str) -> Result<(), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Project name cannot be empty"));
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Project name cannot exceed {MAX_PROJECT_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_files(files: &FileMap) -> Result<(), ApiError> {
    for path in files.keys() {
        if path.trim().is_empty() {
            return Err(ApiError::bad_request("File path cannot be empty"));
        }
        if path.chars().count() > MAX_FILE_PATH_LEN {
            return Err(ApiError::bad_request(format!(
                "File path cannot exceed {MAX_FILE_PATH_LEN} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileEntry;

    #[test]
    fn test_project_name_rules() {
        assert!(validate_project_name("My Project").is_ok());
        assert!(validate_project_name("   ").is_err());
        assert!(validate_project_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_file_path_rules() {
        let mut files = FileMap::new();
        files.insert("/App.js".to_string(), FileEntry::new(""));
        assert!(validate_files(&files).is_ok());

        files.insert(" ".to_string(), FileEntry::new(""));
        assert!(validate_files(&files).is_err());
    }

    #[test]
    fn test_file_path_limit_counts_characters() {
        // 1023 two-byte characters: over the limit in bytes, under it in characters.
        let mut files = FileMap::new();
        files.insert(format!("/{}", "é".repeat(1023)), FileEntry::new(""));
        assert!(validate_files(&files).is_ok());

        let mut files = FileMap::new();
        files.insert(format!("/{}", "é".repeat(1024)), FileEntry::new(""));
        assert!(validate_files(&files).is_err());
    }
}
