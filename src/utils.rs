use crate::CopyError;
use std::path::Path;
use tokio::fs as async_fs;
use tracing::{trace, warn};

pub fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    match normalized.strip_prefix("./") {
        Some(stripped) if !stripped.is_empty() => stripped.to_owned(),
        _ => normalized,
    }
}

/// Expands each pattern into file paths. Directories are walked recursively;
/// anything else is treated as a glob. A literal path that does not exist is
/// kept as-is so it can be reported as not loaded.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<String>, CopyError> {
    let mut files = Vec::new();
    for pattern in patterns {
        let normalized_pattern = normalize_path(pattern);
        let path = Path::new(&normalized_pattern);

        if path.is_dir() {
            let mut entries: Vec<_> = walkdir::WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| normalize_path(&e.path().to_string_lossy()))
                .collect();
            trace!("Directory {} expanded to {} files", pattern, entries.len());
            files.append(&mut entries);
        } else if !is_glob(&normalized_pattern) {
            files.push(normalized_pattern);
        } else {
            for entry in glob::glob(&normalized_pattern)? {
                match entry {
                    Ok(path) if path.is_file() => {
                        files.push(normalize_path(&path.to_string_lossy()))
                    }
                    Err(e) => warn!("Error processing pattern {}: {:?}", pattern, e),
                    _ => {}
                }
            }
        }
    }
    Ok(files)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(&['*', '?', '['][..])
}

pub async fn read_file_content(file_path: &str) -> Result<String, CopyError> {
    async_fs::read_to_string(file_path)
        .await
        .map_err(CopyError::from)
}
