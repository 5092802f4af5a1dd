//! Input validation with partial-skip semantics.
//!
//! Individual bad entries never abort the batch; they are dropped with a
//! warning and reported back so the caller can surface them per item.

use std::path::{Path, PathBuf};
use tracing::warn;

/// Filter a requested work list down to existing, regular, readable files.
///
/// # Arguments
/// * `items` - Requested source paths
///
/// # Returns
/// `(valid, dropped)` partitions of the input, both in request order.
pub fn validate(items: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut valid = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();

    for path in items {
        if is_valid_source(path) {
            valid.push(path.clone());
        } else {
            warn!(path = %path.display(), "Dropping input: not an existing regular file");
            dropped.push(path.clone());
        }
    }

    (valid, dropped)
}

fn is_valid_source(path: &Path) -> bool {
    std::fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_validate_keeps_regular_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        File::create(&a).unwrap();
        File::create(&b).unwrap();

        let (valid, dropped) = validate(&[a.clone(), b.clone()]);
        assert_eq!(valid, vec![a, b]);
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_validate_drops_missing_and_directories() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("present.png");
        File::create(&file).unwrap();
        let missing = dir.path().join("missing.png");
        let subdir = dir.path().join("sub");
        std::fs::create_dir(&subdir).unwrap();

        let (valid, dropped) = validate(&[file.clone(), missing.clone(), subdir.clone()]);
        assert_eq!(valid, vec![file]);
        assert_eq!(dropped, vec![missing, subdir]);
    }

    #[test]
    fn test_validate_empty_input() {
        let (valid, dropped) = validate(&[]);
        assert!(valid.is_empty());
        assert!(dropped.is_empty());
    }
}
