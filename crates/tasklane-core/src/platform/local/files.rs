//! JSON file helpers for the local platform.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads a JSON file, returning the default value when it does not exist.
pub fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Writes a JSON file atomically (temp file in the same directory + rename)
/// with owner-only permissions.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let contents = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to restrict {}", tmp.path().display()))?;
    }

    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Removes a file if present.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// Appends one JSON value as a line.
pub fn append_json_line<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let line = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize entry for {}", path.display()))?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{line}").with_context(|| format!("Failed to append to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_round_trip_and_missing_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("data.json");

        let missing: BTreeMap<String, u32> = read_json_or_default(&path).unwrap();
        assert!(missing.is_empty());

        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1u32);
        write_json_atomic(&path, &value).unwrap();

        let loaded: BTreeMap<String, u32> = read_json_or_default(&path).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_append_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("outbox.jsonl");
        append_json_line(&path, &serde_json::json!({"n": 1})).unwrap();
        append_json_line(&path, &serde_json::json!({"n": 2})).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
