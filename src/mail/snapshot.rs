use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};

use super::types::Entry;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct SnapshotFile {
    version: u32,
    entries: Vec<Entry>,
}

/// Default snapshot location under the user cache dir
pub fn snapshot_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("mailadmin/entries.bin"))
}

/// Load the last saved entry list. Missing, unreadable or outdated
/// snapshots all come back empty.
pub fn load_snapshot(path: &Path) -> Vec<Entry> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return Vec::new(),
    };

    let reader = BufReader::new(file);
    let snapshot: SnapshotFile = match bincode::deserialize_from(reader) {
        Ok(s) => s,
        Err(e) => {
            warn!("discarding unreadable snapshot {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    if snapshot.version != SNAPSHOT_VERSION {
        debug!(
            found = snapshot.version,
            expected = SNAPSHOT_VERSION,
            "snapshot version mismatch"
        );
        return Vec::new();
    }

    snapshot.entries
}

/// Save the entry list (binary format)
pub fn save_snapshot(path: &Path, entries: &[Entry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let snapshot = SnapshotFile {
        version: SNAPSHOT_VERSION,
        entries: entries.to_vec(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, &snapshot)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/entries.bin");
        let entries = vec![
            Entry::new().with_field("recipiant", "a@example.com"),
            Entry::new().with_field("status_code", "250"),
        ];

        save_snapshot(&path, &entries).unwrap();
        assert_eq!(load_snapshot(&path), entries);
    }

    #[test]
    fn missing_or_corrupt_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.bin");
        assert!(load_snapshot(&path).is_empty());

        std::fs::write(&path, b"definitely not bincode").unwrap();
        assert!(load_snapshot(&path).is_empty());
    }

    #[test]
    fn outdated_version_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.bin");
        let old = SnapshotFile {
            version: SNAPSHOT_VERSION + 1,
            entries: vec![Entry::new().with_field("a", "b")],
        };
        bincode::serialize_into(File::create(&path).unwrap(), &old).unwrap();
        assert!(load_snapshot(&path).is_empty());
    }
}
