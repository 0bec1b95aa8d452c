use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::TrackInfo;

/// Append-only log of favorited tracks, one line per favorite.
///
/// Existing content is never rewritten. Each append is synced to disk before
/// returning so a crash right after a button press cannot lose the write.
pub struct FavoritesLog {
    path: PathBuf,
}

impl FavoritesLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, track: &TrackInfo) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        writeln!(file, "{}", track.favorites_line())
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        file.sync_all()
            .with_context(|| format!("failed to sync {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_append_creates_file_with_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = FavoritesLog::new(dir.path().join("favorites.txt"));

        log.append(&TrackInfo::new("Song A", "Artist A")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "Song A - Artist A\n");
    }

    #[test]
    fn test_append_preserves_prior_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FavoritesLog::new(dir.path().join("favorites.txt"));

        log.append(&TrackInfo::new("First", "One")).unwrap();
        log.append(&TrackInfo::new("Second", "Two")).unwrap();
        log.append(&TrackInfo::new("Third", "Three")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "First - One\nSecond - Two\nThird - Three\n");
    }

    #[test]
    fn test_append_to_existing_file_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.txt");
        fs::write(&path, "pre-existing - line\n").unwrap();

        let log = FavoritesLog::new(&path);
        log.append(&TrackInfo::new("New", "Entry")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "pre-existing - line\nNew - Entry\n");
    }

    #[test]
    fn test_append_fails_on_unwritable_path() {
        let log = FavoritesLog::new("/nonexistent-dir/favorites.txt");
        assert!(log.append(&TrackInfo::new("Song", "Artist")).is_err());
    }
}
