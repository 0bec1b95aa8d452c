use anyhow::{anyhow, Result};
use std::process::Command;
use tracing::debug;

use super::MediaSource;
use crate::models::TrackInfo;

/// Media source backed by `playerctl` (MPRIS).
pub struct PlayerctlSource;

impl PlayerctlSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlayerctlSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSource for PlayerctlSource {
    fn now_playing(&mut self) -> Result<Option<TrackInfo>> {
        // `playerctl status` fails when no player is registered on the bus;
        // that's the "nothing playing" state, not an error.
        if !is_player_available() {
            return Ok(None);
        }

        let title = metadata_property("xesam:title").unwrap_or_default();
        let artist = metadata_property("xesam:artist").unwrap_or_default();

        if title.is_empty() && artist.is_empty() {
            return Ok(None);
        }

        let artwork = match metadata_property("mpris:artUrl") {
            Ok(url) => match fetch_artwork(&url) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    debug!("failed to fetch artwork from {url}: {e}");
                    None
                }
            },
            Err(_) => None,
        };

        Ok(Some(TrackInfo {
            title,
            artist,
            artwork,
        }))
    }
}

pub fn is_playerctl_installed() -> bool {
    Command::new("playerctl")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn is_player_available() -> bool {
    Command::new("playerctl")
        .arg("status")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn metadata_property(property: &str) -> Result<String> {
    let output = Command::new("playerctl")
        .args(["metadata", property])
        .output()?;

    if !output.status.success() {
        return Err(anyhow!("playerctl failed to get {}", property));
    }

    let value = String::from_utf8(output.stdout)?.trim().to_string();

    if value.is_empty() {
        return Err(anyhow!("No {} found", property));
    }

    Ok(value)
}

/// Load artwork bytes from an MPRIS art URL (local file or remote cover).
fn fetch_artwork(url: &str) -> Result<Vec<u8>> {
    if let Some(path) = url.strip_prefix("file://") {
        return Ok(std::fs::read(path)?);
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        let response = reqwest::blocking::get(url)?;
        return Ok(response.bytes()?.to_vec());
    }

    Err(anyhow!("unsupported art url scheme: {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fetch_artwork_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0xff, 0xd8, 0xff, 0xe0]).unwrap();

        let url = format!("file://{}", path.display());
        let bytes = fetch_artwork(&url).unwrap();
        assert_eq!(bytes, vec![0xff, 0xd8, 0xff, 0xe0]);
    }

    #[test]
    fn test_fetch_artwork_missing_file() {
        assert!(fetch_artwork("file:///nonexistent/cover.jpg").is_err());
    }

    #[test]
    fn test_fetch_artwork_unsupported_scheme() {
        assert!(fetch_artwork("ftp://example.com/cover.jpg").is_err());
        assert!(fetch_artwork("cover.jpg").is_err());
    }

    #[test]
    fn test_is_playerctl_installed_does_not_panic() {
        // Result depends on the machine; we only care that probing is safe.
        let _ = is_playerctl_installed();
    }
}
