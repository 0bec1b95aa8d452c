use anyhow::Result;

use crate::models::TrackInfo;

#[cfg(not(target_os = "windows"))]
pub mod mpris;
#[cfg(target_os = "windows")]
pub mod windows;

/// The OS media-session provider.
///
/// `Ok(None)` means no media session is active ("nothing playing"), which is
/// a normal state, not an error. `Err` means the provider itself misbehaved
/// and the caller should skip the cycle and try again on the next poll.
pub trait MediaSource {
    fn now_playing(&mut self) -> Result<Option<TrackInfo>>;
}

/// Build the media source for the current platform.
#[cfg(target_os = "windows")]
pub fn system_source() -> Result<Box<dyn MediaSource>> {
    Ok(Box::new(windows::SystemMediaSource::new()?))
}

/// Build the media source for the current platform.
#[cfg(not(target_os = "windows"))]
pub fn system_source() -> Result<Box<dyn MediaSource>> {
    anyhow::ensure!(
        mpris::is_playerctl_installed(),
        "playerctl is not installed; install it to read the active player"
    );
    Ok(Box::new(mpris::PlayerctlSource::new()))
}
