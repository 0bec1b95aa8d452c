use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::deck::DeckSurface;
use crate::display;
use crate::favorites::FavoritesLog;
use crate::models::TrackInfo;
use crate::player::MediaSource;

/// The media-display loop: polls the OS media session, re-renders the deck
/// when the track changes, and records favorite presses.
///
/// Owns the last-rendered state; a tick with an unchanged track performs no
/// device writes at all.
pub struct Updater {
    source: Box<dyn MediaSource>,
    favorites: FavoritesLog,
    album_art_key: u8,
    favorite_key: u8,
    strip_segment: u8,
    last: Option<TrackInfo>,
}

impl Updater {
    pub fn new(source: Box<dyn MediaSource>, favorites: FavoritesLog, config: &Config) -> Self {
        Self {
            source,
            favorites,
            album_art_key: config.album_art_key,
            favorite_key: config.favorite_key,
            strip_segment: config.strip_segment,
            last: None,
        }
    }

    /// Forget the last-rendered state so the next tick repaints everything.
    /// Called after a device reconnect.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Tick until a device error propagates; the caller reconnects.
    pub fn run(&mut self, surface: &mut dyn DeckSurface, interval: Duration) -> Result<()> {
        loop {
            self.tick(surface)?;
            std::thread::sleep(interval);
        }
    }

    /// One poll cycle. Provider errors are logged and skipped; device errors
    /// propagate so the connection can be re-established.
    pub fn tick(&mut self, surface: &mut dyn DeckSurface) -> Result<()> {
        let current = match self.source.now_playing() {
            Ok(Some(track)) => track,
            Ok(None) => TrackInfo::default(),
            Err(e) => {
                warn!("media provider error: {e:#}");
                return Ok(());
            }
        };

        let text_changed = match &self.last {
            Some(last) => !last.same_display(&current),
            None => true,
        };
        let art_changed = match &self.last {
            Some(last) => !last.same_artwork(&current),
            None => true,
        };

        if text_changed {
            let label = display::strip_label(&current);
            debug!("strip update: {label}");
            surface.set_strip_text(self.strip_segment, &label)?;
        }

        if art_changed {
            match &current.artwork {
                Some(bytes) => match display::decode_artwork(bytes) {
                    Ok(image) => surface.set_key_art(self.album_art_key, &image)?,
                    // Bad artwork skips the art key this cycle; text already went out
                    Err(e) => warn!("skipping art update: {e:#}"),
                },
                None => surface.clear_key(self.album_art_key)?,
            }
        }

        if text_changed || art_changed {
            self.last = Some(current);
        }

        self.poll_favorite(surface)?;

        Ok(())
    }

    fn poll_favorite(&mut self, surface: &mut dyn DeckSurface) -> Result<()> {
        let pressed = surface.pressed_keys()?;

        for _ in pressed.iter().filter(|key| **key == self.favorite_key) {
            match self.last.as_ref() {
                Some(track) if !track.is_empty() => {
                    // One line per press, flushed before we acknowledge it
                    match self.favorites.append(track) {
                        Ok(()) => info!("favorited: {}", track.favorites_line()),
                        Err(e) => warn!("favorite dropped: {e:#}"),
                    }
                }
                _ => debug!("favorite pressed with nothing playing; ignored"),
            }
        }

        Ok(())
    }
}
