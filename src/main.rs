use ab_glyph::FontArc;
use anyhow::{Context, Result};
use hidapi::HidApi;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use trackdeck::{
    config::Config, deck, display, favorites::FavoritesLog, player, updater::Updater,
};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = Config::from_env();

    let font = display::load_font(config.font_path.as_deref())?;
    let source = player::system_source()?;

    let mut hid = elgato_streamdeck::new_hidapi().context("failed to initialize HID")?;

    // Failing to reach the device at startup is the one fatal error;
    // everything later retries.
    let mut surface = deck::connect(&hid, font.clone(), config.brightness)?;

    let favorites = FavoritesLog::new(config.favorites_path.clone());
    info!("favorites log: {}", favorites.path().display());

    let mut updater = Updater::new(source, favorites, &config);

    loop {
        if let Err(e) = updater.run(&mut surface, config.poll_interval) {
            warn!("device error: {e:#}; reconnecting");
        }

        surface = reconnect(&mut hid, &font, config.brightness);
        updater.invalidate();
    }
}

/// Re-enumerate once a second until the deck comes back.
fn reconnect(hid: &mut HidApi, font: &FontArc, brightness: u8) -> deck::StreamDeckSurface {
    loop {
        std::thread::sleep(RECONNECT_DELAY);

        if let Err(e) = hid.refresh_devices() {
            warn!("HID refresh failed: {e}");
            continue;
        }

        match deck::connect(hid, font.clone(), brightness) {
            Ok(surface) => {
                info!("device reconnected");
                return surface;
            }
            Err(e) => debug!("waiting for Stream Deck +: {e:#}"),
        }
    }
}
