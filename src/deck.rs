use ab_glyph::FontArc;
use anyhow::{Context, Result};
use elgato_streamdeck::images::ImageRect;
use elgato_streamdeck::info::Kind;
use elgato_streamdeck::{list_devices, StreamDeck, StreamDeckInput};
use hidapi::HidApi;
use image::{DynamicImage, RgbImage};
use std::time::Duration;
use tracing::info;

use crate::display;

// Stream Deck + geometry: 800x100 touch strip over 4x2 keys of 120x120.
pub const STRIP_WIDTH: u32 = 800;
pub const STRIP_HEIGHT: u32 = 100;
pub const SEGMENT_WIDTH: u32 = 200;
pub const KEY_IMAGE_SIZE: u32 = 120;

/// The rendering surface the update loop writes to.
///
/// Behind a trait so the loop can be exercised without hardware; the real
/// implementation rasterizes strip text and talks HID.
pub trait DeckSurface {
    /// Render `text` onto the touch strip, starting at one of four 200px
    /// segments (segment 0 covers the full strip).
    fn set_strip_text(&mut self, segment: u8, text: &str) -> Result<()>;

    /// Push a decoded image to an LCD key face.
    fn set_key_art(&mut self, key: u8, image: &DynamicImage) -> Result<()>;

    /// Blank a key face.
    fn clear_key(&mut self, key: u8) -> Result<()>;

    /// Key indices that transitioned to pressed since the last call.
    fn pressed_keys(&mut self) -> Result<Vec<u8>>;
}

/// A connected Stream Deck +.
pub struct StreamDeckSurface {
    deck: StreamDeck,
    font: FontArc,
    held: Vec<bool>,
}

/// Connect to the first Stream Deck + on the bus.
pub fn connect(hid: &HidApi, font: FontArc, brightness: u8) -> Result<StreamDeckSurface> {
    let (kind, serial) = list_devices(hid)
        .into_iter()
        .find(|(kind, _)| matches!(kind, Kind::Plus))
        .context("no Stream Deck + found")?;

    let deck = StreamDeck::connect(hid, kind, &serial)
        .with_context(|| format!("failed to open Stream Deck + {serial}"))?;

    let firmware = deck
        .firmware_version()
        .unwrap_or_else(|_| "unknown".to_string());
    info!("connected to Stream Deck + (serial {serial}, firmware {firmware})");

    deck.set_brightness(brightness)
        .context("failed to set brightness")?;

    let key_count = kind.key_count() as usize;
    Ok(StreamDeckSurface {
        deck,
        font,
        held: vec![false; key_count],
    })
}

impl DeckSurface for StreamDeckSurface {
    fn set_strip_text(&mut self, segment: u8, text: &str) -> Result<()> {
        let x = u32::from(segment.min(3)) * SEGMENT_WIDTH;
        let width = STRIP_WIDTH - x;

        let img = display::render_strip(&self.font, text, width, STRIP_HEIGHT);
        let rect = ImageRect::from_image(DynamicImage::ImageRgb8(img))?;
        self.deck
            .write_lcd(x as u16, 0, &rect)
            .context("failed to write touch strip")?;

        Ok(())
    }

    fn set_key_art(&mut self, key: u8, image: &DynamicImage) -> Result<()> {
        let face = display::fit_to_key(image, KEY_IMAGE_SIZE);
        self.deck
            .set_button_image(key, DynamicImage::ImageRgb8(face))
            .with_context(|| format!("failed to set key {key} image"))?;

        Ok(())
    }

    fn clear_key(&mut self, key: u8) -> Result<()> {
        let blank = RgbImage::new(KEY_IMAGE_SIZE, KEY_IMAGE_SIZE);
        self.deck
            .set_button_image(key, DynamicImage::ImageRgb8(blank))
            .with_context(|| format!("failed to clear key {key}"))?;

        Ok(())
    }

    fn pressed_keys(&mut self) -> Result<Vec<u8>> {
        let mut pressed = Vec::new();

        loop {
            match self.deck.read_input(Some(Duration::ZERO)) {
                Ok(StreamDeckInput::NoData) => break,
                Ok(StreamDeckInput::ButtonStateChange(states)) => {
                    pressed.extend(rising_edges(&mut self.held, states));
                }
                // Encoder and touch events are not used
                Ok(_) => continue,
                Err(e) => return Err(e).context("failed to read device input"),
            }
        }

        Ok(pressed)
    }
}

/// Diff a button state report against the held set, returning the keys that
/// just went down.
fn rising_edges(held: &mut Vec<bool>, states: Vec<bool>) -> Vec<u8> {
    let mut pressed = Vec::new();

    for (idx, down) in states.iter().enumerate() {
        let was_down = held.get(idx).copied().unwrap_or(false);
        if *down && !was_down {
            pressed.push(idx as u8);
        }
    }

    *held = states;
    pressed
}
