pub mod formatter;

pub use formatter::*;

use ab_glyph::{FontArc, PxScale};
use anyhow::{anyhow, Context, Result};
use image::{imageops, imageops::FilterType, DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

const STRIP_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const ELLIPSIS: char = '…';

// Candidate system fonts, tried in order when no font is configured.
#[cfg(target_os = "windows")]
const FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

#[cfg(not(target_os = "windows"))]
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Load the strip font: an explicit path if configured, otherwise the first
/// usable system font from the candidate list.
pub fn load_font(explicit: Option<&Path>) -> Result<FontArc> {
    if let Some(path) = explicit {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        return FontArc::try_from_vec(bytes)
            .map_err(|e| anyhow!("failed to parse font {}: {e}", path.display()));
    }

    for candidate in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(candidate) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Ok(font);
            }
        }
    }

    Err(anyhow!(
        "no usable system font found; set TRACKDECK_FONT to a .ttf path"
    ))
}

/// Decode raw artwork bytes into an image.
pub fn decode_artwork(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).context("failed to decode artwork")
}

/// Resize artwork onto a black square key face, preserving aspect ratio.
pub fn fit_to_key(img: &DynamicImage, size: u32) -> RgbImage {
    let resized = img.resize(size, size, FilterType::Lanczos3).to_rgb8();
    let mut face = RgbImage::new(size, size);

    let x = (size - resized.width()) / 2;
    let y = (size - resized.height()) / 2;
    imageops::overlay(&mut face, &resized, i64::from(x), i64::from(y));

    face
}

/// Rasterize a strip label: white text on black, vertically centered,
/// width-fitted with an ellipsis.
pub fn render_strip(font: &FontArc, text: &str, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::new(width, height);

    let scale = PxScale::from(height as f32 * 0.36);
    let padding = height / 10;
    let max_width = width.saturating_sub(padding * 2);

    let label = fit_label(font, scale, text, max_width);
    if label.is_empty() {
        return img;
    }

    let (text_w, text_h) = text_size(scale, font, &label);
    let x = (width.saturating_sub(text_w) / 2).max(padding) as i32;
    let y = (height.saturating_sub(text_h) / 2) as i32;

    draw_text_mut(&mut img, STRIP_TEXT_COLOR, x, y, scale, font, &label);

    img
}

/// Trim the label until it fits the given pixel width, appending an
/// ellipsis when anything was cut.
fn fit_label(font: &FontArc, scale: PxScale, text: &str, max_width: u32) -> String {
    if text.is_empty() || max_width == 0 {
        return String::new();
    }

    let (w, _) = text_size(scale, font, text);
    if w <= max_width {
        return text.to_string();
    }

    let mut kept: Vec<char> = text.chars().collect();
    while kept.len() > 1 {
        kept.pop();
        let candidate: String = kept
            .iter()
            .collect::<String>()
            .trim_end()
            .chars()
            .chain(std::iter::once(ELLIPSIS))
            .collect();
        let (w, _) = text_size(scale, font, &candidate);
        if w <= max_width {
            return candidate;
        }
    }

    ELLIPSIS.to_string()
}
