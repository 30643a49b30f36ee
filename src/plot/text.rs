//! Text rasterisation with a TrueType font.

use crate::errors::{ClimError, Result};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fonts tried, in order, when none is configured
const SYSTEM_FONTS: [&str; 8] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Draws strings onto an RGBA canvas
#[derive(Clone)]
pub struct TextPainter {
    font: Font<'static>,
}

impl std::fmt::Debug for TextPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPainter").finish_non_exhaustive()
    }
}

impl TextPainter {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or_else(|| ClimError::Font("not a valid TrueType font".to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| ClimError::Font(format!("cannot read {}: {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    /// Load the configured font, or the first usable system font.
    ///
    /// An explicitly configured font that cannot be loaded is an error.
    /// Without one, a missing system font only produces a warning and
    /// `None`; plots are then drawn without text.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::from_file(path).map(Some);
        }

        for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
            if !candidate.is_file() {
                continue;
            }
            match Self::from_file(&candidate) {
                Ok(painter) => {
                    debug!(font = %candidate.display(), "Using system font");
                    return Ok(Some(painter));
                }
                Err(e) => debug!(font = %candidate.display(), error = %e, "Skipping font"),
            }
        }

        warn!("No usable font found; text will be omitted. Set --font or PR_CLIM_FONT");
        Ok(None)
    }

    /// Rendered (width, height) of a string at a pixel size
    pub fn measure(&self, text: &str, px: f32) -> (i32, i32) {
        text_size(Scale::uniform(px), &self.font, text)
    }

    /// Draw `text` anchored at (x, y)
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        px: f32,
        x: i32,
        y: i32,
        h: HAlign,
        v: VAlign,
        color: Rgba<u8>,
    ) {
        let (w, height) = self.measure(text, px);
        let left = match h {
            HAlign::Left => x,
            HAlign::Center => x - w / 2,
            HAlign::Right => x - w,
        };
        let top = match v {
            VAlign::Top => y,
            VAlign::Middle => y - height / 2,
            VAlign::Bottom => y - height,
        };
        draw_text_mut(canvas, color, left, top, Scale::uniform(px), &self.font, text);
    }

    /// Draw `text` rotated 90 degrees counter-clockwise, centred at (x, y)
    pub fn draw_vertical(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        px: f32,
        x: i32,
        y: i32,
        color: Rgba<u8>,
    ) {
        let (w, h) = self.measure(text, px);
        if w <= 0 || h <= 0 {
            return;
        }

        // Extra room for descenders, which text_size does not include
        let strip_h = (h as f32 * 1.4) as u32 + 4;
        let mut strip = RgbaImage::from_pixel(w as u32 + 4, strip_h, Rgba([0, 0, 0, 0]));
        draw_text_mut(&mut strip, color, 2, 2, Scale::uniform(px), &self.font, text);
        let rotated = imageops::rotate270(&strip);

        let left = i64::from(x) - i64::from(rotated.width() / 2);
        let top = i64::from(y) - i64::from(rotated.height() / 2);
        imageops::overlay(canvas, &rotated, left, top);
    }
}
