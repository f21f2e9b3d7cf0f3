//! Text measurement behind a trait, so layout never needs a live font.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};

use crate::Error;

/// Bounding box of a run of text, in device-independent units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

/// Reports the bounding box of a string at a given font size.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: u32) -> TextSize;
}

/// Measurement backed by a loaded TrueType/OpenType font.
pub struct FontMeasure {
    font: Font,
    family: String,
    data: Vec<u8>,
}

impl FontMeasure {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        let font = Font::from_bytes(data.as_slice(), FontSettings::default())
            .map_err(|e| Error::Font(e.to_string()))?;

        let family =
            extract_font_family_name(&data).unwrap_or_else(|| "sans-serif".to_string());

        Ok(Self { font, family, data })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::from_bytes(data)
    }

    /// Family name the font advertises, used for SVG text styling.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font bytes, needed when rasterizing SVG output.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str, font_size: u32) -> TextSize {
        let px = font_size as f32;

        let mut width = 0.0f32;
        for ch in text.chars() {
            width += self.font.metrics(ch, px).advance_width;
        }

        let height = self
            .font
            .horizontal_line_metrics(px)
            .map_or(px, |m| m.new_line_size);

        TextSize {
            width: width.ceil(),
            height: height.ceil(),
        }
    }
}

fn extract_font_family_name(font_data: &[u8]) -> Option<String> {
    let mut db = usvg::fontdb::Database::new();
    db.load_font_source(usvg::fontdb::Source::Binary(Arc::new(font_data.to_vec())));
    for face in db.faces() {
        if let Some((name, _)) = face.families.first() {
            return Some(name.clone());
        }
    }
    None
}

/// Deterministic character-grid measurement: every character advances by
/// `advance_ratio * font_size` and a line is exactly one font size tall.
/// Useful for tests and headless layout runs.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub advance_ratio: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font_size: u32) -> TextSize {
        let px = font_size as f32;
        TextSize {
            width: text.chars().count() as f32 * px * self.advance_ratio,
            height: px,
        }
    }
}
