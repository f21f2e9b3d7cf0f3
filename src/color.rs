//! Color values and gradient ranges.
//!
//! A [`ColorRange`] is a fixed, precomputed sequence of color samples.
//! Ranges can be built from two endpoints, from an explicit sample list, or
//! by concatenating sub-ranges. Concatenation preserves each sub-range's
//! order and sample density, so a caller can build a non-linear gradient by
//! giving segments different lengths per unit of ratio.

use crate::Error;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Hex notation for SVG attributes, `#rrggbb` or `#rrggbbaa`.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// An ordered, fixed-length sequence of color samples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorRange {
    colors: Vec<Color>,
}

impl ColorRange {
    /// Linear gradient of `length` samples between two endpoint colors.
    pub fn new(first: Color, last: Color, length: usize) -> Self {
        Self {
            colors: make_gradient(first, last, length),
        }
    }

    pub fn from_colors(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Concatenates sub-ranges in order, keeping their sample densities.
    pub fn from_ranges(ranges: &[ColorRange]) -> Self {
        let mut colors = Vec::with_capacity(ranges.iter().map(ColorRange::len).sum());
        for range in ranges {
            colors.extend_from_slice(&range.colors);
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Sample closest below `ratio`, with ratio clamped to `[0, 1]`.
    ///
    /// Errors if the range holds no samples.
    pub fn color_at_ratio(&self, ratio: f32) -> Result<Color, Error> {
        if self.colors.is_empty() {
            return Err(Error::Input(format!(
                "color range queried at ratio {ratio} before any colors were configured"
            )));
        }
        let max_index = self.colors.len() - 1;
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let index = ((ratio * max_index as f32) as usize).min(max_index);
        Ok(self.colors[index])
    }
}

/// Interpolates each channel (including alpha) across `length` discrete
/// steps. Step `i` is `first + i * (last - first) / length`, clamped to
/// `[0, 255]` and truncated.
pub fn make_gradient(first: Color, last: Color, length: usize) -> Vec<Color> {
    let mut colors = Vec::with_capacity(length);

    let step = |a: u8, b: u8| (f32::from(b) - f32::from(a)) / length as f32;
    let red_step = step(first.r, last.r);
    let green_step = step(first.g, last.g);
    let blue_step = step(first.b, last.b);
    let alpha_step = step(first.a, last.a);

    for i in 0..length {
        let at = |from: u8, channel_step: f32| clamp_to_u8(f32::from(from) + channel_step * i as f32);
        colors.push(Color {
            r: at(first.r, red_step),
            g: at(first.g, green_step),
            b: at(first.b, blue_step),
            a: at(first.a, alpha_step),
        });
    }

    colors
}

fn clamp_to_u8(value: f32) -> u8 {
    if value < 0.0 {
        0
    } else if value > 255.0 {
        255
    } else {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_starts_at_first_color() {
        let range = ColorRange::new(Color::BLACK, Color::WHITE, 16);
        assert_eq!(range.len(), 16);
        assert_eq!(range.colors()[0], Color::BLACK);
    }

    #[test]
    fn ratio_endpoints_map_to_first_and_last_samples() {
        let range = ColorRange::new(Color::rgb(10, 20, 30), Color::rgb(200, 100, 50), 64);
        assert_eq!(range.color_at_ratio(0.0).unwrap(), range.colors()[0]);
        assert_eq!(range.color_at_ratio(1.0).unwrap(), range.colors()[63]);
    }

    #[test]
    fn ratio_is_clamped_before_indexing() {
        let range = ColorRange::new(Color::BLACK, Color::WHITE, 8);
        assert_eq!(
            range.color_at_ratio(-3.5).unwrap(),
            range.color_at_ratio(0.0).unwrap()
        );
        assert_eq!(
            range.color_at_ratio(7.0).unwrap(),
            range.color_at_ratio(1.0).unwrap()
        );
    }

    #[test]
    fn empty_range_query_is_an_error() {
        let range = ColorRange::default();
        assert!(range.color_at_ratio(0.5).is_err());
    }

    #[test]
    fn single_sample_range_answers_any_ratio() {
        let range = ColorRange::from_colors(vec![Color::RED]);
        assert_eq!(range.color_at_ratio(0.0).unwrap(), Color::RED);
        assert_eq!(range.color_at_ratio(1.0).unwrap(), Color::RED);
    }

    #[test]
    fn concatenation_preserves_order_and_density() {
        let long = ColorRange::new(Color::BLACK, Color::RED, 12);
        let short = ColorRange::new(Color::RED, Color::WHITE, 3);
        let joined = ColorRange::from_ranges(&[long.clone(), short.clone()]);

        assert_eq!(joined.len(), 15);
        assert_eq!(&joined.colors()[..12], long.colors());
        assert_eq!(&joined.colors()[12..], short.colors());
    }

    #[test]
    fn channels_interpolate_with_truncation() {
        let colors = make_gradient(Color::rgb(0, 0, 0), Color::rgb(255, 0, 0), 4);
        // step = 255/4 = 63.75, truncated per sample
        assert_eq!(colors[1].r, 63);
        assert_eq!(colors[2].r, 127);
        assert_eq!(colors[3].r, 191);
    }

    #[test]
    fn alpha_interpolates_too() {
        let colors = make_gradient(Color::rgba(0, 0, 0, 0), Color::rgba(0, 0, 0, 200), 10);
        assert_eq!(colors[0].a, 0);
        assert_eq!(colors[5].a, 100);
    }

    #[test]
    fn hex_formats() {
        assert_eq!(Color::rgb(255, 165, 0).to_hex(), "#ffa500");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
    }
}
