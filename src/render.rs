//! Turns layout output into SVG scenes and rasterizes them to PNG.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use tiny_skia::{Pixmap, Transform};

use crate::color::{Color, ColorRange};
use crate::layout::PlacedWord;
use crate::measure::TextMeasure;
use crate::Error;

const LABEL_FONT_SIZE: u32 = 30;
const GRAPH_SPACER_RATIO: f32 = 0.1;
const GRAPH_PAD: f32 = 10.0;
const BAR_PAD_RATIO: f32 = 0.1;

/// One `<text>` element per placed word, positioned by its top-left corner.
pub fn words_to_svg(
    placed: &[PlacedWord],
    width: u32,
    height: u32,
    background: Color,
    font_family: &str,
) -> String {
    let mut svg = svg_header(width, height, background, font_family);

    for word in placed {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="{}">{}</text>"#,
            word.x,
            word.y,
            word.color.to_hex(),
            word.font_size,
            escape_xml(&word.text)
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Bar chart of line length vs occurrence count, with labels for the count
/// and length extremes and reference marks at columns 80 and 100.
///
/// Fewer than two distinct lengths yields an empty scene.
pub fn graph_to_svg(
    histogram: &BTreeMap<usize, usize>,
    measure: &impl TextMeasure,
    width: u32,
    height: u32,
    background: Color,
    font_family: &str,
    colors: &ColorRange,
) -> Result<String, Error> {
    let mut svg = svg_header(width, height, background, font_family);

    if histogram.len() < 2 {
        svg.push_str("</svg>");
        return Ok(svg);
    }

    let length_min = *histogram.keys().next().unwrap_or(&0);
    let length_max = *histogram.keys().next_back().unwrap_or(&0);
    let count_max = histogram.values().copied().max().unwrap_or(0);
    let count_min = histogram.values().copied().min().unwrap_or(0);

    let width_f = width as f32;
    let height_f = height as f32;

    let vertical_spacer = height_f * GRAPH_SPACER_RATIO;
    let graph_height = height_f - vertical_spacer * 2.0;
    let horizontal_spacer = width_f * GRAPH_SPACER_RATIO;
    let graph_width = width_f - horizontal_spacer * 2.0;

    let axis_color = colors.color_at_ratio(1.0)?;
    let fade_color = colors.color_at_ratio(0.5)?;

    let top_label = count_max.to_string();
    let top_label_size = measure.measure(&top_label, LABEL_FONT_SIZE);

    let graph_left = horizontal_spacer + top_label_size.width + GRAPH_PAD;
    let graph_top = vertical_spacer;
    let graph_bottom = graph_top + graph_height;
    let graph_right = graph_left + graph_width;

    let label = |svg: &mut String, text: &str, x: f32, y: f32| {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="{}">{}</text>"#,
            x,
            y,
            axis_color.to_hex(),
            LABEL_FONT_SIZE,
            escape_xml(text)
        );
    };

    // count extremes on the left edge
    label(&mut svg, &top_label, horizontal_spacer, graph_top);

    let bottom_label = count_min.to_string();
    let bottom_label_size = measure.measure(&bottom_label, LABEL_FONT_SIZE);
    label(
        &mut svg,
        &bottom_label,
        graph_left - bottom_label_size.width - GRAPH_PAD,
        graph_bottom - GRAPH_PAD * 2.0,
    );

    // length extremes along the bottom
    let baseline = graph_bottom + LABEL_FONT_SIZE as f32;
    label(&mut svg, &length_min.to_string(), graph_left, baseline);

    let right_label = length_max.to_string();
    let right_label_size = measure.measure(&right_label, LABEL_FONT_SIZE);
    label(
        &mut svg,
        &right_label,
        graph_right - right_label_size.width,
        baseline,
    );

    let length_span = (length_max - length_min) as f32;
    let distance_to = |column: f32| (column / length_span) * graph_width;

    for column in [80.0f32, 100.0] {
        let text = format!("{column:.0}");
        let size = measure.measure(&text, LABEL_FONT_SIZE);
        label(
            &mut svg,
            &text,
            graph_left + distance_to(column) - size.width + GRAPH_PAD,
            baseline,
        );
    }

    let bar_count = histogram.len() as f32;
    let raw_bar_width = (graph_width / bar_count) * (1.0 - BAR_PAD_RATIO);
    let bar_width = raw_bar_width.max(1.0);

    let line = |svg: &mut String, x1: f32, y1: f32, x2: f32, y2: f32, color: Color| {
        let _ = write!(
            svg,
            r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{}"/>"#,
            color.to_hex()
        );
    };

    // axis lines and the 80/100 tick marks
    line(&mut svg, graph_left, graph_top, graph_left, graph_bottom, fade_color);
    line(
        &mut svg,
        graph_left,
        graph_bottom,
        graph_right + bar_width,
        graph_bottom,
        axis_color,
    );
    for column in [80.0f32, 100.0] {
        let x = graph_left + distance_to(column);
        line(&mut svg, x, graph_bottom, x, graph_bottom + GRAPH_PAD, axis_color);
    }

    // the bars themselves, colored by how tall they are
    for (&length, &count) in histogram {
        let length_ratio = length as f32 / length_max as f32;
        let count_ratio = count as f32 / count_max as f32;

        let left = graph_left + graph_width * length_ratio;
        let bottom = graph_bottom - 1.0;
        let top = bottom - graph_height * count_ratio - 1.0;

        let fill = colors.color_at_ratio(count_ratio)?;
        let _ = write!(
            svg,
            r#"<rect x="{left:.1}" y="{top:.1}" width="{bar_width:.1}" height="{:.1}" fill="{}"/>"#,
            bottom - top,
            fill.to_hex()
        );
    }

    svg.push_str("</svg>");
    Ok(svg)
}

/// Rasterizes an SVG scene to PNG bytes, making `font_data` available to
/// the renderer under its advertised family name.
pub fn svg_to_png(
    svg: &str,
    font_data: &[u8],
    font_family: &str,
    scale: f32,
    background: Color,
) -> Result<Vec<u8>, Error> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_font_source(usvg::fontdb::Source::Binary(Arc::new(font_data.to_vec())));

    let options = usvg::Options {
        font_family: font_family.to_string(),
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| Error::Svg(e.to_string()))?;
    let size = tree.size().to_int_size();
    let out_width = ((size.width() as f32 * scale) as u32).max(1);
    let out_height = ((size.height() as f32 * scale) as u32).max(1);

    let mut pixmap = Pixmap::new(out_width, out_height)
        .ok_or_else(|| Error::Render("failed to create pixel buffer".into()))?;

    pixmap.fill(tiny_skia::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        background.a,
    ));

    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| Error::Render(e.to_string()))
}

fn svg_header(width: u32, height: u32, background: Color, font_family: &str) -> String {
    let mut svg = String::with_capacity(8192);

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        background.to_hex()
    );
    let _ = write!(
        svg,
        r#"<style>text{{font-family:'{}',Arial,sans-serif;dominant-baseline:hanging}}</style>"#,
        escape_xml(font_family)
    );

    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
