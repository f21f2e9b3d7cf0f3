/*!
 * wordstack
 *
 * Word-frequency analysis rendered as a size/color-coded word cloud.
 *
 * Text or source files are tokenized into a descending word/count list,
 * which the layout engine turns into non-overlapping screen positions in
 * either a columns or a free-form jumble arrangement. Results render to
 * SVG or PNG.
 *
 * ```no_run
 * use wordstack::{Arrangement, Layout, LayoutParams, MonospaceMeasure, WordCount, WordList};
 *
 * let words = vec![
 *     WordCount::new("the", 100),
 *     WordCount::new("cat", 50),
 *     WordCount::new("on", 10),
 * ];
 * let layout = Layout::new();
 * let params = LayoutParams {
 *     width: 800.0,
 *     height: 600.0,
 *     font_size_min: 10,
 *     font_size_max: 100,
 *     show_counts: false,
 *     arrangement: Arrangement::Jumble,
 * };
 * let measure = MonospaceMeasure::default();
 * let result = layout
 *     .arrange(&measure, &params, &words, &WordList::default(), &WordList::default())
 *     .unwrap();
 * assert_eq!(result.displayed, 3);
 * ```
 */

use std::path::PathBuf;

use thiserror::Error;

pub mod color;
pub mod layout;
pub mod measure;
pub mod parser;
pub mod render;
pub mod report;
pub mod words;

pub use color::{Color, ColorRange};
pub use layout::{Arrangement, Layout, LayoutParams, LayoutResult, PlacedWord, Rect};
pub use measure::{FontMeasure, MonospaceMeasure, TextMeasure, TextSize};
pub use parser::{FileParser, ParseMode, ParseOptions, ParsedCorpus};
pub use report::ReportMaker;
pub use words::{FreqStats, Statistics, WordCount, WordList};

#[derive(Debug, Error)]
pub enum Error {
    #[error("font error: {0}")]
    Font(String),
    #[error("svg error: {0}")]
    Svg(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
