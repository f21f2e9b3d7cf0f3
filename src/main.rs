//! Command-line front end: parse files, lay out the cloud, render to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use log::info;

use wordstack::report::next_available_path;
use wordstack::{
    render, Arrangement, Color, Error, FileParser, FontMeasure, Layout, LayoutParams,
    LayoutResult, ParseMode, ParseOptions, ParsedCorpus, ReportMaker, Statistics, TextMeasure,
    WordCount, WordList,
};

const FONT_SIZE_LIMIT: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Text,
    Code,
}

impl From<ModeArg> for ParseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => ParseMode::Text,
            ModeArg::Code => ParseMode::Code,
        }
    }
}

/// Word frequency analysis rendered as a word cloud.
#[derive(Debug, Parser)]
#[command(name = "wordstack", version, about)]
struct Args {
    /// Files or directories to parse
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Treat inputs as prose or as source code
    #[arg(short = 'p', long = "parse-as", value_enum, default_value_t = ModeArg::Text)]
    parse_as: ModeArg,

    /// Also parse markup files (html, xml, css, ...) in code mode
    #[arg(long)]
    parse_html: bool,

    /// Font file to measure and render with; searched for if omitted
    #[arg(short = 'f', long)]
    font: Option<PathBuf>,

    /// Reference list of common words, most frequent first
    #[arg(short = 'c', long)]
    common_words: Option<PathBuf>,

    /// Skip common words entirely instead of recoloring them
    #[arg(long)]
    ignore_common: bool,

    /// Word list file(s) to exclude from the count
    #[arg(short = 'i', long = "ignore-file")]
    ignore_files: Vec<PathBuf>,

    /// Word list file(s) always rendered in the alert color
    #[arg(short = 'g', long = "flagged-file")]
    flagged_files: Vec<PathBuf>,

    #[arg(long, default_value_t = 30)]
    font_size_min: u32,

    #[arg(long, default_value_t = 400)]
    font_size_max: u32,

    /// Canvas width in device-independent units
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Canvas height in device-independent units
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Render each word's count next to it
    #[arg(long)]
    counts: bool,

    /// Free-form jumble placement instead of columns
    #[arg(short = 'j', long)]
    jumble: bool,

    /// Render the line-length bar graph instead of the cloud
    #[arg(short = 'l', long)]
    line_length_graph: bool,

    /// Parse and report only, render nothing
    #[arg(short = 's', long)]
    skip_display: bool,

    /// Echo the full report to stdout
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Write the report to report.txt (numbered when taken)
    #[arg(short = 'r', long)]
    report: bool,

    /// Output image path; defaults to a numbered screenshot.png
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output raster scale factor
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    validate(&args)?;

    let mut report = ReportMaker::new();
    log_arguments(&mut report, &args);

    let common_paths: Vec<PathBuf> = args.common_words.iter().cloned().collect();
    let common_words = WordList::load(&common_paths)?;
    if !common_words.is_empty() {
        report.push_misc(format!("Loaded {} common words", common_words.len()));
    }

    let ignored_words = WordList::load(&args.ignore_files)?;
    if !ignored_words.is_empty() {
        report.push_misc(format!(
            "Loaded {} ignored words from {} files",
            ignored_words.len(),
            args.ignore_files.len()
        ));
    }

    let flagged_words = WordList::load(&args.flagged_files)?;
    if !flagged_words.is_empty() {
        report.push_misc(format!(
            "Loaded {} flagged words from {} files",
            flagged_words.len(),
            args.flagged_files.len()
        ));
    }

    let options = ParseOptions {
        mode: args.parse_as.into(),
        parse_html: args.parse_html,
        ignore_common: args.ignore_common,
    };

    let corpus = FileParser::parse(
        &mut report,
        options,
        &args.paths,
        &common_words,
        &ignored_words,
        &flagged_words,
    )?;

    if !args.skip_display {
        let font = load_font(args.font.as_deref())?;
        let layout = Layout::new();

        let svg = build_scene(
            &mut report,
            &args,
            &font,
            &layout,
            &corpus,
            &common_words,
            &flagged_words,
            font.family(),
        )?;

        let png = render::svg_to_png(&svg, font.data(), font.family(), args.scale, Color::BLACK)?;

        let out_path = args
            .output
            .clone()
            .unwrap_or_else(|| next_available_path(Path::new("."), "screenshot", "png"));
        fs::write(&out_path, png).map_err(|e| Error::io(&out_path, e))?;
        info!("wrote {}", out_path.display());
    }

    let errors = report.error_text();
    if !errors.is_empty() {
        eprint!("{errors}");
    }

    if args.verbose {
        print!("{}", report.text());
    }

    if args.report {
        let path = report.make(Path::new("."))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

/// Builds the SVG scene for this run. Graph mode renders straight from the
/// line-length histogram without a layout pass; word mode runs layout and
/// records its display statistics in the report.
#[allow(clippy::too_many_arguments)]
fn build_scene(
    report: &mut ReportMaker,
    args: &Args,
    measure: &impl TextMeasure,
    layout: &Layout,
    corpus: &ParsedCorpus,
    common_words: &WordList,
    flagged_words: &WordList,
    font_family: &str,
) -> Result<String, Error> {
    if args.line_length_graph {
        return render::graph_to_svg(
            corpus.length_counts(),
            measure,
            args.width,
            args.height,
            Color::BLACK,
            font_family,
            layout.unique_colors(),
        );
    }

    let params = LayoutParams {
        width: args.width as f32,
        height: args.height as f32,
        font_size_min: args.font_size_min,
        font_size_max: args.font_size_max,
        show_counts: args.counts,
        arrangement: if args.jumble {
            Arrangement::Jumble
        } else {
            Arrangement::Columns
        },
    };

    let result = layout.arrange(measure, &params, corpus.words(), common_words, flagged_words)?;
    log_display_stats(report, &params, &result, corpus.words());

    Ok(render::words_to_svg(
        &result.placed,
        args.width,
        args.height,
        Color::BLACK,
        font_family,
    ))
}

fn validate(args: &Args) -> Result<(), Error> {
    let in_range =
        |size: u32| (1..=FONT_SIZE_LIMIT).contains(&size);

    if !in_range(args.font_size_min) || !in_range(args.font_size_max) {
        return Err(Error::Input(format!(
            "font sizes must be within 1..={FONT_SIZE_LIMIT}"
        )));
    }
    if args.font_size_min > args.font_size_max {
        return Err(Error::Input(format!(
            "font size min {} is greater than font size max {}",
            args.font_size_min, args.font_size_max
        )));
    }
    if args.width == 0 || args.height == 0 {
        return Err(Error::Input("canvas dimensions must be non-zero".into()));
    }
    Ok(())
}

fn log_arguments(report: &mut ReportMaker, args: &Args) {
    report.push_args(format!("Parse mode\t={}", ParseMode::from(args.parse_as).as_str()));
    report.push_args(format!("Canvas\t={}x{}", args.width, args.height));
    report.push_args(format!(
        "Font sizes\t={}..{}",
        args.font_size_min, args.font_size_max
    ));
    for path in &args.paths {
        report.push_args(format!("Input\t={}", path.display()));
    }
}

fn log_display_stats(
    report: &mut ReportMaker,
    params: &LayoutParams,
    result: &LayoutResult,
    words: &[WordCount],
) {
    report.clear_display_stats();
    report.push_display_stats(format!(
        "Displayed {} words in {} mode{}",
        result.displayed,
        params.arrangement.as_str(),
        if params.show_counts {
            " with counts showing"
        } else {
            ""
        }
    ));

    let mut displayed: Vec<WordCount> = words[..result.displayed.min(words.len())].to_vec();
    let stats = Statistics::calculate(
        &mut displayed,
        "Displayed Frequency List:\t",
        report.frequency_list_length(),
    );

    report.push_display_stats("-");
    report.push_display_stats(format!("Displayed Unique Word Count\t={}", stats.unique));
    report.push_display_stats(format!("Displayed Total Word Count\t={}", stats.sum));
    report.push_display_stats("-");
    report.push_display_stats(format!("Displayed Frequency Minimum\t={}", stats.min));
    report.push_display_stats(format!("Displayed Frequency Average\t={}", stats.average));
    report.push_display_stats(format!("Displayed Frequency Median\t={}", stats.median));
    report.push_display_stats(format!("Displayed Frequency Maximum\t={}", stats.max));
    report.push_display_stats(format!("Displayed Frequency StdDev\t={}", stats.stddev));
    report.push_display_stats("-");
    for freq in &stats.freqs {
        report.push_display_stats(freq.clone());
    }
}

fn load_font(path: Option<&Path>) -> Result<FontMeasure, Error> {
    match path {
        Some(path) => FontMeasure::from_file(path),
        None => {
            let path = find_system_font().ok_or_else(|| {
                Error::Font("no font file given and none found in system font directories".into())
            })?;
            info!("using font {}", path.display());
            FontMeasure::from_file(path)
        }
    }
}

const FONT_SEARCH_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

fn find_system_font() -> Option<PathBuf> {
    FONT_SEARCH_DIRS
        .iter()
        .map(Path::new)
        .filter(|dir| dir.is_dir())
        .find_map(find_font_in)
}

fn find_font_in(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_font_in(&path) {
                return Some(found);
            }
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_ascii_lowercase();
            if ext == "ttf" || ext == "otf" {
                return Some(path);
            }
        }
    }
    None
}
