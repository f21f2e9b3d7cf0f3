//! Tokenizes text or source-code files into word-frequency counts.
//!
//! Directories are walked recursively; files are filtered by extension for
//! the active parse mode. Text mode keeps letters, hyphens and apostrophes
//! and repairs words that were split around unicode apostrophes. Code mode
//! keeps identifiers, skipping `//` comments and double-quoted string
//! contents. A per-line length histogram is collected alongside the counts.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::report::ReportMaker;
use crate::words::{FreqStats, Statistics, WordCount, WordList};
use crate::Error;

const TEXT_FILE_EXTENSIONS: &[&str] = &["txt", "rtf"];

const CODE_FILE_EXTENSIONS: &[&str] = &[
    "hpp", "cpp", "h", "c", "cs", "class", "java", "rb", "rake", "php", "php3", "php4", "js", "m",
    "mm", "cmd", "bat", "asm", "s", "sh", "hxx", "cxx", "jsp", "ll", "pl", "y", "yxx", "asp",
    "aspx", "inc", "jspx", "scpt", "do", "action", "wss", "rs", "go", "py", "ts",
];

const MARKUP_FILE_EXTENSIONS: &[&str] = &[
    "xslt", "css", "xsl", "htm", "html", "xhtml", "jhtml", "phtml", "rss", "xml",
];

const TEXT_CHARS_TO_KEEP: &str = "qwertyuiopasdfghjklzxcvbnmQWERTYUIOPASDFGHJKLZXCVBNM-'";
const CODE_CHARS_TO_KEEP: &str =
    "qwertyuiopasdfghjklzxcvbnmQWERTYUIOPASDFGHJKLZXCVBNM1234567890_";

/// Word endings that arrive separated when a unicode apostrophe was
/// stripped, e.g. "don t" for "don't".
const APOSTROPHE_ENDINGS: &[&str] = &[" t ", " s ", " d ", " m ", " ll ", " ve ", " re "];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Text,
    Code,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Text => "text",
            ParseMode::Code => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub mode: ParseMode,
    /// Also accept markup file extensions in code mode.
    pub parse_html: bool,
    /// Skip words present in the common-words list.
    pub ignore_common: bool,
}

/// Everything parsed out of the input paths.
#[derive(Debug, Clone)]
pub struct ParsedCorpus {
    words: Vec<WordCount>,
    length_counts: BTreeMap<usize, usize>,
}

impl ParsedCorpus {
    /// Word counts, sorted descending. Never empty.
    pub fn words(&self) -> &[WordCount] {
        &self.words
    }

    /// Line length (characters) to occurrence count.
    pub fn length_counts(&self) -> &BTreeMap<usize, usize> {
        &self.length_counts
    }
}

/// Walks paths and accumulates word counts and parse statistics.
pub struct FileParser<'a> {
    options: ParseOptions,
    common_words: &'a WordList,
    ignored_words: &'a WordList,
    flagged_words: &'a WordList,
    word_counts: HashMap<String, usize>,
    length_counts: BTreeMap<usize, usize>,
    line_count: usize,
    uncommented_line_count: usize,
    single_count: usize,
    ignored_count: usize,
    flagged_count: usize,
    file_count: usize,
    dir_count: usize,
}

impl<'a> FileParser<'a> {
    /// Parses every path (file or directory) and returns the sorted corpus,
    /// logging parse statistics to the report sink.
    ///
    /// Errors if no words at all could be parsed.
    pub fn parse<P: AsRef<Path>>(
        report: &mut ReportMaker,
        options: ParseOptions,
        paths: &[P],
        common_words: &'a WordList,
        ignored_words: &'a WordList,
        flagged_words: &'a WordList,
    ) -> Result<ParsedCorpus, Error> {
        let mut parser = FileParser {
            options,
            common_words,
            ignored_words,
            flagged_words,
            word_counts: HashMap::new(),
            length_counts: BTreeMap::new(),
            line_count: 0,
            uncommented_line_count: 0,
            single_count: 0,
            ignored_count: 0,
            flagged_count: 0,
            file_count: 0,
            dir_count: 0,
        };

        for path in paths {
            parser.parse_path(path.as_ref())?;
        }

        if parser.word_counts.is_empty() {
            return Err(Error::Input(format!(
                "failed to parse any words from {} path(s)",
                paths.len()
            )));
        }

        let mut words: Vec<WordCount> = parser
            .word_counts
            .drain()
            .map(|(word, count)| WordCount::new(word, count))
            .collect();

        let stats =
            Statistics::calculate(&mut words, "Frequency List\t", report.frequency_list_length());
        parser.log_statistics(report, &stats);

        Ok(ParsedCorpus {
            words,
            length_counts: parser.length_counts,
        })
    }

    fn parse_path(&mut self, path: &Path) -> Result<(), Error> {
        if path.is_dir() {
            self.dir_count += 1;
            let entries = fs::read_dir(path).map_err(|e| Error::io(path, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| Error::io(path, e))?;
                self.parse_path(&entry.path())?;
            }
        } else if path.is_file() && self.matches_mode(path) {
            self.parse_file(path)?;
        }
        Ok(())
    }

    fn matches_mode(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let extension = extension.to_ascii_lowercase();

        match self.options.mode {
            ParseMode::Text => TEXT_FILE_EXTENSIONS.contains(&extension.as_str()),
            ParseMode::Code => {
                CODE_FILE_EXTENSIONS.contains(&extension.as_str())
                    || (self.options.parse_html
                        && MARKUP_FILE_EXTENSIONS.contains(&extension.as_str()))
            }
        }
    }

    fn parse_file(&mut self, path: &Path) -> Result<(), Error> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let contents = String::from_utf8_lossy(&bytes);

        self.file_count += 1;
        info!("parsing {}", path.display());

        match self.options.mode {
            ParseMode::Text => self.parse_text(&contents),
            ParseMode::Code => self.parse_code(&contents),
        }
        Ok(())
    }

    fn parse_text(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.trim_end_matches('\r');
            self.line_count += 1;
            self.uncommented_line_count += 1;

            *self.length_counts.entry(line.chars().count()).or_insert(0) += 1;

            for token in line.split_whitespace() {
                let mut word = token.to_lowercase();
                word = keep_chars(&word, TEXT_CHARS_TO_KEEP);
                word = collapse_spaces(word.trim());

                if word.contains(' ') {
                    word = repair_apostrophes(&word);
                }

                if word.contains(' ') {
                    // remaining fragments came from ellipses or stray
                    // punctuation; count them separately
                    for sub_word in word.split_whitespace() {
                        if sub_word != "-" && sub_word != "'" {
                            self.parse_word(sub_word);
                        }
                    }
                } else if !word.is_empty() && word != "-" && word != "'" {
                    self.parse_word(&word);
                }
            }
        }
    }

    fn parse_code(&mut self, contents: &str) {
        for raw_line in contents.lines() {
            let raw_line = raw_line.trim_end_matches('\r');
            self.line_count += 1;
            self.uncommented_line_count += 1;

            let original_length = raw_line.chars().count();
            let line = raw_line.trim();

            if line.is_empty() {
                continue;
            }

            if line.starts_with("//") {
                self.uncommented_line_count -= 1;
                continue;
            }
            *self.length_counts.entry(original_length).or_insert(0) += 1;

            let mut line = match line.find("//") {
                Some(pos) => &line[..pos],
                None => line,
            }
            .replace("\\\"", "");

            line = blank_quoted_strings(&line);
            line = keep_chars(&line, CODE_CHARS_TO_KEEP);

            for word in line.split_whitespace() {
                self.parse_word(word);
            }
        }
    }

    fn parse_word(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        if word.chars().count() == 1 {
            self.single_count += 1;
        }

        if self.flagged_words.contains(word) {
            self.flagged_count += 1;
        }

        let skip_common = self.options.ignore_common && self.common_words.contains(word);
        if skip_common || self.ignored_words.contains(word) {
            self.ignored_count += 1;
        } else {
            *self.word_counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    fn log_statistics(&self, report: &mut ReportMaker, stats: &FreqStats) {
        debug!(
            "parsed {} files, {} dirs, {} lines",
            self.file_count, self.dir_count, self.line_count
        );

        report.push_file_stats(format!(
            "{} File{} Parsed",
            self.file_count,
            if self.file_count == 1 { "" } else { "s" }
        ));
        report.push_file_stats(format!(
            "{} Director{} Parsed",
            self.dir_count,
            if self.dir_count == 1 { "y" } else { "ies" }
        ));
        report.push_file_stats("-");
        report.push_file_stats(format!("Total Line Count\t={}", self.line_count));
        if self.uncommented_line_count > 0 {
            report.push_file_stats(format!(
                "Line Count Excluding Comments\t={}",
                self.uncommented_line_count
            ));
        }
        report.push_file_stats("-");
        report.push_file_stats(format!(
            "Single Letter or Number Word Count\t={}",
            self.single_count
        ));
        report.push_file_stats(format!("Ignored Word Count\t={}", self.ignored_count));
        report.push_file_stats(format!("Unique Word Count\t={}", stats.unique));
        report.push_file_stats(format!("Flagged Word Count\t={}", self.flagged_count));
        report.push_file_stats(format!("Total Word Count\t={}", stats.sum));
        report.push_file_stats("-");
        report.push_file_stats(format!("Frequency Minimum\t={}", stats.min));
        report.push_file_stats(format!("Frequency Average\t={}", stats.average));
        report.push_file_stats(format!("Frequency Median\t={}", stats.median));
        report.push_file_stats(format!("Frequency Maximum\t={}", stats.max));
        report.push_file_stats(format!("Frequency StdDev\t={}", stats.stddev));
        report.push_file_stats("-");
        for freq in &stats.freqs {
            report.push_file_stats(freq.clone());
        }
    }
}

/// Replaces every character not in `chars_to_keep` with a space.
fn keep_chars(s: &str, chars_to_keep: &str) -> String {
    s.chars()
        .map(|c| if chars_to_keep.contains(c) { c } else { ' ' })
        .collect()
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c == ' ' {
            if !last_was_space {
                out.push(c);
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Rejoins contraction endings that were split off a word when a unicode
/// apostrophe got replaced, so "don t" becomes "don't".
fn repair_apostrophes(word: &str) -> String {
    let mut word = word.to_string();
    for ending in APOSTROPHE_ENDINGS {
        let replacement = format!("'{}", &ending[1..]);
        word = word.replace(ending, &replacement);

        // same ending at the end of the token, without a trailing space
        let ending_at_end = &ending[..ending.len() - 1];
        if word.ends_with(ending_at_end) {
            let stem_len = word.len() - ending_at_end.len();
            word = format!("{}'{}", &word[..stem_len], &ending_at_end[1..]);
        }
    }
    word
}

/// Blanks out the contents of double-quoted strings, quotes included.
fn blank_quoted_strings(line: &str) -> String {
    let mut deleting = false;
    line.chars()
        .map(|c| {
            if c == '"' {
                deleting = !deleting;
                ' '
            } else if deleting {
                ' '
            } else {
                c
            }
        })
        .collect()
}
