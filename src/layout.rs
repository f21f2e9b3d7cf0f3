//! Collision-aware word placement.
//!
//! Given a word list sorted descending by count, the engine picks a font
//! size and color per word and searches for a non-overlapping position, in
//! either a columns or a free-form jumble arrangement. When even the most
//! frequent word cannot be placed, the driver halves the font-size ceiling
//! and retries until the ceiling drops below 2.

use log::warn;

use crate::color::{Color, ColorRange};
use crate::measure::{TextMeasure, TextSize};
use crate::words::{WordCount, WordList};
use crate::Error;

/// At most this many of the highest-frequency words participate in a pass.
pub const MAX_DISPLAY_WORDS: usize = 500;

const GRADIENT_DEPTH: usize = 4096;
const COUNT_FONT_SIZE: u32 = 30;
const COUNT_TO_WORD_PAD: f32 = 20.0;
const COLUMN_TO_COLUMN_PAD: f32 = 50.0;
const JUMBLE_SCAN_STEP: f32 = 20.0;
const SLIDE_DOWN_STEP: f32 = 20.0;
/// Space at the bottom of the canvas reserved for UI.
const BOTTOM_MARGIN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arrangement {
    #[default]
    Columns,
    Jumble,
}

impl Arrangement {
    pub fn as_str(self) -> &'static str {
        match self {
            Arrangement::Columns => "columns",
            Arrangement::Jumble => "jumble",
        }
    }
}

/// Display bounds and session toggles for one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub width: f32,
    pub height: f32,
    pub font_size_min: u32,
    pub font_size_max: u32,
    pub show_counts: bool,
    pub arrangement: Arrangement,
}

/// One draw instruction: a word or its count label, positioned and colored.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub font_size: u32,
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub is_count_label: bool,
}

/// Axis-aligned rectangle marking screen space claimed by a placed word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left.max(other.left) < self.right().min(other.right())
            && self.top.max(other.top) < self.bottom().min(other.bottom())
    }
}

/// Fresh output of one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub placed: Vec<PlacedWord>,
    /// How many input words were successfully displayed.
    pub displayed: usize,
}

struct WordVisual {
    font_size: u32,
    color: Color,
}

/// The layout engine. Holds the two fixed color gradients; everything else
/// is per-pass state.
pub struct Layout {
    unique_colors: ColorRange,
    common_colors: ColorRange,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        let unique_colors = ColorRange::new(
            Color::rgb(100, 100, 255),
            Color::rgb(192, 192, 255),
            GRADIENT_DEPTH,
        );

        // brown-orange-yellow-white, with a long warm run and a short
        // white tip so only the top-ranked common words read as white
        let common_colors = ColorRange::from_ranges(&[
            ColorRange::new(
                Color::rgb(160, 82, 45),
                Color::rgb(255, 165, 0),
                GRADIENT_DEPTH * 4,
            ),
            ColorRange::new(Color::rgb(255, 165, 0), Color::YELLOW, GRADIENT_DEPTH * 2),
            ColorRange::new(Color::YELLOW, Color::WHITE, GRADIENT_DEPTH / 32),
        ]);

        Self {
            unique_colors,
            common_colors,
        }
    }

    pub fn unique_colors(&self) -> &ColorRange {
        &self.unique_colors
    }

    pub fn common_colors(&self) -> &ColorRange {
        &self.common_colors
    }

    /// Runs a full layout pass over `words`, which must be sorted descending
    /// by count and non-empty.
    ///
    /// Starts at the configured maximum font size; while not even the top
    /// word fits, the ceiling is halved and the pass rerun. A ceiling below
    /// 2 gives up with a warning and a zero-word result rather than an
    /// error.
    pub fn arrange(
        &self,
        measure: &impl TextMeasure,
        params: &LayoutParams,
        words: &[WordCount],
        common_words: &WordList,
        flagged_words: &WordList,
    ) -> Result<LayoutResult, Error> {
        if words.is_empty() {
            return Err(Error::Input("layout invoked with an empty word list".into()));
        }

        let words = &words[..words.len().min(MAX_DISPLAY_WORDS)];

        let mut ceiling = params.font_size_max;
        let mut result =
            self.arrange_at(measure, params, words, common_words, flagged_words, ceiling)?;

        while result.displayed == 0 {
            ceiling /= 2;
            if ceiling < 2 {
                warn!(
                    "most frequent word {:?} will not fit on screen",
                    words[0].word()
                );
                break;
            }
            result =
                self.arrange_at(measure, params, words, common_words, flagged_words, ceiling)?;
        }

        Ok(result)
    }

    fn arrange_at(
        &self,
        measure: &impl TextMeasure,
        params: &LayoutParams,
        words: &[WordCount],
        common_words: &WordList,
        flagged_words: &WordList,
        ceiling: u32,
    ) -> Result<LayoutResult, Error> {
        match params.arrangement {
            Arrangement::Columns => {
                self.arrange_columns(measure, params, words, common_words, flagged_words, ceiling)
            }
            Arrangement::Jumble => {
                self.arrange_jumble(measure, params, words, common_words, flagged_words, ceiling)
            }
        }
    }

    /// Font size and color for the word at `index`, shared by both modes.
    fn word_visual(
        &self,
        words: &[WordCount],
        index: usize,
        common_words: &WordList,
        flagged_words: &WordList,
        font_size_min: u32,
        ceiling: u32,
    ) -> Result<WordVisual, Error> {
        let freq_max = words[0].count();
        let freq_min = words[words.len() - 1].count();
        let freq = words[index].count();

        let freq_ratio = if words.len() == 1 || freq_max == freq_min {
            1.0
        } else {
            freq.saturating_sub(freq_min) as f32 / (freq_max - freq_min) as f32
        };

        let font_size =
            font_size_min + ((ceiling - font_size_min) as f32 * freq_ratio).round() as u32;

        let word = words[index].word();
        let common_order = common_words.order(word);

        let mut color = if common_order == 0 {
            self.unique_colors.color_at_ratio(freq_ratio)?
        } else {
            let common_len = common_words.len() as f32;
            let common_ratio = (common_len - common_order as f32) / common_len;
            self.common_colors.color_at_ratio(common_ratio)?
        };

        if flagged_words.contains(word) {
            color = Color::RED;
        }

        Ok(WordVisual { font_size, color })
    }

    fn arrange_jumble(
        &self,
        measure: &impl TextMeasure,
        params: &LayoutParams,
        words: &[WordCount],
        common_words: &WordList,
        flagged_words: &WordList,
        ceiling: u32,
    ) -> Result<LayoutResult, Error> {
        let font_size_min = params.font_size_min.min(ceiling.saturating_sub(1));

        let mut placed = Vec::new();
        let mut occupied: Vec<Rect> = Vec::new();
        let mut displayed = 0usize;

        for index in 0..words.len() {
            let visual = self.word_visual(
                words,
                index,
                common_words,
                flagged_words,
                font_size_min,
                ceiling,
            )?;

            if !place_jumbled_word(
                measure,
                params,
                &words[index],
                &visual,
                &mut placed,
                &mut occupied,
            ) {
                break;
            }
            displayed += 1;
        }

        Ok(LayoutResult { placed, displayed })
    }

    fn arrange_columns(
        &self,
        measure: &impl TextMeasure,
        params: &LayoutParams,
        words: &[WordCount],
        common_words: &WordList,
        flagged_words: &WordList,
        ceiling: u32,
    ) -> Result<LayoutResult, Error> {
        let font_size_min = params.font_size_min.min(ceiling.saturating_sub(1));

        let mut placed = Vec::new();
        let mut index = 0usize;
        let mut pos_left = 0.0f32;
        // widest right edge seen across all columns so far, cumulative
        let mut max_horiz_extent = 0.0f32;
        let mut height_exhausted = false;

        while index < words.len() && !height_exhausted {
            let mut vert_pos = 0.0f32;

            while index < words.len() {
                let visual = self.word_visual(
                    words,
                    index,
                    common_words,
                    flagged_words,
                    font_size_min,
                    ceiling,
                )?;

                let word = &words[index];
                let word_size = measure.measure(word.word(), visual.font_size);

                let count_text = if params.show_counts {
                    word.count().to_string()
                } else {
                    String::new()
                };
                let count_size = if params.show_counts {
                    measure.measure(&count_text, COUNT_FONT_SIZE)
                } else {
                    TextSize::default()
                };

                let top = vert_pos;

                // shift down to compensate for text metric underestimation
                let vert_shift = visual.font_size as f32 / 3.0;
                vert_pos += vert_shift;

                let word_left = pos_left + count_size.width + COUNT_TO_WORD_PAD;

                let horiz_extent = word_left + word_size.width;
                if max_horiz_extent < horiz_extent {
                    max_horiz_extent = horiz_extent;
                }
                if max_horiz_extent > params.width {
                    // column closed; this word stays pending for the next one
                    break;
                }

                let vert_consumed = word_size.height.max(count_size.height);
                if vert_pos + vert_consumed > params.height {
                    height_exhausted = true;
                    break;
                }
                vert_pos += vert_consumed;

                if params.show_counts {
                    placed.push(PlacedWord {
                        text: count_text,
                        font_size: COUNT_FONT_SIZE,
                        x: pos_left,
                        y: top,
                        color: Color::WHITE,
                        is_count_label: true,
                    });
                }
                placed.push(PlacedWord {
                    text: word.word().to_string(),
                    font_size: visual.font_size,
                    x: word_left,
                    y: top,
                    color: visual.color,
                    is_count_label: false,
                });

                index += 1;
            }

            pos_left = max_horiz_extent + COLUMN_TO_COLUMN_PAD;
            if pos_left > params.width {
                break;
            }
        }

        Ok(LayoutResult {
            placed,
            displayed: index,
        })
    }
}

fn place_jumbled_word(
    measure: &impl TextMeasure,
    params: &LayoutParams,
    word: &WordCount,
    visual: &WordVisual,
    placed: &mut Vec<PlacedWord>,
    occupied: &mut Vec<Rect>,
) -> bool {
    let word_size = measure.measure(word.word(), visual.font_size);

    // extra space compensating for text metric underestimation
    let extra = visual.font_size as f32 / 2.0;

    let count_text = if params.show_counts {
        word.count().to_string()
    } else {
        String::new()
    };
    let count_size = if params.show_counts {
        measure.measure(&count_text, COUNT_FONT_SIZE)
    } else {
        TextSize::default()
    };

    // offsets inside the bounding box, before it is positioned
    let (word_dx, word_dy, count_dy) = if params.show_counts {
        (
            count_size.width + COUNT_TO_WORD_PAD,
            extra,
            (word_size.height * 0.5 - count_size.height * 0.5) + extra,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let box_size = TextSize {
        width: word_dx + word_size.width + extra,
        height: word_size.height.max(count_size.height) + 1.5 * extra,
    };

    let Some((left, top)) = find_jumble_position(params, box_size, occupied) else {
        return false;
    };

    if params.show_counts {
        placed.push(PlacedWord {
            text: count_text,
            font_size: COUNT_FONT_SIZE,
            x: left,
            y: top + count_dy,
            color: Color::WHITE,
            is_count_label: true,
        });
    }
    placed.push(PlacedWord {
        text: word.word().to_string(),
        font_size: visual.font_size,
        x: left + word_dx,
        y: top + word_dy,
        color: visual.color,
        is_count_label: false,
    });

    occupied.push(Rect {
        left,
        top,
        width: box_size.width,
        height: box_size.height,
    });

    true
}

/// Scans candidate positions left-to-right, top-to-bottom at a fixed step.
/// On collision the vertical cursor slides down by a coarse fixed increment
/// and retests, rather than advancing pixel by pixel.
fn find_jumble_position(
    params: &LayoutParams,
    size: TextSize,
    occupied: &[Rect],
) -> Option<(f32, f32)> {
    let mut left = 0.0f32;
    while left + size.width < params.width {
        let mut top = 0.0f32;
        while top + size.height < params.height - BOTTOM_MARGIN {
            let candidate = Rect {
                left,
                top,
                width: size.width,
                height: size.height,
            };

            let slide = slide_down_amount(&candidate, occupied);
            if slide < 1.0 {
                return Some((left, top));
            }
            top += slide;
        }
        left += JUMBLE_SCAN_STEP;
    }

    None
}

fn slide_down_amount(test: &Rect, occupied: &[Rect]) -> f32 {
    for rect in occupied {
        if test.intersects(rect) {
            return SLIDE_DOWN_STEP;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MonospaceMeasure;

    fn params(arrangement: Arrangement) -> LayoutParams {
        LayoutParams {
            width: 800.0,
            height: 600.0,
            font_size_min: 10,
            font_size_max: 100,
            show_counts: false,
            arrangement,
        }
    }

    fn words() -> Vec<WordCount> {
        vec![
            WordCount::new("the", 100),
            WordCount::new("cat", 50),
            WordCount::new("sat", 50),
            WordCount::new("on", 10),
        ]
    }

    #[test]
    fn empty_word_list_is_rejected() {
        let layout = Layout::new();
        let err = layout.arrange(
            &MonospaceMeasure::default(),
            &params(Arrangement::Jumble),
            &[],
            &WordList::default(),
            &WordList::default(),
        );
        assert!(matches!(err, Err(Error::Input(_))));
    }

    #[test]
    fn rects_intersect_only_when_overlapping() {
        let a = Rect {
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let touching = Rect {
            left: 10.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let overlapping = Rect {
            left: 5.0,
            top: 5.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn top_word_gets_ceiling_font_size() {
        let layout = Layout::new();
        let result = layout
            .arrange(
                &MonospaceMeasure::default(),
                &params(Arrangement::Jumble),
                &words(),
                &WordList::default(),
                &WordList::default(),
            )
            .unwrap();

        let the = result
            .placed
            .iter()
            .find(|p| p.text == "the")
            .expect("top word placed");
        assert_eq!(the.font_size, 100);

        let on = result.placed.iter().find(|p| p.text == "on").unwrap();
        assert_eq!(on.font_size, 10);
    }

    #[test]
    fn equal_frequencies_all_use_ratio_one() {
        let layout = Layout::new();
        let mut ties = vec![
            WordCount::new("aaa", 5),
            WordCount::new("bbb", 5),
            WordCount::new("ccc", 5),
        ];
        ties.sort_by(|a, b| b.count().cmp(&a.count()));

        let result = layout
            .arrange(
                &MonospaceMeasure::default(),
                &params(Arrangement::Columns),
                &ties,
                &WordList::default(),
                &WordList::default(),
            )
            .unwrap();

        for placed in &result.placed {
            assert_eq!(placed.font_size, 100);
        }
    }

    #[test]
    fn flagged_words_render_red() {
        let layout = Layout::new();
        let flagged = WordList::from_words(["cat"]);

        let result = layout
            .arrange(
                &MonospaceMeasure::default(),
                &params(Arrangement::Jumble),
                &words(),
                &WordList::default(),
                &flagged,
            )
            .unwrap();

        let cat = result.placed.iter().find(|p| p.text == "cat").unwrap();
        assert_eq!(cat.color, Color::RED);
    }

    #[test]
    fn common_rank_one_of_ten_uses_ratio_point_nine() {
        let layout = Layout::new();
        let common = WordList::from_words([
            "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
        ]);
        let single = vec![WordCount::new("alpha", 3)];

        let result = layout
            .arrange(
                &MonospaceMeasure::default(),
                &params(Arrangement::Jumble),
                &single,
                &common,
                &WordList::default(),
            )
            .unwrap();

        let expected = layout.common_colors().color_at_ratio(0.9).unwrap();
        assert_eq!(result.placed[0].color, expected);
    }

    #[test]
    fn count_labels_are_emitted_left_of_words() {
        let layout = Layout::new();
        let mut p = params(Arrangement::Jumble);
        p.show_counts = true;

        let result = layout
            .arrange(
                &MonospaceMeasure::default(),
                &p,
                &words(),
                &WordList::default(),
                &WordList::default(),
            )
            .unwrap();

        let labels: Vec<_> = result.placed.iter().filter(|p| p.is_count_label).collect();
        assert_eq!(labels.len(), result.displayed);
        for label in &labels {
            assert_eq!(label.color, Color::WHITE);
            assert_eq!(label.font_size, 30);
        }

        // each label sits left of the word that follows it in the output
        for pair in result.placed.chunks(2) {
            assert!(pair[0].is_count_label);
            assert!(!pair[1].is_count_label);
            assert!(pair[0].x < pair[1].x);
        }
    }

    #[test]
    fn columns_stop_at_height_overflow() {
        let layout = Layout::new();
        let mut p = params(Arrangement::Columns);
        p.height = 120.0;

        let result = layout
            .arrange(
                &MonospaceMeasure::default(),
                &p,
                &words(),
                &WordList::default(),
                &WordList::default(),
            )
            .unwrap();

        assert!(result.displayed >= 1);
        assert!(result.displayed < 4);
    }

    #[test]
    fn effective_minimum_stays_below_ceiling() {
        let layout = Layout::new();
        let mut p = params(Arrangement::Columns);
        // configured minimum above the maximum: the effective minimum is
        // clamped to ceiling - 1 so the range is never degenerate
        p.font_size_min = 500;
        p.font_size_max = 100;

        let result = layout
            .arrange(
                &MonospaceMeasure::default(),
                &p,
                &words(),
                &WordList::default(),
                &WordList::default(),
            )
            .unwrap();

        for placed in result.placed.iter().filter(|p| !p.is_count_label) {
            assert!(placed.font_size >= 99);
            assert!(placed.font_size <= 100);
        }
    }
}
