//! End-to-end properties of the layout engine, run against a deterministic
//! character-grid measurer so no font file is needed.

use wordstack::{
    Arrangement, Layout, LayoutParams, LayoutResult, MonospaceMeasure, Rect, WordCount, WordList,
};

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

fn arrange(p: &LayoutParams, words: &[WordCount]) -> LayoutResult {
    Layout::new()
        .arrange(
            &MonospaceMeasure::default(),
            p,
            words,
            &WordList::default(),
            &WordList::default(),
        )
        .unwrap()
}

fn sample_words() -> Vec<WordCount> {
    vec![
        WordCount::new("the", 100),
        WordCount::new("cat", 50),
        WordCount::new("sat", 50),
        WordCount::new("on", 10),
    ]
}

/// Bounding box a placed word occupies, rebuilt from the draw instruction.
fn box_of(p: &wordstack::PlacedWord, measure: &MonospaceMeasure) -> Rect {
    use wordstack::TextMeasure;
    let size = measure.measure(&p.text, p.font_size);
    Rect {
        left: p.x,
        top: p.y,
        width: size.width,
        height: size.height,
    }
}

#[test]
fn jumble_scenario_places_all_four_words() {
    let result = arrange(&params(Arrangement::Jumble), &sample_words());

    assert_eq!(result.displayed, 4);

    let the = result.placed.iter().find(|p| p.text == "the").unwrap();
    let on = result.placed.iter().find(|p| p.text == "on").unwrap();
    assert_eq!(the.font_size, 100);
    assert_eq!(on.font_size, 10);
    for placed in &result.placed {
        assert!(placed.font_size <= 100);
        assert!(placed.font_size >= 10);
    }
}

#[test]
fn jumble_words_never_overlap() {
    let measure = MonospaceMeasure::default();
    let many: Vec<WordCount> = (0..60)
        .map(|i| WordCount::new(format!("word{i}"), 200 - (i * 3) as usize))
        .collect();

    let result = arrange(&params(Arrangement::Jumble), &many);
    assert!(result.displayed > 1);

    let boxes: Vec<Rect> = result
        .placed
        .iter()
        .filter(|p| !p.is_count_label)
        .map(|p| box_of(p, &measure))
        .collect();

    for (i, a) in boxes.iter().enumerate() {
        for b in boxes.iter().skip(i + 1) {
            assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn font_size_is_monotonic_in_rank() {
    let words: Vec<WordCount> = (0..20)
        .map(|i| WordCount::new(format!("w{i}"), 400 - i * 17))
        .collect();

    let result = arrange(&params(Arrangement::Jumble), &words);

    let sizes: Vec<u32> = result
        .placed
        .iter()
        .filter(|p| !p.is_count_label)
        .map(|p| p.font_size)
        .collect();

    for pair in sizes.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[test]
fn oversized_word_forces_at_least_one_halving() {
    // 30 chars at size 100 measure 1800 wide, far beyond the 800 canvas
    let words = vec![WordCount::new("a".repeat(30), 10)];

    let result = arrange(&params(Arrangement::Jumble), &words);

    assert_eq!(result.displayed, 1);
    assert!(result.placed[0].font_size < 100);
}

#[test]
fn impossible_fit_reports_zero_words_without_failing() {
    let mut p = params(Arrangement::Jumble);
    p.width = 10.0;
    p.height = 10.0;

    let result = arrange(&p, &[WordCount::new("unplaceable", 1)]);

    assert_eq!(result.displayed, 0);
    assert!(result.placed.is_empty());
}

#[test]
fn impossible_fit_in_columns_also_reports_zero() {
    let mut p = params(Arrangement::Columns);
    p.width = 5.0;
    p.height = 5.0;

    let result = arrange(&p, &[WordCount::new("unplaceable", 1)]);

    assert_eq!(result.displayed, 0);
}

#[test]
fn column_count_never_exceeds_input_and_grows_with_canvas() {
    let words = sample_words();

    let small = {
        let mut p = params(Arrangement::Columns);
        p.width = 300.0;
        p.height = 200.0;
        arrange(&p, &words)
    };
    let large = arrange(&params(Arrangement::Columns), &words);
    let huge = {
        let mut p = params(Arrangement::Columns);
        p.width = 4000.0;
        p.height = 4000.0;
        arrange(&p, &words)
    };

    assert!(small.displayed <= words.len());
    assert!(large.displayed <= words.len());
    assert!(small.displayed <= large.displayed);
    assert!(large.displayed <= huge.displayed);
    assert_eq!(huge.displayed, words.len());
}

#[test]
fn at_most_five_hundred_words_participate_in_a_pass() {
    let words: Vec<WordCount> = (0..520)
        .map(|i| WordCount::new(format!("w{i}"), 1000 - i))
        .collect();

    // canvas large enough that nothing but the cap limits placement
    let mut p = params(Arrangement::Columns);
    p.width = 100_000.0;
    p.height = 100_000.0;

    let result = arrange(&p, &words);

    assert_eq!(result.displayed, 500);
    assert_eq!(result.placed.len(), 500);
}

#[test]
fn layout_is_deterministic() {
    let words = sample_words();
    for arrangement in [Arrangement::Columns, Arrangement::Jumble] {
        let first = arrange(&params(arrangement), &words);
        let second = arrange(&params(arrangement), &words);
        assert_eq!(first, second);
    }
}

#[test]
fn show_counts_doubles_the_draw_instructions() {
    let mut p = params(Arrangement::Jumble);
    p.show_counts = true;

    let result = arrange(&p, &sample_words());

    let labels = result.placed.iter().filter(|p| p.is_count_label).count();
    let words = result.placed.iter().filter(|p| !p.is_count_label).count();
    assert_eq!(labels, words);
    assert_eq!(words, result.displayed);
}

#[test]
fn placements_respect_canvas_bounds_and_bottom_margin() {
    use wordstack::TextMeasure;

    let measure = MonospaceMeasure::default();
    let p = params(Arrangement::Jumble);
    let result = arrange(&p, &sample_words());
    assert_eq!(result.displayed, 4);

    for placed in result.placed.iter().filter(|w| !w.is_count_label) {
        let size = measure.measure(&placed.text, placed.font_size);
        // the claimed region extends font_size/2 beyond the glyphs
        let extra = placed.font_size as f32 / 2.0;

        assert!(placed.x >= 0.0);
        assert!(placed.y >= 0.0);
        assert!(placed.x + size.width + extra <= p.width);
        // the bottom 100 units of the canvas stay clear
        assert!(placed.y + size.height + 1.5 * extra <= p.height - 100.0);
    }
}
