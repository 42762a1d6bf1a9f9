use lineview::app::navigation::{History, Navigator};
use lineview::app::registry::{LineRegistry, PageLines};
use lineview::app::selector::{ClickOutcome, RangeSelector};
use lineview::domain::model::{
    IdScheme, LineClick, LineNumber, LineRange, Modifiers, Selection,
};

fn line(n: usize) -> LineNumber {
    LineNumber::new(n).expect("non-zero line")
}

fn page(lines: usize) -> RangeSelector<PageLines, History> {
    RangeSelector::new(PageLines::new(lines, IdScheme::default()), History::default())
}

fn highlighted(selector: &RangeSelector<PageLines, History>) -> Vec<usize> {
    selector
        .registry()
        .highlighted_lines()
        .into_iter()
        .map(LineNumber::get)
        .collect()
}

fn code_highlighted(selector: &RangeSelector<PageLines, History>) -> Vec<usize> {
    selector
        .registry()
        .iter()
        .filter(|(_, code)| code.highlighted)
        .map(|(_, code)| code.line.get())
        .collect()
}

#[test]
fn highlight_range_marks_exactly_the_closed_interval() {
    for (a, b) in [(1, 1), (3, 7), (1, 30), (29, 30)] {
        let mut selector = page(30);
        assert!(selector.highlight_range(line(a), line(b)));
        let expected: Vec<usize> = (a..=b).collect();
        assert_eq!(highlighted(&selector), expected);
        assert_eq!(code_highlighted(&selector), expected);
    }
}

#[test]
fn highlight_range_is_idempotent() {
    let mut selector = page(20);
    selector.highlight_range(line(4), line(9));
    let once = highlighted(&selector);
    selector.highlight_range(line(4), line(9));
    assert_eq!(highlighted(&selector), once);
}

#[test]
fn highlight_range_outside_registry_is_a_no_op() {
    let mut selector = page(10);
    assert!(!selector.highlight_range(line(8), line(12)));
    assert!(highlighted(&selector).is_empty());
}

#[test]
fn init_from_range_fragment() {
    let mut selector = page(40);
    assert!(selector.init_from_fragment("#L5-L12"));

    assert_eq!(selector.selection(), Selection::between(line(5), line(12)));
    assert_eq!(highlighted(&selector), (5..=12).collect::<Vec<_>>());
    assert_eq!(selector.navigator().scrolled_to(), Some(line(5)));
    assert_eq!(selector.navigator().entries(), [""]);
}

#[test]
fn init_accepts_reversed_range() {
    let mut selector = page(40);
    assert!(selector.init_from_fragment("#L12-L5"));
    assert_eq!(
        selector.selection().normalized(),
        Some(LineRange::new(line(5), line(12)))
    );
    assert_eq!(highlighted(&selector), (5..=12).collect::<Vec<_>>());
    assert_eq!(selector.fragment().as_deref(), Some("#L5-L12"));
}

#[test]
fn init_ignores_single_line_fragment() {
    let mut selector = page(40);
    assert!(!selector.init_from_fragment("#L5"));
    assert!(selector.selection().is_empty());
    assert!(highlighted(&selector).is_empty());
    assert_eq!(selector.navigator().scrolled_to(), None);
}

#[test]
fn init_ignores_unknown_lines_without_partial_changes() {
    let mut selector = page(40);
    assert!(!selector.init_from_fragment("#L5-L99"));
    assert!(!selector.init_from_fragment("#L5-codeline-7"));
    assert!(!selector.init_from_fragment("#top-bottom"));
    assert!(!selector.init_from_fragment(""));
    assert!(selector.selection().is_empty());
    assert!(highlighted(&selector).is_empty());
}

#[test]
fn plain_click_starts_single_line_selection() {
    let mut selector = page(40);
    selector.init_from_fragment("#L5-L12");

    let outcome = selector.on_line_click(LineClick::plain(line(7)));

    assert_eq!(
        outcome,
        ClickOutcome::Updated {
            fragment: "#L7".into()
        }
    );
    assert_eq!(selector.selection(), Selection::single(line(7)));
    assert_eq!(highlighted(&selector), vec![7]);
    assert_eq!(selector.navigator().current_fragment(), "#L7");
}

#[test]
fn shift_click_without_start_behaves_like_plain_click() {
    let mut selector = page(40);
    selector.on_line_click(LineClick::with_shift(line(9)));
    assert_eq!(selector.selection(), Selection::single(line(9)));
    assert_eq!(selector.navigator().current_fragment(), "#L9");
}

#[test]
fn click_then_shift_click_selects_range() {
    let mut selector = page(40);
    selector.on_line_click(LineClick::plain(line(3)));
    let outcome = selector.on_line_click(LineClick::with_shift(line(10)));

    assert_eq!(
        outcome,
        ClickOutcome::Updated {
            fragment: "#L3-L10".into()
        }
    );
    assert_eq!(highlighted(&selector), (3..=10).collect::<Vec<_>>());
    assert_eq!(selector.navigator().entries(), ["", "#L3", "#L3-L10"]);
}

#[test]
fn shift_click_above_extends_start() {
    let mut selector = page(40);
    selector.on_line_click(LineClick::plain(line(10)));
    selector.on_line_click(LineClick::with_shift(line(4)));
    assert_eq!(selector.fragment().as_deref(), Some("#L4-L10"));
    assert_eq!(highlighted(&selector), (4..=10).collect::<Vec<_>>());
}

#[test]
fn shift_click_inside_moves_nearer_boundary() {
    let mut selector = page(40);
    selector.init_from_fragment("#L5-L10");
    selector.on_line_click(LineClick::with_shift(line(7)));
    assert_eq!(
        selector.selection().normalized(),
        Some(LineRange::new(line(7), line(10)))
    );
    assert_eq!(highlighted(&selector), vec![7, 8, 9, 10]);
}

#[test]
fn shift_click_tie_moves_end() {
    let mut selector = page(40);
    selector.init_from_fragment("#L5-L9");
    selector.on_line_click(LineClick::with_shift(line(7)));
    assert_eq!(selector.fragment().as_deref(), Some("#L5-L7"));
    assert_eq!(highlighted(&selector), vec![5, 6, 7]);
}

#[test]
fn shift_click_on_reversed_fragment_normalizes_first() {
    let mut selector = page(40);
    selector.init_from_fragment("#L20-L10");
    let outcome = selector.on_line_click(LineClick::with_shift(line(25)));
    assert_eq!(
        outcome,
        ClickOutcome::Updated {
            fragment: "#L10-L25".into()
        }
    );
}

#[test]
fn shrinking_clears_stale_highlights() {
    let mut selector = page(40);
    selector.init_from_fragment("#L1-L20");
    selector.on_line_click(LineClick::with_shift(line(18)));
    assert_eq!(highlighted(&selector), (1..=18).collect::<Vec<_>>());
    assert_eq!(code_highlighted(&selector), (1..=18).collect::<Vec<_>>());
}

#[test]
fn shift_click_on_single_line_yields_zero_width_range() {
    let mut selector = page(40);
    selector.on_line_click(LineClick::plain(line(6)));
    selector.on_line_click(LineClick::with_shift(line(6)));
    assert_eq!(selector.fragment().as_deref(), Some("#L6-L6"));
    assert_eq!(
        selector.selection().normalized(),
        Selection::single(line(6)).normalized()
    );
    assert_eq!(highlighted(&selector), vec![6]);
}

#[test]
fn new_context_click_changes_nothing() {
    let mut selector = page(40);
    selector.on_line_click(LineClick::plain(line(2)));

    let ctrl = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::none()
    };
    let outcome = selector.on_line_click(LineClick {
        line: line(30),
        modifiers: ctrl,
    });

    assert_eq!(outcome, ClickOutcome::PassThrough);
    assert_eq!(selector.selection(), Selection::single(line(2)));
    assert_eq!(highlighted(&selector), vec![2]);
    assert_eq!(selector.navigator().entries(), ["", "#L2"]);
}

#[test]
fn click_on_line_outside_page_keeps_state() {
    let mut selector = page(10);
    selector.on_line_click(LineClick::plain(line(3)));
    selector.on_line_click(LineClick::with_shift(line(5)));

    assert_eq!(
        selector.on_line_click(LineClick::with_shift(line(20))),
        ClickOutcome::Ignored
    );
    assert_eq!(selector.on_line_click(LineClick::plain(line(11))), ClickOutcome::Ignored);

    assert_eq!(selector.selection(), Selection::between(line(3), line(5)));
    assert_eq!(highlighted(&selector), vec![3, 4, 5]);
    assert_eq!(selector.navigator().current_fragment(), "#L3-L5");
    assert_eq!(selector.navigator().entries(), ["", "#L3", "#L3-L5"]);
}

#[test]
fn anchor_clicks_resolve_through_registry() {
    let mut selector = page(10);
    assert_eq!(
        selector.on_anchor_click("L4", Modifiers::none()),
        ClickOutcome::Updated {
            fragment: "#L4".into()
        }
    );
    assert_eq!(
        selector.on_anchor_click("L11", Modifiers::shift()),
        ClickOutcome::Ignored
    );
    assert_eq!(
        selector.on_anchor_click("codeline-5", Modifiers::none()),
        ClickOutcome::Ignored
    );
    assert_eq!(selector.selection(), Selection::single(line(4)));
}

#[test]
fn history_traversal_replays_fragments() {
    let mut selector = page(40);
    selector.on_line_click(LineClick::plain(line(3)));
    selector.on_line_click(LineClick::with_shift(line(10)));

    let previous = selector.navigator_mut().back().map(str::to_owned);
    assert_eq!(previous.as_deref(), Some("#L3"));
    selector.on_fragment_change("#L3");
    assert_eq!(selector.selection(), Selection::single(line(3)));
    assert_eq!(highlighted(&selector), vec![3]);

    selector.on_fragment_change("");
    assert!(selector.selection().is_empty());
    assert!(highlighted(&selector).is_empty());

    selector.on_fragment_change("#L10-L3");
    assert_eq!(highlighted(&selector), (3..=10).collect::<Vec<_>>());
    assert_eq!(selector.navigator().entries(), ["", "#L3", "#L3-L10"]);
}

#[test]
fn fragment_change_to_unknown_line_clears_selection() {
    let mut selector = page(5);
    selector.init_from_fragment("#L1-L3");
    selector.on_fragment_change("#L9");
    assert!(selector.selection().is_empty());
    assert!(highlighted(&selector).is_empty());
}
