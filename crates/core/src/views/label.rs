use emberscope_protocol::{EventTotals, WeightMode};

use crate::model::FunctionTable;
use crate::views::flame::FlameLayout;

/// Bars narrower than this get no label at all.
const MIN_LABEL_WIDTH_PX: f64 = 28.0;
/// Approximate advance of one monospace character at the label font size.
const CHAR_WIDTH_PX: f64 = 7.5;
/// Never truncate below this many characters (including the ellipsis).
const MIN_CHARS: usize = 5;

/// Tooltip titles for every rect of a layout, in rect order.
///
/// This is the expensive half of rendering a flame graph: one resolved
/// weight string and one formatted title per bar. It is re-run from scratch
/// on a weight-mode change; the geometry it annotates is not.
pub fn frame_titles(
    layout: &FlameLayout,
    functions: &FunctionTable,
    mode: WeightMode,
    totals: &EventTotals,
) -> Vec<String> {
    layout
        .rects
        .iter()
        .map(|rect| {
            let weight = mode.resolve(rect.subtree_events, totals);
            functions.frame_title(rect.function_id, rect.subtree_events, &weight)
        })
        .collect()
}

/// Fit a function name into a bar `width_px` pixels wide.
///
/// Returns the full name when it fits, an ellipsized prefix when at least
/// [`MIN_CHARS`] characters fit, and an empty string otherwise.
pub fn fit_label(name: &str, width_px: f64) -> String {
    if width_px < MIN_LABEL_WIDTH_PX {
        return String::new();
    }
    let name_len = name.chars().count();
    let mut fitting = name_len;
    while fitting > MIN_CHARS && fitting as f64 * CHAR_WIDTH_PX > width_px {
        fitting -= 1;
    }
    if fitting == name_len {
        name.to_string()
    } else {
        let mut label: String = name.chars().take(fitting - 2).collect();
        label.push_str("..");
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallNode, FunctionEntry};
    use crate::views::flame::layout_forest;
    use emberscope_protocol::Orientation;

    #[test]
    fn short_names_kept_whole() {
        assert_eq!(fit_label("main", 100.0), "main");
    }

    #[test]
    fn sub_minimum_width_is_blank() {
        assert_eq!(fit_label("anything", 27.9), "");
    }

    #[test]
    fn long_names_get_ellipsis() {
        // 75px fits 10 characters at 7.5px each.
        let label = fit_label("a_very_long_function_name", 75.0);
        assert_eq!(label, "a_very_l..");
        assert_eq!(label.chars().count(), 10);
    }

    #[test]
    fn narrow_bar_keeps_minimum_prefix() {
        // Wide enough for a label but not for five characters.
        let label = fit_label("abcdefgh", 30.0);
        assert_eq!(label, "abc..");
    }

    #[test]
    fn multibyte_names_truncate_on_char_boundaries() {
        let label = fit_label("日本語のとても長い関数名です", 45.0);
        assert_eq!(label.chars().count(), 6);
        assert!(label.ends_with(".."));
    }

    #[test]
    fn titles_follow_rect_order_and_mode() {
        let a = CallNode::leaf(0, 750);
        let b = CallNode::leaf(1, 250);
        let layout = layout_forest(&[&a, &b], Orientation::Forward);
        let functions = FunctionTable::new(
            vec![
                FunctionEntry {
                    name: "alpha".into(),
                    library_id: 0,
                },
                FunctionEntry {
                    name: "beta".into(),
                    library_id: 0,
                },
            ],
            vec!["libtest.so".into()],
        );
        let totals = EventTotals {
            all_processes: 1_000,
            process: 1_000,
            thread: 1_000,
        };

        let titles = frame_titles(&layout, &functions, WeightMode::PercentToAll, &totals);
        assert_eq!(
            titles,
            vec![
                "alpha | libtest.so (750 events: 75.00%)",
                "beta | libtest.so (250 events: 25.00%)",
            ]
        );

        let raw = frame_titles(&layout, &functions, WeightMode::RawCount, &totals);
        assert_eq!(raw[0], "alpha | libtest.so (750 events: 750)");
    }
}
