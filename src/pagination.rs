//! Pagination window computation for blog listing pages.
//!
//! A paginated listing shows a row of page buttons. With many pages the row
//! is windowed: the first and last page are always shown, the current page
//! keeps its immediate neighbors, and omitted runs collapse to an ellipsis.
//!
//! ## Window shapes
//!
//! With `max_visible = 5` over ten pages:
//!
//! ```text
//! current = 1   →  [1] 2  3  4  …  10     (near start)
//! current = 5   →   1  …  4 [5] 6  …  10  (middle)
//! current = 10  →   1  …  7  8  9 [10]    (near end)
//! ```
//!
//! Two invariants shape every window:
//! - an ellipsis always stands for **at least two** omitted pages; a
//!   single-page gap shows the page number instead,
//! - no window ever contains two adjacent ellipses.
//!
//! The near-start/near-end boundaries (`half + 1`, `total - half`) are
//! slightly asymmetric when `max_visible` is even. That asymmetry is kept
//! as-is; odd values give balanced windows and are the expected input.
//!
//! All functions here are pure: same inputs, same tokens, no state.

/// Default visible-button budget for the pagination control.
pub const DEFAULT_MAX_VISIBLE: u32 = 5;

/// One display slot in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    /// A numbered page button (1-based).
    Page(u32),
    /// A placeholder for two or more omitted pages.
    Ellipsis,
}

/// Compute the ordered token sequence for a pagination control.
///
/// Returns an empty vector when `total_pages <= 1` — a single page gets no
/// control at all. Out-of-range `current_page` is clamped into
/// `[1, total_pages]` and `max_visible` is raised to the minimum of 3, so
/// no input combination can panic.
pub fn page_window(total_pages: u32, current_page: u32, max_visible: u32) -> Vec<PageToken> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let max_visible = max_visible.max(3);
    let current = current_page.clamp(1, total_pages);

    if total_pages <= max_visible {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let half = max_visible / 2;
    let mut tokens = Vec::new();

    if current <= half + 1 {
        // Near start: a solid run from page 1, then jump to the last page.
        for n in 1..max_visible {
            tokens.push(PageToken::Page(n));
        }
        push_gap(&mut tokens, max_visible - 1, total_pages);
        tokens.push(PageToken::Page(total_pages));
    } else if current >= total_pages - half {
        // Near end: page 1, then a solid run up to the last page.
        tokens.push(PageToken::Page(1));
        let run_start = total_pages - max_visible + 2;
        push_gap(&mut tokens, 1, run_start);
        for n in run_start..=total_pages {
            tokens.push(PageToken::Page(n));
        }
    } else {
        // Middle: anchors at both ends around the current page's neighbors.
        tokens.push(PageToken::Page(1));
        push_gap(&mut tokens, 1, current - 1);
        for n in current - 1..=current + 1 {
            tokens.push(PageToken::Page(n));
        }
        push_gap(&mut tokens, current + 1, total_pages);
        tokens.push(PageToken::Page(total_pages));
    }

    tokens
}

/// Bridge the gap between two shown page numbers.
///
/// - adjacent (or overlapping) pages: nothing to bridge
/// - exactly one omitted page: show its number — an ellipsis may never
///   stand in for a single page
/// - two or more omitted pages: one ellipsis
fn push_gap(tokens: &mut Vec<PageToken>, before: u32, after: u32) {
    match after.saturating_sub(before) {
        0 | 1 => {}
        2 => tokens.push(PageToken::Page(before + 1)),
        _ => tokens.push(PageToken::Ellipsis),
    }
}

/// Number of listing pages needed for `total_items` at `per_page` each.
///
/// Zero items (or a zero page size) is zero pages — the listing renders an
/// empty state and no pagination control.
pub fn page_count(total_items: usize, per_page: usize) -> u32 {
    if total_items == 0 || per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page) as u32
}

/// Index range of the items shown on `page` (1-based).
///
/// Pages past the end yield an empty range rather than panicking.
pub fn page_slice(total_items: usize, per_page: usize, page: u32) -> std::ops::Range<usize> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
    let start = start.min(total_items);
    let end = start.saturating_add(per_page).min(total_items);
    start..end
}

/// URL of listing page `page` under `base_path` (absolute, trailing slash).
///
/// Page 1 is the listing root itself; later pages live under `page/{n}/`:
///
/// ```text
/// page_href("/blog/", 1)  →  "/blog/"
/// page_href("/blog/", 3)  →  "/blog/page/3/"
/// ```
pub fn page_href(base_path: &str, page: u32) -> String {
    if page <= 1 {
        base_path.to_string()
    } else {
        format!("{base_path}page/{page}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shorthand: `p(3)` is a page token, `e()` an ellipsis.
    fn p(n: u32) -> PageToken {
        PageToken::Page(n)
    }

    fn e() -> PageToken {
        PageToken::Ellipsis
    }

    #[test]
    fn single_page_has_no_control() {
        assert!(page_window(1, 1, 5).is_empty());
        assert!(page_window(0, 1, 5).is_empty());
    }

    #[test]
    fn few_pages_shown_in_full() {
        assert_eq!(
            page_window(5, 3, 5),
            vec![p(1), p(2), p(3), p(4), p(5)],
        );
        assert_eq!(page_window(2, 1, 5), vec![p(1), p(2)]);
    }

    #[test]
    fn near_start_window() {
        assert_eq!(
            page_window(10, 1, 5),
            vec![p(1), p(2), p(3), p(4), e(), p(10)],
        );
        // Pages 2 and 3 classify the same way.
        assert_eq!(page_window(10, 3, 5), page_window(10, 1, 5));
    }

    #[test]
    fn middle_window() {
        assert_eq!(
            page_window(10, 5, 5),
            vec![p(1), e(), p(4), p(5), p(6), e(), p(10)],
        );
    }

    #[test]
    fn near_end_window() {
        assert_eq!(
            page_window(10, 10, 5),
            vec![p(1), e(), p(7), p(8), p(9), p(10)],
        );
        assert_eq!(page_window(10, 8, 5), page_window(10, 10, 5));
    }

    #[test]
    fn single_page_gap_shows_number_not_ellipsis() {
        // Six pages, near start: the "gap" is just page 5.
        assert_eq!(
            page_window(6, 1, 5),
            vec![p(1), p(2), p(3), p(4), p(5), p(6)],
        );
        // Near end mirror: the gap is just page 2.
        assert_eq!(
            page_window(6, 5, 5),
            vec![p(1), p(2), p(3), p(4), p(5), p(6)],
        );
        // Middle with the left gap being exactly page 2.
        assert_eq!(
            page_window(10, 4, 5),
            vec![p(1), p(2), p(3), p(4), p(5), e(), p(10)],
        );
    }

    #[test]
    fn never_adjacent_ellipses() {
        for total in 2..=40 {
            for current in 1..=total {
                let tokens = page_window(total, current, 5);
                for pair in tokens.windows(2) {
                    assert!(
                        !(pair[0] == e() && pair[1] == e()),
                        "adjacent ellipses at total={total} current={current}"
                    );
                }
            }
        }
    }

    #[test]
    fn first_and_last_always_anchored() {
        for total in 2..=40 {
            for current in 1..=total {
                let tokens = page_window(total, current, 5);
                assert_eq!(tokens.first(), Some(&p(1)));
                assert_eq!(tokens.last(), Some(&p(total)));
                assert!(
                    tokens.contains(&p(current)),
                    "current page missing at total={total} current={current}"
                );
            }
        }
    }

    #[test]
    fn even_budget_keeps_asymmetric_boundaries() {
        // max_visible = 4: half = 2, so page 3 still counts as "near start"
        // while "near end" begins at total - 2. Documented quirk, not a bug.
        assert_eq!(
            page_window(10, 3, 4),
            vec![p(1), p(2), p(3), e(), p(10)],
        );
        assert_eq!(
            page_window(10, 8, 4),
            vec![p(1), e(), p(8), p(9), p(10)],
        );
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        // current beyond the end behaves like the last page.
        assert_eq!(page_window(10, 99, 5), page_window(10, 10, 5));
        assert_eq!(page_window(10, 0, 5), page_window(10, 1, 5));
        // degenerate budget raised to the minimum of 3
        assert_eq!(
            page_window(10, 5, 0),
            vec![p(1), e(), p(4), p(5), p(6), e(), p(10)],
        );
    }

    #[test]
    fn window_is_pure() {
        assert_eq!(page_window(17, 9, 5), page_window(17, 9, 5));
    }

    // =========================================================================
    // Page math
    // =========================================================================

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 6), 0);
        assert_eq!(page_count(1, 6), 1);
        assert_eq!(page_count(6, 6), 1);
        assert_eq!(page_count(7, 6), 2);
        assert_eq!(page_count(13, 6), 3);
    }

    #[test]
    fn page_count_zero_per_page() {
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn page_slice_covers_all_items_exactly_once() {
        let total = 13;
        let per = 6;
        let mut seen = Vec::new();
        for page in 1..=page_count(total, per) {
            seen.extend(page_slice(total, per, page));
        }
        assert_eq!(seen, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn page_slice_past_end_is_empty() {
        assert!(page_slice(13, 6, 4).is_empty());
        assert!(page_slice(0, 6, 1).is_empty());
    }

    #[test]
    fn hrefs_for_listing_pages() {
        assert_eq!(page_href("/blog/", 1), "/blog/");
        assert_eq!(page_href("/blog/", 2), "/blog/page/2/");
        assert_eq!(page_href("/", 3), "/page/3/");
    }
}
