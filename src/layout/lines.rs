//! Line clustering: grouping fragments into visual rows by vertical position.
//!
//! Fragments are first bucketed by their exact rounded vertical interval.
//! Glyphs printed on one visual line often carry slightly different baselines,
//! so a second pass folds clusters whose lower bounds lie within a small
//! tolerance of a neighbour into one cluster.
//!
//! The merge is local and greedy. It depends on processing order but is
//! deterministic for identical input.

use std::collections::BTreeMap;

use crate::geometry::Interval;
use crate::layout::fragment::TextFragment;
use crate::layout::selection::LineRange;
use crate::utils::safe_float_cmp;

/// Default distance between lower bounds under which two lines are merged.
pub const DEFAULT_LINE_MERGE_TOLERANCE: i32 = 4;

/// One visual line: a vertical trap range and the fragments inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCluster {
    /// Merged vertical extent of the line
    pub range: Interval,
    /// Fragments of the line, ascending by x
    pub fragments: Vec<TextFragment>,
}

impl LineCluster {
    fn new(range: Interval, mut fragments: Vec<TextFragment>) -> Self {
        sort_by_x(&mut fragments);
        Self { range, fragments }
    }

    /// Number of fragments on the line.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the line holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Text of the line with fragments joined by single spaces.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Cluster fragments into lines, top to bottom.
///
/// Whitespace-only fragments are ignored: a lone space glyph between two
/// columns would otherwise bridge their trap ranges.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::layout::{cluster_lines, TextFragment};
///
/// let fragments = vec![
///     TextFragment::new("Age", 100.0, 21.0, 20.0, 10.0),
///     TextFragment::new("Name", 10.0, 20.0, 30.0, 10.0),
///     TextFragment::new("Ann", 10.0, 40.0, 20.0, 10.0),
/// ];
///
/// let lines = cluster_lines(&fragments, 4);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].text(), "Name Age");
/// ```
pub fn cluster_lines(fragments: &[TextFragment], tolerance: i32) -> Vec<LineCluster> {
    let mut buckets: BTreeMap<Interval, Vec<TextFragment>> = BTreeMap::new();
    for fragment in fragments.iter().filter(|f| !f.is_blank()) {
        buckets
            .entry(fragment.vertical_interval())
            .or_default()
            .push(fragment.clone());
    }

    // BTreeMap iteration is ascending by (lower, upper)
    let mut clusters: Vec<LineCluster> = buckets
        .into_iter()
        .map(|(range, fragments)| LineCluster::new(range, fragments))
        .collect();

    merge_adjacent_lines(&mut clusters, tolerance);
    clusters
}

/// Fold clusters whose lower bounds sit within `tolerance` of a neighbour.
///
/// Each step compares cluster `i` with its predecessor and successor. When
/// either is close enough the two or three participants are replaced by one
/// cluster whose lower bound is the rounded mean of their lower bounds and
/// whose upper bound is their maximum upper bound. Processing resumes at the
/// merged cluster, since the new lower bound may now be close to another
/// neighbour. Every merge shortens the sequence, so the loop terminates.
pub fn merge_adjacent_lines(clusters: &mut Vec<LineCluster>, tolerance: i32) {
    let tolerance = tolerance.max(0).unsigned_abs();
    let mut i = 1;
    while i < clusters.len() {
        let lower = clusters[i].range.lower;
        let with_prev = lower.abs_diff(clusters[i - 1].range.lower) <= tolerance;
        let with_next = clusters
            .get(i + 1)
            .is_some_and(|next| next.range.lower.abs_diff(lower) <= tolerance);

        if !with_prev && !with_next {
            i += 1;
            continue;
        }

        let start = if with_prev { i - 1 } else { i };
        let end = if with_next { i + 1 } else { i };
        let merged = merge_clusters(clusters.drain(start..=end));
        log::trace!(
            "merged lines {}..={} into {} ({} fragments)",
            start,
            end,
            merged.range,
            merged.len()
        );
        clusters.insert(start, merged);
        i = start.max(1);
    }
}

fn merge_clusters<I: Iterator<Item = LineCluster>>(parts: I) -> LineCluster {
    let mut lowers = Vec::new();
    let mut upper = i32::MIN;
    let mut fragments = Vec::new();
    for part in parts {
        lowers.push(part.range.lower);
        upper = upper.max(part.range.upper);
        fragments.extend(part.fragments);
    }

    let mean = lowers.iter().map(|&l| l as f64).sum::<f64>() / lowers.len().max(1) as f64;
    let lower = mean.round() as i32;
    LineCluster::new(Interval::new(lower, upper.max(lower)), fragments)
}

/// Keep only the lines inside the caller's line-index window.
pub fn select_lines(lines: Vec<LineCluster>, range: &LineRange) -> Vec<LineCluster> {
    let total = lines.len();
    let (start, end) = range.bounds(total);
    if start > 0 || end < total {
        log::debug!("selecting lines {}..{} of {}", start, end, total);
    }
    lines
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

fn sort_by_x(fragments: &mut [TextFragment]) {
    fragments.sort_by(|a, b| safe_float_cmp(a.x, b.x).then_with(|| safe_float_cmp(a.y, b.y)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::new(text, x, y, 5.0 * text.len() as f32, 10.0)
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_lines(&[], DEFAULT_LINE_MERGE_TOLERANCE).is_empty());
    }

    #[test]
    fn test_exact_buckets_sorted_top_to_bottom() {
        let fragments = vec![
            frag("C", 0.0, 300.0),
            frag("A", 0.0, 100.0),
            frag("B", 0.0, 200.0),
        ];
        let lines = cluster_lines(&fragments, DEFAULT_LINE_MERGE_TOLERANCE);
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_fragments_within_line_sorted_by_x() {
        let fragments = vec![frag("right", 200.0, 50.0), frag("left", 10.0, 50.0)];
        let lines = cluster_lines(&fragments, DEFAULT_LINE_MERGE_TOLERANCE);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].fragments[0].text, "left");
        assert_eq!(lines[0].fragments[1].text, "right");
    }

    #[test]
    fn test_jittered_baseline_merges_into_one_line() {
        let fragments = vec![
            frag("a", 0.0, 100.0),
            frag("b", 20.0, 102.0),
            frag("c", 40.0, 99.0),
        ];
        let lines = cluster_lines(&fragments, DEFAULT_LINE_MERGE_TOLERANCE);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "a b c");
        assert_eq!(lines[0].range.upper, 112);
    }

    #[test]
    fn test_merge_uses_rounded_mean_lower_bound() {
        let mut clusters = vec![
            LineCluster::new(Interval::new(100, 110), vec![frag("x", 0.0, 100.0)]),
            LineCluster::new(Interval::new(103, 113), vec![frag("y", 10.0, 103.0)]),
        ];
        merge_adjacent_lines(&mut clusters, 4);
        assert_eq!(clusters.len(), 1);
        // (100 + 103) / 2 = 101.5, rounded away from zero
        assert_eq!(clusters[0].range, Interval::new(102, 113));
    }

    #[test]
    fn test_three_way_merge() {
        let mut clusters = vec![
            LineCluster::new(Interval::new(10, 20), vec![frag("p", 0.0, 10.0)]),
            LineCluster::new(Interval::new(13, 23), vec![frag("q", 10.0, 13.0)]),
            LineCluster::new(Interval::new(16, 26), vec![frag("r", 20.0, 16.0)]),
        ];
        merge_adjacent_lines(&mut clusters, 4);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].range, Interval::new(13, 26));
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn test_distant_lines_stay_apart() {
        let fragments = vec![frag("a", 0.0, 100.0), frag("b", 0.0, 105.0)];
        let lines = cluster_lines(&fragments, DEFAULT_LINE_MERGE_TOLERANCE);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_merge_cascades_after_rewind() {
        // 0, 1 and 5 merge into lower 2; 2 and 6 are then within tolerance and merge again
        let mut clusters = vec![
            LineCluster::new(Interval::new(0, 10), vec![frag("a", 0.0, 0.0)]),
            LineCluster::new(Interval::new(1, 11), vec![frag("b", 10.0, 1.0)]),
            LineCluster::new(Interval::new(5, 15), vec![frag("c", 20.0, 5.0)]),
            LineCluster::new(Interval::new(6, 16), vec![frag("d", 30.0, 6.0)]),
            LineCluster::new(Interval::new(40, 50), vec![frag("e", 0.0, 40.0)]),
        ];
        merge_adjacent_lines(&mut clusters, 4);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].range, Interval::new(4, 16));
        assert_eq!(clusters[0].len(), 4);
        assert_eq!(clusters[1].range, Interval::new(40, 50));
    }

    #[test]
    fn test_blank_fragments_ignored() {
        let fragments = vec![frag("a", 0.0, 0.0), frag(" ", 30.0, 200.0)];
        let lines = cluster_lines(&fragments, DEFAULT_LINE_MERGE_TOLERANCE);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_select_lines_window() {
        let fragments: Vec<TextFragment> =
            (0..5).map(|i| frag(&i.to_string(), 0.0, i as f32 * 50.0)).collect();
        let lines = cluster_lines(&fragments, DEFAULT_LINE_MERGE_TOLERANCE);
        let selected = select_lines(lines, &LineRange::new(1, Some(3)));
        let texts: Vec<String> = selected.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_lines_at_opposite_ends_of_coordinate_range() {
        let fragments = vec![frag("top", 0.0, -3.0e9), frag("bottom", 0.0, 3.0e9)];
        let lines = cluster_lines(&fragments, DEFAULT_LINE_MERGE_TOLERANCE);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "top");
        assert_eq!(lines[1].range.lower, i32::MAX);
    }
}
