use std::collections::HashMap;
use std::hash::Hash;

use super::{Annotation, AnnotationKind};
use crate::text::{self, Span};

/// Coalesces annotations over a line's text.
///
/// Annotations sharing `(name, value)` are merged when they overlap, touch,
/// or are separated by whitespace only. Afterwards, overlapping annotations
/// of one name with different values are resolved so that none of them
/// overlap in the output. Non-mergeable kinds pass through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnnotationMerger;

impl AnnotationMerger {
    pub fn merge(annotations: &[Annotation], text: &str) -> Vec<Annotation> {
        if annotations.is_empty() {
            return Vec::new();
        }

        let spaces = text::whitespace_spans(text);
        let merged: Vec<Annotation> = group_in_order(annotations, |a| (a.kind(), a.value()))
            .into_iter()
            .flat_map(|group| merge_group(&group, &spaces))
            .collect();

        remove_contradictions(merged, text)
    }
}

/// Groups by `key`, keeping groups in first-seen order.
fn group_in_order<'a, K, F>(annotations: &'a [Annotation], key: F) -> Vec<Vec<&'a Annotation>>
where
    K: Eq + Hash,
    F: Fn(&'a Annotation) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Annotation>> = Vec::new();
    for annotation in annotations {
        let slot = *index.entry(key(annotation)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(annotation);
    }
    groups
}

/// A run of touching items during the sweep.
struct Region {
    end: usize,
    /// Extent of the real annotations absorbed so far.
    covered: Option<Span>,
}

impl Region {
    fn open(span: Span, is_annotation: bool) -> Self {
        Self {
            end: span.end,
            covered: is_annotation.then_some(span),
        }
    }

    fn absorb(&mut self, span: Span, is_annotation: bool) {
        self.end = self.end.max(span.end);
        if is_annotation {
            self.covered = Some(match self.covered {
                Some(c) => Span::new(c.start.min(span.start), c.end.max(span.end)),
                None => span,
            });
        }
    }
}

fn merge_group(group: &[&Annotation], spaces: &[Span]) -> Vec<Annotation> {
    let Some(first) = group.first() else {
        return Vec::new();
    };
    if group.len() == 1 || !first.is_mergeable() {
        return group.iter().map(|a| (*a).clone()).collect();
    }

    let mut items: Vec<(Span, bool)> = group
        .iter()
        .map(|a| (a.span(), true))
        .chain(spaces.iter().map(|s| (*s, false)))
        .collect();
    items.sort_by_key(|(span, _)| span.start);

    let mut out = Vec::new();
    let mut flush = |region: Region| {
        if let Some(covered) = region.covered {
            out.push(first.with_span(covered.start, covered.end));
        }
    };

    let mut current: Option<Region> = None;
    for (span, is_annotation) in items {
        match current.as_mut() {
            Some(region) if span.start <= region.end => region.absorb(span, is_annotation),
            _ => {
                if let Some(done) = current.take() {
                    flush(done);
                }
                current = Some(Region::open(span, is_annotation));
            }
        }
    }
    if let Some(done) = current {
        flush(done);
    }

    out
}

/// Resolves overlaps between differently-valued annotations of one name.
///
/// Walking by start, an annotation overlapping the last kept one replaces it
/// when the kept one covers whitespace only. Otherwise both keep their
/// non-overlapping parts; the overlap goes to the later annotation when it
/// is whitespace and is dropped when it is not.
fn remove_contradictions(merged: Vec<Annotation>, text: &str) -> Vec<Annotation> {
    let mut out = Vec::with_capacity(merged.len());

    for group in group_in_order(&merged, |a| a.kind()) {
        if !group[0].is_mergeable() {
            out.extend(group.into_iter().cloned());
            continue;
        }

        let mut group = group;
        group.sort_by_key(|a| a.start());

        let mut kept: Vec<Annotation> = Vec::with_capacity(group.len());
        for annotation in group {
            let prev_end = kept.last().map_or(0, Annotation::end);
            if annotation.start() >= prev_end {
                kept.push(annotation.clone());
                continue;
            }
            let Some(last) = kept.pop() else {
                continue;
            };
            let floor = kept.last().map_or(0, Annotation::end);
            if text::is_blank(text::char_slice(text, last.start(), last.end())) {
                kept.push(annotation.with_span(annotation.start().max(floor), annotation.end()));
                continue;
            }
            kept.extend(split_overlap(&last, annotation, floor, text));
        }
        out.extend(kept);
    }

    out
}

/// Parts of `kept` and a later `other` that survive their overlap, in start order.
///
/// Pieces never start before `floor`, the end of whatever was kept earlier.
fn split_overlap(kept: &Annotation, other: &Annotation, floor: usize, text: &str) -> Vec<Annotation> {
    let overlap = Span::new(kept.start().max(other.start()), kept.end().min(other.end()));
    let other_start = other.start().max(floor);

    // (start, end, from_other)
    let mut pieces: Vec<(usize, usize, bool)> = Vec::with_capacity(3);
    if overlap.start >= overlap.end {
        pieces.push((other_start, other.end(), true));
        pieces.push((kept.start(), kept.end(), false));
    } else {
        pieces.push((kept.start(), overlap.start, false));
        pieces.push((other_start, overlap.start, true));
        if text::is_blank(text::char_slice(text, overlap.start, overlap.end)) {
            pieces.push((overlap.start, overlap.end, true));
        }
        pieces.push((overlap.end, kept.end(), false));
        pieces.push((overlap.end, other.end(), true));
    }

    let mut out: Vec<(usize, usize, bool)> = Vec::with_capacity(pieces.len());
    for (start, end, from_other) in pieces.into_iter().filter(|(start, end, _)| start < end) {
        match out.last_mut() {
            Some(prev) if prev.2 == from_other && prev.1 == start => prev.1 = end,
            _ => out.push((start, end, from_other)),
        }
    }

    out.into_iter()
        .map(|(start, end, from_other)| {
            let source = if from_other { other } else { kept };
            source.with_span(start, end)
        })
        .collect()
}

/// Keeps only annotations of `kind`, convenient for assertions and consumers.
pub fn of_kind(annotations: &[Annotation], kind: AnnotationKind) -> Vec<&Annotation> {
    annotations.iter().filter(|a| a.kind() == kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    fn size(start: usize, end: usize) -> Annotation {
        Annotation::new(AnnotationKind::Size, start, end, "1").unwrap()
    }

    fn merged_set(annotations: &[Annotation], text: &str) -> HashSet<(usize, usize, &'static str, String)> {
        AnnotationMerger::merge(annotations, text)
            .into_iter()
            .map(|a| (a.start(), a.end(), a.name(), a.value().to_string()))
            .collect()
    }

    fn spans(annotations: &[Annotation], text: &str) -> HashSet<(usize, usize)> {
        merged_set(annotations, text)
            .into_iter()
            .map(|(start, end, _, _)| (start, end))
            .collect()
    }

    #[test]
    fn test_merge_empty() {
        assert!(AnnotationMerger::merge(&[], "hello my friend").is_empty());
    }

    #[test]
    fn test_merge_one_annotation_unchanged() {
        let annotations = [size(3, 9)];

        assert_eq!(AnnotationMerger::merge(&annotations, "hello my friend"), annotations);
    }

    #[test]
    fn test_merge_adjacent() {
        let annotations = [size(0, 5), size(5, 15)];

        assert_eq!(spans(&annotations, "hello my friend"), HashSet::from([(0, 15)]));
    }

    #[rstest]
    #[case("hello my friend")]
    #[case("hello\tmy friend")]
    #[case("hello\nmy friend")]
    fn test_merge_across_single_space(#[case] text: &str) {
        let annotations = [size(0, 5), size(6, 15)];

        assert_eq!(spans(&annotations, text), HashSet::from([(0, 15)]));
    }

    #[test]
    fn test_merge_across_long_space_run() {
        let text = "hello               my friend";
        let annotations = [size(0, 5), size(20, 25)];

        assert_eq!(spans(&annotations, text), HashSet::from([(0, 25)]));
    }

    #[test]
    fn test_merge_keeps_gap_with_text() {
        let annotations = [size(0, 3), size(3, 6), size(8, 15)];

        assert_eq!(
            spans(&annotations, "hello my friend"),
            HashSet::from([(0, 6), (8, 15)])
        );
    }

    #[test]
    fn test_merge_whitespace_only_region_emits_nothing_extra() {
        // spaces alone never produce an annotation
        let annotations = [size(0, 1), size(1, 2)];

        assert_eq!(spans(&annotations, "ab   cd"), HashSet::from([(0, 2)]));
    }

    #[test]
    fn test_merge_mixed_names() {
        let text = "hello my friend";
        let annotations = [
            Annotation::bold(0, 5).unwrap(),
            Annotation::bold(5, 15).unwrap(),
            Annotation::italic(4, 6).unwrap(),
            Annotation::italic(6, 66).unwrap(),
        ];

        assert_eq!(
            merged_set(&annotations, text),
            HashSet::from([
                (0, 15, "bold", "True".to_string()),
                (4, 66, "italic", "True".to_string()),
            ])
        );
    }

    #[test]
    fn test_non_mergeable_are_preserved() {
        let text = "hello my friend";
        let annotations = [
            Annotation::confidence(0, 5, 90.0).unwrap(),
            Annotation::confidence(6, 8, 90.0).unwrap(),
            Annotation::confidence(9, 15, 90.0).unwrap(),
        ];

        assert_eq!(AnnotationMerger::merge(&annotations, text), annotations);
    }

    #[test]
    fn test_contradiction_keeps_non_overlapping_parts() {
        let text = "hello my friend";
        let annotations = [
            Annotation::flag(AnnotationKind::Bold, 0, 8, true).unwrap(),
            Annotation::flag(AnnotationKind::Bold, 5, 15, false).unwrap(),
        ];

        assert_eq!(
            merged_set(&annotations, text),
            HashSet::from([
                (0, 5, "bold", "True".to_string()),
                (8, 15, "bold", "False".to_string()),
            ])
        );
    }

    #[test]
    fn test_contradiction_over_whitespace_last_wins() {
        let text = "hello   friend";
        let annotations = [
            Annotation::flag(AnnotationKind::Bold, 5, 8, false).unwrap(),
            Annotation::flag(AnnotationKind::Bold, 6, 14, true).unwrap(),
        ];

        assert_eq!(
            merged_set(&annotations, text),
            HashSet::from([(6, 14, "bold", "True".to_string())])
        );
    }

    #[test]
    fn test_contradiction_fully_covered_splits_outer() {
        let text = "hello my friend";
        let annotations = [
            Annotation::flag(AnnotationKind::Italic, 0, 15, true).unwrap(),
            Annotation::flag(AnnotationKind::Italic, 6, 8, false).unwrap(),
        ];

        assert_eq!(
            merged_set(&annotations, text),
            HashSet::from([
                (0, 6, "italic", "True".to_string()),
                (8, 15, "italic", "True".to_string()),
            ])
        );
    }

    #[test]
    fn test_contradiction_same_span_drops_both() {
        let text = "hello my friend";
        let annotations = [
            Annotation::size(0, 5, 1.0).unwrap(),
            Annotation::size(0, 5, 2.0).unwrap(),
            Annotation::size(9, 15, 2.0).unwrap(),
        ];

        assert_eq!(
            merged_set(&annotations, text),
            HashSet::from([(9, 15, "size", "2".to_string())])
        );
    }

    #[test]
    fn test_contradiction_over_whitespace_overlap_later_wins_there() {
        let text = "ab  cd";
        let annotations = [
            Annotation::size(0, 6, 1.0).unwrap(),
            Annotation::size(2, 4, 2.0).unwrap(),
        ];

        let once = AnnotationMerger::merge(&annotations, text);
        let twice = AnnotationMerger::merge(&once, text);

        assert_eq!(
            merged_set(&annotations, text),
            HashSet::from([
                (0, 2, "size", "1".to_string()),
                (2, 4, "size", "2".to_string()),
                (4, 6, "size", "1".to_string()),
            ])
        );
        assert_eq!(
            once.into_iter().collect::<HashSet<_>>(),
            twice.into_iter().collect::<HashSet<_>>()
        );
    }

    #[test]
    fn test_contradiction_output_never_overlaps() {
        let text = "hello my friend";
        let annotations = [
            Annotation::size(0, 15, 1.0).unwrap(),
            Annotation::size(6, 8, 2.0).unwrap(),
            Annotation::size(7, 12, 3.0).unwrap(),
        ];

        let mut merged = AnnotationMerger::merge(&annotations, text);
        merged.sort_by_key(|a| a.start());

        for pair in merged.windows(2) {
            assert!(pair[0].end() <= pair[1].start(), "{} overlaps {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_merge_is_idempotent_on_mixed_input() {
        let text = "hello my friend, how are you?";
        let annotations = [
            Annotation::bold(0, 5).unwrap(),
            Annotation::bold(6, 8).unwrap(),
            Annotation::flag(AnnotationKind::Bold, 7, 20, false).unwrap(),
            Annotation::size(0, 29, 12.0).unwrap(),
            Annotation::size(10, 12, 14.0).unwrap(),
            Annotation::confidence(0, 5, 50.0).unwrap(),
        ];

        let once = AnnotationMerger::merge(&annotations, text);
        let twice = AnnotationMerger::merge(&once, text);

        assert_eq!(
            once.iter().cloned().collect::<HashSet<_>>(),
            twice.iter().cloned().collect::<HashSet<_>>()
        );
    }

    #[test]
    fn test_merge_1000_same_value_annotations_is_fast() {
        let text = "a".repeat(2000);
        let annotations: Vec<_> = (0..1000).map(|i| size(2 * i, 2 * i + 2)).collect();

        let started = Instant::now();
        let merged = AnnotationMerger::merge(&annotations, &text);

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(merged, vec![size(0, 2000)]);
    }

    #[test]
    fn test_merge_1000_disjoint_annotations_is_fast() {
        let text = "ab ".repeat(600);
        let annotations: Vec<_> = (0..1000)
            .map(|i| Annotation::new(AnnotationKind::Size, 3 * i, 3 * i + 1, (i + 1).to_string()).unwrap())
            .collect();

        let started = Instant::now();
        let merged = AnnotationMerger::merge(&annotations, &text);

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(merged.len(), 1000);
    }

    #[test]
    fn test_of_kind() {
        let annotations = [Annotation::bold(0, 1).unwrap(), size(0, 1)];

        assert_eq!(of_kind(&annotations, AnnotationKind::Size), vec![&annotations[1]]);
    }
}
