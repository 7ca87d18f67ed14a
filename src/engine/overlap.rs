// Pairwise overlap computer — pure set arithmetic, no I/O.
//
// Given per-actor suspect sets, enumerates every unordered actor pair,
// counts shared suspects, filters by a minimum, ranks by count, and
// truncates. O(n²) in actor count plus O(min(|A|,|B|)) per intersection,
// which is fine for the bounded actor lists the facade enforces.

use std::collections::HashSet;

use crate::db::models::ClusterCount;

/// One surviving actor pair with its raw intersection count, before
/// score enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOverlap {
    pub a: String,
    pub b: String,
    pub shared_suspects: u32,
    /// Dominant bot-cluster signatures among the shared suspects.
    /// This path always produces an empty list; the field exists so the
    /// enrichment stage has a slot to fill once cluster signatures land.
    pub top_clusters: Vec<ClusterCount>,
}

/// Count the intersection of two sets by iterating the smaller one.
fn shared_count(set_a: &HashSet<String>, set_b: &HashSet<String>) -> u32 {
    let (small, large) = if set_a.len() <= set_b.len() {
        (set_a, set_b)
    } else {
        (set_b, set_a)
    };
    small.iter().filter(|id| large.contains(*id)).count() as u32
}

/// Enumerate unordered pairs (i < j, input order), keep those sharing at
/// least `min_shared` suspects, sort by shared count descending (stable,
/// so ties keep first-encounter order), truncate to `limit`.
///
/// Callers supply unique actor ids; repeated ids are not deduplicated here.
pub fn raw_overlaps(
    suspects_by_actor: &[(String, HashSet<String>)],
    min_shared: u32,
    limit: usize,
) -> Vec<RawOverlap> {
    let mut results = Vec::new();

    for i in 0..suspects_by_actor.len() {
        for j in (i + 1)..suspects_by_actor.len() {
            let (a, set_a) = &suspects_by_actor[i];
            let (b, set_b) = &suspects_by_actor[j];

            let shared = shared_count(set_a, set_b);
            if shared >= min_shared {
                results.push(RawOverlap {
                    a: a.clone(),
                    b: b.clone(),
                    shared_suspects: shared,
                    top_clusters: vec![],
                });
            }
        }
    }

    results.sort_by(|x, y| y.shared_suspects.cmp(&x.shared_suspects));
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn actors(input: &[(&str, &[&str])]) -> Vec<(String, HashSet<String>)> {
        input
            .iter()
            .map(|(id, followers)| (id.to_string(), set(followers)))
            .collect()
    }

    #[test]
    fn test_pair_kept_at_threshold_dropped_above() {
        // Spec scenario: 9-member sets sharing 8
        let shared: Vec<String> = (0..8).map(|i| format!("s{i}")).collect();
        let mut x: HashSet<String> = shared.iter().cloned().collect();
        let mut y: HashSet<String> = shared.iter().cloned().collect();
        x.insert("only-x".to_string());
        y.insert("only-y".to_string());

        let input = vec![("x".to_string(), x), ("y".to_string(), y)];

        let at_8 = raw_overlaps(&input, 8, 200);
        assert_eq!(at_8.len(), 1);
        assert_eq!(at_8[0].shared_suspects, 8);

        let at_9 = raw_overlaps(&input, 9, 200);
        assert!(at_9.is_empty());
    }

    #[test]
    fn test_empty_set_actor_never_pairs() {
        let input = actors(&[
            ("x", &["s1", "s2", "s3"]),
            ("y", &["s1", "s2", "s3"]),
            ("z", &[]),
        ]);
        let overlaps = raw_overlaps(&input, 1, 200);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].a, "x");
        assert_eq!(overlaps[0].b, "y");
    }

    #[test]
    fn test_sorted_by_shared_descending() {
        let input = actors(&[
            ("a", &["s1", "s2"]),
            ("b", &["s1", "s2", "s3", "s4"]),
            ("c", &["s1", "s2", "s3", "s4"]),
        ]);
        let overlaps = raw_overlaps(&input, 1, 200);
        assert_eq!(overlaps.len(), 3);
        // (b, c) share 4; (a, b) and (a, c) share 2 each
        assert_eq!((overlaps[0].a.as_str(), overlaps[0].b.as_str()), ("b", "c"));
        assert_eq!(overlaps[0].shared_suspects, 4);
        // Stable tie-break: (a, b) was encountered before (a, c)
        assert_eq!((overlaps[1].a.as_str(), overlaps[1].b.as_str()), ("a", "b"));
        assert_eq!((overlaps[2].a.as_str(), overlaps[2].b.as_str()), ("a", "c"));
    }

    #[test]
    fn test_limit_truncates_after_sorting() {
        let input = actors(&[
            ("a", &["s1"]),
            ("b", &["s1"]),
            ("c", &["s1", "s2"]),
            ("d", &["s1", "s2"]),
        ]);
        let overlaps = raw_overlaps(&input, 1, 1);
        assert_eq!(overlaps.len(), 1);
        // The highest-overlap pair survives the cut
        assert_eq!(overlaps[0].shared_suspects, 2);
    }

    #[test]
    fn test_single_actor_yields_no_pairs() {
        let input = actors(&[("a", &["s1", "s2"])]);
        assert!(raw_overlaps(&input, 1, 200).is_empty());
    }

    #[test]
    fn test_top_clusters_empty_from_this_path() {
        let input = actors(&[("a", &["s1"]), ("b", &["s1"])]);
        let overlaps = raw_overlaps(&input, 1, 200);
        assert!(overlaps[0].top_clusters.is_empty());
    }

    #[test]
    fn test_intersection_symmetric_regardless_of_size_order() {
        let big: Vec<String> = (0..100).map(|i| format!("s{i}")).collect();
        let small = set(&["s0", "s1", "s2"]);
        let big_set: HashSet<String> = big.into_iter().collect();

        assert_eq!(shared_count(&small, &big_set), 3);
        assert_eq!(shared_count(&big_set, &small), 3);
    }
}
