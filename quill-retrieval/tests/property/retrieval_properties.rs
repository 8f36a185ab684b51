//! Property tests for quill-retrieval.

use std::collections::HashSet;

use proptest::prelude::*;

use quill_core::models::ScoredInformation;
use quill_core::Information;
use quill_retrieval::ranking::apply_threshold;
use quill_retrieval::search::{fuse, Bm25Index, Bm25Params};

fn params() -> Bm25Params {
    Bm25Params {
        k1: 1.5,
        b: 0.75,
        epsilon: 0.25,
    }
}

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["lava", "reef", "glacier", "market", "the", "of", "coral", "ice"])
        .prop_map(|w| w.to_string())
}

fn doc() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..12).prop_map(|ws| ws.join(" "))
}

fn candidates(n: usize) -> Vec<Information> {
    (0..n)
        .map(|i| Information::new(format!("u{i}"), "", "", vec![format!("s{i}")]))
        .collect()
}

// =============================================================================
// Reranked results: subset of candidates, all ≥ threshold, sorted descending
// =============================================================================
proptest! {
    #[test]
    fn reranked_subset_threshold_and_order(
        scores in prop::collection::vec(0.0f64..1.0, 0..40),
        threshold in 0.0f64..1.0,
        k in 1usize..30,
    ) {
        let pool = candidates(scores.len());
        let urls: HashSet<String> = pool.iter().map(|c| c.url.clone()).collect();
        let kept = apply_threshold(pool, &scores, threshold, k);

        prop_assert!(kept.len() <= k);
        for r in &kept {
            prop_assert!(urls.contains(&r.info.url));
            prop_assert!(r.score >= threshold);
        }
        for pair in kept.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        if scores.iter().all(|s| *s < threshold) {
            prop_assert!(kept.is_empty());
        }
    }
}

// =============================================================================
// BM25 normalized scores stay in [0, 1]
// =============================================================================
proptest! {
    #[test]
    fn bm25_normalized_range(
        corpus in prop::collection::vec(doc(), 0..20),
        query in doc(),
        k in 0usize..25,
    ) {
        let index = Bm25Index::build(&corpus, params());
        let top = index.top_k_normalized(&query, k);
        prop_assert_eq!(top.len(), k.min(corpus.len()));
        for (_, s) in &top {
            prop_assert!((0.0..=1.0).contains(s));
        }
    }
}

// =============================================================================
// Fusion: one entry per URL, sorted, score is the weighted sum
// =============================================================================
proptest! {
    #[test]
    fn fusion_is_weighted_union(
        dense in prop::collection::vec((0usize..8, 0.0f64..1.0), 0..8),
        sparse in prop::collection::vec((0usize..8, 0.0f64..1.0), 0..8),
        vw in 0.0f64..1.0,
        bw in 0.0f64..1.0,
    ) {
        let mk = |hits: &[(usize, f64)]| -> Vec<ScoredInformation> {
            hits.iter()
                .map(|(u, s)| {
                    ScoredInformation::new(Information::new(format!("u{u}"), "", "", vec![]), *s)
                })
                .collect()
        };
        let best = |hits: &[(usize, f64)], url: usize| -> f64 {
            hits.iter().filter(|(u, _)| *u == url).map(|(_, s)| *s).fold(0.0, f64::max)
        };
        let fused = fuse(mk(&dense), mk(&sparse), vw, bw, usize::MAX);

        let expected: HashSet<usize> = dense.iter().chain(&sparse).map(|(u, _)| *u).collect();
        prop_assert_eq!(fused.len(), expected.len());
        for f in &fused {
            let u: usize = f.info.url[1..].parse().unwrap();
            let want = vw * best(&dense, u) + bw * best(&sparse, u);
            prop_assert!((f.score - want).abs() < 1e-9);
        }
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}

// =============================================================================
// Information merge is a snippet set-union, independent of order
// =============================================================================
proptest! {
    #[test]
    fn merge_is_set_union(
        a in prop::collection::vec(word(), 0..8),
        b in prop::collection::vec(word(), 0..8),
    ) {
        let mut ab = Information::new("u", "", "", a.clone());
        ab.dedup_snippets();
        ab.merge(&Information::new("u", "", "", b.clone()));
        let mut ba = Information::new("u", "", "", b.clone());
        ba.dedup_snippets();
        ba.merge(&Information::new("u", "", "", a.clone()));

        let set_ab: HashSet<&String> = ab.snippets.iter().collect();
        let set_ba: HashSet<&String> = ba.snippets.iter().collect();
        let union: HashSet<&String> = a.iter().chain(&b).collect();
        prop_assert_eq!(&set_ab, &union);
        prop_assert_eq!(&set_ba, &union);
        prop_assert_eq!(ab.snippets.len(), union.len());
    }
}
