//! Weighted score fusion of dense and sparse hits.

use std::collections::HashMap;

use quill_core::models::ScoredInformation;

/// Fuse dense and sparse hit lists by URL.
///
/// `score = vector_weight * dense + bm25_weight * sparse`, with a missing side
/// counting as 0. When a URL appears more than once in one list its best score
/// is used. On a URL present in both lists the dense record supplies the
/// metadata. The result is sorted by fused score, descending (ties keep first
/// appearance order), and truncated to `k`.
pub fn fuse(
    dense: Vec<ScoredInformation>,
    sparse: Vec<ScoredInformation>,
    vector_weight: f64,
    bm25_weight: f64,
    k: usize,
) -> Vec<ScoredInformation> {
    // url -> (position in `fused`, dense score, sparse score)
    let mut slots: HashMap<String, (usize, f64, f64)> = HashMap::new();
    let mut fused: Vec<ScoredInformation> = Vec::new();

    for hit in dense {
        match slots.get_mut(&hit.info.url) {
            Some((pos, best, _)) => {
                if hit.score > *best {
                    *best = hit.score;
                    fused[*pos].info = hit.info;
                }
            }
            None => {
                slots.insert(hit.info.url.clone(), (fused.len(), hit.score, 0.0));
                fused.push(ScoredInformation::new(hit.info, 0.0));
            }
        }
    }

    for hit in sparse {
        match slots.get_mut(&hit.info.url) {
            Some((_, _, best)) => {
                if hit.score > *best {
                    *best = hit.score;
                }
            }
            None => {
                slots.insert(hit.info.url.clone(), (fused.len(), 0.0, hit.score));
                fused.push(ScoredInformation::new(hit.info, 0.0));
            }
        }
    }

    for entry in fused.iter_mut() {
        if let Some((_, d, s)) = slots.get(&entry.info.url) {
            entry.score = vector_weight * d + bm25_weight * s;
        }
    }

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fused.truncate(k);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Information;

    fn hit(url: &str, snippet: &str, score: f64) -> ScoredInformation {
        ScoredInformation::new(
            Information::new(url, url, "", vec![snippet.to_string()]),
            score,
        )
    }

    #[test]
    fn weighted_fusion_scenario() {
        let fused = fuse(
            vec![hit("url1", "d1", 0.9), hit("url2", "d2", 0.4)],
            vec![hit("url2", "s2", 0.8), hit("url3", "s3", 0.3)],
            0.5,
            0.5,
            10,
        );
        let order: Vec<&str> = fused.iter().map(|f| f.info.url.as_str()).collect();
        assert_eq!(order, vec!["url2", "url1", "url3"]);
        assert!((fused[0].score - 0.60).abs() < 1e-9);
        assert!((fused[1].score - 0.45).abs() < 1e-9);
        assert!((fused[2].score - 0.15).abs() < 1e-9);
    }

    #[test]
    fn dense_metadata_wins_on_collision() {
        let fused = fuse(
            vec![hit("u", "from dense", 0.2)],
            vec![hit("u", "from sparse", 0.9)],
            0.5,
            0.5,
            10,
        );
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].info.snippets, vec!["from dense"]);
    }

    #[test]
    fn repeated_url_uses_best_score() {
        let fused = fuse(
            vec![hit("u", "weak", 0.1), hit("u", "strong", 0.8)],
            Vec::new(),
            1.0,
            0.0,
            10,
        );
        assert!((fused[0].score - 0.8).abs() < 1e-9);
        assert_eq!(fused[0].info.first_snippet(), "strong");
    }

    #[test]
    fn truncates_to_k() {
        let fused = fuse(
            vec![hit("a", "", 0.3), hit("b", "", 0.2), hit("c", "", 0.1)],
            Vec::new(),
            0.5,
            0.5,
            2,
        );
        assert_eq!(fused.len(), 2);
    }
}
