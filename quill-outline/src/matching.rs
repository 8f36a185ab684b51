//! Reconciling rated headings with the outline's own headings.

use std::collections::BTreeMap;

use quill_core::models::HeadingRating;
use tracing::warn;

/// Map `rated` back onto `original` headings.
///
/// An exact match wins. Otherwise the original heading with the best
/// containment ratio (length of the contained text over the original
/// heading's length, compared case-insensitively) is used if the ratio is
/// above `threshold`. Rated headings with no match are dropped with a warning.
/// Each original heading takes the first rating that matches it.
pub fn match_headings(
    original: &[String],
    rated: &BTreeMap<String, HeadingRating>,
    threshold: f64,
) -> BTreeMap<String, HeadingRating> {
    let mut matched: BTreeMap<String, HeadingRating> = BTreeMap::new();

    for heading in original {
        if let Some(rating) = rated.get(heading) {
            matched.insert(heading.clone(), rating.clone());
        }
    }

    for (rated_heading, rating) in rated {
        if original.contains(rated_heading) {
            continue;
        }
        let best = original
            .iter()
            .filter(|o| !matched.contains_key(*o))
            .map(|o| (o, containment_ratio(o, rated_heading)))
            .filter(|(_, score)| *score > threshold)
            .fold(None::<(&String, f64)>, |best, (o, score)| match best {
                Some((_, s)) if s >= score => best,
                _ => Some((o, score)),
            });
        match best {
            Some((heading, _)) => {
                matched.insert(heading.clone(), rating.clone());
            }
            None => warn!(
                heading = %rated_heading,
                "rated heading matches no outline heading, dropped"
            ),
        }
    }

    matched
}

/// `len(contained) / len(original)` when one string contains the other,
/// otherwise 0.
fn containment_ratio(original: &str, rated: &str) -> f64 {
    let o = original.trim().to_lowercase();
    let r = rated.trim().to_lowercase();
    if o.is_empty() || r.is_empty() {
        return 0.0;
    }
    let o_len = o.chars().count() as f64;
    if o.contains(&r) {
        r.chars().count() as f64 / o_len
    } else if r.contains(&o) {
        1.0
    } else {
        0.0
    }
}
