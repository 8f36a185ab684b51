//! Property tests for quill-core text processing.

use std::collections::HashMap;

use proptest::prelude::*;

use quill_core::text::{
    limit_word_count_preserve_newline, parse_citation_indices, remap_citations,
    remove_citations, strip_citations_above, trim_trailing_fragment, word_count,
};

fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z]{1,8}".prop_map(|w| w),
            (1usize..9).prop_map(|n| format!("[{n}]")),
            Just(".".to_string()),
            Just("\n".to_string()),
        ],
        0..60,
    )
    .prop_map(|tokens| tokens.join(" "))
}

// =============================================================================
// Word limiting never exceeds the cap and never invents words
// =============================================================================
proptest! {
    #[test]
    fn word_limit_respects_cap(text in prose(), cap in 0usize..40) {
        let limited = limit_word_count_preserve_newline(&text, cap);
        prop_assert!(word_count(&limited) <= cap);
        prop_assert!(word_count(&limited) <= word_count(&text));
    }
}

// =============================================================================
// Stripping keeps exactly the in-range markers
// =============================================================================
proptest! {
    #[test]
    fn stripped_markers_are_in_range(text in prose(), max in 0usize..9) {
        let (cleaned, kept) = strip_citations_above(&text, max);
        for n in parse_citation_indices(&cleaned) {
            prop_assert!(n >= 1 && n <= max);
            prop_assert!(kept.contains(&n));
        }
        let distinct: std::collections::BTreeSet<usize> =
            parse_citation_indices(&cleaned).into_iter().collect();
        prop_assert_eq!(kept.len(), distinct.len());
    }
}

// =============================================================================
// Identity remap is a no-op; empty remap equals removal
// =============================================================================
proptest! {
    #[test]
    fn identity_remap_is_noop(text in prose()) {
        let identity: HashMap<usize, usize> = (1..10).map(|n| (n, n)).collect();
        prop_assert_eq!(remap_citations(&text, &identity), text.clone());
        prop_assert_eq!(remap_citations(&text, &HashMap::new()), remove_citations(&text));
    }
}

// =============================================================================
// Fragment trimming is idempotent
// =============================================================================
proptest! {
    #[test]
    fn trimming_is_idempotent(text in prose()) {
        let once = trim_trailing_fragment(&text);
        prop_assert_eq!(trim_trailing_fragment(&once), once.clone());
    }
}
