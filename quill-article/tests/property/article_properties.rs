//! Property tests for citation renumbering, text round trips and reference
//! merging.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use quill_article::{Article, ArticleSection, ReferenceMap};
use quill_core::text::parse_citation_indices;
use quill_core::Information;

fn source(i: usize) -> Information {
    Information::new(
        format!("https://src.example/{i}"),
        format!("Source {i}"),
        "",
        vec![format!("fact {i}")],
    )
}

/// Sentences citing indices in `1..=sources`, possibly with unknown ones.
fn cited_text(citations: &[usize]) -> String {
    citations
        .iter()
        .map(|c| format!("Claim {c} [{c}]."))
        .collect::<Vec<_>>()
        .join(" ")
}

fn cited_article(sources: usize, sections: &[Vec<usize>]) -> Article {
    let refs: Vec<Information> = (1..=sources).map(source).collect();
    let text = sections
        .iter()
        .enumerate()
        .map(|(i, cites)| format!("# S{i}\n{}", cited_text(cites)))
        .collect::<Vec<_>>()
        .join("\n\n");
    Article::from_string("Topic", &text, ReferenceMap::from_sources(&refs))
}

fn sections_strategy() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (1usize..6).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(prop::collection::vec(1usize..=n + 1, 0..5), 1..5),
        )
    })
}

// =============================================================================
// Renumbering: dense, first-appearance ordered, idempotent
// =============================================================================

proptest! {
    #[test]
    fn renumbering_is_idempotent((n, sections) in sections_strategy()) {
        let mut article = cited_article(n, &sections);
        article.reorder_reference_index();
        let once = article.clone();
        article.reorder_reference_index();
        prop_assert_eq!(article, once);
    }

    #[test]
    fn renumbered_citations_are_dense_and_ordered((n, sections) in sections_strategy()) {
        let mut article = cited_article(n, &sections);
        article.reorder_reference_index();

        let mut first_seen = Vec::new();
        let mut seen = HashSet::new();
        for index in parse_citation_indices(&article.to_string()) {
            if seen.insert(index) {
                first_seen.push(index);
            }
        }
        let expected: Vec<usize> = (1..=article.reference.len()).collect();
        prop_assert_eq!(first_seen, expected);
        prop_assert_eq!(article.reference.url_to_info.len(), article.reference.len());
    }
}

// =============================================================================
// Text round trip: rendering then parsing rebuilds the tree
// =============================================================================

/// Section names may contain or end with `#` (`c#`, `f#x`); words always
/// start with a letter so a name never ends in a closing `#` run.
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z#+]{0,5}( [a-z][a-z#+]{0,5}){0,2}"
}

/// Body lines may start with a `#` glued to text, like `#1 cause.`
fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("#{0,2}[a-z0-9]{1,8}( [a-z#]{1,8}){0,4}\\.", 1..3)
        .prop_map(|lines| lines.join("\n"))
}

type Tree = Vec<((String, String), Vec<(String, String)>)>;

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let children = prop::collection::vec((name_strategy(), content_strategy()), 0..3);
    prop::collection::vec(((name_strategy(), content_strategy()), children), 1..5)
}

/// Sibling names get a positional prefix so they stay distinct.
fn build_article(tree: &Tree) -> Article {
    let mut article = Article::new("Topic");
    for (i, ((name, content), children)) in tree.iter().enumerate() {
        let mut section = ArticleSection::new(format!("{i}{name}"), content.clone());
        for (j, (child_name, child)) in children.iter().enumerate() {
            section
                .children
                .push(ArticleSection::new(format!("{i}x{j}{child_name}"), child.clone()));
        }
        article.root.children.push(section);
    }
    article
}

proptest! {
    #[test]
    fn rendered_article_parses_back(tree in tree_strategy()) {
        let article = build_article(&tree);
        let parsed = Article::from_string("Topic", &article.to_string(), article.reference.clone());
        prop_assert_eq!(parsed, article);
    }
}

// =============================================================================
// Reference merging: snippets of a repeated URL are unioned
// =============================================================================

proptest! {
    #[test]
    fn repeated_url_unions_snippets(
        first in prop::collection::vec("[a-c]{1,2}", 1..4),
        second in prop::collection::vec("[a-c]{1,2}", 1..4),
    ) {
        let url = "https://src.example/shared";
        let mut map = ReferenceMap::new();
        map.merge(&[Information::new(url, "t", "", first.clone())], &BTreeSet::from([1]));
        let mapping =
            map.merge(&[Information::new(url, "t", "", second.clone())], &BTreeSet::from([1]));

        prop_assert_eq!(mapping.get(&1), Some(&1));
        prop_assert_eq!(map.len(), 1);
        let merged: BTreeSet<String> = map.url_to_info[url].snippets.iter().cloned().collect();
        let expected: BTreeSet<String> = first.into_iter().chain(second).collect();
        prop_assert_eq!(merged, expected);
    }
}
