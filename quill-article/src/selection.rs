//! Which outline sections get their own generation call, and what each call
//! searches for.
//!
//! A section is written by one call together with its immediate leaf
//! subsections, so the units are the sections that have at least one leaf
//! child. In an outline at most two levels deep this is every level-1
//! section with children. Level-1 sections without children are units of
//! their own. A unit's outline leaves out descendants that are units
//! themselves, so no section is written by two calls.

use std::collections::HashSet;

use crate::article::{Article, ArticleSection};

/// One unit of section generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTask {
    pub name: String,
    /// `None` when the section sits directly under the root.
    pub parent: Option<String>,
    /// 1 for level-1 sections.
    pub depth: usize,
    pub queries: Vec<String>,
    /// The section's subtree as `#` headings, the section itself at level 1.
    pub outline: String,
}

pub fn select_sections(article: &Article) -> Vec<SectionTask> {
    let mut tasks = Vec::new();
    for child in &article.root.children {
        collect(child, None, 1, &mut tasks);
    }
    tasks
}

fn collect(
    node: &ArticleSection,
    parent: Option<&str>,
    depth: usize,
    tasks: &mut Vec<SectionTask>,
) {
    if has_leaf_child(node) || (depth == 1 && node.is_leaf()) {
        tasks.push(SectionTask {
            name: node.name.clone(),
            parent: parent.map(str::to_string),
            depth,
            queries: section_queries(node, depth),
            outline: subtree_outline(node),
        });
    }
    for child in &node.children {
        collect(child, Some(&node.name), depth + 1, tasks);
    }
}

/// The section's own name, then for a level-1 section every heading of its
/// subtree, or for a deeper section its leaf children and the deepest
/// headings of its subtree. Repeats are dropped.
pub fn section_queries(node: &ArticleSection, depth: usize) -> Vec<String> {
    let mut candidates = vec![node.name.clone()];
    if depth <= 1 {
        candidates.extend(subtree_names(node));
    } else {
        candidates.extend(node.children.iter().filter(|c| c.is_leaf()).map(|c| c.name.clone()));
        candidates.extend(deepest_names(node));
    }
    let mut seen = HashSet::new();
    candidates.retain(|q| seen.insert(q.clone()));
    candidates
}

fn subtree_names(node: &ArticleSection) -> Vec<String> {
    let mut out = vec![node.name.clone()];
    for child in &node.children {
        out.extend(subtree_names(child));
    }
    out
}

/// Names of the descendants at the greatest depth below `node`.
fn deepest_names(node: &ArticleSection) -> Vec<String> {
    let height = node.height();
    let mut out = Vec::new();
    fn walk(node: &ArticleSection, remaining: usize, out: &mut Vec<String>) {
        for child in &node.children {
            if remaining == 1 {
                out.push(child.name.clone());
            } else {
                walk(child, remaining - 1, out);
            }
        }
    }
    if height > 0 {
        walk(node, height, &mut out);
    }
    out
}

fn has_leaf_child(node: &ArticleSection) -> bool {
    node.children.iter().any(ArticleSection::is_leaf)
}

/// `node` and its descendants as headings, minus the subtrees of nested units.
fn subtree_outline(node: &ArticleSection) -> String {
    let mut lines = Vec::new();
    fn walk(node: &ArticleSection, level: usize, lines: &mut Vec<String>) {
        lines.push(format!("{} {}", "#".repeat(level), node.name));
        for child in node.children.iter().filter(|c| !has_leaf_child(c)) {
            walk(child, level + 1, lines);
        }
    }
    walk(node, 1, &mut lines);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tasks: &[SectionTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn two_level_outline_selects_every_first_level_section() {
        let article = Article::from_outline_str("t", "# A\n## A1\n## A2\n# B\n# C\n## C1");
        let tasks = select_sections(&article);
        assert_eq!(names(&tasks), vec!["A", "B", "C"]);
        assert!(tasks.iter().all(|t| t.parent.is_none()));
        assert_eq!(tasks[0].queries, vec!["A", "A1", "A2"]);
        assert_eq!(tasks[0].outline, "# A\n## A1\n## A2");
    }

    #[test]
    fn deeper_outline_targets_lowest_non_leaf_sections() {
        let article = Article::from_outline_str(
            "t",
            "# A\n## A1\n### A1a\n### A1b\n## A2\n# B\n## B1\n### B1x\n#### B1x-deep",
        );
        let tasks = select_sections(&article);
        assert_eq!(names(&tasks), vec!["A", "A1", "B1x"]);
        let a1 = &tasks[1];
        assert_eq!(a1.parent.as_deref(), Some("A"));
        assert_eq!(a1.depth, 2);
        assert_eq!(a1.queries, vec!["A1", "A1a", "A1b"]);
        // Level-1 sections query their whole subtree.
        assert_eq!(tasks[0].queries, vec!["A", "A1", "A1a", "A1b", "A2"]);
    }

    #[test]
    fn nested_units_are_left_out_of_the_enclosing_outline() {
        let article = Article::from_outline_str(
            "t",
            "# A\n## A1\n### A1a\n## A2\n# B\n## B1\n### B1x\n#### deep",
        );
        let tasks = select_sections(&article);
        assert_eq!(names(&tasks), vec!["A", "A1", "B1x"]);
        assert_eq!(tasks[0].outline, "# A\n## A2");
        assert_eq!(tasks[1].outline, "# A1\n## A1a");
        assert_eq!(tasks[2].outline, "# B1x\n## deep");
    }

    #[test]
    fn deepest_scan_reaches_below_leaf_children() {
        let article = Article::from_outline_str("t", "# R\n## S\n### leaf\n### mid\n#### deepest");
        let s = article.find_section("S").unwrap();
        assert_eq!(section_queries(s, 2), vec!["S", "leaf", "deepest"]);
    }
}
