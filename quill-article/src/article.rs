//! The article tree.
//!
//! An article is a tree of named sections under a root named for the topic,
//! plus a [`ReferenceMap`]. Sibling names are unique and serve as the join
//! key for updates; lookups are depth-first by exact name.

use std::collections::{BTreeSet, HashMap};

use quill_core::constants::SUMMARY_SECTION_NAME;
use quill_core::text::{
    heading_level, parse_citation_indices, parse_document, remap_citations, strip_citations_above,
    SectionDraft,
};
use quill_core::Information;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::references::ReferenceMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSection {
    pub name: String,
    pub content: String,
    pub children: Vec<ArticleSection>,
}

impl ArticleSection {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&ArticleSection> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth-first search of this subtree, self included.
    pub fn find(&self, name: &str) -> Option<&ArticleSection> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut ArticleSection> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Number of levels below this section (0 for a leaf).
    pub fn height(&self) -> usize {
        self.children.iter().map(|c| c.height() + 1).max().unwrap_or(0)
    }

    fn add_child(&mut self, child: ArticleSection, to_front: bool) {
        if to_front {
            self.children.insert(0, child);
        } else {
            self.children.push(child);
        }
    }

    fn preorder<'a>(&'a self, level: usize, out: &mut Vec<(usize, &'a ArticleSection)>) {
        out.push((level, self));
        for child in &self.children {
            child.preorder(level + 1, out);
        }
    }

    fn for_each_mut(&mut self, f: &mut impl FnMut(&mut ArticleSection)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }

    /// Drop descendants with no content and no remaining children.
    fn prune(&mut self) {
        for child in &mut self.children {
            child.prune();
        }
        self.children
            .retain(|c| !c.content.trim().is_empty() || !c.children.is_empty());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub root: ArticleSection,
    pub reference: ReferenceMap,
}

impl Article {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            root: ArticleSection::new(topic, ""),
            reference: ReferenceMap::new(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.root.name
    }

    /// Skeleton article from an outline. A leading heading naming the topic
    /// is skipped.
    pub fn from_outline_str(topic: &str, outline: &str) -> Self {
        let mut lines: Vec<&str> = outline.lines().filter(|l| !l.trim().is_empty()).collect();
        if let Some((_, title)) = lines.first().and_then(|l| heading_level(l)) {
            if title.eq_ignore_ascii_case(topic.trim()) {
                lines.remove(0);
            }
        }
        let (_, sections) = parse_document(&lines.join("\n"));
        let mut article = Self::new(topic);
        insert_drafts(&mut article.root, sections, true, false);
        article
    }

    /// Article from a full text dump and its reference map. Text before the
    /// first heading becomes the root's content.
    pub fn from_string(topic: &str, text: &str, reference: ReferenceMap) -> Self {
        let (preamble, sections) = parse_document(text);
        let mut article = Self::new(topic);
        article.root.content = preamble;
        insert_drafts(&mut article.root, sections, true, false);
        article.reference = reference;
        article
    }

    pub fn find_section(&self, name: &str) -> Option<&ArticleSection> {
        self.root.find(name)
    }

    /// Insert `drafts` under the section named `parent` (the root when
    /// `None`). Same-name children are updated in place, new ones appended;
    /// a `summary` section under the root goes first. With `trim_children`,
    /// children of each updated section that the drafts do not mention are
    /// removed. Returns false when `parent` does not exist.
    pub fn insert_or_create_section(
        &mut self,
        parent: Option<&str>,
        drafts: Vec<SectionDraft>,
        trim_children: bool,
    ) -> bool {
        let is_root = parent.map_or(true, |name| name == self.root.name);
        let node = match parent {
            None => &mut self.root,
            Some(name) => match self.root.find_mut(name) {
                Some(node) => node,
                None => return false,
            },
        };
        insert_drafts(node, drafts, is_root, trim_children);
        true
    }

    /// Place newly generated section text under `parent`.
    ///
    /// Local citations `[n]` refer to `sources[n - 1]`. Markers beyond
    /// `sources.len()` are stripped, the cited sources are merged into the
    /// reference map and the markers rewritten to global indices. Returns
    /// false, leaving the article untouched, when `parent` does not exist.
    pub fn update_section(
        &mut self,
        parent: Option<&str>,
        content: &str,
        sources: &[Information],
    ) -> bool {
        if let Some(name) = parent {
            if self.find_section(name).is_none() {
                warn!(parent = name, "parent section not found, update skipped");
                return false;
            }
        }
        let (content, keep) = strip_citations_above(content, sources.len());
        let mapping = self.reference.merge(sources, &keep);
        let content = remap_citations(&content, &mapping);
        let (_, drafts) = parse_document(&content);
        debug!(
            parent = parent.unwrap_or(self.topic()),
            sections = drafts.len(),
            cited = mapping.len(),
            "section update"
        );
        self.insert_or_create_section(parent, drafts, false)
    }

    /// Renumber citations by first appearance in a preorder walk. Markers
    /// with no reference are stripped and uncited references dropped.
    /// Idempotent once citations are canonical.
    pub fn reorder_reference_index(&mut self) {
        let mut order: Vec<usize> = Vec::new();
        let mut seen = BTreeSet::new();
        let known: BTreeSet<usize> =
            self.reference.url_to_unified_index.values().copied().collect();
        for (_, section) in self.sections_preorder_with_root() {
            for index in parse_citation_indices(&section.content) {
                if known.contains(&index) && seen.insert(index) {
                    order.push(index);
                }
            }
        }
        let mapping: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(new, old)| (*old, new + 1))
            .collect();

        self.root.for_each_mut(&mut |section: &mut ArticleSection| {
            section.content = remap_citations(&section.content, &mapping);
        });
        self.reference.renumber(&mapping);
    }

    /// Every section except the root, in preorder, with its level (top = 1).
    pub fn sections_preorder(&self) -> Vec<(usize, &ArticleSection)> {
        let mut out = Vec::new();
        for child in &self.root.children {
            child.preorder(1, &mut out);
        }
        out
    }

    fn sections_preorder_with_root(&self) -> Vec<(usize, &ArticleSection)> {
        let mut out = Vec::new();
        self.root.preorder(0, &mut out);
        out
    }

    /// Section names in preorder, starting at `section` (the root when
    /// `None`). Returns nothing when `section` does not exist.
    pub fn get_outline_as_list(
        &self,
        section: Option<&str>,
        add_hashtags: bool,
        include_root: bool,
    ) -> Vec<String> {
        let node = match section {
            None => &self.root,
            Some(name) => match self.find_section(name) {
                Some(node) => node,
                None => return Vec::new(),
            },
        };
        let mut walk = Vec::new();
        if include_root {
            node.preorder(1, &mut walk);
        } else {
            for child in &node.children {
                child.preorder(1, &mut walk);
            }
        }
        walk.into_iter()
            .map(|(level, s)| {
                if add_hashtags {
                    format!("{} {}", "#".repeat(level), s.name)
                } else {
                    s.name.clone()
                }
            })
            .collect()
    }

    /// The outline with `#` markers, root excluded.
    pub fn outline_string(&self) -> String {
        self.get_outline_as_list(None, true, false).join("\n")
    }

    pub fn get_first_level_section_names(&self) -> Vec<String> {
        self.root.children.iter().map(|c| c.name.clone()).collect()
    }

    /// Remove sections with no content and no children.
    pub fn prune_empty_nodes(&mut self) {
        self.root.prune();
    }

    /// Final cleanup: prune empty sections, then canonicalize citations.
    pub fn post_processing(&mut self) {
        self.prune_empty_nodes();
        self.reorder_reference_index();
    }

    /// Sources in citation order.
    pub fn cited_sources(&self) -> Vec<(usize, &Information)> {
        let mut cited: Vec<(usize, &Information)> = self
            .reference
            .url_to_unified_index
            .iter()
            .filter_map(|(url, i)| self.reference.url_to_info.get(url).map(|info| (*i, info)))
            .collect();
        cited.sort_by_key(|(i, _)| *i);
        cited
    }
}

impl std::fmt::Display for Article {
    /// Root content, then every section as `#…# name` followed by its
    /// content, blocks separated by blank lines.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut blocks: Vec<String> = Vec::new();
        blocks.push(self.root.content.trim().to_string());
        for (level, section) in self.sections_preorder() {
            blocks.push(format!("{} {}", "#".repeat(level), section.name).trim().to_string());
            blocks.push(section.content.trim().to_string());
        }
        let blocks: Vec<String> = blocks.into_iter().filter(|b| !b.is_empty()).collect();
        write!(f, "{}", blocks.join("\n\n"))
    }
}

fn insert_drafts(
    parent: &mut ArticleSection,
    drafts: Vec<SectionDraft>,
    is_root: bool,
    trim_children: bool,
) {
    for draft in drafts {
        insert_draft(parent, draft, is_root, trim_children);
    }
}

fn insert_draft(
    parent: &mut ArticleSection,
    draft: SectionDraft,
    is_root: bool,
    trim_children: bool,
) {
    let SectionDraft { name, content, children } = draft;
    let index = match parent.children.iter().position(|c| c.name == name) {
        Some(i) => {
            parent.children[i].content = content.trim().to_string();
            i
        }
        None => {
            let to_front = is_root && name == SUMMARY_SECTION_NAME;
            parent.add_child(ArticleSection::new(name, content.trim()), to_front);
            if to_front {
                0
            } else {
                parent.children.len() - 1
            }
        }
    };
    let node = &mut parent.children[index];
    if trim_children {
        let mentioned: BTreeSet<&str> = children.iter().map(|c| c.name.as_str()).collect();
        node.children.retain(|c| mentioned.contains(c.name.as_str()));
    }
    insert_drafts(node, children, false, trim_children);
}
