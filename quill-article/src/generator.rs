//! Section-wise article generation.
//!
//! Every selected section is one unit of work on the bounded pool: rewrite
//! its queries, retrieve evidence from the prepared Evidence Store, and write
//! the section. Results are applied to the article on the calling thread
//! once every unit has finished.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use quill_core::config::GenerationConfig;
use quill_core::constants::SECTION_INFO_WORD_LIMIT;
use quill_core::errors::QuillResult;
use quill_core::models::{CallKind, LmRequest};
use quill_core::parallel::run_bounded;
use quill_core::text::{clean_up_section, heading_level, limit_word_count_preserve_newline};
use quill_core::traits::ILanguageModel;
use quill_core::Information;
use quill_observability::generation_span;
use quill_retrieval::{InformationTable, RetrieveParams};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::article::Article;
use crate::selection::{select_sections, SectionTask};

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").unwrap());

const REWRITE_INSTRUCTIONS: &str = "You are preparing searches for one section of a Wikipedia page. Rewrite the \
given queries so each one is a self-contained web search that mentions the topic. Write one query per line.";

const WRITE_INSTRUCTIONS: &str = "Write a Wikipedia section based on the collected information.\n\
Here is the format of your writing:\n\
1. Use \"#\" Title\" to indicate section title, \"##\" Title\" to indicate subsection title, \"###\" Title\" to indicate subsubsection title, and so on.\n\
2. Use [1], [2], ..., [n] in line (for example, \"The capital of the United States is Washington, D.C.[1][3].\"). \
You DO NOT need to include a References or Sources section to list the sources at the end.";

/// Generated text for one section, ready to be applied.
#[derive(Debug, Clone)]
pub struct SectionOutput {
    pub task: SectionTask,
    pub content: String,
    /// `sources[n - 1]` backs local citation `[n]`.
    pub sources: Vec<Information>,
}

pub struct ArticleGenerator {
    model: Arc<dyn ILanguageModel>,
    config: GenerationConfig,
    max_thread_num: usize,
}

impl ArticleGenerator {
    pub fn new(
        model: Arc<dyn ILanguageModel>,
        config: GenerationConfig,
        max_thread_num: usize,
    ) -> Self {
        Self {
            model,
            config,
            max_thread_num,
        }
    }

    /// Write the article for `outline` from the evidence in `table`, which
    /// must already be prepared.
    pub fn generate(&self, topic: &str, outline: &str, table: &InformationTable) -> Article {
        let mut article = Article::from_outline_str(topic, outline);
        let tasks: Vec<SectionTask> = select_sections(&article)
            .into_iter()
            .filter(|task| !(self.config.skip_boilerplate_sections && is_boilerplate(&task.name)))
            .collect();
        info!(topic, sections = tasks.len(), "article generation started");

        let outcomes = run_bounded(
            tasks,
            self.max_thread_num,
            |task| task.name.clone(),
            |task| self.write_section(topic, task, table),
        );

        let mut written = 0usize;
        for outcome in outcomes {
            match outcome.result {
                Ok(output) => {
                    let parent = output.task.parent.as_deref();
                    if article.update_section(parent, &output.content, &output.sources) {
                        written += 1;
                    } else {
                        warn!(
                            section = %output.task.name,
                            "parent section missing, generated text dropped"
                        );
                    }
                }
                Err(e) => warn!(section = %outcome.label, error = %e, "section generation failed"),
            }
        }

        article.post_processing();
        info!(
            topic,
            written,
            references = article.reference.len(),
            "article generation finished"
        );
        article
    }

    /// One unit of work: rewrite queries, retrieve, write.
    pub fn write_section(
        &self,
        topic: &str,
        task: SectionTask,
        table: &InformationTable,
    ) -> QuillResult<SectionOutput> {
        let span = generation_span!(task.name);
        let _guard = span.enter();

        let queries = self.rewrite_queries(topic, &task);
        let sources = table.retrieve(
            &queries,
            RetrieveParams {
                initial_k: self.config.initial_retrieval_k,
                final_k: self.config.final_context_k,
            },
        );
        debug!(queries = queries.len(), sources = sources.len(), "section evidence retrieved");

        let info = sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("[{}]\n{}", i + 1, source.snippets.join("\n")))
            .collect::<Vec<_>>()
            .join("\n\n");
        let info = limit_word_count_preserve_newline(&info, SECTION_INFO_WORD_LIMIT);

        let request = LmRequest::new(CallKind::SectionWriting, WRITE_INSTRUCTIONS, "Section")
            .field("The collected information", info)
            .field("The topic of the page", topic)
            .field("The section you need to write", &task.name)
            .field("Outline of the section", &task.outline);
        let output = self.model.generate(&request)?;
        let content = clean_up_section(&request.strip_output_label(&output));
        let content = attach_heading(&content, &task.name);

        Ok(SectionOutput {
            task,
            content,
            sources,
        })
    }

    /// Rewritten queries, or the originals when the call fails or yields none.
    fn rewrite_queries(&self, topic: &str, task: &SectionTask) -> Vec<String> {
        let request =
            LmRequest::new(CallKind::QueryRewriting, REWRITE_INSTRUCTIONS, "Rewritten queries")
                .field("Topic", topic)
                .field("Section", &task.name)
                .field("Queries", task.queries.join("\n"));
        match self.model.generate(&request) {
            Ok(output) => {
                let rewritten = parse_rewritten(&output);
                if rewritten.is_empty() {
                    task.queries.clone()
                } else {
                    rewritten
                }
            }
            Err(e) => {
                warn!(
                    section = %task.name,
                    error = %e,
                    "query rewrite failed, using original queries"
                );
                task.queries.clone()
            }
        }
    }
}

fn parse_rewritten(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .lines()
        .filter(|line| !line.to_lowercase().contains("rewritten queries:"))
        .map(|line| LIST_MARKER.replace(line, "").replace('"', "").trim().to_string())
        .filter(|q| !q.is_empty())
        .filter(|q| seen.insert(q.clone()))
        .collect()
}

/// Make sure the text opens with the section's own heading. Headings the
/// model wrote for other sections are pushed one level down.
fn attach_heading(content: &str, name: &str) -> String {
    let first_heading = content.lines().find_map(heading_level);
    match first_heading {
        Some((_, title)) if title == name => content.to_string(),
        Some(_) => {
            let min_level = content
                .lines()
                .filter_map(heading_level)
                .map(|(level, _)| level)
                .min()
                .unwrap_or(1);
            let shift = 2usize.saturating_sub(min_level);
            let body = content
                .lines()
                .map(|line| match heading_level(line) {
                    Some((level, title)) => format!("{} {}", "#".repeat(level + shift), title),
                    None => line.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("# {name}\n{body}")
        }
        None => format!("# {name}\n{content}"),
    }
}

fn is_boilerplate(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    name == "introduction" || name.starts_with("conclusion") || name.starts_with("summary")
}
