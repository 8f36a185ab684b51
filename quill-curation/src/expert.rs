//! The topic-expert role: answers a question from searched evidence.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use quill_core::constants::{CANNOT_ANSWER, EXPERT_INFO_WORD_LIMIT, NO_INFORMATION_ANSWER};
use quill_core::models::{CallKind, LmRequest};
use quill_core::text::{
    limit_word_count_preserve_newline, remove_uncompleted_sentences_with_citations,
};
use quill_core::traits::{ILanguageModel, IRetrievalBackend};
use quill_core::Information;
use regex::Regex;
use tracing::{debug, warn};

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").unwrap());

const QUERY_INSTRUCTIONS: &str = "You want to answer the question using Google search. What do you type in the search box?\n\
Write the queries you will use in the following format:\n- query 1\n- query 2\n...\n- query n";

const ANSWER_INSTRUCTIONS: &str = "You are an expert who can use information effectively. You are chatting with a \
Wikipedia writer who wants to write a Wikipedia page on topic you know. You have gathered the related information and \
will now use the information to form a response.\n\
Make your response as informative as possible, ensuring that every sentence is supported by the gathered information. \
If the gathered information is not directly related to the topic or question, provide the most relevant answer based on the available information. \
If no appropriate answer can be formulated, respond with \"I cannot answer this question based on the available information\" and explain any limitations or gaps.\n\
Use [1], [2], ..., [n] in line to cite the sources.";

/// What the expert did for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpertAnswer {
    pub queries: Vec<String>,
    pub results: Vec<Information>,
    pub answer: String,
}

pub struct TopicExpert {
    model: Arc<dyn ILanguageModel>,
    backend: Arc<dyn IRetrievalBackend>,
    max_queries: usize,
    search_top_k: usize,
    exclude_urls: Vec<String>,
}

impl TopicExpert {
    pub fn new(
        model: Arc<dyn ILanguageModel>,
        backend: Arc<dyn IRetrievalBackend>,
        max_queries: usize,
        search_top_k: usize,
    ) -> Self {
        Self {
            model,
            backend,
            max_queries,
            search_top_k,
            exclude_urls: Vec::new(),
        }
    }

    /// Never return results from `url` (the ground-truth page, when known).
    pub fn excluding(mut self, url: impl Into<String>) -> Self {
        self.exclude_urls.push(url.into());
        self
    }

    /// Answer `question`. Never fails: search problems yield the
    /// no-information reply and a failed synthesis the cannot-answer reply.
    pub fn answer(&self, topic: &str, question: &str) -> ExpertAnswer {
        let queries = self.queries_for(topic, question);
        let results = match self.backend.search(&queries, self.search_top_k, &self.exclude_urls) {
            Ok(results) => results,
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "expert search failed");
                Vec::new()
            }
        };
        debug!(queries = queries.len(), hits = results.len(), "expert search done");

        if results.is_empty() {
            return ExpertAnswer {
                queries,
                results,
                answer: NO_INFORMATION_ANSWER.to_string(),
            };
        }

        let answer = self.synthesize(topic, question, &results);
        ExpertAnswer {
            queries,
            results,
            answer,
        }
    }

    fn queries_for(&self, topic: &str, question: &str) -> Vec<String> {
        let request = LmRequest::new(CallKind::QueryGeneration, QUERY_INSTRUCTIONS, "Queries")
            .field("Topic you are discussing about", topic)
            .field("Question you want to answer", question);
        let queries = match self.model.generate(&request) {
            Ok(output) => parse_queries(&request.strip_output_label(&output), self.max_queries),
            Err(e) => {
                warn!(error = %e, "query generation failed, searching the question itself");
                Vec::new()
            }
        };
        if queries.is_empty() {
            vec![question.trim().to_string()]
        } else {
            queries
        }
    }

    fn synthesize(&self, topic: &str, question: &str, results: &[Information]) -> String {
        let info = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}]: {}", i + 1, r.first_snippet()))
            .collect::<Vec<_>>()
            .join("\n\n");
        let info = limit_word_count_preserve_newline(&info, EXPERT_INFO_WORD_LIMIT);

        let request =
            LmRequest::new(CallKind::AnswerSynthesis, ANSWER_INSTRUCTIONS, "Now give your response")
                .field("Topic you are discussing about", topic)
                .field("Question", question)
                .field("Gathered information", info);
        match self.model.generate(&request) {
            Ok(output) => {
                let answer = request.strip_output_label(&output);
                let answer = remove_uncompleted_sentences_with_citations(&answer);
                if answer.is_empty() {
                    CANNOT_ANSWER.to_string()
                } else {
                    answer
                }
            }
            Err(e) => {
                warn!(error = %e, "answer synthesis failed");
                CANNOT_ANSWER.to_string()
            }
        }
    }
}

/// Search queries from a completion: list markers and quotes stripped,
/// blanks and repeats dropped, at most `max` kept.
pub fn parse_queries(text: &str, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(|line| LIST_MARKER.replace(line, "").replace('"', "").trim().to_string())
        .filter(|q| !q.is_empty())
        .filter(|q| seen.insert(q.to_lowercase()))
        .take(max)
        .collect()
}
