use serde::{Deserialize, Serialize};

/// Every structured generation call the pipeline makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    TopicImprovement,
    RelatedTopics,
    PersonaGeneration,
    QuestionAsking,
    QueryGeneration,
    AnswerSynthesis,
    OutlineDrafting,
    OutlineRating,
    OutlineRefinement,
    QueryRewriting,
    SectionWriting,
    LeadWriting,
    Polishing,
    TitleGeneration,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopicImprovement => "topic_improvement",
            Self::RelatedTopics => "related_topics",
            Self::PersonaGeneration => "persona_generation",
            Self::QuestionAsking => "question_asking",
            Self::QueryGeneration => "query_generation",
            Self::AnswerSynthesis => "answer_synthesis",
            Self::OutlineDrafting => "outline_drafting",
            Self::OutlineRating => "outline_rating",
            Self::OutlineRefinement => "outline_refinement",
            Self::QueryRewriting => "query_rewriting",
            Self::SectionWriting => "section_writing",
            Self::LeadWriting => "lead_writing",
            Self::Polishing => "polishing",
            Self::TitleGeneration => "title_generation",
        }
    }
}

/// A structured generation call: instructions, named input fields, and the
/// name of the single output field expected back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmRequest {
    pub kind: CallKind,
    pub instructions: String,
    pub inputs: Vec<(String, String)>,
    pub output_field: String,
    /// Overrides the model's configured max tokens.
    pub max_tokens: Option<u32>,
}

impl LmRequest {
    pub fn new(
        kind: CallKind,
        instructions: impl Into<String>,
        output_field: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            instructions: instructions.into(),
            inputs: Vec::new(),
            output_field: output_field.into(),
            max_tokens: None,
        }
    }

    /// Add a named input field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.push((name.into(), value.into()));
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Value of input field `name`, if present.
    pub fn input(&self, name: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Render the user-side prompt: one `Name: value` block per input field,
    /// then the output field's label for the model to complete.
    pub fn render_prompt(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.inputs {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value.trim());
            out.push_str("\n\n");
        }
        out.push_str(&self.output_field);
        out.push(':');
        out
    }

    /// Strip an echoed output label (`Output field:`) from a completion.
    pub fn strip_output_label(&self, completion: &str) -> String {
        let trimmed = completion.trim();
        let label = format!("{}:", self.output_field);
        match trimmed.get(..label.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(&label) => {
                trimmed[label.len()..].trim().to_string()
            }
            _ => trimmed.to_string(),
        }
    }
}
