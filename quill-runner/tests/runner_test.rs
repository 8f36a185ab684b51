//! End-to-end runs over the reef corpus with a scripted model.

use std::sync::Arc;

use quill_core::config::QuillConfig;
use quill_core::models::CallKind;
use quill_core::text::parse_citation_indices;
use quill_core::QuillError;
use quill_lm::ModelRoles;
use quill_runner::artifacts::names;
use quill_runner::{QuillRunner, RunOptions, StageSwitches};
use test_fixtures::{reef_corpus, InMemoryBackend, ScriptedModel};

const GROUND_TRUTH: &str = "https://wiki.example/Coral_reef";
const OUTLINE: &str = "# Threats\n## Bleaching\n# Economy";

fn test_config() -> QuillConfig {
    let mut config = QuillConfig::default();
    config.max_thread_num = 2;
    config.curation.max_perspective = 2;
    config.retrieval.reranker_threshold = 0.0;
    config.embedding.dimensions = 64;
    config.outline.rating_backoff_ms = 0;
    config
}

fn reef_script() -> ScriptedModel {
    ScriptedModel::new()
        .with_handler(|request| {
            if request.kind != CallKind::SectionWriting {
                return None;
            }
            match request.input("The section you need to write")? {
                "Threats" => Some(
                    "# Threats\nWarm water bleaches coral [1].\n## Bleaching\nMass events hit in 2016 [2]."
                        .into(),
                ),
                "Economy" => Some("Restored reefs draw visitors [2].".into()),
                _ => None,
            }
        })
        .always(CallKind::PersonaGeneration, "1. Marine biologist: studies reef ecology.")
        .always(CallKind::QuestionAsking, "Thank you so much for your help!")
        .always(CallKind::QueryGeneration, "- coral bleaching")
        .always(CallKind::AnswerSynthesis, "Bleaching follows marine heatwaves [1].")
        .always(CallKind::OutlineDrafting, OUTLINE)
        .always(
            CallKind::OutlineRating,
            r#"{"Economy": {"weighted_score": 0.9, "justification": "Often overlooked."}, "Threats": {"weighted_score": 0.5, "justification": "Well covered."}}"#,
        )
        .always(CallKind::OutlineRefinement, OUTLINE)
        .always(CallKind::LeadWriting, "Coral reefs are threatened by warming seas [1].")
}

fn runner(model: Arc<ScriptedModel>, config: QuillConfig) -> QuillRunner {
    QuillRunner::new(
        config,
        ModelRoles::uniform(model),
        Arc::new(InMemoryBackend::new(reef_corpus())),
    )
}

// ---- Full pipeline ----

#[test]
fn full_run_produces_article_and_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(reef_script());
    let runner = runner(model.clone(), test_config());
    let options = RunOptions {
        ground_truth_url: Some(GROUND_TRUTH.to_string()),
        ..RunOptions::for_topic("Coral reef").with_output_dir(dir.path().join("coral"))
    };

    let output = runner.run(&options).unwrap();

    assert_eq!(output.topic, "Coral reef");
    assert_eq!(output.conversations.len(), 2);
    assert!(output.conversations.iter().all(|c| c.dlg_turns.len() == 1));
    assert_eq!(output.information_table.len(), 2);
    assert!(output.information_table.get(GROUND_TRUTH).is_none());

    let outline = output.outline.as_ref().unwrap();
    assert!(outline.direct_outline.contains("# Threats"));
    assert!(outline.rated_outline.starts_with("# Economy"));
    assert_eq!(outline.outline, OUTLINE);

    let draft = output.draft.as_ref().unwrap();
    assert_eq!(draft.get_first_level_section_names(), vec!["Threats", "Economy"]);
    assert_eq!(draft.find_section("Bleaching").unwrap().content, "Mass events hit in 2016 [2].");

    let article = output.article.as_ref().unwrap();
    assert_eq!(article.topic(), "Coral reef");
    assert_eq!(article.root.children[0].name, "summary");
    let text = article.to_string();
    for index in parse_citation_indices(&text) {
        assert!(article.reference.info_for_index(index).is_some(), "dangling citation [{index}]");
    }

    let out = dir.path().join("coral");
    for name in [
        names::RUN_CONFIG,
        names::CONVERSATION_LOG,
        names::RAW_SEARCH_RESULTS,
        names::DIRECT_OUTLINE,
        names::RATED_OUTLINE,
        names::OUTLINE,
        names::OUTLINE_PLAIN,
        names::OUTLINE_RATING,
        names::ARTICLE,
        names::POLISHED_ARTICLE,
        names::REFERENCES,
        names::LM_HISTORY,
        names::QUERY_LOG,
    ] {
        assert!(out.join(name).exists(), "missing artifact {name}");
    }

    let run_config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join(names::RUN_CONFIG)).unwrap())
            .unwrap();
    assert_eq!(run_config["run_id"], output.run_id.as_str());
    assert_eq!(run_config["topic"], "Coral reef");
    assert_eq!(run_config["models"]["polish"], "scripted");

    let rated = std::fs::read_to_string(out.join(names::RATED_OUTLINE)).unwrap();
    assert_eq!(rated, outline.rated_outline);
    let plain = std::fs::read_to_string(out.join(names::OUTLINE_PLAIN)).unwrap();
    assert_eq!(plain, "Threats\nBleaching\nEconomy");

    let history = std::fs::read_to_string(out.join(names::LM_HISTORY)).unwrap();
    assert_eq!(history.lines().count(), model.calls().len());
    assert_eq!(runner.history().len(), model.calls().len());

    let polished = std::fs::read_to_string(out.join(names::POLISHED_ARTICLE)).unwrap();
    assert_eq!(polished, text);
    assert!(runner.query_log().count() > 0);
}

#[test]
fn run_without_output_dir_still_records_history() {
    let model = Arc::new(reef_script());
    let runner = runner(model.clone(), test_config());

    let output = runner.run(&RunOptions::for_topic("Coral reef")).unwrap();

    assert!(output.article.is_some());
    assert_eq!(runner.history().len(), model.calls().len());
}

// ---- Input validation and topic resolution ----

#[test]
fn empty_input_is_rejected_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(ScriptedModel::new());
    let runner = runner(model.clone(), test_config());
    let options = RunOptions {
        topic: Some("   ".to_string()),
        text_input: Some("\n".to_string()),
        ..RunOptions::default().with_output_dir(dir.path().join("never"))
    };

    assert!(matches!(runner.run(&options), Err(QuillError::EmptyInput)));
    assert!(model.calls().is_empty());
    assert!(!dir.path().join("never").exists());
}

#[test]
fn topic_is_derived_from_text_input() {
    let model =
        Arc::new(ScriptedModel::new().respond(CallKind::TopicImprovement, "Topic: Coral reef"));
    let runner = runner(model.clone(), test_config());
    let options = RunOptions {
        text_input: Some("Reefs cover less than one percent of the ocean floor.".to_string()),
        stages: StageSwitches {
            research: false,
            outline: false,
            article: true,
            polish: true,
        },
        ..RunOptions::default()
    };

    let output = runner.run(&options).unwrap();

    assert_eq!(output.topic, "Coral reef");
    assert!(output.outline.is_none());
    assert!(output.draft.is_none());
    assert!(output.article.is_none());
    assert_eq!(model.calls().len(), 1);
}

#[test]
fn failed_topic_improvement_keeps_the_topic() {
    let model = Arc::new(ScriptedModel::new());
    let runner = runner(model.clone(), test_config());
    let options = RunOptions {
        improve_topic: true,
        stages: StageSwitches {
            research: false,
            outline: false,
            article: false,
            polish: false,
        },
        ..RunOptions::for_topic("Coral reef")
    };

    let output = runner.run(&options).unwrap();

    assert_eq!(output.topic, "Coral reef");
    assert_eq!(model.calls_of(CallKind::TopicImprovement).len(), 1);
}

// ---- Stage switches ----

#[test]
fn article_without_research_has_no_references() {
    let model = Arc::new(reef_script());
    let runner = runner(model.clone(), test_config());
    let options = RunOptions {
        stages: StageSwitches {
            research: false,
            ..StageSwitches::default()
        },
        ..RunOptions::for_topic("Coral reef")
    };

    let output = runner.run(&options).unwrap();

    assert!(output.conversations.is_empty());
    assert!(output.information_table.is_empty());
    assert!(model.calls_of(CallKind::QuestionAsking).is_empty());
    let draft = output.draft.unwrap();
    assert!(draft.reference.is_empty());
    assert!(parse_citation_indices(&draft.to_string()).is_empty());
    assert!(output.article.is_some());
}
