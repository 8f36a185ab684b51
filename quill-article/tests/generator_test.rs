//! Section-wise generation against a prepared reef Evidence Store.

use std::sync::Arc;

use quill_article::{ArticleGenerator, SectionTask};
use quill_core::config::GenerationConfig;
use quill_core::models::CallKind;
use quill_core::text::parse_citation_indices;
use quill_observability::QueryLog;
use test_fixtures::{prepared_table, reef_corpus, ScriptedModel};

const SECTION_FIELD: &str = "The section you need to write";

fn section_writer(replies: &'static [(&'static str, &'static str)]) -> ScriptedModel {
    ScriptedModel::new().with_handler(move |request| {
        if request.kind != CallKind::SectionWriting {
            return None;
        }
        let section = request.input(SECTION_FIELD)?;
        replies
            .iter()
            .find(|(name, _)| *name == section)
            .map(|(_, text)| text.to_string())
    })
}

fn generator(
    model: ScriptedModel,
    config: GenerationConfig,
) -> (Arc<ScriptedModel>, ArticleGenerator) {
    let model = Arc::new(model);
    let generator = ArticleGenerator::new(model.clone(), config, 2);
    (model, generator)
}

// ---- Assembly ----

#[test]
fn sections_are_written_and_citations_canonicalized() {
    let (_, generator) = generator(
        section_writer(&[
            (
                "Threats",
                "# Threats\nWarm water [2].\n## Bleaching\nHeat stress [1][9].\n## Overfishing\nFewer fish [2].",
            ),
            ("Economy", "Tourism [1]."),
        ]),
        GenerationConfig::default(),
    );
    let table = prepared_table(reef_corpus(), 0.0);

    let article = generator.generate(
        "Coral reef",
        "# Threats\n## Bleaching\n## Overfishing\n# Economy",
        &table,
    );

    assert_eq!(article.get_first_level_section_names(), vec!["Threats", "Economy"]);
    assert_eq!(article.find_section("Threats").unwrap().content, "Warm water [1].");
    assert_eq!(article.find_section("Bleaching").unwrap().content, "Heat stress [2].");
    assert_eq!(article.find_section("Overfishing").unwrap().content, "Fewer fish [1].");
    assert!(article.find_section("Economy").unwrap().content.starts_with("Tourism ["));

    let text = article.to_string();
    assert!(!text.contains("[9]"));
    let reference_count = article.reference.len();
    assert!((2..=3).contains(&reference_count));
    for index in parse_citation_indices(&text) {
        assert!(index >= 1 && index <= reference_count, "dangling citation [{index}]");
        assert!(article.reference.info_for_index(index).is_some());
    }
}

#[test]
fn failed_section_is_left_out() {
    let (_, generator) = generator(
        section_writer(&[("Threats", "# Threats\nWarm water [1].")]),
        GenerationConfig::default(),
    );
    let table = prepared_table(reef_corpus(), 0.0);

    let article = generator.generate("Coral reef", "# Threats\n# Economy", &table);

    assert!(article.find_section("Threats").is_some());
    assert!(article.find_section("Economy").is_none());
    assert_eq!(article.reference.len(), 1);
}

#[test]
fn boilerplate_sections_are_skipped_when_configured() {
    let config = GenerationConfig {
        skip_boilerplate_sections: true,
        ..GenerationConfig::default()
    };
    let (model, generator) = generator(
        ScriptedModel::new().always(CallKind::SectionWriting, "Reefs formed long ago [1]."),
        config,
    );
    let table = prepared_table(reef_corpus(), 0.0);

    let article =
        generator.generate("Coral reef", "# Introduction\n# History\n# Conclusion", &table);

    let written: Vec<String> = model
        .calls_of(CallKind::SectionWriting)
        .iter()
        .filter_map(|c| c.input(SECTION_FIELD).map(str::to_string))
        .collect();
    assert_eq!(written, vec!["History"]);
    assert_eq!(article.get_first_level_section_names(), vec!["History"]);
}

// ---- Retrieval ----

#[test]
fn rewritten_queries_drive_retrieval() {
    let log = Arc::new(QueryLog::new());
    let table = prepared_table(reef_corpus(), 0.0).with_query_logger(log.clone());
    let (model, generator) = generator(
        ScriptedModel::new()
            .respond(CallKind::QueryRewriting, "Rewritten queries:\n- reef heat stress")
            .always(CallKind::SectionWriting, "Heat kills coral [1]."),
        GenerationConfig::default(),
    );

    generator.generate("Coral reef", "# Threats", &table);

    let queries: Vec<String> = log.entries().into_iter().map(|e| e.query).collect();
    assert_eq!(queries, vec!["reef heat stress"]);
    let prompt = &model.calls_of(CallKind::SectionWriting)[0];
    assert!(prompt.input("The collected information").unwrap().starts_with("[1]\n"));
}

#[test]
fn failed_rewrite_falls_back_to_outline_queries() {
    let log = Arc::new(QueryLog::new());
    let table = prepared_table(reef_corpus(), 0.0).with_query_logger(log.clone());
    let (_, generator) = generator(
        ScriptedModel::new().always(CallKind::SectionWriting, "Text [1]."),
        GenerationConfig::default(),
    );

    generator.generate("Coral reef", "# Threats\n## Bleaching", &table);

    let queries: Vec<String> = log.entries().into_iter().map(|e| e.query).collect();
    assert_eq!(queries, vec!["Threats", "Bleaching"]);
}

#[test]
fn output_for_a_missing_parent_is_not_applied() {
    let (_, generator) = generator(
        ScriptedModel::new().always(CallKind::SectionWriting, "Orphan text [1]."),
        GenerationConfig::default(),
    );
    let table = prepared_table(reef_corpus(), 0.0);
    let task = SectionTask {
        name: "Orphan".to_string(),
        parent: Some("Nowhere".to_string()),
        depth: 2,
        queries: vec!["coral".to_string()],
        outline: "# Orphan".to_string(),
    };

    let output = generator.write_section("Coral reef", task, &table).unwrap();
    assert_eq!(output.content, "# Orphan\nOrphan text [1].");
    assert!(!output.sources.is_empty());

    let mut article = quill_article::Article::from_outline_str("Coral reef", "# Threats");
    let before = article.clone();
    let parent = output.task.parent.as_deref();
    assert!(!article.update_section(parent, &output.content, &output.sources));
    assert_eq!(article, before);
}
