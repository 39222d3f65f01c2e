//! End-to-end harvest from input files to the results tree.

mod common;

use quiz_harvester::adapters::chat::{MockChatSession, MockReply};
use quiz_harvester::cli::commands::run::{harvest, SummaryOutput};
use quiz_harvester::cli::output::{render, CommandOutput};
use quiz_harvester::domain::models::Config;

fn config_in(dir: &std::path::Path) -> Config {
    std::fs::write(dir.join("prompt.txt"), "List {questions} questions about {sub_category}.").unwrap();
    std::fs::write(
        dir.join("topics.json"),
        r#"{"categories": [{"name": "Science", "subcategories": ["Physics", "Chemistry"]}]}"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.inputs.prompt_file = dir.join("prompt.txt");
    config.inputs.topics_file = dir.join("topics.json");
    config.harvest.results_dir = dir.join("results");
    config.harvest.calls = 1;
    config.harvest.questions = 2;
    config
}

#[tokio::test(start_paused = true)]
async fn test_harvest_writes_one_artifact_per_subcategory() {
    let temp = common::temp_dir();
    let config = config_in(temp.path());
    let session = MockChatSession::new([
        MockReply::text("1 What is mass?\n2 What is weight?"),
        MockReply::text("1 What is an atom?\n2 What is a bond?"),
    ]);
    let log = session.log();

    let summary = harvest(&config, session, "2026-01-01_00-00-00").await.unwrap();

    assert_eq!(summary.saved, 2);
    assert_eq!(summary.subcategories.len(), 2);
    let results = temp.path().join("results").join("Science");
    assert!(results.join("Physics").join("What_is_massWhat_is_weight.json").exists());
    assert!(results.join("Chemistry").join("What_is_an_atomWhat_is_a_bond.json").exists());

    let prompts = log.lock().unwrap().prompts.clone();
    assert_eq!(
        prompts,
        vec!["List 2 questions about Physics.", "List 2 questions about Chemistry."]
    );

    let output = SummaryOutput {
        results_dir: config.harvest.results_dir.clone(),
        log_file: None,
        summary,
    };
    let json = output.to_json();
    assert_eq!(json["saved"], 2);
    assert_eq!(json["run_id"], "2026-01-01_00-00-00");
    assert!(output.to_human().contains("saved:           2"));

    let printed: serde_json::Value = serde_json::from_str(&render(&output, true)).unwrap();
    assert_eq!(printed, json);
    assert_eq!(render(&output, false), output.to_human());
}

#[tokio::test]
async fn test_harvest_reports_missing_inputs() {
    let temp = common::temp_dir();
    let mut config = Config::default();
    config.inputs.prompt_file = temp.path().join("missing.txt");

    let err = harvest(&config, MockChatSession::new([]), "run").await.unwrap_err();
    assert!(format!("{err:#}").contains("missing.txt"));
}
