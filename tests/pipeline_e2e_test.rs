//! End-to-end pipeline tests against a stub generation endpoint
//!
//! Covers the full run (collect, detect, retrieve, assemble, generate,
//! write, persist) and the fatal endpoint-failure path.

use agllm_core::{AgllmError, Pipeline, ScoreVerdict, SqliteStorage, TableCounts};
use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_home, spawn_generate_stub, test_client, test_config};

#[tokio::test]
async fn test_repo42_perfect_score_run() {
    let (host, received) = spawn_generate_stub(
        StatusCode::OK,
        json!({"model": "test-model", "response": "Great job! Nothing further.", "done": true}),
    )
    .await;

    let home = create_test_home(&[("a.txt", "x"), ("b.txt", "y")]);
    let config = test_config(home.path(), &host);
    std::fs::write(config.autograder_file(), "All tests passed").unwrap();
    std::fs::write(config.instructions_file(), "").unwrap();

    let client = test_client(&config);
    let report = Pipeline::new(&config, &client)
        .run("repo42")
        .await
        .expect("pipeline run failed");

    assert_eq!(report.verdict, ScoreVerdict::Perfect);
    assert_eq!(report.file_count, 2);

    // Wire format
    let requests = received.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["model"], "test-model");
    assert_eq!(requests[0]["stream"], false);
    let prompt = requests[0]["prompt"].as_str().unwrap();
    assert!(prompt.starts_with(agllm_core::assembler::BUILTIN_PERFECT_INSTRUCTION));
    assert!(prompt.contains("File: a.txt\nx\n\nFile: b.txt\ny\n\n"));
    assert!(prompt.contains("None so far."));

    // Markdown output
    let markdown = std::fs::read_to_string(config.feedback_file()).unwrap();
    assert!(markdown.starts_with("# Feedback for repo42"));
    assert!(markdown.ends_with("Great job! Nothing further."));

    // Rows
    let storage = SqliteStorage::open(&config.db_path).unwrap();
    assert_eq!(
        storage.table_counts().unwrap(),
        TableCounts {
            submissions: 1,
            code_files: 2,
            autograder_outputs: 1,
            feedback: 1,
        }
    );

    let conn = storage.connection();
    let (repo, assignment_id): (String, i64) = conn
        .query_row(
            "SELECT student_repo, assignment_id FROM submissions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(repo, "repo42");
    assert_eq!(assignment_id, 101);

    let mut stmt = conn
        .prepare("SELECT filename, code FROM code_files ORDER BY id")
        .unwrap();
    let files: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        files,
        vec![
            ("a.txt".to_string(), "x".to_string()),
            ("b.txt".to_string(), "y".to_string())
        ]
    );

    let output: String = conn
        .query_row("SELECT output FROM autograder_outputs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(output, "All tests passed");

    let (feedback_text, reviewed, comments): (String, i64, Option<String>) = conn
        .query_row(
            "SELECT feedback_text, reviewed, teacher_comments FROM feedback WHERE repo_name = 'repo42'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(feedback_text, "Great job! Nothing further.");
    assert_eq!(reviewed, 0);
    assert!(comments.is_none());
}

#[tokio::test]
async fn test_endpoint_500_writes_nothing() {
    let (host, received) =
        spawn_generate_stub(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "model crashed"}))
            .await;

    let home = create_test_home(&[("main.c", "int main(void) { return 0; }")]);
    let config = test_config(home.path(), &host);
    std::fs::write(config.autograder_file(), "Points 2/7").unwrap();

    // Seed one earlier submission so "unchanged" is not trivially zero
    {
        let mut storage = SqliteStorage::open(&config.db_path).unwrap();
        let bundle = agllm_core::collector::collect(&config.student_code_dir()).unwrap();
        agllm_core::StorageBackend::record_submission(
            &mut storage,
            &agllm_core::types::NewSubmission {
                repo_name: "repo42",
                assignment_id: 101,
                bundle: &bundle,
                autograder_output: "Points 1/7",
                feedback_text: "earlier feedback",
                timestamp: "2026-01-01T00:00:00.000000Z".to_string(),
            },
        )
        .unwrap();
        storage.close().unwrap();
    }
    let before = SqliteStorage::open(&config.db_path)
        .unwrap()
        .table_counts()
        .unwrap();

    let client = test_client(&config);
    let err = Pipeline::new(&config, &client)
        .run("repo42")
        .await
        .unwrap_err();

    assert!(matches!(err, AgllmError::LlmApi(ref msg) if msg.contains("500")));
    assert_eq!(received.lock().unwrap().len(), 1, "no retry expected");

    let after = SqliteStorage::open(&config.db_path)
        .unwrap()
        .table_counts()
        .unwrap();
    assert_eq!(before, after);
    assert!(!config.feedback_file().exists());
}

#[tokio::test]
async fn test_malformed_response_is_fatal() {
    let (host, _received) = spawn_generate_stub(StatusCode::OK, json!({"done": true})).await;

    let home = create_test_home(&[("a.txt", "x")]);
    let config = test_config(home.path(), &host);

    let client = test_client(&config);
    let err = Pipeline::new(&config, &client)
        .run("repo42")
        .await
        .unwrap_err();

    assert!(matches!(err, AgllmError::LlmApi(_)));
    let counts = SqliteStorage::open(&config.db_path)
        .unwrap()
        .table_counts()
        .unwrap();
    assert_eq!(counts, TableCounts::default());
}

#[tokio::test]
async fn test_prompt_template_from_directory() {
    let (host, received) =
        spawn_generate_stub(StatusCode::OK, json!({"response": "Why does the loop stop?"})).await;

    let home = create_test_home(&[("loop.py", "while True: pass")]);
    let config = test_config(home.path(), &host);
    std::fs::create_dir_all(&config.prompts_dir).unwrap();
    std::fs::write(
        config.prompts_dir.join(&config.prompt_default),
        "\nYou are a patient TA. Only ask questions.\n",
    )
    .unwrap();
    std::fs::write(config.autograder_file(), "Points 5/7").unwrap();

    let client = test_client(&config);
    Pipeline::new(&config, &client).run("repo7").await.unwrap();

    let requests = received.lock().unwrap().clone();
    let prompt = requests[0]["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("You are a patient TA. Only ask questions.\n\n**Student Code**"));
}

#[tokio::test]
async fn test_perfect_template_from_directory() {
    let (host, received) =
        spawn_generate_stub(StatusCode::OK, json!({"response": "Well done."})).await;

    let home = create_test_home(&[("main.rs", "fn main() {}")]);
    let config = test_config(home.path(), &host);
    std::fs::create_dir_all(&config.prompts_dir).unwrap();
    std::fs::write(
        config.prompts_dir.join(&config.prompt_perfect),
        "Celebrate the result in two sentences.\n",
    )
    .unwrap();
    std::fs::write(
        config.prompts_dir.join(&config.prompt_default),
        "Guided template that must not be used.",
    )
    .unwrap();
    std::fs::write(config.autograder_file(), "All tests passed").unwrap();

    let client = test_client(&config);
    let report = Pipeline::new(&config, &client).run("repo8").await.unwrap();
    assert_eq!(report.verdict, ScoreVerdict::Perfect);

    let requests = received.lock().unwrap().clone();
    let prompt = requests[0]["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("Celebrate the result in two sentences.\n\n**Student Code**"));
    assert!(!prompt.contains("Guided template"));
}
