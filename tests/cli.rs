use assert_cmd::Command;
use mockito::{Matcher, Mock, ServerGuard};
use predicates::prelude::*;
use std::path::Path;

const LIST_TWO: &str = r#"{"object":"list","data":[
    {"id":"file-1","object":"file","bytes":5,"created_at":1677610602,"filename":"a.txt","purpose":"assistants"},
    {"id":"file-2","object":"file","bytes":5,"created_at":1677610602,"filename":"b.txt","purpose":"assistants"}
],"has_more":false}"#;

/// Binary with a clean environment, run from `dir` so no stray `.env` is
/// picked up.
fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("assistant-files").unwrap();
    cmd.current_dir(dir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("OPENAI_ORG_ID")
        .env_remove("OPENAI_PROJECT_ID")
        .env_remove("RUST_LOG");
    cmd
}

fn no_calls(server: &mut ServerGuard) -> Vec<Mock> {
    ["GET", "POST", "DELETE"]
        .into_iter()
        .map(|method| server.mock(method, Matcher::Any).expect(0).create())
        .collect()
}

#[test]
fn missing_credential_fails_before_the_menu() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .write_stdin("9\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "OPENAI_API_KEY is not set in the environment variables",
        ))
        .stdout(predicate::str::contains("Assistants file utility").not());
}

#[test]
fn exit_choice_makes_no_calls() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let mocks = no_calls(&mut server);

    cmd(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_BASE_URL", server.url())
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("== Assistants file utility =="))
        .stdout(predicate::str::contains("[9] Exit"));

    mocks.iter().for_each(Mock::assert);
}

#[test]
fn listing_empty_set_prints_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let list = server
        .mock("GET", "/files")
        .match_query(Matcher::UrlEncoded("purpose".into(), "assistants".into()))
        .with_status(200)
        .with_body(r#"{"object":"list","data":[],"has_more":false}"#)
        .expect(1)
        .create();

    cmd(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_BASE_URL", server.url())
        .write_stdin("2\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Enter your choice: No files found.\n\n== Assistants file utility ==",
        ));

    list.assert();
}

#[test]
fn credential_can_come_from_dotenv() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let list = server
        .mock("GET", "/files")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer sk-from-dotenv")
        .with_status(200)
        .with_body(r#"{"object":"list","data":[]}"#)
        .expect(1)
        .create();
    std::fs::write(
        dir.path().join(".env"),
        format!("OPENAI_API_KEY=sk-from-dotenv\nOPENAI_BASE_URL={}\n", server.url()),
    )
    .unwrap();

    cmd(dir.path())
        .write_stdin("2\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found."));

    list.assert();
}

#[test]
fn delete_all_removes_each_listed_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let list = server
        .mock("GET", "/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(LIST_TWO)
        .expect(1)
        .create();
    let deletes: Vec<Mock> = ["file-1", "file-2"]
        .into_iter()
        .map(|id| {
            server
                .mock("DELETE", format!("/files/{id}").as_str())
                .with_status(200)
                .with_body(format!(r#"{{"id":"{id}","object":"file","deleted":true}}"#))
                .expect(1)
                .create()
        })
        .collect();

    cmd(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_BASE_URL", server.url())
        .write_stdin("4\nYES\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "All files with purpose 'assistants' have been deleted.",
        ));

    list.assert();
    deletes.iter().for_each(Mock::assert);
}

#[test]
fn failed_delete_ends_the_session_with_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/files")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(LIST_TWO)
        .create();
    server
        .mock("DELETE", "/files/file-1")
        .with_status(500)
        .with_body(r#"{"error":{"message":"internal error"}}"#)
        .create();

    cmd(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_BASE_URL", server.url())
        .write_stdin("3\n1\n9\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Deleting a.txt [file-1]"))
        .stderr(predicate::str::contains("Delete failed: 500 Internal Server Error - internal error"));
}
