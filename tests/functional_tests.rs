use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Output, Stdio};

use regex::Regex;

const CATALOG: &str = "tests/catalogs/two_topics.json";
const EMPTY_CATALOG: &str = "tests/catalogs/empty.json";

#[test]
fn can_count_questions() {
    let db = fresh_db("count");
    let (stdout, _) = run(CATALOG, &db.path, &["count"], &[]);
    assert_eq!(stdout.trim(), "6");

    let (stdout, _) = run(CATALOG, &db.path, &["count", "--topic", "history"], &[]);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn can_list_topics_in_catalog_order() {
    let db = fresh_db("list_topics");
    let (stdout, _) = run(CATALOG, &db.path, &["count", "--list-topics"], &[]);
    let lines: Vec<&str> = stdout.lines().map(|l| l.trim()).collect();
    assert_eq!(lines, vec!["3  Polity", "3  History"]);
}

#[test]
fn next_respects_pinned_topic() {
    let db = fresh_db("next_pinned");
    for seed in 0..5 {
        let seed = seed.to_string();
        let (stdout, _) = run(CATALOG, &db.path, &["next", "--topic", "Polity", "--seed", &seed], &[]);
        assert_in_order(&stdout, &["[Polity]", "(a)", "(b)", "(c)", "(d)"]);
        assert!(!stdout.contains("[History]"), "Contents of stdout: {:?}", stdout);
    }
}

#[test]
fn next_on_empty_catalog_reports_no_questions() {
    let db = fresh_db("next_empty");
    let (stdout, stderr) = run(EMPTY_CATALOG, &db.path, &["next"], &[]);
    assert_eq!(stdout.trim(), "No questions available.");
    assert_eq!(stderr, "");
}

#[test]
fn can_practice_and_reset() {
    let db = fresh_db("practice");
    let (stdout, _) = run(CATALOG, &db.path, &["practice", "-n", "2", "--seed", "3"], &["z", "b", "b"]);

    assert_in_order(
        &stdout,
        &["(1) [", "(a)", "(d)", "Please enter a letter.", "(2) [", "(a)", "(d)"],
    );
    let score = Regex::new(r"Score: (0\.0|50\.0|100\.0)% out of 2 questions").unwrap();
    assert!(score.is_match(&stdout), "Contents of stdout: {:?}", stdout);
    let verdicts = Regex::new(r"(Correct!|Incorrect\. The correct answer was)").unwrap();
    assert_eq!(verdicts.find_iter(&stdout).count(), 2);

    let (stdout, _) = run(CATALOG, &db.path, &["reset", "--yes"], &[]);
    assert_eq!(stdout.trim(), "Deleted 2 responses.");

    let (stdout, _) = run(CATALOG, &db.path, &["reset", "--yes"], &[]);
    assert_eq!(stdout.trim(), "No responses have been recorded.");
}

#[test]
fn history_lists_responses_newest_first() {
    let db = fresh_db("history");
    let (stdout, _) = run(CATALOG, &db.path, &["history"], &[]);
    assert_eq!(stdout.trim(), "No responses recorded yet.");

    run(CATALOG, &db.path, &["practice", "-n", "2", "--seed", "7"], &["a", "c"]);

    let (stdout, _) = run(CATALOG, &db.path, &["history"], &[]);
    let entries = Regex::new(r"\[(Polity|History)\]  attempt 1  (correct|incorrect)").unwrap();
    assert_eq!(entries.find_iter(&stdout).count(), 2, "Contents of stdout: {:?}", stdout);
    assert_in_order(&stdout, &["You answered (c)", "You answered (a)"]);

    let (stdout, _) = run(CATALOG, &db.path, &["history", "--topic", "polity"], &[]);
    assert_eq!(entries.find_iter(&stdout).count(), 1, "Contents of stdout: {:?}", stdout);
    assert!(!stdout.contains("[History]"), "Contents of stdout: {:?}", stdout);

    let (stdout, _) = run(CATALOG, &db.path, &["history", "--attempt", "2"], &[]);
    assert_eq!(stdout.trim(), "No responses match.");
}

#[test]
fn test_db_is_removed_when_dropped() {
    let path = {
        let db = fresh_db("cleanup");
        run(CATALOG, &db.path, &["practice", "-n", "1", "--seed", "1"], &["a"]);
        assert!(db.path.exists());
        db.path.clone()
    };
    assert!(!path.exists());
}

#[test]
fn practice_stops_at_end_of_input() {
    let db = fresh_db("practice_eof");
    let (stdout, _) = run(CATALOG, &db.path, &["practice", "-n", "5"], &["a"]);

    let score = Regex::new(r"Score: (0\.0|100\.0)% out of 1 question\b").unwrap();
    assert!(score.is_match(&stdout), "Contents of stdout: {:?}", stdout);
}

#[test]
fn unknown_topic_is_rejected() {
    let db = fresh_db("unknown_topic");
    let (_, stderr) = run(CATALOG, &db.path, &["next", "--topic", "Astrology"], &[]);
    assert!(stderr.contains("unknown topic 'Astrology'"), "Contents of stderr: {:?}", stderr);
}

#[test]
fn missing_catalog_is_an_error() {
    let db = fresh_db("missing_catalog");
    let output = run_output("tests/catalogs/nonexistent.json", &db.path, &["count"], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr,
        "Error: could not find question catalog at 'tests/catalogs/nonexistent.json'\n"
    );
}

fn assert_in_order(mock_stdout: &str, data: &[&str]) {
    let mut last_pos = 0;
    for datum in data {
        if let Some(pos) = mock_stdout[last_pos..].find(datum) {
            last_pos = (pos + last_pos) + datum.len();
        } else {
            panic!("Missing: {:?}; Contents of stdout: {:?}", datum, mock_stdout);
        }
    }
}

fn run(catalog: &str, db: &PathBuf, args: &[&str], input: &[&str]) -> (String, String) {
    let result = run_output(catalog, db, args, input);
    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    let stderr = String::from_utf8_lossy(&result.stderr).to_string();
    (stdout, stderr)
}

fn run_output(catalog: &str, db: &PathBuf, args: &[&str], input: &[&str]) -> Output {
    let mut child = spawn(catalog, db, args);
    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        for line in input {
            stdin_write(stdin, &line);
        }
    }
    child.wait_with_output().expect("Failed to read stdout")
}

fn spawn(catalog: &str, db: &PathBuf, args: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_prelims"))
        .arg("--no-color")
        .arg("--questions")
        .arg(catalog)
        .arg("--db")
        .arg(db)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn child process")
}

fn stdin_write(stdin: &mut ChildStdin, line: &str) {
    stdin.write_all(line.as_bytes()).expect("Failed to write to stdin");
    stdin.write_all("\n".as_bytes()).expect("Failed to write to stdin");
}

/// A response log in the temp directory that is deleted when the test finishes.
struct TempDb {
    path: PathBuf,
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn fresh_db(name: &str) -> TempDb {
    let mut path = std::env::temp_dir();
    path.push(format!("prelims_test_{}_{}.sqlite3", name, std::process::id()));
    let _ = fs::remove_file(&path);
    TempDb { path }
}
