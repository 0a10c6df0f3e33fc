//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `studyprep` invocation isolated to `dir`: config is looked up there and
/// the data directory defaults to it.
fn studyprep(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("studyprep").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("STUDYPREP_DATA_DIR")
        .env_remove("STUDYPREP_USER_ID");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    studyprep(dir.path()).arg("init").assert().success();
    dir
}

fn submit(dir: &Path, week: u32, index: usize, answer: &str) -> assert_cmd::assert::Assert {
    studyprep(dir)
        .arg("submit")
        .arg("--week")
        .arg(week.to_string())
        .arg("--index")
        .arg(index.to_string())
        .arg("--answer")
        .arg(answer)
        .assert()
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    studyprep(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Assessment grading and exam readiness tracker",
        ));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    studyprep(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("studyprep"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    studyprep(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created studyprep.toml"))
        .stdout(predicate::str::contains("Created question_bank.json"));

    assert!(dir.path().join("studyprep.toml").exists());
    assert!(dir.path().join("question_bank.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized();

    studyprep(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_sample_bank() {
    let dir = initialized();

    studyprep(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("question_bank.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 weeks, 4 questions"))
        .stdout(predicate::str::contains("1 question(s) without an expected answer"))
        .stdout(predicate::str::contains("Question bank valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bank.json"),
        r#"{
  "course_name": "Broken",
  "weeks": [
    {"week": 1, "topic": "Sets", "questions": [
      {"question": "Pick one", "type": "mcq", "options": ["A", "B"], "answer": "C"}
    ]},
    {"week": 1, "topic": "Sets again", "questions": []}
  ]
}"#,
    )
    .unwrap();

    studyprep(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("bank.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("[week 1 #0]"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    studyprep(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn submit_grades_and_scores_weeks() {
    let dir = initialized();

    submit(dir.path(), 1, 0, "4.0000001")
        .success()
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Week 1 score: 100.00"));

    submit(dir.path(), 1, 1, "2(x+1)")
        .success()
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Week 1 score: 100.00"));

    submit(dir.path(), 2, 0, "union")
        .success()
        .stdout(predicate::str::contains("Incorrect."))
        .stdout(predicate::str::contains("Week 2 score: 0.00"))
        .stdout(predicate::str::contains("Overall: 50.00"));

    let answers = std::fs::read_to_string(dir.path().join("answers_tracker.json")).unwrap();
    let answers: serde_json::Value = serde_json::from_str(&answers).unwrap();
    assert_eq!(answers["answers"].as_array().unwrap().len(), 3);

    let readiness = std::fs::read_to_string(dir.path().join("readiness_scores.json")).unwrap();
    let readiness: serde_json::Value = serde_json::from_str(&readiness).unwrap();
    assert_eq!(readiness["week_scores"]["1"], 100.0);
    assert_eq!(readiness["week_scores"]["2"], 0.0);
    assert_eq!(readiness["overall"], 50.0);
}

#[test]
fn submit_without_expected_answer_goes_to_manual_review() {
    let dir = initialized();

    submit(dir.path(), 2, 1, "The set of all subsets")
        .success()
        .stdout(predicate::str::contains("Recorded for manual review."))
        .stdout(predicate::str::contains("Week 2 score: 0.00"));

    let answers = std::fs::read_to_string(dir.path().join("answers_tracker.json")).unwrap();
    assert!(answers.contains("manual_review"));
    assert!(answers.contains("\"correct\": null"));
}

#[test]
fn submit_unknown_question_fails_without_writing() {
    let dir = initialized();

    submit(dir.path(), 9, 0, "4")
        .failure()
        .stderr(predicate::str::contains("week 9 not found"));
    submit(dir.path(), 1, 5, "4")
        .failure()
        .stderr(predicate::str::contains("out of range"));

    assert!(!dir.path().join("answers_tracker.json").exists());
    assert!(!dir.path().join("readiness_scores.json").exists());
}

#[test]
fn status_shows_scores_and_tier() {
    let dir = initialized();
    submit(dir.path(), 1, 0, "4").success();
    submit(dir.path(), 2, 0, "Intersection").success();

    studyprep(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week"))
        .stdout(predicate::str::contains("100.00"))
        .stdout(predicate::str::contains("Overall: 100.00\n"))
        .stdout(predicate::str::contains("Exam readiness: 100.00 (ready)"));
}

#[test]
fn status_tier_follows_exam_readiness_not_overall() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("readiness_scores.json"),
        r#"{"user_id": "student_001", "week_scores": {"1": 50.0, "2": 69.0}, "overall": 59.5}"#,
    )
    .unwrap();

    // overall 59.5 alone would be "needs improvement"; (59.5 + 6.9) / 1.1 = 60.36.
    studyprep(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall: 59.50\n"))
        .stdout(predicate::str::contains("Exam readiness: 60.36 (on track)"));
}

#[test]
fn status_without_scores() {
    let dir = initialized();
    studyprep(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No scored weeks yet for student_001"));
}

#[test]
fn analyze_empty_state() {
    let dir = initialized();

    studyprep(dir.path())
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam readiness"))
        .stdout(predicate::str::contains("0.00"))
        .stdout(predicate::str::contains("Needs improvement"));

    assert!(dir.path().join("performance_report.json").exists());
}

#[test]
fn analyze_json_reports_exam_readiness() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("readiness_scores.json"),
        r#"{"user_id": "student_001", "week_scores": {"1": 80.0, "2": 60.0}, "overall": 70.0}"#,
    )
    .unwrap();

    let output = studyprep(dir.path())
        .arg("analyze")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_weeks"], 2);
    assert_eq!(report["metrics"]["average_score"], 70.0);
    assert_eq!(report["metrics"]["exam_readiness"], 70.91);
    assert_eq!(report["metrics"]["best_week"], "1");
    assert_eq!(report["metrics"]["worst_week"], "2");
}

#[test]
fn analyze_html_writes_report() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("readiness_scores.json"),
        r#"{"week_scores": {"1": 90.0}}"#,
    )
    .unwrap();

    studyprep(dir.path())
        .arg("analyze")
        .arg("--format")
        .arg("html")
        .arg("--output")
        .arg("reports")
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("reports/performance_report.html")).unwrap();
    assert!(html.contains("Performance Summary"));
    assert!(dir.path().join("reports/performance_report.json").exists());
}

#[test]
fn analyze_rejects_unknown_format() {
    let dir = initialized();
    studyprep(dir.path())
        .arg("analyze")
        .arg("--format")
        .arg("pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

fn analyze_into(dir: &Path, scores: &str, output: &str) {
    std::fs::write(dir.join("readiness_scores.json"), scores).unwrap();
    studyprep(dir)
        .arg("analyze")
        .arg("--output")
        .arg(output)
        .assert()
        .success();
}

#[test]
fn compare_reports() {
    let dir = initialized();
    analyze_into(dir.path(), r#"{"week_scores": {"1": 80.0, "2": 60.0}}"#, "baseline");
    analyze_into(
        dir.path(),
        r#"{"week_scores": {"1": 70.0, "2": 75.0, "3": 90.0}}"#,
        "current",
    );

    studyprep(dir.path())
        .arg("compare")
        .arg("--baseline")
        .arg("baseline/performance_report.json")
        .arg("--current")
        .arg("current/performance_report.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 regressions, 1 improvements"))
        .stdout(predicate::str::contains("Week 1 80.00 -> 70.00 (-10.00)"))
        .stdout(predicate::str::contains("New week(s): 3"));

    studyprep(dir.path())
        .arg("compare")
        .arg("--baseline")
        .arg("baseline/performance_report.json")
        .arg("--current")
        .arg("current/performance_report.json")
        .arg("--fail-on-regression")
        .assert()
        .failure();
}

#[test]
fn compare_threshold_absorbs_small_changes() {
    let dir = initialized();
    analyze_into(dir.path(), r#"{"week_scores": {"1": 80.0}}"#, "baseline");
    analyze_into(dir.path(), r#"{"week_scores": {"1": 79.5}}"#, "current");

    studyprep(dir.path())
        .arg("compare")
        .arg("--baseline")
        .arg("baseline/performance_report.json")
        .arg("--current")
        .arg("current/performance_report.json")
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 regressed, 1 unchanged"));
}

#[test]
fn compare_nonexistent_report() {
    let dir = TempDir::new().unwrap();
    studyprep(dir.path())
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .arg("--threshold")
        .arg("1")
        .assert()
        .failure();
}

#[test]
fn progress_marks_and_reports() {
    let dir = initialized();

    studyprep(dir.path())
        .args(["progress", "--week", "1", "--complete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated progress for week 1."));
    studyprep(dir.path())
        .args(["progress", "--week", "1", "--complete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing new for week 1."));

    studyprep(dir.path())
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed weeks: 1"));

    std::fs::write(
        dir.path().join("study_plan.json"),
        r#"{"course_name": "Discrete Mathematics", "weeks": [
  {"week": 1, "topic": "Week 1: Sets", "youtube_links": ["https://example.org/sets"]}
]}"#,
    )
    .unwrap();

    studyprep(dir.path())
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1: Sets"))
        .stdout(predicate::str::contains("50%"))
        .stdout(predicate::str::contains("Weeks completed: 1/1"))
        .stdout(predicate::str::contains("Course completion: 50%"))
        .stdout(predicate::str::contains("Current week").not());
}

#[test]
fn progress_summary_and_current_week() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("study_plan.json"),
        r#"{"course_name": "Discrete Mathematics", "weeks": [
  {"week": 1, "topic": "Week 1: Sets",
   "youtube_links": ["v1", "v2"], "recommended_books": ["Rosen"],
   "calendar": {"start_date": "Jan 01, 2000", "end_date": "Jan 07, 2000"}},
  {"week": 2, "topic": "Week 2: Logic",
   "calendar": {"start_date": "Jan 08, 2000", "end_date": "Dec 31, 2999"}}
]}"#,
    )
    .unwrap();

    studyprep(dir.path())
        .args(["progress", "--week", "1", "--video", "v1"])
        .assert()
        .success();
    studyprep(dir.path())
        .args(["progress", "--week", "1", "--book", "Rosen"])
        .assert()
        .success();
    studyprep(dir.path())
        .args(["progress", "--week", "2", "--complete"])
        .assert()
        .success();

    studyprep(dir.path())
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Weeks completed: 1/2"))
        .stdout(predicate::str::contains("Videos watched: 1"))
        .stdout(predicate::str::contains("Books read: 1"))
        .stdout(predicate::str::contains("Course completion: 60%"))
        .stdout(predicate::str::contains("Current week: 2 (Week 2: Logic)"));
}

#[test]
fn progress_flags_require_week() {
    let dir = initialized();
    studyprep(dir.path())
        .args(["progress", "--complete"])
        .assert()
        .failure();
}

#[test]
fn build_bank_from_plan() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("plan.json"),
        r#"{"course_name": "Discrete Mathematics", "weeks": [
  {"week": 1, "topic": "Week 1: Sets"},
  {"week": 2, "topic": "Week 2: Graph Theory"}
]}"#,
    )
    .unwrap();

    studyprep(dir.path())
        .arg("build-bank")
        .arg("--plan")
        .arg("plan.json")
        .arg("--bank-source")
        .arg("question_bank.json")
        .arg("--output")
        .arg("built.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1: 2 question(s) from Sample"))
        .stdout(predicate::str::contains("Week 2: 2 question(s) from Local Template"));

    studyprep(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("built.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 weeks, 4 questions"));
}
