//! The `studyprep init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("studyprep.toml").exists() {
        println!("studyprep.toml already exists, skipping.");
    } else {
        std::fs::write("studyprep.toml", SAMPLE_CONFIG)?;
        println!("Created studyprep.toml");
    }

    let bank_path = std::path::Path::new("question_bank.json");
    if bank_path.exists() {
        println!("question_bank.json already exists, skipping.");
    } else {
        std::fs::write(bank_path, SAMPLE_BANK)?;
        println!("Created question_bank.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: studyprep validate --bank question_bank.json");
    println!("  2. Run: studyprep submit --week 1 --index 0 --answer 4");
    println!("  3. Run: studyprep analyze");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studyprep configuration

user_id = "student_001"
data_dir = "."
symbolic_grading = true
regression_threshold = 1.0
"#;

const SAMPLE_BANK: &str = r#"{
  "course_name": "Discrete Mathematics",
  "course_code": "MA101",
  "weeks": [
    {
      "week": 1,
      "topic": "Week 1: Arithmetic",
      "questions": [
        {
          "id": "w1-q1",
          "question": "What is 2 + 2?",
          "type": "short",
          "answer": 4,
          "source": "Sample"
        },
        {
          "id": "w1-q2",
          "question": "Expand 2(x + 1).",
          "type": "short",
          "answer": "2*x + 2",
          "source": "Sample"
        }
      ]
    },
    {
      "week": 2,
      "topic": "Week 2: Sets",
      "questions": [
        {
          "id": "w2-q1",
          "question": "Which operation yields the elements common to two sets?",
          "type": "mcq",
          "options": ["Union", "Intersection", "Difference", "Complement"],
          "answer": "Intersection",
          "source": "Sample"
        },
        {
          "id": "w2-q2",
          "question": "Explain in your own words: power sets",
          "type": "short",
          "source": "Sample"
        }
      ]
    }
  ]
}
"#;
