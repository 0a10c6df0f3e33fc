//! Question provisioning: sources tried in priority order.
//!
//! Sources that reach out to external content services live outside this
//! crate and implement [`QuestionSource`]. The chain tries each source in
//! order and falls back to locally generated template questions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{
    timestamp, ExpectedAnswer, Question, QuestionBank, QuestionKind, StudyPlan, WeekQuestions,
};

// ---------------------------------------------------------------------------
// Question source trait
// ---------------------------------------------------------------------------

/// A provider of questions for a study topic.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "question-bank").
    fn name(&self) -> &str;

    /// Fetch questions for a topic. An empty list means "nothing found".
    async fn fetch(&self, topic: &str) -> anyhow::Result<Vec<Question>>;
}

/// Strip a `"Week N:"` style prefix from a plan topic.
pub fn normalize_topic(topic: &str) -> &str {
    topic.rsplit(':').next().unwrap_or(topic).trim()
}

// ---------------------------------------------------------------------------
// Built-in sources
// ---------------------------------------------------------------------------

/// Generates two template questions for any topic.
pub struct TemplateSource;

pub const TEMPLATE_SOURCE: &str = "Local Template";

impl TemplateSource {
    pub fn questions(topic: &str) -> Vec<Question> {
        vec![
            Question {
                id: None,
                question: format!("What is the main concept behind {topic}?"),
                kind: QuestionKind::MultipleChoice,
                options: ["Definition", "Algorithm", "Formula", "None of the above"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                answer: Some(ExpectedAnswer::Text("Definition".into())),
                source: TEMPLATE_SOURCE.into(),
            },
            Question {
                id: None,
                question: format!("Explain in your own words: {topic}"),
                kind: QuestionKind::ShortAnswer,
                options: vec![],
                answer: None,
                source: TEMPLATE_SOURCE.into(),
            },
        ]
    }
}

#[async_trait]
impl QuestionSource for TemplateSource {
    fn name(&self) -> &str {
        "template"
    }

    async fn fetch(&self, topic: &str) -> anyhow::Result<Vec<Question>> {
        Ok(Self::questions(topic))
    }
}

/// Serves questions from an existing question bank, matched by topic.
pub struct BankFileSource {
    bank: QuestionBank,
}

impl BankFileSource {
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }
}

#[async_trait]
impl QuestionSource for BankFileSource {
    fn name(&self) -> &str {
        "question-bank"
    }

    async fn fetch(&self, topic: &str) -> anyhow::Result<Vec<Question>> {
        let wanted = normalize_topic(topic).to_lowercase();
        Ok(self
            .bank
            .weeks
            .iter()
            .filter(|w| normalize_topic(&w.topic).to_lowercase() == wanted)
            .flat_map(|w| w.questions.iter().cloned())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Source chain
// ---------------------------------------------------------------------------

/// Ordered list of question sources.
///
/// Results from every source are combined in chain order. Failing sources
/// are logged and skipped; when the combined list is empty, the template
/// fallback is used so a week is never left without questions.
#[derive(Default, Clone)]
pub struct SourceChain {
    sources: Vec<Arc<dyn QuestionSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn QuestionSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fetch questions for a topic from every source.
    pub async fn fetch(&self, topic: &str) -> Vec<Question> {
        let mut combined = Vec::new();
        for source in &self.sources {
            match source.fetch(topic).await {
                Ok(questions) => {
                    tracing::debug!(
                        source = source.name(),
                        count = questions.len(),
                        "fetched questions for '{topic}'"
                    );
                    combined.extend(questions);
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), "question source failed: {e:#}");
                }
            }
        }
        if combined.is_empty() {
            tracing::info!("falling back to template questions for '{topic}'");
            return TemplateSource::questions(topic);
        }
        combined
    }
}

/// Build a question bank for every week of a study plan.
pub async fn build_question_bank(plan: &StudyPlan, chain: &SourceChain) -> QuestionBank {
    let mut weeks = Vec::with_capacity(plan.weeks.len());
    for week in &plan.weeks {
        let questions = chain.fetch(&week.topic).await;
        weeks.push(WeekQuestions {
            week: week.week,
            topic: week.topic.clone(),
            questions,
        });
    }
    tracing::info!(
        course = %plan.course_name,
        weeks = weeks.len(),
        "built question bank"
    );
    QuestionBank {
        course_name: plan.course_name.clone(),
        course_code: plan.course_code.clone(),
        generated_on: Some(timestamp::now()),
        weeks,
    }
}
