// src/core/types.rs — Capability requests, results and provenance

use serde::{Deserialize, Serialize};

use crate::infra::errors::FolioError;

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Deterministic fallback output.
    Static,
    /// At least one field was produced by the language model.
    Enhanced,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Static => "static",
            Provenance::Enhanced => "enhanced",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    #[default]
    Interactive,
    Visual,
    Theoretical,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Interactive => "interactive",
            LearningStyle::Visual => "visual",
            LearningStyle::Theoretical => "theoretical",
        }
    }
}

// ─── Requests ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveErrorInput {
    pub error_message: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl SolveErrorInput {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            code_snippet: None,
            language: None,
            context: None,
        }
    }

    pub fn language(&self) -> &str {
        self.language
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("python")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnInput {
    pub topic: String,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub learning_style: Option<LearningStyle>,
    #[serde(default)]
    pub questions: Option<Vec<String>>,
}

impl LearnInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            level: None,
            learning_style: None,
            questions: None,
        }
    }

    pub fn level(&self) -> Level {
        self.level.unwrap_or(Level::Beginner)
    }

    pub fn style(&self) -> LearningStyle {
        self.learning_style.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachInput {
    pub topic: String,
    pub content: String,
    #[serde(default)]
    pub difficulty: Option<Level>,
    #[serde(default)]
    pub examples: Option<Vec<String>>,
}

impl TeachInput {
    pub fn new(topic: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            content: content.into(),
            difficulty: None,
            examples: None,
        }
    }

    pub fn difficulty(&self) -> Level {
        self.difficulty.unwrap_or(Level::Intermediate)
    }
}

/// A request to one of the four capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "snake_case")]
pub enum TaskRequest {
    Chat(ChatInput),
    SolveError(SolveErrorInput),
    Learn(LearnInput),
    Teach(TeachInput),
}

impl TaskRequest {
    /// Reject input that no capability can act on. Chat accepts an empty
    /// message and answers it with the profile summary.
    pub fn validate(&self) -> Result<(), FolioError> {
        match self {
            TaskRequest::Chat(_) => Ok(()),
            TaskRequest::SolveError(i) => require("error_message", &i.error_message),
            TaskRequest::Learn(i) => require("topic", &i.topic),
            TaskRequest::Teach(i) => {
                require("topic", &i.topic)?;
                require("content", &i.content)
            }
        }
    }

    pub fn capability(&self) -> &'static str {
        match self {
            TaskRequest::Chat(_) => "chat",
            TaskRequest::SolveError(_) => "solve_error",
            TaskRequest::Learn(_) => "learn",
            TaskRequest::Teach(_) => "teach",
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), FolioError> {
    if value.trim().is_empty() {
        Err(FolioError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

// ─── Results ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub session_id: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSolution {
    pub explanation: String,
    pub solution: String,
    pub corrected_code: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub lesson_plan: String,
    pub resources: Vec<String>,
    pub quiz_questions: Vec<String>,
    pub next_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingContent {
    pub acknowledgment: String,
    pub structured_content: String,
    pub suggested_exercises: Vec<String>,
    pub related_topics: Vec<String>,
}

/// A capability output tagged with its provenance. Serializes flat, with the
/// tag under `mode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    #[serde(flatten)]
    pub value: T,
    pub mode: Provenance,
    /// Why the enhanced path was abandoned. Logged, never sent to callers.
    #[serde(skip)]
    pub diagnostic: Option<String>,
}

impl<T> Outcome<T> {
    pub fn fallback(value: T) -> Self {
        Self {
            value,
            mode: Provenance::Static,
            diagnostic: None,
        }
    }

    pub fn enhanced(value: T) -> Self {
        Self {
            value,
            mode: Provenance::Enhanced,
            diagnostic: None,
        }
    }

    pub fn degraded(value: T, diagnostic: impl Into<String>) -> Self {
        Self {
            value,
            mode: Provenance::Static,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_enhanced(&self) -> bool {
        self.mode == Provenance::Enhanced
    }
}

/// Mirrors [`TaskRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "capability", rename_all = "snake_case")]
pub enum TaskResult {
    Chat(Outcome<ChatReply>),
    SolveError(Outcome<ErrorSolution>),
    Learn(Outcome<LessonPlan>),
    Teach(Outcome<TeachingContent>),
}

impl TaskResult {
    pub fn provenance(&self) -> Provenance {
        match self {
            TaskResult::Chat(o) => o.mode,
            TaskResult::SolveError(o) => o.mode,
            TaskResult::Learn(o) => o.mode,
            TaskResult::Teach(o) => o.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tagged_deserialize() {
        let req: TaskRequest = serde_json::from_str(
            r#"{"capability":"learn","topic":"Rust","level":"advanced","learning_style":"visual"}"#,
        )
        .unwrap();
        let TaskRequest::Learn(input) = req else {
            panic!("expected learn");
        };
        assert_eq!(input.level(), Level::Advanced);
        assert_eq!(input.style(), LearningStyle::Visual);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let learn = LearnInput::new("Rust");
        assert_eq!(learn.level(), Level::Beginner);
        assert_eq!(learn.style(), LearningStyle::Interactive);

        let teach = TeachInput::new("Rust", "ownership");
        assert_eq!(teach.difficulty(), Level::Intermediate);

        let mut solve = SolveErrorInput::new("boom");
        assert_eq!(solve.language(), "python");
        solve.language = Some("  ".into());
        assert_eq!(solve.language(), "python");
    }

    #[test]
    fn test_unknown_level_rejected() {
        let res: Result<LearnInput, _> =
            serde_json::from_str(r#"{"topic":"Rust","level":"expert"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(TaskRequest::Chat(ChatInput {
            message: String::new(),
            session_id: None
        })
        .validate()
        .is_ok());
        assert!(TaskRequest::SolveError(SolveErrorInput::new("  "))
            .validate()
            .is_err());
        assert!(TaskRequest::Teach(TeachInput::new("Rust", ""))
            .validate()
            .is_err());
        assert!(TaskRequest::Learn(LearnInput::new("Rust")).validate().is_ok());
    }

    #[test]
    fn test_outcome_serializes_flat_with_mode() {
        let o = Outcome::degraded(
            ChatReply {
                answer: "hi".into(),
                session_id: Some("s-1".into()),
                confidence: 0.7,
            },
            "provider down",
        );
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["answer"], "hi");
        assert_eq!(v["mode"], "static");
        assert_eq!(v["session_id"], "s-1");
        assert!(v.get("diagnostic").is_none());
        assert!(v.get("value").is_none());
    }

    #[test]
    fn test_task_result_tag() {
        let r = TaskResult::Learn(Outcome::enhanced(LessonPlan {
            lesson_plan: "p".into(),
            resources: vec!["r".into()],
            quiz_questions: vec!["q".into()],
            next_steps: "n".into(),
        }));
        assert_eq!(r.provenance(), Provenance::Enhanced);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["capability"], "learn");
        assert_eq!(v["mode"], "enhanced");
    }
}
