// src/core/templates.rs — Prompt templates for the language-model capabilities

use minijinja::{context, Environment};

use super::fallback::examples_text;
use super::types::{LearnInput, SolveErrorInput, TeachInput};
use crate::infra::errors::FolioError;

pub const CHAT_SYSTEM_PROMPT: &str = "You are a concise portfolio assistant for Asadullah Shafique, an Agentic AI developer. \
Answer questions about his skills, projects, hackathons, and contact info. \
Use the get_portfolio_info tool when asked about specific topics. \
Keep answers under 3 sentences.";

const SOLVE_TEMPLATE: &str = "You are an expert programming tutor. Analyze this coding error and provide a helpful solution.

**Error Message:** {{ error_message }}
**Language:** {{ language }}
**Code Snippet:** {{ code_snippet }}
**Context:** {{ context }}

Provide your response in JSON format with these fields:
- explanation: Clear explanation of what went wrong (2-3 sentences)
- solution: Step-by-step solution
- corrected_code: The fixed code (if applicable)
- confidence: Confidence score (0.0 to 1.0)

Be concise, educational, and encouraging.";

const LEARN_TEMPLATE: &str = "You are an expert educator. Create a personalized learning plan for:

**Topic:** {{ topic }}
**Level:** {{ level }}
**Learning Style:** {{ style }}
**Student Questions:** {{ questions }}

Respond in JSON format with:
- lesson_plan: Detailed lesson plan (markdown format)
- resources: List of 4-5 learning resources (URLs or titles)
- quiz_questions: List of 3 quiz questions
- next_steps: Recommended next steps

Make it engaging, practical, and tailored to the learning style.";

const TEACH_TEMPLATE: &str = "You are an educational content curator. Process this teaching contribution:

**Topic:** {{ topic }}
**Content:** {{ content }}
**Difficulty:** {{ difficulty }}
**Examples:** {{ examples }}

Respond in JSON format with:
- acknowledgment: Thank you message
- structured_content: Well-formatted content (markdown)
- suggested_exercises: List of 3-4 practical exercises
- related_topics: List of 4 related topics to explore

Make it educational and engaging.";

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(placeholder)
}

/// Compiled prompt templates, built once per runner.
pub struct Prompts {
    env: Environment<'static>,
}

impl Prompts {
    pub fn new() -> Result<Self, FolioError> {
        let mut env = Environment::new();
        env.add_template("solve_error", SOLVE_TEMPLATE)?;
        env.add_template("learn", LEARN_TEMPLATE)?;
        env.add_template("teach", TEACH_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn solve_error(&self, input: &SolveErrorInput) -> Result<String, FolioError> {
        let tmpl = self.env.get_template("solve_error")?;
        Ok(tmpl.render(context! {
            error_message => input.error_message,
            language => input.language(),
            code_snippet => or_placeholder(input.code_snippet.as_deref(), "Not provided"),
            context => or_placeholder(input.context.as_deref(), "Not provided"),
        })?)
    }

    pub fn learn(&self, input: &LearnInput) -> Result<String, FolioError> {
        let questions = match input.questions.as_deref() {
            Some(q) if !q.is_empty() => q.join("\n"),
            _ => "None specified".to_string(),
        };
        let tmpl = self.env.get_template("learn")?;
        Ok(tmpl.render(context! {
            topic => input.topic.trim(),
            level => input.level().as_str(),
            style => input.style().as_str(),
            questions => questions,
        })?)
    }

    pub fn teach(&self, input: &TeachInput) -> Result<String, FolioError> {
        let tmpl = self.env.get_template("teach")?;
        Ok(tmpl.render(context! {
            topic => input.topic.trim(),
            content => input.content,
            difficulty => input.difficulty().as_str(),
            examples => examples_text(input.examples.as_deref()),
        })?)
    }
}
