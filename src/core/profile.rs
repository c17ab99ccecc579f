// src/core/profile.rs — Portfolio facts and the keyword-rule static responder

use std::fmt::Write as _;

/// A project entry in the portfolio.
#[derive(Debug, Clone, Copy)]
pub struct Project {
    pub name: &'static str,
    pub tech: &'static [&'static str],
    pub kind: &'static str,
}

/// Immutable description of the portfolio owner. Never mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct ProfileFacts {
    pub name: &'static str,
    pub github: &'static str,
    pub discord: &'static str,
    pub email: &'static str,
    pub skills: &'static [&'static str],
    pub focus: &'static str,
    pub projects: &'static [Project],
    pub hackathons: &'static [&'static str],
    pub education: &'static str,
    pub interests: &'static [&'static str],
}

pub static PROFILE: ProfileFacts = ProfileFacts {
    name: "Asadullah Shafique",
    github: "https://github.com/asadullah48",
    discord: "https://discord.gg/kXfEYVGX",
    email: "asadullahshafique@hotmail.com",
    skills: &[
        "TypeScript",
        "JavaScript",
        "Python",
        "Next.js",
        "React",
        "FastAPI",
        "Docker",
        "Agentic AI",
        "Generative AI",
    ],
    focus: "Agentic AI development, Full-stack engineering, Spec-first development (SpecifyKit)",
    projects: &[
        Project {
            name: "Textbook RAG Chatbot",
            tech: &["RAG", "FastAPI", "Next.js"],
            kind: "Hackathon",
        },
        Project {
            name: "Portfolio (Asadullah.dev)",
            tech: &["Next.js", "FastAPI", "Docker"],
            kind: "Production",
        },
        Project {
            name: "Agentic AI Systems",
            tech: &["LangGraph", "Claude API", "SpecifyKit"],
            kind: "Research",
        },
    ],
    hackathons: &["Panaversity Physical AI & Humanoid Robotics Hackathon 2025-26"],
    education: "Student pursuing Agentic AI development at Panaversity",
    interests: &[
        "Generative AI",
        "Agentic AI",
        "RAG",
        "MCP Servers",
        "Full-stack development",
    ],
};

/// Topics answerable by [`ProfileFacts::respond_by_topic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Skills,
    Projects,
    Hackathons,
    Contact,
    Education,
    About,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Skills,
        Topic::Projects,
        Topic::Hackathons,
        Topic::Contact,
        Topic::Education,
        Topic::About,
    ];

    /// Case-insensitive; anything unrecognised is `About`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "skills" => Topic::Skills,
            "projects" => Topic::Projects,
            "hackathons" => Topic::Hackathons,
            "contact" => Topic::Contact,
            "education" => Topic::Education,
            _ => Topic::About,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Skills => "skills",
            Topic::Projects => "projects",
            Topic::Hackathons => "hackathons",
            Topic::Contact => "contact",
            Topic::Education => "education",
            Topic::About => "about",
        }
    }
}

// Checked in this order; the first category with a hit wins.
const SKILL_WORDS: &[&str] = &["skill", "tech", "language", "framework"];
const PROJECT_WORDS: &[&str] = &["project", "built", "work"];
const CONTACT_WORDS: &[&str] = &["contact", "email", "discord", "reach"];
const HACKATHON_WORDS: &[&str] = &["hackathon", "competition"];

fn mentions(question: &str, words: &[&str]) -> bool {
    words.iter().any(|w| question.contains(w))
}

impl ProfileFacts {
    /// Answer a free-text question from the fixed rule set.
    pub fn respond(&self, question: &str) -> String {
        let q = question.to_lowercase();

        if mentions(&q, SKILL_WORDS) {
            return format!(
                "{}'s skills: {}. Focus: {}",
                self.first_name(),
                self.skills.join(", "),
                self.focus
            );
        }
        if mentions(&q, PROJECT_WORDS) {
            let projects: Vec<String> = self
                .projects
                .iter()
                .map(|p| format!("{} ({})", p.name, p.kind))
                .collect();
            return format!("Projects: {}", projects.join(", "));
        }
        if mentions(&q, CONTACT_WORDS) {
            return format!("Email: {} | Discord: {}", self.email, self.discord);
        }
        if mentions(&q, HACKATHON_WORDS) {
            return format!("Hackathons: {}", self.hackathons.join(", "));
        }

        format!(
            "I'm an AI assistant for {}'s portfolio. Ask me about skills, projects, hackathons, or how to contact. GitHub: {}",
            self.name, self.github
        )
    }

    pub fn respond_by_topic(&self, topic: Topic) -> String {
        match topic {
            Topic::Skills => format!(
                "Skills: {}. Focus areas: {}",
                self.skills.join(", "),
                self.focus
            ),
            Topic::Projects => {
                let mut out = String::new();
                for (i, p) in self.projects.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    let _ = write!(out, "- {}: {} ({})", p.name, p.tech.join(", "), p.kind);
                }
                out
            }
            Topic::Hackathons => format!("Hackathons: {}", self.hackathons.join(", ")),
            Topic::Contact => format!(
                "Email: {} | Discord: {} | GitHub: {}",
                self.email, self.discord, self.github
            ),
            Topic::Education => self.education.to_string(),
            Topic::About => {
                let interests: Vec<&str> = self.interests.iter().take(3).copied().collect();
                format!(
                    "{} is an Agentic AI developer specializing in {}. Interests: {}.",
                    self.name,
                    self.focus,
                    interests.join(", ")
                )
            }
        }
    }

    fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(self.name)
    }
}
