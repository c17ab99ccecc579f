// src/blog.rs — Built-in blog posts

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BlogPost {
    pub id: u32,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub content: &'static str,
    pub date: &'static str,
    pub read_time: &'static str,
    pub tags: &'static [&'static str],
    pub slug: &'static str,
    pub featured: bool,
}

const COMING_SOON: &str = "Full article content coming soon...";

pub static POSTS: &[BlogPost] = &[
    BlogPost {
        id: 1,
        title: "Why Spec-First Development Changes Everything",
        excerpt: "How the SpecifyKit methodology transformed my approach to building AI applications.",
        content: COMING_SOON,
        date: "Feb 2026",
        read_time: "5 min",
        tags: &["SpecifyKit", "Methodology", "AI"],
        slug: "spec-first-development",
        featured: true,
    },
    BlogPost {
        id: 2,
        title: "Building RAG Chatbots: Lessons from Panaversity Hackathon",
        excerpt: "Deep dive into building a comprehensive textbook platform with RAG chatbot.",
        content: COMING_SOON,
        date: "Jan 2026",
        read_time: "8 min",
        tags: &["RAG", "Hackathon", "Python"],
        slug: "rag-chatbot-hackathon",
        featured: true,
    },
    BlogPost {
        id: 3,
        title: "Learning from AI Mistakes: A New Paradigm",
        excerpt: "Exploring an innovative approach: embracing AI errors as learning opportunities.",
        content: COMING_SOON,
        date: "Jan 2026",
        read_time: "6 min",
        tags: &["AI Research", "Innovation"],
        slug: "learning-from-ai-mistakes",
        featured: false,
    },
    BlogPost {
        id: 4,
        title: "Next.js + FastAPI: The Ultimate Full-Stack Combo",
        excerpt: "My go-to architecture for production AI apps and how to set it up.",
        content: COMING_SOON,
        date: "Dec 2025",
        read_time: "10 min",
        tags: &["Next.js", "FastAPI", "Full-Stack"],
        slug: "nextjs-fastapi-combo",
        featured: false,
    },
    BlogPost {
        id: 5,
        title: "MCP Servers: Supercharging Claude Desktop",
        excerpt: "How I configured MCP servers to enhance my AI development workflow.",
        content: COMING_SOON,
        date: "Dec 2025",
        read_time: "7 min",
        tags: &["MCP", "Claude", "Productivity"],
        slug: "mcp-servers-claude",
        featured: false,
    },
    BlogPost {
        id: 6,
        title: "From Student to Agentic AI Developer: My Journey",
        excerpt: "The path from learning basics to building autonomous AI agents.",
        content: COMING_SOON,
        date: "Nov 2025",
        read_time: "12 min",
        tags: &["Career", "Agentic AI", "Journey"],
        slug: "student-to-ai-developer",
        featured: false,
    },
];

/// Posts in publication order, optionally filtered by `featured`. A `limit`
/// of zero means no limit.
pub fn list(featured: Option<bool>, limit: Option<usize>) -> Vec<&'static BlogPost> {
    let limit = limit.filter(|&n| n > 0).unwrap_or(usize::MAX);
    POSTS
        .iter()
        .filter(|p| featured.is_none_or(|f| p.featured == f))
        .take(limit)
        .collect()
}

pub fn find(slug: &str) -> Option<&'static BlogPost> {
    POSTS.iter().find(|p| p.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filters() {
        assert_eq!(list(None, None).len(), 6);
        assert_eq!(list(Some(true), None).len(), 2);
        assert_eq!(list(Some(false), Some(3)).len(), 3);
        assert_eq!(list(None, Some(0)).len(), 6);
        assert_eq!(list(None, Some(1))[0].slug, "spec-first-development");
    }

    #[test]
    fn test_find_by_slug() {
        assert_eq!(find("mcp-servers-claude").map(|p| p.id), Some(5));
        assert!(find("missing").is_none());
    }
}
