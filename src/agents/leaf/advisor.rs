//! Advisor agent - answers questions and recommends approaches.

use async_trait::async_trait;

use crate::agents::{
    bullets, signed, Agent, AgentContext, AgentResponse, AgentType, Capabilities, Keywords,
    TaskAnalysis,
};

const DESCRIPTION: &str = "Answers questions and recommends approaches.
Gives decision, implementation and optimisation guidance without touching your files.";

const SYSTEM_PROMPT: &str = "You are a patient technical advisor for people building small \
web apps. Give practical guidance grounded in the notes you are given. Do not write full files.";

/// What kind of help the message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceCategory {
    Decision,
    Implementation,
    Optimization,
    General,
}

impl AdviceCategory {
    /// Checked in declaration order; first hit wins.
    pub fn from_message(kw: &Keywords) -> Self {
        if kw.mentions_any(&["should i", "which", "choose", "decide", "vs", "versus", "better"]) {
            Self::Decision
        } else if kw.mentions_any(&["how", "implement", "build", "add", "create"]) {
            Self::Implementation
        } else if kw.mentions_any(&["optimize", "optimise", "improve", "faster", "performance", "speed"]) {
            Self::Optimization
        } else {
            Self::General
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Self::Decision => "Making the decision",
            Self::Implementation => "How to approach it",
            Self::Optimization => "Making it better",
            Self::General => "General guidance",
        }
    }

    fn guidance(&self) -> &'static [&'static str] {
        match self {
            Self::Decision => &[
                "Pick the simplest option that solves today's problem",
                "Prefer plain HTML, CSS and JavaScript until a library clearly pays for itself",
                "Write down what would make you change your mind later",
            ],
            Self::Implementation => &[
                "Start with the markup so the structure is visible in the preview",
                "Style it next, then add behaviour in script.js",
                "Make one small change at a time and check the preview after each",
            ],
            Self::Optimization => &[
                "Measure first; find the slow part before changing anything",
                "Avoid repeated DOM lookups inside loops",
                "Keep images small and load data only when it is needed",
            ],
            Self::General => &[
                "Describe the result you want to see, not the code you think it needs",
                "Keep each file focused on its job",
                "Ask the Code Editor for concrete changes once the idea is clear",
            ],
        }
    }
}

const BEST_PRACTICES: &[&str] = &[
    "Use semantic HTML elements (header, main, section, footer)",
    "Keep colours and spacing in CSS custom properties",
    "Register event handlers with addEventListener instead of inline attributes",
    "Handle errors around fetch and JSON parsing",
    "Test the layout on a narrow screen",
];

fn next_steps(kw: &Keywords) -> Vec<&'static str> {
    let mut steps = Vec::new();
    if kw.mentions_any(&["form", "input", "submit", "login", "signup"]) {
        steps.push("Add validation messages next to each form field");
    }
    if kw.mentions_any(&["style", "design", "color", "colour", "look", "theme"]) {
        steps.push("Pick a palette of two or three colours and apply it consistently");
    }
    if kw.mentions_any(&["data", "json", "list", "items", "fetch"]) {
        steps.push("Shape data.json around what the page renders");
    }
    if kw.mentions_any(&["mobile", "responsive", "phone"]) {
        steps.push("Add a media query for screens under 600px");
    }
    if steps.is_empty() {
        steps.extend([
            "Decide on the single most important feature",
            "Ask the Code Editor to build it",
            "Review the result with the Project Shepherd",
        ]);
    }
    steps
}

pub struct AdvisorAgent;

impl AdvisorAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AdvisorAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for AdvisorAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Advisor
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_provide_guidance: true,
            ..Capabilities::default()
        }
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn is_capable_of(&self, _task: &TaskAnalysis) -> bool {
        true
    }

    async fn process(&self, ctx: &AgentContext) -> AgentResponse {
        let kw = Keywords::new(&ctx.message);
        let category = AdviceCategory::from_message(&kw);
        tracing::debug!("Advisor category: {:?}", category);

        let draft = format!(
            "{}:\n{}\n\nBest practices:\n{}\n\nNext steps:\n{}",
            category.heading(),
            bullets(category.guidance()),
            bullets(BEST_PRACTICES),
            bullets(&next_steps(&kw))
        );
        let body = ctx.render(AgentType::Advisor, SYSTEM_PROMPT, draft).await;
        AgentResponse::text(AgentType::Advisor, signed(AgentType::Advisor, &body))
    }
}
