//! Shepherd agent - progress and quality audit.
//!
//! # Progress
//! Four milestones, 25% each:
//! 1. Planning discussed in the transcript
//! 2. Markup written
//! 3. Styles written
//! 4. Script written
//!
//! # Quality
//! A fixed checklist over the files. Every check reports "not yet present"
//! for an empty file instead of failing.

use std::fmt;

use async_trait::async_trait;

use crate::agents::types::PROPOSED_CHANGES_HEADING;
use crate::agents::{
    bullets, signed, Agent, AgentContext, AgentResponse, AgentType, Capabilities, Complexity,
    Keywords, TaskAnalysis,
};
use crate::files::WellKnownFile;
use crate::history::{ChatMessage, Role};

const DESCRIPTION: &str = "Tracks progress and code quality across the project.
Audits what has been planned and built so far and suggests what to do next.";

const SYSTEM_PROMPT: &str = "You are a project shepherd keeping a beginner's web app on \
track. Summarise progress and quality from the audit you are given and end with one \
concrete next step.";

const PLANNING_TERMS: &[&str] = &["plan", "design", "architecture", "structure", "idea", "goal"];
const IMPLEMENTATION_TERMS: &[&str] = &["add", "edit", "change", "build", "implement", "create", "update"];
const STUCK_TERMS: &[&str] = &["stuck", "lost", "confused", "blocked", "broken", "not working", "help"];
const NEXT_TERMS: &[&str] = &["what next", "do next", "next step", "next steps", "now what"];

const IMPORTANT_LIMIT: usize = 3;

/// Outcome of one quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Present,
    NotYetPresent,
    NeedsAttention,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Present => "present",
            Self::NotYetPresent => "not yet present",
            Self::NeedsAttention => "needs attention",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityCheck {
    pub name: &'static str,
    pub status: CheckStatus,
}

/// Evidence of earlier work in the transcript.
///
/// Only user turns are scanned for keywords. Assistant turns count by who
/// answered: any architect turn is planning, an editor turn is
/// implementation only when it proposed changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryEvidence {
    pub planning: bool,
    pub implementation: bool,
}

impl HistoryEvidence {
    pub fn from_history(history: &[ChatMessage]) -> Self {
        let mut evidence = Self::default();
        for message in history {
            match (message.role, message.agent) {
                (Role::User, _) => {
                    let kw = Keywords::new(&message.content);
                    evidence.planning |= kw.mentions_any(PLANNING_TERMS);
                    evidence.implementation |= kw.mentions_any(IMPLEMENTATION_TERMS);
                }
                (Role::Assistant, Some(AgentType::Architect)) => evidence.planning = true,
                (Role::Assistant, Some(AgentType::Editor)) => {
                    evidence.implementation |= message.content.contains(PROPOSED_CHANGES_HEADING);
                }
                _ => {}
            }
        }
        evidence
    }
}

/// The four milestones in order.
pub fn milestones(evidence: HistoryEvidence, ctx: &AgentContext) -> [(&'static str, bool); 4] {
    let written = |file| !ctx.file(file).trim().is_empty();
    [
        ("Planning discussed", evidence.planning),
        ("Markup written", written(WellKnownFile::Markup)),
        ("Styles written", written(WellKnownFile::Stylesheet)),
        ("Script written", written(WellKnownFile::Script)),
    ]
}

/// 0, 25, 50, 75 or 100.
pub fn progress_percent(milestones: &[(&'static str, bool)]) -> u8 {
    let done = milestones.iter().filter(|(_, done)| *done).count();
    (done * 25).min(100) as u8
}

fn presence(content: &str, found: bool) -> CheckStatus {
    if content.trim().is_empty() || !found {
        CheckStatus::NotYetPresent
    } else {
        CheckStatus::Present
    }
}

/// Runs the quality checklist.
pub fn quality_checks(ctx: &AgentContext) -> Vec<QualityCheck> {
    let html = ctx.file(WellKnownFile::Markup);
    let css = ctx.file(WellKnownFile::Stylesheet);
    let js = ctx.file(WellKnownFile::Script);
    let html_lower = html.to_ascii_lowercase();

    let important = css.matches("!important").count();
    let important_status = if css.trim().is_empty() {
        CheckStatus::NotYetPresent
    } else if important > IMPORTANT_LIMIT {
        CheckStatus::NeedsAttention
    } else {
        CheckStatus::Present
    };

    let inline_handlers = ["onclick=", "onsubmit=", "onchange=", "onload="]
        .iter()
        .any(|attr| html_lower.contains(attr));
    let handler_status = if inline_handlers {
        CheckStatus::NeedsAttention
    } else if js.contains("addEventListener") {
        CheckStatus::Present
    } else {
        CheckStatus::NotYetPresent
    };

    let responsive = css.contains("@media") || html_lower.contains("name=\"viewport\"");

    vec![
        QualityCheck {
            name: "DOCTYPE declaration",
            status: presence(html, html_lower.contains("<!doctype html")),
        },
        QualityCheck {
            name: "Charset meta tag",
            status: presence(html, html_lower.contains("charset")),
        },
        QualityCheck {
            name: "Page title",
            status: presence(html, html_lower.contains("<title")),
        },
        QualityCheck {
            name: "Restrained !important usage",
            status: important_status,
        },
        QualityCheck {
            name: "Registered event handlers",
            status: handler_status,
        },
        QualityCheck {
            name: "Accessibility attributes",
            status: presence(
                html,
                ["alt=", "aria-", "role=", "<label"]
                    .iter()
                    .any(|marker| html_lower.contains(marker)),
            ),
        },
        QualityCheck {
            name: "Responsive design",
            status: if css.trim().is_empty() && html.trim().is_empty() {
                CheckStatus::NotYetPresent
            } else {
                presence(if css.trim().is_empty() { html } else { css }, responsive)
            },
        },
        QualityCheck {
            name: "Error handling",
            status: presence(
                js,
                js.contains("try {") || js.contains("try{") || js.contains(".catch("),
            ),
        },
    ]
}

fn guidance(kw: &Keywords, reached: &[(&'static str, bool)], checks: &[QualityCheck]) -> String {
    if kw.mentions_any(STUCK_TERMS) {
        return "Being stuck is normal. Undo back to the last version that worked, then \
                describe the smallest next change you want and ask the Code Editor for \
                just that."
            .to_string();
    }

    let attention: Vec<&str> = checks
        .iter()
        .filter(|c| c.status == CheckStatus::NeedsAttention)
        .map(|c| c.name)
        .collect();

    let step = match reached.iter().position(|(_, done)| !done) {
        Some(0) => "Describe what the app should do and who it is for before building more.",
        Some(1) => "Write the page markup so there is something to see.",
        Some(2) => "Give the page some styling.",
        Some(_) => "Add behaviour in script.js.",
        None => "The basics are in place. Polish the details or plan the next feature.",
    };

    let mut text = if kw.mentions_any(NEXT_TERMS) {
        format!("Here's what to do next: {}", step)
    } else {
        step.to_string()
    };
    if !attention.is_empty() {
        text.push_str(&format!(" Also look at: {}.", attention.join(", ")));
    }
    text
}

pub struct ShepherdAgent;

impl ShepherdAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShepherdAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ShepherdAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Shepherd
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_analyze_code: true,
            can_provide_guidance: true,
            ..Capabilities::default()
        }
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn is_capable_of(&self, task: &TaskAnalysis) -> bool {
        task.complexity != Complexity::Simple
    }

    async fn process(&self, ctx: &AgentContext) -> AgentResponse {
        let evidence = HistoryEvidence::from_history(&ctx.history);
        let reached = milestones(evidence, ctx);
        let percent = progress_percent(&reached);
        let checks = quality_checks(ctx);
        tracing::debug!("Shepherd audit: {}% complete", percent);

        let milestone_lines: Vec<String> = reached
            .iter()
            .map(|(name, done)| format!("[{}] {}", if *done { "x" } else { " " }, name))
            .collect();
        let check_lines: Vec<String> = checks
            .iter()
            .map(|c| format!("{}: {}", c.name, c.status))
            .collect();

        let draft = format!(
            "Overall progress: {}%\n\nMilestones:\n{}\n\nQuality checks:\n{}\n\n{}",
            percent,
            bullets(&milestone_lines),
            bullets(&check_lines),
            guidance(&Keywords::new(&ctx.message), &reached, &checks)
        );
        let body = ctx.render(AgentType::Shepherd, SYSTEM_PROMPT, draft).await;
        AgentResponse::text(AgentType::Shepherd, signed(AgentType::Shepherd, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::FileContents;
    use crate::llm::TemplateGenerator;
    use std::sync::Arc;

    fn ctx(message: &str, files: &[(&str, &str)], history: Vec<ChatMessage>) -> AgentContext {
        let files: FileContents = files
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentContext::new("app", "ws", message, files, history, Arc::new(TemplateGenerator))
    }

    #[tokio::test]
    async fn test_empty_project_reports_zero_progress() {
        let ctx = ctx(
            "how am I doing?",
            &[
                ("index.html", ""),
                ("styles.css", ""),
                ("script.js", ""),
                ("data.json", ""),
            ],
            Vec::new(),
        );

        let checks = quality_checks(&ctx);
        assert!(checks.iter().all(|c| c.status == CheckStatus::NotYetPresent));

        let response = ShepherdAgent::new().process(&ctx).await;
        assert!(response.message.contains("Overall progress: 0%"));
        for check in &checks {
            assert!(response
                .message
                .contains(&format!("{}: not yet present", check.name)));
        }
        assert!(response.actions.is_empty());
        assert!(response.completed);
    }

    #[test]
    fn test_progress_from_history_and_files() {
        let history = vec![ChatMessage::user("let's plan a todo app")];
        let ctx = ctx(
            "status?",
            &[("index.html", "<body></body>"), ("styles.css", "body {}")],
            history,
        );
        let evidence = HistoryEvidence::from_history(&ctx.history);
        assert!(evidence.planning);
        assert_eq!(progress_percent(&milestones(evidence, &ctx)), 75);
    }

    #[test]
    fn test_assistant_wording_is_not_evidence() {
        let history = vec![
            ChatMessage::user("hello there"),
            ChatMessage::assistant(
                AgentType::Manager,
                "Software Architect: reviews structure and design",
            ),
            ChatMessage::assistant(AgentType::Shepherd, "- Responsive design: not yet present"),
            ChatMessage::assistant(AgentType::Editor, "Which element should I add or change?"),
        ];
        assert_eq!(HistoryEvidence::from_history(&history), HistoryEvidence::default());
    }

    #[test]
    fn test_assistant_turns_count_by_agent() {
        let history = vec![
            ChatMessage::assistant(AgentType::Architect, "Architecture review: 0/4 checks passed."),
            ChatMessage::assistant(
                AgentType::Editor,
                "Here are the changes.\n\nProposed changes:\n- file_edit index.html: add button",
            ),
        ];
        let evidence = HistoryEvidence::from_history(&history);
        assert!(evidence.planning);
        assert!(evidence.implementation);
    }

    #[test]
    fn test_inline_handlers_and_important_need_attention() {
        let css = ".a { color: red !important; }\n".repeat(4);
        let ctx = ctx(
            "review",
            &[
                ("index.html", "<button onclick=\"go()\">Go</button>"),
                ("styles.css", css.as_str()),
            ],
            Vec::new(),
        );
        let checks = quality_checks(&ctx);
        let status = |name: &str| checks.iter().find(|c| c.name == name).unwrap().status;

        assert_eq!(status("Registered event handlers"), CheckStatus::NeedsAttention);
        assert_eq!(status("Restrained !important usage"), CheckStatus::NeedsAttention);
        assert_eq!(status("DOCTYPE declaration"), CheckStatus::NotYetPresent);
    }

    #[tokio::test]
    async fn test_stuck_guidance() {
        let ctx = ctx("I'm stuck", &[], Vec::new());
        let response = ShepherdAgent::new().process(&ctx).await;
        assert!(response.message.contains("Being stuck is normal"));
    }

    #[test]
    fn test_rejects_only_simple_tasks() {
        let shepherd = ShepherdAgent::new();
        assert!(!shepherd.is_capable_of(&TaskAnalysis::classify("hello")));
        assert!(shepherd.is_capable_of(&TaskAnalysis::classify("restyle the layout")));
    }
}
