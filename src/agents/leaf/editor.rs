//! Editor agent - the only agent that proposes file changes.
//!
//! # Algorithm
//! 1. Work out which files the request implicates: explicit file-type words
//!    first, then UI / appearance / behaviour / data vocabulary, then all
//!    three code files
//! 2. Run the per-file templates (see [`super::templates`]) over each
//! 3. Files where no template matches are skipped
//! 4. No edits at all → ask a clarifying question instead

use async_trait::async_trait;

use crate::agents::{
    bullets, signed, Agent, AgentAction, AgentContext, AgentResponse, AgentType, Capabilities,
    Complexity, Keywords, TaskAnalysis,
};
use crate::files::WellKnownFile;

use super::templates::{self, FileEdit, Hints};

const DESCRIPTION: &str = "Makes concrete changes to your HTML, CSS, JavaScript and data files.
Turns a plain description of a change into edits of the four app files.";

const SYSTEM_PROMPT: &str = "You are a front-end developer editing a small web app made of \
index.html, styles.css, script.js and data.json. Explain the proposed changes briefly and \
tell the user how to check them in the preview.";

const EXPLICIT_TERMS: [(WellKnownFile, &[&str]); 4] = [
    (WellKnownFile::Markup, &["html", "markup"]),
    (WellKnownFile::Stylesheet, &["css", "stylesheet"]),
    (WellKnownFile::Script, &["javascript", "js", "script"]),
    (WellKnownFile::Data, &["json"]),
];

const INFERRED_TERMS: [(WellKnownFile, &[&str]); 4] = [
    (
        WellKnownFile::Markup,
        &[
            "button", "form", "input", "header", "heading", "title", "footer", "image", "picture",
            "photo", "link", "section", "card", "list", "page", "hero",
        ],
    ),
    (
        WellKnownFile::Stylesheet,
        &[
            "style", "color", "colour", "font", "background", "layout", "margin", "padding",
            "theme", "dark", "center", "centre", "responsive", "mobile", "look", "border",
            "animation", "animate", "pretty",
        ],
    ),
    (
        WellKnownFile::Script,
        &[
            "click", "interactive", "event", "toggle", "function", "logic", "submit", "validate",
            "validation", "fetch", "load", "behavior", "behaviour",
        ],
    ),
    (
        WellKnownFile::Data,
        &["data", "item", "entry", "record", "setting", "settings", "config"],
    ),
];

fn matching_files(kw: &Keywords, table: &[(WellKnownFile, &[&str])]) -> Vec<WellKnownFile> {
    table
        .iter()
        .filter(|(_, terms)| kw.mentions_any(*terms))
        .map(|(file, _)| *file)
        .collect()
}

pub struct EditorAgent {
    capabilities: Capabilities,
}

impl EditorAgent {
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities {
                can_edit_files: true,
                can_analyze_code: true,
                ..Capabilities::default()
            },
        }
    }

    /// Files the request is about, in canonical order.
    pub fn implicated_files(message: &str) -> Vec<WellKnownFile> {
        let kw = Keywords::new(message);

        let explicit = matching_files(&kw, &EXPLICIT_TERMS);
        if !explicit.is_empty() {
            return explicit;
        }
        let inferred = matching_files(&kw, &INFERRED_TERMS);
        if !inferred.is_empty() {
            return inferred;
        }
        WellKnownFile::CODE.to_vec()
    }

    fn synthesize(
        file: WellKnownFile,
        content: &str,
        kw: &Keywords,
        hints: &Hints,
    ) -> Option<FileEdit> {
        match file {
            WellKnownFile::Markup => templates::edit_markup(content, kw, hints),
            WellKnownFile::Stylesheet => templates::edit_stylesheet(content, kw, hints),
            WellKnownFile::Script => templates::edit_script(content, kw, hints),
            WellKnownFile::Data => templates::edit_data(content, kw, hints),
        }
    }

    /// Proposed actions plus a bullet line per change.
    fn propose(&self, ctx: &AgentContext) -> (Vec<AgentAction>, Vec<String>) {
        let kw = Keywords::new(&ctx.message);
        let hints = Hints::from_message(&ctx.message, &kw);
        let mut actions = Vec::new();
        let mut lines = Vec::new();

        for file in Self::implicated_files(&ctx.message) {
            let name = file.filename();
            let current = ctx.files.get(name).map(String::as_str);
            let Some(edit) = Self::synthesize(file, current.unwrap_or(""), &kw, &hints) else {
                tracing::debug!("Editor: no template matched for {}", name);
                continue;
            };
            if current == Some(edit.content.as_str()) {
                continue;
            }

            let description = edit.notes.join("; ");
            lines.push(format!("{}: {}", name, description));
            actions.push(match current {
                Some(_) => AgentAction::file_edit(name, edit.content, description),
                None => AgentAction::file_create(name, edit.content, description),
            });
        }

        (actions, lines)
    }
}

impl Default for EditorAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for EditorAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Editor
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn is_capable_of(&self, task: &TaskAnalysis) -> bool {
        self.capabilities.can_edit_files && task.complexity != Complexity::Architectural
    }

    async fn process(&self, ctx: &AgentContext) -> AgentResponse {
        let (actions, lines) = self.propose(ctx);

        if actions.is_empty() {
            let draft = "I couldn't tell which change you want. Which element should I add or \
                         change (for example a button, a form, a header or a list), and how \
                         should it look or behave?"
                .to_string();
            let body = ctx.render(AgentType::Editor, SYSTEM_PROMPT, draft).await;
            return AgentResponse::text(AgentType::Editor, signed(AgentType::Editor, &body));
        }

        tracing::info!("Editor proposing {} file change(s)", actions.len());
        let draft = format!(
            "Here are the changes I'd make:\n{}\n\nApply them and check the preview. \
             Tell me if anything should look or behave differently.",
            bullets(&lines)
        );
        let body = ctx.render(AgentType::Editor, SYSTEM_PROMPT, draft).await;
        AgentResponse::text(AgentType::Editor, signed(AgentType::Editor, &body)).with_actions(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ActionKind;
    use crate::files::FileContents;
    use crate::llm::TemplateGenerator;
    use std::sync::Arc;

    fn ctx(message: &str, files: &[(&str, &str)]) -> AgentContext {
        let files: FileContents = files
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentContext::new("app", "ws", message, files, Vec::new(), Arc::new(TemplateGenerator))
    }

    #[test]
    fn test_explicit_file_words_win() {
        assert_eq!(
            EditorAgent::implicated_files("change the css for the button"),
            vec![WellKnownFile::Stylesheet]
        );
    }

    #[test]
    fn test_inferred_files() {
        assert_eq!(
            EditorAgent::implicated_files("can you add a button and style it"),
            vec![WellKnownFile::Markup, WellKnownFile::Stylesheet]
        );
    }

    #[test]
    fn test_defaults_to_code_files() {
        assert_eq!(
            EditorAgent::implicated_files("do the thing"),
            WellKnownFile::CODE.to_vec()
        );
    }

    #[tokio::test]
    async fn test_button_and_style_scenario() {
        let ctx = ctx(
            "can you add a button and style it",
            &[("index.html", "<body></body>"), ("styles.css", "")],
        );
        let response = EditorAgent::new().process(&ctx).await;

        let html = response
            .actions
            .iter()
            .find(|a| a.target == "index.html")
            .expect("index.html edit");
        assert_eq!(html.kind, ActionKind::FileEdit);
        let content = html.content.as_deref().unwrap();
        let button = content.find("<button").unwrap();
        assert!(button < content.find("</body>").unwrap());

        let css = response
            .actions
            .iter()
            .find(|a| a.target == "styles.css")
            .expect("styles.css edit");
        assert_eq!(css.kind, ActionKind::FileEdit);
        assert!(css.content.as_deref().unwrap().contains(".btn {"));

        assert!(response.completed);
        assert!(response.message.starts_with("**Code Editor**"));
    }

    #[tokio::test]
    async fn test_missing_file_is_created() {
        let ctx = ctx("make the button respond to a click", &[("index.html", "<body></body>")]);
        let response = EditorAgent::new().process(&ctx).await;

        let script = response
            .actions
            .iter()
            .find(|a| a.target == "script.js")
            .expect("script.js action");
        assert_eq!(script.kind, ActionKind::FileCreate);
    }

    #[tokio::test]
    async fn test_clarifies_when_nothing_matches() {
        let ctx = ctx("do the thing", &[("index.html", "<body></body>")]);
        let response = EditorAgent::new().process(&ctx).await;

        assert!(response.actions.is_empty());
        assert!(response.completed);
        assert!(response.message.contains("Which element"));
    }

    #[test]
    fn test_rejects_architectural_work() {
        let editor = EditorAgent::new();
        assert!(!editor.is_capable_of(&TaskAnalysis::classify("migrate the database")));
        assert!(editor.is_capable_of(&TaskAnalysis::classify("add a button")));
    }
}
