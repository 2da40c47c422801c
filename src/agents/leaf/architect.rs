//! Architect agent - read-only structural review.
//!
//! Runs a fixed checklist over each file, then adds recommendations picked
//! by the intent of the message (scale, maintainability, responsiveness,
//! security). Never proposes actions.

use async_trait::async_trait;

use crate::agents::{
    bullets, signed, Agent, AgentContext, AgentResponse, AgentType, Capabilities, Complexity,
    Keywords, TaskAnalysis,
};
use crate::files::WellKnownFile;

const DESCRIPTION: &str = "Reviews the structure and design of your app.
Checks semantic markup, accessibility, stylesheet organisation, script robustness and data \
validity, and recommends how to evolve the app.";

const SYSTEM_PROMPT: &str = "You are a software architect reviewing a small web app. Report \
the findings you are given, explain which matter most and why, and do not write code.";

const SEMANTIC_TAGS: &[&str] = &["<header", "<nav", "<main", "<section", "<article", "<footer"];
const A11Y_MARKERS: &[&str] = &["alt=", "aria-", "role=", "<label", "lang="];

/// One checklist outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file: WellKnownFile,
    pub passed: bool,
    pub note: String,
}

impl Finding {
    fn new(file: WellKnownFile, passed: bool, note: impl Into<String>) -> Self {
        Self {
            file,
            passed,
            note: note.into(),
        }
    }

    fn render(&self) -> String {
        let mark = if self.passed { "✓" } else { "✗" };
        format!("{} {}", mark, self.note)
    }
}

fn count_any(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| haystack.contains(*n)).count()
}

fn review_markup(html: &str) -> Vec<Finding> {
    let file = WellKnownFile::Markup;
    if html.trim().is_empty() {
        return vec![Finding::new(file, false, "No markup yet")];
    }
    let lower = html.to_ascii_lowercase();
    let semantic = count_any(&lower, SEMANTIC_TAGS);
    let a11y = count_any(&lower, A11Y_MARKERS);
    vec![
        Finding::new(
            file,
            semantic > 0,
            if semantic > 0 {
                format!("Uses {} kind(s) of semantic tag", semantic)
            } else {
                "No semantic tags (header, nav, main, section, article, footer)".to_string()
            },
        ),
        Finding::new(
            file,
            a11y > 0,
            if a11y > 0 {
                "Has accessibility attributes".to_string()
            } else {
                "No accessibility attributes (alt, aria-*, role, label, lang)".to_string()
            },
        ),
    ]
}

fn review_stylesheet(css: &str) -> Vec<Finding> {
    let file = WellKnownFile::Stylesheet;
    if css.trim().is_empty() {
        return vec![Finding::new(file, false, "No styles yet")];
    }
    let class_rules = css
        .lines()
        .filter(|l| l.trim_start().starts_with('.') && l.contains('{'))
        .count();
    let uses_variables = css.contains("--") && css.contains("var(");
    let uses_layout = css.contains("display: flex")
        || css.contains("display:flex")
        || css.contains("display: grid")
        || css.contains("display:grid");
    vec![
        Finding::new(
            file,
            class_rules >= 2,
            format!("{} class-based rule(s)", class_rules),
        ),
        Finding::new(
            file,
            uses_variables,
            if uses_variables {
                "Uses CSS custom properties"
            } else {
                "No CSS custom properties for shared values"
            },
        ),
        Finding::new(
            file,
            uses_layout,
            if uses_layout {
                "Uses flexbox or grid layout"
            } else {
                "No flexbox or grid layout"
            },
        ),
    ]
}

fn review_script(js: &str) -> Vec<Finding> {
    let file = WellKnownFile::Script;
    if js.trim().is_empty() {
        return vec![Finding::new(file, false, "No script yet")];
    }
    let modular = js.contains("import ") || js.contains("export ");
    let handles_errors = js.contains("try {") || js.contains("try{") || js.contains(".catch(");
    let uses_async = js.contains("async ") || js.contains("await ") || js.contains("Promise");
    vec![
        Finding::new(
            file,
            modular,
            if modular {
                "Uses ES modules"
            } else {
                "Single script without modules"
            },
        ),
        Finding::new(
            file,
            handles_errors,
            if handles_errors {
                "Has error handling"
            } else {
                "No error handling (try/catch or .catch)"
            },
        ),
        Finding::new(
            file,
            uses_async,
            if uses_async {
                "Uses async code"
            } else {
                "No async code"
            },
        ),
    ]
}

fn review_data(json: &str) -> Vec<Finding> {
    let file = WellKnownFile::Data;
    if json.trim().is_empty() {
        return vec![Finding::new(file, false, "No data yet")];
    }
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(_) => vec![Finding::new(file, true, "Valid JSON")],
        Err(e) => vec![Finding::new(file, false, format!("Invalid JSON: {}", e))],
    }
}

/// Full checklist over the context's files.
pub fn review(ctx: &AgentContext) -> Vec<Finding> {
    let mut findings = review_markup(ctx.file(WellKnownFile::Markup));
    findings.extend(review_stylesheet(ctx.file(WellKnownFile::Stylesheet)));
    findings.extend(review_script(ctx.file(WellKnownFile::Script)));
    findings.extend(review_data(ctx.file(WellKnownFile::Data)));
    findings
}

fn recommendations(kw: &Keywords) -> Vec<&'static str> {
    let mut recs = Vec::new();
    if kw.mentions_any(&["scale", "scaling", "performance", "fast", "slow", "optimize", "speed"]) {
        recs.extend([
            "Load data lazily and render only what is visible",
            "Cache fetched data instead of requesting it on every interaction",
            "Keep DOM updates batched; build markup strings once and insert them together",
        ]);
    }
    if kw.mentions_any(&["maintain", "maintainable", "clean", "organize", "refactor", "readable"]) {
        recs.extend([
            "Split script.js into small functions with one job each",
            "Move repeated colours and sizes into CSS custom properties",
            "Name classes after what elements are, not how they look",
        ]);
    }
    if kw.mentions_any(&["responsive", "mobile", "screen", "device", "tablet"]) {
        recs.extend([
            "Add a viewport meta tag and design mobile-first",
            "Use flexbox or grid with relative units instead of fixed widths",
            "Add media queries at the widths where the layout breaks",
        ]);
    }
    if kw.mentions_any(&["secure", "security", "auth", "password", "xss", "sanitize"]) {
        recs.extend([
            "Never insert user input with innerHTML; use textContent",
            "Keep secrets out of client-side files entirely",
            "Validate data loaded from data.json before rendering it",
        ]);
    }
    if recs.is_empty() {
        recs.extend([
            "Keep structure, presentation and behaviour in their own files",
            "Use semantic elements so the page explains itself",
            "Add error handling around anything that can fail at runtime",
        ]);
    }
    recs
}

pub struct ArchitectAgent;

impl ArchitectAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArchitectAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ArchitectAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Architect
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_analyze_code: true,
            can_provide_guidance: true,
            can_make_decisions: true,
            ..Capabilities::default()
        }
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn is_capable_of(&self, task: &TaskAnalysis) -> bool {
        matches!(task.complexity, Complexity::Complex | Complexity::Architectural)
    }

    async fn process(&self, ctx: &AgentContext) -> AgentResponse {
        let findings = review(ctx);
        let kw = Keywords::new(&ctx.message);

        let mut sections = Vec::new();
        for file in WellKnownFile::ALL {
            let lines: Vec<String> = findings
                .iter()
                .filter(|f| f.file == file)
                .map(Finding::render)
                .collect();
            sections.push(format!("{} ({})\n{}", file.label(), file, bullets(&lines)));
        }

        let passed = findings.iter().filter(|f| f.passed).count();
        let draft = format!(
            "Architecture review: {}/{} checks passed.\n\n{}\n\nRecommendations:\n{}",
            passed,
            findings.len(),
            sections.join("\n\n"),
            bullets(&recommendations(&kw))
        );
        let body = ctx.render(AgentType::Architect, SYSTEM_PROMPT, draft).await;
        AgentResponse::text(AgentType::Architect, signed(AgentType::Architect, &body))
    }
}
