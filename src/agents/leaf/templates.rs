//! Snippet templates the editor inserts into each file type.
//!
//! Each `edit_*` function returns the new file content plus a note per
//! applied pattern, or `None` when no pattern matches (the file is skipped).

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use crate::agents::Keywords;

/// Skeleton used when the markup file is missing or blank.
pub const HTML_SKELETON: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>My App</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <script src="script.js"></script>
</body>
</html>
"#;

const NAMED_COLORS: &[&str] = &[
    "red", "blue", "green", "purple", "orange", "pink", "teal", "yellow", "black", "white",
    "gray", "grey", "navy", "indigo",
];

static LABEL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static BODY_OPEN_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn label_re() -> Option<&'static Regex> {
    LABEL_RE
        .get_or_init(|| Regex::new(r#"["“]([^"”]{1,60})["”]"#).ok())
        .as_ref()
}

fn body_open_re() -> Option<&'static Regex> {
    BODY_OPEN_RE
        .get_or_init(|| Regex::new(r"(?i)<body[^>]*>").ok())
        .as_ref()
}

/// Wording pulled out of the message for inserted elements.
#[derive(Debug, Clone, Default)]
pub struct Hints {
    /// First double-quoted phrase, e.g. `add a button "Sign up"`
    pub label: Option<String>,
    /// First named colour mentioned
    pub color: Option<&'static str>,
}

impl Hints {
    pub fn from_message(message: &str, kw: &Keywords) -> Self {
        let label = label_re()
            .and_then(|re| re.captures(message))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        let color = NAMED_COLORS.iter().copied().find(|c| kw.mentions(c));
        Self { label, color }
    }

    fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(fallback)
    }
}

/// Result of applying templates to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub content: String,
    pub notes: Vec<String>,
}

/// Insert `snippet` on its own line before the last `</body>`, or append.
pub fn insert_before_body_close(content: &str, snippet: &str) -> String {
    let lower = content.to_ascii_lowercase();
    match lower.rfind("</body>") {
        Some(idx) => {
            let (head, tail) = content.split_at(idx);
            let mut out = String::with_capacity(content.len() + snippet.len() + 2);
            out.push_str(head);
            if !head.is_empty() && !head.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(snippet);
            out.push('\n');
            out.push_str(tail);
            out
        }
        None => append_block(content, snippet, "\n"),
    }
}

/// Insert `snippet` right after the opening `<body ...>` tag, or prepend.
pub fn insert_after_body_open(content: &str, snippet: &str) -> String {
    let open = body_open_re().and_then(|re| re.find(content).map(|m| m.end()));
    match open {
        Some(end) => {
            let (head, tail) = content.split_at(end);
            format!("{}\n{}{}", head, snippet, tail)
        }
        None => format!("{}\n{}", snippet, content),
    }
}

fn append_block(content: &str, block: &str, separator: &str) -> String {
    if content.trim().is_empty() {
        format!("{}\n", block)
    } else {
        format!("{}{}{}\n", content.trim_end(), separator, block)
    }
}

pub fn edit_markup(content: &str, kw: &Keywords, hints: &Hints) -> Option<FileEdit> {
    let mut html = if content.trim().is_empty() {
        HTML_SKELETON.to_string()
    } else {
        content.to_string()
    };
    let mut notes = Vec::new();

    if kw.mentions_any(&["header", "heading", "title", "hero"]) {
        let snippet = format!(
            "<header class=\"site-header\">\n  <h1>{}</h1>\n</header>",
            hints.label_or("My App")
        );
        html = insert_after_body_open(&html, &snippet);
        notes.push("Add a header at the top of the page".to_string());
    }
    if kw.mentions("button") {
        let snippet = format!(
            "<button class=\"btn\" id=\"action-btn\">{}</button>",
            hints.label_or("Click me")
        );
        html = insert_before_body_close(&html, &snippet);
        notes.push("Add a button before </body>".to_string());
    }
    if kw.mentions_any(&["form", "input", "signup", "contact"]) {
        let snippet = "<form id=\"main-form\" class=\"form\">\n  <label for=\"name\">Name</label>\n  <input type=\"text\" id=\"name\" name=\"name\" required>\n  <button type=\"submit\" class=\"btn\">Submit</button>\n</form>";
        html = insert_before_body_close(&html, snippet);
        notes.push("Add a form with a labelled input".to_string());
    }
    if kw.mentions_any(&["card", "section"]) {
        let snippet = format!(
            "<section class=\"card\">\n  <h2>{}</h2>\n  <p>Describe this section.</p>\n</section>",
            hints.label_or("New section")
        );
        html = insert_before_body_close(&html, &snippet);
        notes.push("Add a content section".to_string());
    }
    if kw.mentions_any(&["image", "picture", "photo"]) {
        let snippet = format!(
            "<img src=\"https://placehold.co/600x400\" alt=\"{}\" class=\"image\">",
            hints.label_or("Placeholder image")
        );
        html = insert_before_body_close(&html, &snippet);
        notes.push("Add an image with alt text".to_string());
    }
    if kw.mentions("link") {
        let snippet = format!("<a href=\"#\" class=\"link\">{}</a>", hints.label_or("Learn more"));
        html = insert_before_body_close(&html, &snippet);
        notes.push("Add a link".to_string());
    }
    if kw.mentions_any(&["list", "item"]) {
        html = insert_before_body_close(&html, "<ul id=\"item-list\" class=\"item-list\"></ul>");
        notes.push("Add a list container for items".to_string());
    }
    if kw.mentions("footer") {
        let snippet = format!(
            "<footer class=\"site-footer\">\n  <p>{}</p>\n</footer>",
            hints.label_or("Made with care")
        );
        html = insert_before_body_close(&html, &snippet);
        notes.push("Add a footer".to_string());
    }

    if notes.is_empty() {
        return None;
    }
    Some(FileEdit { content: html, notes })
}

pub fn edit_stylesheet(content: &str, kw: &Keywords, hints: &Hints) -> Option<FileEdit> {
    let mut rules: Vec<String> = Vec::new();
    let mut notes = Vec::new();

    if kw.mentions("button") {
        rules.push(
            ".btn {\n  padding: 0.6rem 1.2rem;\n  border: none;\n  border-radius: 6px;\n  background: var(--accent-color, #4f46e5);\n  color: #fff;\n  cursor: pointer;\n}\n\n.btn:hover {\n  opacity: 0.9;\n}"
                .to_string(),
        );
        notes.push("Style the .btn class".to_string());
    }
    if kw.mentions_any(&["form", "input"]) {
        rules.push(
            ".form {\n  display: flex;\n  flex-direction: column;\n  gap: 0.5rem;\n  max-width: 320px;\n}\n\n.form input {\n  padding: 0.5rem;\n  border: 1px solid #ccc;\n  border-radius: 4px;\n}"
                .to_string(),
        );
        notes.push("Lay out the form fields".to_string());
    }
    if kw.mentions_any(&["header", "heading", "hero"]) {
        rules.push(".site-header {\n  padding: 1.5rem 0;\n  text-align: center;\n}".to_string());
        notes.push("Style the header".to_string());
    }
    if kw.mentions_any(&["card", "section"]) {
        rules.push(
            ".card {\n  padding: 1rem;\n  border-radius: 8px;\n  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08);\n}"
                .to_string(),
        );
        notes.push("Add a card style".to_string());
    }
    if kw.mentions("footer") {
        rules.push(
            ".site-footer {\n  margin-top: 2rem;\n  font-size: 0.875rem;\n  color: #666;\n}"
                .to_string(),
        );
        notes.push("Style the footer".to_string());
    }
    if kw.mentions_any(&["color", "colour", "colors", "colours"]) || hints.color.is_some() {
        let color = hints.color.unwrap_or("#4f46e5");
        rules.push(format!(
            ":root {{\n  --accent-color: {};\n}}\n\nh1, h2, a {{\n  color: var(--accent-color);\n}}",
            color
        ));
        notes.push(format!("Set the accent colour to {}", color));
    }
    if kw.mentions_any(&["dark", "theme"]) {
        rules.push(
            "body.dark-theme {\n  background: #121212;\n  color: #f5f5f5;\n}\n\n@media (prefers-color-scheme: dark) {\n  body {\n    background: #121212;\n    color: #f5f5f5;\n  }\n}"
                .to_string(),
        );
        notes.push("Add a dark theme".to_string());
    }
    if kw.mentions_any(&["font", "typography", "text"]) {
        rules.push(
            "body {\n  font-family: system-ui, -apple-system, sans-serif;\n  line-height: 1.6;\n}"
                .to_string(),
        );
        notes.push("Use a system font stack".to_string());
    }
    if kw.mentions_any(&["center", "centre", "layout"]) {
        rules.push(
            "body {\n  display: flex;\n  flex-direction: column;\n  align-items: center;\n}"
                .to_string(),
        );
        notes.push("Center the page content with flexbox".to_string());
    }
    if kw.mentions_any(&["responsive", "mobile", "phone"]) {
        rules.push(
            "@media (max-width: 600px) {\n  body {\n    padding: 1rem;\n  }\n\n  .btn {\n    width: 100%;\n  }\n}"
                .to_string(),
        );
        notes.push("Add a small-screen media query".to_string());
    }
    if kw.mentions_any(&["animation", "animate", "fade"]) {
        rules.push(
            "@keyframes fade-in {\n  from { opacity: 0; }\n  to { opacity: 1; }\n}\n\n.fade-in {\n  animation: fade-in 0.4s ease-out;\n}"
                .to_string(),
        );
        notes.push("Add a fade-in animation".to_string());
    }
    if rules.is_empty() && kw.mentions_any(&["style", "look", "pretty", "prettier", "nicer"]) {
        rules.push(
            "body {\n  margin: 0;\n  padding: 2rem;\n  font-family: system-ui, -apple-system, sans-serif;\n  color: #222;\n}"
                .to_string(),
        );
        notes.push("Add base page styling".to_string());
    }

    if rules.is_empty() {
        return None;
    }
    Some(FileEdit {
        content: append_block(content, &rules.join("\n\n"), "\n\n"),
        notes,
    })
}

pub fn edit_script(content: &str, kw: &Keywords, _hints: &Hints) -> Option<FileEdit> {
    let mut handlers: Vec<&str> = Vec::new();
    let mut functions: Vec<&str> = Vec::new();
    let mut notes = Vec::new();

    if kw.mentions_any(&["button", "click"]) {
        handlers.push(
            "  const button = document.getElementById('action-btn');\n  if (button) {\n    button.addEventListener('click', () => {\n      button.classList.toggle('active');\n      console.log('Button clicked');\n    });\n  }",
        );
        notes.push("Register a click handler for the button".to_string());
    }
    if kw.mentions_any(&["form", "submit", "validate", "validation"]) {
        handlers.push(
            "  const form = document.getElementById('main-form');\n  if (form) {\n    form.addEventListener('submit', (event) => {\n      event.preventDefault();\n      const name = form.querySelector('#name');\n      if (!name || !name.value.trim()) {\n        alert('Please enter a name.');\n        return;\n      }\n      console.log('Submitted', name.value);\n    });\n  }",
        );
        notes.push("Handle form submission with validation".to_string());
    }
    if kw.mentions_any(&["toggle", "dark", "theme"]) {
        handlers.push(
            "  const toggle = document.getElementById('theme-toggle');\n  if (toggle) {\n    toggle.addEventListener('click', () => {\n      document.body.classList.toggle('dark-theme');\n    });\n  }",
        );
        notes.push("Toggle the dark theme".to_string());
    }
    if kw.mentions_any(&["fetch", "load", "data", "items"]) {
        handlers.push("  loadItems();");
        functions.push(
            "async function loadItems() {\n  try {\n    const response = await fetch('data.json');\n    const data = await response.json();\n    const list = document.getElementById('item-list');\n    if (!list || !Array.isArray(data.items)) return;\n    list.innerHTML = data.items.map((item) => `<li>${item.name}</li>`).join('');\n  } catch (error) {\n    console.error('Failed to load data', error);\n  }\n}",
        );
        notes.push("Load items from data.json".to_string());
    }

    if handlers.is_empty() {
        return None;
    }
    let mut block = format!(
        "document.addEventListener('DOMContentLoaded', () => {{\n{}\n}});",
        handlers.join("\n\n")
    );
    for function in functions {
        block.push_str("\n\n");
        block.push_str(function);
    }
    Some(FileEdit {
        content: append_block(content, &block, "\n\n"),
        notes,
    })
}

pub fn edit_data(content: &str, kw: &Keywords, hints: &Hints) -> Option<FileEdit> {
    let mut value: Value = if content.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("Skipping data.json edit, content is not valid JSON: {}", e);
                return None;
            }
        }
    };
    let mut notes = Vec::new();

    if kw.mentions_any(&["item", "entry", "record", "list"]) {
        let items = match &mut value {
            Value::Array(items) => Some(items),
            Value::Object(map) => map
                .entry("items")
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut(),
            _ => None,
        };
        if let Some(items) = items {
            let id = items
                .iter()
                .filter_map(|item| item.get("id").and_then(Value::as_u64))
                .max()
                .unwrap_or(0)
                + 1;
            items.push(json!({ "id": id, "name": hints.label_or("New item") }));
            notes.push(format!("Append item #{}", id));
        }
    }
    if kw.mentions_any(&["theme", "dark", "light"]) {
        if let Value::Object(map) = &mut value {
            let theme = if kw.mentions("light") { "light" } else { "dark" };
            let settings = map
                .entry("settings")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(settings) = settings {
                settings.insert("theme".to_string(), Value::String(theme.to_string()));
                notes.push(format!("Set settings.theme to \"{}\"", theme));
            }
        }
    }

    if notes.is_empty() {
        return None;
    }
    let content = serde_json::to_string_pretty(&value).ok()?;
    Some(FileEdit {
        content: format!("{}\n", content),
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(message: &str) -> Keywords {
        Keywords::new(message)
    }

    #[test]
    fn test_button_inserted_before_body_close() {
        let message = "add a button";
        let edit = edit_markup("<body></body>", &kw(message), &Hints::default()).unwrap();
        assert_eq!(
            edit.content,
            "<body>\n<button class=\"btn\" id=\"action-btn\">Click me</button>\n</body>"
        );
    }

    #[test]
    fn test_quoted_label_is_used() {
        let message = "add a button \"Sign up\"";
        let k = kw(message);
        let hints = Hints::from_message(message, &k);
        let edit = edit_markup("<body></body>", &k, &hints).unwrap();
        assert!(edit.content.contains(">Sign up</button>"));
    }

    #[test]
    fn test_blank_markup_gets_skeleton() {
        let edit = edit_markup("", &kw("add a footer"), &Hints::default()).unwrap();
        assert!(edit.content.starts_with("<!DOCTYPE html>"));
        assert!(edit.content.contains("<footer class=\"site-footer\">"));
    }

    #[test]
    fn test_header_goes_after_body_open() {
        let edit = edit_markup(
            "<body class=\"x\">\n<p>hi</p>\n</body>",
            &kw("add a header"),
            &Hints::default(),
        )
        .unwrap();
        let header = edit.content.find("<header").unwrap();
        let paragraph = edit.content.find("<p>hi</p>").unwrap();
        assert!(header < paragraph);
    }

    #[test]
    fn test_no_markup_pattern() {
        assert!(edit_markup("<body></body>", &kw("make it blue"), &Hints::default()).is_none());
    }

    #[test]
    fn test_css_appends_btn_rule() {
        let edit = edit_stylesheet("", &kw("style the button"), &Hints::default()).unwrap();
        assert!(edit.content.starts_with(".btn {"));

        let edit = edit_stylesheet("body {}", &kw("style the button"), &Hints::default()).unwrap();
        assert!(edit.content.starts_with("body {}\n\n.btn {"));
    }

    #[test]
    fn test_css_color_hint() {
        let message = "make the headings teal";
        let k = kw(message);
        let hints = Hints::from_message(message, &k);
        let edit = edit_stylesheet("", &k, &hints).unwrap();
        assert!(edit.content.contains("--accent-color: teal;"));
    }

    #[test]
    fn test_script_registers_listener() {
        let edit = edit_script("", &kw("make the button do something on click"), &Hints::default())
            .unwrap();
        assert!(edit.content.contains("addEventListener('click'"));
        assert!(edit.content.starts_with("document.addEventListener('DOMContentLoaded'"));
    }

    #[test]
    fn test_data_items_appended() {
        let edit = edit_data(
            "{\"items\": [{\"id\": 1, \"name\": \"a\"}]}",
            &kw("add an item"),
            &Hints::default(),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&edit.content).unwrap();
        assert_eq!(value["items"][1]["id"], 2);
        assert_eq!(value["items"][1]["name"], "New item");
    }

    #[test]
    fn test_new_item_id_follows_highest_existing() {
        let edit = edit_data(
            "{\"items\": [{\"id\": 5, \"name\": \"a\"}, {\"id\": 2, \"name\": \"b\"}]}",
            &kw("add an item"),
            &Hints::default(),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&edit.content).unwrap();
        assert_eq!(value["items"][2]["id"], 6);

        let edit = edit_data("{}", &kw("add an item"), &Hints::default()).unwrap();
        let value: Value = serde_json::from_str(&edit.content).unwrap();
        assert_eq!(value["items"][0]["id"], 1);
    }

    #[test]
    fn test_regexes_reused_across_calls() {
        let message = "add a button \"Go\"";
        let k = kw(message);
        for _ in 0..2 {
            assert_eq!(Hints::from_message(message, &k).label.as_deref(), Some("Go"));
            let html = insert_after_body_open("<BODY id=\"x\"></BODY>", "<p>hi</p>");
            assert_eq!(html, "<BODY id=\"x\">\n<p>hi</p></BODY>");
        }
        assert!(label_re().is_some());
        assert!(body_open_re().is_some());
    }

    #[test]
    fn test_malformed_data_is_skipped() {
        assert!(edit_data("{not json", &kw("add an item"), &Hints::default()).is_none());
    }
}
