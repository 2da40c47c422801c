//! Keyword matching shared by the classifier and the agents.
//!
//! Matching is whole-word over the lower-cased message, so `api` does not
//! fire on `rapid`. A keyword word also matches its common inflections
//! (`add` → `adds`, `added`, `adding`; `style` → `styled`, `styling`).
//! Multi-word keywords must appear as consecutive words.

/// Split text into lower-case words. Apostrophes stay inside words.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn word_matches(token: &str, keyword: &str) -> bool {
    if token == keyword {
        return true;
    }
    if keyword.chars().count() < 3 {
        return false;
    }
    if let Some(rest) = token.strip_prefix(keyword) {
        return matches!(rest, "s" | "es" | "d" | "ed" | "ing");
    }
    // style → styling
    keyword
        .strip_suffix('e')
        .and_then(|stem| token.strip_prefix(stem))
        .map(|rest| rest == "ing")
        .unwrap_or(false)
}

fn phrase_in(tokens: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return false;
    }
    tokens
        .windows(phrase.len())
        .any(|window| window.iter().zip(phrase).all(|(t, k)| word_matches(t, k)))
}

/// Pre-tokenized text for repeated keyword checks.
#[derive(Debug, Clone)]
pub struct Keywords {
    tokens: Vec<String>,
}

impl Keywords {
    pub fn new(text: &str) -> Self {
        Self { tokens: words(text) }
    }

    /// Whether `keyword` (one or more words) occurs.
    pub fn mentions(&self, keyword: &str) -> bool {
        phrase_in(&self.tokens, &words(keyword))
    }

    pub fn mentions_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        keywords.iter().any(|k| self.mentions(k.as_ref()))
    }

    /// First keyword from `keywords` that occurs, in list order.
    pub fn first_match<'a, S: AsRef<str>>(&self, keywords: &'a [S]) -> Option<&'a str> {
        keywords
            .iter()
            .map(AsRef::as_ref)
            .find(|k| self.mentions(k))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
