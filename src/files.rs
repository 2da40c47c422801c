//! The editable app files shared between the editor UI and the agents.
//!
//! An app is four files by convention (markup, stylesheet, script, data).
//! Nothing here enforces that all four exist: agents treat a missing file as
//! empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Filename → full text content.
///
/// Ordered so that change descriptions and analysis reports list files in a
/// stable order.
pub type FileContents = BTreeMap<String, String>;

/// The four conventional files of a generated app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownFile {
    Markup,
    Stylesheet,
    Script,
    Data,
}

impl WellKnownFile {
    pub const ALL: [WellKnownFile; 4] = [Self::Markup, Self::Stylesheet, Self::Script, Self::Data];

    /// The three files holding code (everything except the data file).
    pub const CODE: [WellKnownFile; 3] = [Self::Markup, Self::Stylesheet, Self::Script];

    pub fn filename(&self) -> &'static str {
        match self {
            Self::Markup => "index.html",
            Self::Stylesheet => "styles.css",
            Self::Script => "script.js",
            Self::Data => "data.json",
        }
    }

    /// Short label used in analysis reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Markup => "HTML",
            Self::Stylesheet => "CSS",
            Self::Script => "JavaScript",
            Self::Data => "JSON",
        }
    }

    pub fn from_filename(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.filename() == name)
    }

    /// Content of this file in `files`, or `""` when absent.
    pub fn read<'a>(&self, files: &'a FileContents) -> &'a str {
        files.get(self.filename()).map(String::as_str).unwrap_or("")
    }
}

impl std::fmt::Display for WellKnownFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.filename())
    }
}
