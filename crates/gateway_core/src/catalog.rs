use crate::Route;

/// A third-party authoring tool content can be imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub available: bool,
}

impl ToolEntry {
    /// Upload screen for this tool, if it has one.
    pub fn route(&self) -> Option<Route> {
        match (self.id, self.available) {
            ("articulate", true) => Some(Route::Articulate),
            _ => None,
        }
    }
}

pub const TOOLS: [ToolEntry; 4] = [
    ToolEntry {
        id: "articulate",
        name: "Articulate Storyline",
        description: "Upload and process Articulate Storyline packages (.zip)",
        available: true,
    },
    ToolEntry {
        id: "google-docs",
        name: "Google Docs",
        description: "Import content directly from Google Documents",
        available: false,
    },
    ToolEntry {
        id: "quizlet",
        name: "Quizlet",
        description: "Import study sets and flashcards from Quizlet",
        available: false,
    },
    ToolEntry {
        id: "h5p",
        name: "H5P Interactive Content",
        description: "Upload and process H5P interactive content packages",
        available: false,
    },
];

pub fn find_tool(id: &str) -> Option<&'static ToolEntry> {
    TOOLS.iter().find(|tool| tool.id.eq_ignore_ascii_case(id.trim()))
}
