use serde::{Deserialize, Serialize};
use std::fmt;

/// Event type that triggers a voice clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Start,
    End,
    Interval,
    Resume,
    Exit,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Start,
        Category::End,
        Category::Interval,
        Category::Resume,
        Category::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Start => "start",
            Category::End => "end",
            Category::Interval => "interval",
            Category::Resume => "resume",
            Category::Exit => "exit",
        }
    }

    /// Parse a folder or manifest name. `ten` is the legacy name of `interval`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start" => Some(Category::Start),
            "end" => Some(Category::End),
            "interval" | "ten" => Some(Category::Interval),
            "resume" => Some(Category::Resume),
            "exit" => Some(Category::Exit),
            _ => None,
        }
    }

    /// File played when every pool for this category is empty.
    pub fn default_file(&self) -> &'static str {
        match self {
            Category::Start => "start.mp3",
            Category::End => "end.mp3",
            Category::Interval => "interval.mp3",
            Category::Resume => "resume.mp3",
            Category::Exit => "exit.mp3",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
