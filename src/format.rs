//! Whitespace and separator policy.
//!
//! The traversal is layout-agnostic; every piece of inter-token
//! whitespace comes from a [`Format`] implementation.

/// Layout strategy consulted at every emission point.
pub trait Format {
    /// Indentation for one nesting level.
    fn indent(&self, level: usize) -> String;

    /// Text inserted before each element, member and closer.
    fn linebreak(&self) -> &str;

    /// Separator between a key and its value.
    fn colon(&self) -> &str;
}

/// The three stock layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XsonFormat {
    /// No whitespace at all.
    Dense,
    /// Single-space separators on one line.
    Light,
    /// Line breaks with `spaces`-wide indentation per level.
    Pretty { spaces: usize },
}

impl XsonFormat {
    /// Pretty layout with the customary four-space indent.
    pub fn pretty() -> Self {
        XsonFormat::Pretty { spaces: 4 }
    }
}

impl Default for XsonFormat {
    fn default() -> Self {
        XsonFormat::Dense
    }
}

impl Format for XsonFormat {
    fn indent(&self, level: usize) -> String {
        match *self {
            XsonFormat::Dense => String::new(),
            XsonFormat::Light => " ".to_string(),
            XsonFormat::Pretty { spaces } => " ".repeat(level * spaces),
        }
    }

    fn linebreak(&self) -> &str {
        match self {
            XsonFormat::Pretty { .. } => "\n",
            _ => "",
        }
    }

    fn colon(&self) -> &str {
        match self {
            XsonFormat::Dense => ":",
            _ => ": ",
        }
    }
}
