use serde::{Deserialize, Serialize};

/// One line of displayed assembly output.
///
/// `source_line` is the 1-based line in the originating source buffer, or
/// `None` for lines with no direct origin (compiler-generated fences).
/// `synthetic` marks locally fabricated lines (error messages, placeholders)
/// that never came from the compilation service; it travels on the wire as
/// `fake` for compatibility with the service's own synthetic lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsmLine {
    pub text: String,
    #[serde(rename = "source")]
    pub source_line: Option<u32>,
    #[serde(rename = "fake", default)]
    pub synthetic: bool,
}

impl AsmLine {
    pub fn new(text: impl Into<String>, source_line: Option<u32>) -> Self {
        Self {
            text: text.into(),
            source_line,
            synthetic: false,
        }
    }
}

/// A single synthetic line standing in for real compiler output.
pub fn fake_asm(text: impl Into<String>) -> Vec<AsmLine> {
    vec![AsmLine {
        text: text.into(),
        source_line: None,
        synthetic: true,
    }]
}
