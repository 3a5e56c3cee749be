//! Line parser for the `NODE:` / `EDGE:` graph input format.
//!
//! ```text
//! NODE: Transformer
//! NODE: Attention
//! EDGE: Transformer|is built on|Attention
//! ```
//!
//! The parser only classifies and splits lines; resolving names to nodes is the
//! loader's job (`crate::graph::KnowledgeGraph`).
use crate::errors::ParseError;
use regex::Regex;

/// One meaningful input line, borrowing from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    Node(&'a str),
    Edge { source: &'a str, relation: &'a str, dest: &'a str },
}

#[derive(Debug)]
pub struct LinePatterns {
    pub node: Regex,
    pub edge: Regex,
}

impl LinePatterns {
    #[must_use]
    pub fn compile() -> Self {
        // One optional space after the colon; everything else belongs to the fields.
        // The destination takes the remainder, so it may contain further pipes.
        let node = Regex::new(r"^NODE: ?(?P<name>.*)$").expect("valid NODE pattern");
        let edge = Regex::new(r"^EDGE: ?(?P<source>[^|]*)\|(?P<relation>[^|]*)\|(?P<dest>.*)$")
            .expect("valid EDGE pattern");
        Self { node, edge }
    }
}

impl Default for LinePatterns {
    fn default() -> Self {
        Self::compile()
    }
}

#[derive(Debug, Default)]
pub struct LineParser {
    patterns: LinePatterns,
}

impl LineParser {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: LinePatterns::compile() }
    }

    /// Classify one input line.
    ///
    /// Returns `Ok(None)` for lines that carry no record (blank lines, comments,
    /// unknown prefixes). Trailing CR/LF is stripped; nothing else is trimmed.
    ///
    /// # Errors
    /// Returns `ParseError` for a `NODE:` line without a name or an `EDGE:` line
    /// missing one of its two pipes.
    pub fn parse_line<'a>(&self, line: &'a str) -> Result<Option<Record<'a>>, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with("NODE:") {
            let name = self
                .patterns
                .node
                .captures(line)
                .and_then(|c| c.name("name"))
                .map_or("", |m| m.as_str());
            if name.is_empty() {
                return Err(ParseError::MissingNodeName);
            }
            return Ok(Some(Record::Node(name)));
        }
        if line.starts_with("EDGE:") {
            let Some(cap) = self.patterns.edge.captures(line) else {
                return Err(ParseError::MissingPipe { line: line.to_string() });
            };
            let field = |n: &str| cap.name(n).map_or("", |m| m.as_str());
            return Ok(Some(Record::Edge {
                source: field("source"),
                relation: field("relation"),
                dest: field("dest"),
            }));
        }
        Ok(None)
    }
}
