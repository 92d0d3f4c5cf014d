//! Two-tier header parsing for query definitions.
//!
//! A definition's leading comments carry two kinds of metadata:
//!
//! ```text
//! # Find all cats                      <- description line
//! ## validator: NoValidator            <- configuration line (`key: value`)
//! SELECT * WHERE { ?a wdt:P31 wd:Q146 }
//! ```
//!
//! Description lines are joined into a one-line summary. Configuration lines
//! become a key/value map; the raw block of configuration lines is also kept
//! under [`COMMENT_KEY`]. Query body lines are left alone.

use std::collections::BTreeMap;
use std::ops::Range;

/// Reserved key naming the validation strategy.
pub const VALIDATOR_KEY: &str = "validator";

/// Synthetic key holding every configuration line verbatim, joined by newlines.
pub const COMMENT_KEY: &str = "_comment";

const DESCRIPTION_MARKER: &str = "#";
const CONFIG_MARKER: &str = "##";
const SEPARATOR: char = ':';

/// Key/value configuration parsed from `##` lines.
///
/// Lookups are exact and case-sensitive. Later occurrences of a key replace
/// earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderConfig {
    entries: BTreeMap<String, String>,
    // byte range of the line that last supplied each key
    spans: BTreeMap<String, Range<usize>>,
}

impl HeaderConfig {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The validator name, if the header specifies one.
    pub fn validator(&self) -> Option<&str> {
        self.get(VALIDATOR_KEY)
    }

    /// Every configuration line, verbatim.
    pub fn raw_comment(&self) -> &str {
        self.get(COMMENT_KEY).unwrap_or_default()
    }

    /// Byte range in the source text of the line that supplied `key`.
    pub fn span_of(&self, key: &str) -> Option<Range<usize>> {
        self.spans.get(key).cloned()
    }

    /// Parsed entries, excluding the synthetic raw-comment key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != COMMENT_KEY)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parsed entries, excluding the synthetic raw-comment key.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, key: String, value: String, span: Range<usize>) {
        self.spans.insert(key.clone(), span);
        self.entries.insert(key, value);
    }
}

/// Both header tiers of one definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub description: String,
    pub config: HeaderConfig,
}

enum LineKind<'a> {
    Description(&'a str),
    Config(&'a str),
    Body,
}

/// Configuration lines must start at column 0; an indented `##` is query text.
fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(CONFIG_MARKER) {
        return LineKind::Config(rest);
    }
    let trimmed = line.trim_start();
    if trimmed.starts_with(CONFIG_MARKER) {
        LineKind::Body
    } else if let Some(rest) = trimmed.strip_prefix(DESCRIPTION_MARKER) {
        LineKind::Description(rest)
    } else {
        LineKind::Body
    }
}

/// Yields each line with its byte range, line terminators excluded.
fn lines_with_spans(text: &str) -> impl Iterator<Item = (&str, Range<usize>)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');
        (line, start..start + line.len())
    })
}

/// Parses both tiers of the header in a single pass.
pub fn parse_header(text: &str) -> Header {
    let mut description = Vec::new();
    let mut raw_block = Vec::new();
    let mut config = HeaderConfig::default();

    for (line, span) in lines_with_spans(text) {
        match classify(line) {
            LineKind::Description(rest) => description.push(rest.trim()),
            LineKind::Config(rest) => {
                raw_block.push(line);
                if let Some((key, value)) = rest.split_once(SEPARATOR) {
                    config.insert(key.trim().to_string(), value.trim().to_string(), span);
                }
            }
            LineKind::Body => {}
        }
    }

    config.insert(COMMENT_KEY.to_string(), raw_block.join("\n"), 0..0);

    Header {
        description: description.join(" "),
        config,
    }
}

/// The one-line description built from single-marker comment lines.
pub fn description(text: &str) -> String {
    parse_header(text).description
}

/// The configuration map built from double-marker comment lines.
pub fn parse_config(text: &str) -> HeaderConfig {
    parse_header(text).config
}
