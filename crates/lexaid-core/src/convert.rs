//! Lightweight markup → document nodes.
//!
//! Both entry points produce the same flat node list consumed by the
//! exporters. Adjacent list items are never merged; every input line or
//! element becomes its own node, in input order.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::html;

/// A run of inline text with emphasis flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocNode {
    Heading { level: u8, text: String },
    /// `runs` is empty for a blank line.
    Paragraph { runs: Vec<Run> },
    /// `index` is zero-based; ordered items render as `index + 1`.
    ListItem {
        text: String,
        ordered: bool,
        index: usize,
    },
    Blockquote { text: String },
    Preformatted { text: String },
}

impl DocNode {
    pub fn empty_paragraph() -> Self {
        Self::Paragraph { runs: Vec::new() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            runs: vec![Run::plain(text)],
        }
    }

    /// Visible text with list labels applied and emphasis dropped.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Heading { text, .. } | Self::Blockquote { text } | Self::Preformatted { text } => {
                text.clone()
            },
            Self::Paragraph { runs } => runs.iter().map(|r| r.text.as_str()).collect(),
            Self::ListItem { .. } => self.list_label().unwrap_or_default(),
        }
    }

    /// `"3. text"` or `"• text"` for list items.
    pub fn list_label(&self) -> Option<String> {
        match self {
            Self::ListItem {
                text,
                ordered: true,
                index,
            } => Some(format!("{}. {text}", index + 1)),
            Self::ListItem { text, .. } => Some(format!("• {text}")),
            _ => None,
        }
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::error!(pattern, "converter pattern failed to compile: {e}"))
        .ok()
}

struct LinePatterns {
    h3: Option<Regex>,
    h2: Option<Regex>,
    h1: Option<Regex>,
    ordered: Option<Regex>,
    unordered: Option<Regex>,
    quote: Option<Regex>,
    emphasis: Option<Regex>,
}

static PATTERNS: LazyLock<LinePatterns> = LazyLock::new(|| LinePatterns {
    h3: compile(r"^###\s+(.+)"),
    h2: compile(r"^##\s+(.+)"),
    h1: compile(r"^#\s+(.+)"),
    ordered: compile(r"^\s*([0-9]+)\.\s+(.+)"),
    unordered: compile(r"^[-*]\s+(.+)"),
    quote: compile(r"^>\s+(.+)"),
    emphasis: compile(r"(\*\*[^*]+\*\*)|(\*[^*]+\*)"),
});

fn capture<'a>(re: &Option<Regex>, line: &'a str, group: usize) -> Option<&'a str> {
    re.as_ref()?
        .captures(line)
        .and_then(|c| c.get(group))
        .map(|m| m.as_str())
}

/// Convert lightweight markup, one node per input line.
///
/// Classification order: `###`, `##`, `#`, ordered item, unordered item,
/// quote, then plain text with `**bold**` / `*italic*` spans.
pub fn markdown_to_nodes(md: &str) -> Vec<DocNode> {
    md.split('\n')
        .map(|raw| classify_line(raw.strip_suffix('\r').unwrap_or(raw)))
        .collect()
}

fn classify_line(line: &str) -> DocNode {
    let p = &*PATTERNS;
    if line.trim().is_empty() {
        return DocNode::empty_paragraph();
    }
    for (re, level) in [(&p.h3, 3u8), (&p.h2, 2), (&p.h1, 1)] {
        if let Some(text) = capture(re, line, 1) {
            return DocNode::Heading {
                level,
                text: text.to_string(),
            };
        }
    }
    if let Some(caps) = p.ordered.as_ref().and_then(|re| re.captures(line)) {
        let number: usize = caps[1].parse().unwrap_or(1);
        return DocNode::ListItem {
            text: caps[2].to_string(),
            ordered: true,
            index: number.saturating_sub(1),
        };
    }
    if let Some(text) = capture(&p.unordered, line, 1) {
        return DocNode::ListItem {
            text: text.to_string(),
            ordered: false,
            index: 0,
        };
    }
    if let Some(text) = capture(&p.quote, line, 1) {
        return DocNode::Blockquote {
            text: text.to_string(),
        };
    }
    DocNode::Paragraph {
        runs: inline_runs(line),
    }
}

/// Split a line into plain, bold and italic runs, scanning left to right.
pub fn inline_runs(line: &str) -> Vec<Run> {
    let Some(re) = PATTERNS.emphasis.as_ref() else {
        return vec![Run::plain(line)];
    };
    let mut runs = Vec::new();
    let mut last = 0;
    for m in re.find_iter(line) {
        if m.start() > last {
            runs.push(Run::plain(&line[last..m.start()]));
        }
        let token = m.as_str();
        if let Some(inner) = token.strip_prefix("**").and_then(|t| t.strip_suffix("**")) {
            runs.push(Run::bold(inner));
        } else {
            let inner = token.trim_start_matches('*').trim_end_matches('*');
            runs.push(Run::italic(inner));
        }
        last = m.end();
    }
    if last < line.len() {
        runs.push(Run::plain(&line[last..]));
    }
    runs
}

/// Convert an HTML fragment by reading the text content of each top-level
/// body element. Never fails: unparseable input degrades to one paragraph of
/// tag-stripped text.
pub fn html_to_nodes(source: &str) -> Vec<DocNode> {
    match html::parse(source) {
        Ok(doc) => {
            let body = doc.body();
            let nodes: Vec<DocNode> = body.child_elements().flat_map(element_nodes).collect();
            if nodes.is_empty() {
                vec![DocNode::paragraph(body.text_content().trim())]
            } else {
                nodes
            }
        },
        Err(e) => {
            debug!("html parse failed, falling back to stripped text: {e}");
            vec![DocNode::paragraph(html::strip_tags(source))]
        },
    }
}

fn element_nodes(el: &html::Element) -> Vec<DocNode> {
    let full = el.text_content();
    let text = full.trim();
    if text.is_empty() {
        return Vec::new();
    }
    match el.tag.as_str() {
        "h1" | "h2" | "h3" => {
            let level = el.tag[1..].parse().unwrap_or(1);
            vec![DocNode::Heading {
                level,
                text: text.to_string(),
            }]
        },
        "p" | "div" | "span" => vec![DocNode::paragraph(text)],
        "blockquote" => vec![DocNode::Blockquote {
            text: text.to_string(),
        }],
        "ul" | "ol" => {
            let ordered = el.tag == "ol";
            el.child_elements()
                .filter(|li| li.tag == "li")
                .enumerate()
                .map(|(i, li)| DocNode::ListItem {
                    text: li.text_content().trim().to_string(),
                    ordered,
                    index: if ordered { i } else { 0 },
                })
                .collect()
        },
        "pre" => full
            .split('\n')
            .map(|line| DocNode::Preformatted {
                text: line.strip_suffix('\r').unwrap_or(line).to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}
