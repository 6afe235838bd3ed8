//! Minimal HTML element tree, enough to read text content per element.
//!
//! Tolerates unclosed elements (closed at end of input), void elements and
//! self-closing tags. A new `li`, `dt`/`dd`, `option` or `p` closes an open
//! sibling of the same kind, and a block start closes an open `p`. Fails on unterminated tags or comments and on closing
//! tags with no matching open element.

use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Starting one of these closes an open `p`.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p",
    "pre", "section", "table", "ul",
];

const P_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];
const LI: &[&str] = &["li"];
const LIST_SCOPE: &[&str] = &["ol", "ul", "menu"];
const DT_DD: &[&str] = &["dt", "dd"];
const DL_SCOPE: &[&str] = &["dl"];
const OPTION: &[&str] = &["option"];
const SELECT_SCOPE: &[&str] = &["select", "datalist", "optgroup"];
const P: &[&str] = &["p"];

/// Elements whose text is never part of the visible document.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "head", "title", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name; `#document` for the root.
    pub tag: String,
    pub children: Vec<Node>,
}

impl Element {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of all descendants, skipping hidden elements.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) if HIDDEN_ELEMENTS.contains(&e.tag.as_str()) => {},
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// The `<body>` element if there is one, else `self`.
    pub fn body(&self) -> &Element {
        self.find("body").unwrap_or(self)
    }

    fn find(&self, tag: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find(tag) {
                return Some(found);
            }
        }
        None
    }
}

/// Parse a document or fragment into a `#document` root.
pub fn parse(source: &str) -> Result<Element> {
    let mut stack: Vec<Element> = vec![Element::new("#document")];
    let mut pos = 0;
    let mut text = String::new();

    while pos < source.len() {
        let rest = &source[pos..];
        let Some(lt) = rest.find('<') else {
            text.push_str(rest);
            break;
        };
        text.push_str(&rest[..lt]);
        let tag_src = &rest[lt..];

        if let Some(after) = tag_src.strip_prefix("<!--") {
            let Some(end) = after.find("-->") else {
                bail!("unterminated comment at byte {}", pos + lt);
            };
            pos += lt + 4 + end + 3;
            continue;
        }

        let starts_tag = tag_src[1..]
            .starts_with(|c: char| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        if !starts_tag {
            // A bare `<` in text, e.g. "a < b".
            text.push('<');
            pos += lt + 1;
            continue;
        }

        let Some(gt) = tag_src.find('>') else {
            bail!("unterminated tag at byte {}", pos + lt);
        };
        let inner = &tag_src[1..gt];
        let next = pos + lt + gt + 1;

        if inner.starts_with('!') || inner.starts_with('?') {
            pos = next;
            continue;
        }

        if let Some(name) = inner.strip_prefix('/') {
            let name = name.trim().to_ascii_lowercase();
            if name == "p" && !stack.iter().any(|e| e.tag == "p") {
                // `<p><div></div></p>`: the block already ended the paragraph.
                flush_text(&mut stack, &mut text);
                push_child(&mut stack, Node::Element(Element::new(name)));
                pos = next;
                continue;
            }
            let Some(depth) = stack.iter().rposition(|e| e.tag == name) else {
                bail!("closing tag </{name}> has no open element");
            };
            if depth == 0 {
                bail!("closing tag </{name}> has no open element");
            }
            flush_text(&mut stack, &mut text);
            while stack.len() > depth {
                close_top(&mut stack);
            }
            pos = next;
            continue;
        }

        let name: String = inner
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '/')
            .collect::<String>()
            .to_ascii_lowercase();

        flush_text(&mut stack, &mut text);
        close_implied(&mut stack, &name);
        let self_closing = inner.trim_end().ends_with('/');
        if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            push_child(&mut stack, Node::Element(Element::new(name)));
            pos = next;
            continue;
        }

        if name == "script" || name == "style" {
            let close = format!("</{name}");
            let body = &source[next..];
            let Some(end) = body.to_ascii_lowercase().find(&close) else {
                bail!("unterminated <{name}> element");
            };
            let Some(close_gt) = body[end..].find('>') else {
                bail!("unterminated </{name}> tag");
            };
            let mut el = Element::new(name);
            el.children.push(Node::Text(body[..end].to_string()));
            push_child(&mut stack, Node::Element(el));
            pos = next + end + close_gt + 1;
            continue;
        }

        stack.push(Element::new(name));
        pos = next;
    }

    flush_text(&mut stack, &mut text);
    while stack.len() > 1 {
        close_top(&mut stack);
    }
    match stack.pop() {
        Some(root) => Ok(root),
        None => bail!("empty element stack"),
    }
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

fn flush_text(stack: &mut [Element], text: &mut String) {
    if !text.is_empty() {
        let decoded = decode_entities(text);
        text.clear();
        push_child(stack, Node::Text(decoded));
    }
}

fn close_top(stack: &mut Vec<Element>) {
    if let Some(el) = stack.pop() {
        push_child(stack, Node::Element(el));
    }
}

/// Tags that `tag` implicitly ends, and the open elements that stop the search.
fn implied_end(tag: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    match tag {
        "li" => Some((LI, LIST_SCOPE)),
        "dt" | "dd" => Some((DT_DD, DL_SCOPE)),
        "option" => Some((OPTION, SELECT_SCOPE)),
        t if BLOCK_ELEMENTS.contains(&t) => Some((P, P_SCOPE)),
        _ => None,
    }
}

fn close_implied(stack: &mut Vec<Element>, tag: &str) {
    let Some((ends, stops)) = implied_end(tag) else {
        return;
    };
    let found = stack
        .iter()
        .rposition(|e| ends.contains(&e.tag.as_str()) || stops.contains(&e.tag.as_str()));
    if let Some(depth) = found.filter(|&d| ends.contains(&stack[d].tag.as_str())) {
        while stack.len() > depth {
            close_top(stack);
        }
    }
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());

/// Remove anything that looks like a tag; text between tags is kept verbatim.
pub fn strip_tags(source: &str) -> String {
    match TAG.as_ref() {
        Some(re) => re.replace_all(source, "").into_owned(),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_text_content() {
        let doc = parse("<p>a <b>b</b> c</p>").unwrap();
        let p = doc.child_elements().next().unwrap();
        assert_eq!(p.tag, "p");
        assert_eq!(p.text_content(), "a b c");
    }

    #[test]
    fn body_is_found_inside_html_wrapper() {
        let doc = parse("<!DOCTYPE html><html><head><title>x</title></head><body><h1>T</h1></body></html>")
            .unwrap();
        let body = doc.body();
        assert_eq!(body.tag, "body");
        assert_eq!(body.text_content(), "T");
    }

    #[test]
    fn void_and_self_closing_elements() {
        let doc = parse("<p>a<br>b<img src='x'/>c</p>").unwrap();
        assert_eq!(doc.text_content(), "abc");
    }

    #[test]
    fn bare_angle_bracket_is_text() {
        let doc = parse("<p>1 < 2</p>").unwrap();
        assert_eq!(doc.text_content(), "1 < 2");
    }

    #[test]
    fn unclosed_elements_close_at_end() {
        let doc = parse("<div><p>open").unwrap();
        assert_eq!(doc.text_content(), "open");
    }

    #[test]
    fn list_items_close_their_open_sibling() {
        let doc = parse("<ul><li>a<li>b</ul>").unwrap();
        let ul = doc.child_elements().next().unwrap();
        let items: Vec<String> = ul.child_elements().map(Element::text_content).collect();
        assert_eq!(items, ["a", "b"]);
    }

    #[test]
    fn paragraph_closes_at_next_paragraph_or_block() {
        let doc = parse("<p>first<p>second<div>third</div>").unwrap();
        let parts: Vec<(&str, String)> = doc
            .child_elements()
            .map(|e| (e.tag.as_str(), e.text_content()))
            .collect();
        assert_eq!(
            parts,
            [("p", "first".to_string()), ("p", "second".to_string()), ("div", "third".to_string())]
        );
    }

    #[test]
    fn definition_terms_and_nested_lists() {
        let doc = parse("<dl><dt>k<dd>v<dt>k2</dl>").unwrap();
        let dl = doc.child_elements().next().unwrap();
        let tags: Vec<&str> = dl.child_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["dt", "dd", "dt"]);

        let doc = parse("<ul><li>a<ul><li>b</ul><li>c</ul>").unwrap();
        let outer = doc.child_elements().next().unwrap();
        assert_eq!(outer.child_elements().count(), 2);
    }

    #[test]
    fn malformed_inputs_fail() {
        assert!(parse("<p>text <b").is_err());
        assert!(parse("<p>x</div>").is_err());
        assert!(parse("<p><div>x</div></p>").is_ok());
        assert!(parse("<!-- never closed").is_err());
    }

    #[test]
    fn entities_are_decoded() {
        let doc = parse("<p>&lt;a&gt; &amp; b</p>").unwrap();
        assert_eq!(doc.text_content(), "<a> & b");
    }
}
