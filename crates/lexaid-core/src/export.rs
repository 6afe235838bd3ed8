//! Document exporters: `.docx` package and printable HTML.

use std::io::{Cursor, Write};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::convert::{html_to_nodes, markdown_to_nodes, DocNode, Run};

pub const DEFAULT_TITLE: &str = "法律文书";

/// Title usable as a download file name.
pub fn safe_file_name(title: &str) -> String {
    let title = title.trim();
    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    title
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

// ── docx ─────────────────────────────────────────────────────────────────

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Body defaults: 宋体 12pt, justified, 1.5 lines, 6pt before/after,
/// first-line indent of two characters.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="宋体" w:eastAsia="宋体" w:hAnsi="宋体" w:cs="宋体"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:jc w:val="both"/><w:spacing w:line="360" w:lineRule="auto" w:before="120" w:after="120"/><w:ind w:firstLine="480"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:sz w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:pPr><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:sz w:val="26"/></w:rPr></w:style></w:styles>"#;

/// A4 portrait with 2.54cm margins.
const SECTION: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838" w:orient="portrait"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

fn run_xml(run: &Run, extra_props: &str) -> String {
    let mut props = String::from(extra_props);
    if run.bold {
        props.push_str("<w:b/>");
    }
    if run.italic {
        props.push_str("<w:i/>");
    }
    let rpr = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };
    format!(
        r#"<w:r>{rpr}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        xml_escape(&run.text)
    )
}

fn paragraph_xml(ppr: &str, runs: &[Run]) -> String {
    let body: String = runs.iter().map(|r| run_xml(r, "")).collect();
    if ppr.is_empty() && body.is_empty() {
        return "<w:p/>".into();
    }
    let ppr = if ppr.is_empty() {
        String::new()
    } else {
        format!("<w:pPr>{ppr}</w:pPr>")
    };
    format!("<w:p>{ppr}{body}</w:p>")
}

fn title_xml(title: &str) -> String {
    let run = run_xml(
        &Run::bold(title),
        r#"<w:rFonts w:ascii="黑体" w:eastAsia="黑体" w:hAnsi="黑体"/><w:sz w:val="36"/><w:szCs w:val="36"/>"#,
    );
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Title"/><w:jc w:val="center"/><w:spacing w:after="400"/><w:ind w:firstLine="0"/></w:pPr>{run}</w:p>"#
    )
}

fn node_xml(node: &DocNode) -> String {
    match node {
        DocNode::Heading { level, text } => {
            let (before, after) = match level {
                1 => (480, 240),
                2 => (360, 180),
                _ => (240, 120),
            };
            let level = (*level).clamp(1, 3);
            paragraph_xml(
                &format!(
                    r#"<w:pStyle w:val="Heading{level}"/><w:spacing w:before="{before}" w:after="{after}"/>"#
                ),
                &[Run::bold(text.as_str())],
            )
        },
        DocNode::Paragraph { runs } if runs.is_empty() => "<w:p/>".into(),
        DocNode::Paragraph { runs } => paragraph_xml("", runs),
        DocNode::ListItem { .. } => paragraph_xml(
            r#"<w:spacing w:line="360" w:lineRule="auto" w:before="60" w:after="60"/><w:ind w:left="720" w:hanging="360"/>"#,
            &[Run::plain(node.list_label().unwrap_or_default())],
        ),
        DocNode::Blockquote { text } => paragraph_xml(
            r#"<w:spacing w:line="360" w:lineRule="auto"/><w:ind w:left="480" w:firstLine="0"/>"#,
            &[Run::italic(text.as_str())],
        ),
        DocNode::Preformatted { text } => {
            paragraph_xml(r#"<w:ind w:firstLine="0"/>"#, &[Run::plain(text.as_str())])
        },
    }
}

/// `word/document.xml` for a titled node list.
pub fn document_xml(title: &str, nodes: &[DocNode]) -> String {
    let title = if title.trim().is_empty() { DEFAULT_TITLE } else { title };
    let mut body = title_xml(title);
    for node in nodes {
        body.push_str(&node_xml(node));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}{SECTION}</w:body></w:document>"#
    )
}

/// Serialize nodes into a `.docx` package.
pub fn docx_bytes(title: &str, nodes: &[DocNode]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", STYLES.to_string()),
        ("word/document.xml", document_xml(title, nodes)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("starting docx part {name}"))?;
        zip.write_all(content.as_bytes())
            .with_context(|| format!("writing docx part {name}"))?;
    }
    let cursor = zip.finish().context("finishing docx package")?;
    Ok(cursor.into_inner())
}

/// Markdown or HTML content straight to `.docx` bytes.
pub fn export_docx(title: &str, content: &str, is_html: bool) -> Result<Vec<u8>> {
    let nodes = if is_html {
        html_to_nodes(content)
    } else {
        markdown_to_nodes(content)
    };
    docx_bytes(title, &nodes)
}

// ── printable HTML ───────────────────────────────────────────────────────

fn runs_html(runs: &[Run]) -> String {
    runs.iter()
        .map(|r| {
            let text = xml_escape(&r.text);
            match (r.bold, r.italic) {
                (true, true) => format!("<strong><em>{text}</em></strong>"),
                (true, false) => format!("<strong>{text}</strong>"),
                (false, true) => format!("<em>{text}</em>"),
                (false, false) => text,
            }
        })
        .collect()
}

fn node_html(node: &DocNode) -> String {
    match node {
        DocNode::Heading { level, text } => {
            let level = (*level).clamp(1, 3);
            format!("<h{level}>{}</h{level}>", xml_escape(text))
        },
        DocNode::Paragraph { runs } if runs.is_empty() => "<p>&nbsp;</p>".into(),
        DocNode::Paragraph { runs } => format!("<p>{}</p>", runs_html(runs)),
        DocNode::ListItem { .. } => format!(
            r#"<p class="list-item">{}</p>"#,
            xml_escape(&node.list_label().unwrap_or_default())
        ),
        DocNode::Blockquote { text } => format!("<blockquote>{}</blockquote>", xml_escape(text)),
        DocNode::Preformatted { text } => format!("<pre>{}</pre>", xml_escape(text)),
    }
}

/// Self-contained page that opens the print dialog on load (print-to-PDF).
pub fn print_html(title: &str, nodes: &[DocNode]) -> String {
    let title = if title.trim().is_empty() { DEFAULT_TITLE } else { title };
    let body: String = nodes.iter().map(node_html).collect::<Vec<_>>().join("\n");
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title}</title><style>body{{font-family:"SimSun","宋体",serif;font-size:12pt;line-height:1.5;margin:2.54cm;}}h1{{text-align:center;}}p{{text-indent:2em;text-align:justify;}}.list-item{{text-indent:0;margin-left:2em;}}blockquote{{font-style:italic;margin-left:2em;}}</style></head><body>
{body}
<script>window.onload=()=>window.print()</script></body></html>"#,
        title = xml_escape(title),
    )
}

static LEGAL_RULES: LazyLock<Vec<(Option<Regex>, &'static str)>> = LazyLock::new(|| {
    [
        (
            r"(?m)^([^\n]*(?:起诉状|答辩状|上诉状|反诉状|协议书|清单)[^\n]*)",
            r#"<h1 class="document-title">${1}</h1>"#,
        ),
        (
            r"(?m)^(原告|被告|上诉人|被上诉人|申请人|被申请人|甲方|乙方)：([^\n]+)",
            r#"<div class="party-info"><strong class="party-label">${1}：</strong><span class="party-details">${2}</span></div>"#,
        ),
        (
            r"(?m)^([一二三四五六七八九十]+、[^\n]+)",
            r#"<h2 class="section-title">${1}</h2>"#,
        ),
        (
            r"(?m)^（([一二三四五六七八九十]+)）([^\n]+)",
            r#"<h3 class="subsection-title">（${1}）${2}</h3>"#,
        ),
        (r"(?m)^([0-9]+\.[^\n]+)", r#"<div class="numbered-item">${1}</div>"#),
        (
            r"(《[^》]+》[^，。；]*条[^，。；]*)",
            r#"<span class="legal-reference">${1}</span>"#,
        ),
        (
            r"(人民币\s*[0-9,，]+(?:\.[0-9]+)?(?:\s*元|万元|亿元)?)",
            r#"<span class="amount">${1}</span>"#,
        ),
        (r"([0-9]{4}年[0-9]{1,2}月[0-9]{1,2}日)", r#"<span class="date">${1}</span>"#),
        (r"(?m)^(此致)$", r#"<div class="closing">${1}</div>"#),
        (r"(?m)^[^\n]*人民法院[^\n]*$", r#"<div class="court-name">${0}</div>"#),
        (
            r"(?m)^(起诉人|答辩人|上诉人|申请人|代理人)：([^\n]+)$",
            r#"<div class="signature-line"><span class="signature-label">${1}：</span><span class="signature-name">${2}</span></div>"#,
        ),
        (r"(?m)^(日期：[^\n]+)$", r#"<div class="signature-date">${1}</div>"#),
        (r"\n\n+", r#"</p><p class="paragraph">"#),
        (r"\n", "<br>"),
    ]
    .into_iter()
    .map(|(pattern, rep)| (Regex::new(pattern).ok(), rep))
    .collect()
});

/// Plain-text legal document → classed HTML, for when the text carries no
/// markup. Rules apply in sequence, each over the previous output.
pub fn legal_format_html(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let mut out = content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    for (re, rep) in LEGAL_RULES.iter() {
        if let Some(re) = re {
            out = re.replace_all(&out, *rep).into_owned();
        }
    }
    format!(r#"<p class="paragraph">{out}</p>"#)
        .replace(r#"<p class="paragraph"></p>"#, "")
        .replace(r#"<p class="paragraph"><br></p>"#, "")
}
