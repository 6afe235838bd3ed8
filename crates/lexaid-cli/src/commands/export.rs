use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lexaid_core::{
    convert::{html_to_nodes, markdown_to_nodes},
    export::{export_docx, legal_format_html, print_html, safe_file_name, DEFAULT_TITLE},
    html::strip_tags,
};
use serde_json::json;
use tracing::info;

use super::{load_document, write_json, Ctx};
use crate::cli::{ExportArgs, ExportFormat};

pub fn export(ctx: &Ctx, args: ExportArgs, out: &mut dyn Write) -> Result<()> {
    let doc = load_document(&ctx.config, &args.doc)?;
    let title = args
        .title
        .or(doc.title)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let bytes = match args.format {
        ExportFormat::Docx => export_docx(&title, &doc.content, doc.is_html)?,
        ExportFormat::Html => {
            let nodes = if doc.is_html {
                html_to_nodes(&doc.content)
            } else {
                markdown_to_nodes(&doc.content)
            };
            print_html(&title, &nodes).into_bytes()
        },
        ExportFormat::Legal => {
            let text = if doc.is_html {
                strip_tags(&doc.content)
            } else {
                doc.content
            };
            legal_format_html(&text).into_bytes()
        },
    };

    let path = args.out.unwrap_or_else(|| {
        PathBuf::from(format!("{}.{}", safe_file_name(&title), args.format.extension()))
    });
    std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "document exported");

    if ctx.json {
        write_json(out, &json!({ "path": path, "bytes": bytes.len() }))
    } else {
        writeln!(out, "已导出：{}", path.display())?;
        Ok(())
    }
}
