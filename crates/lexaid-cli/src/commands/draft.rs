use std::io::Write;

use anyhow::{Context, Result};
use lexaid_domains::documents::{draft, DocumentInfo, DraftPreferences, DraftRequest};
use serde_json::json;
use tracing::info;

use super::{check::write_report, parse_case_type, read_input, write_json, Ctx};
use crate::cli::DraftArgs;

pub async fn run(ctx: &Ctx, args: DraftArgs, out: &mut dyn Write) -> Result<()> {
    let req = DraftRequest {
        template_id: args.template,
        info: DocumentInfo {
            plaintiff: args.plaintiff.unwrap_or_default(),
            defendant: args.defendant.unwrap_or_default(),
            case_type: parse_case_type(args.case_type.as_deref())?,
            court: args.court.unwrap_or_default(),
            case_number: args.case_number.unwrap_or_default(),
            case_details: read_input(&args.input)?,
        },
        preferences: DraftPreferences {
            cite_law: !args.no_cite_law,
            cite_cases: !args.no_cite_cases,
            tone: args.tone,
            include_evidence: !args.no_evidence,
        },
    };
    req.validate()?;

    let client = ctx.client()?;
    let doc = draft(&client, &req).await?;
    let last = ctx.config.last_document_path();
    doc.save(&last)?;
    info!(path = %last.display(), "saved drafted document");
    if let Some(path) = &args.out {
        std::fs::write(path, &doc.content)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let report = doc.compliance();
    if ctx.json {
        return write_json(out, &json!({ "document": doc, "compliance": report }));
    }
    if doc.from_fallback {
        eprintln!("提示：生成失败，已填入模板示例内容，请核对修改。");
    }
    writeln!(out, "{}", doc.content)?;
    writeln!(out, "\n---- 合规自检 ----")?;
    write_report(out, &report)
}
