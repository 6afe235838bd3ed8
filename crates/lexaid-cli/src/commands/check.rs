use std::io::Write;

use anyhow::{Context, Result};
use lexaid_core::{
    compliance::{
        autofill_missing_sections, build_compliance_report, ComplianceItem, ComplianceOptions,
    },
    html::strip_tags,
};
use lexaid_domains::documents::template;
use serde_json::json;

use super::{load_document, parse_case_type, write_json, Ctx};
use crate::cli::CheckArgs;

const DEFAULT_TEMPLATE: &str = "civil_complaint";

pub(crate) fn write_report(out: &mut dyn Write, items: &[ComplianceItem]) -> Result<()> {
    for item in items {
        let mark = if item.pass { "✓" } else { "✗" };
        writeln!(out, "{mark} {}", item.label)?;
        if !item.pass {
            if let Some(s) = &item.suggestion {
                writeln!(out, "    {s}")?;
            }
        }
    }
    let passed = items.iter().filter(|i| i.pass).count();
    writeln!(out, "通过 {passed}/{}", items.len())?;
    Ok(())
}

/// Returns whether the run succeeded: every check passed, or the document
/// was autofilled.
pub fn check(ctx: &Ctx, args: CheckArgs, out: &mut dyn Write) -> Result<bool> {
    let doc = load_document(&ctx.config, &args.doc)?;
    let text = if doc.is_html {
        strip_tags(&doc.content)
    } else {
        doc.content
    };
    let template_id = args
        .template
        .or(doc.template_id)
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
    let case_type = match parse_case_type(args.case_type.as_deref())? {
        Some(t) => Some(t),
        None => doc.case_type,
    };
    let options = ComplianceOptions {
        include_evidence: doc.preferences.include_evidence && !args.no_evidence,
        cite_law: doc.preferences.cite_law && !args.no_cite_law,
        case_type,
    };
    let report = build_compliance_report(&text, &template_id, &options);
    let all_pass = report.iter().all(|i| i.pass);

    if args.autofill {
        let name = template(&template_id).map_or("法律文书", |t| t.name);
        let filled = autofill_missing_sections(&text, &report, name);
        if let Some(path) = &args.out {
            std::fs::write(path, &filled)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        if ctx.json {
            write_json(out, &json!({ "report": report, "content": filled }))?;
        } else if args.out.is_none() {
            writeln!(out, "{filled}")?;
        } else {
            write_report(out, &report)?;
        }
        return Ok(true);
    }

    if ctx.json {
        write_json(out, &report)?;
    } else {
        write_report(out, &report)?;
    }
    Ok(all_pass)
}
