use std::io::Write;

use anyhow::{bail, Context, Result};
use lexaid_domains::analysis::{
    analyze, case_suggestions, category, AnalysisRequest, Perspective, CASE_CATEGORIES,
};
use serde_json::json;

use super::{read_input, write_json, Ctx};
use crate::cli::{AnalyzeArgs, Side};

impl From<Side> for Perspective {
    fn from(side: Side) -> Self {
        match side {
            Side::Plaintiff => Perspective::Plaintiff,
            Side::Defendant => Perspective::Defendant,
        }
    }
}

fn list_categories(ctx: &Ctx, out: &mut dyn Write) -> Result<()> {
    if ctx.json {
        let list: Vec<_> = CASE_CATEGORIES
            .iter()
            .map(|c| json!({ "id": c.id, "name": c.name, "suggestions": case_suggestions(c.id) }))
            .collect();
        return write_json(out, &list);
    }
    for c in CASE_CATEGORIES {
        writeln!(out, "{:<14}{}", c.id, c.name)?;
        writeln!(out, "{:<14}建议补充：{}", "", case_suggestions(c.id).join("、"))?;
    }
    Ok(())
}

pub async fn run(ctx: &Ctx, args: AnalyzeArgs, out: &mut dyn Write) -> Result<()> {
    if args.list {
        return list_categories(ctx, out);
    }
    if category(&args.category).is_none() {
        bail!("unknown case category: {} (see `lexaid analyze --list`)", args.category);
    }

    let perspective = Perspective::from(args.perspective);
    let req = AnalysisRequest {
        category: args.category,
        perspective,
        details: read_input(&args.input)?,
    };
    let client = ctx.client()?;
    let result = analyze(&client, &req)
        .await
        .context("analysis failed, please retry")?;

    if ctx.json {
        write_json(out, &result)
    } else {
        write!(out, "{}", result.render(perspective))?;
        Ok(())
    }
}
