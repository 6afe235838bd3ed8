use std::io::Write;

use anyhow::Result;
use lexaid_domains::statutes::{query, CATEGORIES};
use serde_json::json;

use super::{write_json, Ctx};
use crate::cli::StatutesArgs;

fn list_categories(ctx: &Ctx, out: &mut dyn Write) -> Result<()> {
    if ctx.json {
        let list: Vec<_> = CATEGORIES.iter().map(|c| json!({ "id": c.id, "name": c.name })).collect();
        return write_json(out, &list);
    }
    for c in CATEGORIES {
        writeln!(out, "{:<16}{}", c.id, c.name)?;
    }
    Ok(())
}

pub async fn statutes(ctx: &Ctx, args: StatutesArgs, out: &mut dyn Write) -> Result<()> {
    let keyword = match args.keyword {
        Some(keyword) if !args.categories => keyword,
        _ => return list_categories(ctx, out),
    };
    let client = ctx.client()?;
    let results = query(&client, &keyword).await?;
    if ctx.json {
        return write_json(out, &results);
    }

    if results.from_fallback {
        eprintln!("提示：在线检索不可用，以下为内置法条。");
    }
    if results.items.is_empty() {
        writeln!(out, "未找到与“{}”相关的法条。", keyword.trim())?;
        return Ok(());
    }
    for s in &results.items {
        writeln!(out, "{} {}（相关度 {}）", s.title, s.article, s.relevance)?;
        writeln!(out, "  {}", s.content)?;
        if !s.tags.is_empty() {
            writeln!(out, "  标签：{}", s.tags.join("、"))?;
        }
        if let Some(note) = &s.practical_note {
            writeln!(out, "  实务要点：{note}")?;
        }
        if let Some(app) = &s.case_application {
            writeln!(out, "  适用场景：{app}")?;
        }
        if !s.related_articles.is_empty() {
            writeln!(out, "  关联条文：{}", s.related_articles.join("、"))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
