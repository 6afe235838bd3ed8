//! Keyword statute lookup backed by the model, with a small built-in set
//! when the model gives nothing usable.

use anyhow::{bail, Context, Result};
use lexaid_core::{agent::ChatBackend, ChatMessage, ChatOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::outer_span;

pub const STATUTE_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_RELEVANCE: f64 = 80.0;
const FALLBACK_LIMIT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statute {
    pub id: u64,
    pub title: String,
    pub article: String,
    pub content: String,
    pub category: String,
    pub effect_date: String,
    pub tags: Vec<String>,
    pub relevance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practical_note: Option<String>,
    pub related_articles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_application: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatuteResults {
    pub items: Vec<Statute>,
    pub from_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatuteCategory {
    pub id: &'static str,
    pub name: &'static str,
}

/// Browsing filters; the lookup itself is keyword-only.
pub const CATEGORIES: &[StatuteCategory] = &[
    StatuteCategory { id: "all", name: "全部法条" },
    StatuteCategory { id: "civil", name: "民法典" },
    StatuteCategory { id: "criminal", name: "刑法" },
    StatuteCategory { id: "procedure", name: "诉讼法" },
    StatuteCategory { id: "commercial", name: "商业法" },
    StatuteCategory { id: "labor", name: "劳动法" },
    StatuteCategory { id: "administrative", name: "行政法" },
];

fn text_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(item: &Value, key: &str) -> Vec<String> {
    item.get(key)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

fn positive_number(item: &Value, key: &str) -> Option<f64> {
    let n = match item.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n > 0.0).then_some(n)
}

/// Parse a model reply into statutes, sorted by relevance (highest first).
///
/// Only the outermost `[...]` span is read. Items without a title or content
/// are dropped; a missing id becomes the item's 1-based position and a
/// missing relevance becomes [`DEFAULT_RELEVANCE`].
pub fn parse_statutes(reply: &str) -> Result<Vec<Statute>> {
    let body = outer_span(reply, '[', ']').unwrap_or(reply.trim());
    let parsed: Value = serde_json::from_str(body).context("statute reply is not JSON")?;
    let Value::Array(items) = parsed else {
        bail!("statute reply is not a JSON array");
    };

    let mut out: Vec<Statute> = items
        .iter()
        .filter(|item| item.is_object())
        .filter_map(|item| {
            let title = text_field(item, "title")?;
            let content = text_field(item, "content")?;
            Some((item, title, content))
        })
        .enumerate()
        .map(|(index, (item, title, content))| Statute {
            id: positive_number(item, "id").map_or(index as u64 + 1, |n| n as u64),
            title,
            article: text_field(item, "article").unwrap_or_default(),
            content,
            category: text_field(item, "category").unwrap_or_default(),
            effect_date: text_field(item, "effectDate").unwrap_or_default(),
            tags: string_list(item, "tags"),
            relevance: positive_number(item, "relevance").unwrap_or(DEFAULT_RELEVANCE),
            practical_note: text_field(item, "practicalNote"),
            related_articles: string_list(item, "relatedArticles"),
            case_application: text_field(item, "caseApplication"),
        })
        .collect();

    out.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    Ok(out)
}

pub fn build_messages(keyword: &str) -> Vec<ChatMessage> {
    let user = format!(
        "请根据关键词\"{keyword}\"检索相关法条，返回JSON数组格式。\n\n{QUERY_RULES}\n\n请检索关键词\"{keyword}\"相关的法条："
    );
    vec![ChatMessage::system(QUERY_SYSTEM), ChatMessage::user(user)]
}

/// Look up statutes for `keyword`. Never fails on model trouble: an error,
/// an unparseable reply or an empty list all fall back to the built-in set.
pub async fn query(backend: &dyn ChatBackend, keyword: &str) -> Result<StatuteResults> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        bail!("search keyword is empty");
    }
    info!(keyword, "querying statutes");

    let reply = backend
        .chat_once(&build_messages(keyword), &ChatOptions::with_temperature(STATUTE_TEMPERATURE))
        .await;
    let parsed = reply.and_then(|text| parse_statutes(&text));
    match parsed {
        Ok(items) if !items.is_empty() => Ok(StatuteResults {
            items,
            from_fallback: false,
        }),
        Ok(_) => {
            warn!(keyword, "no statutes in reply, using built-in set");
            Ok(StatuteResults {
                items: fallback_statutes(keyword),
                from_fallback: true,
            })
        },
        Err(e) => {
            warn!(keyword, "statute lookup failed, using built-in set: {e:#}");
            Ok(StatuteResults {
                items: fallback_statutes(keyword),
                from_fallback: true,
            })
        },
    }
}

/// Built-in articles whose content, tags or title contain `keyword`.
pub fn fallback_statutes(keyword: &str) -> Vec<Statute> {
    builtin_statutes()
        .into_iter()
        .filter(|s| {
            s.content.contains(keyword)
                || s.tags.iter().any(|t| t.contains(keyword))
                || s.title.contains(keyword)
        })
        .take(FALLBACK_LIMIT)
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_statutes() -> Vec<Statute> {
    vec![
        Statute {
            id: 1,
            title: "中华人民共和国民法典".into(),
            article: "第五百七十七条".into(),
            content: "当事人一方不履行合同义务或者履行合同义务不符合约定的，应当承担继续履行、采取补救措施或者赔偿损失等违约责任。".into(),
            category: "合同法".into(),
            effect_date: "2021-01-01".into(),
            tags: strings(&["违约责任", "合同履行", "损害赔偿"]),
            relevance: 95.0,
            practical_note: Some("这是合同违约责任的基础条文，适用于各类合同违约情形。实务中需要结合具体违约行为确定责任承担方式。".into()),
            related_articles: strings(&["第五百八十四条", "第五百八十五条"]),
            case_application: Some("合同纠纷案件中确定违约责任的基础依据".into()),
        },
        Statute {
            id: 2,
            title: "中华人民共和国民法典".into(),
            article: "第五百八十四条".into(),
            content: "当事人一方不履行合同义务或者履行合同义务不符合约定，造成对方损失的，损失赔偿额应当相当于因违约所造成的损失，包括合同履行后可以获得的利益；但是，不得超过违约一方订立合同时预见到或者应当预见到的因违约可能造成的损失。".into(),
            category: "合同法".into(),
            effect_date: "2021-01-01".into(),
            tags: strings(&["损失赔偿", "可得利益", "可预见性"]),
            relevance: 92.0,
            practical_note: Some("损失赔偿的计算标准，包括直接损失和可得利益损失，但受可预见性规则限制。".into()),
            related_articles: strings(&["第五百七十七条", "第五百八十五条"]),
            case_application: Some("计算合同违约损失赔偿金额的重要依据".into()),
        },
        Statute {
            id: 3,
            title: "中华人民共和国民法典".into(),
            article: "第一百八十八条".into(),
            content: "向人民法院请求保护民事权利的诉讼时效期间为三年。法律另有规定的，依照其规定。".into(),
            category: "诉讼程序".into(),
            effect_date: "2021-01-01".into(),
            tags: strings(&["诉讼时效", "民事权利", "三年"]),
            relevance: 88.0,
            practical_note: Some("一般诉讼时效为三年，从知道或应当知道权利受到损害时起算。特殊情况有特别规定。".into()),
            related_articles: strings(&["第一百八十九条", "第一百九十条"]),
            case_application: Some("各类民事纠纷中确定诉讼时效的基础条文".into()),
        },
    ]
}

const QUERY_SYSTEM: &str =
    "你是专业的法律条文检索助手。请严格按照JSON格式返回法条检索结果，不要包含任何其他文字。";

const QUERY_RULES: &str = r#"要求：
1. 只返回JSON数组，不要其他文字
2. 返回5-8条最相关的法条
3. 每条法条包含完整信息

JSON格式示例：
[
  {
    "id": 1,
    "title": "中华人民共和国民法典",
    "article": "第五百七十七条",
    "content": "当事人一方不履行合同义务或者履行合同义务不符合约定的，应当承担继续履行、采取补救措施或者赔偿损失等违约责任。",
    "category": "合同法",
    "effectDate": "2021-01-01",
    "tags": ["违约责任", "合同履行"],
    "relevance": 95,
    "practicalNote": "适用于各类合同违约情形，是违约责任的基础条文",
    "relatedArticles": ["第五百八十四条", "第五百八十五条"],
    "caseApplication": "合同纠纷案件中确定违约责任"
  }
]"#;
