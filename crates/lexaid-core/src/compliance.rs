//! Heuristic structure checks for drafted legal documents.
//!
//! Each rule is a presence test against the whitespace-stripped text. The
//! report says whether expected sections exist, not whether they are right.

use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::bail;
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceItem {
    pub key: String,
    pub label: String,
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Loan,
    Labor,
    Finance,
    Insurance,
}

impl CaseType {
    /// Lenient lookup: unknown or empty ids mean "no case type".
    pub fn parse_opt(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loan => "loan",
            Self::Labor => "labor",
            Self::Finance => "finance",
            Self::Insurance => "insurance",
        }
    }
}

impl FromStr for CaseType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "loan" => Ok(Self::Loan),
            "labor" => Ok(Self::Labor),
            "finance" => Ok(Self::Finance),
            "insurance" => Ok(Self::Insurance),
            other => bail!("unknown case type: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceOptions {
    pub include_evidence: bool,
    pub cite_law: bool,
    pub case_type: Option<CaseType>,
}

/// When a rule is evaluated at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Always,
    CiteLaw,
    IncludeEvidence,
}

impl Gate {
    fn enabled(self, opts: &ComplianceOptions) -> bool {
        match self {
            Self::Always => true,
            Self::CiteLaw => opts.cite_law,
            Self::IncludeEvidence => opts.include_evidence,
        }
    }
}

struct RuleSpec {
    key: &'static str,
    label: &'static str,
    pattern: &'static str,
    suggestion: &'static str,
    gate: Gate,
}

const TITLE_KEYWORDS: &str = "起诉状|答辩状|上诉状|反诉状|调解协议书|证据清单";

/// Display order is table order.
const CORE_RULES: &[RuleSpec] = &[
    RuleSpec {
        key: "title",
        label: "标题规范（如：民事起诉状/答辩状）",
        pattern: TITLE_KEYWORDS,
        suggestion: "建议在首行设置明确标题，如“民事起诉状”。",
        gate: Gate::Always,
    },
    RuleSpec {
        key: "party",
        label: "当事人信息（原告/被告等）",
        pattern: "(原告|被告|上诉人|被上诉人|申请人|被申请人|甲方|乙方)[：:]",
        suggestion: "建议列明姓名/性别/住址/联系方式等信息。",
        gate: Gate::Always,
    },
    RuleSpec {
        key: "court",
        label: "法院称谓（如：××人民法院）",
        pattern: "人民法院",
        suggestion: "建议在“此致”后单独一行写明受理法院全称。",
        gate: Gate::Always,
    },
    RuleSpec {
        key: "claims",
        label: "诉讼请求（具体明确，可执行）",
        pattern: "(诉讼请求|请求事项)",
        suggestion: "建议逐条列出，金额要有计算依据，并包含诉讼费承担。",
        gate: Gate::Always,
    },
    RuleSpec {
        key: "facts",
        label: "事实与理由（时间线、争议焦点、证据支撑）",
        pattern: "(事实和理由|事实与理由)",
        suggestion: "建议按时间顺序叙述，并突出争议焦点与关键证据。",
        gate: Gate::Always,
    },
    RuleSpec {
        key: "law",
        label: "法律依据（具体法条/司法解释）",
        pattern: "(法律依据|《[^》]+》[^，。；]*条)",
        suggestion: "建议引用具体条文与司法解释。",
        gate: Gate::CiteLaw,
    },
    RuleSpec {
        key: "evidence",
        label: "证据清单（编号/名称/证明目的）",
        pattern: "(证据清单|证据材料清单|证据目录)",
        suggestion: "建议附“证据清单”，逐项写明证明目的。",
        gate: Gate::IncludeEvidence,
    },
    RuleSpec {
        key: "signature",
        label: "落款（主体签名）",
        pattern: "(起诉人|答辩人|上诉人|申请人|代理人)[：:]",
        suggestion: "建议在末尾处签名/盖章。",
        gate: Gate::Always,
    },
    RuleSpec {
        key: "date",
        label: "日期",
        pattern: r"([0-9]{4}年[0-9]{1,2}月[0-9]{1,2}日|日期[：:])",
        suggestion: "建议以“YYYY年MM月DD日”格式标注日期。",
        gate: Gate::Always,
    },
];

struct CaseRuleSpec {
    case_type: CaseType,
    key: &'static str,
    label: &'static str,
    pattern: &'static str,
    suggestion: &'static str,
}

const CASE_RULES: &[CaseRuleSpec] = &[
    CaseRuleSpec {
        case_type: CaseType::Loan,
        key: "loan_contract",
        label: "借贷关系证明（合同/转账凭证）",
        pattern: "借款|转账|借据|合同",
        suggestion: "建议提供借款合同、转账记录、借据/收据等证明材料。",
    },
    CaseRuleSpec {
        case_type: CaseType::Loan,
        key: "interest_calc",
        label: "本金与利息计算依据",
        pattern: "本金|利息|计算|年利率",
        suggestion: "建议列明本金金额、约定利率、起止时间与计算方式。",
    },
    CaseRuleSpec {
        case_type: CaseType::Labor,
        key: "labor_relation",
        label: "劳动关系证明（合同/社保/考勤）",
        pattern: "劳动合同|社保|公积金|考勤|薪资",
        suggestion: "建议提供劳动合同、社保缴纳、工资条、考勤记录等。",
    },
    CaseRuleSpec {
        case_type: CaseType::Labor,
        key: "dispute_item",
        label: "争议事项（欠薪/赔偿/工伤）",
        pattern: "欠薪|赔偿|工伤|解除|经济补偿",
        suggestion: "建议明确争议事项及金额、法律依据（劳动法/劳动合同法）。",
    },
    CaseRuleSpec {
        case_type: CaseType::Finance,
        key: "finance_product",
        label: "金融产品要素与合同",
        pattern: "贷款|信用卡|保证保险|担保|抵押|质押",
        suggestion: "建议附合同、授信/担保要素与违约事实说明。",
    },
    CaseRuleSpec {
        case_type: CaseType::Finance,
        key: "reg_compliance",
        label: "监管合规要点",
        pattern: "催收|通知|风险提示|资质|授权",
        suggestion: "建议说明催收/通知流程与合规性，披露关键风险提示。",
    },
    CaseRuleSpec {
        case_type: CaseType::Insurance,
        key: "policy",
        label: "保险合同与保单信息",
        pattern: "保单|保险合同|保险金|条款",
        suggestion: "建议提供保单号、保险条款、保险金请求项目与依据。",
    },
    CaseRuleSpec {
        case_type: CaseType::Insurance,
        key: "claim_fact",
        label: "出险事实与理赔流程",
        pattern: "出险|报案|理赔|拒赔|鉴定",
        suggestion: "建议描述出险时间、报案、理赔/拒赔理由与证据。",
    },
];

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern, "compliance pattern failed to compile: {e}");
            None
        },
    }
}

static CORE_PATTERNS: LazyLock<Vec<Option<Regex>>> =
    LazyLock::new(|| CORE_RULES.iter().map(|r| compile(r.pattern)).collect());

static CASE_PATTERNS: LazyLock<Vec<Option<Regex>>> =
    LazyLock::new(|| CASE_RULES.iter().map(|r| compile(r.pattern)).collect());

static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s+"));

static TITLE_NEAR_LINE_START: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(&format!("(?m)^.{{0,50}}({TITLE_KEYWORDS})")));

fn is_match(re: &Option<Regex>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

fn strip_whitespace(content: &str) -> String {
    match WHITESPACE.as_ref() {
        Some(re) => re.replace_all(content, "").into_owned(),
        None => content.split_whitespace().collect(),
    }
}

/// Run every structural check against `content`.
///
/// `template_id` names the document template the text was drafted from; all
/// templates currently share the same rule set. Gated rules pass without being
/// evaluated when their option is off. Case-type rules follow the core rules.
pub fn build_compliance_report(
    content: &str,
    template_id: &str,
    options: &ComplianceOptions,
) -> Vec<ComplianceItem> {
    let text = strip_whitespace(content);
    tracing::debug!(template_id, text_len = text.len(), "building compliance report");

    let mut items: Vec<ComplianceItem> = CORE_RULES
        .iter()
        .zip(CORE_PATTERNS.iter())
        .map(|(rule, re)| ComplianceItem {
            key: rule.key.into(),
            label: rule.label.into(),
            pass: !rule.gate.enabled(options) || is_match(re, &text),
            suggestion: Some(rule.suggestion.into()),
        })
        .collect();

    if let Some(case_type) = options.case_type {
        items.extend(
            CASE_RULES
                .iter()
                .zip(CASE_PATTERNS.iter())
                .filter(|(rule, _)| rule.case_type == case_type)
                .map(|(rule, re)| ComplianceItem {
                    key: rule.key.into(),
                    label: rule.label.into(),
                    pass: is_match(re, &text),
                    suggestion: Some(rule.suggestion.into()),
                }),
        );
    }

    items
}

/// Drafting advice shown next to the form for a given case type.
pub fn case_type_guidance(case_type: CaseType) -> &'static [&'static str] {
    match case_type {
        CaseType::Loan => &[
            "提供借款合同/借据/转账凭证等证明借贷关系的材料",
            "明确本金、利息、起止时间与利息计算方法",
            "说明催收经过与对方违约事实",
        ],
        CaseType::Labor => &[
            "提供劳动合同、社保缴纳、工资条、考勤记录等",
            "明确争议事项（欠薪/赔偿/工伤等）与金额依据",
            "引用相关法律（劳动法/劳动合同法）条款支持",
        ],
        CaseType::Finance => &[
            "附金融合同/授信/担保要素与违约事实说明",
            "披露催收/通知流程与关键风险提示",
            "如涉及保证保险，区分主债务与保险责任要素",
        ],
        CaseType::Insurance => &[
            "提供保单信息、保险合同条款与保险金请求项目",
            "描述出险事实、报案、理赔/拒赔理由与证据",
            "对争议条款（免责/比例赔付等）给出依据",
        ],
    }
}

/// Append boilerplate for every failing section, dated today.
pub fn autofill_missing_sections(
    content: &str,
    report: &[ComplianceItem],
    template_name: &str,
) -> String {
    autofill_missing_sections_on(content, report, template_name, Local::now().date_naive())
}

/// Same as [`autofill_missing_sections`] with an explicit date line.
///
/// Existing text is kept as-is; at most one trailing block is appended, with
/// sections in the order title, claims, facts, law, evidence, court,
/// signature, date.
pub fn autofill_missing_sections_on(
    content: &str,
    report: &[ComplianceItem],
    template_name: &str,
    date: NaiveDate,
) -> String {
    let need = |key: &str| report.iter().find(|i| i.key == key).is_some_and(|i| !i.pass);
    let mut blocks: Vec<String> = Vec::new();

    if need("title") && !is_match(&TITLE_NEAR_LINE_START, content) {
        blocks.push(template_name.to_string());
    }
    if need("claims") {
        blocks.push(
            "\n诉讼请求：\n1、请在此逐条列明具体请求事项及金额计算依据；\n2、诉讼费用承担等。".into(),
        );
    }
    if need("facts") {
        blocks.push("\n事实和理由：\n请按时间顺序叙述关键事实，突出争议焦点，并注明对应证据。".into());
    }
    if need("law") {
        blocks.push(
            "\n法律依据：\n请引用相关法条及司法解释（示例：依据《民法典》第××条……）。".into(),
        );
    }
    if need("evidence") {
        blocks.push("\n证据材料清单：\n证据1：名称——证明目的；\n证据2：名称——证明目的。".into());
    }
    if need("court") {
        blocks.push("\n此致\n××市××区人民法院".into());
    }
    if need("signature") {
        blocks.push("\n起诉人：\n".into());
    }
    if need("date") {
        blocks.push(format!("日期：{}", date.format("%Y/%-m/%-d")));
    }

    if blocks.is_empty() {
        return content.to_string();
    }
    format!("{}\n\n{}", content.trim_end(), blocks.join("\n\n"))
}
