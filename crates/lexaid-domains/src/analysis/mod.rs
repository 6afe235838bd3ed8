//! Case analysis from the plaintiff's or defendant's side.
//!
//! One request returns both perspectives; the caller shows the one it asked
//! for. Every field of the reply is optional so a partially filled object
//! still renders.

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{bail, Result};
use lexaid_core::{agent::ChatBackend, ChatMessage, ChatOptions};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::parse_json_object;

pub const ANALYSIS_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseCategory {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CASE_CATEGORIES: &[CaseCategory] = &[
    CaseCategory { id: "contract", name: "合同纠纷" },
    CaseCategory { id: "tort", name: "侵权纠纷" },
    CaseCategory { id: "property", name: "财产纠纷" },
    CaseCategory { id: "labor", name: "劳动纠纷" },
    CaseCategory { id: "intellectual", name: "知识产权" },
    CaseCategory { id: "corporate", name: "公司纠纷" },
    CaseCategory { id: "marriage", name: "婚姻家庭" },
    CaseCategory { id: "inherit", name: "继承纠纷" },
    CaseCategory { id: "lease", name: "房屋租赁" },
    CaseCategory { id: "traffic", name: "交通事故" },
    CaseCategory { id: "loan", name: "民间借贷" },
    CaseCategory { id: "it", name: "网络信息" },
    CaseCategory { id: "consumer", name: "消费者维权" },
    CaseCategory { id: "env", name: "环保纠纷" },
    CaseCategory { id: "edu", name: "教育培训" },
    CaseCategory { id: "medical", name: "医疗纠纷" },
    CaseCategory { id: "housing", name: "房产买卖" },
];

pub const DEFAULT_CATEGORY: &str = "contract";

pub fn category(id: &str) -> Option<&'static CaseCategory> {
    CASE_CATEGORIES.iter().find(|c| c.id == id)
}

/// Display name, or the id itself for unknown categories.
pub fn category_name(id: &str) -> &str {
    category(id).map_or(id, |c| c.name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    #[default]
    Plaintiff,
    Defendant,
}

impl Perspective {
    pub fn lawyer_role(self) -> &'static str {
        match self {
            Self::Plaintiff => PLAINTIFF_ROLE,
            Self::Defendant => DEFENDANT_ROLE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Plaintiff => "原告方（起诉方）",
            Self::Defendant => "被告方（应诉方）",
        }
    }
}

impl FromStr for Perspective {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plaintiff" => Ok(Self::Plaintiff),
            "defendant" => Ok(Self::Defendant),
            other => bail!("unknown perspective: {other} (expected plaintiff or defendant)"),
        }
    }
}

/// Extra guidance for the model, keyed by category. Unknown ids get the
/// general tort guidance.
pub fn type_focus(id: &str) -> &'static str {
    match id {
        "traffic" => FOCUS_TRAFFIC,
        "marriage" => FOCUS_MARRIAGE,
        "loan" => FOCUS_LOAN,
        "labor" => FOCUS_LABOR,
        "property" => FOCUS_PROPERTY,
        "contract" => FOCUS_CONTRACT,
        "intellectual" => FOCUS_INTELLECTUAL,
        "corporate" => FOCUS_CORPORATE,
        "lease" => FOCUS_LEASE,
        "housing" => FOCUS_HOUSING,
        "medical" => FOCUS_MEDICAL,
        "consumer" => FOCUS_CONSUMER,
        "it" => FOCUS_IT,
        "env" => FOCUS_ENV,
        "edu" => FOCUS_EDU,
        _ => FOCUS_GENERAL,
    }
}

/// Materials worth adding to the case description, per category.
pub fn case_suggestions(id: &str) -> &'static [&'static str] {
    match id {
        "traffic" => &[
            "事故认定书/简要经过",
            "就诊病历/票据",
            "保险保单/理赔沟通",
            "行车记录仪/监控截图",
            "修车评估/发票",
            "收入证明/误工情况",
            "伤残鉴定或计划",
            "现场照片/目击证言",
        ],
        "marriage" => &[
            "婚姻关系证明",
            "共同财产清单",
            "共同债务线索",
            "子女基本情况/抚养诉求",
            "家暴报警/病历/保护令",
            "房屋产证/按揭合同",
        ],
        "loan" => &["转账流水", "借条/借据", "利息约定", "催收/沟通记录", "已还款凭证", "担保/保证资料"],
        "labor" => &[
            "劳动关系证明（考勤/社保/工牌）",
            "工资条/加班记录",
            "解除/辞退材料",
            "工伤认定/劳动鉴定",
            "竞业限制协议",
        ],
        "contract" => &[
            "合同签订/履行证据",
            "发票/收据/交付凭证",
            "催告/违约通知",
            "损失计算明细",
            "变更/补充协议",
        ],
        "property" => &["权属证明", "占有/使用情况", "交易/履约记录", "不当得利相关凭证"],
        "corporate" => &["股东信息/出资证明", "股权转让协议", "公司章程/决议", "对外担保资料"],
        "intellectual" => &[
            "权属证明（专利/商标/著作权）",
            "侵权比对材料",
            "侵权收益线索",
            "公证/取证材料",
        ],
        "lease" => &["租赁合同", "押金收据", "交接清单", "维修/停用记录", "解约通知/沟通记录"],
        "housing" => &["网签/预售/备案资料", "按揭/解押材料", "交房/办证记录", "面积误差/质量问题证据"],
        "medical" => &["就诊病历/检查报告", "医疗费用票据", "医疗机构沟通记录", "鉴定意见或计划"],
        "consumer" => &["发票/订单/聊天记录", "宣传材料/页面截图", "退换货沟通记录", "损失明细"],
        "it" => &["账号/数据证据", "隐私泄露/侵权证据", "平台沟通与处理记录"],
        "env" => &["监测数据/鉴定", "行政处理文书", "污染源线索", "修复/赔偿依据"],
        "edu" => &["培训合同/收据", "退费沟通记录", "宣传对比材料", "未成年保护相关材料"],
        "tort" => &["侵权事实经过", "损害评估", "证据链条清单"],
        _ => &["当事人基本信息", "争议焦点概述", "已掌握的关键证据", "期望目标与底线"],
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub category: String,
    pub perspective: Perspective,
    pub details: String,
}

// ── Reply shape ──────────────────────────────────────────────────────────

/// Accepts `85`, `85.5` or `"85"`; anything else reads as absent.
fn lenient_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = serde_json::Value::deserialize(d)?;
    Ok(match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineAnalysis {
    pub critical_dates: Vec<String>,
    pub statute_of_limitations: String,
    pub urgent_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvidenceAnalysis {
    pub strong_evidence: Vec<String>,
    pub weak_evidence: Vec<String>,
    pub missing_evidence: Vec<String>,
    #[serde(deserialize_with = "lenient_score")]
    pub evidence_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialAnalysis {
    pub claim_amount: String,
    pub recoverability_score: String,
    pub cost_benefit: String,
    pub alternative_resolution: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalPrecedents {
    pub favorable_cases: Vec<String>,
    pub unfavorable_cases: Vec<String>,
    pub key_principles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk: String,
    pub reputational_risk: String,
    pub financial_risk: String,
    pub time_risk: String,
}

/// Sections shared by both perspectives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseAnalysis {
    pub vulnerabilities: Vec<String>,
    pub recommendations: Vec<String>,
    pub timeline_analysis: TimelineAnalysis,
    pub evidence_analysis: EvidenceAnalysis,
    pub financial_analysis: FinancialAnalysis,
    pub legal_precedents: LegalPrecedents,
    pub risk_assessment: RiskAssessment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaintiffAnalysis {
    pub winning_points: Vec<String>,
    pub success_probability: String,
    pub counter_suit_risk: String,
    #[serde(flatten)]
    pub base: BaseAnalysis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefendantAnalysis {
    pub defense_points: Vec<String>,
    pub counter_suit_opportunity: String,
    pub defense_strength: String,
    #[serde(flatten)]
    pub base: BaseAnalysis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub plaintiff: PlaintiffAnalysis,
    pub defendant: DefendantAnalysis,
}

// ── Prompt ───────────────────────────────────────────────────────────────

/// System + user messages for one analysis call.
pub fn build_messages(req: &AnalysisRequest) -> Vec<ChatMessage> {
    let role = req.perspective.lawyer_role();
    let system = format!("{role}\n\n{JSON_ONLY_DIRECTIVE}\n\n{ANALYSIS_SKELETON}");
    let user = format!(
        "\n【律师角色】\n{role}\n\n【案件基本信息】\n- 案件类型：{category}\n- 分析视角：{side}\n- 紧急程度：需要专业律师的深度分析\n\n【类型侧重点（根据案件类型自动加强）】\n{focus}\n\n【案件详情】\n{details}\n\n{ANALYSIS_REQUIREMENTS}",
        category = category_name(&req.category),
        side = req.perspective.label(),
        focus = type_focus(&req.category),
        details = req.details,
    );
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Run one analysis. Empty case details are rejected before any request.
pub async fn analyze(backend: &dyn ChatBackend, req: &AnalysisRequest) -> Result<AnalysisResult> {
    if req.details.trim().is_empty() {
        bail!("case details are empty");
    }
    info!(category = %req.category, perspective = ?req.perspective, "running case analysis");
    let reply = backend
        .chat_once(&build_messages(req), &ChatOptions::with_temperature(ANALYSIS_TEMPERATURE))
        .await?;
    parse_json_object(&reply).map_err(|e| {
        warn!("analysis reply could not be parsed: {e}");
        e
    })
}

// ── Rendering ────────────────────────────────────────────────────────────

fn bullets(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## {heading}");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

fn field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "- **{label}**：{value}");
    }
}

fn render_base(out: &mut String, base: &BaseAnalysis) {
    bullets(out, "风险漏洞", &base.vulnerabilities);
    bullets(out, "实战建议", &base.recommendations);

    let t = &base.timeline_analysis;
    let _ = writeln!(out, "\n## 时效与程序分析");
    field(out, "诉讼时效", &t.statute_of_limitations);
    for d in &t.critical_dates {
        field(out, "关键节点", d);
    }
    for a in &t.urgent_actions {
        field(out, "紧急行动", a);
    }

    let e = &base.evidence_analysis;
    let _ = writeln!(out, "\n## 证据评估报告");
    if let Some(score) = e.evidence_score {
        let _ = writeln!(out, "- **证据评分**：{score}");
    }
    for s in &e.strong_evidence {
        field(out, "强势证据", s);
    }
    for w in &e.weak_evidence {
        field(out, "薄弱证据", w);
    }
    for m in &e.missing_evidence {
        field(out, "缺失证据", m);
    }

    let f = &base.financial_analysis;
    let _ = writeln!(out, "\n## 成本效益分析");
    field(out, "争议金额", &f.claim_amount);
    field(out, "回收可能性", &f.recoverability_score);
    field(out, "成本效益", &f.cost_benefit);
    for alt in &f.alternative_resolution {
        field(out, "替代方案", alt);
    }

    let p = &base.legal_precedents;
    bullets(out, "有利判例", &p.favorable_cases);
    bullets(out, "不利判例", &p.unfavorable_cases);
    bullets(out, "核心法理", &p.key_principles);

    let r = &base.risk_assessment;
    let _ = writeln!(out, "\n## 风险防控方案");
    field(out, "整体风险", &r.overall_risk);
    field(out, "声誉风险", &r.reputational_risk);
    field(out, "财务风险", &r.financial_risk);
    field(out, "时间风险", &r.time_risk);
}

impl AnalysisResult {
    /// Markdown report for one side.
    pub fn render(&self, perspective: Perspective) -> String {
        let mut out = String::new();
        match perspective {
            Perspective::Plaintiff => {
                let p = &self.plaintiff;
                let _ = writeln!(out, "# 胜诉策略分析");
                field(&mut out, "胜诉概率", &p.success_probability);
                field(&mut out, "反诉风险", &p.counter_suit_risk);
                bullets(&mut out, "核心优势", &p.winning_points);
                render_base(&mut out, &p.base);
            },
            Perspective::Defendant => {
                let d = &self.defendant;
                let _ = writeln!(out, "# 辩护策略分析");
                field(&mut out, "辩护实力", &d.defense_strength);
                field(&mut out, "反诉机会", &d.counter_suit_opportunity);
                bullets(&mut out, "抗辩要点", &d.defense_points);
                render_base(&mut out, &d.base);
            },
        }
        out
    }
}

// ── Prompt text ──────────────────────────────────────────────────────────

const PLAINTIFF_ROLE: &str = "你是一名经验丰富的原告方代理律师，专门为当事人争取最大利益。你需要站在原告的立场，深入分析案件的每一个细节，找出所有有利因素，同时识别潜在风险并提供切实可行的应对策略。";

const DEFENDANT_ROLE: &str = "你是一名资深的辩护律师，专门为被告提供最强有力的法律辩护。你需要站在被告的立场，全面分析案件，找出所有可能的抗辩理由和减轻责任的途径，制定最佳的辩护策略。";

const JSON_ONLY_DIRECTIVE: &str =
    "请严格按照以下JSON格式返回专业的法律分析（只返回JSON，不要任何其他文本）：";

const ANALYSIS_REQUIREMENTS: &str = "【分析要求】
请作为专业律师，从以下维度进行深入分析：

1. **核心优势分析**：找出所有对当事人有利的法律事实、证据和法理依据
2. **风险漏洞识别**：识别案件中的薄弱环节和潜在风险点
3. **实战建议制定**：提供具体可操作的法律策略和行动方案
4. **证据评估**：分析现有证据的强弱，指出需要补强的证据
5. **时间节点把控**：识别关键时间节点和紧急行动事项
6. **财务成本分析**：评估诉讼成本和预期收益
7. **判例法理支撑**：寻找有利的法律条文和相关判例
8. **风险防控策略**：制定全面的风险应对预案

请严格按照以下JSON格式返回分析结果（不要包含任何其他文本）：";

const ANALYSIS_SKELETON: &str = r#"{
  "plaintiff": {
    "winningPoints": ["胜诉优势点，包括法理依据和事实支撑"],
    "vulnerabilities": ["风险点及具体的应对措施"],
    "recommendations": ["实战建议：具体的行动方案和执行步骤"],
    "timelineAnalysis": {
      "criticalDates": ["关键时间节点：具体日期和重要性说明"],
      "statuteOfLimitations": "诉讼时效详细分析，包括起算时间和剩余期限",
      "urgentActions": ["紧急行动：具体措施和完成时限"]
    },
    "evidenceAnalysis": {
      "strongEvidence": ["强势证据：证明力分析和使用策略"],
      "weakEvidence": ["薄弱证据：存在的问题和补强方案"],
      "missingEvidence": ["缺失证据：获取途径和替代方案"],
      "evidenceScore": 85
    },
    "financialAnalysis": {
      "claimAmount": "详细的赔偿金额计算和法律依据",
      "recoverabilityScore": "回收可能性评估（百分比）和影响因素分析",
      "costBenefit": "诉讼成本效益分析，包括律师费、诉讼费等",
      "alternativeResolution": ["和解方案：具体条件和优劣分析"]
    },
    "legalPrecedents": {
      "favorableCases": ["有利判例：案例要点和适用性分析"],
      "unfavorableCases": ["不利判例：败诉原因分析和规避策略"],
      "keyPrinciples": ["核心法理：适用条件和论证要点"]
    },
    "riskAssessment": {
      "overallRisk": "整体风险等级和主要风险因素",
      "reputationalRisk": "声誉风险评估和保护措施",
      "financialRisk": "财务风险分析和控制方案",
      "timeRisk": "时间风险评估和进度管控"
    },
    "counterSuitRisk": "对方反诉的可能性和应对准备",
    "successProbability": "胜诉概率评估（百分比）"
  },
  "defendant": {
    "defensePoints": ["抗辩要点：法理依据和事实支撑"],
    "vulnerabilities": ["辩护中的薄弱环节和应对策略"],
    "recommendations": ["核心辩护建议：具体的法律策略和实施方案"],
    "timelineAnalysis": {
      "criticalDates": ["关键时间节点和应对措施"],
      "statuteOfLimitations": "时效抗辩的可能性和运用策略",
      "urgentActions": ["紧急辩护行动和完成时限"]
    },
    "evidenceAnalysis": {
      "strongEvidence": ["有利证据的收集和使用策略"],
      "weakEvidence": ["不利证据的质疑和反驳方案"],
      "missingEvidence": ["需要收集的关键证据"],
      "evidenceScore": 70
    },
    "financialAnalysis": {
      "claimAmount": "争议金额分析和减损策略",
      "recoverabilityScore": "败诉后的财务影响评估",
      "costBenefit": "辩护成本和预期效果分析",
      "alternativeResolution": ["和解谈判策略"]
    },
    "legalPrecedents": {
      "favorableCases": ["支持辩护观点的判例"],
      "unfavorableCases": ["不利判例的区别和应对"],
      "keyPrinciples": ["辩护的核心法理依据"]
    },
    "riskAssessment": {
      "overallRisk": "败诉风险和影响评估",
      "reputationalRisk": "声誉损害的控制措施",
      "financialRisk": "财务损失的预估和准备",
      "timeRisk": "诉讼拖延的利弊分析"
    },
    "counterSuitOpportunity": "反诉的可行性和策略分析",
    "defenseStrength": "整体辩护实力评估"
  }
}"#;

const FOCUS_TRAFFIC: &str = "【类型侧重点—交通事故】
- 责任划分：交警事故认定书/监控行车记录/目击证言
- 赔偿项目：医疗费、护理费、误工费、交通费、营养费、残疾赔偿金、精神损害抚慰金等
- 保险理赔：交强险、商业三者险、代位求偿、免赔率
- 程序与时效：调解/诉讼选择，鉴定节点与诉讼时效
- 证据要点：病历票据、修车/评估、收入证明、伤残鉴定";

const FOCUS_MARRIAGE: &str = "【类型侧重点—婚姻家庭】
- 财产分割：共同财产范围、共同债务认定、隐匿转移财产线索
- 子女抚养：抚养权归属、探望权安排、抚养费计算与支付方式
- 住房与居住权：婚前/婚后产、按揭贷款、使用权安排
- 家暴与证据：人身安全保护令、报警/病历/邻里证言
- 程序选择：诉前调解与取证难点、举证责任";

const FOCUS_LOAN: &str = "【类型侧重点—民间借贷】
- 借贷真实性：转账流水、借据/借条、聊天记录
- 利率合法性：司法保护上限、复利与罚息约定
- 清偿抗辩：已还款证据、以物抵债、债务抵销
- 共同债务：配偶/合伙连带、保证担保效力
- 时效与管辖：起算点、分期/部分清偿中断、中止";

const FOCUS_LABOR: &str = "【类型侧重点—劳动纠纷】
- 劳动关系证明：考勤、社保、工牌、同事证言
- 工资待遇：加班工资、未签合同双倍工资、经济补偿金/赔偿金
- 工伤与鉴定：工伤认定、劳动能力鉴定、三期保护
- 仲裁前置：时效、举证、调解安排
- 竞业限制与保密：有效性与赔偿";

const FOCUS_PROPERTY: &str = "【类型侧重点—财产纠纷】
- 物权/债权边界：所有权、用益物权、担保物权
- 占有返还/不当得利：利益转移与法律依据
- 执行与保全：诉前/诉中保全、执行异议
- 证据清单：权属证明、交易凭证、履约记录";

const FOCUS_CONTRACT: &str = "【类型侧重点—合同纠纷】
- 合同效力：主体/意思表示/条款效力/格式条款
- 违约责任：继续履行、解除、损害赔偿、违约金调整
- 举证重点：签订/履行/通知催告/损失证据
- 算赔口径：直接损失/可得利益/可预见规则";

const FOCUS_INTELLECTUAL: &str = "【类型侧重点—知识产权】
- 权利基础：专利/商标/著作权/反不正当竞争
- 侵权判断：比对方法、近似混淆、合理使用抗辩
- 损害计算：法定赔偿/利润推定/惩罚性赔偿
- 证据保全：公证取证、源代码/样品留存";

const FOCUS_CORPORATE: &str = "【类型侧重点—公司纠纷】
- 股权/出资：瑕疵出资、股权转让/回购
- 决议效力：程序与实体缺陷、代表人之争
- 董监高责任：忠实/勤勉义务与侵权连带
- 清算与担保：对外担保效力、清算责任";

const FOCUS_LEASE: &str = "【类型侧重点—房屋租赁】
- 合同效力与备案、转租与解除
- 押金与租金：违约金调整、损失计算
- 租赁物瑕疵：维修/停用责任
- 证据：交接清单、维修票据、沟通记录";

const FOCUS_HOUSING: &str = "【类型侧重点—房产买卖】
- 网签/预售与备案、按揭与解押
- 逾期交房/办证责任与违约金
- 面积误差/质量瑕疵处理
- 税费承担与违约条款效力";

const FOCUS_MEDICAL: &str = "【类型侧重点—医疗纠纷】
- 过错与因果：病历、诊疗规范、鉴定意见
- 损害项目：医疗费、误工费、残疾赔偿、精神损害
- 医疗机构责任分配与举证
- 调解/诉讼路径与鉴定时点";

const FOCUS_CONSUMER: &str = "【类型侧重点—消费者维权】
- 质量/虚假宣传/格式条款
- 三包规定、价款退一赔三/退一赔十（视品类）
- 平台与商家连带、证据留存
- 主管部门投诉与诉讼";

const FOCUS_IT: &str = "【类型侧重点—网络信息】
- 账号/数据/隐私侵权
- 平台责任豁免与注意义务
- 证据保全：取证时间戳、公证/链上存证
- 管辖与跨域取证";

const FOCUS_ENV: &str = "【类型侧重点—环保纠纷】
- 污染因果关系与鉴定
- 行政/民事/公益诉讼路径
- 环评/监测/排污证据链
- 生态修复与损害赔偿";

const FOCUS_EDU: &str = "【类型侧重点—教育培训】
- 合同退费/不公平条款
- 师资虚假宣传证据
- 未成年人保护与监护责任
- 监管投诉与群体性维权";

const FOCUS_GENERAL: &str = "【类型侧重点—侵权/通用】
- 构成要件：过错、损害、因果
- 责任方式：停止侵害、赔偿损失、消除影响
- 证据：损害评估、证明链完整性";
