mod fallback;
mod prompts;

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use lexaid_core::{
    agent::ChatBackend,
    compliance::{build_compliance_report, CaseType, ComplianceItem, ComplianceOptions},
    ChatMessage, ChatOptions,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use fallback::fallback_content;

pub const DRAFT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    instructions: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "civil_complaint",
        name: "民事起诉状",
        description: "专业起草民事诉讼起诉文书，包含完整诉讼请求和法理依据",
        features: &["诉讼请求", "事实理由", "法条引用", "证据清单"],
        instructions: prompts::CIVIL_COMPLAINT,
    },
    Template {
        id: "civil_response",
        name: "民事答辩状",
        description: "专业起草答辩文书，提供有力抗辩理由和法律依据",
        features: &["抗辩理由", "事实澄清", "法理论证", "程序抗辩"],
        instructions: prompts::CIVIL_RESPONSE,
    },
    Template {
        id: "appeal",
        name: "上诉状",
        description: "专业起草二审上诉文书，深度分析一审判决问题",
        features: &["上诉理由", "事实重审", "法律纠错", "改判请求"],
        instructions: prompts::APPEAL,
    },
    Template {
        id: "evidence_list",
        name: "证据清单",
        description: "专业整理证据材料，分析证明力和关联性",
        features: &["证据分类", "证明目的", "关联分析", "补强建议"],
        instructions: prompts::EVIDENCE_LIST,
    },
    Template {
        id: "counter_suit",
        name: "反诉状",
        description: "专业起草反诉文书，维护当事人合法权益",
        features: &["反诉理由", "损失计算", "法律依据", "程序合规"],
        instructions: prompts::COUNTER_SUIT,
    },
    Template {
        id: "settlement_agreement",
        name: "调解协议书",
        description: "专业起草调解协议，确保双方权益平衡",
        features: &["协议条款", "履行保障", "违约责任", "争议解决"],
        instructions: prompts::SETTLEMENT_AGREEMENT,
    },
];

pub fn template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Party block and case facts entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    pub plaintiff: String,
    pub defendant: String,
    pub case_type: Option<CaseType>,
    pub court: String,
    pub case_number: String,
    pub case_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftPreferences {
    pub cite_law: bool,
    pub cite_cases: bool,
    /// 正式 / 稳健 / 通俗
    pub tone: String,
    pub include_evidence: bool,
}

impl Default for DraftPreferences {
    fn default() -> Self {
        Self {
            cite_law: true,
            cite_cases: true,
            tone: "正式".into(),
            include_evidence: true,
        }
    }
}

impl DraftPreferences {
    fn directives(&self) -> String {
        let mut out = String::from("\n【生成要求加固】\n");
        if self.cite_law {
            out.push_str("- 请引用具体法律条文与相关司法解释；\n");
        }
        if self.cite_cases {
            out.push_str("- 如有，可引用典型案例或指导性案例（简要说明关联）；\n");
        }
        let tone = if self.tone.trim().is_empty() { "正式" } else { &self.tone };
        out.push_str(&format!("- 语言风格：{tone}；\n"));
        if self.include_evidence {
            out.push_str("- 请附带“证据材料清单”章节，包含编号、名称、证明目的；");
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub template_id: String,
    pub info: DocumentInfo,
    pub preferences: DraftPreferences,
}

impl DraftRequest {
    /// The template, at least one party, and non-empty case details.
    pub fn validate(&self) -> Result<&'static Template> {
        let Some(template) = template(&self.template_id) else {
            bail!("unknown template: {}", self.template_id);
        };
        if self.info.plaintiff.trim().is_empty() && self.info.defendant.trim().is_empty() {
            bail!("at least one of plaintiff or defendant is required");
        }
        if self.info.case_details.trim().is_empty() {
            bail!("case details are required");
        }
        Ok(template)
    }
}

/// The most recent draft, kept so it can be checked and exported later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftedDocument {
    pub title: String,
    pub template_id: String,
    pub case_type: Option<CaseType>,
    pub content: String,
    pub preferences: DraftPreferences,
    /// True when the content is the static fallback rather than a model reply.
    pub from_fallback: bool,
}

impl DraftedDocument {
    pub fn compliance_options(&self) -> ComplianceOptions {
        ComplianceOptions {
            include_evidence: self.preferences.include_evidence,
            cite_law: self.preferences.cite_law,
            case_type: self.case_type,
        }
    }

    pub fn compliance(&self) -> Vec<ComplianceItem> {
        build_compliance_report(&self.content, &self.template_id, &self.compliance_options())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }

    /// `None` when nothing has been drafted yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let doc = serde_json::from_str(&raw)
            .with_context(|| format!("parsing document in {}", path.display()))?;
        Ok(Some(doc))
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

pub fn build_messages(template: &Template, req: &DraftRequest) -> Vec<ChatMessage> {
    let info = &req.info;
    let base = format!(
        "\n【当事人信息】\n原告：{}\n被告：{}\n案件类型：{}\n审理法院：{}\n案件编号：{}\n\n【案件详情】\n{}\n{}",
        or_placeholder(&info.plaintiff, "（请完善）"),
        or_placeholder(&info.defendant, "（请完善）"),
        info.case_type.map_or("（请选择）", |c| c.as_str()),
        or_placeholder(&info.court, "（请填写）"),
        or_placeholder(&info.case_number, "（待分配）"),
        info.case_details,
        req.preferences.directives(),
    );
    let user = format!(
        "{base}\n\n【文书类型】{}\n\n【起草要求】\n{}",
        template.name, template.instructions
    );
    vec![ChatMessage::system(prompts::DRAFTER_ROLE), ChatMessage::user(user)]
}

pub async fn draft(backend: &dyn ChatBackend, req: &DraftRequest) -> Result<DraftedDocument> {
    draft_on(backend, req, Local::now().date_naive()).await
}

/// Same as [`draft`] with an explicit date for the fallback's date line.
///
/// Validation failures are errors. A failed or empty model reply is not: the
/// static fallback is returned with `from_fallback` set.
pub async fn draft_on(
    backend: &dyn ChatBackend,
    req: &DraftRequest,
    date: NaiveDate,
) -> Result<DraftedDocument> {
    let template = req.validate()?;
    info!(template = template.id, "drafting document");

    let reply = backend
        .chat_once(&build_messages(template, req), &ChatOptions::with_temperature(DRAFT_TEMPERATURE))
        .await;
    let (content, from_fallback) = match reply {
        Ok(text) if !text.trim().is_empty() => (text, false),
        Ok(_) => {
            warn!(template = template.id, "model returned an empty draft, using fallback");
            (fallback_content(template.id, template.name, &req.info, date), true)
        },
        Err(e) => {
            warn!(template = template.id, "drafting failed, using fallback: {e:#}");
            (fallback_content(template.id, template.name, &req.info, date), true)
        },
    };

    Ok(DraftedDocument {
        title: template.name.to_string(),
        template_id: template.id.to_string(),
        case_type: req.info.case_type,
        content,
        preferences: req.preferences.clone(),
        from_fallback,
    })
}
