mod support;

use lexaid_core::Role;
use lexaid_domains::analysis::{
    analyze, build_messages, case_suggestions, category_name, type_focus, AnalysisRequest,
    Perspective, ANALYSIS_TEMPERATURE, CASE_CATEGORIES,
};
use support::StubBackend;

fn request(details: &str) -> AnalysisRequest {
    AnalysisRequest {
        category: "loan".into(),
        perspective: Perspective::Plaintiff,
        details: details.into(),
    }
}

#[test]
fn category_table_is_complete_and_unique() {
    assert_eq!(CASE_CATEGORIES.len(), 17);
    let mut ids: Vec<&str> = CASE_CATEGORIES.iter().map(|c| c.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 17);
    assert_eq!(category_name("loan"), "民间借贷");
    assert_eq!(category_name("unknown"), "unknown");
}

#[test]
fn unknown_categories_get_general_guidance() {
    assert!(type_focus("loan").contains("民间借贷"));
    assert_eq!(type_focus("inherit"), type_focus("tort"));
    assert_eq!(case_suggestions("nope").len(), 4);
    assert!(case_suggestions("traffic").contains(&"事故认定书/简要经过"));
}

#[test]
fn prompt_carries_role_focus_and_details() {
    let msgs = build_messages(&AnalysisRequest {
        perspective: Perspective::Defendant,
        ..request("对方声称借款未还")
    });
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].role, Role::System);
    assert!(msgs[0].content.contains("辩护律师"));
    assert!(msgs[0].content.contains("\"defensePoints\""));
    assert!(msgs[1].content.contains("案件类型：民间借贷"));
    assert!(msgs[1].content.contains("被告方（应诉方）"));
    assert!(msgs[1].content.contains("【类型侧重点—民间借贷】"));
    assert!(msgs[1].content.contains("对方声称借款未还"));
}

#[tokio::test]
async fn empty_details_never_reach_the_model() {
    let backend = StubBackend::replying("{}");
    assert!(analyze(&backend, &request("   ")).await.is_err());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn partial_reply_parses_leniently() {
    let reply = r#"以下是分析：
```json
{"plaintiff":{"winningPoints":["借条真实"],"successProbability":"75%",
  "evidenceAnalysis":{"evidenceScore":"85","strongEvidence":["转账记录"]}},
 "defendant":{"defensePoints":["已部分还款"]}}
```"#;
    let backend = StubBackend::replying(reply);
    let result = analyze(&backend, &request("借款五万未还")).await.unwrap();

    assert_eq!(result.plaintiff.winning_points, vec!["借条真实"]);
    assert_eq!(result.plaintiff.success_probability, "75%");
    assert_eq!(result.plaintiff.base.evidence_analysis.evidence_score, Some(85.0));
    assert!(result.plaintiff.base.vulnerabilities.is_empty());
    assert_eq!(result.defendant.defense_points, vec!["已部分还款"]);

    let (_, opts) = backend.last_call();
    assert_eq!(opts.temperature, Some(ANALYSIS_TEMPERATURE));

    let report = result.render(Perspective::Plaintiff);
    assert!(report.starts_with("# 胜诉策略分析"));
    assert!(report.contains("- 借条真实"));
    assert!(report.contains("**证据评分**：85"));
}

#[tokio::test]
async fn non_json_reply_is_an_error() {
    let backend = StubBackend::replying("抱歉，我无法回答。");
    assert!(analyze(&backend, &request("借款")).await.is_err());
}

#[tokio::test]
async fn upstream_failure_is_an_error() {
    let backend = StubBackend::failing();
    let err = analyze(&backend, &request("借款")).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500");
}

#[test]
fn perspective_parses_from_cli_values() {
    assert_eq!("defendant".parse::<Perspective>().unwrap(), Perspective::Defendant);
    assert!("judge".parse::<Perspective>().is_err());
}
