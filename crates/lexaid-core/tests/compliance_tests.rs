use chrono::NaiveDate;
use lexaid_core::compliance::{
    autofill_missing_sections_on, build_compliance_report, case_type_guidance, CaseType,
    ComplianceItem, ComplianceOptions,
};

fn item<'a>(report: &'a [ComplianceItem], key: &str) -> &'a ComplianceItem {
    report
        .iter()
        .find(|i| i.key == key)
        .unwrap_or_else(|| panic!("missing item {key}"))
}

fn strict() -> ComplianceOptions {
    ComplianceOptions {
        include_evidence: true,
        cite_law: true,
        case_type: None,
    }
}

const COMPLETE: &str = "民事起诉状\n\
原告：张三，男\n\
被告：李四，女\n\
诉讼请求：\n一、判令被告偿还借款。\n\
事实和理由：\n双方签订借款协议。依据《中华人民共和国民法典》第六百七十五条规定。\n\
证据清单：\n证据1：借款协议。\n\
此致\n北京市朝阳区人民法院\n\
起诉人：张三\n\
2024年3月1日";

#[test]
fn complete_document_passes_every_core_check() {
    let report = build_compliance_report(COMPLETE, "civil_complaint", &strict());
    let keys: Vec<&str> = report.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(
        keys,
        &["title", "party", "court", "claims", "facts", "law", "evidence", "signature", "date"]
    );
    assert!(report.iter().all(|i| i.pass), "{report:?}");
}

#[test]
fn missing_title_and_claims_with_date_present() {
    let text = "这是一段没有结构的文字。\n2024年1月15日";
    let report = build_compliance_report(text, "civil_complaint", &strict());
    assert!(!item(&report, "title").pass);
    assert!(!item(&report, "claims").pass);
    assert!(item(&report, "date").pass);
    for key in ["title", "claims"] {
        let s = item(&report, key).suggestion.as_deref().unwrap_or("");
        assert!(!s.is_empty(), "{key} should carry a suggestion");
    }
}

#[test]
fn whitespace_inside_markers_is_ignored() {
    let report = build_compliance_report("诉 讼\n请 求", "civil_complaint", &strict());
    assert!(item(&report, "claims").pass);
}

#[test]
fn disabled_options_short_circuit_to_pass() {
    let opts = ComplianceOptions {
        include_evidence: false,
        cite_law: false,
        case_type: None,
    };
    let report = build_compliance_report("", "civil_complaint", &opts);
    assert!(item(&report, "law").pass);
    assert!(item(&report, "evidence").pass);
    assert!(!item(&report, "title").pass);
}

#[test]
fn statute_citation_pattern_counts_as_law() {
    let report = build_compliance_report(
        "根据《劳动合同法》第四十七条支付经济补偿",
        "civil_complaint",
        &strict(),
    );
    assert!(item(&report, "law").pass);
}

#[test]
fn case_type_checks_are_appended_after_core_checks() {
    let opts = ComplianceOptions {
        case_type: Some(CaseType::Labor),
        ..strict()
    };
    let report = build_compliance_report("签订劳动合同后被拖欠薪资，要求经济补偿", "civil_complaint", &opts);
    assert_eq!(report.len(), 11);
    assert_eq!(report[9].key, "labor_relation");
    assert_eq!(report[10].key, "dispute_item");
    assert!(report[9].pass);
    assert!(report[10].pass);
}

#[test]
fn insurance_checks_fail_without_keywords() {
    let opts = ComplianceOptions {
        case_type: Some(CaseType::Insurance),
        ..strict()
    };
    let report = build_compliance_report("普通文本", "civil_complaint", &opts);
    assert!(!item(&report, "policy").pass);
    assert!(!item(&report, "claim_fact").pass);
}

#[test]
fn report_is_deterministic() {
    let opts = ComplianceOptions {
        case_type: Some(CaseType::Loan),
        ..strict()
    };
    let a = build_compliance_report(COMPLETE, "appeal", &opts);
    let b = build_compliance_report(COMPLETE, "appeal", &opts);
    assert_eq!(a, b);
}

#[test]
fn case_type_parsing_is_lenient() {
    assert_eq!(CaseType::parse_opt("loan"), Some(CaseType::Loan));
    assert_eq!(CaseType::parse_opt(""), None);
    assert_eq!(CaseType::parse_opt("tort"), None);
    assert_eq!(case_type_guidance(CaseType::Finance).len(), 3);
}

#[test]
fn autofill_appends_blocks_in_section_order() {
    let text = "一些事实描述";
    let report = build_compliance_report(text, "civil_complaint", &strict());
    let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
    let out = autofill_missing_sections_on(text, &report, "民事起诉状", date);

    assert!(out.starts_with("一些事实描述\n\n民事起诉状"));
    let order = ["民事起诉状", "诉讼请求：", "事实和理由：", "法律依据：", "证据材料清单：", "此致", "起诉人：", "日期：2024/5/6"];
    let mut last = 0;
    for marker in order {
        let at = out[last..]
            .find(marker)
            .unwrap_or_else(|| panic!("{marker} missing or out of order in {out}"));
        last += at + marker.len();
    }
}

#[test]
fn autofill_keeps_passing_document_unchanged() {
    let report = build_compliance_report(COMPLETE, "civil_complaint", &strict());
    let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
    assert_eq!(
        autofill_missing_sections_on(COMPLETE, &report, "民事起诉状", date),
        COMPLETE
    );
}

#[test]
fn autofill_skips_title_when_a_line_already_has_one() {
    // Report says the title is missing, but a line already starts with one.
    let report = vec![ComplianceItem {
        key: "title".into(),
        label: "标题".into(),
        pass: false,
        suggestion: None,
    }];
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let text = "民事答辩状（草稿）";
    assert_eq!(autofill_missing_sections_on(text, &report, "民事答辩状", date), text);
}

#[test]
fn fullwidth_digit_date_does_not_count() {
    let report = build_compliance_report("２０２４年５月６日", "civil_complaint", &strict());
    assert!(!item(&report, "date").pass);
}
