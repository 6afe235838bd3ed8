use std::io::{Cursor, Read};

use lexaid_core::convert::markdown_to_nodes;
use lexaid_core::export::{
    document_xml, docx_bytes, export_docx, legal_format_html, print_html, safe_file_name,
};

#[test]
fn file_names_are_sanitised() {
    assert_eq!(safe_file_name("a/b:c*?"), "a_b_c__");
    assert_eq!(safe_file_name("  "), "法律文书");
}

#[test]
fn docx_package_contains_document_part() {
    let nodes = markdown_to_nodes("# 标题\n正文 **重点**");
    let bytes = docx_bytes("民事起诉状", &nodes).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    for part in ["[Content_Types].xml", "_rels/.rels", "word/document.xml", "word/styles.xml"] {
        assert!(names.iter().any(|n| n == part), "missing {part}");
    }
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    assert!(xml.contains("民事起诉状"));
    assert!(xml.contains("Heading1"));
    assert!(xml.contains("<w:b/>"));
}

#[test]
fn document_xml_escapes_text() {
    let nodes = markdown_to_nodes("A & <B>");
    let xml = document_xml("t", &nodes);
    assert!(xml.contains("A &amp; &lt;B&gt;"));
}

#[test]
fn html_export_path_survives_malformed_input() {
    assert!(export_docx("t", "<p>broken <b", true).is_ok());
}

#[test]
fn print_page_triggers_print() {
    let html = print_html("<文书>", &markdown_to_nodes("- 一"));
    assert!(html.contains("<title>&lt;文书&gt;</title>"));
    assert!(html.contains("• 一"));
    assert!(html.contains("window.print()"));
}

#[test]
fn legal_formatter_classes_lines() {
    let text = "民事起诉状\n\n原告：张三\n一、请求事项\n此致\n北京市朝阳区人民法院\n起诉人：张三\n日期：2024年1月2日";
    let html = legal_format_html(text);
    assert!(html.starts_with(r#"<p class="paragraph"><h1 class="document-title">民事起诉状</h1>"#));
    assert!(html.contains(r#"<strong class="party-label">原告：</strong>"#));
    assert!(html.contains(r#"<h2 class="section-title">一、请求事项</h2>"#));
    assert!(html.contains(r#"<div class="closing">此致</div>"#));
    assert!(html.contains(r#"<div class="court-name">北京市朝阳区人民法院</div>"#));
    assert!(html.contains(r#"<span class="date">2024年1月2日</span>"#));
    assert_eq!(legal_format_html(""), "");
}
