//! Static drafts used when the model is unavailable, so there is always
//! something to review and export.

use chrono::NaiveDate;

use super::DocumentInfo;
use crate::date_line;

fn or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

pub fn fallback_content(
    template_id: &str,
    template_name: &str,
    info: &DocumentInfo,
    date: NaiveDate,
) -> String {
    let date = date_line(date);
    let court = or(&info.court, "北京市朝阳区人民法院");
    match template_id {
        "civil_complaint" => {
            let plaintiff = or(&info.plaintiff, "张三");
            let defendant = or(&info.defendant, "李四");
            format!(
                "{template_name}

原告：{plaintiff}，男，汉族，1980年1月1日出生
住址：北京市朝阳区xxx路xxx号
联系电话：138xxxxxxxx

被告：{defendant}，女，汉族，1985年3月15日出生
住址：北京市海淀区xxx路xxx号
联系电话：139xxxxxxxx

诉讼请求：
一、请求法院判令被告立即偿还欠款人民币50,000元；
二、请求法院判令被告支付逾期利息（按照年利率6%计算，自2023年1月1日起至实际清偿之日止）；
三、本案诉讼费用由被告承担。

事实和理由：
2022年12月1日，原告与被告签订《借款协议》一份，约定被告向原告借款人民币50,000元，借款期限为一年，即自2022年12月1日至2023年12月1日止，年利率为6%。协议签订后，原告按约定将借款50,000元通过银行转账方式交付给被告。

借款到期后，原告多次催收，被告一直拖欠不还，严重违反了双方签订的借款协议。被告的行为已构成违约，应当承担相应的法律责任。

综上所述，被告应当立即偿还借款本金及利息。根据《中华人民共和国民法典》相关规定，特向贵院提起诉讼，恳请贵院依法支持原告的诉讼请求。

此致
{court}

起诉人：{plaintiff}
日期：{date}"
            )
        },
        "civil_response" => {
            let plaintiff = or(&info.plaintiff, "张三");
            let defendant = or(&info.defendant, "李四");
            let case_number = or(&info.case_number, "(2024)京xxxx民初xxx号");
            format!(
                "{template_name}

答辩人：{defendant}，女，汉族，1985年3月15日出生
住址：北京市海淀区xxx路xxx号
联系电话：139xxxxxxxx

针对{plaintiff}诉本人xxx纠纷一案（案号：{case_number}），现提出如下答辩意见：

一、原告的起诉缺乏事实和法律依据

答辩人认为，原告所述借款事实与客观情况不符。双方之间的款项往来系基于其他合作关系，并非单纯的借贷关系。原告提供的所谓《借款协议》存在重大瑕疵，不能作为认定借贷关系的有效证据。

二、原告主张的金额存在错误

即使双方存在债权债务关系，原告主张的金额也明显高于实际情况。答辩人已通过其他方式向原告偿还了部分款项，原告故意隐瞒相关事实，夸大债务金额。

三、利息计算不当

原告主张的年利率6%没有合法依据，且超出了当时的市场合理水平。根据相关法律规定，应当按照实际约定的利率计算，而非原告单方面主张的标准。

四、请求法院驳回原告的全部诉讼请求

综上所述，原告的起诉缺乏事实和法律依据，其诉讼请求不应得到支持。请求贵院依法驳回原告的全部诉讼请求，维护答辩人的合法权益。

此致
{court}

答辩人：{defendant}
日期：{date}"
            )
        },
        _ => format!(
            "{template_name}

[此处为{template_name}的标准格式内容]

当事人信息：
原告：{plaintiff}
被告：{defendant}
案件类型：{case_type}
审理法院：{court}

请根据具体案件情况完善文书内容。

日期：{date}",
            plaintiff = or(&info.plaintiff, "请填写原告姓名"),
            defendant = or(&info.defendant, "请填写被告姓名"),
            case_type = info.case_type.map_or("请选择案件类型", |c| c.as_str()),
            court = or(&info.court, "请填写审理法院"),
        ),
    }
}
