//! 检索结果页地址

use url::form_urlencoded;

use crate::models::Subject;

/// 检索结果页基础地址
pub const BASE_RESULTS_URL: &str = "https://sa.ucla.edu/ro/public/soc/Results";

/// 构造某科目某学期的检索结果页地址
///
/// 参数顺序固定，值按表单编码（空格为 `+`）。
pub fn build_results_url(subject: Subject, term: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("SubjectAreaName", subject.display_name())
        .append_pair("t", term)
        .append_pair("sBy", "subject")
        .append_pair("subj", subject.code())
        .append_pair("catlg", "")
        .append_pair("cls_no", "")
        .append_pair("undefined", "Go")
        .append_pair("btnIsInIndex", "btn_inIndex")
        .finish();

    format!("{}?{}", BASE_RESULTS_URL, query)
}
