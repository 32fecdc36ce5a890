//! 课程编号输入规范化

use tracing::debug;

use crate::error::{CheckError, Result};
use crate::models::Subject;

/// 把原始输入整理成课程编号列表
///
/// 每个输入可以是逗号分隔的多个编号，可以带科目前缀。保持输入顺序，不去重。
pub fn normalize_course_inputs<I, S>(raw_courses: I, subject: Subject) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut courses = Vec::new();

    for raw in raw_courses {
        for candidate in raw.as_ref().split(',') {
            let normalized = candidate.to_uppercase().replace(subject.code(), "");
            let normalized = strip_alias(normalized.trim(), subject);
            if !normalized.is_empty() {
                courses.push(normalized.to_string());
            }
        }
    }

    if courses.is_empty() {
        return Err(CheckError::EmptyInput);
    }

    debug!("规范化后的课程编号: {:?}", courses);
    Ok(courses)
}

/// 去掉开头的科目简写（简写后必须是空白）
fn strip_alias(candidate: &str, subject: Subject) -> &str {
    for alias in subject.aliases() {
        if let Some(rest) = candidate.strip_prefix(alias) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    candidate
}
