//! 状态文本分类
//!
//! 只有明确以 "closed" 开头的状态才视为不可选，其余（包括候补名单）一律视为开放。

/// 折叠所有空白为单个空格并去掉首尾空白
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 状态文本是否表示开放
pub fn status_is_open(status: &str) -> bool {
    let normalized = normalize_text(status).to_lowercase();
    if normalized.is_empty() {
        return false;
    }
    !normalized.starts_with("closed")
}
