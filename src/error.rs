use thiserror::Error;

/// 课程状态查询错误
///
/// 除 `Dom` 外均为业务层面的致命错误，任何一个都会中止整个批次。
#[derive(Debug, Error)]
pub enum CheckError {
    /// 规范化之后没有任何有效课程编号
    #[error("没有提供有效的课程编号")]
    EmptyInput,

    /// 页面上没有匹配的课程标题
    #[error("页面上未找到课程: {course}")]
    NotFound { course: String },

    /// 预期的结构（id 属性、元素、课程行）缺失
    #[error("页面结构异常: {detail}")]
    Structural { detail: String },

    /// 课程主行两次等待均超时
    #[error("课程 {course} 展开超时（已重试一次）")]
    ExpansionTimeout { course: String },

    /// 课程编号无法构造为匹配模式
    #[error("无效的匹配模式: {0}")]
    Pattern(#[from] regex::Error),

    /// 渲染通道错误
    #[error("浏览器错误: {0}")]
    Dom(DomError),
}

impl CheckError {
    pub fn structural(detail: impl Into<String>) -> Self {
        CheckError::Structural {
            detail: detail.into(),
        }
    }
}

impl From<DomError> for CheckError {
    fn from(err: DomError) -> Self {
        match err {
            DomError::MissingElement { locator } => CheckError::Structural {
                detail: format!("元素不存在: {}", locator),
            },
            other => CheckError::Dom(other),
        }
    }
}

/// 渲染通道错误
#[derive(Debug, Error)]
pub enum DomError {
    /// 等待超时
    #[error("等待 {what} 超时 ({timeout_ms}ms)")]
    Timeout { what: String, timeout_ms: u64 },

    /// 定位器没有匹配任何元素
    #[error("元素不存在: {locator}")]
    MissingElement { locator: String },

    /// 浏览器后端（启动、导航、脚本执行）失败
    #[error("浏览器后端错误: {0}")]
    Backend(String),
}

impl From<chromiumoxide::error::CdpError> for DomError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        DomError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for DomError {
    fn from(err: serde_json::Error) -> Self {
        DomError::Backend(format!("脚本返回值解析失败: {}", err))
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 科目代码不在科目表中
    #[error("未知的科目代码: {code}")]
    UnknownSubject { code: String },
}

/// 课程查询结果类型
pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_element_becomes_structural() {
        let err: CheckError = DomError::MissingElement {
            locator: ".statusColumn".to_string(),
        }
        .into();

        match err {
            CheckError::Structural { detail } => assert!(detail.contains(".statusColumn")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_timeout_stays_dom_error() {
        let err: CheckError = DomError::Timeout {
            what: "rows".to_string(),
            timeout_ms: 20000,
        }
        .into();

        assert!(matches!(err, CheckError::Dom(DomError::Timeout { .. })));
    }

    #[test]
    fn test_not_found_names_course() {
        let err = CheckError::NotFound {
            course: "M51A".to_string(),
        };
        assert!(err.to_string().contains("M51A"));
    }
}
