use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Subject;
use crate::orchestrator::FetchOptions;

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "course_watch.toml";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 文件（存在时）→ 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 学期代码，如 `26S`
    pub term: String,
    /// 科目代码
    pub subject_code: String,
    /// 是否显示浏览器窗口
    pub headful: bool,
    /// 浏览器可执行文件，为空时自动查找
    pub chrome_executable: Option<String>,
    /// 设置后连接到该调试端口上已运行的浏览器，而不是启动新浏览器
    pub browser_debug_port: Option<u16>,
    /// 等待课程主行出现（每次尝试）
    pub expansion_timeout_ms: u64,
    /// 等待讨论课出现
    pub discussion_timeout_ms: u64,
    /// 等待网络空闲
    pub settle_timeout_ms: u64,
    /// 导航与等待课程标题
    pub listing_timeout_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            term: "26S".to_string(),
            subject_code: "COM SCI".to_string(),
            headful: false,
            chrome_executable: None,
            browser_debug_port: None,
            expansion_timeout_ms: 20_000,
            discussion_timeout_ms: 5_000,
            settle_timeout_ms: 5_000,
            listing_timeout_ms: 30_000,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 按默认顺序加载配置
    ///
    /// 配置文件路径可由 `COURSE_WATCH_CONFIG` 指定。
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("COURSE_WATCH_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|name| std::env::var(name).ok())
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置；无法解析的值报错而不是忽略
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(term) = lookup("TERM_CODE") {
            self.term = term;
        }
        if let Some(subject_code) = lookup("SUBJECT_CODE") {
            self.subject_code = subject_code;
        }
        if let Some(path) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(path);
        }
        if let Some(headful) = parse_env(&lookup, "HEADFUL", "bool")? {
            self.headful = headful;
        }
        if let Some(port) = parse_env(&lookup, "BROWSER_DEBUG_PORT", "u16")? {
            self.browser_debug_port = Some(port);
        }
        if let Some(ms) = parse_env(&lookup, "EXPANSION_TIMEOUT_MS", "u64")? {
            self.expansion_timeout_ms = ms;
        }
        if let Some(ms) = parse_env(&lookup, "DISCUSSION_TIMEOUT_MS", "u64")? {
            self.discussion_timeout_ms = ms;
        }
        if let Some(ms) = parse_env(&lookup, "SETTLE_TIMEOUT_MS", "u64")? {
            self.settle_timeout_ms = ms;
        }
        if let Some(ms) = parse_env(&lookup, "LISTING_TIMEOUT_MS", "u64")? {
            self.listing_timeout_ms = ms;
        }
        if let Some(verbose) = parse_env(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = verbose;
        }
        Ok(self)
    }

    /// 查找配置的科目
    pub fn subject(&self) -> Result<Subject, ConfigError> {
        Subject::from_code(&self.subject_code).ok_or_else(|| ConfigError::UnknownSubject {
            code: self.subject_code.clone(),
        })
    }

    /// 查询流程使用的参数
    pub fn fetch_options(&self) -> Result<FetchOptions, ConfigError> {
        Ok(FetchOptions {
            subject: self.subject()?,
            expansion_timeout: Duration::from_millis(self.expansion_timeout_ms),
            discussion_timeout: Duration::from_millis(self.discussion_timeout_ms),
            settle_timeout: Duration::from_millis(self.settle_timeout_ms),
            listing_timeout: Duration::from_millis(self.listing_timeout_ms),
        })
    }
}

fn parse_env<T, F>(
    lookup: &F,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
