//! DOM 查询契约 - 基础设施抽象层
//!
//! 核心流程只依赖这里定义的 trait，不认识任何具体的浏览器实现。
//!
//! - `Locator` 是惰性的查询描述（类似 Playwright 的 locator），每次调用都重新解析
//! - `ListingDom` 提供计数、读文本、读属性、点击、等待
//! - `ListingSession` 在此基础上增加导航与关闭
//! - `SessionLauncher` 负责创建会话

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use crate::error::DomError;

/// DOM 操作结果类型
pub type DomResult<T> = std::result::Result<T, DomError>;

/// 不区分大小写的文本匹配模式
///
/// 匹配对象是元素文本（空白已折叠）。
#[derive(Debug, Clone)]
pub struct TextPattern {
    regex: Regex,
}

impl TextPattern {
    /// 从正则源码创建
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    /// 正则源码（浏览器端按 `new RegExp(source, 'i')` 使用）
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// 查询步骤
#[derive(Debug, Clone)]
pub enum Step {
    /// 在当前节点集合下查找 CSS 选择器
    Css(String),
    /// 按文本过滤
    HasText(TextPattern),
    /// 取第 n 个
    Nth(usize),
}

/// 惰性元素定位器
#[derive(Debug, Clone)]
pub struct Locator {
    steps: Vec<Step>,
}

impl Locator {
    /// 从文档根开始定位
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            steps: vec![Step::Css(selector.into())],
        }
    }

    /// 在当前结果下继续定位
    pub fn locate(&self, selector: impl Into<String>) -> Self {
        self.push(Step::Css(selector.into()))
    }

    pub fn filter_text(&self, pattern: TextPattern) -> Self {
        self.push(Step::HasText(pattern))
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    pub fn nth(&self, index: usize) -> Self {
        self.push(Step::Nth(index))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn push(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            match step {
                Step::Css(selector) => write!(f, "{}", selector)?,
                Step::HasText(pattern) => write!(f, "has-text=/{}/i", pattern.source())?,
                Step::Nth(index) => write!(f, "nth={}", index)?,
            }
        }
        Ok(())
    }
}

/// 按 id 精确匹配的选择器，可容纳 `#id` 写法无法表达的字符
pub fn id_selector(id: &str) -> String {
    format!("[id='{}']", id.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// 导航完成条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// `load` 事件
    Load,
    /// 网络空闲
    NetworkIdle,
}

/// 渲染后页面的查询能力
#[async_trait]
pub trait ListingDom: Send + Sync {
    /// 匹配的元素个数
    async fn count(&self, locator: &Locator) -> DomResult<usize>;

    /// 第一个匹配元素的可见文本；没有匹配时返回 `MissingElement`
    async fn inner_text(&self, locator: &Locator) -> DomResult<String>;

    /// 第一个匹配元素的属性；属性不存在时为 `None`
    async fn get_attribute(&self, locator: &Locator, name: &str) -> DomResult<Option<String>>;

    async fn click(&self, locator: &Locator) -> DomResult<()>;

    /// 等待至少一个匹配元素挂载到文档，超时返回 `DomError::Timeout`
    async fn wait_for_attached(&self, locator: &Locator, timeout: Duration) -> DomResult<()>;

    /// 等待页面不再有网络活动，超时返回 `DomError::Timeout`
    async fn wait_for_network_idle(&self, timeout: Duration) -> DomResult<()>;
}

/// 一次批量查询独占的渲染会话
#[async_trait]
pub trait ListingSession: ListingDom {
    async fn navigate(&self, url: &str, wait_until: WaitUntil) -> DomResult<()>;

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> DomResult<()>;

    /// 释放会话持有的浏览器资源
    async fn close(self: Box<Self>) -> DomResult<()>;
}

/// 会话工厂
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> DomResult<Box<dyn ListingSession>>;
}

/// 尽力等待：超时不视为错误
///
/// 返回值只用于诊断日志，不参与流程判断。非超时错误照常返回。
pub async fn best_effort<F>(wait: F) -> DomResult<bool>
where
    F: Future<Output = DomResult<()>>,
{
    match wait.await {
        Ok(()) => Ok(true),
        Err(DomError::Timeout { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
