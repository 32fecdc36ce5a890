//! 课程展开控制
//!
//! 课程只有两种状态：收起、展开，由标题按钮的 `aria-expanded` 表示。
//! 点击可能恰好落在页面过渡动画期间而没有效果，因此等待超时后会重新读取状态、
//! 必要时再点一次，第二次等待仍超时才算失败。

use std::time::Duration;

use tracing::{debug, warn};

use crate::dom::{ListingDom, Locator};
use crate::error::{CheckError, DomError, Result};
use crate::services::course_locator::LocatedCourse;

/// 课程主行（讲座、实验等）
pub const PRIMARY_ROW_SELECTOR: &str = ".data_row.primary-row";

/// 展开状态属性
const EXPANDED_ATTRIBUTE: &str = "aria-expanded";

/// 总尝试次数（首次 + 一次重试）
const MAX_ATTEMPTS: usize = 2;

/// 默认每次等待主行出现的时间
pub const DEFAULT_EXPANSION_TIMEOUT: Duration = Duration::from_millis(20_000);

/// 课程展开状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    Collapsed,
    Expanded,
}

impl ExpansionState {
    /// 只有属性值恰好为 `"true"` 才算展开
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("true") => ExpansionState::Expanded,
            _ => ExpansionState::Collapsed,
        }
    }
}

/// 课程展开控制器
#[derive(Debug, Clone)]
pub struct ExpansionController {
    timeout: Duration,
}

impl ExpansionController {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// 读取标题按钮的展开状态
    pub async fn read_state<D>(&self, dom: &D, control: &Locator) -> Result<ExpansionState>
    where
        D: ListingDom + ?Sized,
    {
        let value = dom.get_attribute(control, EXPANDED_ATTRIBUTE).await?;
        Ok(ExpansionState::from_attribute(value.as_deref()))
    }

    /// 确保课程主行可见
    pub async fn ensure_expanded<D>(
        &self,
        dom: &D,
        course: &LocatedCourse,
        course_number: &str,
    ) -> Result<()>
    where
        D: ListingDom + ?Sized,
    {
        let first_row = course.root.locate(PRIMARY_ROW_SELECTOR).first();

        for attempt in 1..=MAX_ATTEMPTS {
            if self.read_state(dom, &course.control).await? == ExpansionState::Collapsed {
                debug!("课程 {} 处于收起状态，点击展开 (第 {} 次)", course_number, attempt);
                dom.click(&course.control).await?;
            }

            match dom.wait_for_attached(&first_row, self.timeout).await {
                Ok(()) => return Ok(()),
                Err(DomError::Timeout { .. }) => {
                    warn!(
                        "课程 {} 主行未出现 (尝试 {}/{})",
                        course_number, attempt, MAX_ATTEMPTS
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CheckError::ExpansionTimeout {
            course: course_number.to_string(),
        })
    }
}

impl Default for ExpansionController {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANSION_TIMEOUT)
    }
}
