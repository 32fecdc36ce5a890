//! 讨论课展开
//!
//! 主行的讨论课默认收起。展开只是尽力而为：等待讨论课出现、等待网络空闲
//! 都可能超时，超时不影响后续读取，因为有些行展开后不会触发可检测的事件。

use std::time::Duration;

use tracing::debug;

use crate::dom::{best_effort, id_selector, ListingDom, Locator};
use crate::error::Result;

const TOGGLE_ICON_SELECTOR: &str = ".toggle i";
const TOGGLE_BUTTON_SELECTOR: &str = ".toggle button";

/// 图标处于收起状态时带有的 class
const COLLAPSED_ICON_CLASS: &str = "icon-caret-right";

/// 讨论课行
pub const SECONDARY_ROW_SELECTOR: &str = ".data_row.secondary-row";

pub const DEFAULT_DISCUSSION_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(5_000);

/// 某主行下讨论课的选择器
pub fn discussion_rows_selector(primary_row_id: &str) -> String {
    format!(
        "{} {}",
        id_selector(&format!("{}-children", primary_row_id)),
        SECONDARY_ROW_SELECTOR
    )
}

/// 展开结果，仅用于诊断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscussionExpansion {
    /// 没有展开图标，即没有讨论课
    NoToggle,
    /// 图标不是收起状态
    NotCollapsed,
    /// 有图标但没有可点击的按钮
    NoToggleControl,
    /// 已点击展开
    Clicked {
        /// 讨论课是否在等待时间内出现；主行没有 id 时为 `None`
        rows_visible: Option<bool>,
        /// 页面是否在等待时间内网络空闲
        settled: bool,
    },
}

/// 讨论课展开器
#[derive(Debug, Clone)]
pub struct DiscussionExpander {
    visibility_timeout: Duration,
    settle_timeout: Duration,
}

impl DiscussionExpander {
    pub fn new(visibility_timeout: Duration, settle_timeout: Duration) -> Self {
        Self {
            visibility_timeout,
            settle_timeout,
        }
    }

    /// 必要时展开主行的讨论课
    pub async fn expand<D>(&self, dom: &D, primary_row: &Locator) -> Result<DiscussionExpansion>
    where
        D: ListingDom + ?Sized,
    {
        let toggle_icon = primary_row.locate(TOGGLE_ICON_SELECTOR);
        if dom.count(&toggle_icon).await? == 0 {
            return Ok(DiscussionExpansion::NoToggle);
        }

        let icon_classes = dom
            .get_attribute(&toggle_icon.first(), "class")
            .await?
            .unwrap_or_default();
        if !icon_classes
            .split_whitespace()
            .any(|class| class == COLLAPSED_ICON_CLASS)
        {
            return Ok(DiscussionExpansion::NotCollapsed);
        }

        let toggle_button = primary_row.locate(TOGGLE_BUTTON_SELECTOR);
        if dom.count(&toggle_button).await? == 0 {
            return Ok(DiscussionExpansion::NoToggleControl);
        }

        let primary_row_id = dom.get_attribute(primary_row, "id").await?;
        dom.click(&toggle_button.first()).await?;

        let rows_visible = match primary_row_id.as_deref().filter(|id| !id.is_empty()) {
            Some(row_id) => {
                let first_discussion = Locator::css(discussion_rows_selector(row_id)).first();
                Some(
                    best_effort(dom.wait_for_attached(&first_discussion, self.visibility_timeout))
                        .await?,
                )
            }
            None => None,
        };
        let settled = best_effort(dom.wait_for_network_idle(self.settle_timeout)).await?;

        debug!(
            "展开讨论课 {:?}: 讨论课可见={:?}, 网络空闲={}",
            primary_row_id, rows_visible, settled
        );

        Ok(DiscussionExpansion::Clicked {
            rows_visible,
            settled,
        })
    }
}

impl Default for DiscussionExpander {
    fn default() -> Self {
        Self::new(DEFAULT_DISCUSSION_TIMEOUT, DEFAULT_SETTLE_TIMEOUT)
    }
}
