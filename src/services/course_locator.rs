//! 课程定位
//!
//! 在检索结果页的课程标题按钮中找到目标课程，并推导出课程内容容器。

use tracing::debug;

use crate::dom::{id_selector, ListingDom, Locator, TextPattern};
use crate::error::{CheckError, Result};
use crate::services::status_classifier::normalize_text;

/// 课程标题按钮
pub const COURSE_HEADING_SELECTOR: &str = "h3.head > button[id$='-title']";

/// 标题按钮 id 的固定后缀，去掉后即为内容容器 id
const HEADING_ID_SUFFIX: &str = "-title";

/// 标题中编号与课程名之间的分隔符
const TITLE_SEPARATOR: &str = " - ";

/// 定位到的课程
#[derive(Debug, Clone)]
pub struct LocatedCourse {
    /// 课程内容容器
    pub root: Locator,
    /// 展开/收起课程的标题按钮
    pub control: Locator,
    /// 标题按钮的完整文本，如 `31 - Introduction to Computer Science I`
    pub heading: String,
}

impl LocatedCourse {
    /// 第一个分隔符之后的课程名；没有分隔符时为完整标题
    pub fn course_title(&self) -> &str {
        self.heading
            .split_once(TITLE_SEPARATOR)
            .map_or(self.heading.as_str(), |(_, title)| title)
    }
}

/// 匹配以课程编号开头、随后是 `-` 的标题
pub fn heading_pattern(course_number: &str) -> Result<TextPattern> {
    let source = format!(r"^\s*{}\s*-", regex::escape(course_number));
    Ok(TextPattern::new(&source)?)
}

/// 查找课程
///
/// 多个标题匹配时取文档顺序中的第一个。
pub async fn find_course_root<D>(dom: &D, course_number: &str) -> Result<LocatedCourse>
where
    D: ListingDom + ?Sized,
{
    let headings =
        Locator::css(COURSE_HEADING_SELECTOR).filter_text(heading_pattern(course_number)?);

    let matches = dom.count(&headings).await?;
    if matches == 0 {
        return Err(CheckError::NotFound {
            course: course_number.to_string(),
        });
    }
    if matches > 1 {
        debug!("课程 {} 匹配到 {} 个标题，使用第一个", course_number, matches);
    }

    let control = headings.first();
    let control_id = dom
        .get_attribute(&control, "id")
        .await?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            CheckError::structural(format!("无法确定课程 {} 的 DOM id", course_number))
        })?;

    let heading = normalize_text(&dom.inner_text(&control).await?);
    let root_id = control_id.strip_suffix(HEADING_ID_SUFFIX).unwrap_or(&control_id);
    debug!("课程 {} 内容容器: #{}", course_number, root_id);

    Ok(LocatedCourse {
        root: Locator::css(id_selector(root_id)),
        control,
        heading,
    })
}
