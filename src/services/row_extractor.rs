//! 单行状态读取

use crate::dom::{ListingDom, Locator};
use crate::error::Result;
use crate::models::SectionStatus;
use crate::services::status_classifier::normalize_text;

const SECTION_SELECTOR: &str = ".cls-section";
const SECTION_LINK_SELECTOR: &str = ".cls-section a";
const STATUS_SELECTOR: &str = ".statusColumn";

/// 读取一行（主行或讨论课）的班级编号与状态
///
/// 班级编号优先取链接文字，没有链接时取标签本身的文字。
pub async fn extract_section_status<D>(dom: &D, row: &Locator) -> Result<SectionStatus>
where
    D: ListingDom + ?Sized,
{
    let section_link = row.locate(SECTION_LINK_SELECTOR);
    let section_label = if dom.count(&section_link).await? > 0 {
        section_link.first()
    } else {
        row.locate(SECTION_SELECTOR).first()
    };
    let section = normalize_text(&dom.inner_text(&section_label).await?);

    let status = normalize_text(&dom.inner_text(&row.locate(STATUS_SELECTOR).first()).await?);

    Ok(SectionStatus::new(section, status))
}
