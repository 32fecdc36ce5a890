//! 单门课程处理流程 - 流程层
//!
//! 定位 → 展开 → 逐个主行（展开讨论课 → 读主行 → 读讨论课 → 分组）→ 汇总

use tracing::{debug, info};

use crate::dom::{ListingDom, Locator};
use crate::error::{CheckError, Result};
use crate::models::{CourseStatus, PrimaryGroup, SectionStatus};
use crate::services::course_locator::{find_course_root, LocatedCourse};
use crate::services::discussion::{discussion_rows_selector, DiscussionExpander};
use crate::services::expansion::{ExpansionController, PRIMARY_ROW_SELECTOR};
use crate::services::row_extractor::extract_section_status;

/// 课程处理流程
///
/// 不持有页面，只编排能力层。
#[derive(Debug, Clone, Default)]
pub struct CourseFlow {
    expansion: ExpansionController,
    discussions: DiscussionExpander,
}

impl CourseFlow {
    pub fn new(expansion: ExpansionController, discussions: DiscussionExpander) -> Self {
        Self {
            expansion,
            discussions,
        }
    }

    /// 查询一门课程的完整状态
    pub async fn run<D>(&self, dom: &D, course_number: &str) -> Result<CourseStatus>
    where
        D: ListingDom + ?Sized,
    {
        let course = find_course_root(dom, course_number).await?;
        info!("[课程 {}] 找到: {}", course_number, course.heading);

        self.expansion.ensure_expanded(dom, &course, course_number).await?;
        self.collect_course(dom, &course, course_number).await
    }

    /// 从已展开的课程容器中读取所有分组
    pub async fn collect_course<D>(
        &self,
        dom: &D,
        course: &LocatedCourse,
        course_number: &str,
    ) -> Result<CourseStatus>
    where
        D: ListingDom + ?Sized,
    {
        let primary_rows = course.root.locate(PRIMARY_ROW_SELECTOR);
        let primary_count = dom.count(&primary_rows).await?;
        if primary_count == 0 {
            return Err(CheckError::structural(format!(
                "课程 {} 没有任何班级行",
                course_number
            )));
        }

        let mut groups = Vec::with_capacity(primary_count);
        for index in 0..primary_count {
            let primary_row = primary_rows.nth(index);
            groups.push(self.collect_group(dom, &course.root, &primary_row).await?);
        }

        let status = CourseStatus::new(course_number, course.course_title(), groups);
        info!(
            "[课程 {}] {} 个分组, 可选: {}",
            course_number,
            status.groups().len(),
            status.is_enrollable()
        );
        Ok(status)
    }

    /// 读取一个主行及其讨论课
    async fn collect_group<D>(
        &self,
        dom: &D,
        course_root: &Locator,
        primary_row: &Locator,
    ) -> Result<PrimaryGroup>
    where
        D: ListingDom + ?Sized,
    {
        let expansion = self.discussions.expand(dom, primary_row).await?;
        let primary = extract_section_status(dom, primary_row).await?;
        debug!("主行 {} [{}] 讨论课展开: {:?}", primary.section(), primary.status(), expansion);

        let mut discussions: Vec<SectionStatus> = Vec::new();
        let primary_row_id = dom.get_attribute(primary_row, "id").await?;
        if let Some(row_id) = primary_row_id.filter(|id| !id.is_empty()) {
            let discussion_rows = course_root.locate(discussion_rows_selector(&row_id));
            let discussion_count = dom.count(&discussion_rows).await?;
            for index in 0..discussion_count {
                discussions.push(extract_section_status(dom, &discussion_rows.nth(index)).await?);
            }
        }

        Ok(PrimaryGroup::new(primary, discussions))
    }
}
