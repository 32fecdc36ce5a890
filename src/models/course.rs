//! 课程状态树
//!
//! 课程 → 主行分组 → 讨论课。所有派生标志在构造时计算，构造后不可修改。

use serde::Serialize;

use crate::services::status_classifier::status_is_open;

/// 单个班级（主行或讨论课）的状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    section: String,
    status: String,
    is_open: bool,
}

impl SectionStatus {
    /// `is_open` 由 `status` 文本决定
    pub fn new(section: impl Into<String>, status: impl Into<String>) -> Self {
        let status = status.into();
        let is_open = status_is_open(&status);
        Self {
            section: section.into(),
            status,
            is_open,
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

/// 一个主行及其讨论课
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryGroup {
    primary: SectionStatus,
    discussions: Vec<SectionStatus>,
    is_enrollable: bool,
}

impl PrimaryGroup {
    /// 主行开放，且没有讨论课或至少一个讨论课开放时，分组可选
    pub fn new(primary: SectionStatus, discussions: Vec<SectionStatus>) -> Self {
        let is_enrollable = primary.is_open()
            && (discussions.is_empty() || discussions.iter().any(SectionStatus::is_open));
        Self {
            primary,
            discussions,
            is_enrollable,
        }
    }

    pub fn primary(&self) -> &SectionStatus {
        &self.primary
    }

    pub fn discussions(&self) -> &[SectionStatus] {
        &self.discussions
    }

    pub fn is_enrollable(&self) -> bool {
        self.is_enrollable
    }
}

/// 一门课程的完整状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseStatus {
    course_number: String,
    course_title: String,
    groups: Vec<PrimaryGroup>,
    is_enrollable: bool,
}

impl CourseStatus {
    pub fn new(
        course_number: impl Into<String>,
        course_title: impl Into<String>,
        groups: Vec<PrimaryGroup>,
    ) -> Self {
        let is_enrollable = groups.iter().any(PrimaryGroup::is_enrollable);
        Self {
            course_number: course_number.into(),
            course_title: course_title.into(),
            groups,
            is_enrollable,
        }
    }

    pub fn course_number(&self) -> &str {
        &self.course_number
    }

    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    pub fn groups(&self) -> &[PrimaryGroup] {
        &self.groups
    }

    pub fn is_enrollable(&self) -> bool {
        self.is_enrollable
    }

    /// 展平为班级列表：每个主行后紧跟它的讨论课
    pub fn sections(&self) -> Vec<SectionView> {
        let mut sections = Vec::new();
        for group in &self.groups {
            let primary = group.primary();
            sections.push(SectionView::new(
                primary,
                SectionKind::Lecture,
                group.is_enrollable(),
            ));
            for discussion in group.discussions() {
                sections.push(SectionView::new(
                    discussion,
                    SectionKind::Discussion,
                    primary.is_open() && discussion.is_open(),
                ));
            }
        }
        sections
    }
}

/// 班级类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Lecture,
    Discussion,
}

/// 展平后的班级视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub section: String,
    pub kind: SectionKind,
    pub status: String,
    pub is_open: bool,
    /// 经由该班级是否存在可选路径
    pub enrollable_path: bool,
}

impl SectionView {
    fn new(status: &SectionStatus, kind: SectionKind, enrollable_path: bool) -> Self {
        Self {
            section: status.section().to_string(),
            kind,
            status: status.status().to_string(),
            is_open: status.is_open(),
            enrollable_path,
        }
    }
}
