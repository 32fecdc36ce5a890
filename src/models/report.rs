use serde::Serialize;

use crate::models::course::{CourseStatus, SectionView};

/// 一次查询的输出报告
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// RFC 3339 时间戳
    pub checked_at: String,
    pub term: String,
    pub subject: String,
    /// 任一课程可选
    pub enrollable: bool,
    pub courses: Vec<CourseReport>,
}

/// 单门课程的报告：状态树加上展平的班级列表
#[derive(Debug, Clone, Serialize)]
pub struct CourseReport {
    #[serde(flatten)]
    pub status: CourseStatus,
    pub sections: Vec<SectionView>,
}

impl CheckReport {
    pub fn new(
        term: impl Into<String>,
        subject: impl Into<String>,
        courses: Vec<CourseStatus>,
    ) -> Self {
        let enrollable = courses.iter().any(CourseStatus::is_enrollable);
        let courses = courses
            .into_iter()
            .map(|status| CourseReport {
                sections: status.sections(),
                status,
            })
            .collect();

        Self {
            checked_at: chrono::Local::now().to_rfc3339(),
            term: term.into(),
            subject: subject.into(),
            enrollable,
            courses,
        }
    }
}
