pub mod course;
pub mod report;
pub mod subject;

pub use course::{CourseStatus, PrimaryGroup, SectionKind, SectionStatus, SectionView};
pub use report::{CheckReport, CourseReport};
pub use subject::Subject;
