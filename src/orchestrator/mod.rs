//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<课程编号>，持有渲染会话)
//!     ↓
//! workflow::CourseFlow (处理单门课程)
//!     ↓
//! services (能力层：定位 / 展开 / 读取)
//!     ↓
//! dom (查询契约) ← browser (Chromium 实现)
//! ```

pub mod batch_processor;

pub use batch_processor::{fetch_course_statuses, App, FetchOptions};
