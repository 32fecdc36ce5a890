//! # Course Watch
//!
//! 查询课程检索页上是否存在可选的班级
//!
//! ## 架构设计
//!
//! ### ① 基础设施层
//! - `dom/` - 查询契约（`Locator`、`ListingDom`、`ListingSession`），核心只依赖这里
//! - `browser/` + `infrastructure/` - 基于 chromiumoxide 的实现，`JsExecutor` 是唯一的 page owner
//!
//! ### ② 业务能力层（Services）
//! - `status_classifier` - 状态文本分类
//! - `input_normalizer` - 课程编号规范化
//! - `course_locator` / `expansion` / `discussion` / `row_extractor` - 页面读取能力
//!
//! ### ③ 流程层（Workflow）
//! - `CourseFlow` - 一门课程的完整流程（定位 → 展开 → 分组 → 汇总）
//!
//! ### ④ 编排层（Orchestration）
//! - `fetch_course_statuses` - 独占一个会话，按顺序处理一批课程，全有或全无
//! - `App` - 配置 + Chromium 后端 + 报告

pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::ChromiumLauncher;
pub use config::Config;
pub use dom::{ListingDom, ListingSession, Locator, SessionLauncher, WaitUntil};
pub use error::{CheckError, ConfigError, DomError, Result};
pub use models::{CheckReport, CourseStatus, PrimaryGroup, SectionStatus, Subject};
pub use orchestrator::{fetch_course_statuses, App, FetchOptions};
pub use services::{normalize_course_inputs, normalize_text, status_is_open};
pub use workflow::CourseFlow;
