//! 批量课程处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **输入规范化**：在接触浏览器之前拒绝空输入
//! 2. **资源管理**：独占一个渲染会话，无论成功失败都会关闭
//! 3. **顺序处理**：按输入顺序逐门课程处理，不并发
//! 4. **全有或全无**：任何一门课程失败都中止整个批次，不返回部分结果

use std::time::Duration;

use tracing::{error, info, warn};

use crate::browser::ChromiumLauncher;
use crate::config::Config;
use crate::dom::{ListingSession, SessionLauncher, WaitUntil};
use crate::error::{ConfigError, Result};
use crate::models::{CheckReport, CourseStatus, Subject};
use crate::services::course_locator::COURSE_HEADING_SELECTOR;
use crate::services::discussion::{DEFAULT_DISCUSSION_TIMEOUT, DEFAULT_SETTLE_TIMEOUT};
use crate::services::expansion::DEFAULT_EXPANSION_TIMEOUT;
use crate::services::{
    build_results_url, normalize_course_inputs, DiscussionExpander, ExpansionController,
};
use crate::utils::logging;
use crate::workflow::CourseFlow;

/// 查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub subject: Subject,
    pub expansion_timeout: Duration,
    pub discussion_timeout: Duration,
    pub settle_timeout: Duration,
    pub listing_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            subject: Subject::default(),
            expansion_timeout: DEFAULT_EXPANSION_TIMEOUT,
            discussion_timeout: DEFAULT_DISCUSSION_TIMEOUT,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            listing_timeout: Duration::from_millis(30_000),
        }
    }
}

impl FetchOptions {
    fn course_flow(&self) -> CourseFlow {
        CourseFlow::new(
            ExpansionController::new(self.expansion_timeout),
            DiscussionExpander::new(self.discussion_timeout, self.settle_timeout),
        )
    }
}

/// 查询一批课程的状态
///
/// 结果顺序与规范化后的输入顺序一致。
pub async fn fetch_course_statuses<L, I, S>(
    launcher: &L,
    raw_courses: I,
    term: &str,
    options: &FetchOptions,
) -> Result<Vec<CourseStatus>>
where
    L: SessionLauncher + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let courses = normalize_course_inputs(raw_courses, options.subject)?;
    let url = build_results_url(options.subject, term);

    let session = launcher.launch().await?;
    let outcome = process_courses(&*session, &url, &courses, options).await;

    match (outcome, session.close().await) {
        (Ok(statuses), Ok(())) => Ok(statuses),
        (Ok(_), Err(close_err)) => {
            error!("关闭浏览器会话失败: {}", close_err);
            Err(close_err.into())
        }
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("关闭浏览器会话失败: {}", close_err);
            Err(e)
        }
    }
}

async fn process_courses(
    session: &dyn ListingSession,
    url: &str,
    courses: &[String],
    options: &FetchOptions,
) -> Result<Vec<CourseStatus>> {
    info!("🌐 正在打开检索页: {}", url);
    session.navigate(url, WaitUntil::NetworkIdle).await?;
    session
        .wait_for_selector(COURSE_HEADING_SELECTOR, options.listing_timeout)
        .await?;

    let flow = options.course_flow();
    let mut results = Vec::with_capacity(courses.len());

    for (index, course) in courses.iter().enumerate() {
        logging::log_course_start(index + 1, courses.len(), course);
        let status = flow.run(session, course).await.map_err(|e| {
            error!("[课程 {}] ❌ 处理失败: {}", course, e);
            e
        })?;
        results.push(status);
    }

    Ok(results)
}

/// 应用主结构
pub struct App {
    config: Config,
    options: FetchOptions,
    launcher: Box<dyn SessionLauncher>,
}

impl App {
    /// 使用 Chromium 后端初始化应用
    pub fn initialize(config: Config) -> std::result::Result<Self, ConfigError> {
        let launcher = ChromiumLauncher::from_config(&config);
        Self::with_launcher(config, Box::new(launcher))
    }

    pub fn with_launcher(
        config: Config,
        launcher: Box<dyn SessionLauncher>,
    ) -> std::result::Result<Self, ConfigError> {
        let options = config.fetch_options()?;
        Ok(Self {
            config,
            options,
            launcher,
        })
    }

    /// 运行一次查询
    pub async fn run<S: AsRef<str>>(&self, raw_courses: &[S]) -> Result<CheckReport> {
        logging::log_startup(&self.config.term, self.options.subject.code(), raw_courses.len());

        let statuses = fetch_course_statuses(
            self.launcher.as_ref(),
            raw_courses,
            &self.config.term,
            &self.options,
        )
        .await?;

        let report = CheckReport::new(&self.config.term, self.options.subject.code(), statuses);
        logging::print_final_stats(&report);
        Ok(report)
    }
}
