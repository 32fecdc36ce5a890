//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::CheckReport;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则按 `verbose` 选择 debug 或 info。日志写到 stderr，stdout 留给 JSON 报告。
pub fn init(verbose: bool) {
    let default_level = if verbose { "course_watch=debug" } else { "course_watch=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(term: &str, subject: &str, input_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 课程状态查询 - {} {}", subject, term);
    info!("📋 输入数量: {}", input_count);
    info!("{}", "=".repeat(60));
}

/// 记录单门课程开始
pub fn log_course_start(index: usize, total: usize, course_number: &str) {
    info!("{}", "─".repeat(60));
    info!("[课程 {}] 开始处理 ({}/{})", course_number, index, total);
}

/// 打印最终统计信息
pub fn print_final_stats(report: &CheckReport) {
    let enrollable = report
        .courses
        .iter()
        .filter(|course| course.status.is_enrollable())
        .count();

    info!("{}", "=".repeat(60));
    info!("📊 查询完成 - {}", report.checked_at);
    for course in &report.courses {
        let mark = if course.status.is_enrollable() { "✅" } else { "❌" };
        info!(
            "{} {} - {}",
            mark,
            course.status.course_number(),
            course.status.course_title()
        );
    }
    info!("可选课程: {}/{}", enrollable, report.courses.len());
    info!("{}", "=".repeat(60));
}
