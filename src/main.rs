use anyhow::{Context, Result};
use course_watch::utils::logging;
use course_watch::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 命令行参数为课程编号，如 `31 "COM SCI 32, 33"`
    let courses: Vec<String> = std::env::args().skip(1).collect();

    let app = App::initialize(config)?;
    let report = app.run(&courses).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
