use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 启动浏览器
///
/// 默认无头模式；`headful` 为 true 时显示窗口，便于观察页面。
pub async fn launch_browser(
    headful: bool,
    chrome_executable: Option<&Path>,
) -> Result<(Browser, JoinHandle<()>)> {
    info!("🚀 启动浏览器 (headful: {})...", headful);

    let mut builder = BrowserConfig::builder().args(vec![
        "--disable-gpu",           // 无头模式下禁用 GPU
        "--no-sandbox",            // 容器内没有沙盒权限
        "--disable-dev-shm-usage", // 防止共享内存不足
    ]);
    builder = if headful {
        builder.with_head()
    } else {
        builder.new_headless_mode()
    };
    if let Some(path) = chrome_executable {
        debug!("浏览器可执行文件: {}", path.display());
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        anyhow::anyhow!("配置浏览器失败: {}", e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        anyhow::anyhow!("启动浏览器失败: {}", e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    Ok((browser, handle))
}
