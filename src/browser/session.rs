//! Chromium 渲染会话
//!
//! `ListingSession` 的 chromiumoxide 实现。所有查询都通过 `JsExecutor` 在页面中执行，
//! 等待操作以固定间隔轮询。
//!
//! 网络空闲的判断依赖每个新文档启动前注入的 `NETWORK_TRACKER_SCRIPT`：它统计未完成的
//! `fetch` / `XMLHttpRequest` 请求，并放大 resource timing 缓冲区（默认只有 250 条，写满后
//! 计数不再变化）。图片、样式等子资源在完成前不可见，只能由资源计数的稳定窗口兜底。

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Browser;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::browser::connection::connect_to_browser;
use crate::browser::headless::launch_browser;
use crate::browser::locator_script::locator_script;
use crate::config::Config;
use crate::dom::{DomResult, ListingDom, ListingSession, Locator, SessionLauncher, WaitUntil};
use crate::error::DomError;
use crate::infrastructure::JsExecutor;

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 资源请求数保持不变多久视为网络空闲
const IDLE_WINDOW: Duration = Duration::from_millis(500);

/// 资源计时缓冲区容量
const RESOURCE_BUFFER_SIZE: u32 = 10_000;

/// 在页面脚本之前注入，记录进行中的 fetch / XHR 请求数
const NETWORK_TRACKER_SCRIPT: &str = r#"(() => {
    if (window.__courseWatchPending !== undefined) return;
    window.__courseWatchPending = 0;
    try { performance.setResourceTimingBufferSize(__BUFFER_SIZE__); } catch (_) {}
    const done = () => {
        window.__courseWatchPending = Math.max(0, window.__courseWatchPending - 1);
    };
    if (window.fetch) {
        const fetch = window.fetch;
        window.fetch = function (...args) {
            window.__courseWatchPending += 1;
            return fetch.apply(this, args).finally(done);
        };
    }
    const send = XMLHttpRequest.prototype.send;
    XMLHttpRequest.prototype.send = function (...args) {
        window.__courseWatchPending += 1;
        this.addEventListener('loadend', done, { once: true });
        return send.apply(this, args);
    };
})();"#;

fn network_tracker_script() -> String {
    NETWORK_TRACKER_SCRIPT.replace("__BUFFER_SIZE__", &RESOURCE_BUFFER_SIZE.to_string())
}

#[derive(Debug, Deserialize)]
struct AttributeLookup {
    found: bool,
    value: Option<String>,
}

/// 文本查询结果；页面返回 `null` 时 CDP 不带 value，因此总是返回对象
#[derive(Debug, Deserialize)]
struct TextLookup {
    found: bool,
    text: Option<String>,
}

impl TextLookup {
    fn into_text(self, locator: &Locator) -> DomResult<String> {
        if !self.found {
            return Err(DomError::MissingElement {
                locator: locator.to_string(),
            });
        }
        Ok(self.text.unwrap_or_default())
    }
}

const INNER_TEXT_ACTION: &str = "nodes.length \
    ? { found: true, text: nodes[0].innerText ?? nodes[0].textContent } \
    : { found: false, text: null }";

#[derive(Debug, Deserialize, PartialEq)]
struct NetworkSnapshot {
    ready: bool,
    pending: u64,
    resources: u64,
}

impl NetworkSnapshot {
    fn is_quiet(&self) -> bool {
        self.ready && self.pending == 0
    }
}

/// 基于 Chromium 的渲染会话
pub struct ChromiumSession {
    browser: Browser,
    executor: JsExecutor,
    handler: JoinHandle<()>,
    /// 浏览器由本会话启动时，关闭会话也关闭浏览器；连接模式只关闭页面
    owns_browser: bool,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    async fn poll_attached(&self, locator: &Locator) -> DomResult<()> {
        loop {
            if self.count(locator).await? > 0 {
                return Ok(());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// 页面加载完成、没有进行中的请求，且快照在 `IDLE_WINDOW` 内没有变化
    async fn poll_network_idle(&self) -> DomResult<()> {
        let mut last = self.network_snapshot().await?;
        let mut stable_since = Instant::now();
        loop {
            sleep(POLL_INTERVAL).await;
            let current = self.network_snapshot().await?;
            if current != last {
                last = current;
                stable_since = Instant::now();
            } else if last.is_quiet() && stable_since.elapsed() >= IDLE_WINDOW {
                return Ok(());
            }
        }
    }

    async fn network_snapshot(&self) -> DomResult<NetworkSnapshot> {
        self.executor
            .eval_as(
                r#"({
                    ready: document.readyState === 'complete',
                    pending: window.__courseWatchPending ?? 0,
                    resources: performance.getEntriesByType('resource').length
                })"#,
            )
            .await
    }
}

#[async_trait]
impl ListingDom for ChromiumSession {
    async fn count(&self, locator: &Locator) -> DomResult<usize> {
        self.executor
            .eval_as(locator_script(locator, "nodes.length"))
            .await
    }

    async fn inner_text(&self, locator: &Locator) -> DomResult<String> {
        let lookup: TextLookup = self
            .executor
            .eval_as(locator_script(locator, INNER_TEXT_ACTION))
            .await?;
        lookup.into_text(locator)
    }

    async fn get_attribute(&self, locator: &Locator, name: &str) -> DomResult<Option<String>> {
        let action = format!(
            "nodes.length \
             ? {{ found: true, value: nodes[0].getAttribute({}) }} \
             : {{ found: false, value: null }}",
            serde_json::to_string(name)?
        );
        let lookup: AttributeLookup = self
            .executor
            .eval_as(locator_script(locator, &action))
            .await?;
        if !lookup.found {
            return Err(DomError::MissingElement {
                locator: locator.to_string(),
            });
        }
        Ok(lookup.value)
    }

    async fn click(&self, locator: &Locator) -> DomResult<()> {
        let clicked: bool = self
            .executor
            .eval_as(locator_script(
                locator,
                "nodes.length \
                 ? (nodes[0].scrollIntoView({ block: 'center' }), nodes[0].click(), true) \
                 : false",
            ))
            .await?;
        if !clicked {
            return Err(DomError::MissingElement {
                locator: locator.to_string(),
            });
        }
        debug!("点击: {}", locator);
        Ok(())
    }

    async fn wait_for_attached(&self, locator: &Locator, limit: Duration) -> DomResult<()> {
        match timeout(limit, self.poll_attached(locator)).await {
            Ok(result) => result,
            Err(_) => Err(DomError::Timeout {
                what: locator.to_string(),
                timeout_ms: limit.as_millis() as u64,
            }),
        }
    }

    async fn wait_for_network_idle(&self, limit: Duration) -> DomResult<()> {
        match timeout(limit, self.poll_network_idle()).await {
            Ok(result) => result,
            Err(_) => Err(DomError::Timeout {
                what: "网络空闲".to_string(),
                timeout_ms: limit.as_millis() as u64,
            }),
        }
    }
}

#[async_trait]
impl ListingSession for ChromiumSession {
    async fn navigate(&self, url: &str, wait_until: WaitUntil) -> DomResult<()> {
        match timeout(self.navigation_timeout, self.executor.page().goto(url)).await {
            Ok(result) => {
                result?;
            }
            Err(_) => {
                return Err(DomError::Timeout {
                    what: format!("导航到 {}", url),
                    timeout_ms: self.navigation_timeout.as_millis() as u64,
                })
            }
        }

        if wait_until == WaitUntil::NetworkIdle {
            self.wait_for_network_idle(self.navigation_timeout).await?;
        }
        info!("已导航到: {}", url);
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, limit: Duration) -> DomResult<()> {
        self.wait_for_attached(&Locator::css(selector), limit).await
    }

    async fn close(self: Box<Self>) -> DomResult<()> {
        let ChromiumSession {
            mut browser,
            executor,
            handler,
            owns_browser,
            ..
        } = *self;

        let result = if owns_browser {
            match browser.close().await {
                Ok(_) => browser
                    .wait()
                    .await
                    .map(|_| ())
                    .map_err(|e| DomError::Backend(format!("等待浏览器退出失败: {}", e))),
                Err(e) => Err(e.into()),
            }
        } else {
            executor.into_page().close().await.map_err(DomError::from)
        };

        handler.abort();
        debug!("浏览器会话已关闭");
        result
    }
}

/// Chromium 会话工厂
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    headful: bool,
    chrome_executable: Option<PathBuf>,
    debug_port: Option<u16>,
    navigation_timeout: Duration,
}

impl ChromiumLauncher {
    pub fn from_config(config: &Config) -> Self {
        Self {
            headful: config.headful,
            chrome_executable: config.chrome_executable.as_ref().map(PathBuf::from),
            debug_port: config.browser_debug_port,
            navigation_timeout: Duration::from_millis(config.listing_timeout_ms),
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> DomResult<Box<dyn ListingSession>> {
        let (browser, handler) = match self.debug_port {
            Some(port) => connect_to_browser(port).await,
            None => launch_browser(self.headful, self.chrome_executable.as_deref()).await,
        }
        .map_err(|e| DomError::Backend(format!("{:#}", e)))?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                warn!("创建页面失败: {}", e);
                handler.abort();
                return Err(e.into());
            }
        };

        let tracker = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(network_tracker_script())
            .build()
            .map_err(DomError::Backend)?;
        if let Err(e) = page.evaluate_on_new_document(tracker).await {
            warn!("注入网络跟踪脚本失败，网络空闲只按资源计数判断: {}", e);
        }

        Ok(Box::new(ChromiumSession {
            browser,
            executor: JsExecutor::new(page),
            handler,
            owns_browser: self.debug_port.is_none(),
            navigation_timeout: self.navigation_timeout,
        }))
    }
}
