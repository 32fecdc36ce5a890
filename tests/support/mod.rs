//! 测试用的内存检索页
//!
//! 页面由课程夹具渲染成 HTML，再用 scraper 解析和执行选择器。点击带 id 的按钮会改变
//! 渲染状态（展开课程、展开讨论课），可以配置吞掉若干次点击来模拟过渡动画期间的点击。

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use course_watch::dom::{
    DomResult, ListingDom, ListingSession, Locator, SessionLauncher, Step, WaitUntil,
};
use course_watch::{normalize_text, DomError};
use scraper::{ElementRef, Html, Selector};

/// 课程夹具
#[derive(Debug, Clone)]
pub struct CourseFixture {
    pub dom_id: String,
    pub heading: String,
    pub expanded: bool,
    pub primaries: Vec<PrimaryFixture>,
}

impl CourseFixture {
    pub fn new(dom_id: &str, heading: &str) -> Self {
        Self {
            dom_id: dom_id.to_string(),
            heading: heading.to_string(),
            expanded: false,
            primaries: Vec::new(),
        }
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }

    pub fn primary(mut self, primary: PrimaryFixture) -> Self {
        self.primaries.push(primary);
        self
    }

    pub fn title_id(&self) -> String {
        format!("{}-title", self.dom_id)
    }

    pub fn toggle_id(&self, index: usize) -> String {
        format!("{}-toggle-{}", self.dom_id, index)
    }
}

/// 主行夹具
#[derive(Debug, Clone)]
pub struct PrimaryFixture {
    pub row_id: Option<String>,
    pub section: String,
    pub linked: bool,
    pub status: String,
    pub discussions: Vec<(String, String)>,
    pub discussions_shown: bool,
}

impl PrimaryFixture {
    pub fn new(row_id: &str, section: &str, status: &str) -> Self {
        Self {
            row_id: Some(row_id.to_string()),
            section: section.to_string(),
            linked: true,
            status: status.to_string(),
            discussions: Vec::new(),
            discussions_shown: false,
        }
    }

    pub fn without_id(mut self) -> Self {
        self.row_id = None;
        self
    }

    pub fn unlinked(mut self) -> Self {
        self.linked = false;
        self
    }

    pub fn discussion(mut self, section: &str, status: &str) -> Self {
        self.discussions.push((section.to_string(), status.to_string()));
        self
    }

    pub fn shown(mut self) -> Self {
        self.discussions_shown = true;
        self
    }
}

/// 调用记录，会话关闭后仍可检查
#[derive(Debug, Default)]
pub struct FakeLog {
    clicks: Mutex<Vec<String>>,
    waits: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
    closed: AtomicBool,
    launches: AtomicUsize,
}

impl FakeLog {
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn waits(&self) -> Vec<String> {
        self.waits.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct FakeState {
    clicked: HashSet<String>,
    swallowed: HashMap<String, usize>,
}

/// 内存检索页
pub struct FakeListing {
    courses: Vec<CourseFixture>,
    state: Mutex<FakeState>,
    settle_times_out: bool,
    log: Arc<FakeLog>,
}

impl FakeListing {
    pub fn new(courses: Vec<CourseFixture>) -> Self {
        Self {
            courses,
            state: Mutex::new(FakeState::default()),
            settle_times_out: false,
            log: Arc::new(FakeLog::default()),
        }
    }

    /// 前 `times` 次点击该元素没有效果
    pub fn swallow_clicks(self, element_id: &str, times: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .swallowed
            .insert(element_id.to_string(), times);
        self
    }

    /// 网络空闲等待总是超时
    pub fn settle_times_out(mut self) -> Self {
        self.settle_times_out = true;
        self
    }

    pub fn log(&self) -> Arc<FakeLog> {
        Arc::clone(&self.log)
    }

    fn render(&self) -> String {
        let state = self.state.lock().unwrap();
        let mut html = String::from("<html><body><div id=\"resultsTitle\">");

        for course in &self.courses {
            let title_id = course.title_id();
            let expanded = course.expanded || state.clicked.contains(&title_id);
            html.push_str(&format!(
                "<h3 class=\"head\"><button id=\"{}\" aria-expanded=\"{}\">{}</button></h3>",
                title_id, expanded, course.heading
            ));
            html.push_str(&format!("<div id=\"{}\" class=\"primarySection\">", course.dom_id));
            if expanded {
                for (index, primary) in course.primaries.iter().enumerate() {
                    let toggle_id = course.toggle_id(index);
                    let shown = primary.discussions_shown || state.clicked.contains(&toggle_id);
                    html.push_str(&render_primary(primary, &toggle_id, shown));
                }
            }
            html.push_str("</div>");
        }

        html.push_str("</div></body></html>");
        html
    }

    fn resolve<R>(&self, locator: &Locator, f: impl FnOnce(Vec<ElementRef<'_>>) -> R) -> R {
        let html = Html::parse_document(&self.render());
        let mut nodes = vec![html.root_element()];

        for step in locator.steps() {
            nodes = match step {
                Step::Css(selector) => {
                    let selector = Selector::parse(selector).expect("selector should parse");
                    let mut next: Vec<ElementRef<'_>> = Vec::new();
                    for node in &nodes {
                        for element in node.select(&selector) {
                            if !next.iter().any(|seen| seen.id() == element.id()) {
                                next.push(element);
                            }
                        }
                    }
                    next
                }
                Step::HasText(pattern) => nodes
                    .into_iter()
                    .filter(|element| pattern.is_match(&normalize_text(&raw_text(element))))
                    .collect(),
                Step::Nth(index) => nodes.get(*index).copied().into_iter().collect(),
            };
        }

        f(nodes)
    }

    fn missing(locator: &Locator) -> DomError {
        DomError::MissingElement {
            locator: locator.to_string(),
        }
    }
}

fn raw_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

fn render_section(section: &str, linked: bool) -> String {
    if linked {
        format!(
            "<div class=\"cls-section\"><a>{}</a><span class=\"hidden\"> Select </span></div>",
            section
        )
    } else {
        format!("<div class=\"cls-section\">\n  {}\n</div>", section)
    }
}

fn render_status(status: &str) -> String {
    format!("<div class=\"statusColumn\"><p>\n  {}\n</p></div>", status)
}

fn render_primary(primary: &PrimaryFixture, toggle_id: &str, shown: bool) -> String {
    let id_attr = primary
        .row_id
        .as_ref()
        .map(|id| format!(" id=\"{}\"", id))
        .unwrap_or_default();

    let toggle = if primary.discussions.is_empty() {
        String::new()
    } else {
        let icon = if shown { "icon-caret-down" } else { "icon-caret-right" };
        format!(
            "<div class=\"toggle\"><button id=\"{}\"><i class=\"icon {}\"></i></button></div>",
            toggle_id, icon
        )
    };

    let mut html = format!(
        "<div class=\"data_row primary-row\"{}>{}{}{}</div>",
        id_attr,
        toggle,
        render_section(&primary.section, primary.linked),
        render_status(&primary.status)
    );

    if let Some(row_id) = &primary.row_id {
        html.push_str(&format!("<div id=\"{}-children\">", row_id));
        if shown {
            for (section, status) in &primary.discussions {
                html.push_str(&format!(
                    "<div class=\"data_row secondary-row\">{}{}</div>",
                    render_section(section, true),
                    render_status(status)
                ));
            }
        }
        html.push_str("</div>");
    }

    html
}

#[async_trait]
impl ListingDom for FakeListing {
    async fn count(&self, locator: &Locator) -> DomResult<usize> {
        Ok(self.resolve(locator, |nodes| nodes.len()))
    }

    async fn inner_text(&self, locator: &Locator) -> DomResult<String> {
        self.resolve(locator, |nodes| nodes.first().map(raw_text))
            .ok_or_else(|| Self::missing(locator))
    }

    async fn get_attribute(&self, locator: &Locator, name: &str) -> DomResult<Option<String>> {
        self.resolve(locator, |nodes| {
            nodes
                .first()
                .map(|element| element.value().attr(name).map(String::from))
        })
        .ok_or_else(|| Self::missing(locator))
    }

    async fn click(&self, locator: &Locator) -> DomResult<()> {
        let target = self
            .resolve(locator, |nodes| {
                nodes
                    .first()
                    .map(|element| element.value().attr("id").map(String::from))
            })
            .ok_or_else(|| Self::missing(locator))?;

        let Some(element_id) = target else {
            self.log.clicks.lock().unwrap().push("<anonymous>".to_string());
            return Ok(());
        };
        self.log.clicks.lock().unwrap().push(element_id.clone());

        let mut state = self.state.lock().unwrap();
        match state.swallowed.get_mut(&element_id) {
            Some(remaining) if *remaining > 0 => *remaining -= 1,
            _ => {
                state.clicked.insert(element_id);
            }
        }
        Ok(())
    }

    async fn wait_for_attached(&self, locator: &Locator, timeout: Duration) -> DomResult<()> {
        self.log.waits.lock().unwrap().push(locator.to_string());
        if self.resolve(locator, |nodes| nodes.len()) > 0 {
            Ok(())
        } else {
            Err(DomError::Timeout {
                what: locator.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> DomResult<()> {
        self.log.waits.lock().unwrap().push("network-idle".to_string());
        if self.settle_times_out {
            Err(DomError::Timeout {
                what: "network-idle".to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ListingSession for FakeListing {
    async fn navigate(&self, url: &str, _wait_until: WaitUntil) -> DomResult<()> {
        self.log.navigations.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> DomResult<()> {
        self.wait_for_attached(&Locator::css(selector), timeout).await
    }

    async fn close(self: Box<Self>) -> DomResult<()> {
        self.log.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// 只能启动一次的会话工厂
pub struct FakeLauncher {
    listing: Mutex<Option<FakeListing>>,
    log: Arc<FakeLog>,
}

impl FakeLauncher {
    pub fn new(listing: FakeListing) -> Self {
        let log = listing.log();
        Self {
            listing: Mutex::new(Some(listing)),
            log,
        }
    }

    pub fn log(&self) -> Arc<FakeLog> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self) -> DomResult<Box<dyn ListingSession>> {
        self.log.launches.fetch_add(1, Ordering::SeqCst);
        let listing = self.listing.lock().unwrap().take();
        match listing {
            Some(listing) => Ok(Box::new(listing)),
            None => Err(DomError::Backend("fake listing already launched".to_string())),
        }
    }
}

/// 计算机科学检索页的典型片段
pub fn intro_course() -> CourseFixture {
    CourseFixture::new("COMSCI0031", "31 - Introduction to Computer Science I")
        .primary(
            PrimaryFixture::new("187093200", "Lec 1", "Open 5 of 120 Enrolled")
                .discussion("Dis 1A", "Closed Class Full (30)")
                .discussion("Dis 1B", "Wait List Full (30)"),
        )
        .primary(PrimaryFixture::new("187093300", "Lec 2", "Closed Class Full (120)"))
}

/// 编号包含 31 但不应匹配的课程
pub fn compilers_course() -> CourseFixture {
    CourseFixture::new("COMSCI0131", "131 - Programming Languages").primary(PrimaryFixture::new(
        "187453200",
        "Lec 1",
        "Open 10 of 80",
    ))
}

pub fn data_structures_course() -> CourseFixture {
    CourseFixture::new("COMSCI0032", "32 - Introduction to Computer Science II").primary(
        PrimaryFixture::new("187096200", "Lec 1", "Closed Class Full (150)")
            .discussion("Dis 1A", "Open 2 of 25"),
    )
}
