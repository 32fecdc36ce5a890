//! 把 `Locator` 编译成在页面中执行的 JS

use serde_json::{json, Value as JsonValue};

use crate::dom::{Locator, Step};

/// 生成脚本：先按步骤解析出节点数组 `nodes`，再返回 `action` 表达式的值
///
/// CSS 步骤在每个当前节点下执行 `querySelectorAll` 并按文档顺序去重；
/// 文本步骤匹配折叠空白后的 `textContent`。
pub fn locator_script(locator: &Locator, action: &str) -> String {
    let steps: Vec<JsonValue> = locator
        .steps()
        .iter()
        .map(|step| match step {
            Step::Css(selector) => json!({ "css": selector }),
            Step::HasText(pattern) => json!({ "text": pattern.source() }),
            Step::Nth(index) => json!({ "nth": index }),
        })
        .collect();

    format!(
        r#"
        (() => {{
            const normalize = (text) => (text || '').replace(/\s+/g, ' ').trim();
            const steps = {steps};
            let nodes = [document];
            for (const step of steps) {{
                if (step.css !== undefined) {{
                    const next = [];
                    for (const node of nodes) {{
                        for (const el of node.querySelectorAll(step.css)) {{
                            if (!next.includes(el)) next.push(el);
                        }}
                    }}
                    nodes = next;
                }} else if (step.text !== undefined) {{
                    const re = new RegExp(step.text, 'i');
                    nodes = nodes.filter((el) => re.test(normalize(el.textContent)));
                }} else if (step.nth !== undefined) {{
                    nodes = step.nth < nodes.length ? [nodes[step.nth]] : [];
                }}
            }}
            return {action};
        }})()
        "#,
        steps = JsonValue::Array(steps),
        action = action,
    )
}
