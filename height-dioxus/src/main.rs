//! AnimateHeight 演示
//!
//! 一个手风琴面板和一个可切换目标高度的面板，事件记录在页面底部。

use dioxus::prelude::*;
use height_dioxus::{AnimateHeight, HeightInput, HeightSpec, InlineStyle};
use tracing::{Level, info};

const SECTIONS: [(&str, &str); 3] = [
    (
        "什么是 auto 高度？",
        "内容的自然高度。过渡到 auto 时先动画到测得的像素高度，结束后再切换为 auto。",
    ),
    (
        "收起后内容去哪了？",
        "高度为 0 且动画结束后，内容被设置为 display: none，不再能被 Tab 聚焦。",
    ),
    (
        "减弱动效",
        "系统开启减弱动效时，时长与延迟都按 0 处理，回调照常触发。",
    ),
];

const TARGETS: [(&str, &str); 4] = [("0", "0"), ("80px", "80"), ("50%", "50%"), ("auto", "auto")];

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();
    info!("启动 AnimateHeight 演示");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let mut log = use_signal(Vec::<String>::new);
    let mut record = move |line: String| {
        let mut entries = log.write();
        entries.push(line);
        if entries.len() > 12 {
            entries.remove(0);
        }
    };

    rsx! {
        div { style: "font-family: sans-serif; max-width: 560px; margin: 24px auto;",
            h2 { "手风琴" }
            for (index, (title, body)) in SECTIONS.iter().enumerate() {
                AccordionItem {
                    key: "{index}",
                    title: title.to_string(),
                    body: body.to_string(),
                    on_end: move |height: HeightSpec| record(format!("面板 {index} 结束于 {height}")),
                }
            }

            h2 { "目标高度" }
            TargetPanel { on_event: move |line: String| record(line) }

            h3 { "事件" }
            ul {
                for (index, line) in log.read().iter().enumerate() {
                    li { key: "{index}", "{line}" }
                }
            }
        }
    }
}

#[component]
fn AccordionItem(title: String, body: String, on_end: EventHandler<HeightSpec>) -> Element {
    let mut open = use_signal(|| false);
    let height = if open() { HeightInput::auto() } else { HeightInput::from(0.0) };

    rsx! {
        div { style: "border-bottom: 1px solid #ddd;",
            button {
                style: "width: 100%; text-align: left; padding: 12px; background: none; border: none;",
                aria_expanded: open().to_string(),
                onclick: move |_| open.toggle(),
                "{title}"
            }
            AnimateHeight {
                height,
                duration: 300,
                animate_opacity: true,
                on_animation_end: move |height| on_end.call(height),
                p { style: "margin: 0; padding: 0 12px 12px;", "{body}" }
            }
        }
    }
}

#[component]
fn TargetPanel(on_event: EventHandler<String>) -> Element {
    let mut target = use_signal(|| HeightInput::from("auto"));
    let style = InlineStyle::new().with("background", "#f4f4f4");

    rsx! {
        div { style: "margin-bottom: 8px;",
            for (label, value) in TARGETS {
                button {
                    key: "{label}",
                    style: "margin-right: 6px;",
                    onclick: move |_| target.set(parse_target(value)),
                    "{label}"
                }
            }
        }
        div { style: "height: 200px; border: 1px dashed #aaa;",
            AnimateHeight {
                height: target(),
                duration: 500,
                delay: 50,
                easing: "ease-in-out",
                style,
                class: "target-panel",
                attributes: vec![Attribute::new("role", "region", None, false)],
                on_animation_start: move |height| on_event.call(format!("开始 → {height}")),
                on_animation_end: move |height| on_event.call(format!("结束 → {height}")),
                for line in 1..=6 {
                    p { key: "{line}", style: "margin: 0; padding: 4px 8px;", "第 {line} 行" }
                }
            }
        }
    }
}

/// 按钮值：纯数字按像素处理
fn parse_target(value: &str) -> HeightInput {
    value
        .parse::<f64>()
        .map(HeightInput::from)
        .unwrap_or_else(|_| HeightInput::from(value))
}
