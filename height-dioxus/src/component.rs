//! # Component 模块
//!
//! `AnimateHeight` 组件：把 [`HeightController`] 接到 Dioxus 的渲染与任务系统上。
//!
//! ## 数据流
//!
//! ```text
//! height 变化 ─► use_effect ─► request ─► 测量内容 ─► apply_latest ─► flush ─► revision +1 ─► 重新渲染
//!                                                          │
//!                                                          └─► schedule ─► spawn(帧 / 超时) ─► deliver ─► flush
//! ```
//!
//! 任务的登记与取消由 [`Driver`] 负责，它放在 `Rc<RefCell<_>>` 中；渲染时只读取
//! [`HeightController::render`] 的结果，`revision` signal 是唯一的重新渲染触发源。

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::core::Task;
use dioxus::prelude::*;
use height_runtime::{
    AnimateHeightConfig, AnimationStateClassOverrides, HeightController, HeightInput, HeightSpec,
    InlineStyle, ScheduledTask, TaskKind,
};
use tracing::{debug, trace};

use crate::content::{MeasuredContent, measure_offset_height, next_content_id};
use crate::driver::{Driver, forward};
use crate::timer;

/// 最近一次渲染传入的事件回调
#[derive(Clone, Copy, Default)]
struct Handlers {
    start: Option<EventHandler<HeightSpec>>,
    end: Option<EventHandler<HeightSpec>>,
}

type SharedDriver = Rc<RefCell<Driver<Task>>>;

/// 由组件自己写入外层元素、不接受透传的属性
const MANAGED_ATTRIBUTES: [&str; 4] = ["class", "id", "style", "aria-hidden"];

/// 过滤掉与组件自身写入冲突的透传属性
fn passthrough(attributes: Vec<Attribute>) -> Vec<Attribute> {
    attributes
        .into_iter()
        .filter(|attr| {
            let managed = MANAGED_ATTRIBUTES.contains(&attr.name);
            if managed {
                trace!(name = attr.name, "忽略与组件冲突的透传属性");
            }
            !managed
        })
        .collect()
}

/// 高度过渡容器
///
/// `height` 可以是像素数值、`"auto"` 或百分比字符串。其余参数与
/// [`AnimateHeightConfig`] 的字段一一对应。
#[component]
pub fn AnimateHeight(
    #[props(into)] height: HeightInput,
    #[props(default = 250)] duration: u64,
    #[props(default)] delay: u64,
    #[props(default = String::from("ease"), into)] easing: String,
    #[props(default)] animate_opacity: bool,
    #[props(default = true)] apply_inline_transitions: bool,
    #[props(default)] animation_state_classes: AnimationStateClassOverrides,
    #[props(into)] class: Option<String>,
    #[props(into)] content_class: Option<String>,
    #[props(into)] id: Option<String>,
    #[props(default)] style: InlineStyle,
    aria_hidden: Option<bool>,
    reduced_motion: Option<bool>,
    on_animation_start: Option<EventHandler<HeightSpec>>,
    on_animation_end: Option<EventHandler<HeightSpec>>,
    /// 额外写到外层元素上的属性（`class`、`id`、`style`、`aria-hidden` 除外）
    #[props(default)]
    attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let config = AnimateHeightConfig {
        duration_ms: duration,
        delay_ms: delay,
        easing,
        animate_opacity,
        apply_inline_transitions,
        animation_state_classes,
        class_name: class,
        content_class_name: content_class,
        id,
        style,
        aria_hidden,
        reduced_motion,
    };

    let revision = use_signal(|| 0_u64);
    let content_id = use_hook(next_content_id);
    let content = use_hook(MeasuredContent::default);

    let driver: SharedDriver = use_hook(|| {
        let mut controller = HeightController::new(config.clone(), height.clone());
        controller.mount(Some(Box::new(content.clone())));
        debug!(content_id = %content_id, height = %height, "AnimateHeight 挂载");
        Rc::new(RefCell::new(Driver::new(controller)))
    });
    let handlers = use_hook(|| Rc::new(RefCell::new(Handlers::default())));

    // 每次渲染同步最新的回调与配置
    *handlers.borrow_mut() = Handlers {
        start: on_animation_start,
        end: on_animation_end,
    };
    {
        let mut d = driver.borrow_mut();
        if d.controller().config() != &config {
            d.controller_mut().set_config(config);
        }
    }

    // 未显式指定时，挂载后查询一次环境偏好
    {
        let driver = driver.clone();
        use_effect(move || {
            if reduced_motion.is_some() {
                return;
            }
            let driver = driver.clone();
            spawn(async move {
                if let Some(reduced) = timer::prefers_reduced_motion().await {
                    debug!(reduced, "环境减弱动效偏好");
                    driver.borrow_mut().controller_mut().set_env_reduced_motion(reduced);
                }
            });
        });
    }

    // 高度输入变化
    {
        let driver = driver.clone();
        let handlers = handlers.clone();
        let content = content.clone();
        let content_id = content_id.clone();
        use_effect(use_reactive!(|(height,)| {
            // 回到控制器已接受的值时，只需取消等待中的测量
            if !driver.borrow_mut().request(height) {
                return;
            }

            let runner = driver.clone();
            let handlers = handlers.clone();
            let content = content.clone();
            let content_id = content_id.clone();
            let task = spawn(async move {
                if let Some(px) = measure_offset_height(&content_id).await {
                    content.report_measured(px);
                }
                // 测量期间输入可能又变了，交给控制器的总是最新值
                let scheduled = runner.borrow_mut().apply_latest();
                flush(&runner, &handlers, revision);
                if let Some(scheduled) = scheduled {
                    schedule(runner, handlers, scheduled, revision);
                }
            });
            driver.borrow_mut().begin_measure(task);
        }));
    }

    {
        let driver = driver.clone();
        use_drop(move || {
            driver.borrow_mut().unmount();
            debug!("AnimateHeight 卸载");
        });
    }

    let _revision = revision();
    let model = driver.borrow().controller().render();
    let outer_style = model.outer.style.to_css();
    let content_style = model.content.style.to_css();
    let extra = passthrough(attributes);

    rsx! {
        div {
            class: model.outer.class,
            id: model.outer.id,
            aria_hidden: model.outer.aria_hidden.map(|hidden| hidden.to_string()),
            style: outer_style,
            ..extra,
            div {
                id: content_id,
                class: model.content.class,
                style: content_style,
                onresize: move |event: Event<ResizeData>| {
                    if let Ok(size) = event.get_border_box_size() {
                        content.report_resize(size.height);
                    }
                },
                {children}
            }
        }
    }
}

/// 安排控制器要求的回调
fn schedule(
    driver: SharedDriver,
    handlers: Rc<RefCell<Handlers>>,
    scheduled: ScheduledTask,
    revision: Signal<u64>,
) {
    trace!(ticket = %scheduled.ticket, kind = ?scheduled.kind, "安排回调");

    let runner = driver.clone();
    let task = spawn(async move {
        match scheduled.kind {
            TaskKind::Frame => timer::next_frame().await,
            TaskKind::Timeout(after) => timer::sleep(after).await,
        }
        let next = runner.borrow_mut().deliver(scheduled);
        flush(&runner, &handlers, revision);
        if let Some(next) = next {
            schedule(runner, handlers, next, revision);
        }
    });

    driver.borrow_mut().arm_timer(scheduled.ticket, task);
}

/// 触发重新渲染并转发事件
fn flush(driver: &SharedDriver, handlers: &Rc<RefCell<Handlers>>, mut revision: Signal<u64>) {
    let (events, current) = driver.borrow_mut().take_output();
    if *revision.peek() != current {
        revision.set(current);
    }

    // 回调可能同步修改父组件状态，此时不能持有借用
    let handlers = *handlers.borrow();
    forward(
        events,
        |height| {
            if let Some(handler) = handlers.start {
                handler.call(height);
            }
        },
        |height| {
            if let Some(handler) = handlers.end {
                handler.call(height);
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(attributes: &[Attribute]) -> Vec<&'static str> {
        attributes.iter().map(|attr| attr.name).collect()
    }

    #[test]
    fn test_passthrough_keeps_extra_attributes() {
        let kept = passthrough(vec![
            Attribute::new("data-role", "panel", None, false),
            Attribute::new("role", "region", None, false),
        ]);
        assert_eq!(names(&kept), vec!["data-role", "role"]);
    }

    #[test]
    fn test_passthrough_drops_managed_attributes() {
        let kept = passthrough(vec![
            Attribute::new("class", "other", None, false),
            Attribute::new("style", "height: 10px", None, false),
            Attribute::new("aria-hidden", "true", None, false),
            Attribute::new("id", "x", None, false),
            Attribute::new("title", "面板", None, false),
        ]);
        assert_eq!(names(&kept), vec!["title"]);
    }
}
