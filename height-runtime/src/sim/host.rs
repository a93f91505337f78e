//! # Host 模块
//!
//! 模拟宿主。
//!
//! ## 投递规则
//!
//! - 帧回调在安排后 [`FRAME_INTERVAL_MS`] 毫秒投递
//! - 超时回调在 `now + 时长` 投递；时长为 0 时也要等到下一次 `advance` /
//!   `run_until_idle`，不会在安排它的调用内同步执行
//! - 卸载后队列中的回调照常投递，由控制器按票据丢弃

use std::cell::Cell;
use std::fmt::Write as _;
use std::rc::Rc;

use serde::Serialize;

use crate::config::AnimateHeightConfig;
use crate::controller::{
    ContentElement, ControllerState, HeightController, HeightEvent, ScheduledTask, TaskKind,
};
use crate::height::{HeightInput, Overflow};

/// 模拟的帧间隔（毫秒）
pub const FRAME_INTERVAL_MS: u64 = 16;

/// 迭代上限，防止回调互相安排导致死循环
const MAX_DELIVERIES: usize = 10_000;

/// 模拟内容元素
///
/// 被隐藏（display: none）时测得高度为 0，与真实布局一致。
struct SimContent {
    natural_height: Rc<Cell<f64>>,
    display_hidden: Rc<Cell<bool>>,
    overflow_hidden: Rc<Cell<bool>>,
}

impl ContentElement for SimContent {
    fn offset_height(&self) -> f64 {
        if self.display_hidden.get() {
            0.0
        } else {
            self.natural_height.get()
        }
    }

    fn set_overflow_hidden(&mut self, hidden: bool) {
        self.overflow_hidden.set(hidden);
    }

    fn set_display_hidden(&mut self, hidden: bool) {
        self.display_hidden.set(hidden);
    }
}

/// 时间线条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: TimelineKind,
}

/// 时间线条目类型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineKind {
    /// 状态提交
    Commit { state: ControllerState },
    /// 控制器事件
    Event { event: HeightEvent },
    /// 内容隐藏标志变化
    Content { hidden: bool },
    /// 安排了回调
    Scheduled { task: ScheduledTask },
    /// 卸载
    Unmounted,
}

/// 排队中的回调
#[derive(Debug, Clone, Copy)]
struct Queued {
    due_ms: u64,
    seq: u64,
    task: ScheduledTask,
}

/// 模拟宿主
pub struct SimulatedHost {
    controller: HeightController,
    natural_height: Rc<Cell<f64>>,
    display_hidden: Rc<Cell<bool>>,
    now_ms: u64,
    queue: Vec<Queued>,
    next_seq: u64,
    timeline: Vec<TimelineEntry>,
    seen_revision: u64,
    seen_hidden: bool,
}

impl SimulatedHost {
    /// 创建并挂载
    pub fn new(config: AnimateHeightConfig, initial: HeightInput, natural_height: f64) -> Self {
        let natural_height = Rc::new(Cell::new(natural_height));
        let display_hidden = Rc::new(Cell::new(false));
        let content = SimContent {
            natural_height: natural_height.clone(),
            display_hidden: display_hidden.clone(),
            overflow_hidden: Rc::new(Cell::new(false)),
        };

        let mut controller = HeightController::new(config, initial);
        controller.mount(Some(Box::new(content)));

        let mut host = Self {
            controller,
            natural_height,
            display_hidden,
            now_ms: 0,
            queue: Vec::new(),
            next_seq: 0,
            timeline: Vec::new(),
            seen_revision: 0,
            seen_hidden: false,
        };
        host.record();
        host
    }

    /// 设置环境的减弱动效偏好
    pub fn with_env_reduced_motion(mut self, reduced: bool) -> Self {
        self.controller.set_env_reduced_motion(reduced);
        self
    }

    /// 修改内容的自然高度
    pub fn set_content_height(&mut self, px: f64) {
        self.natural_height.set(px);
    }

    /// 改变高度输入
    pub fn set_height(&mut self, input: impl Into<HeightInput>) {
        let task = self.controller.set_height(input.into());
        self.record();
        if let Some(task) = task {
            self.enqueue(task);
        }
    }

    /// 卸载控制器（队列保留，用于验证过期回调被丢弃）
    pub fn unmount(&mut self) {
        self.controller.unmount();
        self.push(TimelineKind::Unmounted);
        self.record();
    }

    /// 推进虚拟时间，投递到期的回调
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms.saturating_add(ms);
        for _ in 0..MAX_DELIVERIES {
            let Some(next) = self.pop_due(target) else {
                break;
            };
            self.now_ms = next.due_ms;
            self.deliver(next.task);
        }
        self.now_ms = target;
    }

    /// 投递所有回调直到队列为空
    pub fn run_until_idle(&mut self) {
        for _ in 0..MAX_DELIVERIES {
            let Some(next) = self.pop_due(u64::MAX) else {
                break;
            };
            self.now_ms = self.now_ms.max(next.due_ms);
            self.deliver(next.task);
        }
    }

    pub fn controller(&self) -> &HeightController {
        &self.controller
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// 内容当前是否处于 display: none
    pub fn content_display_hidden(&self) -> bool {
        self.display_hidden.get()
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    /// 所有状态提交（时间, 状态）
    pub fn commits(&self) -> Vec<(u64, ControllerState)> {
        self.timeline
            .iter()
            .filter_map(|entry| match &entry.kind {
                TimelineKind::Commit { state } => Some((entry.at_ms, *state)),
                _ => None,
            })
            .collect()
    }

    /// 所有事件（时间, 事件）
    pub fn events(&self) -> Vec<(u64, HeightEvent)> {
        self.timeline
            .iter()
            .filter_map(|entry| match &entry.kind {
                TimelineKind::Event { event } => Some((entry.at_ms, *event)),
                _ => None,
            })
            .collect()
    }

    /// 队列中尚未投递的回调数
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// 时间线的文本形式
    pub fn render_timeline(&self) -> String {
        let classes = self.controller.config().state_classes();
        let mut out = String::new();
        for entry in &self.timeline {
            let _ = write!(out, "[{:>5}ms] ", entry.at_ms);
            let _ = match &entry.kind {
                TimelineKind::Commit { state } => writeln!(
                    out,
                    "commit    height={} overflow={} transitions={} class=\"{}\"",
                    state.rendered_height,
                    match state.overflow {
                        Overflow::Hidden => "hidden",
                        Overflow::Inherit => "inherit",
                    },
                    if state.transitions_enabled { "on" } else { "off" },
                    state.state_class.tokens(&classes)
                ),
                TimelineKind::Event { event } => match event {
                    HeightEvent::AnimationStart { new_height } => {
                        writeln!(out, "start     new_height={new_height}")
                    }
                    HeightEvent::AnimationEnd { new_height } => {
                        writeln!(out, "end       new_height={new_height}")
                    }
                },
                TimelineKind::Content { hidden } => {
                    writeln!(out, "content   {}", if *hidden { "hidden" } else { "visible" })
                }
                TimelineKind::Scheduled { task } => match task.kind {
                    TaskKind::Frame => writeln!(out, "schedule  frame {}", task.ticket),
                    TaskKind::Timeout(after) => writeln!(
                        out,
                        "schedule  timeout {} after {}ms",
                        task.ticket,
                        after.as_millis()
                    ),
                },
                TimelineKind::Unmounted => writeln!(out, "unmount"),
            };
        }
        out
    }

    fn deliver(&mut self, task: ScheduledTask) {
        match task.kind {
            TaskKind::Frame => {
                let next = self.controller.on_frame(task.ticket);
                self.record();
                if let Some(next) = next {
                    self.enqueue(next);
                }
            }
            TaskKind::Timeout(_) => {
                self.controller.on_timeout(task.ticket);
                self.record();
            }
        }
    }

    fn enqueue(&mut self, task: ScheduledTask) {
        let delay = match task.kind {
            TaskKind::Frame => FRAME_INTERVAL_MS,
            TaskKind::Timeout(after) => u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        };
        self.next_seq += 1;
        self.queue.push(Queued {
            due_ms: self.now_ms.saturating_add(delay),
            seq: self.next_seq,
            task,
        });
        self.push(TimelineKind::Scheduled { task });
    }

    fn pop_due(&mut self, limit_ms: u64) -> Option<Queued> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, q)| q.due_ms <= limit_ms)
            .min_by_key(|(_, q)| (q.due_ms, q.seq))
            .map(|(i, _)| i)?;
        Some(self.queue.remove(index))
    }

    /// 对比控制器的最新状态，补记时间线
    fn record(&mut self) {
        let revision = self.controller.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            let state = *self.controller.state();
            self.push(TimelineKind::Commit { state });
        }

        let hidden = self.display_hidden.get();
        if hidden != self.seen_hidden {
            self.seen_hidden = hidden;
            self.push(TimelineKind::Content { hidden });
        }

        for event in self.controller.drain_events() {
            self.push(TimelineKind::Event { event });
        }
    }

    fn push(&mut self, kind: TimelineKind) {
        self.timeline.push(TimelineEntry {
            at_ms: self.now_ms,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::height::HeightSpec;

    #[test]
    fn test_frame_then_timeout_ordering() {
        let mut host = SimulatedHost::new(AnimateHeightConfig::default(), "auto".into(), 90.0);
        host.set_height(30.0);
        host.run_until_idle();

        let events = host.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, FRAME_INTERVAL_MS);
        assert_eq!(events[1].0, FRAME_INTERVAL_MS + 250);
        assert_eq!(host.controller().state().rendered_height, HeightSpec::Fixed(30.0));
    }

    #[test]
    fn test_advance_stops_at_target() {
        let mut host = SimulatedHost::new(AnimateHeightConfig::default(), 100.0.into(), 90.0);
        host.set_height(0.0);
        host.advance(249);
        assert!(host.controller().is_animating());
        host.advance(1);
        assert!(!host.controller().is_animating());
        assert_eq!(host.now_ms(), 250);
    }

    #[test]
    fn test_render_timeline() {
        let mut host = SimulatedHost::new(AnimateHeightConfig::default(), 100.0.into(), 90.0);
        host.set_height(0.0);
        host.run_until_idle();
        insta::assert_snapshot!(host.render_timeline(), @r#"
        [    0ms] commit    height=0px overflow=hidden transitions=on class="rah-animating rah-animating--up rah-animating--to-height-zero"
        [    0ms] start     new_height=0px
        [    0ms] schedule  timeout #1.1 after 250ms
        [  250ms] commit    height=0px overflow=hidden transitions=off class="rah-static rah-static--height-zero"
        [  250ms] content   hidden
        [  250ms] end       new_height=0px
        "#);
    }

    #[test]
    fn test_huge_duration_saturates() {
        let config = AnimateHeightConfig {
            duration_ms: u64::MAX,
            delay_ms: u64::MAX,
            ..AnimateHeightConfig::default()
        };
        let mut host = SimulatedHost::new(config, 100.0.into(), 90.0);
        host.set_height(0.0);
        host.advance(u64::MAX);
        assert_eq!(host.now_ms(), u64::MAX);
        host.advance(1);
        assert_eq!(host.now_ms(), u64::MAX);
        host.run_until_idle();
        assert!(!host.controller().is_animating());
        assert_eq!(host.controller().state().rendered_height, HeightSpec::ZERO);
    }
}
