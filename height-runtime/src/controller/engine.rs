//! # Engine 模块
//!
//! `HeightController`：一个实例只管理一个元素的高度过渡。
//!
//! ## 过渡规划
//!
//! ```text
//! 单阶段（当前渲染高度不是 auto）
//!   set_height   提交 {目标, 开启 transition, animating 类}，发出 AnimationStart
//!   on_timeout   提交 {终态高度, 关闭 transition, static 类}，发出 AnimationEnd
//!
//! 两阶段（当前渲染高度是 auto，无法从 auto 插值）
//!   set_height   提交 {测得高度, 关闭 transition}（瞬时跳变）
//!   on_frame     提交 {目标, 开启 transition}，发出 AnimationStart
//!   on_timeout   提交 {static 类, 关闭 transition}，发出 AnimationEnd
//! ```

use tracing::{debug, trace, warn};

use super::content::ContentElement;
use super::state::ControllerState;
use super::task::{HeightEvent, ScheduledTask, TaskTicket};
use crate::classes::{AnimationStateClasses, classify_static, classify_transition};
use crate::config::AnimateHeightConfig;
use crate::height::{HeightInput, HeightSpec, Overflow, parse_height, validate_height};
use crate::style::{RenderModel, render_model};
use crate::timing::Timings;

/// 校验提示中使用的属性名
pub const HEIGHT_PROPERTY: &str = "height";

/// 进行中的过渡
#[derive(Debug, Clone, Copy)]
struct InFlight {
    /// 等待中的帧回调（仅两阶段）
    frame: Option<TaskTicket>,
    /// 等待中的结束回调
    timeout: Option<TaskTicket>,
    /// 动画到的高度
    animated_target: HeightSpec,
    /// 结束后稳定的高度
    settled: HeightSpec,
    /// 结束后的 overflow
    settled_overflow: Overflow,
}

/// 高度过渡控制器
pub struct HeightController {
    /// 组件配置
    config: AnimateHeightConfig,
    /// 合并后的类名表
    classes: AnimationStateClasses,
    /// 宿主探测到的减弱动效偏好
    env_reduced_motion: bool,
    /// 上一次收到的原始输入（用于变化检测）
    requested_input: HeightInput,
    /// 上一次请求的高度
    requested: HeightSpec,
    /// 当前渲染状态
    state: ControllerState,
    /// 内容元素句柄（仅挂载期间存在）
    content: Option<Box<dyn ContentElement>>,
    /// 内容是否已被隐藏
    content_hidden: bool,
    /// 是否已挂载
    mounted: bool,
    /// 进行中的过渡
    in_flight: Option<InFlight>,
    /// 过渡代数（每次规划或取消时递增）
    generation: u64,
    /// 下一个票据 ID
    next_ticket: u64,
    /// 状态提交次数
    revision: u64,
    /// 待处理的事件队列
    events: Vec<HeightEvent>,
}

impl std::fmt::Debug for HeightController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightController")
            .field("requested", &self.requested)
            .field("state", &self.state)
            .field("content_hidden", &self.content_hidden)
            .field("mounted", &self.mounted)
            .field("in_flight", &self.in_flight.is_some())
            .finish()
    }
}

impl HeightController {
    /// 创建控制器
    ///
    /// 状态由初始高度同步初始化，首次挂载不产生动画。
    pub fn new(config: AnimateHeightConfig, initial: HeightInput) -> Self {
        report_invalid(&initial);
        let parsed = parse_height(&initial);
        let classes = config.state_classes();

        Self {
            config,
            classes,
            env_reduced_motion: false,
            requested_input: initial,
            requested: parsed.spec,
            state: ControllerState::settled(parsed),
            content: None,
            content_hidden: false,
            mounted: false,
            in_flight: None,
            generation: 0,
            next_ticket: 0,
            revision: 0,
            events: Vec::new(),
        }
    }

    /// 挂载
    ///
    /// `content` 为 `None` 时（无真实布局的环境）跳过隐藏优化与测量。
    pub fn mount(&mut self, content: Option<Box<dyn ContentElement>>) {
        self.content = content;
        self.mounted = true;
        if self.state.rendered_height.is_zero() {
            self.hide_content();
        }
    }

    /// 卸载：取消所有待执行回调并释放内容句柄
    ///
    /// 隐藏标志属于被释放的元素，一并清除；重新挂载时按当前高度重新决定。
    pub fn unmount(&mut self) {
        self.cancel_pending();
        self.content = None;
        self.content_hidden = false;
        self.mounted = false;
    }

    /// 更新配置（不触发过渡）
    pub fn set_config(&mut self, config: AnimateHeightConfig) {
        self.classes = config.state_classes();
        self.config = config;
    }

    /// 设置宿主探测到的减弱动效偏好
    pub fn set_env_reduced_motion(&mut self, reduced: bool) {
        self.env_reduced_motion = reduced;
    }

    /// 高度输入变化
    ///
    /// 输入与上次相同时不做任何事。返回需要宿主安排的回调。
    pub fn set_height(&mut self, input: HeightInput) -> Option<ScheduledTask> {
        if input == self.requested_input {
            return None;
        }

        report_invalid(&input);
        let parsed = parse_height(&input);
        let previous = self.requested;
        let next = parsed.spec;
        self.requested_input = input;
        self.requested = next;

        if !self.mounted {
            // 未挂载时没有可动画的元素，直接落到终态
            self.cancel_pending();
            self.commit(ControllerState::settled(parsed));
            return None;
        }

        let start = self.state.rendered_height;
        if start.is_auto() && next.is_auto() {
            debug!("auto → auto，无需过渡");
            return None;
        }

        // 隐藏的元素测不出高度，必须先恢复
        self.reveal_content();
        let measured = self.measure_content();

        self.cancel_pending();

        let (animated_target, settled, settled_overflow) = if next.is_auto() {
            // CSS 无法直接过渡到 auto：先动画到测得高度，结束后再切换为 auto
            (HeightSpec::px(measured), HeightSpec::Auto, Overflow::Inherit)
        } else {
            (next, next, Overflow::Hidden)
        };
        let state_class = classify_transition(&previous, &next, &settled);
        let two_phase = start.is_auto();
        let timings = self.timings();

        debug!(
            from = %start,
            to = %next,
            measured,
            two_phase,
            total_ms = timings.total().as_millis(),
            "开始高度过渡"
        );

        let mut flight = InFlight {
            frame: None,
            timeout: None,
            animated_target,
            settled,
            settled_overflow,
        };

        if two_phase {
            // 先以测得高度跳变（不带 transition），下一帧再开始真正的动画
            self.commit(ControllerState {
                state_class,
                rendered_height: HeightSpec::px(measured),
                overflow: Overflow::Hidden,
                transitions_enabled: false,
            });
            let ticket = self.issue_ticket();
            flight.frame = Some(ticket);
            self.in_flight = Some(flight);
            Some(ScheduledTask::frame(ticket))
        } else {
            self.commit(ControllerState {
                state_class,
                rendered_height: animated_target,
                overflow: Overflow::Hidden,
                transitions_enabled: true,
            });
            self.events.push(HeightEvent::AnimationStart {
                new_height: animated_target,
            });
            let ticket = self.issue_ticket();
            flight.timeout = Some(ticket);
            self.in_flight = Some(flight);
            Some(ScheduledTask::timeout(ticket, timings.total()))
        }
    }

    /// 帧回调（两阶段过渡的第二步）
    pub fn on_frame(&mut self, ticket: TaskTicket) -> Option<ScheduledTask> {
        let Some(flight) = self.in_flight.filter(|f| f.frame == Some(ticket)) else {
            trace!(%ticket, "丢弃过期的帧回调");
            return None;
        };

        let target = flight.animated_target;
        self.commit(ControllerState {
            rendered_height: target,
            transitions_enabled: true,
            ..self.state
        });
        self.events.push(HeightEvent::AnimationStart { new_height: target });

        // 结束时间从这一帧起算
        let timeout = self.issue_ticket();
        self.in_flight = Some(InFlight {
            frame: None,
            timeout: Some(timeout),
            ..flight
        });
        Some(ScheduledTask::timeout(timeout, self.timings().total()))
    }

    /// 结束回调
    pub fn on_timeout(&mut self, ticket: TaskTicket) {
        let Some(flight) = self.in_flight.filter(|f| f.timeout == Some(ticket)) else {
            trace!(%ticket, "丢弃过期的结束回调");
            return;
        };
        self.in_flight = None;

        let settled = flight.settled;
        self.commit(ControllerState {
            state_class: classify_static(&settled),
            rendered_height: settled,
            overflow: flight.settled_overflow,
            transitions_enabled: false,
        });

        // 收起动画结束后才隐藏内容
        if settled.is_zero() {
            self.hide_content();
        }
        debug!(height = %settled, "高度过渡结束");
        self.events.push(HeightEvent::AnimationEnd { new_height: settled });
    }

    /// 取出并清空事件队列
    pub fn drain_events(&mut self) -> Vec<HeightEvent> {
        std::mem::take(&mut self.events)
    }

    /// 生成当前的渲染描述
    pub fn render(&self) -> RenderModel {
        render_model(
            &self.state,
            self.content_hidden,
            &self.config,
            &self.classes,
            self.timings(),
        )
    }

    /// 生效的时长
    pub fn timings(&self) -> Timings {
        self.config.timings(self.env_reduced_motion)
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn config(&self) -> &AnimateHeightConfig {
        &self.config
    }

    /// 最近一次收到的原始输入
    pub fn requested_input(&self) -> &HeightInput {
        &self.requested_input
    }

    pub fn content_hidden(&self) -> bool {
        self.content_hidden
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// 是否有过渡在进行
    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 状态提交次数
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// 当前有效的票据
    pub fn pending_tickets(&self) -> Vec<TaskTicket> {
        self.in_flight
            .map(|f| f.frame.into_iter().chain(f.timeout).collect())
            .unwrap_or_default()
    }

    fn commit(&mut self, state: ControllerState) {
        self.state = state;
        self.revision += 1;
    }

    fn issue_ticket(&mut self) -> TaskTicket {
        self.next_ticket += 1;
        TaskTicket {
            generation: self.generation,
            id: self.next_ticket,
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            trace!(
                frame = ?flight.frame,
                timeout = ?flight.timeout,
                "取消进行中的过渡"
            );
        }
        self.generation += 1;
    }

    fn measure_content(&mut self) -> f64 {
        let Some(content) = self.content.as_mut() else {
            return 0.0;
        };
        content.set_overflow_hidden(true);
        let height = content.offset_height();
        content.set_overflow_hidden(false);
        height
    }

    fn hide_content(&mut self) {
        if let Some(content) = self.content.as_mut() {
            content.set_display_hidden(true);
            self.content_hidden = true;
        }
    }

    fn reveal_content(&mut self) {
        if !self.content_hidden {
            return;
        }
        if let Some(content) = self.content.as_mut() {
            content.set_display_hidden(false);
        }
        self.content_hidden = false;
    }
}

fn report_invalid(input: &HeightInput) {
    if let Err(e) = validate_height(input, HEIGHT_PROPERTY) {
        warn!(error = %e, "高度输入无效");
    }
}
