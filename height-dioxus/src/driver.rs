//! # Driver 模块
//!
//! 组件与控制器之间的调度状态：记录最新的高度输入，持有等待中的测量任务和
//! 帧 / 超时任务，并保证同一时刻每类任务至多一个。
//!
//! 与 Dioxus 运行时的唯一耦合是 [`CancelHandle`]，组件里用 [`Task`] 实现。

use dioxus::core::Task;
use height_runtime::{
    HeightController, HeightEvent, HeightInput, HeightSpec, ScheduledTask, TaskKind, TaskTicket,
};
use tracing::trace;

/// 可取消的异步任务句柄
pub trait CancelHandle {
    fn cancel(self);
}

impl CancelHandle for Task {
    fn cancel(self) {
        Task::cancel(self);
    }
}

/// 组件内部的调度状态
pub struct Driver<H: CancelHandle> {
    controller: HeightController,
    /// 最近一次传入的高度
    latest: HeightInput,
    measuring: Option<H>,
    timer: Option<(TaskTicket, H)>,
}

impl<H: CancelHandle> Driver<H> {
    pub fn new(controller: HeightController) -> Self {
        let latest = controller.requested_input().clone();
        Self {
            controller,
            latest,
            measuring: None,
            timer: None,
        }
    }

    pub fn controller(&self) -> &HeightController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut HeightController {
        &mut self.controller
    }

    /// 记录新的高度输入
    ///
    /// 先取消尚未完成的测量，再与控制器已接受的输入比较。
    /// 返回 `true` 表示需要测量后调用 [`Driver::apply_latest`]。
    pub fn request(&mut self, input: HeightInput) -> bool {
        if let Some(previous) = self.measuring.take() {
            trace!(latest = %input, "取消未完成的测量");
            previous.cancel();
        }
        self.latest = input;
        &self.latest != self.controller.requested_input()
    }

    /// 登记测量任务
    pub fn begin_measure(&mut self, handle: H) {
        if let Some(previous) = self.measuring.replace(handle) {
            previous.cancel();
        }
    }

    /// 测量完成：把最新的输入交给控制器
    pub fn apply_latest(&mut self) -> Option<ScheduledTask> {
        self.measuring = None;
        self.controller.set_height(self.latest.clone())
    }

    /// 登记帧 / 超时任务，取消被替换的任务
    pub fn arm_timer(&mut self, ticket: TaskTicket, handle: H) {
        if let Some((previous, handle)) = self.timer.replace((ticket, handle)) {
            trace!(%previous, "取消被替换的回调任务");
            handle.cancel();
        }
    }

    /// 回调任务到期
    pub fn deliver(&mut self, scheduled: ScheduledTask) -> Option<ScheduledTask> {
        if self
            .timer
            .as_ref()
            .is_some_and(|(ticket, _)| *ticket == scheduled.ticket)
        {
            self.timer = None;
        }
        match scheduled.kind {
            TaskKind::Frame => self.controller.on_frame(scheduled.ticket),
            TaskKind::Timeout(_) => {
                self.controller.on_timeout(scheduled.ticket);
                None
            }
        }
    }

    /// 取出待转发的事件与当前修订号
    pub fn take_output(&mut self) -> (Vec<HeightEvent>, u64) {
        (self.controller.drain_events(), self.controller.revision())
    }

    #[cfg(test)]
    pub fn has_pending_measure(&self) -> bool {
        self.measuring.is_some()
    }

    #[cfg(test)]
    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// 卸载：取消全部任务
    pub fn unmount(&mut self) {
        if let Some(handle) = self.measuring.take() {
            handle.cancel();
        }
        if let Some((_, handle)) = self.timer.take() {
            handle.cancel();
        }
        self.controller.unmount();
    }
}

/// 按事件类型分发给开始 / 结束回调
pub fn forward(
    events: Vec<HeightEvent>,
    mut on_start: impl FnMut(HeightSpec),
    mut on_end: impl FnMut(HeightSpec),
) {
    for event in events {
        trace!(?event, "转发高度事件");
        match event {
            HeightEvent::AnimationStart { new_height } => on_start(new_height),
            HeightEvent::AnimationEnd { new_height } => on_end(new_height),
        }
    }
}
