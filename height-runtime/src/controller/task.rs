//! # Task 模块
//!
//! 控制器向宿主请求的延迟回调，以及对外发出的事件。

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::height::HeightSpec;

/// 延迟回调票据
///
/// `generation` 标识签发它的过渡；同一过渡内 `id` 递增。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TaskTicket {
    pub generation: u64,
    pub id: u64,
}

impl fmt::Display for TaskTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.generation, self.id)
    }
}

/// 回调类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "after_ms", rename_all = "snake_case")]
pub enum TaskKind {
    /// 下一动画帧
    Frame,
    /// 指定时长之后
    #[serde(serialize_with = "serialize_millis")]
    Timeout(Duration),
}

/// 待宿主安排的回调
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledTask {
    pub ticket: TaskTicket,
    pub kind: TaskKind,
}

impl ScheduledTask {
    pub fn frame(ticket: TaskTicket) -> Self {
        Self {
            ticket,
            kind: TaskKind::Frame,
        }
    }

    pub fn timeout(ticket: TaskTicket, after: Duration) -> Self {
        Self {
            ticket,
            kind: TaskKind::Timeout(after),
        }
    }
}

/// 控制器事件
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeightEvent {
    /// 过渡开始；`new_height` 为实际动画到的高度
    AnimationStart { new_height: HeightSpec },
    /// 过渡结束；`new_height` 为稳定后的高度
    AnimationEnd { new_height: HeightSpec },
}

impl HeightEvent {
    pub fn new_height(&self) -> HeightSpec {
        match self {
            Self::AnimationStart { new_height } | Self::AnimationEnd { new_height } => *new_height,
        }
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
