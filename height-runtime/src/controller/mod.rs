//! # Controller 模块
//!
//! 高度过渡状态机。
//!
//! ## 执行模型
//!
//! ```text
//! Host                               HeightController
//!   │── set_height(input) ──────────►│ 规划过渡，提交首个状态
//!   │◄── Option<ScheduledTask> ──────│
//!   │                                 │
//!   │   (下一帧 / 超时后)              │
//!   │── on_frame(ticket) ───────────►│ 仅从 auto 出发时存在
//!   │◄── Option<ScheduledTask> ──────│
//!   │── on_timeout(ticket) ─────────►│ 提交终态
//!   │                                 │
//!   │── drain_events() ─────────────►│ AnimationStart / AnimationEnd
//! ```
//!
//! 控制器不持有计时器，只签发票据（[`TaskTicket`]）。宿主负责按时投递，
//! 过期票据（被新过渡抢占、或组件已卸载）投递时会被静默丢弃。

mod content;
mod engine;
mod state;
mod task;

pub use content::ContentElement;
pub use engine::{HeightController, HEIGHT_PROPERTY};
pub use state::ControllerState;
pub use task::{HeightEvent, ScheduledTask, TaskKind, TaskTicket};
