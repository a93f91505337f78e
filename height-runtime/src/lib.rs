//! # Height Runtime
//!
//! 高度过渡组件的纯逻辑核心，不依赖任何 UI 框架或 IO。
//!
//! ## 架构概述
//!
//! 组件在固定高度与内容自然高度（`auto`）之间做过渡动画，由声明式的高度输入驱动。
//! 宿主（Dioxus 组件、模拟宿主）与控制器之间通过 **票据驱动模式** 通信：
//!
//! ```text
//! Host                              HeightController
//!   │──── set_height(input) ──────►│
//!   │◄─── Option<ScheduledTask> ───│
//!   │                               │
//!   │──── on_frame / on_timeout ──►│  (票据过期则丢弃)
//!   │                               │
//!   │──── render() ───────────────►│
//!   │◄─── RenderModel ─────────────│
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! use height_runtime::{AnimateHeightConfig, HeightController, TaskKind};
//!
//! let mut controller = HeightController::new(AnimateHeightConfig::default(), "auto".into());
//! controller.mount(Some(Box::new(content)));
//!
//! if let Some(task) = controller.set_height(0.0.into()) {
//!     match task.kind {
//!         TaskKind::Frame => request_animation_frame(task.ticket),
//!         TaskKind::Timeout(after) => set_timeout(task.ticket, after),
//!     }
//! }
//!
//! let model = controller.render();
//! ```
//!
//! ## 模块结构
//!
//! - [`height`]：HeightInput / HeightSpec，解析与校验
//! - [`classes`]：动画阶段与状态类名
//! - [`timing`]：时长解析（含减弱动效）
//! - [`config`]：组件配置
//! - [`style`]：渲染描述（样式、类名、aria-hidden）
//! - [`controller`]：过渡状态机
//! - [`sim`]：模拟宿主与场景回放
//! - [`error`]：错误类型定义

pub mod classes;
pub mod config;
pub mod controller;
pub mod error;
pub mod height;
pub mod sim;
pub mod style;
pub mod timing;

// 重导出核心类型
pub use classes::{
    AnimationFlags, AnimationStateClassOverrides, AnimationStateClasses, StateClass,
    TerminalHeight, classify_static, classify_transition,
};
pub use config::AnimateHeightConfig;
pub use controller::{
    ContentElement, ControllerState, HEIGHT_PROPERTY, HeightController, HeightEvent,
    ScheduledTask, TaskKind, TaskTicket,
};
pub use error::{HeightError, LoadError, LoadResult};
pub use height::{HeightInput, HeightSpec, Overflow, ParsedHeight, parse_height, validate_height};
pub use sim::{FRAME_INTERVAL_MS, Scenario, ScenarioStep, SimulatedHost, TimelineEntry, TimelineKind};
pub use style::{ElementModel, InlineStyle, RenderModel};
pub use timing::Timings;
