//! # Sim 模块
//!
//! 确定性的模拟宿主：虚拟时钟 + 模拟内容元素，用于测试、场景回放与命令行工具。
//!
//! - [`SimulatedHost`]：驱动 `HeightController`，按虚拟时间投递回调并记录时间线
//! - [`Scenario`]：JSON 描述的一组高度变化，可回放为时间线

mod host;
mod scenario;

pub use host::{FRAME_INTERVAL_MS, SimulatedHost, TimelineEntry, TimelineKind};
pub use scenario::{Scenario, ScenarioStep};
