//! # Timing 模块
//!
//! 过渡时长解析。减弱动效（reduced motion）开启时，时长与延迟均强制为 0。

use std::time::Duration;

/// 生效的过渡时长
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timings {
    /// 过渡时长
    pub duration: Duration,
    /// 启动延迟
    pub delay: Duration,
}

impl Timings {
    /// 解析时长（毫秒）
    pub fn resolve(duration_ms: u64, delay_ms: u64, reduced_motion: bool) -> Self {
        if reduced_motion {
            return Self::default();
        }
        Self {
            duration: Duration::from_millis(duration_ms),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// 过渡从开始到结束的总时长（延迟 + 时长）
    pub fn total(&self) -> Duration {
        self.duration + self.delay
    }

    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }

    pub fn delay_ms(&self) -> u128 {
        self.delay.as_millis()
    }
}
