//! # Scenario 模块
//!
//! JSON 描述的高度变化序列。
//!
//! ```json
//! {
//!   "config": { "duration_ms": 300 },
//!   "initial": "auto",
//!   "content_height": 80,
//!   "steps": [
//!     { "at_ms": 0, "height": 0 },
//!     { "at_ms": 120, "height": "auto" },
//!     { "at_ms": 500, "content_height": 140 }
//!   ],
//!   "run_until_ms": 1200
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::host::SimulatedHost;
use crate::config::AnimateHeightConfig;
use crate::error::{LoadError, LoadResult};
use crate::height::HeightInput;

/// 回放场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 组件配置
    #[serde(default)]
    pub config: AnimateHeightConfig,

    /// 初始高度
    pub initial: HeightInput,

    /// 内容的自然高度（像素）
    #[serde(default)]
    pub content_height: f64,

    /// 模拟环境的减弱动效偏好
    #[serde(default)]
    pub env_reduced_motion: bool,

    /// 按时间排列的操作
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,

    /// 回放结束时间；缺省时一直运行到没有待投递的回调
    #[serde(default)]
    pub run_until_ms: Option<u64>,
}

/// 单个操作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// 执行时间（毫秒）
    pub at_ms: u64,

    /// 新的高度输入
    #[serde(default)]
    pub height: Option<HeightInput>,

    /// 新的内容自然高度
    #[serde(default)]
    pub content_height: Option<f64>,

    /// 是否卸载
    #[serde(default)]
    pub unmount: bool,
}

impl Scenario {
    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// 从文件加载
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// 校验步骤
    pub fn validate(&self) -> LoadResult<()> {
        let mut last = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_ms < last {
                return Err(invalid(format!(
                    "第 {index} 步的时间 {}ms 早于上一步的 {last}ms",
                    step.at_ms
                )));
            }
            if step.height.is_none() && step.content_height.is_none() && !step.unmount {
                return Err(invalid(format!("第 {index} 步没有任何操作")));
            }
            last = step.at_ms;
        }
        if let Some(until) = self.run_until_ms
            && until < last
        {
            return Err(invalid(format!(
                "run_until_ms ({until}ms) 早于最后一步 ({last}ms)"
            )));
        }
        Ok(())
    }

    /// 回放，返回回放后的模拟宿主
    pub fn run(&self) -> SimulatedHost {
        let mut host = SimulatedHost::new(
            self.config.clone(),
            self.initial.clone(),
            self.content_height,
        )
        .with_env_reduced_motion(self.env_reduced_motion);

        for step in &self.steps {
            host.advance(step.at_ms.saturating_sub(host.now_ms()));
            if let Some(px) = step.content_height {
                host.set_content_height(px);
            }
            if let Some(height) = &step.height {
                host.set_height(height.clone());
            }
            if step.unmount {
                host.unmount();
            }
        }

        match self.run_until_ms {
            Some(until) => host.advance(until.saturating_sub(host.now_ms())),
            None => host.run_until_idle(),
        }
        host
    }
}

fn invalid(message: String) -> LoadError {
    LoadError::InvalidScenario { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::height::HeightSpec;

    const SAMPLE: &str = r#"{
        "config": { "duration_ms": 100 },
        "initial": 0,
        "content_height": 80,
        "steps": [
            { "at_ms": 0, "height": "auto" },
            { "at_ms": 300, "height": 0 }
        ]
    }"#;

    #[test]
    fn test_parse_and_run() {
        let scenario = Scenario::from_json_str(SAMPLE).unwrap();
        assert_eq!(scenario.steps.len(), 2);

        let host = scenario.run();
        assert_eq!(host.controller().state().rendered_height, HeightSpec::ZERO);
        assert!(host.content_display_hidden());
        assert_eq!(host.events().len(), 4);
        // 第二次过渡从 auto 出发，需要多等一帧
        assert_eq!(host.now_ms(), 300 + super::super::FRAME_INTERVAL_MS + 100);
    }

    #[test]
    fn test_out_of_order_steps_rejected() {
        let err = Scenario::from_json_str(
            r#"{ "initial": 0, "steps": [
                { "at_ms": 50, "height": 10 },
                { "at_ms": 10, "height": 20 }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidScenario { .. }));
    }

    #[test]
    fn test_empty_step_rejected() {
        let err = Scenario::from_json_str(r#"{ "initial": 0, "steps": [{ "at_ms": 5 }] }"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidScenario { .. }));
    }

    #[test]
    fn test_run_until_bounds_time() {
        let scenario = Scenario::from_json_str(
            r#"{ "initial": 100, "steps": [{ "at_ms": 0, "height": 0 }], "run_until_ms": 100 }"#,
        )
        .unwrap();
        let host = scenario.run();
        assert!(host.controller().is_animating());
        assert_eq!(host.now_ms(), 100);
    }

    #[test]
    fn test_max_duration_replays_without_overflow() {
        let scenario = Scenario::from_json_str(
            r#"{
                "config": { "duration_ms": 18446744073709551615 },
                "initial": "auto",
                "content_height": 60,
                "steps": [
                    { "at_ms": 0, "height": 0 },
                    { "at_ms": 500, "height": "auto" }
                ]
            }"#,
        )
        .unwrap();
        let host = scenario.run();
        assert!(!host.controller().is_animating());
        assert_eq!(host.now_ms(), u64::MAX);

        let events = host.events();
        assert_eq!(
            events.last(),
            Some(&(
                u64::MAX,
                crate::controller::HeightEvent::AnimationEnd {
                    new_height: HeightSpec::Auto
                }
            ))
        );
    }
}
