//! # Config 模块
//!
//! 组件配置，集中管理所有可调选项。
//!
//! ## 配置来源
//!
//! 1. 宿主组件的 props（最高）
//! 2. JSON 配置（`AnimateHeightConfig::load`，工具链与场景文件使用）
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classes::{AnimationStateClassOverrides, AnimationStateClasses};
use crate::error::{LoadError, LoadResult};
use crate::style::InlineStyle;
use crate::timing::Timings;

/// 高度过渡组件配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimateHeightConfig {
    /// 过渡时长（毫秒）
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// 过渡延迟（毫秒）
    #[serde(default)]
    pub delay_ms: u64,

    /// 缓动函数，原样写入 transition 声明
    #[serde(default = "default_easing")]
    pub easing: String,

    /// 是否同时对内容做透明度渐变
    #[serde(default)]
    pub animate_opacity: bool,

    /// 是否生成内联 transition 声明
    ///
    /// 关闭后由调用方通过外部样式自行提供。
    #[serde(default = "default_apply_inline_transitions")]
    pub apply_inline_transitions: bool,

    /// 状态类名覆盖
    #[serde(default)]
    pub animation_state_classes: AnimationStateClassOverrides,

    /// 外层元素附加类名
    #[serde(default)]
    pub class_name: Option<String>,

    /// 内容元素类名
    #[serde(default)]
    pub content_class_name: Option<String>,

    /// 外层元素 id
    #[serde(default)]
    pub id: Option<String>,

    /// 调用方样式，与生成的样式合并
    #[serde(default)]
    pub style: InlineStyle,

    /// 显式指定 aria-hidden，优先于按高度计算的结果
    #[serde(default)]
    pub aria_hidden: Option<bool>,

    /// 显式指定减弱动效
    ///
    /// `None` 时由宿主查询环境偏好。
    #[serde(default)]
    pub reduced_motion: Option<bool>,
}

impl Default for AnimateHeightConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            delay_ms: 0,
            easing: default_easing(),
            animate_opacity: false,
            apply_inline_transitions: default_apply_inline_transitions(),
            animation_state_classes: AnimationStateClassOverrides::default(),
            class_name: None,
            content_class_name: None,
            id: None,
            style: InlineStyle::default(),
            aria_hidden: None,
            reduced_motion: None,
        }
    }
}

impl AnimateHeightConfig {
    /// 从 JSON 字符串解析
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从文件加载
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// 生效的时长
    ///
    /// `env_reduced_motion` 为宿主探测到的环境偏好，`reduced_motion` 字段优先。
    pub fn timings(&self, env_reduced_motion: bool) -> Timings {
        let reduced = self.reduced_motion.unwrap_or(env_reduced_motion);
        Timings::resolve(self.duration_ms, self.delay_ms, reduced)
    }

    /// 合并后的状态类名表
    pub fn state_classes(&self) -> AnimationStateClasses {
        AnimationStateClasses::merged(&self.animation_state_classes)
    }
}

// 默认值函数
fn default_duration_ms() -> u64 {
    250
}

fn default_easing() -> String {
    "ease".to_string()
}

fn default_apply_inline_transitions() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = AnimateHeightConfig::default();
        assert_eq!(config.duration_ms, 250);
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.easing, "ease");
        assert!(!config.animate_opacity);
        assert!(config.apply_inline_transitions);
    }

    #[test]
    fn test_empty_json_matches_defaults() {
        let config = AnimateHeightConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnimateHeightConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = AnimateHeightConfig::from_json_str(
            r#"{
                "duration_ms": 500,
                "easing": "linear",
                "style": { "transition": "color 1s" },
                "animation_state_classes": { "animating_up": "closing" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.duration_ms, 500);
        assert_eq!(config.easing, "linear");
        assert_eq!(config.style.get("transition"), Some("color 1s"));
        assert_eq!(config.state_classes().animating_up, "closing");
    }

    #[test]
    fn test_reduced_motion_override_wins() {
        let mut config = AnimateHeightConfig {
            duration_ms: 300,
            delay_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.timings(true).total(), Duration::ZERO);
        assert_eq!(config.timings(false).total(), Duration::from_millis(400));

        config.reduced_motion = Some(false);
        assert_eq!(config.timings(true).total(), Duration::from_millis(400));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnimateHeightConfig::load(Path::new("/nonexistent/height.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.json");
        fs::write(&path, r#"{ "delay_ms": 40, "class_name": "panel" }"#).unwrap();

        let config = AnimateHeightConfig::load(&path).unwrap();
        assert_eq!(config.delay_ms, 40);
        assert_eq!(config.class_name.as_deref(), Some("panel"));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AnimateHeightConfig::load(&path),
            Err(LoadError::Json(_))
        ));
    }
}
