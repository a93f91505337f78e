//! # Classes 模块
//!
//! 动画阶段的显式表示，以及到 CSS 类名的映射。
//!
//! 阶段不以字符串拼接隐式表达，而是：
//!
//! ```text
//! StateClass::Static(TerminalHeight)      终态：zero / auto / specific 三选一
//! StateClass::Animating(AnimationFlags)   动画中：方向与目标标志可同时成立
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::height::HeightSpec;

/// 终态高度类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalHeight {
    Zero,
    Auto,
    Specific,
}

impl TerminalHeight {
    /// 按高度归类
    pub fn of(height: &HeightSpec) -> Self {
        if height.is_auto() {
            Self::Auto
        } else if height.is_zero() {
            Self::Zero
        } else {
            Self::Specific
        }
    }
}

/// 动画中的标志位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationFlags {
    /// 收起（高度变小，或从 auto 出发）
    pub up: bool,
    /// 展开（高度变大，或目标为 auto）
    pub down: bool,
    /// 过渡结束后停留在零
    pub to_zero: bool,
    /// 过渡结束后停留在 auto
    pub to_auto: bool,
    /// 动画目标为正的具体高度
    pub to_specific: bool,
}

/// 当前阶段对应的状态类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum StateClass {
    /// 已稳定
    Static(TerminalHeight),
    /// 过渡进行中
    Animating(AnimationFlags),
}

impl StateClass {
    /// 生成空格分隔的类名
    pub fn tokens(&self, classes: &AnimationStateClasses) -> String {
        let mut tokens: Vec<&str> = Vec::new();
        match self {
            Self::Static(terminal) => {
                tokens.push(&classes.static_base);
                tokens.push(match terminal {
                    TerminalHeight::Zero => &classes.static_height_zero,
                    TerminalHeight::Auto => &classes.static_height_auto,
                    TerminalHeight::Specific => &classes.static_height_specific,
                });
            }
            Self::Animating(flags) => {
                tokens.push(&classes.animating);
                let optional = [
                    (flags.up, &classes.animating_up),
                    (flags.down, &classes.animating_down),
                    (flags.to_zero, &classes.animating_to_height_zero),
                    (flags.to_auto, &classes.animating_to_height_auto),
                    (flags.to_specific, &classes.animating_to_height_specific),
                ];
                tokens.extend(
                    optional
                        .into_iter()
                        .filter(|(on, _)| *on)
                        .map(|(_, name)| name.as_str()),
                );
            }
        }
        tokens.retain(|t| !t.is_empty());
        tokens.join(" ")
    }
}

/// 终态分类
pub fn classify_static(height: &HeightSpec) -> StateClass {
    StateClass::Static(TerminalHeight::of(height))
}

/// 过渡分类
///
/// - `from` / `to`：前后两次请求的高度
/// - `settled`：本次过渡最终停留的高度（不是中间的像素值），决定 `to_*` 标志
pub fn classify_transition(from: &HeightSpec, to: &HeightSpec, settled: &HeightSpec) -> StateClass {
    let order = to.extent_cmp(from);
    StateClass::Animating(AnimationFlags {
        up: from.is_auto() || order == Ordering::Less,
        down: to.is_auto() || order == Ordering::Greater,
        to_zero: settled.is_zero(),
        to_auto: settled.is_auto(),
        to_specific: settled.is_specific(),
    })
}

/// 各阶段的类名表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationStateClasses {
    pub animating: String,
    pub animating_up: String,
    pub animating_down: String,
    pub animating_to_height_zero: String,
    pub animating_to_height_auto: String,
    pub animating_to_height_specific: String,
    pub static_base: String,
    pub static_height_zero: String,
    pub static_height_auto: String,
    pub static_height_specific: String,
}

impl Default for AnimationStateClasses {
    fn default() -> Self {
        Self {
            animating: "rah-animating".to_string(),
            animating_up: "rah-animating--up".to_string(),
            animating_down: "rah-animating--down".to_string(),
            animating_to_height_zero: "rah-animating--to-height-zero".to_string(),
            animating_to_height_auto: "rah-animating--to-height-auto".to_string(),
            animating_to_height_specific: "rah-animating--to-height-specific".to_string(),
            static_base: "rah-static".to_string(),
            static_height_zero: "rah-static--height-zero".to_string(),
            static_height_auto: "rah-static--height-auto".to_string(),
            static_height_specific: "rah-static--height-specific".to_string(),
        }
    }
}

impl AnimationStateClasses {
    /// 以默认表为底，合并调用方覆盖项
    pub fn merged(overrides: &AnimationStateClassOverrides) -> Self {
        let mut classes = Self::default();
        let slots = [
            (&mut classes.animating, &overrides.animating),
            (&mut classes.animating_up, &overrides.animating_up),
            (&mut classes.animating_down, &overrides.animating_down),
            (&mut classes.animating_to_height_zero, &overrides.animating_to_height_zero),
            (&mut classes.animating_to_height_auto, &overrides.animating_to_height_auto),
            (
                &mut classes.animating_to_height_specific,
                &overrides.animating_to_height_specific,
            ),
            (&mut classes.static_base, &overrides.static_base),
            (&mut classes.static_height_zero, &overrides.static_height_zero),
            (&mut classes.static_height_auto, &overrides.static_height_auto),
            (&mut classes.static_height_specific, &overrides.static_height_specific),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        classes
    }
}

/// 调用方提供的类名覆盖（缺省字段沿用默认值）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationStateClassOverrides {
    pub animating: Option<String>,
    pub animating_up: Option<String>,
    pub animating_down: Option<String>,
    pub animating_to_height_zero: Option<String>,
    pub animating_to_height_auto: Option<String>,
    pub animating_to_height_specific: Option<String>,
    #[serde(rename = "static")]
    pub static_base: Option<String>,
    pub static_height_zero: Option<String>,
    pub static_height_auto: Option<String>,
    pub static_height_specific: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(class: StateClass) -> String {
        class.tokens(&AnimationStateClasses::default())
    }

    #[test]
    fn test_static_tokens() {
        assert_eq!(
            tokens(classify_static(&HeightSpec::ZERO)),
            "rah-static rah-static--height-zero"
        );
        assert_eq!(
            tokens(classify_static(&HeightSpec::Auto)),
            "rah-static rah-static--height-auto"
        );
        assert_eq!(
            tokens(classify_static(&HeightSpec::Percent(40.0))),
            "rah-static rah-static--height-specific"
        );
    }

    #[test]
    fn test_collapse_to_zero() {
        let class = classify_transition(
            &HeightSpec::Fixed(100.0),
            &HeightSpec::ZERO,
            &HeightSpec::ZERO,
        );
        insta::assert_snapshot!(
            tokens(class),
            @"rah-animating rah-animating--up rah-animating--to-height-zero"
        );
    }

    #[test]
    fn test_expand_to_auto() {
        let class = classify_transition(&HeightSpec::Fixed(50.0), &HeightSpec::Auto, &HeightSpec::Auto);
        let StateClass::Animating(flags) = class else {
            panic!("expected animating class");
        };
        assert!(flags.down);
        assert!(!flags.up);
        assert!(flags.to_auto);
        assert!(!flags.to_specific);
    }

    #[test]
    fn test_from_auto_is_up() {
        let class = classify_transition(
            &HeightSpec::Auto,
            &HeightSpec::Fixed(100.0),
            &HeightSpec::Fixed(100.0),
        );
        assert_eq!(
            class,
            StateClass::Animating(AnimationFlags {
                up: true,
                to_specific: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_mixed_units_follow_extent_order() {
        let class = classify_transition(
            &HeightSpec::Fixed(300.0),
            &HeightSpec::Percent(10.0),
            &HeightSpec::Percent(10.0),
        );
        let StateClass::Animating(flags) = class else {
            panic!("expected animating class");
        };
        assert!(flags.down);
        assert!(!flags.up);
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let overrides: AnimationStateClassOverrides =
            serde_json::from_str(r#"{ "animating": "moving", "static": "" }"#).unwrap();
        let classes = AnimationStateClasses::merged(&overrides);
        assert_eq!(classes.animating, "moving");
        assert_eq!(classes.animating_up, "rah-animating--up");

        // 空类名不输出
        assert_eq!(
            classify_static(&HeightSpec::ZERO).tokens(&classes),
            "rah-static--height-zero"
        );
    }
}
