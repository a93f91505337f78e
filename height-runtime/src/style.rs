//! # Style 模块
//!
//! 由 (状态, 配置) 纯函数地生成渲染描述，每次渲染组装一次，不做原地修改。
//!
//! ## 合并规则
//!
//! - `height` 总是由控制器决定
//! - `overflow` 在控制器释放时才沿用调用方的值
//! - 调用方的 `transition` / `-webkit-transition` 拼接在生成值之前，而非被覆盖

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classes::AnimationStateClasses;
use crate::config::AnimateHeightConfig;
use crate::controller::ControllerState;
use crate::height::Overflow;
use crate::timing::Timings;

const TRANSITION: &str = "transition";
const WEBKIT_TRANSITION: &str = "-webkit-transition";

/// 有序的内联样式声明
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取属性值
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// 设置属性；已存在时原位替换
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(slot) => slot.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// 链式设置
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// 输出为 `style` 属性字符串
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<BTreeMap<String, String>> for InlineStyle {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self {
            declarations: map.into_iter().collect(),
        }
    }
}

impl From<InlineStyle> for BTreeMap<String, String> {
    fn from(style: InlineStyle) -> Self {
        style.declarations.into_iter().collect()
    }
}

/// 单个元素的渲染描述
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ElementModel {
    /// 空格分隔的类名
    pub class: String,
    pub id: Option<String>,
    pub aria_hidden: Option<bool>,
    pub style: InlineStyle,
}

/// 两层容器的渲染描述
///
/// 外层负责尺寸与过渡，内层承载内容并用于测量。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RenderModel {
    pub outer: ElementModel,
    pub content: ElementModel,
}

/// 组装渲染描述
pub fn render_model(
    state: &ControllerState,
    content_hidden: bool,
    config: &AnimateHeightConfig,
    classes: &AnimationStateClasses,
    timings: Timings,
) -> RenderModel {
    let outer = ElementModel {
        class: compose_classes(&state.state_class.tokens(classes), config.class_name.as_deref()),
        id: config.id.clone(),
        aria_hidden: Some(aria_hidden(config.aria_hidden, state)),
        style: outer_style(state, config, timings),
    };
    let content = ElementModel {
        class: config.content_class_name.clone().unwrap_or_default(),
        id: None,
        aria_hidden: None,
        style: content_style(state, content_hidden, config, timings),
    };
    RenderModel { outer, content }
}

/// 外层样式
pub fn outer_style(
    state: &ControllerState,
    config: &AnimateHeightConfig,
    timings: Timings,
) -> InlineStyle {
    let mut style = config.style.clone();
    style.set("height", state.rendered_height.css_value());

    match state.overflow {
        Overflow::Hidden => style.set("overflow", "hidden"),
        // 释放时保留调用方的 overflow（若有）
        Overflow::Inherit => {}
    }

    if state.transitions_enabled && config.apply_inline_transitions {
        let generated = transition_declaration("height", config, timings);
        let transition = prepend(config.style.get(TRANSITION), &generated);
        let webkit = match config.style.get(WEBKIT_TRANSITION) {
            Some(caller) => prepend(Some(caller), &generated),
            None => transition.clone(),
        };
        style.set(TRANSITION, transition);
        style.set(WEBKIT_TRANSITION, webkit);
    }

    style
}

/// 内容样式
pub fn content_style(
    state: &ControllerState,
    content_hidden: bool,
    config: &AnimateHeightConfig,
    timings: Timings,
) -> InlineStyle {
    let mut style = InlineStyle::new();

    if config.animate_opacity {
        let transition = transition_declaration("opacity", config, timings);
        style.set(TRANSITION, transition.clone());
        style.set(WEBKIT_TRANSITION, transition);
        let opacity = if state.rendered_height.is_zero() { "0" } else { "1" };
        style.set("opacity", opacity);
    }

    if content_hidden {
        style.set("display", "none");
    }

    style
}

/// 计算 aria-hidden：显式值优先，否则零高度即隐藏
pub fn aria_hidden(explicit: Option<bool>, state: &ControllerState) -> bool {
    explicit.unwrap_or_else(|| state.rendered_height.is_zero())
}

/// 组合外层类名
pub fn compose_classes(state_tokens: &str, class_name: Option<&str>) -> String {
    [Some(state_tokens), class_name]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn transition_declaration(property: &str, config: &AnimateHeightConfig, timings: Timings) -> String {
    format!(
        "{property} {}ms {} {}ms",
        timings.duration_ms(),
        config.easing,
        timings.delay_ms()
    )
}

fn prepend(caller: Option<&str>, generated: &str) -> String {
    match caller {
        Some(caller) if !caller.is_empty() => format!("{caller}, {generated}"),
        _ => generated.to_string(),
    }
}
