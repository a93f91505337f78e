//! # State 模块
//!
//! 控制器的渲染状态。

use serde::Serialize;

use crate::classes::{StateClass, classify_static};
use crate::height::{HeightSpec, Overflow, ParsedHeight};

/// 控制器状态
///
/// 每次提交都是一个完整的值；宿主据此渲染外层元素。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerState {
    /// 当前阶段
    pub state_class: StateClass,
    /// 本次渲染实际应用的高度
    pub rendered_height: HeightSpec,
    /// overflow 模式
    pub overflow: Overflow,
    /// 是否附加 transition 声明
    pub transitions_enabled: bool,
}

impl ControllerState {
    /// 已稳定的状态（构造时使用，不产生动画）
    pub fn settled(parsed: ParsedHeight) -> Self {
        Self {
            state_class: classify_static(&parsed.spec),
            rendered_height: parsed.spec,
            overflow: parsed.overflow,
            transitions_enabled: false,
        }
    }
}
