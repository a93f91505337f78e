//! # Height Dioxus
//!
//! [`height_runtime`] 的 Dioxus 宿主，提供 [`AnimateHeight`] 组件。
//!
//! ## 使用示例
//!
//! ```ignore
//! use dioxus::prelude::*;
//! use height_dioxus::AnimateHeight;
//! use height_runtime::HeightInput;
//!
//! #[component]
//! fn Panel() -> Element {
//!     let mut open = use_signal(|| false);
//!     let height = if open() { HeightInput::auto() } else { 0.0.into() };
//!     rsx! {
//!         button { onclick: move |_| open.toggle(), "切换" }
//!         AnimateHeight { height, duration: 300, "内容" }
//!     }
//! }
//! ```
//!
//! ## 平台
//!
//! - `desktop`（默认）：超时使用 tokio 计时器
//! - `web`：超时通过 `setTimeout` 实现

mod component;
mod content;
mod driver;
mod timer;

pub use component::AnimateHeight;
pub use content::MeasuredContent;
pub use height_runtime::{HeightEvent, HeightInput, HeightSpec, InlineStyle};
