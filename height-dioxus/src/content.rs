//! # Content 模块
//!
//! 内层内容元素在 Dioxus 中的实现。
//!
//! Dioxus 没有同步的布局读取，因此高度来自两处缓存：
//! - `onresize` 上报的尺寸（内容隐藏期间的上报会被忽略，因为隐藏时总是 0）
//! - 高度变化前通过 `document::eval` 主动测量（临时恢复 display 后读取 `offsetHeight`）
//!
//! `display: none` 由渲染描述声明式地写入内容样式，这里只记录隐藏标志。

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use dioxus::prelude::*;
use height_runtime::ContentElement;
use tracing::{trace, warn};

static NEXT_CONTENT_ID: AtomicU64 = AtomicU64::new(1);

/// 为内容元素分配唯一的 DOM id
pub fn next_content_id() -> String {
    let id = NEXT_CONTENT_ID.fetch_add(1, Ordering::Relaxed);
    format!("rah-content-{id}")
}

/// 缓存测量结果的内容句柄
///
/// 这些值不参与渲染，因此用 `Cell` 而非 signal，写入不会触发重新渲染。
#[derive(Clone, Default)]
pub struct MeasuredContent {
    height: Rc<Cell<f64>>,
    hidden: Rc<Cell<bool>>,
}

impl MeasuredContent {
    /// `onresize` 上报
    pub fn report_resize(&self, px: f64) {
        if self.hidden.get() {
            return;
        }
        trace!(px, "内容尺寸变化");
        self.height.set(px);
    }

    /// 主动测量的结果，隐藏时也有效
    pub fn report_measured(&self, px: f64) {
        self.height.set(px);
    }
}

impl ContentElement for MeasuredContent {
    fn offset_height(&self) -> f64 {
        self.height.get()
    }

    // 测量脚本自己处理 overflow
    fn set_overflow_hidden(&mut self, _hidden: bool) {}

    fn set_display_hidden(&mut self, hidden: bool) {
        self.hidden.set(hidden);
    }
}

/// 读取内容元素的 `offsetHeight`
///
/// 与浏览器端做法一致：测量期间临时取消 `display: none` 并设置 `overflow: hidden`
/// （防止子元素外边距折叠），读取后恢复。元素不存在时返回 `None`。
pub async fn measure_offset_height(element_id: &str) -> Option<f64> {
    match document::eval(&measure_script(element_id)).await {
        Ok(value) => value.as_f64(),
        Err(e) => {
            warn!(element_id, error = ?e, "测量内容高度失败");
            None
        }
    }
}

fn measure_script(element_id: &str) -> String {
    // id 由 next_content_id 生成，只含字母数字与连字符
    format!(
        r#"
const el = document.getElementById("{element_id}");
if (!el) return null;
const display = el.style.display;
const overflow = el.style.overflow;
el.style.display = "";
el.style.overflow = "hidden";
const height = el.offsetHeight;
el.style.overflow = overflow;
el.style.display = display;
return height;
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_ids_are_unique() {
        let a = next_content_id();
        let b = next_content_id();
        assert_ne!(a, b);
        assert!(a.starts_with("rah-content-"));
    }

    #[test]
    fn test_resize_ignored_while_hidden() {
        let content = MeasuredContent::default();
        content.report_resize(120.0);
        assert_eq!(content.offset_height(), 120.0);

        let mut handle = content.clone();
        handle.set_display_hidden(true);
        content.report_resize(0.0);
        assert_eq!(content.offset_height(), 120.0);

        // 主动测量不受隐藏影响
        content.report_measured(90.0);
        assert_eq!(content.offset_height(), 90.0);
    }

    #[test]
    fn test_measure_script_targets_element() {
        let script = measure_script("rah-content-7");
        assert!(script.contains(r#"getElementById("rah-content-7")"#));
        assert!(script.contains("return height;"));
    }
}
