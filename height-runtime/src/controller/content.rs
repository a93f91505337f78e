//! # Content 模块
//!
//! 内容元素句柄：控制器通过它测量内容的自然高度，并切换隐藏标志。

/// 内容元素句柄
///
/// 仅在挂载期间有效，由控制器独占持有。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct DomContent(web_sys::HtmlElement);
///
/// impl ContentElement for DomContent {
///     fn offset_height(&self) -> f64 {
///         f64::from(self.0.offset_height())
///     }
///
///     fn set_overflow_hidden(&mut self, hidden: bool) {
///         let value = if hidden { "hidden" } else { "" };
///         let _ = self.0.style().set_property("overflow", value);
///     }
///
///     fn set_display_hidden(&mut self, hidden: bool) {
///         let value = if hidden { "none" } else { "" };
///         let _ = self.0.style().set_property("display", value);
///     }
/// }
/// ```
pub trait ContentElement {
    /// 内容当前的自然高度（像素）
    fn offset_height(&self) -> f64;

    /// 测量期间临时强制 overflow: hidden
    fn set_overflow_hidden(&mut self, hidden: bool);

    /// 从布局与可访问性树中移除 / 恢复内容
    fn set_display_hidden(&mut self, hidden: bool);
}
