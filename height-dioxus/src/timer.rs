//! # Timer 模块
//!
//! 帧回调与超时的异步实现。
//!
//! 桌面端用 tokio 计时器；Web 端（wasm 上没有 tokio 计时器）通过 `document::eval`
//! 调用浏览器的 `setTimeout`。帧回调在两端都走 `requestAnimationFrame`。

use std::time::Duration;

use dioxus::prelude::*;
use tracing::warn;

/// 等待浏览器绘制一帧
///
/// 连续两次 `requestAnimationFrame`，保证上一次提交的高度已经生效。
pub async fn next_frame() {
    if let Err(e) = document::eval(FRAME_SCRIPT).await {
        warn!(error = ?e, "帧回调执行失败，直接继续");
    }
}

/// 等待指定时长
pub async fn sleep(duration: Duration) {
    #[cfg(not(feature = "web"))]
    tokio::time::sleep(duration).await;

    #[cfg(feature = "web")]
    if let Err(e) = document::eval(&timeout_script(duration)).await {
        warn!(error = ?e, "setTimeout 执行失败，直接继续");
    }
}

/// 查询 `prefers-reduced-motion`
///
/// 环境不支持时返回 `None`。
pub async fn prefers_reduced_motion() -> Option<bool> {
    match document::eval(REDUCED_MOTION_SCRIPT).await {
        Ok(value) => value.as_bool(),
        Err(e) => {
            warn!(error = ?e, "无法查询减弱动效偏好");
            None
        }
    }
}

const FRAME_SCRIPT: &str = r#"
await new Promise((resolve) => requestAnimationFrame(() => requestAnimationFrame(resolve)));
return true;
"#;

const REDUCED_MOTION_SCRIPT: &str = r#"
if (typeof window.matchMedia !== "function") return null;
return window.matchMedia("(prefers-reduced-motion: reduce)").matches;
"#;

#[cfg_attr(not(feature = "web"), allow(dead_code))]
fn timeout_script(duration: Duration) -> String {
    format!(
        "await new Promise((resolve) => setTimeout(resolve, {})); return true;",
        duration.as_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_script() {
        assert_eq!(
            timeout_script(Duration::from_millis(260)),
            "await new Promise((resolve) => setTimeout(resolve, 260)); return true;"
        );
        assert!(timeout_script(Duration::ZERO).contains("setTimeout(resolve, 0)"));
    }

    #[test]
    fn test_scripts_return_values() {
        // eval 需要脚本返回值才会结束等待
        assert!(FRAME_SCRIPT.contains("return true"));
        assert!(REDUCED_MOTION_SCRIPT.contains("prefers-reduced-motion: reduce"));
    }
}
