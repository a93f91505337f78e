//! # Error 模块
//!
//! 定义 height-runtime 中使用的错误类型。
//!
//! - [`HeightError`]：高度输入校验失败，仅作为开发期提示，不会中断渲染
//! - [`LoadError`]：配置 / 场景文件加载失败，由工具链向上传播

use std::path::PathBuf;

use thiserror::Error;

/// 高度输入错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeightError {
    /// 不在接受范围内的高度值
    #[error(
        "属性 '{property}' 的值 \"{value}\"（类型 \"{value_type}\"）无效，\
         需要非负数字、字符串 \"auto\" 或百分比字符串（如 \"15%\"）"
    )]
    InvalidHeight {
        value: String,
        value_type: &'static str,
        property: String,
    },
}

/// 配置 / 场景加载错误
#[derive(Error, Debug)]
pub enum LoadError {
    /// 文件读取失败
    #[error("无法读取文件 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 解析失败
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 场景内容不合法
    #[error("场景无效: {message}")]
    InvalidScenario { message: String },
}

/// Result 类型别名
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_height_message_names_value_type_and_property() {
        let err = HeightError::InvalidHeight {
            value: "-5".to_string(),
            value_type: "number",
            property: "height".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("\"-5\""));
        assert!(message.contains("\"number\""));
        assert!(message.contains("'height'"));
    }

    #[test]
    fn test_json_error_converts() {
        let err: LoadError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
