//! # Height 模块
//!
//! 目标高度的表示、解析与校验。
//!
//! ## 输入与规范化
//!
//! ```text
//! HeightInput (原始输入)          HeightSpec (规范化结果)
//!   Number(-3) / Text("0")   ->     Fixed(0)
//!   Text("0%")               ->     Fixed(0)
//!   Text("auto")             ->     Auto
//!   Number(120) / "120"      ->     Fixed(120)
//!   Text("50%")              ->     Percent(50)
//!   其他（非法）              ->     Auto（并由 validate_height 报告）
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HeightError;

/// 原始高度输入
///
/// 组件边界处收到的未校验值。变化检测基于此类型比较：
/// `Number(0.0)` 与 `Text("0")` 视为不同输入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeightInput {
    /// 数字（像素）
    Number(f64),
    /// 字符串：`"auto"`、百分比或数字字符串
    Text(String),
}

impl HeightInput {
    /// 创建 `"auto"` 输入
    pub fn auto() -> Self {
        Self::Text("auto".to_string())
    }

    /// 输入的类型名（用于错误提示）
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }
}

impl From<f64> for HeightInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for HeightInput {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for HeightInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for HeightInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<HeightSpec> for HeightInput {
    fn from(spec: HeightSpec) -> Self {
        match spec {
            HeightSpec::Auto => Self::auto(),
            HeightSpec::Fixed(px) => Self::Number(px),
            HeightSpec::Percent(p) => Self::Text(format!("{p}%")),
        }
    }
}

impl fmt::Display for HeightInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// 规范化后的目标高度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "HeightInput", from = "HeightInput")]
pub enum HeightSpec {
    /// 由内容决定的高度（终态）
    Auto,
    /// 固定像素值（非负）
    Fixed(f64),
    /// 百分比
    Percent(f64),
}

impl HeightSpec {
    /// 零高度
    pub const ZERO: Self = Self::Fixed(0.0);

    /// 由像素值构造（非正数或非有限值视为零）
    pub fn px(px: f64) -> Self {
        if px.is_finite() && px > 0.0 {
            Self::Fixed(px)
        } else {
            Self::ZERO
        }
    }

    /// 是否为零高度
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Fixed(v) | Self::Percent(v) => *v == 0.0,
            Self::Auto => false,
        }
    }

    /// 是否为 auto
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// 是否为正的固定 / 百分比高度
    pub fn is_specific(&self) -> bool {
        match self {
            Self::Fixed(v) | Self::Percent(v) => *v > 0.0,
            Self::Auto => false,
        }
    }

    /// CSS 属性值（`auto` / `120px` / `50%`）
    pub fn css_value(&self) -> String {
        self.to_string()
    }

    /// 跨变体的全序比较
    ///
    /// 零值最小且彼此相等；其后为正的 `Fixed`（按数值），再后为正的 `Percent`
    /// （容器大小未知，视为大于任何像素值）；`Auto` 最大。
    pub fn extent_cmp(&self, other: &Self) -> Ordering {
        let (rank_a, value_a) = self.extent_key();
        let (rank_b, value_b) = other.extent_key();
        rank_a
            .cmp(&rank_b)
            .then_with(|| value_a.total_cmp(&value_b))
    }

    fn extent_key(&self) -> (u8, f64) {
        if self.is_zero() {
            return (0, 0.0);
        }
        match self {
            Self::Fixed(px) => (1, *px),
            Self::Percent(p) => (2, *p),
            Self::Auto => (3, 0.0),
        }
    }
}

impl From<HeightInput> for HeightSpec {
    fn from(input: HeightInput) -> Self {
        parse_height(&input).spec
    }
}

impl fmt::Display for HeightSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(px) => write!(f, "{px}px"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// 外层元素的 overflow 模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// 动画期间及非 auto 终态强制隐藏
    #[default]
    Hidden,
    /// 释放，沿用调用方样式
    Inherit,
}

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedHeight {
    pub spec: HeightSpec,
    pub overflow: Overflow,
}

impl ParsedHeight {
    fn hidden(spec: HeightSpec) -> Self {
        Self {
            spec,
            overflow: Overflow::Hidden,
        }
    }
}

/// 解析高度输入
///
/// 假定输入已经过 [`validate_height`] 校验；无法识别的值按 `Auto` 处理。
pub fn parse_height(input: &HeightInput) -> ParsedHeight {
    match input {
        HeightInput::Number(n) if n.is_finite() => ParsedHeight::hidden(HeightSpec::px(*n)),
        HeightInput::Number(_) => auto(),
        HeightInput::Text(text) => {
            if let Some(n) = parse_number(text) {
                ParsedHeight::hidden(HeightSpec::px(n))
            } else if let Some(p) = parse_percentage(text) {
                if p <= 0.0 {
                    ParsedHeight::hidden(HeightSpec::ZERO)
                } else {
                    ParsedHeight::hidden(HeightSpec::Percent(p))
                }
            } else {
                auto()
            }
        }
    }
}

/// 校验高度输入
///
/// 接受：非负有限数字、`"auto"`、非负百分比字符串。
pub fn validate_height(input: &HeightInput, property: &str) -> Result<(), HeightError> {
    let valid = match input {
        HeightInput::Number(n) => n.is_finite() && *n >= 0.0,
        HeightInput::Text(text) => {
            text == "auto" || parse_percentage(text).is_some_and(|p| p >= 0.0)
        }
    };

    if valid {
        Ok(())
    } else {
        Err(HeightError::InvalidHeight {
            value: input.to_string(),
            value_type: input.type_name(),
            property: property.to_string(),
        })
    }
}

fn auto() -> ParsedHeight {
    ParsedHeight {
        spec: HeightSpec::Auto,
        overflow: Overflow::Inherit,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_percentage(text: &str) -> Option<f64> {
    text.strip_suffix('%').and_then(parse_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(input: impl Into<HeightInput>) -> HeightSpec {
        parse_height(&input.into()).spec
    }

    #[test]
    fn test_zero_normalization() {
        assert_eq!(spec(-10.0), HeightSpec::ZERO);
        assert_eq!(spec("0"), HeightSpec::ZERO);
        assert_eq!(spec("0%"), HeightSpec::ZERO);
        assert_eq!(spec("-3"), HeightSpec::ZERO);
        assert_eq!(parse_height(&"0%".into()).overflow, Overflow::Hidden);
    }

    #[test]
    fn test_auto_releases_overflow() {
        let parsed = parse_height(&HeightInput::auto());
        assert_eq!(parsed.spec, HeightSpec::Auto);
        assert_eq!(parsed.overflow, Overflow::Inherit);
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(spec(120.0), HeightSpec::Fixed(120.0));
        assert_eq!(spec("120"), HeightSpec::Fixed(120.0));
        assert_eq!(spec("12.5%"), HeightSpec::Percent(12.5));
        assert_eq!(parse_height(&"50%".into()).overflow, Overflow::Hidden);
    }

    #[test]
    fn test_unrecognised_falls_back_to_auto() {
        assert_eq!(spec("tall"), HeightSpec::Auto);
        assert_eq!(spec("100px"), HeightSpec::Auto);
        assert_eq!(spec(f64::NAN), HeightSpec::Auto);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let inputs: Vec<HeightInput> = vec![
            0.0.into(),
            (-4.0).into(),
            37.5.into(),
            "0".into(),
            "0%".into(),
            "25%".into(),
            "auto".into(),
            "80".into(),
        ];
        for input in inputs {
            let once = parse_height(&input);
            let twice = parse_height(&HeightInput::from(once.spec));
            assert_eq!(once, twice, "input {input}");
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate_height(&100.0.into(), "height").is_ok());
        assert!(validate_height(&"auto".into(), "height").is_ok());
        assert!(validate_height(&"15%".into(), "height").is_ok());

        let err = validate_height(&(-1.0).into(), "height").unwrap_err();
        assert_eq!(
            err,
            HeightError::InvalidHeight {
                value: "-1".to_string(),
                value_type: "number",
                property: "height".to_string(),
            }
        );
        assert!(validate_height(&"tall".into(), "height").is_err());
        assert!(validate_height(&"-5%".into(), "height").is_err());
        assert!(validate_height(&"100".into(), "height").is_err());
    }

    #[test]
    fn test_extent_order() {
        use std::cmp::Ordering::*;

        assert_eq!(HeightSpec::ZERO.extent_cmp(&HeightSpec::Percent(0.0)), Equal);
        assert_eq!(HeightSpec::ZERO.extent_cmp(&HeightSpec::Fixed(1.0)), Less);
        assert_eq!(HeightSpec::Fixed(900.0).extent_cmp(&HeightSpec::Percent(1.0)), Less);
        assert_eq!(HeightSpec::Percent(90.0).extent_cmp(&HeightSpec::Percent(10.0)), Greater);
        assert_eq!(HeightSpec::Auto.extent_cmp(&HeightSpec::Percent(100.0)), Greater);
        assert_eq!(HeightSpec::Auto.extent_cmp(&HeightSpec::Auto), Equal);
    }

    #[test]
    fn test_css_value() {
        assert_eq!(HeightSpec::Auto.css_value(), "auto");
        assert_eq!(HeightSpec::Fixed(80.0).css_value(), "80px");
        assert_eq!(HeightSpec::Percent(12.5).css_value(), "12.5%");
    }

    #[test]
    fn test_serde_uses_input_form() {
        let json = serde_json::to_string(&[HeightSpec::Auto, HeightSpec::Fixed(10.0), HeightSpec::Percent(5.0)])
            .unwrap();
        assert_eq!(json, r#"["auto",10.0,"5%"]"#);

        let back: Vec<HeightSpec> = serde_json::from_str(r#"["auto", 10, "5%", "0"]"#).unwrap();
        assert_eq!(
            back,
            vec![
                HeightSpec::Auto,
                HeightSpec::Fixed(10.0),
                HeightSpec::Percent(5.0),
                HeightSpec::ZERO
            ]
        );
    }
}
