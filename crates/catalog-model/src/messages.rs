//! User-visible strings, per locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::format_numeric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh-cn" | "zh" => Ok(Locale::ZhCn),
            "en" | "en-us" => Ok(Locale::En),
            _ => Err(format!("unsupported locale: {s}")),
        }
    }
}

/// Base columns of the product table, in order: SKU, name, series code,
/// description, status.
const PRODUCT_HEADERS_ZH: [&str; 5] = ["SKU", "产品名称", "系列代码", "描述", "状态"];
const PRODUCT_HEADERS_EN: [&str; 5] = ["SKU", "Name", "Series Code", "Description", "Status"];

/// Base columns of the series table: code, name, description, template id,
/// sort order.
const SERIES_HEADERS_ZH: [&str; 5] = ["系列代码", "系列名称", "描述", "模板ID", "排序"];
const SERIES_HEADERS_EN: [&str; 5] = [
    "Series Code",
    "Series Name",
    "Description",
    "Template ID",
    "Sort Order",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn required(&self, label: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("{label}是必填项"),
            Locale::En => format!("{label} is required"),
        }
    }

    pub fn below_min(&self, label: &str, min: f64) -> String {
        let min = format_numeric(min);
        match self.locale {
            Locale::ZhCn => format!("{label}不能小于{min}"),
            Locale::En => format!("{label} must be at least {min}"),
        }
    }

    pub fn above_max(&self, label: &str, max: f64) -> String {
        let max = format_numeric(max);
        match self.locale {
            Locale::ZhCn => format!("{label}不能大于{max}"),
            Locale::En => format!("{label} must be at most {max}"),
        }
    }

    pub fn not_a_number(&self, label: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("{label}必须是数字"),
            Locale::En => format!("{label} must be a number"),
        }
    }

    pub fn invalid_format(&self, label: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("{label}格式不正确"),
            Locale::En => format!("{label} has an invalid format"),
        }
    }

    pub fn ungrouped(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "其他",
            Locale::En => "Other",
        }
    }

    pub fn product_headers(&self) -> [&'static str; 5] {
        match self.locale {
            Locale::ZhCn => PRODUCT_HEADERS_ZH,
            Locale::En => PRODUCT_HEADERS_EN,
        }
    }

    pub fn series_headers(&self) -> [&'static str; 5] {
        match self.locale {
            Locale::ZhCn => SERIES_HEADERS_ZH,
            Locale::En => SERIES_HEADERS_EN,
        }
    }

    pub fn product_row_error(&self, sku: &str, reason: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("产品 {sku}: {reason}"),
            Locale::En => format!("Product {sku}: {reason}"),
        }
    }

    pub fn series_row_error(&self, code: &str, reason: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("系列 {code}: {reason}"),
            Locale::En => format!("Series {code}: {reason}"),
        }
    }

    pub fn series_not_found(&self, code: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("系列 {code} 不存在"),
            Locale::En => format!("series {code} does not exist"),
        }
    }

    pub fn series_inactive(&self, code: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("系列 {code} 已停用"),
            Locale::En => format!("series {code} is inactive"),
        }
    }

    /// Trailer after a capped error list.
    pub fn more_errors(&self, count: usize) -> String {
        match self.locale {
            Locale::ZhCn => format!("... 另有 {count} 条"),
            Locale::En => format!("... and {count} more"),
        }
    }

    pub fn select_placeholder(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "请选择...",
            Locale::En => "Select...",
        }
    }

    pub fn image_url_placeholder(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "输入图片URL或上传",
            Locale::En => "Enter an image URL or upload",
        }
    }

    pub fn missing_key(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "缺少唯一标识",
            Locale::En => "missing natural key",
        }
    }

    pub fn template_load_failed(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "模板加载失败",
            Locale::En => "Template failed to load",
        }
    }

    pub fn template_not_found(&self, template_id: &str) -> String {
        match self.locale {
            Locale::ZhCn => format!("找不到模板: {template_id}"),
            Locale::En => format!("Template not found: {template_id}"),
        }
    }

    pub fn schema_missing(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "Schema未定义",
            Locale::En => "Schema not defined",
        }
    }

    pub fn schema_missing_detail(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "该系列尚未配置任何字段，请先在系列设置中定义Schema",
            Locale::En => "This series has no fields configured yet; define its schema first",
        }
    }

    pub fn image_missing(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "图片未上传",
            Locale::En => "Image not uploaded",
        }
    }

    pub fn no_data(&self) -> &'static str {
        match self.locale {
            Locale::ZhCn => "暂无数据",
            Locale::En => "No data",
        }
    }
}
