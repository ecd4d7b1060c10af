use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "LETTER",
            PageSize::Legal => "LEGAL",
        }
    }

    /// Portrait width and height in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 30.0,
            bottom: 30.0,
            left: 30.0,
        }
    }
}

/// Per-series page layout. Every attribute is optional in storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_footer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_page_numbers: Option<bool>,
}

impl LayoutConfig {
    pub fn page_size(&self) -> PageSize {
        self.page_size.unwrap_or_default()
    }

    /// Orientation, or `fallback` (usually the template's default) when unset.
    pub fn orientation_or(&self, fallback: Orientation) -> Orientation {
        self.orientation.unwrap_or(fallback)
    }

    pub fn margins(&self) -> Margins {
        self.margins.unwrap_or_default()
    }

    pub fn show_header(&self) -> bool {
        self.show_header.unwrap_or(true)
    }

    pub fn show_footer(&self) -> bool {
        self.show_footer.unwrap_or(true)
    }

    pub fn show_page_numbers(&self) -> bool {
        self.show_page_numbers.unwrap_or(true)
    }
}
