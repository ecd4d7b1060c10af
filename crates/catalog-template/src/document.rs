//! Renderer output: pages of layout nodes with text and image leaves.

use serde::Serialize;

use catalog_model::{LayoutConfig, Margins, Orientation, PageSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Body,
    Title,
    Heading,
    Label,
    Muted,
}

impl TextStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextStyle::Body => "body",
            TextStyle::Title => "title",
            TextStyle::Heading => "heading",
            TextStyle::Label => "label",
            TextStyle::Muted => "muted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// Container; `role` names the region (e.g. `header`, `specs`).
    View { role: String, children: Vec<Node> },
    Text { text: String, style: TextStyle },
    Image { src: String, alt: String },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// A labeled warning or error block shown inside the document.
    Notice {
        level: NoticeLevel,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl Node {
    pub fn view(role: impl Into<String>, children: Vec<Node>) -> Self {
        Node::View {
            role: role.into(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::Body)
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Node::Text {
            text: text.into(),
            style,
        }
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Node::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Node::Table { headers, rows }
    }

    pub fn notice(level: NoticeLevel, title: impl Into<String>, detail: Option<String>) -> Self {
        Node::Notice {
            level,
            title: title.into(),
            detail,
        }
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a Node>) {
        out.push(self);
        if let Node::View { children, .. } = self {
            for child in children {
                child.visit(out);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Printed page number, when page numbers are shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub children: Vec<Node>,
}

impl Page {
    /// Blank page honoring `layout`; `orientation` applies when the layout
    /// does not set one.
    pub fn from_layout(layout: Option<&LayoutConfig>, orientation: Orientation, number: u32) -> Self {
        let layout = layout.cloned().unwrap_or_default();
        Self {
            size: layout.page_size(),
            orientation: layout.orientation_or(orientation),
            margins: layout.margins(),
            header: None,
            footer: None,
            number: layout.show_page_numbers().then_some(number),
            children: Vec::new(),
        }
    }

    /// Width and height in points after orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        let (width, height) = self.size.dimensions();
        match self.orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Single default page carrying one error notice.
    pub fn error_panel(title: impl Into<String>, detail: Option<String>) -> Self {
        let title = title.into();
        let mut page = Page::from_layout(None, Orientation::Portrait, 1);
        page.push(Node::notice(NoticeLevel::Error, title.clone(), detail));
        Self::new(title).with_page(page)
    }

    /// Every node, depth first, page by page.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for page in &self.pages {
            for node in &page.children {
                node.visit(&mut out);
            }
        }
        out
    }

    pub fn texts(&self) -> Vec<&str> {
        self.nodes()
            .into_iter()
            .filter_map(|node| match node {
                Node::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, &str)> {
        self.nodes()
            .into_iter()
            .filter_map(|node| match node {
                Node::Notice { level, title, .. } => Some((*level, title.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn has_error(&self) -> bool {
        self.notices()
            .iter()
            .any(|(level, _)| *level == NoticeLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_follows_layout_config() {
        let layout = LayoutConfig {
            page_size: Some(PageSize::Letter),
            show_page_numbers: Some(false),
            ..LayoutConfig::default()
        };
        let page = Page::from_layout(Some(&layout), Orientation::Landscape, 2);
        assert_eq!(page.size, PageSize::Letter);
        assert_eq!(page.orientation, Orientation::Landscape);
        assert_eq!(page.dimensions(), (792.0, 612.0));
        assert_eq!(page.number, None);

        let default = Page::from_layout(None, Orientation::Portrait, 3);
        assert_eq!(default.size, PageSize::A4);
        assert_eq!(default.number, Some(3));
    }

    #[test]
    fn nodes_are_walked_depth_first() {
        let mut page = Page::from_layout(None, Orientation::Portrait, 1);
        page.push(Node::view(
            "header",
            vec![Node::styled("M8", TextStyle::Title), Node::text("PROD-001")],
        ));
        page.push(Node::notice(NoticeLevel::Warning, "图片未上传", None));
        let document = Document::new("M8").with_page(page);

        assert_eq!(document.texts(), vec!["M8", "PROD-001"]);
        assert_eq!(document.nodes().len(), 4);
        assert!(!document.has_error());
        assert!(Document::error_panel("模板加载失败", None).has_error());
    }
}
