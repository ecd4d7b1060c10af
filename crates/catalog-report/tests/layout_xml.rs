use catalog_model::{LayoutConfig, Orientation, PageSize};
use catalog_report::LayoutXmlWriter;
use catalog_report::blocks::FOOTER_TEXT;
use catalog_template::{Document, DocumentWriter, Node, NoticeLevel, Page, TextStyle};

fn sample() -> Document {
    let mut page = Page::from_layout(None, Orientation::Portrait, 1);
    page.header = Some("M8 Compact 4 Ports".to_string());
    page.footer = Some(FOOTER_TEXT.to_string());
    page.push(Node::view(
        "product-header",
        vec![
            Node::styled("M8 四口分线盒", TextStyle::Title),
            Node::image("https://cdn.example.com/m8.png", "A & B"),
        ],
    ));
    page.push(Node::notice(
        NoticeLevel::Error,
        "Schema未定义",
        Some("d".to_string()),
    ));
    page.push(Node::table(
        Vec::new(),
        vec![vec!["额定电源".to_string(), "24V".to_string()]],
    ));
    Document::new("PROD-001 M8 四口分线盒").with_page(page)
}

fn to_string(document: &Document) -> String {
    String::from_utf8(LayoutXmlWriter.to_bytes(document).unwrap()).unwrap()
}

#[test]
fn writes_pages_with_geometry_and_nested_nodes() {
    insta::assert_snapshot!(to_string(&sample()), @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <document title="PROD-001 M8 四口分线盒" pages="1">
      <page size="A4" orientation="portrait" width="595.28" height="841.89" margins="30 30 30 30" number="1">
        <header>M8 Compact 4 Ports</header>
        <view role="product-header">
          <text style="title">M8 四口分线盒</text>
          <image src="https://cdn.example.com/m8.png" alt="A &amp; B"/>
        </view>
        <notice level="error" title="Schema未定义">d</notice>
        <table>
          <row>
            <cell>额定电源</cell>
            <cell>24V</cell>
          </row>
        </table>
        <footer>© Industrial Connectors Co.</footer>
      </page>
    </document>
    "#);
}

#[test]
fn landscape_pages_swap_dimensions_and_omit_hidden_numbers() {
    let layout = LayoutConfig {
        page_size: Some(PageSize::Letter),
        orientation: Some(Orientation::Landscape),
        show_page_numbers: Some(false),
        ..LayoutConfig::default()
    };
    let document = Document::new("empty")
        .with_page(Page::from_layout(Some(&layout), Orientation::Portrait, 2));
    let xml = to_string(&document);
    assert!(xml.contains(r#"size="LETTER" orientation="landscape" width="792" height="612""#));
    assert!(!xml.contains("number="));
}

#[test]
fn writer_advertises_xml() {
    assert_eq!(LayoutXmlWriter.content_type(), "application/xml");
    assert_eq!(LayoutXmlWriter.file_extension(), "xml");
}
