//! Layout XML serialization of rendered documents.
//!
//! Stands in for the binary page renderer: one `<page>` per page with its
//! geometry, then the node tree as nested elements.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use catalog_model::format_numeric;
use catalog_template::{Document, DocumentWriter, Node, Page};

#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutXmlWriter;

impl DocumentWriter for LayoutXmlWriter {
    fn content_type(&self) -> &'static str {
        "application/xml"
    }

    fn file_extension(&self) -> &'static str {
        "xml"
    }

    fn write(&self, document: &Document, out: &mut dyn Write) -> Result<()> {
        let mut xml = Writer::new_with_indent(out, b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("document");
        root.push_attribute(("title", document.title.as_str()));
        root.push_attribute(("pages", document.pages.len().to_string().as_str()));
        xml.write_event(Event::Start(root))?;
        for page in &document.pages {
            write_page(&mut xml, page)?;
        }
        xml.write_event(Event::End(BytesEnd::new("document")))?;
        Ok(())
    }
}

fn write_page<W: Write>(xml: &mut Writer<W>, page: &Page) -> Result<()> {
    let (width, height) = page.dimensions();
    let margins = page.margins;
    let mut start = BytesStart::new("page");
    start.push_attribute(("size", page.size.as_str()));
    start.push_attribute(("orientation", page.orientation.as_str()));
    start.push_attribute(("width", format_numeric(width).as_str()));
    start.push_attribute(("height", format_numeric(height).as_str()));
    let margins = [margins.top, margins.right, margins.bottom, margins.left]
        .map(format_numeric)
        .join(" ");
    start.push_attribute(("margins", margins.as_str()));
    if let Some(number) = page.number {
        start.push_attribute(("number", number.to_string().as_str()));
    }
    xml.write_event(Event::Start(start))?;

    if let Some(header) = &page.header {
        write_text_element(xml, BytesStart::new("header"), header)?;
    }
    for node in &page.children {
        write_node(xml, node)?;
    }
    if let Some(footer) = &page.footer {
        write_text_element(xml, BytesStart::new("footer"), footer)?;
    }

    xml.write_event(Event::End(BytesEnd::new("page")))?;
    Ok(())
}

fn write_node<W: Write>(xml: &mut Writer<W>, node: &Node) -> Result<()> {
    match node {
        Node::View { role, children } => {
            let mut start = BytesStart::new("view");
            start.push_attribute(("role", role.as_str()));
            if children.is_empty() {
                xml.write_event(Event::Empty(start))?;
                return Ok(());
            }
            xml.write_event(Event::Start(start))?;
            for child in children {
                write_node(xml, child)?;
            }
            xml.write_event(Event::End(BytesEnd::new("view")))?;
        }
        Node::Text { text, style } => {
            let mut start = BytesStart::new("text");
            start.push_attribute(("style", style.as_str()));
            write_text_element(xml, start, text)?;
        }
        Node::Image { src, alt } => {
            let mut start = BytesStart::new("image");
            start.push_attribute(("src", src.as_str()));
            start.push_attribute(("alt", alt.as_str()));
            xml.write_event(Event::Empty(start))?;
        }
        Node::Table { headers, rows } => {
            xml.write_event(Event::Start(BytesStart::new("table")))?;
            if !headers.is_empty() {
                write_row(xml, "head", headers)?;
            }
            for row in rows {
                write_row(xml, "row", row)?;
            }
            xml.write_event(Event::End(BytesEnd::new("table")))?;
        }
        Node::Notice {
            level,
            title,
            detail,
        } => {
            let mut start = BytesStart::new("notice");
            start.push_attribute(("level", level.as_str()));
            start.push_attribute(("title", title.as_str()));
            match detail {
                Some(detail) => write_text_element(xml, start, detail)?,
                None => xml.write_event(Event::Empty(start))?,
            }
        }
    }
    Ok(())
}

fn write_row<W: Write>(xml: &mut Writer<W>, name: &str, cells: &[String]) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    for cell in cells {
        write_text_element(xml, BytesStart::new("cell"), cell)?;
    }
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, start: BytesStart<'_>, text: &str) -> Result<()> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    xml.write_event(Event::Start(start))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
