//! Layout blocks shared by the built-in templates.

use catalog_model::{
    LayoutConfig, Messages, Orientation, PartNumber, ProductAsset, SchemaField,
    SeriesSchemaDefinition, SpecValue, ValueBag,
};
use catalog_template::{Node, NoticeLevel, Page, RenderInput, TextStyle};

pub const FOOTER_TEXT: &str = "© Industrial Connectors Co.";

/// Page honoring the series layout, with the running header and footer when
/// the layout shows them.
pub fn page_container(input: &RenderInput<'_>, orientation: Orientation, title: &str) -> Page {
    let layout = input.layout.cloned().unwrap_or_else(LayoutConfig::default);
    let mut page = Page::from_layout(input.layout, orientation, input.page_number());
    if layout.show_header() {
        page.header = Some(title.to_string());
    }
    if layout.show_footer() {
        page.footer = Some(FOOTER_TEXT.to_string());
    }
    page
}

/// In-document block shown when the series has no fields.
pub fn schema_missing(messages: &Messages) -> Node {
    Node::notice(
        NoticeLevel::Error,
        messages.schema_missing(),
        Some(messages.schema_missing_detail().to_string()),
    )
}

pub fn section(title: &str, children: Vec<Node>) -> Node {
    let mut nodes = Vec::with_capacity(children.len() + 1);
    nodes.push(Node::styled(title, TextStyle::Heading));
    nodes.extend(children);
    Node::view("section", nodes)
}

/// Label/value rows for the curated `visible` fields, in the given order.
///
/// `visible` pairs a field key with the label printed on the sheet. Fields
/// without a value are left out.
pub fn spec_table(
    schema: &SeriesSchemaDefinition,
    specs: &ValueBag,
    visible: &[(&str, &str)],
    messages: &Messages,
) -> Node {
    let rows: Vec<Vec<String>> = visible
        .iter()
        .filter_map(|&(key, label)| {
            let value = specs.get(key).filter(|value| !value.is_empty())?;
            Some(vec![
                label.to_string(),
                display_value(schema.field(key), value),
            ])
        })
        .collect();
    if rows.is_empty() {
        return Node::styled(messages.no_data(), TextStyle::Muted);
    }
    Node::view("spec-table", vec![Node::table(Vec::new(), rows)])
}

/// Option labels for select values, comma-joined lists, and the field
/// unit when one is declared.
pub fn display_value(field: Option<&SchemaField>, value: &SpecValue) -> String {
    let text = match (field, value) {
        (Some(field), SpecValue::Text(raw)) if field.field_type.has_options() => {
            field.option_label(raw).unwrap_or(raw.as_str()).to_string()
        }
        (_, SpecValue::List(items)) => items
            .iter()
            .map(SpecValue::to_display_string)
            .collect::<Vec<_>>()
            .join(", "),
        _ => value.to_display_string(),
    };
    match field.and_then(|field| field.unit.as_deref()) {
        Some(unit) if !unit.is_empty() => format!("{text} {unit}"),
        _ => text,
    }
}

/// The asset image, or a labeled placeholder in its place.
pub fn image_or_placeholder(asset: Option<&ProductAsset>, alt: &str, messages: &Messages) -> Node {
    match asset {
        Some(asset) => Node::image(
            asset.file_url.clone(),
            asset.alt_text.clone().unwrap_or_else(|| alt.to_string()),
        ),
        None => Node::view(
            "placeholder",
            vec![Node::styled(messages.image_missing(), TextStyle::Muted)],
        ),
    }
}

/// A titled diagram with a caption line.
pub fn diagram(title: &str, asset: Option<&ProductAsset>, caption: &str, messages: &Messages) -> Node {
    Node::view(
        "diagram",
        vec![
            Node::styled(title, TextStyle::Label),
            image_or_placeholder(asset, title, messages),
            Node::styled(caption, TextStyle::Muted),
        ],
    )
}

/// One titled table of part numbers; `None` when the group is empty.
pub fn part_number_group(title: &str, parts: &[&PartNumber]) -> Option<Node> {
    if parts.is_empty() {
        return None;
    }
    let rows = parts
        .iter()
        .map(|part| vec![part.part_number.clone()])
        .collect();
    Some(Node::view(
        "part-numbers",
        vec![
            Node::styled(title, TextStyle::Label),
            Node::table(vec!["型号 Part Number".to_string()], rows),
        ],
    ))
}

/// Display text of a specification, or `fallback` when it is absent.
pub fn spec_text(specs: &ValueBag, key: &str, fallback: &str) -> String {
    specs
        .get(key)
        .filter(|value| !value.is_empty())
        .map(SpecValue::to_display_string)
        .unwrap_or_else(|| fallback.to_string())
}
