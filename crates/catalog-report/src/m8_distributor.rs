//! Data sheet for M8 distributors with moulded cable (8/12/16 ports).

use catalog_model::{Messages, Orientation, PartNumber, SpecValue, ValueBag};
use catalog_template::{Document, Node, RenderInput, TemplateMetadata, TextStyle};

use crate::blocks::{
    diagram, image_or_placeholder, page_container, part_number_group, schema_missing, section,
    spec_table, spec_text,
};

pub const TEMPLATE_ID: &str = "layout-m8-distributor";

const VISIBLE_FIELDS: [(&str, &str); 7] = [
    ("voltage_rating", "额定电源"),
    ("working_voltage", "工作电压"),
    ("current_load", "电流负载"),
    ("total_current", "总电流"),
    ("ip_rating", "防护等级"),
    ("cable_type", "线缆类型"),
    ("cable_spec", "线缆规格"),
];

const DEFAULT_WIRE_COLORS: [&str; 8] = [
    "BLUE", "BROWN", "WHITE", "GREEN", "YELLOW", "GRAY", "PINK", "RED",
];

const MAX_WIRES: usize = 8;

pub fn metadata() -> TemplateMetadata {
    TemplateMetadata::new(TEMPLATE_ID, "M8 Distributor Layout")
        .with_description("M8 distributor layout for 8/12/16 port products with cable outlet")
        .applicable_to(["M8-DISTRIBUTOR-8-12", "M8-DISTRIBUTOR-16"])
        .with_version("1.0.0")
        .multi_page(true)
        .with_orientation(Orientation::Portrait)
}

pub fn render(input: &RenderInput<'_>) -> Document {
    let messages = Messages::default();
    let product = &input.product.product;
    let specs = &product.specifications;
    let port_count = spec_text(specs, "port_count", "8");
    let cable_type = spec_text(specs, "cable_type", "PVC");
    let title = format!("M8 Distributor {port_count} Ports");

    let mut page = page_container(input, Orientation::Portrait, &title);
    page.push(Node::view(
        "product-header",
        vec![
            image_or_placeholder(product.asset("main_photo"), &product.name, &messages),
            Node::styled(product.name.clone(), TextStyle::Title),
            Node::text(format!("M8 Distributor {port_count} Ports, Moulded Cable")),
            Node::view(
                "tags",
                ["IP67", "Halogen-Free", cable_type.as_str()]
                    .into_iter()
                    .map(|tag| Node::styled(tag, TextStyle::Label))
                    .collect(),
            ),
        ],
    ));

    if input.schema.is_empty() {
        tracing::warn!(sku = %product.sku, "series has no schema; data sheet shows a notice");
        page.push(schema_missing(&messages));
    } else {
        page.push(section(
            "Specification 规格",
            vec![spec_table(input.schema, specs, &VISIBLE_FIELDS, &messages)],
        ));
    }

    page.push(section(
        "Circuit 电路图",
        vec![diagram(
            "Circuit",
            product.asset("circuit_diagram"),
            &format!("{port_count} Ports"),
            &messages,
        )],
    ));
    page.push(section(
        "Wire Color Code 线缆颜色编码",
        vec![Node::table(
            vec!["Pin".to_string(), "Color 颜色".to_string()],
            wire_colors(specs),
        )],
    ));

    let pvc = with_cable(&product.part_numbers, "PVC");
    let pur = with_cable(&product.part_numbers, "PUR");
    let groups: Vec<Node> = [
        part_number_group("PVC Flexible Cable", &pvc),
        part_number_group("PUR Drag Chain Cable", &pur),
    ]
    .into_iter()
    .flatten()
    .collect();
    page.push(section(
        "Port Number 型号选择",
        if groups.is_empty() {
            vec![Node::styled(messages.no_data(), TextStyle::Muted)]
        } else {
            groups
        },
    ));

    page.push(Node::view(
        "note",
        vec![
            Node::styled(
                "注意: 所有型号均为无卤素(Halogen-Free)线缆，符合RoHS标准。",
                TextStyle::Muted,
            ),
            Node::styled(
                format!(
                    "线缆规格: {} | 护套颜色: GRAY 灰色",
                    spec_text(specs, "cable_spec", "10×0.25mm²")
                ),
                TextStyle::Muted,
            ),
        ],
    ));

    Document::new(format!("{} {}", product.sku, product.name)).with_page(page)
}

/// Pin/color rows from the `wire_colors` specification (a list of
/// `{pin, color}` objects), or the standard 8-wire coding.
fn wire_colors(specs: &ValueBag) -> Vec<Vec<String>> {
    let configured: Vec<Vec<String>> = specs
        .get("wire_colors")
        .and_then(SpecValue::as_list)
        .unwrap_or_default()
        .iter()
        .filter_map(|wire| match wire {
            SpecValue::Object(entry) => {
                let pin = entry.get("pin")?.to_display_string();
                let color = entry.get("color")?.to_display_string();
                Some(vec![pin, color])
            }
            _ => None,
        })
        .take(MAX_WIRES)
        .collect();
    if !configured.is_empty() {
        return configured;
    }
    DEFAULT_WIRE_COLORS
        .iter()
        .enumerate()
        .map(|(index, color)| vec![(index + 1).to_string(), (*color).to_string()])
        .collect()
}

fn with_cable<'a>(parts: &'a [PartNumber], cable: &str) -> Vec<&'a PartNumber> {
    parts
        .iter()
        .filter(|part| {
            part.variant_config
                .get("cable_type")
                .and_then(SpecValue::as_str)
                == Some(cable)
        })
        .collect()
}
