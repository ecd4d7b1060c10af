//! Data sheet for the M8 Compact 4/6/8/10 port series.

use catalog_model::{Messages, Orientation, PartNumber};
use catalog_template::{Document, Node, RenderInput, TemplateMetadata, TextStyle};

use crate::blocks::{
    diagram, image_or_placeholder, page_container, part_number_group, schema_missing, section,
    spec_table, spec_text,
};

pub const TEMPLATE_ID: &str = "layout-m8-standard";

const VISIBLE_FIELDS: [(&str, &str); 5] = [
    ("voltage_rating", "额定电源 Ue"),
    ("working_voltage", "额定工作电压 Ue"),
    ("current_load", "电流负载能力"),
    ("total_current", "总电流"),
    ("ip_rating", "外壳防护等级"),
];

const PIN_CAPTION: &str = "Pin 1: +V | Pin 3: -V | Pin 4: ISO";

pub fn metadata() -> TemplateMetadata {
    TemplateMetadata::new(TEMPLATE_ID, "M8 Standard Layout")
        .with_description("M8 Compact series layout for 4/6/8/10 port products")
        .applicable_to(["M8-COMPACT-4-6", "M8-COMPACT-8-10"])
        .with_version("1.0.0")
        .multi_page(false)
        .with_orientation(Orientation::Portrait)
}

pub fn render(input: &RenderInput<'_>) -> Document {
    let messages = Messages::default();
    let product = &input.product.product;
    let specs = &product.specifications;
    let port_count = spec_text(specs, "port_count", "4");
    let title = format!("M8 Compact {port_count} Ports");

    let mut page = page_container(input, Orientation::Portrait, &title);
    page.push(Node::view(
        "product-header",
        vec![
            image_or_placeholder(product.asset("main_photo"), &product.name, &messages),
            Node::styled(product.name.clone(), TextStyle::Title),
            Node::text(format!(
                "M8 Compact {port_count} Ports, M12 Pre-Assembled Plug"
            )),
            Node::styled(spec_text(specs, "ip_rating", "IP67"), TextStyle::Label),
        ],
    ));

    if input.schema.is_empty() {
        tracing::warn!(sku = %product.sku, "series has no schema; data sheet shows a notice");
        page.push(schema_missing(&messages));
    } else {
        page.push(section(
            "Specification 规格参数",
            vec![spec_table(input.schema, specs, &VISIBLE_FIELDS, &messages)],
        ));
    }

    page.push(section(
        "LED Display LED显示",
        vec![
            Node::text("Power 电源 (Green 绿色)"),
            Node::text("Signal S1 信号 (Yellow 黄色)"),
        ],
    ));
    page.push(section(
        "Insert Arrangement 插入排列",
        vec![
            diagram("M8 Female", product.asset("connector_m8"), "3-pin", &messages),
            diagram("M12 Male", product.asset("connector_m12"), "8-pin", &messages),
        ],
    ));
    page.push(section(
        "Circuit Diagram 电路图",
        vec![
            diagram("NPN", product.asset("circuit_diagram_npn"), PIN_CAPTION, &messages),
            diagram("PNP", product.asset("circuit_diagram_pnp"), PIN_CAPTION, &messages),
        ],
    ));
    page.push(section(
        "Port Number 端口编号",
        part_number_groups(&product.part_numbers, &messages),
    ));

    Document::new(format!("{} {}", product.sku, product.name)).with_page(page)
}

/// NPN, PNP, then parts without a category or marked `NO_LED`.
fn part_number_groups(parts: &[PartNumber], messages: &Messages) -> Vec<Node> {
    let without: Vec<&PartNumber> = parts
        .iter()
        .filter(|part| matches!(part.category.as_deref(), None | Some("NO_LED")))
        .collect();

    let groups: Vec<Node> = [
        part_number_group("NPN", &in_category(parts, "NPN")),
        part_number_group("PNP", &in_category(parts, "PNP")),
        part_number_group("Without Component 无组件", &without),
    ]
    .into_iter()
    .flatten()
    .collect();
    if groups.is_empty() {
        vec![Node::styled(messages.no_data(), TextStyle::Muted)]
    } else {
        groups
    }
}

fn in_category<'a>(parts: &'a [PartNumber], wanted: &str) -> Vec<&'a PartNumber> {
    parts
        .iter()
        .filter(|part| part.category.as_deref() == Some(wanted))
        .collect()
}
