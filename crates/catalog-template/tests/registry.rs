use std::sync::Arc;

use catalog_model::{
    Messages, Product, ProductWithRelations, Series, SeriesCode, SeriesSchemaDefinition, Sku,
};
use catalog_template::{
    Document, Node, NoticeLevel, Page, ProductTemplate, RenderInput, TemplateError,
    TemplateMetadata, TemplateRegistry, TemplateRenderer,
};

fn labeled(label: &'static str) -> impl Fn(&RenderInput<'_>) -> Document + Send + Sync {
    move |input: &RenderInput<'_>| {
        let mut page = Page::from_layout(input.layout, Default::default(), input.page_number());
        page.push(Node::text(format!("{label}:{}", input.product.product.sku)));
        Document::new(label).with_page(page)
    }
}

fn product(template_id: Option<&str>) -> ProductWithRelations {
    let series = template_id.map(|id| {
        Series::new(SeriesCode::new("M8-COMPACT").unwrap(), "M8 Compact", id)
    });
    let series_id = series
        .as_ref()
        .map(|s| s.id)
        .unwrap_or_else(|| catalog_model::RecordId::derive("series", "none"));
    ProductWithRelations::new(
        Product::new(Sku::new("PROD-001").unwrap(), "A", series_id),
        series,
    )
}

fn registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    registry.register(TemplateMetadata::new("A", "Template A"), labeled("A"));
    registry.register(TemplateMetadata::new("B", "Template B"), labeled("B"));
    registry
}

fn rendered_by(registry: &TemplateRegistry, id: &str) -> Option<String> {
    let product = product(Some(id));
    let schema = SeriesSchemaDefinition::default();
    registry
        .resolve(id)
        .map(|resolved| resolved.render(&RenderInput::new(&product, &schema)).title)
}

#[test]
fn unknown_ids_resolve_to_the_fallback() {
    let mut registry = registry();
    registry.set_fallback("A").unwrap();

    let unknown = registry.resolve("unknown").unwrap();
    assert_eq!(unknown.id(), "A");
    assert!(unknown.used_fallback);
    assert_eq!(rendered_by(&registry, "unknown").as_deref(), Some("A"));

    let exact = registry.resolve("B").unwrap();
    assert_eq!(exact.id(), "B");
    assert!(!exact.used_fallback);
    assert_eq!(rendered_by(&registry, "B").as_deref(), Some("B"));
}

#[test]
fn without_fallback_unknown_ids_resolve_to_nothing() {
    let registry = registry();
    assert!(registry.resolve("unknown").is_none());
    let product = product(Some("unknown"));
    let schema = SeriesSchemaDefinition::default();
    assert_eq!(
        registry
            .render("unknown", &RenderInput::new(&product, &schema))
            .unwrap_err(),
        TemplateError::NotFound {
            id: "unknown".to_string()
        }
    );
}

#[test]
fn fallback_must_already_be_registered() {
    let mut registry = registry();
    assert_eq!(
        registry.set_fallback("C"),
        Err(TemplateError::NotRegistered {
            id: "C".to_string()
        })
    );
    assert_eq!(registry.fallback(), None);
}

#[test]
fn registering_twice_overwrites() {
    let mut registry = registry();
    registry.register(
        TemplateMetadata::new("A", "Template A v2").with_version("2.0.0"),
        labeled("A2"),
    );
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.metadata("A").map(|m| m.version.as_str()), Some("2.0.0"));
    assert_eq!(rendered_by(&registry, "A").as_deref(), Some("A2"));
}

#[test]
fn unregistering_the_fallback_clears_it() {
    let mut registry = registry();
    registry.set_fallback("A").unwrap();
    assert!(registry.unregister("A").is_some());
    assert_eq!(registry.fallback(), None);
    assert!(registry.resolve("A").is_none());
    assert!(registry.unregister("A").is_none());
}

#[test]
fn listing_is_sorted_by_id() {
    let mut registry = TemplateRegistry::new();
    let batch: Vec<(TemplateMetadata, Arc<dyn TemplateRenderer>)> = vec![
        (
            TemplateMetadata::new("zeta", "Z"),
            Arc::new(labeled("Z")) as Arc<dyn TemplateRenderer>,
        ),
        (
            TemplateMetadata::new("alpha", "A"),
            Arc::new(labeled("A")) as Arc<dyn TemplateRenderer>,
        ),
    ];
    registry.register_all(batch);
    let ids: Vec<&str> = registry.list().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
    assert!(registry.contains("zeta"));
    assert!(!registry.is_empty());
}

#[test]
fn unresolvable_products_get_an_error_panel() {
    let registry = registry();

    let missing_template = product(Some("layout-gone"));
    let ProductTemplate::Failed(document) =
        registry.resolve_for_product(&missing_template, Messages::default())
    else {
        panic!("expected an error panel");
    };
    assert_eq!(document.notices(), vec![(NoticeLevel::Error, "模板加载失败")]);

    let orphan = product(None);
    let document = registry.render_product(&orphan, None, Messages::default());
    assert_eq!(document.notices(), vec![(NoticeLevel::Error, "Schema未定义")]);
}

#[test]
fn products_render_with_their_series_template() {
    let registry = registry();
    let document = registry.render_product(&product(Some("B")), Some(2), Messages::default());
    assert_eq!(document.texts(), vec!["B:PROD-001"]);
    assert_eq!(document.pages[0].number, Some(2));
}

#[test]
fn registry_can_be_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TemplateRegistry>();

    let registry = Arc::new(registry());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || rendered_by(&registry, "B"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("B"));
    }
}
