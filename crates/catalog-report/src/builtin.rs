use std::sync::Arc;

use catalog_template::{TemplateError, TemplateMetadata, TemplateRegistry, TemplateRenderer};

use crate::{m8_distributor, m8_standard};

/// Template used for unknown ids unless configured otherwise.
pub const DEFAULT_FALLBACK: &str = m8_standard::TEMPLATE_ID;

/// Metadata and renderer of every built-in template.
pub fn builtin_templates() -> Vec<(TemplateMetadata, Arc<dyn TemplateRenderer>)> {
    vec![
        (
            m8_standard::metadata(),
            Arc::new(m8_standard::render) as Arc<dyn TemplateRenderer>,
        ),
        (
            m8_distributor::metadata(),
            Arc::new(m8_distributor::render) as Arc<dyn TemplateRenderer>,
        ),
    ]
}

/// Register the built-in templates and make `fallback` the template for
/// unknown ids. Run once at startup.
pub fn register_builtin_templates(
    registry: &mut TemplateRegistry,
    fallback: &str,
) -> Result<(), TemplateError> {
    registry.register_all(builtin_templates());
    registry.set_fallback(fallback)
}

/// A registry holding only the built-in templates.
pub fn builtin_registry(fallback: Option<&str>) -> Result<TemplateRegistry, TemplateError> {
    let mut registry = TemplateRegistry::new();
    register_builtin_templates(&mut registry, fallback.unwrap_or(DEFAULT_FALLBACK))?;
    Ok(registry)
}
