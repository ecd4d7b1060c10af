use catalog_model::{SchemaField, SchemaGroup, SeriesSchemaDefinition};

/// Key of the synthetic section holding fields without a matching group.
pub const UNGROUPED_KEY: &str = "_ungrouped";

/// Fields rendered together under one section.
#[derive(Debug, Clone)]
pub struct FieldBucket<'a> {
    /// `None` for the synthetic ungrouped bucket.
    pub group: Option<&'a SchemaGroup>,
    pub fields: Vec<&'a SchemaField>,
}

impl FieldBucket<'_> {
    pub fn key(&self) -> &str {
        self.group.map_or(UNGROUPED_KEY, |group| group.key.as_str())
    }
}

/// Partition the schema's fields into one bucket per group, in group order,
/// followed by the ungrouped bucket when it is non-empty.
///
/// Every field lands in exactly one bucket. A field whose group key names no
/// declared group is ungrouped. When two groups share a key, the first one in
/// declaration order receives the fields.
pub fn partition_fields(schema: &SeriesSchemaDefinition) -> Vec<FieldBucket<'_>> {
    let groups = schema.ordered_groups();
    let mut buckets: Vec<FieldBucket<'_>> = groups
        .iter()
        .map(|group| FieldBucket {
            group: Some(*group),
            fields: Vec::new(),
        })
        .collect();
    let mut ungrouped = Vec::new();

    for field in &schema.fields {
        let owner = field.group.as_deref().and_then(|key| {
            let declared = schema.group(key)?;
            buckets
                .iter()
                .position(|bucket| bucket.group.is_some_and(|group| std::ptr::eq(group, declared)))
        });
        match owner {
            Some(index) => buckets[index].fields.push(field),
            None => ungrouped.push(field),
        }
    }

    if !ungrouped.is_empty() {
        buckets.push(FieldBucket {
            group: None,
            fields: ungrouped,
        });
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::FieldType;

    #[test]
    fn dangling_group_references_fall_into_ungrouped() {
        let schema = SeriesSchemaDefinition::new(
            vec![
                SchemaField::new("a", "A", FieldType::Text).in_group("physical"),
                SchemaField::new("b", "B", FieldType::Text).in_group("gone"),
                SchemaField::new("c", "C", FieldType::Text),
                SchemaField::new("d", "D", FieldType::Text).in_group("electrical"),
            ],
            vec![
                SchemaGroup::new("physical", "物理参数", 2),
                SchemaGroup::new("electrical", "电气参数", 1),
            ],
        );
        let buckets = partition_fields(&schema);
        let layout: Vec<(&str, Vec<&str>)> = buckets
            .iter()
            .map(|bucket| {
                (
                    bucket.key(),
                    bucket.fields.iter().map(|field| field.key.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            layout,
            vec![
                ("electrical", vec!["d"]),
                ("physical", vec!["a"]),
                (UNGROUPED_KEY, vec!["b", "c"]),
            ]
        );
    }

    #[test]
    fn ungrouped_bucket_is_omitted_when_empty() {
        let schema = SeriesSchemaDefinition::new(
            vec![SchemaField::new("a", "A", FieldType::Text).in_group("g")],
            vec![SchemaGroup::new("g", "G", 0)],
        );
        let buckets = partition_fields(&schema);
        assert_eq!(buckets.len(), 1);
        assert!(buckets[0].group.is_some());
    }
}
