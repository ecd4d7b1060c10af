use catalog_ingest::CsvTable;
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,12}",
        "[a-z,\"\n\r ]{0,12}",
        Just(r#"{"power":"green"}"#.to_string()),
        Just("额定电源, 24V".to_string()),
    ]
}

proptest! {
    #[test]
    fn serialized_cells_parse_back_unchanged(
        rows in proptest::collection::vec(proptest::collection::vec(cell(), 3), 1..6)
    ) {
        // Rows that are entirely blank are dropped on parse; keep one
        // non-blank marker cell per row.
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                row.insert(0, format!("R{i}"));
                row
            })
            .collect();
        let mut table = CsvTable::new(vec![
            "SKU".to_string(),
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
        ]);
        for row in &rows {
            table.push_row(row.clone());
        }

        let text = table.to_csv_string().unwrap();
        let parsed = CsvTable::parse(&text).unwrap();
        prop_assert_eq!(parsed.headers, table.headers);
        prop_assert_eq!(parsed.rows, rows);
    }
}
