use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};

use catalog_map::clean_header;

use crate::error::CsvError;

/// A parsed comma-separated table: the first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Parse UTF-8 text. Header cells are trimmed; data cells are kept
    /// verbatim. Rows whose cells are all blank are dropped.
    pub fn parse(text: &str) -> Result<Self, CsvError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut records = reader.records();

        let headers = match records.next() {
            Some(record) => record
                .map_err(parse_error)?
                .iter()
                .map(|cell| clean_header(cell).to_string())
                .collect::<Vec<_>>(),
            None => return Err(CsvError::MissingHeader),
        };
        if headers.iter().all(String::is_empty) {
            return Err(CsvError::MissingHeader);
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(parse_error)?;
            let row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(row);
        }
        Ok(Self { headers, rows })
    }

    /// Index of the first header equal to any of `names`.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| names.contains(&header.as_str()))
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Serialize with minimal quoting: cells containing a comma, a quote or a
    /// line break are quoted, with embedded quotes doubled.
    pub fn to_csv_string(&self) -> Result<String, CsvError> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| CsvError::Io(err.into_error()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn parse_error(source: csv::Error) -> CsvError {
    let line = source.position().map_or(0, csv::Position::line);
    CsvError::Parse { line, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_only_when_needed() {
        let mut table = CsvTable::new(vec!["SKU".to_string(), "LED".to_string()]);
        table.push_row(vec!["A-1".to_string(), r#"{"power":"green","signal":"yellow"}"#.to_string()]);
        table.push_row(vec!["A-2".to_string(), "line one\nline two".to_string()]);
        insta::assert_snapshot!(table.to_csv_string().unwrap(), @r#"
        SKU,LED
        A-1,"{""power"":""green"",""signal"":""yellow""}"
        A-2,"line one
        line two"
        "#);
    }

    #[test]
    fn parses_quoted_cells_and_skips_blank_rows() {
        let text = "\u{feff}SKU , 描述\nA-1,\"a, b\"\n,\nA-2,\"say \"\"hi\"\"\"\n";
        let table = CsvTable::parse(text).unwrap();
        assert_eq!(table.headers, vec!["SKU", "描述"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["A-1".to_string(), "a, b".to_string()],
                vec!["A-2".to_string(), "say \"hi\"".to_string()],
            ]
        );
        assert_eq!(table.column(&["描述", "Description"]), Some(1));
        assert_eq!(table.column(&["状态"]), None);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(CsvTable::parse(""), Err(CsvError::MissingHeader)));
    }
}
