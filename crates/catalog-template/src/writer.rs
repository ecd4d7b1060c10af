use std::io::Write;

use anyhow::Result;

use crate::document::Document;

/// Turns a document tree into one binary artifact.
pub trait DocumentWriter {
    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;

    fn file_extension(&self) -> &'static str;

    fn write(&self, document: &Document, out: &mut dyn Write) -> Result<()>;

    fn to_bytes(&self, document: &Document) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(document, &mut bytes)?;
        Ok(bytes)
    }
}
