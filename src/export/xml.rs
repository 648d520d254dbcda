use std::io::Write;

use super::{ExportResult, Exporter, InvoiceRecord, value_text};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Generic `<Invoice>` document with one child element per field.
pub struct XmlExporter;

impl Exporter for XmlExporter {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn write(&self, record: &InvoiceRecord, out: &mut dyn Write) -> ExportResult<()> {
        writeln!(out, "{XML_DECLARATION}")?;
        write!(out, "<Invoice>")?;
        for (key, value) in record {
            let tag = element_name(key);
            write!(out, "<{tag}>{}</{tag}>", escape_text(&value_text(value)))?;
        }
        writeln!(out, "</Invoice>")?;
        Ok(())
    }
}

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Maps a field name onto a valid XML element name.
pub fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_ok {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::sample_record;
    use serde_json::json;

    #[test]
    fn test_xml_document() {
        let mut buf = Vec::new();
        XmlExporter.write(&sample_record(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with(XML_DECLARATION));
        assert!(text.contains("<invoice_number>INV-2024-001</invoice_number>"));
        assert!(text.contains("<amount>1500.0</amount>"));
        assert!(text.trim_end().ends_with("</Invoice>"));
    }

    #[test]
    fn test_xml_escapes_text() {
        let mut record = sample_record();
        record.insert("customer".into(), json!("Smith & <Jones>"));

        let mut buf = Vec::new();
        XmlExporter.write(&record, &mut buf).unwrap();
        assert!(
            String::from_utf8(buf)
                .unwrap()
                .contains("<customer>Smith &amp; &lt;Jones&gt;</customer>")
        );
    }

    #[test]
    fn test_element_name_sanitizing() {
        assert_eq!(element_name("due_date"), "due_date");
        assert_eq!(element_name("tax rate"), "tax_rate");
        assert_eq!(element_name("1st"), "_1st");
        assert_eq!(element_name(""), "_");
    }
}
