//! Positional decoding of headerless BioMart TSV bodies.

use crate::annotation::attributes::{AttributeKind, AttributeSchema};

/// A decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(Option<i64>),
    Float(Option<f64>),
}

impl Value {
    fn decode(kind: AttributeKind, field: Option<&str>) -> Self {
        match kind {
            AttributeKind::Text => Value::Text(field.unwrap_or_default().to_string()),
            AttributeKind::Int => Value::Int(field.and_then(parse_int)),
            AttributeKind::Float => Value::Float(field.and_then(parse_float)),
        }
    }
}

fn parse_int(field: &str) -> Option<i64> {
    let field = field.trim();
    if let Ok(v) = field.parse::<i64>() {
        return Some(v);
    }
    // "12.0" style integers
    parse_float(field)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

fn parse_float(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One decoded line, addressable by attribute name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: AttributeSchema,
    values: Vec<Value>,
}

impl Row {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).and_then(|i| self.values.get(i))
    }

    /// Text value of an attribute; empty when absent.
    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Some(Value::Text(s)) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Int(v)) => *v,
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Value::Float(v)) => *v,
            _ => None,
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Split a TSV body into rows decoded against `schema`.
///
/// Lines are trimmed and whitespace-only lines dropped. Each remaining line
/// yields exactly one row: missing trailing fields decode as empty text or
/// `None`, surplus fields are ignored.
pub fn parse_rows(text: &str, schema: AttributeSchema) -> Vec<Row> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.split('\t');
            let values = schema
                .attributes()
                .iter()
                .map(|attr| Value::decode(attr.kind, fields.next()))
                .collect();
            Row { schema, values }
        })
        .collect()
}

/// A record type decoded from one TSV row.
pub trait TabularRecord: Sized {
    const SCHEMA: AttributeSchema;

    fn from_row(row: &Row) -> Self;
}

/// Decode a TSV body straight into typed records.
pub fn parse_records<T: TabularRecord>(text: &str) -> Vec<T> {
    parse_rows(text, T::SCHEMA).iter().map(T::from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::attributes::{Attribute, AttributeSchema};

    const SCHEMA: AttributeSchema = AttributeSchema::new(&[
        Attribute { name: "id", kind: AttributeKind::Text },
        Attribute { name: "start", kind: AttributeKind::Int },
        Attribute { name: "score", kind: AttributeKind::Float },
    ]);

    #[test]
    fn test_blank_lines_dropped() {
        let text = "\n  \nrs1\t5\t0.5\n\t \r\nrs2\t7\t0.1\n\n";
        let rows = parse_rows(text, SCHEMA);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("id"), "rs1");
        assert_eq!(rows[1].int("start"), Some(7));
    }

    #[test]
    fn test_crlf_lines() {
        let rows = parse_rows("rs1\t5\t0.25\r\nrs2\t6\t1\r\n", SCHEMA);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].float("score"), Some(0.25));
        assert_eq!(rows[1].float("score"), Some(1.0));
    }

    #[test]
    fn test_short_line_padded() {
        let rows = parse_rows("rs1\n", SCHEMA);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("id"), "rs1");
        assert_eq!(rows[0].int("start"), None);
        assert_eq!(rows[0].float("score"), None);
    }

    #[test]
    fn test_long_line_truncated() {
        let rows = parse_rows("rs1\t5\t0.5\textra\tmore", SCHEMA);
        assert_eq!(rows[0].values().len(), 3);
    }

    #[test]
    fn test_non_numeric_is_none() {
        let rows = parse_rows("rs1\tabc\tNaN", SCHEMA);
        assert_eq!(rows[0].int("start"), None);
        assert_eq!(rows[0].float("score"), None);
    }

    #[test]
    fn test_empty_inner_fields() {
        let rows = parse_rows("rs1\t\t0.5", SCHEMA);
        assert_eq!(rows[0].int("start"), None);
        assert_eq!(rows[0].float("score"), Some(0.5));
    }

    #[test]
    fn test_integral_float_as_int() {
        let rows = parse_rows("rs1\t12.0\t", SCHEMA);
        assert_eq!(rows[0].int("start"), Some(12));
    }

    #[test]
    fn test_unknown_name() {
        let rows = parse_rows("rs1\t1\t1", SCHEMA);
        assert!(rows[0].get("nope").is_none());
        assert_eq!(rows[0].text("nope"), "");
    }
}
