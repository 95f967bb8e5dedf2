//! Output formatting for jsel
//!
//! Matches are printed one per line: pretty JSON by default, single-line JSON
//! with `-c`, and strings without quotes with `-r`.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::config::OutputConfig;

/// Writes matched nodes according to the output configuration
pub struct OutputWriter {
    config: OutputConfig,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Write one value followed by a newline
    pub fn write_value<W: Write>(&self, out: &mut W, value: &Value) -> io::Result<()> {
        match value {
            Value::String(s) if self.config.raw_output => writeln!(out, "{}", s),
            _ if self.config.compact => {
                serde_json::to_writer(&mut *out, value)?;
                writeln!(out)
            }
            _ => {
                let indent = " ".repeat(self.config.indent);
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut ser = serde_json::Serializer::with_formatter(&mut *out, formatter);
                value.serialize(&mut ser)?;
                writeln!(out)
            }
        }
    }

    /// Write every value in order
    pub fn write_values<'v, W, I>(&self, out: &mut W, values: I) -> io::Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'v Value>,
    {
        for value in values {
            self.write_value(out, value)?;
        }
        Ok(())
    }

    /// Render a value to a string, without the trailing newline
    pub fn format_value(&self, value: &Value) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_value(&mut buf, value)?;
        buf.pop();
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn writer(compact: bool, raw_output: bool, indent: usize) -> OutputWriter {
        OutputWriter::new(OutputConfig {
            compact,
            raw_output,
            indent,
        })
    }

    #[test]
    fn test_pretty_output() {
        let out = writer(false, false, 2)
            .format_value(&json!({"a": [1, 2]}))
            .unwrap();
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_custom_indent() {
        let out = writer(false, false, 4).format_value(&json!({"a": 1})).unwrap();
        assert_eq!(out, "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_compact_output() {
        let out = writer(true, false, 2)
            .format_value(&json!({"a": [1, 2], "b": "x"}))
            .unwrap();
        assert_eq!(out, r#"{"a":[1,2],"b":"x"}"#);
    }

    #[test]
    fn test_raw_output_only_affects_strings() {
        let raw = writer(false, true, 2);
        assert_eq!(raw.format_value(&json!("hi\tthere")).unwrap(), "hi\tthere");
        assert_eq!(raw.format_value(&json!(1.5)).unwrap(), "1.5");
        assert_eq!(raw.format_value(&json!(null)).unwrap(), "null");
        assert_eq!(
            writer(false, false, 2).format_value(&json!("hi")).unwrap(),
            "\"hi\""
        );
    }

    #[test]
    fn test_write_values() {
        let values = [json!(1), json!("two"), json!([3])];
        let mut out = Vec::new();
        writer(true, true, 2)
            .write_values(&mut out, values.iter())
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\ntwo\n[3]\n");
    }
}
