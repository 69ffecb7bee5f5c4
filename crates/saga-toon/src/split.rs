//! Quote-aware field splitting for comma-delimited rows.

/// Splits one line into trimmed fields.
///
/// The quote character toggles a quoted span and is never emitted. Inside a
/// span the delimiter is literal. An unterminated span simply runs to the end
/// of the line, and the final buffer is always emitted, so an empty line
/// yields a single empty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSplitter {
    pub delimiter: char,
    pub quote: char,
}

impl Default for FieldSplitter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl FieldSplitter {
    pub fn new(delimiter: char, quote: char) -> Self {
        Self { delimiter, quote }
    }

    pub fn split(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut quoted = false;

        for ch in line.chars() {
            if ch == self.quote {
                quoted = !quoted;
            } else if ch == self.delimiter && !quoted {
                fields.push(current.trim().to_string());
                current.clear();
            } else {
                current.push(ch);
            }
        }
        fields.push(current.trim().to_string());

        fields
    }
}

/// Split with the default comma delimiter and double-quote escape.
pub fn split_fields(line: &str) -> Vec<String> {
    FieldSplitter::default().split(line)
}
