use super::{Context, Transform};
use crate::Error;

/// Rewrites prefixed attribute names (`@click=`) to a parser-safe placeholder
/// (`x-on:click=`) and back.
///
/// Only `prefix` followed by a run of `[A-Za-z0-9_.-]` and then `=` is
/// touched, and only the prefix itself is replaced. Attribute values are left
/// alone.
#[derive(Debug, Clone)]
pub struct AttributePrefix {
    prefix: String,
    placeholder: String,
}

impl Default for AttributePrefix {
    fn default() -> Self {
        Self::new("@", "x-on:")
    }
}

impl AttributePrefix {
    pub fn new(prefix: &str, placeholder: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            placeholder: placeholder.to_string(),
        }
    }
}

impl Transform for AttributePrefix {
    fn name(&self) -> &'static str {
        "attribute-prefix"
    }

    fn encode(&mut self, source: &str, _cx: &Context) -> String {
        substitute_prefix(source, &self.prefix, &self.placeholder)
    }

    fn decode(&self, source: &str, _cx: &Context) -> Result<String, Error> {
        Ok(substitute_prefix(source, &self.placeholder, &self.prefix))
    }
}

fn is_attr_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-')
}

/// Replace `from` with `to` wherever `from` starts an `name=` token.
fn substitute_prefix(source: &str, from: &str, to: &str) -> String {
    if from.is_empty() || !source.contains(from) {
        return source.to_string();
    }

    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(found) = source[pos..].find(from) {
        let start = pos + found;
        let name_start = start + from.len();
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|&&b| is_attr_name_byte(b))
            .count();
        let eq = name_start + name_len;

        if name_len > 0 && bytes.get(eq) == Some(&b'=') {
            out.push_str(&source[copied..start]);
            out.push_str(to);
            out.push_str(&source[name_start..=eq]);
            copied = eq + 1;
            pos = eq + 1;
        } else {
            // Step past the first char of the match, staying on a char boundary
            pos = start + source[start..].chars().next().map_or(1, char::len_utf8);
        }
    }

    out.push_str(&source[copied..]);
    out
}
