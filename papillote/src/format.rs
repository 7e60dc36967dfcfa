//! Attribute text formatting and fragment helpers.

use crate::dom;

/// The value half of an attribute being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Rendered quoted: `name="value"`
    Text(String),
    /// Space-joined and quoted: `class="a b"`
    List(Vec<String>),
    /// `true` renders the bare name, `false` drops the attribute
    Flag(bool),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Flag(value)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(values: Vec<&str>) -> Self {
        AttrValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        AttrValue::List(values)
    }
}

/// Render one attribute. Returns an empty string for `Flag(false)`.
///
/// ```
/// use papillote::format::{AttrValue, format_attribute};
///
/// assert_eq!(format_attribute("hidden", &AttrValue::Flag(true)), "hidden");
/// assert_eq!(format_attribute("class", &vec!["a", "b"].into()), r#"class="a b""#);
/// ```
pub fn format_attribute(name: &str, value: &AttrValue) -> String {
    match value {
        AttrValue::Flag(true) => name.to_string(),
        AttrValue::Flag(false) => String::new(),
        AttrValue::List(items) => format!("{name}=\"{}\"", escape_value(&items.join(" "))),
        AttrValue::Text(text) => format!("{name}=\"{}\"", escape_value(text)),
    }
}

/// Render attributes in the given order, separated by single spaces. Entries
/// that render empty are skipped.
pub fn format_attributes<I, N>(attrs: I) -> String
where
    I: IntoIterator<Item = (N, AttrValue)>,
    N: AsRef<str>,
{
    let mut out = String::new();
    for (name, value) in attrs {
        let rendered = format_attribute(name.as_ref(), &value);
        if rendered.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&rendered);
    }
    out
}

/// Number of top-level nodes `fragment` parses into, text nodes included.
pub fn count_root_nodes(fragment: &str) -> usize {
    dom::parse_fragment(fragment).roots.len()
}

/// Join the names of the enabled classes with spaces.
pub fn css_classes<I, S>(classes: I) -> String
where
    I: IntoIterator<Item = (S, bool)>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (class, enabled) in classes {
        if !enabled {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(class.as_ref());
    }
    out
}

fn escape_value(value: &str) -> String {
    if !value.contains(['&', '"']) {
        return value.to_string();
    }
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_attribute() {
        assert_eq!(format_attribute("foo", &AttrValue::Flag(true)), "foo");
        assert_eq!(format_attribute("foo", &vec!["bar baz"].into()), r#"foo="bar baz""#);
        assert_eq!(format_attribute("foo", &AttrValue::List(Vec::new())), r#"foo="""#);
        assert_eq!(format_attribute("foo", &false.into()), "");
        assert_eq!(format_attribute("foo", &"bar".into()), r#"foo="bar""#);
    }

    #[test]
    fn test_format_attribute_escapes_value() {
        assert_eq!(
            format_attribute("title", &r#"Tom & "Jerry""#.into()),
            r#"title="Tom &amp; &quot;Jerry&quot;""#
        );
    }

    #[test]
    fn test_format_attributes_keeps_order() {
        let attrs = [
            ("foo", AttrValue::Flag(true)),
            ("hidden", AttrValue::Flag(false)),
            ("class", vec!["bar", "baz"].into()),
            ("hello", "world".into()),
        ];
        assert_eq!(
            format_attributes(attrs),
            r#"foo class="bar baz" hello="world""#
        );
        assert_eq!(format_attributes(Vec::<(&str, AttrValue)>::new()), "");
    }

    #[test]
    fn test_count_root_nodes() {
        assert_eq!(count_root_nodes("<div></div>"), 1);
        assert_eq!(count_root_nodes("<div></div><div></div>"), 2);
        assert_eq!(count_root_nodes("<div></div><div></div><div></div>"), 3);
        assert_eq!(count_root_nodes("Foo<div>Bar</div>Baz"), 3);
        assert_eq!(count_root_nodes("<input><button></button>"), 2);
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(
            css_classes([("foo", true), ("bar", true), ("baz", false)]),
            "foo bar"
        );
    }
}
