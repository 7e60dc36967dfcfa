use super::{Context, Transform};
use crate::Error;

/// Keeps XML-style namespaced tag names (`<esi:include />`) intact by spelling
/// the colon as `--` while the document is parsed.
///
/// Open and close tags are rewritten independently. Both halves of the name
/// must be ASCII letters and the tag must be closed by a `>` somewhere later;
/// everything after the name is copied as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacedTags;

impl Transform for NamespacedTags {
    fn name(&self) -> &'static str {
        "namespaced-tags"
    }

    fn encode(&mut self, source: &str, _cx: &Context) -> String {
        swap_separator(source, ":", "--")
    }

    fn decode(&self, source: &str, _cx: &Context) -> Result<String, Error> {
        Ok(swap_separator(source, "--", ":"))
    }
}

fn letters(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_alphabetic()).count()
}

/// Rewrite `<a{from}b` and `</a{from}b` tag names to use `to`.
fn swap_separator(source: &str, from: &str, to: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(found) = source[pos..].find('<') {
        let start = pos + found;
        pos = start + 1;

        let prefix_start = if bytes.get(start + 1) == Some(&b'/') {
            start + 2
        } else {
            start + 1
        };
        let prefix_len = letters(&bytes[prefix_start.min(bytes.len())..]);
        if prefix_len == 0 {
            continue;
        }
        let sep = prefix_start + prefix_len;
        if !source[sep..].starts_with(from) {
            continue;
        }
        let local_start = sep + from.len();
        if letters(&bytes[local_start..]) == 0 {
            continue;
        }
        let Some(gt) = source[local_start..].find('>') else {
            break;
        };

        out.push_str(&source[copied..sep]);
        out.push_str(to);
        copied = local_start;
        pos = local_start + gt + 1;
    }

    out.push_str(&source[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::DoctypeMode;

    fn cx() -> Context {
        Context::document(DoctypeMode::Implied)
    }

    #[test]
    fn test_encode_open_and_close_tags() {
        let mut t = NamespacedTags;
        assert_eq!(
            t.encode(r#"<esi:include src="/nav" />"#, &cx()),
            r#"<esi--include src="/nav" />"#
        );
        assert_eq!(
            t.encode("<fb:like>x</fb:like>", &cx()),
            "<fb--like>x</fb--like>"
        );
    }

    #[test]
    fn test_requires_letters_on_both_sides() {
        let mut t = NamespacedTags;
        for src in ["<a1:b>", "<a:1b>", "<:b>", "<p>time 10:30</p>", "<a:b"] {
            assert_eq!(t.encode(src, &cx()), src, "{src} should be untouched");
        }
    }

    #[test]
    fn test_attribute_colons_untouched() {
        let mut t = NamespacedTags;
        let src = r##"<svg xlink:href="#a" x-on:click="go()"></svg>"##;
        assert_eq!(t.encode(src, &cx()), src);
    }

    #[test]
    fn test_roundtrip() {
        let mut t = NamespacedTags;
        let src = r#"<body><esi:include src="a" /><esi:remove><p>x</p></esi:remove></body>"#;
        let encoded = t.encode(src, &cx());
        assert!(!encoded.contains("esi:"));
        assert_eq!(t.decode(&encoded, &cx()).unwrap(), src);
    }
}
