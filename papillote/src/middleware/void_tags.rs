use super::{Context, Transform};
use crate::Error;
use crate::dom::is_void_element;

/// Attribute that marks an element the author wrote self-closing.
///
/// Its value records the whitespace the author put before the `/`: `"true"`
/// for a single space, `"compact"` for none, otherwise the whitespace itself.
pub const VOID_TAG_MARKER: &str = "data-is-void-tag";

const MARKER_START: &str = " data-is-void-tag=\"";

/// Keeps self-closing custom tags (`<x-icon name="a" />`) from swallowing
/// their following siblings.
///
/// The HTML5 parser ignores the `/` of a self-closing tag unless the tag is one
/// of the built-in void elements, so `<x-icon />` would open an element that
/// stays open until its parent closes. Encoding turns it into an explicitly
/// closed element carrying [`VOID_TAG_MARKER`]; decoding collapses marked,
/// empty elements back to the exact self-closing spelling they came from.
///
/// Built-in void elements (`<br/>`, `<img .../>`) are left alone: the parser
/// already handles them, and the synthetic `</br>` would be read as a second
/// `<br>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomVoidTags;

/// The whitespace before `/>` that a marker value stands for, or `None` when
/// the value is not one [`CustomVoidTags`] writes.
pub(crate) fn marker_gap(value: &str) -> Option<&str> {
    match value {
        "true" => Some(" "),
        "compact" => Some(""),
        ws if !ws.is_empty() && ws.bytes().all(|b| b.is_ascii_whitespace()) => Some(ws),
        _ => None,
    }
}

fn marker_value(gap: &str) -> &str {
    match gap {
        " " => "true",
        "" => "compact",
        ws => ws,
    }
}

impl Transform for CustomVoidTags {
    fn name(&self) -> &'static str {
        "custom-void-tags"
    }

    fn encode(&mut self, source: &str, _cx: &Context) -> String {
        rewrite_tags(source, |tag, rest| {
            let inner = rest.strip_suffix('/')?;
            if is_void_element(tag.name) {
                return None;
            }
            let attrs = inner.trim_end();
            let gap = &inner[attrs.len()..];
            Some(format!(
                "<{name}{attrs}{MARKER_START}{value}\"></{name}>",
                name = tag.name,
                value = marker_value(gap),
            ))
        })
    }

    fn decode(&self, source: &str, _cx: &Context) -> Result<String, Error> {
        Ok(rewrite_tags(source, |tag, rest| {
            let marker_at = rest.rfind(MARKER_START)?;
            let value_start = marker_at + MARKER_START.len();
            let value_end = value_start + rest[value_start..].find('"')?;
            let gap = marker_gap(&rest[value_start..value_end])?;
            let attrs = [&rest[..marker_at], &rest[value_end + 1..]].concat();

            let after = &tag.source[tag.end..];
            let close = after.strip_prefix("</")?;
            let name_len = tag.name.len();
            let close_name = close.get(..name_len)?;
            if !close_name.eq_ignore_ascii_case(tag.name) || !close[name_len..].starts_with('>') {
                return None;
            }
            let consumed = 2 + name_len + 1;
            Some((format!("<{}{}{}/>", tag.name, attrs, gap), consumed))
        }))
    }
}

/// An opening tag found by [`rewrite_tags`].
struct TagMatch<'a> {
    source: &'a str,
    name: &'a str,
    /// Byte offset just past the tag's `>`
    end: usize,
}

/// Lets encode closures return a plain replacement and decode closures a
/// replacement plus the number of extra bytes consumed after the tag.
trait Replacement {
    fn into_parts(self) -> (String, usize);
}

impl Replacement for String {
    fn into_parts(self) -> (String, usize) {
        (self, 0)
    }
}

impl Replacement for (String, usize) {
    fn into_parts(self) -> (String, usize) {
        self
    }
}

/// Visit every `<name ...>` where name is `[A-Za-z0-9-]+`, handing the
/// callback the text between the name and the first following `>`.
fn rewrite_tags<R, F>(source: &str, mut replace: F) -> String
where
    R: Replacement,
    F: FnMut(&TagMatch<'_>, &str) -> Option<R>,
{
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(found) = source[pos..].find('<') {
        let start = pos + found;
        let name_start = start + 1;
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-')
            .count();
        pos = name_start;
        if name_len == 0 {
            continue;
        }
        let name_end = name_start + name_len;
        let Some(gt) = source[name_end..].find('>') else {
            break;
        };
        let gt = name_end + gt;

        let tag = TagMatch {
            source,
            name: &source[name_start..name_end],
            end: gt + 1,
        };
        if let Some(replacement) = replace(&tag, &source[name_end..gt]) {
            let (text, consumed) = replacement.into_parts();
            out.push_str(&source[copied..start]);
            out.push_str(&text);
            copied = tag.end + consumed;
            pos = copied;
        }
    }

    out.push_str(&source[copied..]);
    out
}
