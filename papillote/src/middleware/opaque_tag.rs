use super::{Context, Transform, find_ignore_ascii_case};
use crate::{Error, debug, warn};

/// Hides every `<tag ...>...</tag>` span from the parser behind a placeholder
/// comment, and puts the original bytes back on decode.
///
/// Use it for elements whose content the parser should never see: scripts with
/// markup-looking strings, client-side templates, embedded JSON. The tree only
/// holds a comment like
/// `<!-- <template replacement-tag="script" replacement-index="0"> -->`.
///
/// Extracted spans are stored in the transform and indexed by position. The
/// store only grows: loading more source into the same document appends to it,
/// and an index always refers to the same span for the lifetime of the
/// transform.
#[derive(Debug, Clone)]
pub struct OpaqueTag {
    tag: String,
    spans: Vec<String>,
}

impl OpaqueTag {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            spans: Vec::new(),
        }
    }

    /// The tag name this transform extracts.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Every span extracted so far, by index.
    pub fn spans(&self) -> &[String] {
        &self.spans
    }

    fn placeholder_prefix(&self) -> String {
        format!(
            "<!-- <template replacement-tag=\"{}\" replacement-index=\"",
            self.tag
        )
    }

    fn placeholder(&self, index: usize) -> String {
        format!("{}{}{}", self.placeholder_prefix(), index, PLACEHOLDER_SUFFIX)
    }

    /// Byte range of the next `<tag ...>...</tag>` span at or after `from`.
    fn next_span(&self, source: &str, from: usize) -> Option<(usize, usize)> {
        let open = format!("<{}", self.tag);
        let close = format!("</{}>", self.tag);
        let mut pos = from;
        loop {
            let start = pos + find_ignore_ascii_case(&source[pos..], &open)?;
            let after_name = start + open.len();
            let boundary = source[after_name..].chars().next()?;
            if !(boundary.is_ascii_whitespace() || boundary == '>' || boundary == '/') {
                pos = after_name;
                continue;
            }
            let gt = after_name + source[after_name..].find('>')?;
            let end_tag = gt + 1 + find_ignore_ascii_case(&source[gt + 1..], &close)?;
            return Some((start, end_tag + close.len()));
        }
    }
}

const PLACEHOLDER_SUFFIX: &str = "\"> -->";

impl Transform for OpaqueTag {
    fn name(&self) -> &'static str {
        "opaque-tag"
    }

    fn encode(&mut self, source: &str, _cx: &Context) -> String {
        let mut out = String::with_capacity(source.len());
        let mut pos = 0;
        let mut extracted = 0;

        while let Some((start, end)) = self.next_span(source, pos) {
            out.push_str(&source[pos..start]);
            out.push_str(&self.placeholder(self.spans.len()));
            self.spans.push(source[start..end].to_string());
            extracted += 1;
            pos = end;
        }
        out.push_str(&source[pos..]);

        debug!(
            "extracted {} <{}> spans ({} stored)",
            extracted,
            self.tag,
            self.spans.len()
        );
        out
    }

    fn decode(&self, source: &str, _cx: &Context) -> Result<String, Error> {
        let prefix = self.placeholder_prefix();
        let mut out = String::with_capacity(source.len());
        let mut pos = 0;
        let mut restored = 0;

        while let Some(found) = source[pos..].find(&prefix) {
            let start = pos + found;
            let digits_start = start + prefix.len();
            let digits_len = source[digits_start..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            let digits_end = digits_start + digits_len;

            if digits_len == 0 || !source[digits_end..].starts_with(PLACEHOLDER_SUFFIX) {
                out.push_str(&source[pos..digits_start]);
                pos = digits_start;
                continue;
            }

            let index: usize = source[digits_start..digits_end].parse().map_err(|_| {
                Error::InternalConsistency {
                    detail: format!("placeholder index for <{}> is out of range", self.tag),
                }
            })?;
            let Some(span) = self.spans.get(index) else {
                return Err(Error::InternalConsistency {
                    detail: format!(
                        "no stored <{}> span for placeholder index {} ({} stored)",
                        self.tag,
                        index,
                        self.spans.len()
                    ),
                });
            };

            out.push_str(&source[pos..start]);
            out.push_str(span);
            restored += 1;
            pos = digits_end + PLACEHOLDER_SUFFIX.len();
        }
        out.push_str(&source[pos..]);

        if restored < self.spans.len() {
            // Expected for fragments and for earlier loads into the same
            // document, but also what a removed placeholder looks like
            warn!(
                "restored {} of {} stored <{}> spans",
                restored,
                self.spans.len(),
                self.tag
            );
        }
        Ok(out)
    }
}
