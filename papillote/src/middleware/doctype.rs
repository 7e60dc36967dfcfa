use super::{Context, DoctypeMode, Scope, Transform};
use crate::Error;

const HTML5_DOCTYPE: &str = "<!DOCTYPE html>";

/// Prepends `<!DOCTYPE html>` to sources that have no doctype, so the parser
/// never falls back to quirks mode, and strips it again when saving a document
/// whose original source had none.
///
/// For whole documents the decision is the load-time [`DoctypeMode`], so the
/// injected doctype is exactly the one decode strips. Fragments are checked
/// directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDoctype;

impl Transform for DefaultDoctype {
    fn name(&self) -> &'static str {
        "default-doctype"
    }

    fn encode(&mut self, source: &str, cx: &Context) -> String {
        let declared = match cx.scope {
            Scope::Document => cx.mode == DoctypeMode::Declared,
            Scope::Fragment => has_leading_doctype(source),
        };
        if declared {
            return source.to_string();
        }
        format!("{HTML5_DOCTYPE}{source}")
    }

    fn decode(&self, source: &str, cx: &Context) -> Result<String, Error> {
        if cx.scope == Scope::Document
            && cx.mode == DoctypeMode::Implied
            && let Some(rest) = source.strip_prefix(HTML5_DOCTYPE)
        {
            return Ok(rest.to_string());
        }
        Ok(source.to_string())
    }
}

/// Whether `source` opens with a `<!doctype` (case-insensitive), allowing
/// only whitespace and comments before it. A doctype anywhere else is one the
/// parser would ignore.
pub(super) fn has_leading_doctype(source: &str) -> bool {
    let mut rest = source;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if let Some(comment) = rest.strip_prefix("<!--") {
            match comment.find("-->") {
                Some(end) => rest = &comment[end + 3..],
                None => return false,
            }
            continue;
        }
        return rest
            .get(..9)
            .is_some_and(|open| open.eq_ignore_ascii_case("<!doctype"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injects_when_missing() {
        let mut t = DefaultDoctype;
        let cx = Context::document(DoctypeMode::Implied);
        assert_eq!(
            t.encode("<html><head><title>Test</title></head><body></body></html>", &cx),
            "<!DOCTYPE html><html><head><title>Test</title></head><body></body></html>"
        );
    }

    #[test]
    fn test_existing_doctype_is_kept() {
        let mut t = DefaultDoctype;
        let cx = Context::document(DoctypeMode::Declared);
        let src = "<!doctype html><p>x</p>";
        assert_eq!(t.encode(src, &cx), src);
        assert_eq!(
            t.decode("<!DOCTYPE html><p>x</p>", &cx).unwrap(),
            "<!DOCTYPE html><p>x</p>"
        );
    }

    #[test]
    fn test_strips_only_for_implied_documents() {
        let t = DefaultDoctype;
        let saved = "<!DOCTYPE html><html></html>";
        assert_eq!(
            t.decode(saved, &Context::document(DoctypeMode::Implied))
                .unwrap(),
            "<html></html>"
        );
        assert_eq!(
            t.decode(saved, &Context::fragment(DoctypeMode::Implied))
                .unwrap(),
            saved
        );
    }

    #[test]
    fn test_fragments_are_checked_directly() {
        let mut t = DefaultDoctype;
        let cx = Context::fragment(DoctypeMode::Declared);
        assert_eq!(t.encode("<p>x</p>", &cx), "<!DOCTYPE html><p>x</p>");
        assert_eq!(t.encode("<!doctype html><p>x</p>", &cx), "<!doctype html><p>x</p>");
    }

    #[test]
    fn test_leading_doctype_detection() {
        assert!(has_leading_doctype("<!DOCTYPE html><p>"));
        assert!(has_leading_doctype("\n  <!-- banner -->\n<!doctype html>"));
        assert!(!has_leading_doctype("<html><script>w('<!doctype html>')</script>"));
        assert!(!has_leading_doctype("<!-- unterminated <!doctype html>"));
        assert!(!has_leading_doctype("<!doc"));
    }
}
