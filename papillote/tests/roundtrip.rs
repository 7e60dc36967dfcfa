//! Load/save roundtrip tests using datatest-stable.
//!
//! Each test case is an HTML file in `tests/roundtrip-cases/`. It is loaded
//! through the default pipeline (plus opaque `<script>` extraction) and saved
//! again; the output must match the input byte for byte.

use papillote::{HtmlDocument, LoadOptions};
use std::path::Path;

fn run_roundtrip_test(path: &Path) -> datatest_stable::Result<()> {
    facet_testhelpers::setup();

    let content = std::fs::read_to_string(path)?;
    let source = content.trim();

    let mut doc = HtmlDocument::with_options(LoadOptions::new().opaque_tag("script"));
    doc.load_html(source);
    let saved = doc
        .save_html()
        .map_err(|e| format!("save failed: {e}"))?;

    if saved.trim() != source {
        return Err(format!("Roundtrip failed!\nSource: {source}\nSaved:  {saved}").into());
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_roundtrip_test, root = "tests/roundtrip-cases", pattern = r".*\.html$" },
}
