//! CSS and path queries against loaded documents.

use facet_testhelpers::test;
use papillote::xpath::Value;
use papillote::{Error, HtmlDocument, compile_selector};

const PAGE: &str = concat!(
    "<html><head><title>Shop</title></head><body>",
    r#"<h1 id="title" class="page-title">Products</h1>"#,
    r#"<ul id="products">"#,
    r#"<li class="item sale" data-sku="a-1">Apple</li>"#,
    r#"<li class="item" data-sku="b-2">Banana</li>"#,
    r#"<li class="item sale" data-sku="c-3">Cherry</li>"#,
    "</ul>",
    r#"<footer><p class="sm:flex">fine print</p></footer>"#,
    "</body></html>"
);

fn texts(doc: &HtmlDocument, css: &str) -> Vec<String> {
    doc.query_selector_all(css)
        .unwrap()
        .iter()
        .map(|id| doc.tree().text_content(id))
        .collect()
}

#[test]
fn test_type_selector_in_document_order() {
    let doc = HtmlDocument::from_html(PAGE);
    assert_eq!(texts(&doc, "li"), ["Apple", "Banana", "Cherry"]);
}

#[test]
fn test_type_and_id() {
    let doc = HtmlDocument::from_html(PAGE);
    let h1 = doc.query_selector("h1#title").unwrap().unwrap();
    assert_eq!(doc.tree().text_content(h1), "Products");
    assert_eq!(doc.query_selector("h2#title").unwrap(), None);
}

#[test]
fn test_zero_matches_is_empty() {
    let doc = HtmlDocument::from_html(PAGE);
    assert!(doc.query_selector_all(".does-not-exist").unwrap().is_empty());
    assert_eq!(doc.query_selector(".does-not-exist").unwrap(), None);
}

#[test]
fn test_child_combinator() {
    let doc = HtmlDocument::from_html(PAGE);
    assert_eq!(texts(&doc, "head > title"), ["Shop"]);
    assert!(doc.query_selector_all("html > title").unwrap().is_empty());
}

#[test]
fn test_descendant_compounds() {
    let doc = HtmlDocument::from_html(PAGE);
    assert_eq!(texts(&doc, "ul#products li.sale"), ["Apple", "Cherry"]);
    assert_eq!(texts(&doc, "body .item.sale"), ["Apple", "Cherry"]);
}

#[test]
fn test_attribute_and_escaped_class() {
    let doc = HtmlDocument::from_html(PAGE);
    assert_eq!(texts(&doc, "[data-sku^=b]"), ["Banana"]);
    assert_eq!(texts(&doc, r".sm\:flex"), ["fine print"]);
}

#[test]
fn test_scoped_to_element() {
    let doc = HtmlDocument::from_html(PAGE);
    let list = doc.query_selector("#products").unwrap().unwrap();

    let inside = doc.query_selector_all_in(list, "li:last-child").unwrap();
    assert_eq!(inside.len(), 1);
    assert_eq!(doc.tree().text_content(inside.first().unwrap()), "Cherry");

    // Strictly inside: the scope element itself never matches
    assert!(doc.query_selector_in(list, "ul").unwrap().is_none());
}

#[test]
fn test_sibling_combinators() {
    let doc = HtmlDocument::from_html(PAGE);
    assert_eq!(texts(&doc, "li.sale + li"), ["Banana"]);
    assert_eq!(texts(&doc, "li:first-child ~ li"), ["Banana", "Cherry"]);
}

#[test]
fn test_path_queries_bypass_compilation() {
    let doc = HtmlDocument::from_html(PAGE);
    let items = doc.xpath("//li[@data-sku = 'c-3']").unwrap();
    assert_eq!(items.len(), 1);

    let list = doc.query_selector("ul").unwrap().unwrap();
    assert_eq!(doc.query(list, "li[2]").unwrap().len(), 1);
    assert_eq!(
        doc.evaluate(list, "count(li[contains(@class, 'sale')])").unwrap(),
        Value::Number(2.0)
    );
}

#[test]
fn test_selector_syntax_errors() {
    let doc = HtmlDocument::from_html(PAGE);
    for css in ["", "li >", "p::before", "a:hover", "#a#b", "[x", "li,"] {
        let err = doc.query_selector_all(css).unwrap_err();
        assert!(
            matches!(err, Error::SelectorSyntax { .. }),
            "{css:?} gave {err:?}"
        );
    }
}

#[test]
fn test_path_syntax_error() {
    let doc = HtmlDocument::from_html(PAGE);
    let err = doc.xpath("//li[").unwrap_err();
    assert!(matches!(err, Error::PathSyntax { .. }));
}

#[test]
fn test_compile_selector_output() {
    assert_eq!(compile_selector("li").unwrap(), "descendant::li");
    assert_eq!(
        compile_selector("h1#title").unwrap(),
        "descendant::h1[attribute::id = 'title']"
    );
    assert_eq!(
        compile_selector("head > title").unwrap(),
        "descendant::head/child::title"
    );
}
