//! Node markup, fragment elements, and tree edits through `HtmlDocument`.

use facet_testhelpers::test;
use papillote::dom::NodeKind;
use papillote::middleware::CustomVoidTags;
use papillote::serialize::SerializeOptions;
use papillote::{
    AttrValue, DoctypeMode, Error, HtmlDocument, count_root_nodes, css_classes, format_attribute,
    format_attributes, outer_markup,
};

#[test]
fn test_outer_html() {
    let mut doc = HtmlDocument::new();
    for html in [
        r#"<div><p class="paragraph">Hello</p></div>"#,
        "<div><p>Hello</p><p>Goodbye</p></div>",
        r#"<ul lang="en"><li>1</li><li>2</li></ul>"#,
        r#"<input type="text">"#,
    ] {
        let node = doc.create_element_from_html(html).unwrap();
        assert_eq!(doc.outer_html(node).unwrap(), html);
    }
}

#[test]
fn test_inner_html() {
    let mut doc = HtmlDocument::new();
    let cases = [
        ("<div>This is text content</div>", "This is text content"),
        (
            "<div><p>Hello</p><p>Goodbye</p></div>",
            "<p>Hello</p><p>Goodbye</p>",
        ),
        (r#"<input type="text">"#, ""),
    ];
    for (html, inner) in cases {
        let node = doc.create_element_from_html(html).unwrap();
        assert_eq!(doc.inner_html(node).unwrap(), inner);
    }
}

#[test]
fn test_void_markup_follows_document_mode() {
    let implied = HtmlDocument::from_html(r#"<input type="text">"#);
    let input = implied.query_selector("input").unwrap().unwrap();
    assert_eq!(implied.outer_html(input).unwrap(), r#"<input type="text">"#);

    let declared = HtmlDocument::from_html(r#"<!DOCTYPE html><input type="text">"#);
    let input = declared.query_selector("input").unwrap().unwrap();
    assert_eq!(declared.mode(), DoctypeMode::Declared);
    assert_eq!(declared.outer_html(input).unwrap(), r#"<input type="text" />"#);
    assert_eq!(
        outer_markup(declared.tree(), input, DoctypeMode::Implied),
        r#"<input type="text">"#
    );
}

#[test]
fn test_outer_html_restores_template_syntax() {
    let doc = HtmlDocument::from_html(
        r#"<!DOCTYPE html><nav @click.away="open = false"><x-logo size="sm"/><esi:include src="/menu" /></nav>"#,
    );
    let nav = doc.query_selector("nav").unwrap().unwrap();
    assert_eq!(
        doc.outer_html(nav).unwrap(),
        r#"<nav @click.away="open = false"><x-logo size="sm" /><esi:include src="/menu" /></nav>"#
    );
    assert_eq!(
        doc.inner_html(nav).unwrap(),
        r#"<x-logo size="sm" /><esi:include src="/menu" />"#
    );
}

#[test]
fn test_custom_void_markup_follows_document_mode() {
    let implied = HtmlDocument::from_html(r#"<div><x-icon name="star" /></div>"#);
    let icon = implied.query_selector("x-icon").unwrap().unwrap();
    assert_eq!(implied.outer_html(icon).unwrap(), r#"<x-icon name="star">"#);
    assert_eq!(
        outer_markup(implied.tree(), icon, DoctypeMode::Declared),
        r#"<x-icon name="star" />"#
    );

    let mut bare = HtmlDocument::new().without_middleware();
    bare.attach(CustomVoidTags);
    bare.load_html(r#"<!DOCTYPE html><div><x-icon name="star" /></div>"#);
    let icon = bare.query_selector("x-icon").unwrap().unwrap();
    assert_eq!(bare.outer_html(icon).unwrap(), r#"<x-icon name="star" />"#);
}

#[test]
fn test_attribute_added_to_custom_void_saves_cleanly() {
    let mut doc = HtmlDocument::from_html(r#"<div><x-icon name="star" /></div>"#);
    let icon = doc.query_selector("x-icon").unwrap().unwrap();
    doc.tree_mut().set_attr(icon, "class", "big").unwrap();
    assert_eq!(
        doc.save_html().unwrap(),
        r#"<html><head></head><body><div><x-icon name="star" class="big" /></div></body></html>"#
    );
}

#[test]
fn test_save_node_html() {
    let doc = HtmlDocument::from_html(r#"<p>a &amp; b <x-dot /></p>"#);
    let p = doc.query_selector("p").unwrap().unwrap();
    assert_eq!(doc.save_node_html(p).unwrap(), "<p>a &amp; b <x-dot /></p>");
}

#[test]
fn test_attribute_removal_shows_in_outer_html() {
    let mut doc = HtmlDocument::new();
    let div = doc
        .create_element_from_html(r#"<div id="one" class="two three"></div>"#)
        .unwrap();
    assert_eq!(
        doc.outer_html(div).unwrap(),
        r#"<div id="one" class="two three"></div>"#
    );

    doc.tree_mut().remove_attr(div, "id");
    assert_eq!(doc.outer_html(div).unwrap(), r#"<div class="two three"></div>"#);
}

#[test]
fn test_boolean_attribute_toggle() {
    let mut doc = HtmlDocument::new();
    let input = doc.create_element_from_html("<input>").unwrap();
    assert_eq!(doc.outer_html(input).unwrap(), "<input>");

    doc.tree_mut().set_attr(input, "checked", "").unwrap();
    assert_eq!(doc.outer_html(input).unwrap(), "<input checked>");

    doc.tree_mut().remove_attr(input, "checked");
    assert_eq!(doc.outer_html(input).unwrap(), "<input>");
}

#[test]
fn test_create_element_from_html() {
    let mut doc = HtmlDocument::new();
    let div = doc.create_element_from_html("<div>Hello</div>").unwrap();
    assert_eq!(doc.tree().tag_name(div), Some("div"));
    assert_eq!(doc.tree().text_content(div), "Hello");

    let err = doc.create_element_from_html("Foo<div>Bar</div>").unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));
}

#[test]
fn test_create_nodes_from_html() {
    let mut doc = HtmlDocument::new();
    let nodes = doc.create_nodes_from_html("<div></div><p></p>");
    assert_eq!(nodes.len(), 2);
    let tags: Vec<_> = nodes.iter().map(|n| doc.tree().tag_name(n)).collect();
    assert_eq!(tags, [Some("div"), Some("p")]);
    assert!(nodes.iter().all(|n| doc.tree().parent(n).is_none()));

    let nodes = doc.create_nodes_from_html("Foo<x-icon />Bar");
    assert_eq!(nodes.len(), 3);
    assert_eq!(doc.outer_html(nodes.get(1).unwrap()).unwrap(), "<x-icon>");
}

#[test]
fn test_save_with_sorted_attributes() {
    let doc = HtmlDocument::from_html(r#"<div><x-icon size="2" name="star" /></div>"#);
    let saved = doc
        .save_html_with(&SerializeOptions::new().sort_attributes())
        .unwrap();
    assert_eq!(
        saved,
        r#"<html><head></head><body><div><x-icon name="star" size="2" /></div></body></html>"#
    );
}

#[test]
fn test_replace_requires_parent() {
    let mut doc = HtmlDocument::from_html("<div><em>Item 1</em></div>");
    let detached = doc.create_element("span");
    let other = doc.create_element("b");
    let err = doc.replace(detached, other).unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));

    let em = doc.query_selector("em").unwrap().unwrap();
    let strong = doc.create_element_from_html("<strong>Item 1</strong>").unwrap();
    doc.replace(em, strong).unwrap();

    let div = doc.query_selector("div").unwrap().unwrap();
    assert_eq!(
        doc.outer_html(div).unwrap(),
        "<div><strong>Item 1</strong></div>"
    );
}

#[test]
fn test_map_recursive_swaps_elements() {
    let mut doc = HtmlDocument::from_html("<div><em>Item 1</em></div>");
    let div = doc.query_selector("div").unwrap().unwrap();

    doc.map_recursive(div, |tree, node| {
        if tree.tag_name(node) != Some("em") {
            return Some(node);
        }
        let strong = tree.create_element("strong");
        let text = tree.text_content(node);
        let text = tree.create_text(&text);
        tree.append_child(strong, text).ok()?;
        Some(strong)
    })
    .unwrap();

    assert_eq!(
        doc.outer_html(div).unwrap(),
        "<div><strong>Item 1</strong></div>"
    );
}

#[test]
fn test_map_recursive_skips_subtrees() {
    let source = "<div>
    <p>Here, every instance of <span>Foo</span> will be replaced with Bar, unless it is in a span tag.</p>
    <p>Here is a Foo, and then here is another <u>Foo</u>.</p>
</div>";
    let mut doc = HtmlDocument::from_html(source);
    let div = doc.query_selector("div").unwrap().unwrap();

    doc.map_recursive(div, |tree, node| {
        if tree.tag_name(node) == Some("span") {
            return None;
        }
        if let NodeKind::Text(text) = &tree.get(node).kind {
            let replaced = text.replace("Foo", "Bar");
            tree.set_text(node, &replaced).ok()?;
        }
        Some(node)
    })
    .unwrap();

    assert_eq!(
        doc.outer_html(div).unwrap(),
        "<div>
    <p>Here, every instance of <span>Foo</span> will be replaced with Bar, unless it is in a span tag.</p>
    <p>Here is a Bar, and then here is another <u>Bar</u>.</p>
</div>"
    );
}

#[test]
fn test_format_attribute_cases() {
    assert_eq!(format_attribute("foo", &AttrValue::Flag(true)), "foo");
    assert_eq!(format_attribute("foo", &vec!["bar baz"].into()), r#"foo="bar baz""#);
    assert_eq!(format_attribute("foo", &Vec::<String>::new().into()), r#"foo="""#);
    assert_eq!(format_attribute("foo", &true.into()), "foo");
    assert_eq!(format_attribute("foo", &false.into()), "");
    assert_eq!(format_attribute("foo", &"bar".into()), r#"foo="bar""#);
}

#[test]
fn test_format_attributes_cases() {
    assert_eq!(
        format_attributes([
            ("foo", AttrValue::from(true)),
            ("class", AttrValue::from(vec!["bar", "baz"])),
            ("hello", AttrValue::from("world")),
        ]),
        r#"foo class="bar baz" hello="world""#
    );
}

#[test]
fn test_count_root_nodes_cases() {
    assert_eq!(count_root_nodes("<div></div>"), 1);
    assert_eq!(count_root_nodes("<div></div><div></div>"), 2);
    assert_eq!(count_root_nodes("<div></div><div></div><div></div>"), 3);
    assert_eq!(count_root_nodes("Foo<div>Bar</div>Baz"), 3);
    assert_eq!(count_root_nodes("<input><button></button>"), 2);
}

#[test]
fn test_css_classes_cases() {
    assert_eq!(
        css_classes([("foo", true), ("bar", true), ("baz", false)]),
        "foo bar"
    );
}
