use std::rc::Rc;

use super::*;
use crate::dom::{DOMContent, Document, ElementRef};
use crate::error::Error;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn child_count(node: &ElementRef, tag: &str) -> usize {
    node.borrow()
        .contents
        .iter()
        .filter(|content| matches!(content, DOMContent::Element(e) if e.borrow().name == tag))
        .count()
}

#[test]
fn test_appends_simple_elements_and_allows_chaining() {
    let doc = Document::new("body");
    let body = doc.root();
    body.append_select("h1").unwrap().text("Hello world");
    assert_eq!(doc.html(), "<h1>Hello world</h1>");
}

#[test]
fn test_selects_not_appends_on_second_reference() {
    let doc = Document::new("body");
    let body = doc.root();
    let first = body.append_select("h1").unwrap();
    first.text("Hello world");
    let second = body.append_select("h1").unwrap();
    second.text("Hiya").attr("width", "500");

    assert_eq!(child_count(&body.node().unwrap(), "h1"), 1);
    assert!(Rc::ptr_eq(&first.node().unwrap(), &second.node().unwrap()));
    assert_eq!(doc.html(), r#"<h1 width="500">Hiya</h1>"#);
}

#[test]
fn test_adds_classes_to_elements() {
    let doc = Document::new("body");
    let body = doc.root();
    let h1 = body.append_select("h1.title").unwrap();
    assert!(h1.node().unwrap().borrow().has_class("title"));
    let h4 = body.append_select("h4.subtitle.dek").unwrap();
    assert!(h4.node().unwrap().borrow().has_class("subtitle"));
    assert!(h4.node().unwrap().borrow().has_class("dek"));
}

#[test]
fn test_adds_id_to_elements() {
    let doc = Document::new("body");
    let body = doc.root();
    let h1 = body.append_select("h1#title").unwrap();
    assert_eq!(
        h1.node().unwrap().borrow().get_attribute("id"),
        Some(&"title".to_string())
    );
    assert_eq!(doc.html(), r#"<h1 id="title"></h1>"#);
}

#[test]
fn test_rejects_unsupported_selectors() {
    let doc = Document::new("body");
    let body = doc.root();

    let err = body.append_select("#44").unwrap_err();
    assert_eq!(err, Error::InvalidSelector("#44".to_string()));
    assert!(err.to_string().contains("\"#44\""));

    assert!(body.append_select(".title").is_err());
    assert!(body.append_select("div#id.cls").is_err());
    assert!(body.append_select("div > span").is_err());

    // A rejected selector never partially mutates the tree
    assert_eq!(doc.html(), "");
}

#[test]
fn test_zero_containers_is_a_noop() {
    let doc = Document::new("body");
    let body = doc.root();
    let none = body.select_all("figure");
    assert!(none.is_empty());

    // Vacuously satisfied, even for a selector the grammar rejects
    let result = none.append_select("#44").unwrap();
    assert!(result.is_empty());
    assert_eq!(doc.html(), "");
}

#[test]
fn test_per_container_independence() {
    let doc = Document::new("body");
    let body = doc.root();
    let divs = body.select_all("div").data(&[(), ()]).join("div");

    // Seed only the first container with a matching child
    let first = divs.node().unwrap();
    Selection::single(first.clone()).append("p");
    let seeded = Selection::single(first.clone()).select("p").node().unwrap();

    let result = divs.append_select("p").unwrap();
    assert_eq!(result.len(), 2);
    for container in divs.nodes() {
        assert_eq!(child_count(&container, "p"), 1);
    }
    // The pre-existing child survives with its identity intact
    assert!(Rc::ptr_eq(&result.nodes()[0], &seeded));
}

fn draw_figures(body: &Selection, items: &[&str]) {
    let div = body.append_select("div").unwrap();
    let figures = div.select_all("figure").data(items).join("figure");
    figures
        .append_select("img")
        .unwrap()
        .attr_with("src", |i| items[i].to_string());
}

fn expected_figures(items: &[&str]) -> String {
    let figures: String = items
        .iter()
        .map(|item| format!("<figure><img src=\"{}\"></img></figure>", item))
        .collect();
    format!("<div>{}</div>", figures)
}

#[test]
fn test_appends_elements_after_data_bound_joins() {
    init_tracing();
    let doc = Document::new("body");
    let body = doc.root();
    let items = ["1", "2", "3"];

    draw_figures(&body, &items);
    draw_figures(&body, &items);

    assert_eq!(doc.html(), expected_figures(&items));
}

#[test]
fn test_rerender_stability_across_varying_lengths() {
    let doc = Document::new("body");
    let body = doc.root();

    draw_figures(&body, &["1", "2", "3"]);
    let img = body.select("img").node().unwrap();

    for items in [
        vec!["1"],
        vec!["1", "2"],
        vec!["1", "2", "3"],
    ] {
        draw_figures(&body, &items);
        assert_eq!(doc.html(), expected_figures(&items));
    }

    // The first item was never removed, so its nested content survived
    // every re-render with identity intact
    assert!(Rc::ptr_eq(&img, &body.select("img").node().unwrap()));
}

struct User {
    pic: &'static str,
    name: &'static str,
}

fn draw_users(body: &Selection, users_data: &[User]) {
    let users = body.select_all("div.user").data(users_data).join("div");
    users.attr("class", "user");
    users
        .append_select("img")
        .unwrap()
        .attr_with("src", |i| users_data[i].pic.to_string());
    users
        .append_select("div")
        .unwrap()
        .text_with(|i| users_data[i].name.to_string());
}

#[test]
fn test_appends_peer_elements_after_data_bound_joins() {
    init_tracing();
    let doc = Document::new("body");
    let body = doc.root();
    let users_data = [
        User {
            pic: "https://img1",
            name: "George Washington",
        },
        User {
            pic: "https://img2",
            name: "Thomas Jefferson",
        },
    ];

    draw_users(&body, &users_data);
    draw_users(&body, &users_data);
    draw_users(&body, &users_data);

    assert_eq!(
        doc.html(),
        "<div class=\"user\"><img src=\"https://img1\"></img><div>George Washington</div></div>\
         <div class=\"user\"><img src=\"https://img2\"></img><div>Thomas Jefferson</div></div>"
    );
}

#[test]
fn test_selector_functions_compose_with_selection() {
    // The parser and validator are usable on their own, one level below
    // the append path
    let descriptor = crate::selector::parse("h1.title");
    assert_eq!(descriptor.tag_name.as_deref(), Some("h1"));
    assert!(crate::selector::is_supported("h1.title"));

    let doc = Document::new("body");
    let h1 = doc.root().append_select("h1.title").unwrap();
    assert_eq!(h1.node().unwrap().borrow().name, "h1");
    assert_eq!(
        h1.node().unwrap().borrow().get_attribute("class"),
        Some(&"title".to_string())
    );
}
