use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::selection::Selection;
use crate::selector::Selector;

/// Shared handle to a live element. Node identity is handle identity
/// ([`Rc::ptr_eq`]); the tree owns nothing beyond these handles.
pub type ElementRef = Rc<RefCell<DOMElement>>;

#[derive(Debug, Eq, PartialEq)]
pub struct DOMElement {
    pub name: String,
    pub attributes: DOMAttributes,
    pub contents: Vec<DOMContent>,
}

#[derive(Debug, Eq, PartialEq)]
pub enum DOMContent {
    Element(ElementRef),
    Text(String),
}

#[derive(Debug, Eq, PartialEq, Default)]
pub struct DOMAttributes(pub HashMap<String, String>);

impl DOMAttributes {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }
}

#[macro_export]
macro_rules! attributes {
    ($($name:ident => $value:expr),* $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(map.insert(stringify!($name).to_string(), $value.to_string());)*
        $crate::dom::DOMAttributes(map)
    }};
}

impl DOMElement {
    pub fn new(
        name: impl Display,
        attributes: Option<DOMAttributes>,
        contents: Vec<DOMContent>,
    ) -> Self {
        Self {
            name: name.to_string(),
            attributes: attributes.unwrap_or_default(),
            contents,
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&String> {
        self.attributes.0.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.0.insert(name.into(), value.into());
    }

    /// Check if the `class` attribute is present and contains the specified class
    pub fn has_class(&self, class: &str) -> bool {
        self.attributes
            .0
            .get("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Check if the `id` attribute exists and is an exact match for the provided ID
    pub fn id_is(&self, id: &str) -> bool {
        self.attributes.0.get("id").map(|c| c == id).unwrap_or(false)
    }

    /// Add or remove a single class in the whitespace-separated `class` attribute
    pub fn set_class(&mut self, class: &str, on: bool) {
        let current = self.attributes.0.get("class").cloned().unwrap_or_default();
        let mut classes: Vec<&str> = current.split_whitespace().collect();
        if on {
            if !classes.contains(&class) {
                classes.push(class);
            }
        } else {
            classes.retain(|c| *c != class);
        }
        if classes.is_empty() {
            self.attributes.0.remove("class");
        } else {
            self.attributes.0.insert("class".to_string(), classes.join(" "));
        }
    }

    /// Check if the provided [`Selector`] selects this element. An empty
    /// selector selects nothing.
    pub fn matches(&self, selector: &Selector) -> bool {
        if selector.is_empty() {
            return false;
        }
        selector.tag_name.as_ref().map_or(true, |t| &self.name == t)
            && selector.id.as_ref().map_or(true, |id| self.id_is(id))
            && selector.classes.iter().all(|c| self.has_class(c))
    }
}

impl From<DOMElement> for DOMContent {
    fn from(element: DOMElement) -> Self {
        DOMContent::Element(Rc::new(RefCell::new(element)))
    }
}

impl From<&str> for DOMContent {
    fn from(text: &str) -> Self {
        DOMContent::Text(text.to_string())
    }
}

impl From<String> for DOMContent {
    fn from(text: String) -> Self {
        DOMContent::Text(text)
    }
}

// Not HTML5-exact output: every element gets a closing tag and nothing is
// escaped. Attributes are written in lexical name order so serialized
// trees are stable across runs.
impl Display for DOMElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        let mut attrs: Vec<_> = self.attributes.0.iter().collect();
        attrs.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in attrs {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        write!(f, ">")?;
        for content in &self.contents {
            write!(f, "{}", content)?;
        }
        write!(f, "</{}>", self.name)
    }
}

impl Display for DOMContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DOMContent::Element(element) => write!(f, "{}", element.borrow()),
            DOMContent::Text(text) => f.write_str(text),
        }
    }
}

/// Owns the root of a document tree and hands out selections over it.
pub struct Document {
    root: ElementRef,
}

impl Document {
    pub fn new(root_tag: impl Display) -> Self {
        Self {
            root: Rc::new(RefCell::new(DOMElement::new(root_tag, None, vec![]))),
        }
    }

    /// A selection holding the root as its only container
    pub fn root(&self) -> Selection {
        Selection::single(self.root.clone())
    }

    /// The serialized contents of the root, without the root tag itself
    pub fn html(&self) -> String {
        self.root
            .borrow()
            .contents
            .iter()
            .map(|content| content.to_string())
            .collect()
    }
}

#[cfg(test)]
#[test]
fn test_serialize() {
    let element = DOMElement::new(
        "div",
        Some(attributes!(class => "user", id => "main")),
        vec![
            DOMElement::new("img", None, vec![]).into(),
            "some text".into(),
        ],
    );
    assert_eq!(
        element.to_string(),
        r#"<div class="user" id="main"><img></img>some text</div>"#
    );
}

#[cfg(test)]
#[test]
fn test_matches() {
    let element = DOMElement::new(
        "h4",
        Some(attributes!(class => "subtitle dek", id => "lede")),
        vec![],
    );
    assert!(element.matches(&Selector {
        tag_name: Some("h4".to_string()),
        ..Default::default()
    }));
    assert!(element.matches(&Selector {
        classes: vec!["dek".to_string(), "subtitle".to_string()],
        ..Default::default()
    }));
    assert!(element.matches(&Selector {
        id: Some("lede".to_string()),
        ..Default::default()
    }));
    assert!(!element.matches(&Selector {
        tag_name: Some("h4".to_string()),
        classes: vec!["missing".to_string()],
        ..Default::default()
    }));
    assert!(!element.matches(&Selector::default()));
}

#[cfg(test)]
#[test]
fn test_set_class() {
    let mut element = DOMElement::new("div", None, vec![]);
    element.set_class("wide", true);
    element.set_class("tall", true);
    element.set_class("wide", true);
    assert_eq!(element.get_attribute("class"), Some(&"wide tall".to_string()));
    element.set_class("wide", false);
    assert_eq!(element.get_attribute("class"), Some(&"tall".to_string()));
    element.set_class("tall", false);
    assert_eq!(element.get_attribute("class"), None);
}
