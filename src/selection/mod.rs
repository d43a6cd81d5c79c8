use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{DOMContent, DOMElement, ElementRef};
use crate::selector::{parse, Selector};

/// An ordered view over zero or more live containers in a document tree.
///
/// Containers are grouped under the parent node they were queried from;
/// a single container is simply a one-group, one-node selection.
/// Selections are transient views: they own no nodes and are recomputed
/// by each query.
#[derive(Clone, Debug)]
pub struct Selection {
    groups: Vec<Group>,
}

#[derive(Clone, Debug)]
struct Group {
    parent: ElementRef,
    nodes: Vec<ElementRef>,
}

/// First matching descendant of `node` in preorder, if any
fn first_match(node: &ElementRef, selector: &Selector) -> Option<ElementRef> {
    for content in &node.borrow().contents {
        if let DOMContent::Element(child) = content {
            if child.borrow().matches(selector) {
                return Some(child.clone());
            }
            if let Some(found) = first_match(child, selector) {
                return Some(found);
            }
        }
    }
    None
}

/// All matching descendants of `node` in preorder
fn collect_matches(node: &ElementRef, selector: &Selector, found: &mut Vec<ElementRef>) {
    for content in &node.borrow().contents {
        if let DOMContent::Element(child) = content {
            if child.borrow().matches(selector) {
                found.push(child.clone());
            }
            collect_matches(child, selector, found);
        }
    }
}

fn append_child(parent: &ElementRef, tag: &str) -> ElementRef {
    let child = Rc::new(RefCell::new(DOMElement::new(tag, None, vec![])));
    parent
        .borrow_mut()
        .contents
        .push(DOMContent::Element(child.clone()));
    child
}

fn remove_child(parent: &ElementRef, child: &ElementRef) {
    parent.borrow_mut().contents.retain(|content| match content {
        DOMContent::Element(element) => !Rc::ptr_eq(element, child),
        DOMContent::Text(_) => true,
    });
}

impl Selection {
    /// Re-scope to a single container
    pub fn single(node: ElementRef) -> Self {
        Self {
            groups: vec![Group {
                parent: node.clone(),
                nodes: vec![node],
            }],
        }
    }

    /// Number of containers across all groups
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.nodes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.nodes.is_empty())
    }

    /// The first container, if any
    pub fn node(&self) -> Option<ElementRef> {
        self.groups
            .iter()
            .flat_map(|group| &group.nodes)
            .next()
            .cloned()
    }

    /// All containers, flattened in selection order
    pub fn nodes(&self) -> Vec<ElementRef> {
        self.groups
            .iter()
            .flat_map(|group| &group.nodes)
            .cloned()
            .collect()
    }

    /// For each container, its first matching descendant. Containers
    /// without a match contribute nothing to the result.
    pub fn select(&self, selector: &str) -> Selection {
        let descriptor = parse(selector);
        let groups = self
            .groups
            .iter()
            .map(|group| Group {
                parent: group.parent.clone(),
                nodes: group
                    .nodes
                    .iter()
                    .filter_map(|node| first_match(node, &descriptor))
                    .collect(),
            })
            .collect();
        Selection { groups }
    }

    /// All matching descendants, grouped under each container as parent
    pub fn select_all(&self, selector: &str) -> Selection {
        let descriptor = parse(selector);
        let groups = self
            .groups
            .iter()
            .flat_map(|group| &group.nodes)
            .map(|node| {
                let mut nodes = Vec::new();
                collect_matches(node, &descriptor, &mut nodes);
                Group {
                    parent: node.clone(),
                    nodes,
                }
            })
            .collect();
        Selection { groups }
    }

    /// Append a new element of `tag` as the last child of every container,
    /// returning a selection over the new elements
    pub fn append(&self, tag: &str) -> Selection {
        let groups = self
            .groups
            .iter()
            .map(|group| Group {
                parent: group.parent.clone(),
                nodes: group
                    .nodes
                    .iter()
                    .map(|node| append_child(node, tag))
                    .collect(),
            })
            .collect();
        Selection { groups }
    }

    /// Set an attribute on every container
    pub fn attr(&self, name: &str, value: &str) -> &Self {
        for group in &self.groups {
            for node in &group.nodes {
                node.borrow_mut().set_attribute(name, value);
            }
        }
        self
    }

    /// Set an attribute per container; the closure receives the
    /// container's index within its group
    pub fn attr_with(&self, name: &str, value: impl Fn(usize) -> String) -> &Self {
        for group in &self.groups {
            for (i, node) in group.nodes.iter().enumerate() {
                node.borrow_mut().set_attribute(name, value(i));
            }
        }
        self
    }

    /// Add or remove a class on every container
    pub fn classed(&self, class: &str, on: bool) -> &Self {
        for group in &self.groups {
            for node in &group.nodes {
                node.borrow_mut().set_class(class, on);
            }
        }
        self
    }

    /// Replace the contents of every container with a single text node
    pub fn text(&self, value: &str) -> &Self {
        for group in &self.groups {
            for node in &group.nodes {
                node.borrow_mut().contents = vec![DOMContent::Text(value.to_string())];
            }
        }
        self
    }

    /// Replace contents with per-container text; the closure receives the
    /// container's index within its group
    pub fn text_with(&self, value: impl Fn(usize) -> String) -> &Self {
        for group in &self.groups {
            for (i, node) in group.nodes.iter().enumerate() {
                node.borrow_mut().contents = vec![DOMContent::Text(value(i))];
            }
        }
        self
    }

    /// Bind one datum per container in each group, ready to [`DataJoin::join`]
    pub fn data<'a, T>(&'a self, values: &'a [T]) -> DataJoin<'a, T> {
        DataJoin {
            groups: &self.groups,
            values,
        }
    }
}

/// A selection with data bound to it, pending reconciliation.
pub struct DataJoin<'a, T> {
    groups: &'a [Group],
    values: &'a [T],
}

impl<T> DataJoin<'_, T> {
    /// Reconcile each group against the bound data: the i-th existing
    /// node is kept for the i-th datum (identity and nested content
    /// preserved), missing nodes are appended as new `tag` elements, and
    /// surplus nodes are removed from their parent.
    pub fn join(&self, tag: &str) -> Selection {
        let groups = self
            .groups
            .iter()
            .map(|group| {
                let mut nodes = Vec::with_capacity(self.values.len());
                for i in 0..self.values.len() {
                    match group.nodes.get(i) {
                        Some(existing) => nodes.push(existing.clone()),
                        None => nodes.push(append_child(&group.parent, tag)),
                    }
                }
                for surplus in group.nodes.iter().skip(self.values.len()) {
                    remove_child(&group.parent, surplus);
                }
                Group {
                    parent: group.parent.clone(),
                    nodes,
                }
            })
            .collect();
        Selection { groups }
    }
}

mod append_select;

#[cfg(test)]
mod tests;
