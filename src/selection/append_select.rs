use tracing::{debug, span, Level};

use super::{append_child, first_match, Selection};
use crate::dom::ElementRef;
use crate::error::{Error, Result};
use crate::selector::{is_supported, parse};

impl Selection {
    /// For every container, select the first descendant matching
    /// `selector`, appending one if the container has none.
    ///
    /// Containers that already hold a match are never touched, so calling
    /// this on every render pass is safe: a fully satisfied selection is a
    /// read-only query. Only when at least one container is missing a
    /// match is the selector validated against the supported grammar — a
    /// tag with either an id or classes — and a matching child appended
    /// as the last child of each missing container. The returned
    /// selection holds one match per container, in container order, and
    /// chains like any other.
    pub fn append_select(&self, selector: &str) -> Result<Selection> {
        let descriptor = parse(selector);
        let missing: Vec<ElementRef> = self
            .groups
            .iter()
            .flat_map(|group| &group.nodes)
            .filter(|container| first_match(container, &descriptor).is_none())
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(self.select(selector));
        }
        if !is_supported(selector) {
            return Err(Error::InvalidSelector(selector.to_string()));
        }
        let Some(tag) = descriptor.tag_name.as_deref() else {
            return Err(Error::InvalidSelector(selector.to_string()));
        };

        let span = span!(Level::DEBUG, "Appending missing children");
        let _enter = span.enter();
        debug!("{} container(s) missing {:?}", missing.len(), selector);
        for container in &missing {
            let child = append_child(container, tag);
            let mut element = child.borrow_mut();
            if let Some(id) = &descriptor.id {
                element.set_attribute("id", id.as_str());
            }
            for class in &descriptor.classes {
                element.set_class(class, true);
            }
        }
        Ok(self.select(selector))
    }
}
