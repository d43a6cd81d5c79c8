/// The document tree and shared handles into it
pub mod dom;
/// Errors surfaced while extending a selection
pub mod error;
/// Chainable selections over the document tree
pub mod selection;
/// Parsing and validation of restricted CSS selectors
pub mod selector;

pub use dom::{DOMAttributes, DOMContent, DOMElement, Document, ElementRef};
pub use error::{Error, Result};
pub use selection::{DataJoin, Selection};
pub use selector::Selector;
