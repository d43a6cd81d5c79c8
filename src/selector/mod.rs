/// A parsed selector descriptor: a tag with either an id or classes.
/// Produced by the lenient [`parse`]; shapes outside the supported
/// grammar (checked by [`is_supported`]) still tokenize but must be
/// rejected by callers that construct elements from the result.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Selector {
    pub tag_name: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    pub fn is_empty(&self) -> bool {
        self.tag_name.is_none() && self.id.is_none() && self.classes.is_empty()
    }
}

mod parsing;

pub use parsing::{is_supported, parse};
