use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The selector fell outside the supported grammar: an element with
    /// zero or more classes or an id, like `div`, `div#my-id` or
    /// `div.my-class.another`.
    #[error("invalid CSS selector passed to append_select; must be an element with zero or more classes or an id (\"div\", \"div#my-id\" or \"div.my-class.another\"), got {0:?}")]
    InvalidSelector(String),
}

pub type Result<T> = std::result::Result<T, Error>;
