//! src/domain/employee/name.rs
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("A name must not be empty")]
    Empty,
    #[error("A name must not be more than 256 graphemes long")]
    TooLong,
    #[error("A name must not contain any of the following characters: '/' '(' ')' '\"' '<' '>' '\\' '{{' '}}'")]
    InvalidCharacters,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmployeeName(String);

const MAX_GRAPHEMES: usize = 256;
const FORBIDDEN_CHARACTERS: [char; 9] = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];

impl EmployeeName {
    pub fn parse(s: String) -> Result<Self, Error> {
        let name = s.trim();
        if name.is_empty() {
            return Err(Error::Empty);
        }
        // Counted in graphemes: `å` may be two chars but reads as one.
        if name.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(Error::TooLong);
        }
        if name.contains(FORBIDDEN_CHARACTERS.as_slice()) {
            return Err(Error::InvalidCharacters);
        }

        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for EmployeeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmployeeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
