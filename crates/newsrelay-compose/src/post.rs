use crate::error::ComposeError;

/// Final post text, guaranteed to fit the platform limit it was checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPost {
    body: String,
}

impl ComposedPost {
    /// # Errors
    ///
    /// Returns [`ComposeError::TooLong`] when `body` has more than `limit`
    /// characters, or [`ComposeError::EmptyBody`] when it is blank.
    pub fn new(body: String, limit: usize) -> Result<Self, ComposeError> {
        if body.trim().is_empty() {
            return Err(ComposeError::EmptyBody);
        }
        let length = body.chars().count();
        if length > limit {
            return Err(ComposeError::TooLong { length, limit });
        }
        Ok(Self { body })
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.body.chars().count()
    }

    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}

impl std::fmt::Display for ComposedPost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body)
    }
}
