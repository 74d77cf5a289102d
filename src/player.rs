use std::fmt;

/// Player name with a character limit. Only printable characters go in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerName {
    text: String,
    limit: usize,
}

impl PlayerName {
    pub fn new(limit: usize) -> PlayerName {
        PlayerName {
            text: String::new(),
            limit,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append `c` if it is printable and the name is below the limit.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.len() >= self.limit {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Append as much of `text` as fits.
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            self.push(c);
        }
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
