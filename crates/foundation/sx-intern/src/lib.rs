//! Case-folded interning for module and symbol names
//!
//! Module and symbol names are case-insensitive keys across the corpus, so
//! every name is trimmed and folded to lower case before it is interned. Two
//! spellings of the same name always produce the same [`Name`].

pub use lasso::Spur as Name;
use lasso::ThreadedRodeo;
use std::sync::Arc;

/// Shared interner for canonical names
#[derive(Clone, Default)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Create an empty interner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text` under its canonical (trimmed, lower-case) spelling
    pub fn intern(&self, text: &str) -> Name {
        let folded = fold(text);
        self.inner.get_or_intern(folded.as_ref())
    }

    /// Look up an already interned name without creating it
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Name> {
        let folded = fold(text);
        self.inner.get(folded.as_ref())
    }

    /// Canonical spelling of an interned name
    #[must_use]
    pub fn resolve(&self, name: Name) -> &str {
        self.inner.resolve(&name)
    }

    /// Number of distinct names interned so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been interned yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

fn fold(text: &str) -> std::borrow::Cow<'_, str> {
    let text = text.trim();
    if text.chars().any(char::is_uppercase) {
        std::borrow::Cow::Owned(text.to_lowercase())
    } else {
        std::borrow::Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_names() {
        let interner = Interner::new();
        let upper = interner.intern("KINDS");
        let lower = interner.intern("kinds");

        assert_eq!(upper, lower);
        assert_eq!(interner.resolve(upper), "kinds");
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let interner = Interner::new();
        let padded = interner.intern(" Kinds\t");
        let plain = interner.intern("kinds");

        assert_eq!(padded, plain);
        assert_eq!(interner.resolve(padded), "kinds");
        assert_eq!(interner.get("  KINDS  "), Some(plain));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = Interner::new();
        assert!(interner.get("missing").is_none());
        assert!(interner.is_empty());

        let name = interner.intern("Message_Passing");
        assert_eq!(interner.get("MESSAGE_PASSING"), Some(name));
    }

    #[test]
    fn test_clones_share_storage() {
        let interner = Interner::new();
        let other = interner.clone();
        let name = other.intern("cp_files");
        assert_eq!(interner.resolve(name), "cp_files");
    }
}
