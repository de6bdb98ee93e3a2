use std::collections::HashMap;

/// Maps wiki-link titles to URLs. `None` means the page does not exist yet.
pub trait LinkResolver: Send + Sync {
    fn resolve(&self, title: &str) -> Option<String>;
}

/// Resolves nothing; every wiki link renders as a new-page link.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

impl LinkResolver for Unresolved {
    fn resolve(&self, _title: &str) -> Option<String> {
        None
    }
}

/// Resolves every title to `base` followed by the percent-encoded title.
#[derive(Debug, Clone)]
pub struct PrefixResolver {
    base: String,
}

impl PrefixResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl LinkResolver for PrefixResolver {
    fn resolve(&self, title: &str) -> Option<String> {
        Some(format!("{}{}", self.base, urlencoding::encode(title)))
    }
}

/// Known pages by exact title.
impl LinkResolver for HashMap<String, String> {
    fn resolve(&self, title: &str) -> Option<String> {
        self.get(title).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_encodes_titles() {
        let r = PrefixResolver::new("/wiki/");
        assert_eq!(r.resolve("Main Page").as_deref(), Some("/wiki/Main%20Page"));
        assert_eq!(r.resolve("象棋").as_deref(), Some("/wiki/%E8%B1%A1%E6%A3%8B"));
    }

    #[test]
    fn map_resolves_known_pages_only() {
        let pages = HashMap::from([("Home".to_string(), "/home".to_string())]);
        assert_eq!(pages.resolve("Home").as_deref(), Some("/home"));
        assert_eq!(pages.resolve("Away"), None);
        assert_eq!(Unresolved.resolve("Home"), None);
    }
}
