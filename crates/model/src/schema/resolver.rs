use std::{borrow::Cow, collections::HashMap};

/// Maps a logical attribute name to the name the backend stores it under.
pub trait AttributeNameResolver: Send + Sync {
    fn resolve<'a>(&self, logical: &'a str) -> Cow<'a, str>;
}

/// Stores every attribute under its logical name.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl AttributeNameResolver for IdentityResolver {
    fn resolve<'a>(&self, logical: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(logical)
    }
}

/// Explicit per-attribute renames; names without an entry pass through.
#[derive(Debug, Clone, Default)]
pub struct MappedResolver {
    names: HashMap<String, String>,
}

impl MappedResolver {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    pub fn rename(mut self, logical: &str, internal: &str) -> Self {
        self.names.insert(logical.to_string(), internal.to_string());
        self
    }
}

impl AttributeNameResolver for MappedResolver {
    fn resolve<'a>(&self, logical: &'a str) -> Cow<'a, str> {
        match self.names.get(logical) {
            Some(internal) => Cow::Owned(internal.clone()),
            None => Cow::Borrowed(logical),
        }
    }
}

impl<F> AttributeNameResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn resolve<'a>(&self, logical: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(logical))
    }
}
