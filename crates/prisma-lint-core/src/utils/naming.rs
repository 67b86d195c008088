//! Function-name prefix matching and enclosing-function tracking.

/// Strips leading `_` and `#` used for private members.
#[must_use]
pub fn normalize(name: &str) -> &str {
    name.trim_start_matches(['_', '#'])
}

/// Returns true if `name` starts with `prefix` at a word boundary.
///
/// The character after the prefix must not be a lowercase ASCII letter, so
/// `deleteUser`, `delete` and `delete_user` have prefix `delete` while
/// `deletedUsers` does not.
#[must_use]
pub fn has_prefix(name: &str, prefix: &str) -> bool {
    let name = normalize(name);
    if prefix.is_empty() {
        return false;
    }
    match name.strip_prefix(prefix) {
        Some(rest) => !rest.starts_with(|c: char| c.is_ascii_lowercase()),
        None => false,
    }
}

/// Returns the longest of `prefixes` that `name` has.
#[must_use]
pub fn has_any_prefix<'p, S>(name: &str, prefixes: &'p [S]) -> Option<&'p str>
where
    S: AsRef<str>,
{
    prefixes
        .iter()
        .map(AsRef::as_ref)
        .filter(|prefix| has_prefix(name, prefix))
        .max_by_key(|prefix| prefix.len())
}

/// Stack of enclosing functions and classes during a tree walk.
///
/// Anonymous functions are pushed as `None` and are transparent to
/// [`FunctionScope::nearest_named`].
#[derive(Debug, Default)]
pub struct FunctionScope<'ast> {
    functions: Vec<Option<&'ast str>>,
    classes: Vec<Option<&'ast str>>,
}

impl<'ast> FunctionScope<'ast> {
    /// Creates an empty scope stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a function.
    pub fn enter_function(&mut self, name: Option<&'ast str>) {
        self.functions.push(name);
    }

    /// Leaves the innermost function.
    pub fn exit_function(&mut self) {
        self.functions.pop();
    }

    /// Enters a class.
    pub fn enter_class(&mut self, name: Option<&'ast str>) {
        self.classes.push(name);
    }

    /// Leaves the innermost class.
    pub fn exit_class(&mut self) {
        self.classes.pop();
    }

    /// Name of the innermost named function, if any.
    #[must_use]
    pub fn nearest_named(&self) -> Option<&'ast str> {
        self.functions.iter().rev().find_map(|name| *name)
    }

    /// Name of the innermost named class, if any.
    #[must_use]
    pub fn nearest_class(&self) -> Option<&'ast str> {
        self.classes.iter().rev().find_map(|name| *name)
    }
}
