use std::collections::HashMap;

/// Variables visible to host nodes while a template renders.
///
/// Lookups walk the pushed scopes from the innermost outwards before falling
/// back to the root variables.
#[derive(Debug, Clone, Default)]
pub struct Context {
    root: HashMap<String, String>,
    scopes: Vec<HashMap<String, String>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            root: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            scopes: Vec::new(),
        }
    }

    /// Sets a variable in the innermost scope.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let target = self.scopes.last_mut().unwrap_or(&mut self.root);
        target.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(key))
            .or_else(|| self.root.get(key))
            .map(String::as_str)
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }
}
