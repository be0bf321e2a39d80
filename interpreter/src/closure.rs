use ahash::AHashMap;

use crate::value::ObjectHolder;

/// Flat name to value table. Serves as a method's local scope, the global scope and an
/// instance's field table.
#[derive(Debug, Default, Clone)]
pub struct Closure {
    values: AHashMap<String, ObjectHolder>,
}

impl Closure {
    pub fn new() -> Self {
        Closure {
            values: AHashMap::new(),
        }
    }

    /// Binds `key`, replacing any previous binding.
    pub fn define(&mut self, key: &str, value: ObjectHolder) {
        self.values.insert(String::from(key), value);
    }

    pub fn get(&self, key: &str) -> Option<ObjectHolder> {
        self.values.get(key).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
