//! A string interner.

use std::ops::Index;

use crate::{hashmap::HashMap, id::KeyedVec, key};

key!(pub struct StringId(u32));

/// Deduplicates strings, handing out a stable [`StringId`] for each distinct
/// string it has seen.
#[derive(Default)]
pub struct Interner {
    map: HashMap<String, StringId>,
    values: KeyedVec<StringId, String>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            map: HashMap::new(),
            values: KeyedVec::new(),
        }
    }

    /// Intern a string returning its id.
    pub fn intern(&mut self, name: &str) -> StringId {
        if let Some(id) = self.map.get(name).copied() {
            return id;
        }
        let id = self.values.push(name.to_string());
        self.map.insert(name.to_string(), id);
        id
    }

    /// Returns the string associated with the id.
    pub fn lookup(&self, id: StringId) -> &str {
        &self.values[id]
    }
}

impl Index<StringId> for Interner {
    type Output = str;

    fn index(&self, index: StringId) -> &Self::Output {
        self.lookup(index)
    }
}
