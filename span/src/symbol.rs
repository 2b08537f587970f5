// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{Mutex, RwLock},
};

struct Interner {
    strings: RwLock<Vec<&'static str>>,
    lookup: Mutex<std::collections::HashMap<&'static str, u32>>,
}

static INTERNER: Lazy<Interner> =
    Lazy::new(|| Interner { strings: RwLock::new(Vec::new()), lookup: Mutex::new(std::collections::HashMap::new()) });

impl Interner {
    fn intern(&self, s: &str) -> u32 {
        if let Some(&id) = self.lookup.lock().unwrap().get(s) {
            return id;
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let mut strings = self.strings.write().unwrap();
        let id = strings.len() as u32;
        strings.push(leaked);
        self.lookup.lock().unwrap().insert(leaked, id);
        id
    }

    fn resolve(&self, id: u32) -> &'static str {
        self.strings.read().unwrap()[id as usize]
    }
}

/// An interned identifier. Cheap to copy and compare; the backing string is
/// leaked for the process lifetime, which is acceptable since identifiers in
/// a single analysis run are bounded by the source text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(s: &str) -> Self {
        Symbol(INTERNER.intern(s))
    }

    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::intern(&s)
    }
}

impl Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol::intern(&s))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn equal_strings_intern_to_the_same_symbol() {
        assert_eq!(Symbol::intern("x"), Symbol::intern("x"));
        assert_ne!(Symbol::intern("x"), Symbol::intern("y"));
    }

    #[test]
    fn round_trips_through_as_str() {
        let sym = Symbol::intern("hello");
        assert_eq!(sym.as_str(), "hello");
    }
}
