// src/tree/store.rs
// =============================================================================
// The Tree: every Person and Family discovered so far, keyed by ID.
//
// Many traversal branches write to the same Tree at the same time, so the two
// maps live behind a single Mutex. Callers never get at the maps directly,
// they only see operations that do their whole "is it there? if not, add it"
// decision while holding the lock:
// - insert_family / insert_person return true only for the first insert
// - a second insert with the same ID is a no-op and returns false
//
// The lock is a std Mutex, not an async one: it is only ever held for a
// HashMap lookup/insert and never across an .await.
//
// Rust concepts:
// - Mutex<T>: Exclusive access to T, released when the guard is dropped
// - Entry API: Check and insert with one hash lookup
// =============================================================================

use super::model::{Family, FamilyId, Person, PersonId};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Maps {
    persons: HashMap<PersonId, Person>,
    families: HashMap<FamilyId, Family>,
}

/// Concurrency-safe, insert-once store of discovered entities
#[derive(Debug, Default)]
pub struct Tree {
    maps: Mutex<Maps>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic in another branch must not make the whole tree unreadable:
    // the maps are only ever modified by a single insert, so they are
    // consistent even if the lock was poisoned.
    fn lock(&self) -> MutexGuard<'_, Maps> {
        self.maps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds the family unless its ID is already known. Returns true if added.
    pub fn insert_family(&self, family: Family) -> bool {
        match self.lock().families.entry(family.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(family);
                true
            }
        }
    }

    /// Adds the person unless their ID is already known. Returns true if added.
    pub fn insert_person(&self, person: Person) -> bool {
        match self.lock().persons.entry(person.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(person);
                true
            }
        }
    }

    pub fn contains_family(&self, id: FamilyId) -> bool {
        self.lock().families.contains_key(&id)
    }

    pub fn contains_person(&self, id: PersonId) -> bool {
        self.lock().persons.contains_key(&id)
    }

    pub fn family(&self, id: FamilyId) -> Option<Family> {
        self.lock().families.get(&id).cloned()
    }

    pub fn person(&self, id: PersonId) -> Option<Person> {
        self.lock().persons.get(&id).cloned()
    }

    pub fn family_count(&self) -> usize {
        self.lock().families.len()
    }

    pub fn person_count(&self) -> usize {
        self.lock().persons.len()
    }

    pub fn is_empty(&self) -> bool {
        let maps = self.lock();
        maps.families.is_empty() && maps.persons.is_empty()
    }

    /// Ordered copy of the current contents, for output and comparisons
    pub fn snapshot(&self) -> TreeSnapshot {
        let maps = self.lock();
        TreeSnapshot {
            families: maps.families.iter().map(|(id, f)| (*id, f.clone())).collect(),
            persons: maps.persons.iter().map(|(id, p)| (*id, p.clone())).collect(),
        }
    }
}

/// A point-in-time, sorted view of a Tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    pub families: BTreeMap<FamilyId, Family>,
    pub persons: BTreeMap<PersonId, Person>,
}
