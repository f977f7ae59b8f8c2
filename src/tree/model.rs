// src/tree/model.rs
// =============================================================================
// Domain types: Person, Family and their IDs.
//
// The remote service encodes "no such person/family" as the number 0.
// Inside the crawler we never carry that sentinel around: IDs are wrapped in
// NonZeroU64 newtypes, and an absent relationship is an Option::None.
//
// Decoding goes through a "raw" wire struct that mirrors the JSON exactly
// (plain u64s, 0 allowed), then converts with TryFrom:
// - an entity whose own id is 0 fails to decode (treated as "not found")
// - husband_id / wife_id / parent_id of 0 become None
// - 0 entries in the children list are dropped, order is kept
//
// Rust concepts:
// - Newtype pattern: PersonId and FamilyId cannot be mixed up by accident
// - #[serde(try_from = "...")]: Validate while deserializing
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(NonZeroU64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(NonZeroU64);

impl PersonId {
    /// Returns None for the wire sentinel 0
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl FamilyId {
    /// Returns None for the wire sentinel 0
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// Returned when a wire record cannot become a domain value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} record has id 0")]
pub struct MissingId {
    kind: &'static str,
}

/// A person as known by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPerson")]
pub struct Person {
    pub id: PersonId,
    /// The family in which this person is a child (None = top of the tree)
    pub parent_id: Option<FamilyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,
}

/// A couple and their children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFamily")]
pub struct Family {
    pub id: FamilyId,
    pub husband_id: Option<PersonId>,
    pub wife_id: Option<PersonId>,
    pub children: Vec<PersonId>,
}

impl Family {
    // Every person this family points at: husband, wife, then children
    pub fn member_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.husband_id
            .into_iter()
            .chain(self.wife_id)
            .chain(self.children.iter().copied())
    }
}

// Mirrors the JSON body of GET /person/{id}
#[derive(Debug, Deserialize)]
struct RawPerson {
    #[serde(default, alias = "Id")]
    id: u64,
    #[serde(default, alias = "ParentId", alias = "parentId")]
    parent_id: u64,
    #[serde(default, alias = "Name")]
    name: Option<String>,
    #[serde(default, alias = "Gender")]
    gender: Option<String>,
    #[serde(default, alias = "Birth")]
    birth: Option<String>,
    #[serde(default, alias = "Death")]
    death: Option<String>,
}

// Mirrors the JSON body of GET /family/{id}
#[derive(Debug, Deserialize)]
struct RawFamily {
    #[serde(default, alias = "Id")]
    id: u64,
    #[serde(default, alias = "HusbandId", alias = "husbandId")]
    husband_id: u64,
    #[serde(default, alias = "WifeId", alias = "wifeId")]
    wife_id: u64,
    #[serde(default, alias = "Children")]
    children: Vec<u64>,
}

impl TryFrom<RawPerson> for Person {
    type Error = MissingId;

    fn try_from(raw: RawPerson) -> Result<Self, Self::Error> {
        let id = PersonId::new(raw.id).ok_or(MissingId { kind: "person" })?;
        Ok(Person {
            id,
            parent_id: FamilyId::new(raw.parent_id),
            name: raw.name,
            gender: raw.gender,
            birth: raw.birth,
            death: raw.death,
        })
    }
}

impl TryFrom<RawFamily> for Family {
    type Error = MissingId;

    fn try_from(raw: RawFamily) -> Result<Self, Self::Error> {
        let id = FamilyId::new(raw.id).ok_or(MissingId { kind: "family" })?;
        Ok(Family {
            id,
            husband_id: PersonId::new(raw.husband_id),
            wife_id: PersonId::new(raw.wife_id),
            children: raw.children.into_iter().filter_map(PersonId::new).collect(),
        })
    }
}
