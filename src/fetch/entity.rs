// src/fetch/entity.rs
// =============================================================================
// Entity fetchers: turn an ID into a Person or Family, or "not found".
//
// They are thin on purpose:
// 1. Build the resource URL ({base}/person/{id} or {base}/family/{id})
// 2. Let the FetchClient do the throttled, retried GET
// 3. Decode the body with serde_json
//
// Any failure along the way (no body, bad JSON, an entity whose own id is 0)
// ends as None. Because IDs are typed (PersonId / FamilyId are never 0),
// the "ID 0 means no request" rule is enforced by the type system: there is
// simply no way to ask for person 0.
// =============================================================================

use super::client::{FetchClient, Transport};
use crate::tree::{Family, FamilyId, Person, PersonId};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub struct EntityFetcher<T> {
    client: FetchClient<T>,
    base_url: Url,
}

impl<T: Transport> EntityFetcher<T> {
    pub fn new(client: FetchClient<T>, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub async fn person(&self, id: PersonId) -> Option<Person> {
        let person: Person = self.fetch_json("person", id.get()).await?;
        debug!(id = %person.id, parent = ?person.parent_id.map(|p| p.get()), "person fetched");
        Some(person)
    }

    pub async fn family(&self, id: FamilyId) -> Option<Family> {
        let family: Family = self.fetch_json("family", id.get()).await?;
        debug!(id = %family.id, children = family.children.len(), "family fetched");
        Some(family)
    }

    /// The underlying client, for request statistics
    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }

    async fn fetch_json<E: DeserializeOwned>(&self, kind: &str, id: u64) -> Option<E> {
        let url = self.resource_url(kind, id)?;
        let body = self.client.fetch(&url).await?;

        match serde_json::from_str(&body) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(%url, error = %e, "could not decode {}", kind);
                None
            }
        }
    }

    fn resource_url(&self, kind: &str, id: u64) -> Option<Url> {
        match self.base_url.join(&format!("{}/{}", kind, id)) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(base = %self.base_url, kind, id, error = %e, "could not build resource URL");
                None
            }
        }
    }
}
