//! Reverse geocoding of visible node locations.
//!
//! Location ids are recorded as fetched before the lookups start, so a
//! location is asked about at most once per session even if lookups are
//! slow or fail.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use explorer_protocol::Location;
use explorer_state::EntityTable;

use crate::source::Geocoder;
use crate::SharedStore;

pub struct LocationResolver {
    store: SharedStore,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(store: SharedStore, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    /// Resolve the locations of visible nodes not yet geocoded or asked
    /// about. Returns the number of locations upgraded.
    pub async fn resolve_visible(&self) -> usize {
        let pending: Vec<Location> = {
            let mut store = self.store.write().await;
            let fetched = store.state().fetched_locations.clone();
            let mut seen = HashSet::new();
            let pending: Vec<Location> = store
                .visible_nodes()
                .iter()
                .map(|node| &node.location)
                .filter(|loc| !loc.is_reverse_geocoded && !fetched.contains(&loc.id()))
                .filter(|loc| seen.insert(loc.id()))
                .cloned()
                .collect();
            if pending.is_empty() {
                return 0;
            }
            store.add_fetched_locations(pending.iter().map(Location::id).collect());
            pending
        };

        let geocoder = self.geocoder.as_ref();
        let lookups = join_all(pending.iter().map(|loc| async move {
            (loc, geocoder.reverse(loc.longitude, loc.latitude).await)
        }))
        .await;

        let mut store = self.store.write().await;
        let mut upgrades = EntityTable::new();
        for (loc, outcome) in lookups {
            let id = loc.id();
            match outcome {
                // a reset in the meantime clears the fetched set
                Ok(Some(_)) if !store.state().fetched_locations.contains(&id) => {}
                Ok(Some(title)) => {
                    upgrades.upsert_location(id, loc.resolved(title));
                }
                Ok(None) => {
                    tracing::trace!(location = %id, "No place name for location");
                }
                Err(e) => {
                    tracing::warn!(location = %id, error = %e, "Reverse geocoding failed");
                }
            }
        }

        let resolved = upgrades.locations.len();
        if resolved > 0 {
            store.update_entities(upgrades);
            tracing::debug!(resolved, requested = pending.len(), "Locations reverse-geocoded");
        }
        resolved
    }
}
