//! Mission service — the seam the room/session layer drives.
//!
//! Departure confirmation resolves the catalog, validates the assembly,
//! runs the whole simulation synchronously with a per-mission seeded RNG,
//! and stores the finished outcome for pickup. The store is the only
//! shared mutable state in the process and sits behind a single mutex;
//! the logic crate itself holds no lock.

use std::collections::HashMap;
use std::sync::Mutex;

use cosmotrek_logic::catalog::Catalog;
use cosmotrek_logic::simulation::{DepartureError, MissionOutcome, MissionState, Tuning};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Handle to a completed mission run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub u64);

/// What the assembly screen submits on departure confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartureRequest {
    pub spacecraft_id: String,
    pub destination_id: String,
    #[serde(default)]
    pub selected_module_ids: Vec<String>,
}

struct MissionStore {
    next_id: u64,
    outcomes: HashMap<u64, MissionOutcome>,
}

/// Owns the catalogs and tuning, runs missions, retains their outcomes.
pub struct MissionService {
    catalog: Catalog,
    tuning: Tuning,
    store: Mutex<MissionStore>,
}

impl MissionService {
    pub fn new(catalog: Catalog, tuning: Tuning) -> Self {
        Self {
            catalog,
            tuning,
            store: Mutex::new(MissionStore {
                next_id: 1,
                outcomes: HashMap::new(),
            }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Validate and run a mission. The seed fixes every random draw, so a
    /// replayed request reproduces its diary exactly.
    pub fn confirm_departure(
        &self,
        request: &DepartureRequest,
        seed: u64,
    ) -> Result<MissionId, DepartureError> {
        let mut state = MissionState::assemble(
            &self.catalog,
            &request.spacecraft_id,
            &request.destination_id,
            &request.selected_module_ids,
        )?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let status = state.depart(self.catalog.all_events(), &self.tuning, &mut rng);

        let mut store = self.store.lock().unwrap();
        let id = store.next_id;
        store.next_id += 1;
        store.outcomes.insert(id, state.outcome());
        log::info!(
            "mission {} departed: {} -> {} with {} modules, finished {:?} with score {}",
            id,
            request.spacecraft_id,
            request.destination_id,
            request.selected_module_ids.len(),
            status,
            state.score()
        );
        Ok(MissionId(id))
    }

    /// Final result for a completed mission, if the id is known.
    pub fn final_result(&self, id: MissionId) -> Option<MissionOutcome> {
        self.store.lock().unwrap().outcomes.get(&id.0).cloned()
    }

    /// Drop a mission once the session layer has persisted its result.
    pub fn discard(&self, id: MissionId) -> bool {
        self.store.lock().unwrap().outcomes.remove(&id.0).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MissionService {
        MissionService::new(Catalog::builtin(), Tuning::default())
    }

    fn moon_request() -> DepartureRequest {
        DepartureRequest {
            spacecraft_id: "falcon9".to_string(),
            destination_id: "moon".to_string(),
            selected_module_ids: vec!["storage".to_string(), "quarters".to_string()],
        }
    }

    #[test]
    fn accepted_departure_yields_result() {
        let service = service();
        let id = service.confirm_departure(&moon_request(), 7).unwrap();
        let outcome = service.final_result(id).unwrap();
        assert!(outcome.score >= 0);
        assert!(!outcome.diary.is_empty());
        assert!(outcome.diary.len() <= 15);
    }

    #[test]
    fn rejected_departure_stores_nothing() {
        let service = service();
        let request = DepartureRequest {
            spacecraft_id: "pslv".to_string(),
            destination_id: "mars".to_string(),
            selected_module_ids: vec!["life_support".to_string()],
        };
        let err = service.confirm_departure(&request, 7).unwrap_err();
        assert!(matches!(err, DepartureError::Assembly(_)));
        assert!(service.final_result(MissionId(1)).is_none());
    }

    #[test]
    fn unknown_catalog_id_is_refused() {
        let service = service();
        let request = DepartureRequest {
            spacecraft_id: "falcon9".to_string(),
            destination_id: "jupiter".to_string(),
            selected_module_ids: vec![],
        };
        let err = service.confirm_departure(&request, 0).unwrap_err();
        assert!(matches!(err, DepartureError::Catalog(_)));
    }

    #[test]
    fn same_seed_reproduces_the_diary() {
        let service = service();
        let a = service.confirm_departure(&moon_request(), 99).unwrap();
        let b = service.confirm_departure(&moon_request(), 99).unwrap();
        assert_ne!(a, b, "each run gets its own id");
        assert_eq!(
            service.final_result(a).unwrap().diary,
            service.final_result(b).unwrap().diary
        );
    }

    #[test]
    fn discard_releases_the_outcome() {
        let service = service();
        let id = service.confirm_departure(&moon_request(), 1).unwrap();
        assert!(service.discard(id));
        assert!(service.final_result(id).is_none());
        assert!(!service.discard(id));
    }

    #[test]
    fn departure_request_parses_from_wire_json() {
        let request: DepartureRequest = serde_json::from_str(
            r#"{"spacecraft_id":"gslv","destination_id":"moon","selected_module_ids":["storage"]}"#,
        )
        .unwrap();
        assert_eq!(request.spacecraft_id, "gslv");
        assert_eq!(request.selected_module_ids, vec!["storage".to_string()]);
        // module list may be omitted entirely
        let bare: DepartureRequest =
            serde_json::from_str(r#"{"spacecraft_id":"gslv","destination_id":"moon"}"#).unwrap();
        assert!(bare.selected_module_ids.is_empty());
    }
}
