use std::collections::HashSet;

use crate::domain::plant::{Plant, PlantFields};
use crate::domain::sync::decoder::PlantCandidate;

/// The computed create/update/delete set for one import, consumed by the
/// store's atomic apply.
///
/// Invariants: `to_delete` is disjoint from the ids in `to_update`, and
/// every update id existed in the snapshot the plan was computed from.
/// `to_create` and `to_update` preserve input row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub to_create: Vec<PlantFields>,
    pub to_update: Vec<(i32, PlantFields)>,
    pub to_delete: HashSet<i32>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Classifies candidates against a snapshot of the persisted collection.
///
/// A candidate whose declared id matches a persisted plant becomes an
/// update and marks that id as seen. A declared id with no match means the
/// row referenced a record that no longer exists: the row becomes a create
/// and the stale id is NOT marked seen (it never corresponded to a real
/// record, so it must not shield anything from deletion) and is NOT forced
/// onto the new record (the store assigns identity).
///
/// Everything in the snapshot left unseen is deleted: the input is the
/// source of truth, so the import is a full replace, not an additive merge.
pub fn reconcile(candidates: &[PlantCandidate], snapshot: &[Plant]) -> SyncPlan {
    let persisted_ids: HashSet<i32> = snapshot.iter().map(|p| p.id).collect();

    let mut plan = SyncPlan::default();
    let mut seen: HashSet<i32> = HashSet::new();

    for candidate in candidates {
        match candidate.declared_id {
            Some(id) if persisted_ids.contains(&id) => {
                seen.insert(id);
                plan.to_update.push((id, candidate.fields.clone()));
            }
            _ => plan.to_create.push(candidate.fields.clone()),
        }
    }

    plan.to_delete = persisted_ids
        .into_iter()
        .filter(|id| !seen.contains(id))
        .collect();

    plan
}
