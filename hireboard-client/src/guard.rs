use std::{collections::HashSet, sync::Arc};

use parking_lot::Mutex;

use crate::api::Uuid;

/// Per-target in-flight marker. A target with a pending mutation rejects new
/// mutations until the pending one settles; different targets never interfere.
#[derive(Clone, Debug, Default)]
pub struct InFlight(Arc<Mutex<HashSet<Uuid>>>);

impl InFlight {
    pub fn new() -> InFlight {
        InFlight::default()
    }

    /// Marks `id` as pending. `None` means a mutation for `id` is already in
    /// flight and the caller must bail out without side effects.
    pub fn try_begin(&self, id: Uuid) -> Option<InFlightToken> {
        if self.0.lock().insert(id) {
            Some(InFlightToken {
                set: self.clone(),
                id,
            })
        } else {
            None
        }
    }

}

/// Clears the pending mark on drop, so a target returns to idle whichever
/// way its mutation settles. A target stuck pending would stay unclickable
/// forever.
#[derive(Debug)]
pub struct InFlightToken {
    set: InFlight,
    id: Uuid,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.set.0.lock().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_rejected_until_drop() {
        let guard = InFlight::new();
        let id = Uuid::from_u128(1);

        let token = guard.try_begin(id).expect("first begin");
        assert!(guard.try_begin(id).is_none());

        drop(token);
        assert!(guard.try_begin(id).is_some());
    }

    #[test]
    fn targets_are_independent() {
        let guard = InFlight::new();
        let _a = guard.try_begin(Uuid::from_u128(1)).expect("first target");
        assert!(guard.try_begin(Uuid::from_u128(2)).is_some());
    }
}
