//! Optional per-id guard rejecting overlapping operations on one prompt.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::error::PromptError;

#[derive(Debug, Default)]
pub(crate) struct InFlight {
    ids: Mutex<HashSet<String>>,
}

impl InFlight {
    /// Marks `id` as busy until the returned guard drops.
    pub(crate) fn begin(&self, id: &str) -> Result<InFlightGuard<'_>, PromptError> {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        if !ids.insert(id.to_owned()) {
            return Err(PromptError::Busy { id: id.to_owned() });
        }
        Ok(InFlightGuard { owner: self, id: id.to_owned() })
    }
}

pub(crate) struct InFlightGuard<'a> {
    owner: &'a InFlight,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.ids.lock().unwrap_or_else(PoisonError::into_inner).remove(&self.id);
    }
}
