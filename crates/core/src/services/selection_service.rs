use crate::models::model::Model;

/// Identifies one model-scoped dispatch: which model it was for, under which
/// selection generation, and its position in the dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    pub model_id: i64,
    pub generation: u64,
    pub seq: u64,
}

/// The "which model is selected" cell.
///
/// Every change bumps `generation`; results dispatched under an older
/// generation are stale and must not be applied. Within one generation the
/// dispatch sequence keeps an older response from overwriting a newer one.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<i64>,
    generation: u64,
    dispatch: DispatchSeq,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<i64> {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn select(&mut self, model_id: i64) {
        self.current = Some(model_id);
        self.generation += 1;
    }

    pub fn deselect(&mut self) {
        self.current = None;
        self.generation += 1;
    }

    /// Deselect only if `model_id` is the selected one. Returns whether it was.
    pub fn deselect_if(&mut self, model_id: i64) -> bool {
        if self.current == Some(model_id) {
            self.deselect();
            true
        } else {
            false
        }
    }

    /// Capture the current selection for a dispatch; `None` when nothing is selected.
    pub fn ticket(&mut self) -> Option<SelectionTicket> {
        let model_id = self.current?;
        Some(SelectionTicket {
            model_id,
            generation: self.generation,
            seq: self.dispatch.next(),
        })
    }

    /// Accept a completed dispatch if it is still relevant, recording it as applied.
    pub fn accept(&mut self, ticket: &SelectionTicket) -> bool {
        ticket.generation == self.generation
            && self.current == Some(ticket.model_id)
            && self.dispatch.try_apply(ticket.seq)
    }

    /// The model to auto-select after a list reload: the first listed one,
    /// and only when nothing is selected.
    pub fn auto_select_candidate(&self, models: &[Model]) -> Option<i64> {
        match self.current {
            Some(_) => None,
            None => models.first().map(|m| m.id),
        }
    }
}

/// Monotonic dispatch counter with a high-water mark of applied results.
#[derive(Debug, Default, Clone)]
pub struct DispatchSeq {
    dispatched: u64,
    applied: u64,
}

impl DispatchSeq {
    pub fn next(&mut self) -> u64 {
        self.dispatched += 1;
        self.dispatched
    }

    /// True (and recorded) if `seq` is newer than anything applied so far.
    pub fn try_apply(&mut self, seq: u64) -> bool {
        if seq > self.applied {
            self.applied = seq;
            true
        } else {
            false
        }
    }
}
