use crate::error::{TrendsError, TrendsResult};
use crate::extensions::{EngineContext, EngineEvent, EngineObserver};
use crate::render::ChartSurface;

use super::TrendsEngine;

impl<S: ChartSurface> TrendsEngine<S> {
    /// Registers an observer. Ids must be non-empty and unique.
    pub fn register_observer(&mut self, observer: Box<dyn EngineObserver>) -> TrendsResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(TrendsError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(TrendsError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.core.runtime.observers.push(observer);
        Ok(())
    }

    /// Returns whether an observer was removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        let observers = &mut self.core.runtime.observers;
        if let Some(position) = observers.iter().position(|entry| entry.id() == observer_id) {
            observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.core.runtime.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.core
            .runtime
            .observers
            .iter()
            .any(|entry| entry.id() == observer_id)
    }

    pub(super) fn engine_context(&self) -> EngineContext {
        EngineContext {
            num_dates: self.num_dates(),
            regions_len: self.core.model.dataset.regions().len(),
            current_day: self.core.playback.current_day,
            paused: self.core.playback.paused,
            min_day: self.min_day(),
            selected_len: self.core.selection.valid_selected().len(),
            visible_len: self.core.selection.visible.len(),
        }
    }

    pub(super) fn emit_event(&mut self, event: EngineEvent) {
        if self.core.runtime.observers.is_empty() {
            return;
        }
        let context = self.engine_context();
        for observer in &mut self.core.runtime.observers {
            observer.on_event(&event, context);
        }
    }
}
