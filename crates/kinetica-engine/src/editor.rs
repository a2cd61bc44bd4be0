//! Timeline editing surface state.
//!
//! Wraps a [`KeyframeTimeline`] with the selection the editor keeps beside
//! it and announces every successful edit to listeners. Rejected edits
//! change nothing and announce nothing.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use kinetica_timeline::{
    KeyframeStep, KeyframeTimeline, Property, PropertySet, Result, StepId, TimelineError,
};

use crate::signal::{ListenerId, Listeners};

/// A change applied through [`TimelineEditor`].
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    StepAdded(StepId),
    StepRemoved(StepId),
    PropertyChanged {
        step: StepId,
        property: Property,
        value: f32,
    },
    Reordered,
    SelectionChanged(StepId),
}

pub struct TimelineEditor {
    timeline: Rc<RefCell<KeyframeTimeline>>,
    selected: StepId,
    listeners: Listeners<TimelineEvent>,
}

impl TimelineEditor {
    pub fn new() -> Self {
        Self::from_timeline(KeyframeTimeline::new())
    }

    /// Takes ownership of `timeline`; the first step starts selected.
    pub fn from_timeline(timeline: KeyframeTimeline) -> Self {
        let selected = timeline.first().id.clone();
        Self {
            timeline: Rc::new(RefCell::new(timeline)),
            selected,
            listeners: Listeners::new(),
        }
    }

    pub fn timeline(&self) -> Ref<'_, KeyframeTimeline> {
        self.timeline.borrow()
    }

    /// Shared handle for read-only consumers such as a player.
    pub fn handle(&self) -> Rc<RefCell<KeyframeTimeline>> {
        Rc::clone(&self.timeline)
    }

    pub fn selected(&self) -> &StepId {
        &self.selected
    }

    pub fn subscribe(&mut self, f: impl FnMut(&TimelineEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn select(&mut self, id: &StepId) -> Result<()> {
        if self.timeline.borrow().step(id).is_none() {
            return Err(self.rejected(TimelineError::UnknownStep(id.clone())));
        }
        if &self.selected != id {
            self.selected = id.clone();
            self.listeners.emit(&TimelineEvent::SelectionChanged(id.clone()));
        }
        Ok(())
    }

    /// Values shown while playback is paused: the selected step's properties.
    pub fn preview(&self) -> PropertySet {
        let timeline = self.timeline.borrow();
        timeline
            .step(&self.selected)
            .unwrap_or_else(|| timeline.first())
            .properties
    }

    pub fn add_step(&mut self) -> StepId {
        let id = self.timeline.borrow_mut().add_step();
        self.listeners.emit(&TimelineEvent::StepAdded(id.clone()));
        id
    }

    /// Removes a step; if it was selected, selection moves to the first step.
    pub fn remove_step(&mut self, id: &StepId) -> Result<KeyframeStep> {
        let removed = self.timeline.borrow_mut().remove_step(id);
        let removed = removed.map_err(|e| self.rejected(e))?;
        self.listeners.emit(&TimelineEvent::StepRemoved(id.clone()));

        if &self.selected == id {
            let first = self.timeline.borrow().first().id.clone();
            self.selected = first.clone();
            self.listeners.emit(&TimelineEvent::SelectionChanged(first));
        }
        Ok(removed)
    }

    pub fn update_property(&mut self, id: &StepId, property: Property, value: f32) -> Result<()> {
        let result = self.timeline.borrow_mut().update_property(id, property, value);
        result.map_err(|e| self.rejected(e))?;

        self.listeners.emit(&TimelineEvent::PropertyChanged {
            step: id.clone(),
            property,
            value,
        });
        Ok(())
    }

    pub fn update_property_by_name(&mut self, id: &StepId, name: &str, value: f32) -> Result<()> {
        let property: Property = name.parse().map_err(|e| self.rejected(e))?;
        self.update_property(id, property, value)
    }

    pub fn reorder(&mut self, order: &[StepId]) -> Result<()> {
        let result = self.timeline.borrow_mut().reorder(order);
        result.map_err(|e| self.rejected(e))?;
        self.listeners.emit(&TimelineEvent::Reordered);
        Ok(())
    }

    pub fn sample_at(&self, fraction: f32) -> PropertySet {
        self.timeline.borrow().sample_at(fraction)
    }

    fn rejected(&self, err: TimelineError) -> TimelineError {
        log::warn!("timeline edit rejected: {err}");
        err
    }
}

impl Default for TimelineEditor {
    fn default() -> Self {
        Self::new()
    }
}
