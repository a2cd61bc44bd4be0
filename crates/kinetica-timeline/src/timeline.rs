use std::collections::{HashMap, HashSet};

use crate::easing::Easing;
use crate::error::{PermutationError, Result, TimelineError};
use crate::property::{Property, PropertySet};
use crate::step::{KeyframeStep, StepId};

/// An ordered, editable sequence of keyframe steps.
///
/// Invariants:
/// - there is always at least one step
/// - step ids are unique and never reused, even after removal
///
/// List order is playback order. Steps are spaced evenly over `[0, 1]`
/// by position: step `i` of `n` sits at `i / (n - 1)`. For a timeline built
/// with [`KeyframeTimeline::add_step`] this is the same as `time / last.time`;
/// after a reorder the `time` labels travel with their steps and are not
/// consulted.
#[derive(Debug, Clone)]
pub struct KeyframeTimeline {
    steps: Vec<KeyframeStep>,
    next_id: u64,
}

impl KeyframeTimeline {
    /// Creates a timeline holding one step `"1"` at time 0 with default values.
    pub fn new() -> Self {
        Self::with_properties(PropertySet::default())
    }

    /// Creates a timeline whose first step carries `properties`.
    pub fn with_properties(properties: PropertySet) -> Self {
        Self {
            steps: vec![KeyframeStep::new(StepId::new("1"), 0.0, properties)],
            next_id: 2,
        }
    }

    pub fn steps(&self) -> &[KeyframeStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> &KeyframeStep {
        &self.steps[0]
    }

    pub fn last(&self) -> &KeyframeStep {
        &self.steps[self.steps.len() - 1]
    }

    pub fn step(&self, id: &StepId) -> Option<&KeyframeStep> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn position_of(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|s| &s.id == id)
    }

    /// Appends a copy of the last step at `last.time + 1` and returns its id.
    pub fn add_step(&mut self) -> StepId {
        let (time, properties) = (self.last().time + 1.0, self.last().properties);
        let step = KeyframeStep::new(self.allocate_id(), time, properties);
        let id = step.id.clone();

        log::debug!("timeline: added step {id} at t={}", step.time);
        self.steps.push(step);
        id
    }

    /// Removes a step, refusing to remove the only remaining one.
    pub fn remove_step(&mut self, id: &StepId) -> Result<KeyframeStep> {
        let index = self
            .position_of(id)
            .ok_or_else(|| TimelineError::UnknownStep(id.clone()))?;

        if self.steps.len() == 1 {
            return Err(TimelineError::LastStep);
        }

        log::debug!("timeline: removed step {id}");
        Ok(self.steps.remove(index))
    }

    /// Writes `value` to one property of one step. Values are stored unclamped.
    pub fn update_property(&mut self, id: &StepId, property: Property, value: f32) -> Result<()> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| TimelineError::UnknownStep(id.clone()))?;

        step.properties.set(property, value);
        Ok(())
    }

    /// Like [`KeyframeTimeline::update_property`] but resolves the property by name.
    ///
    /// The name is validated before the id.
    pub fn update_property_by_name(&mut self, id: &StepId, name: &str, value: f32) -> Result<()> {
        let property: Property = name.parse()?;
        self.update_property(id, property, value)
    }

    /// Rearranges the steps to follow `order`, which must be a permutation of
    /// the current ids. On error the timeline is untouched.
    pub fn reorder(&mut self, order: &[StepId]) -> Result<()> {
        if order.len() != self.steps.len() {
            return Err(PermutationError::WrongLength {
                expected: self.steps.len(),
                found: order.len(),
            }
            .into());
        }

        let index: HashMap<&StepId, usize> =
            self.steps.iter().enumerate().map(|(i, s)| (&s.id, i)).collect();

        let mut seen = HashSet::with_capacity(order.len());
        let mut sources = Vec::with_capacity(order.len());
        for id in order {
            let &src = index
                .get(id)
                .ok_or_else(|| PermutationError::Unknown(id.clone()))?;
            if !seen.insert(src) {
                return Err(PermutationError::Duplicate(id.clone()).into());
            }
            sources.push(src);
        }

        let mut slots: Vec<Option<KeyframeStep>> = self.steps.drain(..).map(Some).collect();
        self.steps = sources
            .into_iter()
            .filter_map(|src| slots[src].take())
            .collect();

        debug_assert_eq!(self.steps.len(), order.len());
        Ok(())
    }

    /// Linearly interpolated properties at `fraction` of the whole timeline.
    ///
    /// `fraction <= 0` (or NaN) returns the first step's values and
    /// `fraction >= 1` the last step's, both unmodified.
    pub fn sample_at(&self, fraction: f32) -> PropertySet {
        let n = self.steps.len();
        if n == 1 || fraction.is_nan() || fraction <= 0.0 {
            return self.first().properties;
        }
        if fraction >= 1.0 {
            return self.last().properties;
        }

        let scaled = fraction * (n - 1) as f32;
        let i = (scaled.floor() as usize).min(n - 2);
        let t = (scaled - i as f32).clamp(0.0, 1.0);

        self.steps[i].properties.lerp(&self.steps[i + 1].properties, t)
    }

    /// [`KeyframeTimeline::sample_at`] after passing `fraction` through `easing`.
    pub fn sample_eased(&self, fraction: f32, easing: Easing) -> PropertySet {
        if fraction.is_nan() {
            return self.first().properties;
        }
        self.sample_at(easing.apply(fraction))
    }

    fn allocate_id(&mut self) -> StepId {
        let id = StepId::new(self.next_id.to_string());
        self.next_id += 1;
        id
    }
}

impl Default for KeyframeTimeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tl: &KeyframeTimeline) -> Vec<StepId> {
        tl.steps().iter().map(|s| s.id.clone()).collect()
    }

    fn three_steps() -> (KeyframeTimeline, StepId, StepId, StepId) {
        let mut tl = KeyframeTimeline::new();
        let a = tl.first().id.clone();
        let b = tl.add_step();
        let c = tl.add_step();
        (tl, a, b, c)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_timeline_has_one_default_step() {
        let tl = KeyframeTimeline::new();
        assert_eq!(tl.len(), 1);
        assert_eq!(tl.first().id, StepId::from("1"));
        assert_eq!(tl.first().time, 0.0);
        assert_eq!(tl.first().properties, PropertySet::default());
    }

    // ── add_step ──────────────────────────────────────────────────────────

    #[test]
    fn add_step_copies_last_and_advances_time() {
        let mut tl = KeyframeTimeline::new();
        let first = tl.first().id.clone();
        tl.update_property(&first, Property::Rotate, 45.0).unwrap();

        let id = tl.add_step();
        assert_eq!(tl.len(), 2);
        let added = tl.step(&id).unwrap();
        assert_eq!(added.time, 1.0);
        assert_eq!(added.properties, tl.first().properties);
    }

    #[test]
    fn added_step_is_a_value_copy() {
        let mut tl = KeyframeTimeline::new();
        let id = tl.add_step();
        tl.update_property(&id, Property::X, 120.0).unwrap();

        assert_eq!(tl.first().properties[Property::X], 0.0);
        assert_eq!(tl.last().properties[Property::X], 120.0);
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let (mut tl, _, b, c) = three_steps();
        tl.remove_step(&c).unwrap();
        let d = tl.add_step();
        assert_ne!(d, c);
        assert_ne!(d, b);
        let all = ids(&tl);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn add_step_increments_len_by_one_each_time() {
        let mut tl = KeyframeTimeline::new();
        for expected in 2..=10 {
            tl.add_step();
            assert_eq!(tl.len(), expected);
        }
        assert_eq!(tl.last().time, 9.0);
    }

    // ── update_property ───────────────────────────────────────────────────

    #[test]
    fn update_unknown_step_fails_without_change() {
        let mut tl = KeyframeTimeline::new();
        let before = tl.first().properties;
        let err = tl
            .update_property(&StepId::from("nope"), Property::X, 5.0)
            .unwrap_err();
        assert_eq!(err, TimelineError::UnknownStep(StepId::from("nope")));
        assert_eq!(tl.first().properties, before);
    }

    #[test]
    fn update_by_name_rejects_unknown_property() {
        let mut tl = KeyframeTimeline::new();
        let id = tl.first().id.clone();
        let err = tl.update_property_by_name(&id, "blur", 1.0).unwrap_err();
        assert_eq!(err, TimelineError::UnknownProperty("blur".into()));

        tl.update_property_by_name(&id, "opacity", 0.25).unwrap();
        assert_eq!(tl.first().properties[Property::Opacity], 0.25);
    }

    #[test]
    fn update_stores_out_of_range_values() {
        let mut tl = KeyframeTimeline::new();
        let id = tl.first().id.clone();
        tl.update_property(&id, Property::Opacity, 4.0).unwrap();
        assert_eq!(tl.first().properties[Property::Opacity], 4.0);
    }

    // ── remove_step ───────────────────────────────────────────────────────

    #[test]
    fn removing_the_sole_step_is_rejected() {
        let mut tl = KeyframeTimeline::new();
        let id = tl.first().id.clone();
        assert_eq!(tl.remove_step(&id).unwrap_err(), TimelineError::LastStep);
        assert_eq!(tl.len(), 1);
        assert_eq!(tl.first().id, id);
    }

    #[test]
    fn remove_unknown_step_is_reported() {
        let (mut tl, ..) = three_steps();
        let err = tl.remove_step(&StepId::from("42")).unwrap_err();
        assert!(matches!(err, TimelineError::UnknownStep(_)));
        assert_eq!(tl.len(), 3);
    }

    #[test]
    fn remove_returns_the_step() {
        let (mut tl, a, b, c) = three_steps();
        let removed = tl.remove_step(&b).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(ids(&tl), vec![a, c]);
    }

    // ── reorder ───────────────────────────────────────────────────────────

    #[test]
    fn reorder_swaps_two_steps() {
        let mut tl = KeyframeTimeline::new();
        let s1 = tl.first().id.clone();
        let s2 = tl.add_step();
        tl.reorder(&[s2.clone(), s1.clone()]).unwrap();
        assert_eq!(ids(&tl), vec![s2, s1]);
    }

    #[test]
    fn reorder_wrong_length_is_rejected() {
        let (mut tl, a, b, c) = three_steps();
        let err = tl.reorder(&[b.clone(), a.clone()]).unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidPermutation(PermutationError::WrongLength { expected: 3, found: 2 })
        );
        assert_eq!(ids(&tl), vec![a, b, c]);
    }

    #[test]
    fn reorder_duplicate_is_rejected() {
        let (mut tl, a, b, c) = three_steps();
        let err = tl.reorder(&[a.clone(), b.clone(), a.clone()]).unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidPermutation(PermutationError::Duplicate(a.clone()))
        );
        assert_eq!(ids(&tl), vec![a, b, c]);
    }

    #[test]
    fn reorder_unknown_id_is_rejected() {
        let (mut tl, a, b, c) = three_steps();
        let ghost = StepId::from("ghost");
        let err = tl.reorder(&[c.clone(), ghost.clone(), a.clone()]).unwrap_err();
        assert_eq!(err, TimelineError::InvalidPermutation(PermutationError::Unknown(ghost)));
        assert_eq!(ids(&tl), vec![a, b, c]);
    }

    #[test]
    fn reorder_keeps_step_contents() {
        let (mut tl, a, b, c) = three_steps();
        tl.update_property(&c, Property::Y, -80.0).unwrap();
        tl.reorder(&[c.clone(), a.clone(), b.clone()]).unwrap();

        assert_eq!(tl.first().id, c);
        assert_eq!(tl.first().properties[Property::Y], -80.0);
        assert_eq!(tl.first().time, 2.0);
    }

    // ── sample_at ─────────────────────────────────────────────────────────

    #[test]
    fn midpoint_of_two_steps() {
        let mut tl = KeyframeTimeline::new();
        let id2 = tl.add_step();
        tl.update_property(&id2, Property::X, 100.0).unwrap();

        let mid = tl.sample_at(0.5);
        assert_eq!(mid[Property::X], 50.0);
        assert_eq!(mid[Property::Y], 0.0);
        assert_eq!(mid[Property::Scale], 1.0);
        assert_eq!(mid[Property::Rotate], 0.0);
        assert_eq!(mid[Property::Opacity], 1.0);
    }

    #[test]
    fn endpoints_return_exact_step_values() {
        let (mut tl, a, _, c) = three_steps();
        tl.update_property(&a, Property::Scale, 0.7).unwrap();
        tl.update_property(&c, Property::Scale, 2.3).unwrap();

        assert_eq!(tl.sample_at(0.0), tl.first().properties);
        assert_eq!(tl.sample_at(1.0), tl.last().properties);
        assert_eq!(tl.sample_at(-3.0), tl.first().properties);
        assert_eq!(tl.sample_at(7.0), tl.last().properties);
        assert_eq!(tl.sample_at(f32::NAN), tl.first().properties);
    }

    #[test]
    fn steps_are_evenly_spaced() {
        let (mut tl, _, b, c) = three_steps();
        tl.update_property(&b, Property::X, 100.0).unwrap();
        tl.update_property(&c, Property::X, 200.0).unwrap();

        assert_eq!(tl.sample_at(0.25)[Property::X], 50.0);
        assert_eq!(tl.sample_at(0.5)[Property::X], 100.0);
        assert_eq!(tl.sample_at(0.75)[Property::X], 150.0);
    }

    #[test]
    fn sampling_follows_list_order_after_reorder() {
        let mut tl = KeyframeTimeline::new();
        let s1 = tl.first().id.clone();
        let s2 = tl.add_step();
        tl.update_property(&s2, Property::Rotate, 90.0).unwrap();
        tl.reorder(&[s2, s1]).unwrap();

        assert_eq!(tl.sample_at(0.0)[Property::Rotate], 90.0);
        assert_eq!(tl.sample_at(1.0)[Property::Rotate], 0.0);
        assert_eq!(tl.sample_at(0.5)[Property::Rotate], 45.0);
    }

    #[test]
    fn single_step_is_constant() {
        let tl = KeyframeTimeline::with_properties(PropertySet::new(10.0, 20.0, 2.0, 30.0, 0.5));
        for f in [0.0, 0.3, 0.9, 1.0] {
            assert_eq!(tl.sample_at(f), tl.first().properties);
        }
    }

    #[test]
    fn eased_sampling_bends_the_fraction() {
        let mut tl = KeyframeTimeline::new();
        let id2 = tl.add_step();
        tl.update_property(&id2, Property::X, 100.0).unwrap();

        assert_eq!(tl.sample_eased(0.5, Easing::Linear)[Property::X], 50.0);
        assert_eq!(tl.sample_eased(0.5, Easing::EaseIn)[Property::X], 25.0);
        assert_eq!(tl.sample_eased(1.0, Easing::EaseOut), tl.last().properties);
    }
}
