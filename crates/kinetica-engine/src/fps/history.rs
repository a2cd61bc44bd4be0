use std::collections::VecDeque;

/// One closed sampling window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSample {
    /// Frame timestamp at which the window closed.
    pub timestamp_ms: f64,
    pub fps: u32,
}

/// Fixed-capacity FIFO of recent samples; the oldest is evicted first.
///
/// Invariant: `len() <= capacity()`.
#[derive(Debug, Clone)]
pub struct FpsHistory {
    samples: VecDeque<FrameSample>,
    capacity: usize,
}

impl FpsHistory {
    pub const DEFAULT_CAPACITY: usize = 60;

    /// Creates an empty history. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `sample`, returning the evicted oldest sample when full.
    pub fn push(&mut self, sample: FrameSample) -> Option<FrameSample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FrameSample> + '_ {
        self.samples.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().map(|s| s.fps)
    }

    pub fn latest(&self) -> Option<&FrameSample> {
        self.samples.back()
    }

    /// Rounded mean of all held samples; `None` when empty.
    pub fn mean(&self) -> Option<u32> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u64 = self.values().map(u64::from).sum();
        Some((sum as f64 / self.samples.len() as f64).round() as u32)
    }

    /// Chart bar heights: each sample as a fraction of `target_fps`, capped at 1.
    pub fn bar_heights(&self, target_fps: u32) -> impl Iterator<Item = f32> + '_ {
        let target = target_fps.max(1) as f32;
        self.values().map(move |fps| (fps as f32 / target).min(1.0))
    }
}

impl Default for FpsHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fps: u32) -> FrameSample {
        FrameSample { timestamp_ms: 0.0, fps }
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut h = FpsHistory::new(3);
        for fps in [10, 20, 30] {
            assert!(h.push(sample(fps)).is_none());
        }
        let evicted = h.push(sample(40)).unwrap();
        assert_eq!(evicted.fps, 10);
        assert_eq!(h.values().collect::<Vec<_>>(), vec![20, 30, 40]);
    }

    #[test]
    fn never_exceeds_default_capacity() {
        let mut h = FpsHistory::default();
        for i in 0..500 {
            h.push(sample(i));
            assert!(h.len() <= 60);
        }
        assert_eq!(h.len(), 60);
        assert_eq!(h.latest().unwrap().fps, 499);
    }

    #[test]
    fn mean_rounds_to_nearest() {
        let mut h = FpsHistory::default();
        assert_eq!(h.mean(), None);
        h.push(sample(59));
        h.push(sample(60));
        assert_eq!(h.mean(), Some(60)); // 59.5 rounds up
        h.push(sample(58));
        assert_eq!(h.mean(), Some(59));
    }

    #[test]
    fn bar_heights_are_capped() {
        let mut h = FpsHistory::default();
        h.push(sample(30));
        h.push(sample(120));
        assert_eq!(h.bar_heights(60).collect::<Vec<_>>(), vec![0.5, 1.0]);
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut h = FpsHistory::new(0);
        h.push(sample(1));
        h.push(sample(2));
        assert_eq!(h.capacity(), 1);
        assert_eq!(h.values().collect::<Vec<_>>(), vec![2]);
    }
}
