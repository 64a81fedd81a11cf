//! Need components: a single decaying drive and the per-character set of them.

use serde::{Deserialize, Serialize};

/// Types of needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NeedType {
    Hunger,
    Rest,
    Social,
    Recreation,
}

impl NeedType {
    pub const ALL: [NeedType; 4] = [
        NeedType::Hunger,
        NeedType::Rest,
        NeedType::Social,
        NeedType::Recreation,
    ];
}

/// A single need. `current` is satisfaction: `max` is fully satisfied, 0.0 is desperate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub need_type: NeedType,
    current: f32,
    max: f32,
    /// Satisfaction lost per simulated second
    decay_rate: f32,
}

impl Need {
    /// New needs start fully satisfied. Negative `max` and `decay_rate` clamp to 0.
    pub fn new(need_type: NeedType, max: f32, decay_rate: f32) -> Self {
        let max = max.max(0.0);
        Self {
            need_type,
            current: max,
            max,
            decay_rate: decay_rate.max(0.0),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    pub(crate) fn scale_decay(&mut self, factor: f32) {
        self.decay_rate = (self.decay_rate * factor).max(0.0);
    }

    /// Apply decay over `delta_seconds`. Negative deltas are ignored.
    pub fn update(&mut self, delta_seconds: f32) {
        let dt = delta_seconds.max(0.0);
        self.current = (self.current - self.decay_rate * dt).clamp(0.0, self.max);
    }

    /// Add satisfaction. Negative amounts drain the need.
    pub fn fulfill(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Satisfaction as 0.0-1.0
    pub fn normalized(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// All needs of one character, at most one per [`NeedType`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    needs: Vec<Need>,
}

impl Needs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, need_type: NeedType) -> Option<&Need> {
        self.needs.iter().find(|n| n.need_type == need_type)
    }

    pub fn get_mut(&mut self, need_type: NeedType) -> Option<&mut Need> {
        self.needs.iter_mut().find(|n| n.need_type == need_type)
    }

    /// Returns the need of this type, inserting `Need::new(need_type, max, decay_rate)` if absent.
    pub fn ensure(&mut self, need_type: NeedType, max: f32, decay_rate: f32) -> &mut Need {
        match self.needs.iter().position(|n| n.need_type == need_type) {
            Some(idx) => &mut self.needs[idx],
            None => {
                self.needs.push(Need::new(need_type, max, decay_rate));
                let last = self.needs.len() - 1;
                &mut self.needs[last]
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Need> {
        self.needs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Need> {
        self.needs.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    /// Decay every need
    pub fn update(&mut self, delta_seconds: f32) {
        for need in &mut self.needs {
            need.update(delta_seconds);
        }
    }

    /// Mean normalized satisfaction, or 1.0 with no needs
    pub fn average_satisfaction(&self) -> f32 {
        if self.needs.is_empty() {
            return 1.0;
        }
        let total: f32 = self.needs.iter().map(Need::normalized).sum();
        total / self.needs.len() as f32
    }

    /// Returns the least satisfied need below the threshold
    pub fn most_urgent(&self, threshold: f32) -> Option<NeedType> {
        self.needs
            .iter()
            .filter(|n| n.normalized() < threshold)
            .min_by(|a, b| {
                a.normalized()
                    .partial_cmp(&b.normalized())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|n| n.need_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need_decay_clamps_at_zero() {
        let mut need = Need::new(NeedType::Hunger, 1.0, 0.1);
        need.update(5.0);
        assert!((need.current() - 0.5).abs() < 1e-5);
        need.update(100.0);
        assert_eq!(need.current(), 0.0);
    }

    #[test]
    fn test_negative_decay_rate_clamps_to_zero() {
        let mut need = Need::new(NeedType::Hunger, 1.0, -0.1);
        assert_eq!(need.decay_rate(), 0.0);
        need.fulfill(-0.5);
        need.update(2.0);
        assert!((need.current() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut need = Need::new(NeedType::Rest, 1.0, 0.1);
        need.fulfill(-0.5);
        need.update(-10.0);
        assert!((need.current() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_fulfill_clamps_to_max() {
        let mut need = Need::new(NeedType::Social, 2.0, 0.0);
        need.fulfill(-5.0);
        assert_eq!(need.current(), 0.0);
        need.fulfill(10.0);
        assert_eq!(need.current(), 2.0);
        assert_eq!(need.normalized(), 1.0);
    }

    #[test]
    fn test_zero_max_normalizes_to_zero() {
        let need = Need::new(NeedType::Recreation, 0.0, 0.01);
        assert_eq!(need.normalized(), 0.0);
    }

    #[test]
    fn test_ensure_is_unique_by_type() {
        let mut needs = Needs::new();
        needs.ensure(NeedType::Hunger, 1.0, 0.01);
        needs.ensure(NeedType::Hunger, 5.0, 0.5);
        assert_eq!(needs.len(), 1);
        assert_eq!(needs.get(NeedType::Hunger).map(Need::max), Some(1.0));
    }

    #[test]
    fn test_average_and_most_urgent() {
        let mut needs = Needs::new();
        assert_eq!(needs.average_satisfaction(), 1.0);

        needs.ensure(NeedType::Hunger, 1.0, 0.0).fulfill(-0.8);
        needs.ensure(NeedType::Rest, 1.0, 0.0).fulfill(-0.4);
        assert!((needs.average_satisfaction() - 0.4).abs() < 1e-5);
        assert_eq!(needs.most_urgent(0.5), Some(NeedType::Hunger));
        assert_eq!(needs.most_urgent(0.1), None);
    }
}
