//! Smoothed per-cell "recently alive" signal, used only for drawing.

pub const DECAY: f32 = 0.99;
pub const WEIGHT: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct ActivityTrace {
    values: Vec<f32>,
}

impl ActivityTrace {
    pub fn new(n: usize) -> Self {
        Self {
            values: vec![0.0; n],
        }
    }

    #[inline]
    pub fn accumulate(&mut self, i: usize, alive: bool) {
        let v = &mut self.values[i];
        *v = *v * DECAY + WEIGHT * (alive as u8 as f32);
    }

    #[inline]
    pub fn get(&self, i: usize) -> f32 {
        self.values[i]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let t = ActivityTrace::new(4);
        assert!(t.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn alive_streak_approaches_one() {
        let mut t = ActivityTrace::new(1);
        for _ in 0..50 {
            t.accumulate(0, true);
        }
        let expected = 1.0 - DECAY.powi(50);
        assert!((t.get(0) - expected).abs() < 1e-4, "{} vs {}", t.get(0), expected);
        assert!(t.get(0) < 1.0);
    }

    #[test]
    fn dead_streak_decays_geometrically() {
        let mut t = ActivityTrace::new(1);
        for _ in 0..30 {
            t.accumulate(0, true);
        }
        let start = t.get(0);
        for _ in 0..40 {
            t.accumulate(0, false);
        }
        let expected = start * DECAY.powi(40);
        assert!((t.get(0) - expected).abs() < 1e-5);
    }
}
