use rand::Rng;
use serde::{Deserialize, Serialize};

/// Integer actions in `0..n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteSpace {
    pub n: u32,
}

impl DiscreteSpace {
    pub fn contains(&self, action: i64) -> bool {
        (0..i64::from(self.n)).contains(&action)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        i64::from(rng.gen_range(0..self.n))
    }
}

/// Fixed-shape vector with one shared closed bound.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: f32,
    pub high: f32,
    pub len: usize,
}

impl BoxSpace {
    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.len && values.iter().all(|v| (self.low..=self.high).contains(v))
    }
}
