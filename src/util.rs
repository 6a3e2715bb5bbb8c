use serde::Serialize;

/// Mean and population standard deviation of a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    pub fn of(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let variance = samples
            .iter()
            .map(|s| (s - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}
