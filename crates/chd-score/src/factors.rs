//! Top contributing factors.
//!
//! A quick reading of the linear term, not a SHAP explanation: features are
//! ranked by the absolute size of their contribution for one patient.

use serde::{Deserialize, Serialize};

use crate::bundle::Contribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    RaisesRisk,
    LowersRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFactor {
    pub feature: String,
    pub contribution: f64,
    pub direction: Direction,
}

/// The `k` largest non-zero contributions by magnitude; ties keep input order.
pub fn top_factors(contributions: &[Contribution], k: usize) -> Vec<TopFactor> {
    let mut ranked: Vec<&Contribution> = contributions
        .iter()
        .filter(|c| c.value != 0.0 && c.value.is_finite())
        .collect();
    ranked.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
    ranked
        .into_iter()
        .take(k)
        .map(|c| TopFactor {
            feature: c.feature.clone(),
            contribution: c.value,
            direction: if c.value > 0.0 {
                Direction::RaisesRisk
            } else {
                Direction::LowersRisk
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(feature: &str, value: f64) -> Contribution {
        Contribution {
            feature: feature.to_string(),
            value,
        }
    }

    #[test]
    fn ranks_by_magnitude() {
        let factors = top_factors(
            &[
                contribution("age", 0.4),
                contribution("heartRate", -0.9),
                contribution("BMI", 0.0),
                contribution("sysBP", 0.4),
            ],
            2,
        );
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].feature, "heartRate");
        assert_eq!(factors[0].direction, Direction::LowersRisk);
        assert_eq!(factors[1].feature, "age");
        assert_eq!(factors[1].direction, Direction::RaisesRisk);
    }

    #[test]
    fn zero_contributions_are_skipped() {
        assert!(top_factors(&[contribution("BMI", 0.0)], 3).is_empty());
    }
}
