//! Fuzzy inference engine for toasting time.
//!
//! Each input is fuzzified into three overlapping triangular sets, the 3x3
//! rule table is weighted by the product of the two memberships, and the
//! result is defuzzified with a Sugeno-style weighted average.

use crate::{ControlInputs, MembershipTriple};
use serde::Serialize;

/// Triangular membership of `x` in the set `(a, b, c)`.
///
/// The branches are evaluated in order and the right edge is closed to zero:
/// `x == c` yields 0 even when `b == c`, so a set peaking at its right edge
/// never reaches 1 there. A left-degenerate set (`a == b`) yields 1 at `x == a`
/// through the falling branch.
pub fn triangular_membership(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x < a || x > c {
        0.0
    } else if a <= x && x < b {
        (x - a) / (b - a)
    } else if b <= x && x < c {
        (c - x) / (c - b)
    } else if x == c {
        0.0
    } else {
        1.0
    }
}

/// Light / medium / dark membership of a browning level
pub fn browning_membership(browning: f64) -> MembershipTriple {
    MembershipTriple {
        low: triangular_membership(browning, 0.0, 0.0, 5.0),
        mid: triangular_membership(browning, 3.0, 5.0, 7.0),
        high: triangular_membership(browning, 5.0, 10.0, 10.0),
    }
}

/// White / whole grain / rye membership of a bread type
pub fn bread_type_membership(bread_type: f64) -> MembershipTriple {
    MembershipTriple {
        low: triangular_membership(bread_type, 0.0, 0.0, 5.0),
        mid: triangular_membership(bread_type, 3.0, 5.0, 7.0),
        high: triangular_membership(bread_type, 5.0, 10.0, 10.0),
    }
}

/// Consequent toasting times in seconds, indexed `[browning][bread_type]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RuleTable(pub [[f64; 3]; 3]);

impl RuleTable {
    pub const DEFAULT: RuleTable = RuleTable([
        // white, whole grain, rye
        [4.0, 6.0, 8.0],    // light
        [7.0, 9.0, 12.0],   // medium
        [10.0, 13.0, 15.0], // dark
    ]);

    /// Run the full inference for one pair of inputs
    pub fn infer(&self, inputs: ControlInputs) -> Inference {
        let browning = browning_membership(inputs.browning);
        let bread_type = bread_type_membership(inputs.bread_type);

        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for (row, mu_b) in self.0.iter().zip(browning.as_array()) {
            for (consequent, mu_t) in row.iter().zip(bread_type.as_array()) {
                let weight = mu_b * mu_t;
                weighted += weight * consequent;
                total_weight += weight;
            }
        }

        // No rule fired: fall back to the numerator, which is zero
        let duration_seconds = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            weighted
        };

        tracing::trace!(
            ?browning,
            ?bread_type,
            total_weight,
            duration_seconds,
            "fuzzy inference"
        );

        Inference {
            browning,
            bread_type,
            total_weight,
            duration_seconds,
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Intermediate values of one inference, kept for diagnostics
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Inference {
    pub browning: MembershipTriple,
    pub bread_type: MembershipTriple,
    pub total_weight: f64,
    pub duration_seconds: f64,
}

/// Toasting time in seconds for a browning level and bread type
pub fn compute_toasting_time(browning: f64, bread_type: f64) -> f64 {
    RuleTable::DEFAULT
        .infer(ControlInputs::new(browning, bread_type))
        .duration_seconds
}
