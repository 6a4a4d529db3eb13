use crate::settlement::matrix::TransferMatrix;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound on simplifier passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassCap {
    /// `n²` passes for `n` participants.
    #[default]
    Squared,
    /// A fixed number of passes regardless of participant count.
    Fixed(usize),
}

impl PassCap {
    pub fn passes_for(&self, participant_count: usize) -> usize {
        match self {
            PassCap::Squared => participant_count.saturating_mul(participant_count),
            PassCap::Fixed(passes) => *passes,
        }
    }
}

/// Output of [`simplify`]: the reduced matrix and how the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplificationOutcome {
    pub matrix: TransferMatrix,
    /// Passes executed, including the final pass that found nothing to do.
    pub passes: usize,
    /// False when the pass cap ran out while a collapsible chain remained.
    pub converged: bool,
}

/// Collapse two-hop chains `i → j → k` into direct `i → k` transfers.
///
/// Each pass visits every ordered triple of distinct positions in
/// row-major order and, whenever both `i → j` and `j → k` exceed
/// `epsilon`, moves `t = min(i → j, j → k)` off both edges and onto
/// `i → k`. Reductions apply immediately, so later triples in the same
/// pass see the updated cells.
///
/// Passes repeat until one changes nothing or `cap` is reached. Hitting
/// the cap leaves a partly simplified matrix and is reported through
/// `converged`, not as an error.
///
/// Every reduction leaves each participant's net position unchanged:
/// `i` pays `t` less to `j` and `t` more to `k`, `j` receives and pays
/// `t` less, `k` receives `t` from `i` instead of `j`.
pub fn simplify(matrix: &TransferMatrix, epsilon: Decimal, cap: PassCap) -> SimplificationOutcome {
    let mut matrix = matrix.clone();
    let n = matrix.size();
    let max_passes = cap.passes_for(n);

    let mut passes = 0;
    let mut changed = false;
    while passes < max_passes {
        passes += 1;
        changed = collapse_pass(&mut matrix, epsilon);
        if !changed {
            break;
        }
    }

    // A pass that changed nothing proves no chain is left.
    let converged = (passes > 0 && !changed) || !has_collapsible_chain(&matrix, epsilon);
    if converged {
        debug!("simplifier settled after {} passes over {} participants", passes, n);
    } else {
        warn!(
            "simplifier hit its cap of {} passes over {} participants; plan is only partly simplified",
            max_passes, n
        );
    }

    SimplificationOutcome {
        matrix,
        passes,
        converged,
    }
}

/// One full sweep over all ordered triples. Returns whether any chain
/// was collapsed.
fn collapse_pass(matrix: &mut TransferMatrix, epsilon: Decimal) -> bool {
    let n = matrix.size();
    let mut changed = false;
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            for k in 0..n {
                if k == i || k == j {
                    continue;
                }
                let first = matrix.amount(i, j);
                let second = matrix.amount(j, k);
                if first > epsilon && second > epsilon {
                    let t = first.min(second);
                    matrix.set(i, j, first - t);
                    matrix.set(j, k, second - t);
                    matrix.add(i, k, t);
                    changed = true;
                }
            }
        }
    }
    changed
}

/// True if some `i → j → k` chain still has both legs above `epsilon`.
pub fn has_collapsible_chain(matrix: &TransferMatrix, epsilon: Decimal) -> bool {
    let n = matrix.size();
    (0..n).any(|j| chain_through(matrix, j, epsilon))
}

fn chain_through(matrix: &TransferMatrix, j: usize, epsilon: Decimal) -> bool {
    let n = matrix.size();
    (0..n)
        .filter(|&i| i != j && matrix.amount(i, j) > epsilon)
        .any(|i| (0..n).any(|k| k != i && k != j && matrix.amount(j, k) > epsilon))
}
