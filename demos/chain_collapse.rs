//! Transitive chain collapsing.
//!
//! Shows how `A → B → C` debt chains in a hand-built transfer matrix are
//! rewritten into direct payments without moving anyone's net position.

use rust_decimal_macros::dec;
use settlement_engine::core::money::EPSILON;
use settlement_engine::core::participant::ParticipantId;
use settlement_engine::settlement::matrix::TransferMatrix;
use settlement_engine::settlement::simplify::{simplify, PassCap};

fn print_matrix(matrix: &TransferMatrix) {
    for (from, to, amount) in matrix.edges_above(EPSILON) {
        println!(
            "  {} → {}: {}",
            matrix.participant(from),
            matrix.participant(to),
            amount
        );
    }
}

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  settlement-engine: Chain Collapse Example ║");
    println!("╚════════════════════════════════════════════╝\n");

    let ids = (1..=4).map(ParticipantId::new).collect();
    let mut matrix = TransferMatrix::new(ids);
    // 1 owes 2, 2 owes 3, 3 owes 4.
    matrix.set(0, 1, dec!(50));
    matrix.set(1, 2, dec!(50));
    matrix.set(2, 3, dec!(30));

    println!("━━━ Before ━━━\n");
    print_matrix(&matrix);

    let outcome = simplify(&matrix, EPSILON, PassCap::Squared);

    println!("\n━━━ After {} passes ━━━\n", outcome.passes);
    print_matrix(&outcome.matrix);

    println!("\n━━━ Net Positions ━━━\n");
    for index in 0..matrix.size() {
        println!(
            "  {:<4} before {:>8}  after {:>8}",
            matrix.participant(index),
            matrix.net_position(index),
            outcome.matrix.net_position(index)
        );
    }
    println!("\nConverged: {}", outcome.converged);
}
