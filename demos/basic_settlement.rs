//! Basic shared-expense settlement example.
//!
//! Three friends share a dinner and a taxi; the engine works out who
//! pays whom.

use rust_decimal_macros::dec;
use settlement_engine::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  settlement-engine: Basic Settlement Example ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let participants = vec![
        Participant::new(1, "alice"),
        Participant::new(2, "bob"),
        Participant::new(3, "carol"),
    ];
    let everyone: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();

    let dinner = Expense::split_evenly(1, dec!(100.00), &everyone)
        .expect("even split is valid")
        .with_description("dinner");
    let taxi = Expense::new(2, dec!(24.50), vec![
        Share::new(1, dec!(12.25)),
        Share::new(2, dec!(12.25)),
    ])
    .expect("shares sum to total")
    .with_description("taxi");

    println!("━━━ Expenses ━━━\n");
    for expense in [&dinner, &taxi] {
        println!(
            "  {:<10} paid by #{:<3} {:>8}",
            expense.description().unwrap_or("-"),
            expense.payer(),
            expense.amount()
        );
    }
    println!();

    let report = SettlementEngine::default()
        .compute_settlement(participants, vec![dinner, taxi])
        .expect("ledger is well-formed");

    println!("{}", report);
}
