use crate::settlement::balance::NetBalance;
use crate::settlement::matrix::TransferMatrix;
use log::debug;
use rust_decimal::Decimal;

/// Pair the largest remaining debtor with the largest remaining creditor
/// until one side runs out.
///
/// # Algorithm
///
/// 1. Creditors are positions above `epsilon`, debtors below `-epsilon`;
///    everyone else is already settled.
/// 2. Both lists are sorted by absolute amount, largest first. The sort is
///    stable, so equal amounts keep the balance's participant order.
/// 3. Transfer `min(debt, credit)` from the current debtor to the current
///    creditor and move past whichever side is left with at most
///    `epsilon` (both sides when both are).
///
/// Every recorded cell is above `epsilon`, and at most
/// `debtors + creditors - 1` cells are filled. The result is not a
/// minimum-transfer solution.
pub fn match_greedy(balance: &NetBalance, epsilon: Decimal) -> TransferMatrix {
    let participants = balance.entries().iter().map(|(id, _)| *id).collect();
    let mut matrix = TransferMatrix::new(participants);

    let mut creditors: Vec<(usize, Decimal)> = Vec::new();
    let mut debtors: Vec<(usize, Decimal)> = Vec::new();
    for (index, (_, amount)) in balance.entries().iter().enumerate() {
        if *amount > epsilon {
            creditors.push((index, *amount));
        } else if *amount < -epsilon {
            debtors.push((index, amount.abs()));
        }
    }

    creditors.sort_by(|a, b| b.1.cmp(&a.1));
    debtors.sort_by(|a, b| b.1.cmp(&a.1));

    debug!(
        "greedy matching {} debtors against {} creditors",
        debtors.len(),
        creditors.len()
    );

    let mut debtor_cursor = 0;
    let mut creditor_cursor = 0;
    while debtor_cursor < debtors.len() && creditor_cursor < creditors.len() {
        let (debtor, remaining_debt) = debtors[debtor_cursor];
        let (creditor, remaining_credit) = creditors[creditor_cursor];

        let transfer = remaining_debt.min(remaining_credit);
        matrix.add(debtor, creditor, transfer);

        let remaining_debt = remaining_debt - transfer;
        let remaining_credit = remaining_credit - transfer;
        debtors[debtor_cursor].1 = remaining_debt;
        creditors[creditor_cursor].1 = remaining_credit;

        if remaining_debt <= epsilon {
            debtor_cursor += 1;
        }
        if remaining_credit <= epsilon {
            creditor_cursor += 1;
        }
    }

    matrix
}
