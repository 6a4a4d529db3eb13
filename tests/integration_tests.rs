use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use settlement_engine::core::expense::{Expense, Share};
use settlement_engine::core::ledger::LedgerSnapshot;
use settlement_engine::core::participant::{Participant, ParticipantId};
use settlement_engine::settlement::balance::aggregate;
use settlement_engine::settlement::engine::{SettlementEngine, SettlementError};

const ALICE: u64 = 1;
const BOB: u64 = 2;
const CAROL: u64 = 3;

fn id(raw: u64) -> ParticipantId {
    ParticipantId::new(raw)
}

fn trio() -> Vec<Participant> {
    vec![
        Participant::new(ALICE, "Alice"),
        Participant::new(BOB, "Bob"),
        Participant::new(CAROL, "Carol"),
    ]
}

/// One payer fronts an evenly split bill.
#[test]
fn scenario_even_split_single_payer() {
    let dinner = Expense::new(ALICE, dec!(90), vec![
        Share::new(ALICE, dec!(30)),
        Share::new(BOB, dec!(30)),
        Share::new(CAROL, dec!(30)),
    ])
    .unwrap();

    let report = SettlementEngine::default()
        .compute_settlement(trio(), vec![dinner])
        .unwrap();

    assert_eq!(report.net_balance(id(ALICE)), Some(dec!(60)));
    assert_eq!(report.net_balance(id(BOB)), Some(dec!(-30)));
    assert_eq!(report.net_balance(id(CAROL)), Some(dec!(-30)));

    assert_eq!(report.transfers.len(), 2);
    assert_eq!(report.transfer_amount(id(BOB), id(ALICE)), dec!(30));
    assert_eq!(report.transfer_amount(id(CAROL), id(ALICE)), dec!(30));
}

/// A −30, B +10, C +20: the single debtor pays the larger creditor first.
#[test]
fn scenario_one_debtor_two_creditors() {
    let expenses = vec![
        Expense::new(BOB, dec!(10), vec![Share::new(ALICE, dec!(10))]).unwrap(),
        Expense::new(CAROL, dec!(20), vec![Share::new(ALICE, dec!(20))]).unwrap(),
    ];
    let snapshot = LedgerSnapshot::new(trio(), expenses);

    let engine = SettlementEngine::default();
    let balance = engine.net_balances(&snapshot).unwrap();
    assert_eq!(balance.get(id(ALICE)), dec!(-30));
    assert_eq!(balance.get(id(BOB)), dec!(10));
    assert_eq!(balance.get(id(CAROL)), dec!(20));

    let report = engine.settle(&snapshot).unwrap();
    assert_eq!(report.transfers.len(), 2);
    assert_eq!(report.transfer_amount(id(ALICE), id(CAROL)), dec!(20));
    assert_eq!(report.transfer_amount(id(ALICE), id(BOB)), dec!(10));
    assert!(report.transfers.iter().all(|t| t.from == id(ALICE)));
}

/// 100.00 split three ways, both with exact and cent-short shares.
#[test]
fn scenario_rounding_discrepancy_absorbed() {
    let exact = Expense::new(ALICE, dec!(100.00), vec![
        Share::new(ALICE, dec!(33.33)),
        Share::new(BOB, dec!(33.33)),
        Share::new(CAROL, dec!(33.34)),
    ])
    .unwrap();
    let report = SettlementEngine::default()
        .compute_settlement(trio(), vec![exact])
        .unwrap();
    assert_eq!(report.net_balance(id(ALICE)), Some(dec!(66.67)));
    assert_eq!(report.transfer_amount(id(CAROL), id(ALICE)), dec!(33.34));
    assert_eq!(report.transfer_amount(id(BOB), id(ALICE)), dec!(33.33));
    for entry in &report.summary {
        assert_eq!(entry.net_balance.scale(), 2);
    }

    // Shares one cent short of the total are still accepted.
    let short = Expense::new(ALICE, dec!(100.00), vec![
        Share::new(ALICE, dec!(33.33)),
        Share::new(BOB, dec!(33.33)),
        Share::new(CAROL, dec!(33.33)),
    ])
    .unwrap();
    let report = SettlementEngine::default()
        .compute_settlement(trio(), vec![short])
        .unwrap();
    assert_eq!(report.net_balance(id(ALICE)), Some(dec!(66.67)));
    assert_eq!(report.transfer_amount(id(BOB), id(ALICE)), dec!(33.33));
    assert_eq!(report.transfer_amount(id(CAROL), id(ALICE)), dec!(33.33));
    assert!(report.warnings.is_empty());
}

/// No expenses: everyone at zero, nothing to transfer.
#[test]
fn scenario_empty_ledger() {
    let report = SettlementEngine::default()
        .compute_settlement(trio(), vec![])
        .unwrap();

    assert_eq!(report.summary.len(), 3);
    assert!(report.summary.iter().all(|s| s.net_balance == Decimal::ZERO));
    assert!(report.transfers.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.gross_total, Decimal::ZERO);
}

/// A weekend trip with several payers and uneven splits.
#[test]
fn multi_payer_trip() {
    let participants = vec![
        Participant::new(1, "ana"),
        Participant::new(2, "ben"),
        Participant::new(3, "chi"),
        Participant::new(4, "dev"),
    ];
    let everyone: Vec<ParticipantId> = (1..=4).map(ParticipantId::new).collect();
    let expenses = vec![
        Expense::split_evenly(1, dec!(240), &everyone).unwrap().with_description("cabin"),
        Expense::split_evenly(2, dec!(90), &everyone[..3]).unwrap().with_description("groceries"),
        Expense::new(3, dec!(45.50), vec![
            Share::new(3, dec!(20.50)),
            Share::new(4, dec!(25)),
        ])
        .unwrap(),
    ];

    let report = SettlementEngine::default()
        .compute_settlement(participants, expenses)
        .unwrap();

    // ana +150, ben 0, chi -65, dev -85.
    assert_eq!(report.net_balance(ParticipantId::new(1)), Some(dec!(150)));
    assert_eq!(report.transfer_amount(ParticipantId::new(4), ParticipantId::new(1)), dec!(85));
    let total: Decimal = report.summary.iter().map(|s| s.net_balance).sum();
    assert_eq!(total, Decimal::ZERO);
    assert_eq!(report.transfers.len(), 2);
    for entry in &report.summary {
        let received: Decimal = report
            .transfers
            .iter()
            .filter(|t| t.to == entry.participant)
            .map(|t| t.amount)
            .sum();
        let paid: Decimal = report
            .transfers
            .iter()
            .filter(|t| t.from == entry.participant)
            .map(|t| t.amount)
            .sum();
        assert_eq!(received - paid, entry.net_balance, "participant {}", entry.label);
    }
}

/// Inputs that crossed a serialization boundary are re-validated.
#[test]
fn deserialized_malformed_expense_is_refused() {
    let json = r#"{
        "participants": [
            { "id": 1, "label": "Alice" },
            { "id": 2, "label": "Bob" }
        ],
        "expenses": [
            { "payer": 1, "amount": "20", "shares": [{ "participant": 2, "amount": "10" }] }
        ]
    }"#;
    let snapshot: LedgerSnapshot = serde_json::from_str(json).unwrap();

    let err = SettlementEngine::default().settle(&snapshot).unwrap_err();
    assert!(matches!(err, SettlementError::MalformedExpense { index: 0, .. }));
}

#[test]
fn share_outside_participant_set_is_refused() {
    let expense = Expense::new(ALICE, dec!(20), vec![Share::new(99, dec!(20))]).unwrap();
    let err = SettlementEngine::default()
        .compute_settlement(trio(), vec![expense])
        .unwrap_err();
    assert_eq!(
        err,
        SettlementError::ReferentialIntegrity {
            expense_index: 0,
            participant: id(99),
        }
    );

    let snapshot = LedgerSnapshot::new(
        trio(),
        vec![Expense::new(ALICE, dec!(20), vec![Share::new(99, dec!(20))]).unwrap()],
    );
    assert!(aggregate(&snapshot).is_err());
}

/// Test JSON serialization of settlement reports.
#[test]
fn report_serializes() {
    let expense = Expense::new(ALICE, dec!(10), vec![Share::new(BOB, dec!(10))]).unwrap();
    let report = SettlementEngine::default()
        .compute_settlement(trio(), vec![expense])
        .unwrap();

    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["transfers"][0]["from"], 2);
    assert_eq!(parsed["transfers"][0]["to"], 1);
    assert_eq!(parsed["transfers"][0]["amount"], "10.00");
    assert_eq!(parsed["summary"][0]["label"], "Alice");
    assert!(parsed.get("warnings").is_none());
}

/// Same input, same output.
#[test]
fn settlement_is_deterministic() {
    let build = || {
        vec![
            Expense::new(ALICE, dec!(30), vec![Share::new(BOB, dec!(15)), Share::new(CAROL, dec!(15))]).unwrap(),
            Expense::new(BOB, dec!(12), vec![Share::new(ALICE, dec!(6)), Share::new(CAROL, dec!(6))]).unwrap(),
        ]
    };
    let engine = SettlementEngine::default();
    let a = engine.compute_settlement(trio(), build()).unwrap();
    let b = engine.compute_settlement(trio(), build()).unwrap();
    assert_eq!(a.transfers, b.transfers);
    assert_eq!(a.summary, b.summary);
}
