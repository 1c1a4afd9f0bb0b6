use crate::constants::BALANCE_TOLERANCE;
use crate::core::balance::{compute_balances, display_balances, suggest_settlements};
use crate::core::models::{Expense, Settlement};
use chrono::Utc;
use uuid::Uuid;

fn members(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn expense(group_id: &str, payer_id: &str, amount: f64) -> Expense {
    Expense {
        id: Uuid::new_v4().to_string(),
        group_id: group_id.to_string(),
        title: "Groceries".to_string(),
        amount,
        payer_id: payer_id.to_string(),
        date: Utc::now(),
        created_at: Utc::now(),
    }
}

fn settlement(group_id: &str, from: &str, to: &str, amount: f64) -> Settlement {
    Settlement {
        id: Uuid::new_v4().to_string(),
        group_id: group_id.to_string(),
        from_user_id: from.to_string(),
        to_user_id: to.to_string(),
        amount,
        date: Utc::now(),
    }
}

#[test]
fn equal_split_credits_payer_and_debits_the_rest() {
    let member_ids = members(&["a", "b", "c"]);
    let expenses = vec![expense("g", "a", 90.0)];

    let balances = compute_balances(&member_ids, &expenses, &[]);

    assert!((balances["a"] - 60.0).abs() < BALANCE_TOLERANCE);
    assert!((balances["b"] + 30.0).abs() < BALANCE_TOLERANCE);
    assert!((balances["c"] + 30.0).abs() < BALANCE_TOLERANCE);
}

#[test]
fn balances_conserve_to_zero() {
    let member_ids = members(&["a", "b", "c", "d"]);
    let expenses = vec![
        expense("g", "a", 123.45),
        expense("g", "b", 67.89),
        expense("g", "c", 10.01),
        expense("g", "a", 0.07),
    ];
    let settlements = vec![settlement("g", "b", "a", 25.0), settlement("g", "d", "c", 5.5)];

    let balances = compute_balances(&member_ids, &expenses, &settlements);

    let total: f64 = balances.values().sum();
    assert!(total.abs() < BALANCE_TOLERANCE, "sum was {}", total);
}

#[test]
fn worked_scenario_with_settlement() {
    // A pays 300, B pays 60, C pays 30, then B pays A 50 directly.
    let member_ids = members(&["a", "b", "c"]);
    let expenses = vec![
        expense("g", "a", 300.0),
        expense("g", "b", 60.0),
        expense("g", "c", 30.0),
    ];

    let raw = compute_balances(&member_ids, &expenses, &[]);
    assert!((raw["a"] - 170.0).abs() < BALANCE_TOLERANCE);
    assert!((raw["b"] + 70.0).abs() < BALANCE_TOLERANCE);
    assert!((raw["c"] + 100.0).abs() < BALANCE_TOLERANCE);

    let settled = compute_balances(&member_ids, &expenses, &[settlement("g", "b", "a", 50.0)]);
    assert!((settled["a"] - 120.0).abs() < BALANCE_TOLERANCE);
    assert!((settled["b"] + 20.0).abs() < BALANCE_TOLERANCE);
    assert!((settled["c"] + 100.0).abs() < BALANCE_TOLERANCE);
    assert!(settled.values().sum::<f64>().abs() < BALANCE_TOLERANCE);
}

#[test]
fn settlement_shifts_only_the_two_parties() {
    let member_ids = members(&["a", "b", "c"]);
    let expenses = vec![expense("g", "a", 90.0)];

    let before = compute_balances(&member_ids, &expenses, &[]);
    let after = compute_balances(&member_ids, &expenses, &[settlement("g", "b", "a", 30.0)]);

    assert!((after["b"] - (before["b"] + 30.0)).abs() < BALANCE_TOLERANCE);
    assert!((after["a"] - (before["a"] - 30.0)).abs() < BALANCE_TOLERANCE);
    assert!((after["c"] - before["c"]).abs() < BALANCE_TOLERANCE);
}

#[test]
fn recomputation_over_same_snapshot_is_identical() {
    let member_ids = members(&["a", "b"]);
    let expenses = vec![expense("g", "a", 33.33), expense("g", "b", 11.11)];
    let settlements = vec![settlement("g", "b", "a", 7.77)];

    let first = compute_balances(&member_ids, &expenses, &settlements);
    let second = compute_balances(&member_ids, &expenses, &settlements);

    assert_eq!(first, second);
}

#[test]
fn single_member_group_stays_at_zero() {
    let member_ids = members(&["solo"]);
    let expenses = vec![expense("g", "solo", 250.0), expense("g", "solo", 13.5)];

    let balances = compute_balances(&member_ids, &expenses, &[]);

    assert!(balances["solo"].abs() < BALANCE_TOLERANCE);
}

#[test]
fn departed_payer_earns_no_entry() {
    // "ghost" paid while a member but is no longer in the member list.
    let member_ids = members(&["a", "b"]);
    let expenses = vec![expense("g", "ghost", 100.0)];

    let balances = compute_balances(&member_ids, &expenses, &[]);

    assert!(!balances.contains_key("ghost"));
    assert!((balances["a"] + 50.0).abs() < BALANCE_TOLERANCE);
    assert!((balances["b"] + 50.0).abs() < BALANCE_TOLERANCE);
}

#[test]
fn display_filter_drops_dust() {
    let member_ids = members(&["a", "b", "c"]);
    // 0.01 split three ways leaves everyone under the display epsilon.
    let expenses = vec![expense("g", "a", 0.01)];

    let raw = compute_balances(&member_ids, &expenses, &[]);
    let shown = display_balances(&raw);

    assert!(shown.is_empty());
    assert_eq!(raw.len(), 3);
}

#[test]
fn display_orders_creditors_first() {
    let member_ids = members(&["a", "b", "c"]);
    let expenses = vec![expense("g", "a", 300.0), expense("g", "b", 60.0)];

    let shown = display_balances(&compute_balances(&member_ids, &expenses, &[]));

    assert_eq!(shown[0].user_id, "a");
    assert!(shown.windows(2).all(|w| w[0].amount >= w[1].amount));
}

#[test]
fn suggestions_settle_the_group() {
    let member_ids = members(&["a", "b", "c"]);
    let expenses = vec![
        expense("g", "a", 300.0),
        expense("g", "b", 60.0),
        expense("g", "c", 30.0),
    ];

    let raw = compute_balances(&member_ids, &expenses, &[]);
    let suggestions = suggest_settlements(&raw);

    // Applying every suggestion as a settlement zeroes everyone out.
    let applied: Vec<Settlement> = suggestions
        .iter()
        .map(|s| settlement("g", &s.from_user_id, &s.to_user_id, s.amount))
        .collect();
    let after = compute_balances(&member_ids, &expenses, &applied);
    assert!(display_balances(&after).is_empty());
}

#[test]
fn no_suggestions_for_a_settled_group() {
    let member_ids = members(&["a", "b"]);
    let expenses = vec![expense("g", "a", 50.0)];
    let settlements = vec![settlement("g", "b", "a", 25.0)];

    let raw = compute_balances(&member_ids, &expenses, &settlements);
    assert!(suggest_settlements(&raw).is_empty());
}

#[test]
fn no_members_means_no_balances() {
    let balances = compute_balances(&[], &[expense("g", "a", 10.0)], &[]);
    assert!(balances.is_empty());
}
