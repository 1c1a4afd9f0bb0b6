//! Balance engine: a pure, single-pass fold over a group's expenses and
//! settlements. Nothing here touches storage; callers fetch the data and
//! hand it in, so recomputation is always over a consistent snapshot.

use crate::constants::DISPLAY_EPSILON;
use crate::core::models::{Expense, Settlement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use utoipa::ToSchema;

/// One member's signed net position. Positive means the member is owed
/// money; negative means the member owes.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberBalance {
    pub user_id: String,
    pub amount: f64,
}

/// A proposed transfer that would move the group toward all-zero balances.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SettlementSuggestion {
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: f64,
}

/// Computes every current member's net position.
///
/// Each expense is split equally across the *current* member set, not the
/// membership at the time the expense was created: the payer is credited
/// `amount - share`, every other current member debited `share`. Each
/// settlement then moves `amount` from the receiver's position to the
/// payer's. Values sum to zero (within floating-point rounding) whenever
/// every expense payer is still a member.
///
/// A payer who is no longer in `member_ids` earns no entry in the result;
/// their credit is orphaned. That case is unreachable through the normal
/// flows (no leave operation exists) but is logged rather than dropped
/// silently.
pub fn compute_balances(
    member_ids: &[String],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> HashMap<String, f64> {
    let mut balances: HashMap<String, f64> =
        member_ids.iter().map(|id| (id.clone(), 0.0)).collect();

    let member_count = member_ids.len();
    if member_count == 0 {
        return balances;
    }

    for expense in expenses {
        let share = expense.amount / member_count as f64;
        if !member_ids.iter().any(|id| *id == expense.payer_id) {
            warn!(
                expense_id = %expense.id,
                payer_id = %expense.payer_id,
                "expense payer is not a current member; credit is orphaned"
            );
        }
        for member_id in member_ids {
            if *member_id == expense.payer_id {
                *balances.entry(member_id.clone()).or_insert(0.0) += expense.amount - share;
            } else {
                *balances.entry(member_id.clone()).or_insert(0.0) -= share;
            }
        }
    }

    for settlement in settlements {
        *balances.entry(settlement.from_user_id.clone()).or_insert(0.0) += settlement.amount;
        *balances.entry(settlement.to_user_id.clone()).or_insert(0.0) -= settlement.amount;
    }

    balances
}

/// Filters out sub-epsilon dust and orders creditors first, largest
/// positions leading. Presentation concern only; conservation is checked
/// against the unfiltered map.
pub fn display_balances(balances: &HashMap<String, f64>) -> Vec<MemberBalance> {
    let mut entries: Vec<MemberBalance> = balances
        .iter()
        .filter(|(_, amount)| amount.abs() >= DISPLAY_EPSILON)
        .map(|(user_id, amount)| MemberBalance {
            user_id: user_id.clone(),
            amount: *amount,
        })
        .collect();
    entries.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

/// Greedy creditor/debtor matching: repeatedly pair the largest creditor
/// with the largest debtor until everyone is within the display epsilon.
/// The suggestions conserve the net positions they are derived from.
pub fn suggest_settlements(balances: &HashMap<String, f64>) -> Vec<SettlementSuggestion> {
    let mut creditors: Vec<(String, f64)> = balances
        .iter()
        .filter(|(_, amount)| **amount > DISPLAY_EPSILON)
        .map(|(id, amount)| (id.clone(), *amount))
        .collect();
    let mut debtors: Vec<(String, f64)> = balances
        .iter()
        .filter(|(_, amount)| **amount < -DISPLAY_EPSILON)
        .map(|(id, amount)| (id.clone(), -*amount))
        .collect();

    creditors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    debtors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut suggestions = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < debtors.len() && j < creditors.len() {
        let transfer = debtors[i].1.min(creditors[j].1);
        if transfer > DISPLAY_EPSILON {
            suggestions.push(SettlementSuggestion {
                from_user_id: debtors[i].0.clone(),
                to_user_id: creditors[j].0.clone(),
                amount: transfer,
            });
        }
        debtors[i].1 -= transfer;
        creditors[j].1 -= transfer;
        if debtors[i].1 <= DISPLAY_EPSILON {
            i += 1;
        }
        if creditors[j].1 <= DISPLAY_EPSILON {
            j += 1;
        }
    }

    suggestions
}
