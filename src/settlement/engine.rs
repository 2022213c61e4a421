//! Balance computation and greedy debt settlement.
//!
//! Everything here is a pure function of the expense snapshot passed in.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::expense::{Expense, ParticipantId};

/// Balances closer to zero than half a cent count as settled.
pub const SETTLED_EPSILON: f64 = 0.005;

/// One participant's position in the split.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    /// Member identity.
    pub participant_id: ParticipantId,
    /// Total this member has paid.
    pub paid: f64,
    /// `paid - share`; positive means the member is owed money.
    pub net: f64,
}

/// Result of splitting the expense history.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSheet {
    /// Sum of every expense.
    pub total: f64,
    /// What each household member should have contributed.
    pub share_per_person: f64,
    /// Balances in the order participants were first seen.
    pub balances: Vec<Balance>,
}

impl BalanceSheet {
    /// Balance entry for a member, if they appear in the sheet.
    pub fn balance_of(&self, participant_id: ParticipantId) -> Option<&Balance> {
        self.balances
            .iter()
            .find(|b| b.participant_id == participant_id)
    }

    /// Net balance of a member.
    ///
    /// A member who has never paid still owes a full share.
    pub fn net_of(&self, participant_id: ParticipantId) -> f64 {
        self.balance_of(participant_id)
            .map(|b| b.net)
            .unwrap_or(-self.share_per_person)
    }
}

/// A payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: f64,
}

/// Outcome of settling a balance sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// Nobody owes anybody.
    Settled,
    /// Transfers in the order they should be made.
    Transfers(Vec<Transfer>),
}

impl Settlement {
    /// Transfers to make; empty when settled.
    pub fn transfers(&self) -> &[Transfer] {
        match self {
            Settlement::Settled => &[],
            Settlement::Transfers(transfers) => transfers,
        }
    }

    /// Sum of all transfer amounts.
    pub fn total_transferred(&self) -> f64 {
        self.transfers().iter().map(|t| t.amount).sum()
    }
}

/// How a new payment splits between the payer's own debt and the shared pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseSplit {
    /// Payer's net balance before the payment.
    pub payer_balance: f64,
    /// Part of the payment that clears the payer's existing debt.
    pub debt_reduction: f64,
    /// Part of the payment left over to be split with the household.
    pub remaining_split_amount: f64,
}

/// Compute every payer's net balance.
///
/// Only members who appear as payers are listed.
pub fn compute_balances(expenses: &[Expense], participant_count: NonZeroUsize) -> BalanceSheet {
    compute_balances_with_roster(expenses, participant_count, &[])
}

/// Compute net balances, listing every roster member even if they never paid.
///
/// Roster members come first in roster order, followed by any other payers in
/// order of their first expense.
pub fn compute_balances_with_roster(
    expenses: &[Expense],
    participant_count: NonZeroUsize,
    roster: &[ParticipantId],
) -> BalanceSheet {
    let mut order: Vec<ParticipantId> = Vec::new();
    let mut paid: HashMap<ParticipantId, f64> = HashMap::new();

    for &id in roster {
        if paid.insert(id, 0.0).is_none() {
            order.push(id);
        }
    }

    for expense in expenses {
        let total = paid.entry(expense.participant_id).or_insert_with(|| {
            order.push(expense.participant_id);
            0.0
        });
        *total += expense.amount;
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let share_per_person = total / participant_count.get() as f64;

    let balances = order
        .into_iter()
        .map(|participant_id| {
            let paid = paid.get(&participant_id).copied().unwrap_or(0.0);
            Balance {
                participant_id,
                paid,
                net: paid - share_per_person,
            }
        })
        .collect();

    BalanceSheet {
        total,
        share_per_person,
        balances,
    }
}

/// Turn balances into an ordered list of debtor-to-creditor transfers.
///
/// Each debtor, in order, pays creditors in order until their debt is gone;
/// a creditor is skipped once fully repaid.
pub fn settle_debts(balances: &[Balance]) -> Settlement {
    let debtors: Vec<(ParticipantId, f64)> = balances
        .iter()
        .filter(|b| b.net < -SETTLED_EPSILON)
        .map(|b| (b.participant_id, -b.net))
        .collect();
    let mut creditors: Vec<(ParticipantId, f64)> = balances
        .iter()
        .filter(|b| b.net > SETTLED_EPSILON)
        .map(|b| (b.participant_id, b.net))
        .collect();

    if debtors.is_empty() && creditors.is_empty() {
        return Settlement::Settled;
    }

    let mut transfers = Vec::new();
    let mut next_creditor = 0;

    for (debtor, mut owed) in debtors {
        while owed > SETTLED_EPSILON && next_creditor < creditors.len() {
            let (creditor, credit) = &mut creditors[next_creditor];
            let amount = owed.min(*credit);

            transfers.push(Transfer {
                from: debtor,
                to: *creditor,
                amount,
            });

            owed -= amount;
            *credit -= amount;
            if *credit <= SETTLED_EPSILON {
                next_creditor += 1;
            }
        }
    }

    Settlement::Transfers(transfers)
}

/// Work out how much of a new payment covers the payer's own debt.
///
/// `existing` must not include the new payment. Nothing is stored; the caller
/// records the full amount.
pub fn apply_new_expense(
    existing: &[Expense],
    participant_count: NonZeroUsize,
    payer: ParticipantId,
    new_amount: f64,
) -> ExpenseSplit {
    let sheet = compute_balances(existing, participant_count);
    let payer_balance = sheet.net_of(payer);

    let debt_reduction = if payer_balance < 0.0 {
        new_amount.min(payer_balance.abs())
    } else {
        0.0
    };

    ExpenseSplit {
        payer_balance,
        debt_reduction,
        remaining_split_amount: new_amount - debt_reduction,
    }
}
