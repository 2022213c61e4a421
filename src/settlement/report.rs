//! Chat-friendly formatting of balances and settlements.

use std::fmt::Write;

use super::engine::{BalanceSheet, ExpenseSplit, Settlement, SETTLED_EPSILON};
use crate::preference::MemberDirectory;

/// Format an amount with two decimals, never printing "-0.00".
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0.00".to_string()
    } else {
        format!("{rounded:.2}")
    }
}

/// Build the `balance` reply.
pub fn format_balance_report(
    sheet: &BalanceSheet,
    settlement: &Settlement,
    members: &MemberDirectory,
) -> String {
    let mut reply = String::from("💰 Expense Balance Summary 💰\n");
    let _ = writeln!(reply, "Total expenses: {}", format_amount(sheet.total));
    let _ = writeln!(
        reply,
        "Each person should contribute: {}",
        format_amount(sheet.share_per_person)
    );
    reply.push('\n');

    for balance in &sheet.balances {
        let _ = writeln!(
            reply,
            "💼 {} Paid {}, Balance: {}",
            members.label_for_id(balance.participant_id),
            format_amount(balance.paid),
            format_amount(balance.net)
        );
    }

    reply.push_str("\n🧮 Who owes whom:\n");

    match settlement {
        Settlement::Settled => reply.push_str("Everyone is settled! 🎉"),
        Settlement::Transfers(transfers) => {
            for transfer in transfers {
                let _ = writeln!(
                    reply,
                    "🔗 {} owes {} {}",
                    members.label_for_id(transfer.from),
                    members.label_for_id(transfer.to),
                    format_amount(transfer.amount)
                );
            }
        }
    }

    reply.trim_end().to_string()
}

/// Lines describing how a new expense was split, appended to the confirmation.
pub fn format_split(split: &ExpenseSplit) -> String {
    if split.remaining_split_amount > SETTLED_EPSILON {
        format!(
            "Remaining amount to be split: {}",
            format_amount(split.remaining_split_amount)
        )
    } else {
        "No remaining amount to split after covering personal debt.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::UserPreference;
    use crate::settlement::engine::{Balance, Transfer};
    use chrono::Utc;

    fn directory() -> MemberDirectory {
        let prefs = vec![
            UserPreference {
                participant_id: 1,
                display_name: "alice".to_string(),
                emoji: "🍕".to_string(),
                updated_at: Utc::now(),
            },
            UserPreference {
                participant_id: 2,
                display_name: "bob".to_string(),
                emoji: "🐢".to_string(),
                updated_at: Utc::now(),
            },
        ];
        MemberDirectory::new(prefs, "🤔")
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.0), "12.00");
        assert_eq!(format_amount(3.14159), "3.14");
        assert_eq!(format_amount(-20.0), "-20.00");
        assert_eq!(format_amount(-0.0001), "0.00");
        assert_eq!(format_amount(0.005), "0.01");
    }

    #[test]
    fn test_report_with_transfers() {
        let sheet = BalanceSheet {
            total: 60.0,
            share_per_person: 30.0,
            balances: vec![
                Balance {
                    participant_id: 1,
                    paid: 50.0,
                    net: 20.0,
                },
                Balance {
                    participant_id: 2,
                    paid: 10.0,
                    net: -20.0,
                },
            ],
        };
        let settlement = Settlement::Transfers(vec![Transfer {
            from: 2,
            to: 1,
            amount: 20.0,
        }]);

        let report = format_balance_report(&sheet, &settlement, &directory());
        assert!(report.starts_with("💰 Expense Balance Summary 💰"));
        assert!(report.contains("Total expenses: 60.00"));
        assert!(report.contains("Each person should contribute: 30.00"));
        assert!(report.contains("💼 🍕 alice Paid 50.00, Balance: 20.00"));
        assert!(report.contains("💼 🐢 bob Paid 10.00, Balance: -20.00"));
        assert!(report.contains("🔗 🐢 bob owes 🍕 alice 20.00"));
        assert!(!report.contains("settled"));
    }

    #[test]
    fn test_report_settled() {
        let sheet = BalanceSheet {
            total: 0.0,
            share_per_person: 0.0,
            balances: Vec::new(),
        };

        let report = format_balance_report(&sheet, &Settlement::Settled, &directory());
        assert!(report.contains("Total expenses: 0.00"));
        assert!(report.ends_with("Everyone is settled! 🎉"));
    }

    #[test]
    fn test_report_unknown_member_uses_default_emoji() {
        let sheet = BalanceSheet {
            total: 9.0,
            share_per_person: 3.0,
            balances: vec![Balance {
                participant_id: 77,
                paid: 9.0,
                net: 6.0,
            }],
        };

        let report = format_balance_report(&sheet, &Settlement::Transfers(vec![]), &directory());
        assert!(report.contains("💼 🤔 Paid 9.00, Balance: 6.00"));
    }

    #[test]
    fn test_format_split() {
        let split = ExpenseSplit {
            payer_balance: -15.0,
            debt_reduction: 15.0,
            remaining_split_amount: 5.0,
        };
        assert_eq!(format_split(&split), "Remaining amount to be split: 5.00");

        let covered = ExpenseSplit {
            payer_balance: -15.0,
            debt_reduction: 10.0,
            remaining_split_amount: 0.0,
        };
        assert!(format_split(&covered).starts_with("No remaining amount"));
    }
}
