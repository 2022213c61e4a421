//! End-to-end command scenarios through the bot and an in-memory transport.

mod common;

use common::{household, say, test_bot, MemoryTransport};
use housebot::{Bot, Database};

#[tokio::test]
async fn test_balance_after_expenses() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    say(&mut bot, 1, "alice", "/setemoji 🍕").await;
    say(&mut bot, 2, "bob", "/setemoji 🐢").await;
    say(&mut bot, 1, "alice", "/addexpense 90 groceries").await;
    say(&mut bot, 2, "bob", "/addexpense 30 soap").await;

    let report = say(&mut bot, 3, "carol", "/balance").await;
    assert_eq!(
        report,
        "💰 Expense Balance Summary 💰\n\
         Total expenses: 120.00\n\
         Each person should contribute: 40.00\n\
         \n\
         💼 🍕 alice Paid 90.00, Balance: 50.00\n\
         💼 🐢 bob Paid 30.00, Balance: -10.00\n\
         \n\
         🧮 Who owes whom:\n\
         🔗 🐢 bob owes 🍕 alice 10.00"
    );
}

#[tokio::test]
async fn test_balance_with_roster_shows_non_payers() {
    let mut config = household(3);
    config.roster = vec![1, 2, 3];
    let mut bot = test_bot(MemoryTransport::new(), config).await;

    say(&mut bot, 1, "alice", "/addexpense 90 groceries").await;
    say(&mut bot, 2, "bob", "/addexpense 30 soap").await;

    let report = say(&mut bot, 1, "alice", "/balance").await;
    assert!(report.contains("💼 🤔 alice Paid 90.00, Balance: 50.00"));
    assert!(report.contains("💼 🤔 Paid 0.00, Balance: -40.00"));

    let transfers: Vec<&str> = report.lines().filter(|l| l.starts_with("🔗")).collect();
    assert_eq!(
        transfers,
        vec!["🔗 🤔 bob owes 🤔 alice 10.00", "🔗 🤔 owes 🤔 alice 40.00"]
    );
}

#[tokio::test]
async fn test_balance_everyone_settled() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    say(&mut bot, 1, "alice", "/addexpense 30 rent").await;
    say(&mut bot, 2, "bob", "/addexpense 30 power").await;
    say(&mut bot, 3, "carol", "/addexpense 30 internet").await;

    let report = say(&mut bot, 1, "alice", "/balance").await;
    assert!(report.ends_with("🧮 Who owes whom:\nEveryone is settled! 🎉"));
}

#[tokio::test]
async fn test_balance_with_no_expenses() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    let report = say(&mut bot, 1, "alice", "/balance").await;
    assert!(report.contains("Total expenses: 0.00"));
    assert!(report.contains("Each person should contribute: 0.00"));
    assert!(!report.contains("💼"));
    assert!(report.ends_with("Everyone is settled! 🎉"));
}

#[tokio::test]
async fn test_expense_reduces_payer_debt_first() {
    let mut bot = test_bot(MemoryTransport::new(), household(2)).await;

    say(&mut bot, 1, "alice", "/addexpense 30 rent").await;
    // bob owes 15 and pays 20: 15 covers the debt, 5 is new shared spend.
    let reply = say(&mut bot, 2, "bob", "/addexpense 20 water").await;
    assert_eq!(
        reply,
        "✅ Expense recorded: 20.00 for \"water\"\nRemaining amount to be split: 5.00"
    );

    // The full 20 is stored.
    let report = say(&mut bot, 1, "alice", "/balance").await;
    assert!(report.contains("Total expenses: 50.00"));
    assert!(report.contains("💼 🤔 bob Paid 20.00, Balance: -5.00"));
}

#[tokio::test]
async fn test_grocery_flow() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    assert_eq!(
        say(&mut bot, 1, "alice", "/grocerylist").await,
        "No grocery items have been added yet."
    );

    say(&mut bot, 2, "bob", "/setemoji 🐢").await;
    assert_eq!(
        say(&mut bot, 2, "bob", "/addgrocery milk").await,
        "🛒 Grocery item added: \"milk\""
    );
    say(&mut bot, 1, "alice", "/addgrocery eggs").await;

    let list = say(&mut bot, 1, "alice", "/grocerylist").await;
    let lines: Vec<&str> = list.lines().collect();
    assert_eq!(lines[0], "🛒 Grocery List 🛒");
    assert!(lines[1].starts_with("• eggs (added by 🤔 on "));
    assert!(lines[2].starts_with("• milk (added by 🐢 on "));

    // A case-different description does not clear the item.
    let reply = say(&mut bot, 1, "alice", "/addexpense 3 Milk").await;
    assert!(!reply.contains("removed from the list"));

    let reply = say(&mut bot, 1, "alice", "/addexpense 2,40 milk").await;
    assert!(reply.starts_with("✅ Expense recorded: 2.40 for \"milk\""));
    assert!(reply.ends_with("🛒 Grocery item \"milk\" has been removed from the list."));

    let list = say(&mut bot, 1, "alice", "/grocerylist").await;
    assert_eq!(list.lines().count(), 2);
    assert!(!list.contains("milk"));
}

#[tokio::test]
async fn test_chore_flow() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    assert_eq!(
        say(&mut bot, 1, "alice", "/addchore dishes").await,
        "✅ Chore recorded: \"dishes\""
    );
    assert_eq!(
        say(&mut bot, 1, "alice", "/assignchore @Bob trash").await,
        "✅ Chore assigned to @Bob: \"trash\""
    );
    assert_eq!(
        say(&mut bot, 1, "alice", "/assignchore Bob trash").await,
        "Please enter the chore assignment in the format: /assignchore @username <chore description>"
    );

    // Someone else cannot complete alice's chore.
    assert_eq!(
        say(&mut bot, 2, "bob", "/completechore dishes").await,
        "❌ Could not find a pending chore with the description: \"dishes\""
    );
    assert_eq!(
        say(&mut bot, 2, "bob", "/completechore trash").await,
        "✅ Chore marked as completed: \"trash\""
    );
    // Already completed.
    assert!(say(&mut bot, 2, "bob", "/completechore trash")
        .await
        .starts_with("❌ Could not find"));

    let list = say(&mut bot, 3, "carol", "/chorelist").await;
    let lines: Vec<&str> = list.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "📝 Chore List:");
    assert!(lines[1].starts_with("1. dishes - 🤔 (Assigned on "));
}

#[tokio::test]
async fn test_showuser_lists_preferences() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    say(&mut bot, 2, "bob", "/setemoji 🐢").await;
    say(&mut bot, 1, "alice", "/setemoji 🍕").await;
    say(&mut bot, 1, "alice", "/setemoji 🌮").await;

    assert_eq!(
        say(&mut bot, 3, "carol", "/showuser").await,
        "👥 User Emoji List:\n🌮 - @alice - 1\n🐢 - @bob - 2"
    );
}

#[tokio::test]
async fn test_rentdays_reply_shape() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    let reply = say(&mut bot, 1, "alice", "/rentdays").await;
    let days: i64 = reply
        .strip_prefix("There are ")
        .and_then(|rest| rest.strip_suffix(" days left until the 27th."))
        .and_then(|n| n.parse().ok())
        .unwrap();
    assert!((0..=31).contains(&days));
}

#[tokio::test]
async fn test_help_and_unknown() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    let help = say(&mut bot, 1, "alice", "/start").await;
    assert!(help.contains("/addexpense <amount> <description>"));
    assert!(help.contains("/rentdays"));

    let unknown = say(&mut bot, 1, "alice", "/splitbill 10").await;
    assert_eq!(
        unknown,
        "Unknown command /splitbill. Try /help for the list of commands."
    );
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("housebot.db");

    {
        let db = Database::open(&path).await.unwrap();
        let mut bot = Bot::new(MemoryTransport::new(), db.clone(), household(2));
        say(&mut bot, 1, "alice", "/setemoji 🍕").await;
        say(&mut bot, 1, "alice", "/addexpense 40 rent").await;
        db.close().await;
    }

    let db = Database::open(&path).await.unwrap();
    let mut bot = Bot::new(MemoryTransport::new(), db, household(2));
    let report = say(&mut bot, 2, "bob", "/balance").await;
    assert!(report.contains("💼 🍕 alice Paid 40.00, Balance: 20.00"));
}
