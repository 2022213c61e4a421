//! Polling loop behaviour: batching, delivery failures and shutdown.

mod common;

use std::time::Duration;

use common::{household, message, test_bot, Batch, MemoryTransport, GROUP_CHAT};
use housebot::expense::ExpenseRepository;
use housebot::{Bot, Database, IncomingMessage, Sender};

#[tokio::test]
async fn test_poll_once_answers_commands_only() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;

    bot.transport().push_messages(vec![
        message(1, "alice", "/addgrocery bread"),
        message(2, "bob", "anyone seen my keys?"),
        message(2, "bob", "/grocerylist"),
    ]);

    let delivered = bot.poll_once().await.unwrap();
    assert_eq!(delivered, 2);

    let sent = bot.transport().sent();
    assert_eq!(sent[0], (GROUP_CHAT, "🛒 Grocery item added: \"bread\"".to_string()));
    assert!(sent[1].1.contains("• bread (added by"));
}

#[tokio::test]
async fn test_poll_once_empty_batch() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;
    assert_eq!(bot.poll_once().await.unwrap(), 0);
    assert!(bot.transport().sent().is_empty());
}

#[tokio::test]
async fn test_failed_reply_does_not_stop_batch() {
    let transport = MemoryTransport::new().with_unreachable_chat(GROUP_CHAT);
    let mut bot = test_bot(transport, household(3)).await;

    let direct = IncomingMessage {
        chat_id: 42,
        sender: Sender::new(1, "alice"),
        text: "/chorelist".to_string(),
    };
    bot.transport().push_messages(vec![message(1, "alice", "/addchore mop"), direct]);

    let delivered = bot.poll_once().await.unwrap();
    assert_eq!(delivered, 1);

    let sent = bot.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 42);
    // The undelivered command still took effect.
    assert!(sent[0].1.starts_with("📝 Chore List:\n1. mop"));
}

#[tokio::test]
async fn test_poll_once_surfaces_receive_errors() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;
    bot.transport().push(Batch::Fail("network down".to_string()));

    let err = bot.poll_once().await.unwrap_err();
    assert!(err.to_string().contains("network down"));
}

#[tokio::test]
async fn test_run_stops_on_shutdown_even_while_backing_off() {
    let mut bot = test_bot(MemoryTransport::new(), household(3)).await;
    bot.transport()
        .push_messages(vec![message(1, "alice", "/addchore vacuum")]);
    bot.transport().push(Batch::Fail("network down".to_string()));
    bot.transport()
        .push_messages(vec![message(1, "alice", "/addchore never handled")]);

    let finished = tokio::time::timeout(
        Duration::from_secs(3),
        bot.run(tokio::time::sleep(Duration::from_millis(200))),
    )
    .await;
    assert!(finished.is_ok(), "run did not stop on shutdown");

    assert_eq!(
        bot.transport().sent_texts(),
        vec!["✅ Chore recorded: \"vacuum\"".to_string()]
    );
}

#[tokio::test]
async fn test_run_finishes_received_batch_before_stopping() {
    let transport = MemoryTransport::new().with_reply_delay(Duration::from_millis(100));
    let db = Database::open_in_memory().await.unwrap();
    let mut bot = Bot::new(transport, db.clone(), household(3));
    bot.transport().push_messages(vec![
        message(1, "alice", "/addexpense 10 a"),
        message(2, "bob", "/addexpense 20 b"),
        message(3, "carol", "/addexpense 30 c"),
    ]);

    let finished = tokio::time::timeout(
        Duration::from_secs(3),
        bot.run(tokio::time::sleep(Duration::from_millis(150))),
    )
    .await;
    assert!(finished.is_ok(), "run did not stop on shutdown");

    assert_eq!(bot.transport().sent().len(), 3);
    assert_eq!(ExpenseRepository::new(db.pool()).count().await.unwrap(), 3);
    assert!(bot.transport().acknowledged());
}

#[tokio::test]
async fn test_run_ignores_commands_for_other_bots() {
    let db = Database::open_in_memory().await.unwrap();
    let mut bot = Bot::new(MemoryTransport::new(), db, household(3)).with_username("HouseBot");
    bot.transport().push_messages(vec![
        message(1, "alice", "/start@OtherBot"),
        message(1, "alice", "/addgrocery@OtherBot milk"),
        message(1, "alice", "/grocerylist@HouseBot"),
    ]);

    assert_eq!(bot.poll_once().await.unwrap(), 1);
    assert_eq!(
        bot.transport().sent_texts(),
        vec!["No grocery items have been added yet.".to_string()]
    );
}
