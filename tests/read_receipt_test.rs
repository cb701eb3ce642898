mod common;

use std::time::Duration;

use chat_core::error::AppError;
use chat_core::services::{MessageService, ReadReceiptService};
use common::{direct, state};
use uuid::Uuid;

#[tokio::test]
async fn everything_is_unread_without_a_receipt() {
    let state = state();
    let conversation_id = direct(&state, "user_a", "user_b").await;

    MessageService::send_message(&state, conversation_id, "user_a", "one")
        .await
        .unwrap();
    MessageService::send_message(&state, conversation_id, "user_a", "two")
        .await
        .unwrap();

    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_b").await,
        2
    );
    // a sender's own messages are never unread for them
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_a").await,
        0
    );
}

#[tokio::test]
async fn mark_as_read_zeroes_and_later_messages_count_again() {
    let state = state();
    let conversation_id = direct(&state, "user_a", "user_b").await;

    MessageService::send_message(&state, conversation_id, "user_a", "before")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    ReadReceiptService::mark_as_read(&state, conversation_id, "user_b")
        .await
        .unwrap();
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_b").await,
        0
    );

    tokio::time::sleep(Duration::from_millis(5)).await;
    MessageService::send_message(&state, conversation_id, "user_a", "after one")
        .await
        .unwrap();
    MessageService::send_message(&state, conversation_id, "user_a", "after two")
        .await
        .unwrap();
    // B's own reply does not count toward B's unread
    MessageService::send_message(&state, conversation_id, "user_b", "my reply")
        .await
        .unwrap();

    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_b").await,
        2
    );
}

#[tokio::test]
async fn repeated_mark_as_read_is_idempotent() {
    let state = state();
    let conversation_id = direct(&state, "user_a", "user_b").await;

    MessageService::send_message(&state, conversation_id, "user_a", "hello")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    for _ in 0..3 {
        ReadReceiptService::mark_as_read(&state, conversation_id, "user_b")
            .await
            .unwrap();
    }
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_b").await,
        0
    );
}

#[tokio::test]
async fn unread_counts_map_covers_receipted_conversations_only() {
    let state = state();
    let with_receipt = direct(&state, "user_a", "user_b").await;
    let without_receipt = direct(&state, "user_c", "user_b").await;

    ReadReceiptService::mark_as_read(&state, with_receipt, "user_b")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    MessageService::send_message(&state, with_receipt, "user_a", "ping")
        .await
        .unwrap();
    MessageService::send_message(&state, without_receipt, "user_c", "pong")
        .await
        .unwrap();

    let counts = ReadReceiptService::get_unread_counts(&state, "user_b").await;
    assert_eq!(counts.get(&with_receipt), Some(&1));
    // no receipt yet: the caller derives "all unread" from the listing instead
    assert!(!counts.contains_key(&without_receipt));
}

#[tokio::test]
async fn mark_as_read_is_guarded() {
    let state = state();
    let conversation_id = direct(&state, "user_a", "user_b").await;

    let outsider = ReadReceiptService::mark_as_read(&state, conversation_id, "user_x").await;
    assert!(matches!(outsider, Err(AppError::Forbidden)));

    let missing = ReadReceiptService::mark_as_read(&state, Uuid::new_v4(), "user_a").await;
    assert!(matches!(missing, Err(AppError::NotFound)));
}

#[tokio::test]
async fn deleted_messages_still_count_as_unread() {
    let state = state();
    let conversation_id = direct(&state, "user_a", "user_b").await;

    let message_id = MessageService::send_message(&state, conversation_id, "user_a", "oops")
        .await
        .unwrap();
    MessageService::delete_message(&state, message_id, "user_a")
        .await
        .unwrap();

    // the tombstone is still a message B has not read
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_b").await,
        1
    );
}
