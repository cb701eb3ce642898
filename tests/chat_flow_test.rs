mod common;

use std::time::Duration;

use chat_core::services::{
    ConversationService, MessageService, ReadReceiptService, TypingService, UserService,
};
use common::{seed_user, state};

/// First-contact flow: profiles sync in, A messages B, B catches up.
#[tokio::test]
async fn first_contact_direct_message_flow() {
    let state = state();
    seed_user(&state, "user_alice", "Alice").await;
    seed_user(&state, "user_bob", "Bob").await;

    let conversation_id =
        ConversationService::get_or_create_direct(&state, "user_alice", "user_bob")
            .await
            .unwrap();
    MessageService::send_message(&state, conversation_id, "user_alice", "hi")
        .await
        .unwrap();

    // the conversation shows up for B with the preview in place
    let bobs = ConversationService::get_my_conversations(&state, "user_bob").await;
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].id, conversation_id);
    assert_eq!(bobs[0].last_message_preview, "hi");

    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_bob").await,
        1
    );

    ReadReceiptService::mark_as_read(&state, conversation_id, "user_bob")
        .await
        .unwrap();
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_bob").await,
        0
    );
}

#[tokio::test]
async fn reply_flow_with_typing_and_receipts() {
    let state = state();
    seed_user(&state, "user_alice", "Alice").await;
    seed_user(&state, "user_bob", "Bob").await;

    let conversation_id =
        ConversationService::get_or_create_direct(&state, "user_alice", "user_bob")
            .await
            .unwrap();
    MessageService::send_message(&state, conversation_id, "user_alice", "hi")
        .await
        .unwrap();

    // B starts composing; A sees it live
    TypingService::set_typing(&state, conversation_id, "user_bob", "Bob", true)
        .await
        .unwrap();
    let typing = TypingService::get_typing_users(&state, conversation_id, "user_alice").await;
    assert_eq!(typing.len(), 1);
    assert_eq!(typing[0].user_name, "Bob");

    tokio::time::sleep(Duration::from_millis(5)).await;
    MessageService::send_message(&state, conversation_id, "user_bob", "hey! long time")
        .await
        .unwrap();

    // sending ended the typing session and bumped A's unread
    let typing = TypingService::get_typing_users(&state, conversation_id, "user_alice").await;
    assert!(typing.is_empty());
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, conversation_id, "user_alice").await,
        1
    );

    let messages = MessageService::get_messages(&state, conversation_id)
        .await
        .unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hi", "hey! long time"]);
}

#[tokio::test]
async fn group_chat_flow() {
    let state = state();
    seed_user(&state, "user_alice", "Alice").await;
    seed_user(&state, "user_bob", "Bob").await;
    seed_user(&state, "user_carol", "Carol").await;

    let group = ConversationService::create_group(
        &state,
        "trip planning",
        vec!["user_bob".into(), "user_carol".into()],
        "user_alice",
    )
    .await
    .unwrap();

    MessageService::send_message(&state, group, "user_carol", "when do we leave?")
        .await
        .unwrap();

    for user in ["user_alice", "user_bob", "user_carol"] {
        let listed = ConversationService::get_my_conversations(&state, user).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].last_message_preview, "when do we leave?");
    }

    assert_eq!(
        ReadReceiptService::get_unread_count(&state, group, "user_alice").await,
        1
    );
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, group, "user_bob").await,
        1
    );
    assert_eq!(
        ReadReceiptService::get_unread_count(&state, group, "user_carol").await,
        0
    );
}

#[tokio::test]
async fn directory_reflects_profile_sync_and_presence() {
    let state = state();
    seed_user(&state, "user_alice", "Alice").await;
    seed_user(&state, "user_bob", "Bob").await;
    seed_user(&state, "user_carol", "Carol").await;

    // repeated sync updates in place, no duplicate record
    UserService::upsert_user(
        &state,
        "user_bob",
        "Robert",
        "user_bob@example.com",
        Some("https://avatars.example.com/bob.png".into()),
    )
    .await
    .unwrap();
    let bob = UserService::get_user(&state, "user_bob").await.unwrap();
    assert_eq!(bob.name, "Robert");
    assert!(bob.avatar_url.is_some());
    assert!(bob.is_online);

    // provider delete: record retained, presence cleared
    UserService::mark_offline(&state, "user_carol").await.unwrap();
    let carol = UserService::get_user(&state, "user_carol").await.unwrap();
    assert!(!carol.is_online);

    // online users first, then by name; caller excluded
    let listed = UserService::list_users(&state, "user_alice", None).await;
    let names: Vec<&str> = listed.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Robert", "Carol"]);

    let searched = UserService::list_users(&state, "user_alice", Some("rob")).await;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, "user_bob");

    let by_email = UserService::get_user_by_email(&state, "user_carol@example.com")
        .await
        .unwrap();
    assert_eq!(by_email.id, "user_carol");

    let batch = UserService::get_users(
        &state,
        &[
            "user_bob".to_string(),
            "user_missing".to_string(),
            "user_alice".to_string(),
        ],
    )
    .await;
    let ids: Vec<&str> = batch.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["user_bob", "user_alice"]);

    // unknown user presence signal is a silent no-op
    UserService::set_online_status(&state, "user_missing", true)
        .await
        .unwrap();
    assert!(UserService::get_user(&state, "user_missing").await.is_none());
}

#[tokio::test]
async fn directory_watchers_follow_presence_changes() {
    let state = state();
    seed_user(&state, "user_alice", "Alice").await;
    seed_user(&state, "user_bob", "Bob").await;

    let mut directory = UserService::watch_directory(&state, "user_alice".to_string(), None);
    let initial = tokio::time::timeout(Duration::from_secs(2), directory.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(initial.len(), 1);
    assert!(initial[0].is_online);

    UserService::set_online_status(&state, "user_bob", false)
        .await
        .unwrap();
    let updated = tokio::time::timeout(Duration::from_secs(2), directory.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(!updated[0].is_online);

    let mut single = UserService::watch_user(&state, "user_bob".to_string());
    let bob = tokio::time::timeout(Duration::from_secs(2), single.recv())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(!bob.is_online);
}
