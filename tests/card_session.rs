mod common;

use common::*;
use serenity::model::id::MessageId;
use std::sync::Arc;
use std::time::Duration;
use userinfo_bot::profile::{CardManager, InteractionOutcome, InteractiveComponent, PageId};

const MESSAGE: MessageId = MessageId::new(900);

async fn registered(manager: &CardManager) -> Arc<RecordingSurface> {
    let dir = FakeDirectory::with_member(member(TARGET, "alice"));
    let mut card = InteractiveComponent::open(deps(dir, FakeHistory::new(), false), request())
        .await
        .unwrap();
    let surface = RecordingSurface::new();
    card.attach_message(surface.clone());
    manager.register(MESSAGE, card).await;
    surface
}

async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn idle_card_times_out_and_is_removed() {
    let manager = CardManager::new(Duration::from_secs(60));
    let surface = registered(&manager).await;
    assert!(manager.is_live(MESSAGE).await);

    tokio::time::sleep(Duration::from_secs(61)).await;
    settle().await;

    assert!(!manager.is_live(MESSAGE).await);
    assert_eq!(manager.live_count().await, 0);
    assert!(surface.last().unwrap().selector.disabled);
    assert!(
        manager
            .dispatch(MESSAGE, REQUESTER, PageId::Avatar)
            .await
            .is_none()
    );
}

#[tokio::test(start_paused = true)]
async fn each_selection_restarts_the_idle_timer() {
    let manager = CardManager::new(Duration::from_secs(60));
    registered(&manager).await;

    tokio::time::sleep(Duration::from_secs(40)).await;
    let outcome = manager.dispatch(MESSAGE, REQUESTER, PageId::Avatar).await;
    assert!(matches!(outcome, Some(InteractionOutcome::Rendered(_))));

    tokio::time::sleep(Duration::from_secs(40)).await;
    assert!(manager.is_live(MESSAGE).await);

    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert!(!manager.is_live(MESSAGE).await);
}

#[tokio::test(start_paused = true)]
async fn stranger_closes_the_card() {
    let manager = CardManager::new(Duration::from_secs(60));
    let surface = registered(&manager).await;

    let outcome = manager.dispatch(MESSAGE, STRANGER, PageId::Roles).await;
    assert!(matches!(outcome, Some(InteractionOutcome::Denied(_))));
    assert!(surface.last().unwrap().selector.disabled);

    let outcome = manager.dispatch(MESSAGE, REQUESTER, PageId::Avatar).await;
    assert!(matches!(outcome, None | Some(InteractionOutcome::Expired)));

    settle().await;
    assert!(!manager.is_live(MESSAGE).await);
}

#[tokio::test]
async fn unknown_message_has_no_card() {
    let manager = CardManager::new(Duration::from_secs(60));
    assert!(
        manager
            .dispatch(MessageId::new(1), REQUESTER, PageId::Home)
            .await
            .is_none()
    );
}

#[tokio::test(start_paused = true)]
async fn replaced_card_does_not_evict_its_successor() {
    let manager = CardManager::new(Duration::from_secs(60));
    let first = registered(&manager).await;
    let second = registered(&manager).await;
    settle().await;

    // The first card lost its channel and shut down; the second owns the message now.
    assert!(first.last().unwrap().selector.disabled);
    assert!(manager.is_live(MESSAGE).await);
    assert_eq!(manager.live_count().await, 1);

    let outcome = manager.dispatch(MESSAGE, REQUESTER, PageId::Avatar).await;
    assert!(matches!(outcome, Some(InteractionOutcome::Rendered(_))));
    assert!(!second.last().unwrap().selector.disabled);
}
