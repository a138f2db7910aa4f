mod common;

use common::*;
use serenity::model::id::{ChannelId, UserId};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use userinfo_bot::profile::render::roles_page;
use userinfo_bot::profile::snapshot::{Device, Status};
use userinfo_bot::profile::{
    MemberJoin, MemberSnapshot, NameRecord, PageRenderer, PresenceSnapshot,
};

fn renderer(dir: Arc<FakeDirectory>, history: Arc<FakeHistory>, show_presence: bool) -> PageRenderer {
    PageRenderer::new(dir, history, GUILD, show_presence, at(1_700_000_000))
}

fn joins() -> Vec<MemberJoin> {
    vec![
        MemberJoin { user_id: UserId::new(1), joined_at: Some(at(1_400_000_000)) },
        MemberJoin { user_id: TARGET, joined_at: Some(at(1_600_000_000)) },
        MemberJoin { user_id: UserId::new(2), joined_at: Some(at(1_500_000_000)) },
    ]
}

#[tokio::test]
async fn home_carries_identity_and_rank() {
    let mut target = member(TARGET, "alice");
    target.nickname = Some("Ali".into());
    let dir = FakeDirectory::with_member(target.clone());
    dir.set_joins(joins());

    let page = renderer(dir, FakeHistory::new(), false).home(&target).await;
    assert_eq!(page.title, "alice ~ Ali");
    assert_eq!(page.footer.as_deref(), Some("Member #3 | User ID: 200"));
    assert_eq!(page.description.as_deref(), Some("**Shared Server: 1**"));
    assert_eq!(
        page.field_named("Joined Discord on:").unwrap().value,
        "<t:1500000000>\n( <t:1500000000:R> )\n"
    );
    let joined = page.field_named("Joined this Server on:").unwrap();
    assert!(joined.inline);
    assert_eq!(joined.value, "<t:1600000000>\n( <t:1600000000:R> )\n");
}

#[tokio::test]
async fn unknown_join_time_is_spelled_out() {
    let mut target = member(TARGET, "alice");
    target.joined_at = None;
    let dir = FakeDirectory::with_member(target.clone());
    dir.set_joins(vec![
        MemberJoin { user_id: TARGET, joined_at: None },
        MemberJoin { user_id: UserId::new(1), joined_at: Some(at(1_400_000_000)) },
    ]);

    let page = renderer(dir, FakeHistory::new(), false).home(&target).await;
    assert_eq!(
        page.field_named("Joined this Server on:").unwrap().value,
        "Unknown\n( ? )\n"
    );
    // Ranked as if they joined at the reference time, which is after member 1.
    assert_eq!(page.footer.as_deref(), Some("Member #2 | User ID: 200"));
}

#[tokio::test]
async fn partial_listing_still_ranks_the_target() {
    let target = member(TARGET, "alice");
    let dir = FakeDirectory::with_member(target.clone());
    dir.set_joins(vec![
        MemberJoin { user_id: UserId::new(1), joined_at: Some(at(1_400_000_000)) },
        MemberJoin { user_id: UserId::new(2), joined_at: Some(at(1_650_000_000)) },
    ]);

    let page = renderer(dir, FakeHistory::new(), false).home(&target).await;
    assert_eq!(page.footer.as_deref(), Some("Member #2 | User ID: 200"));
}

#[tokio::test]
async fn listing_failure_drops_the_rank_only() {
    let target = member(TARGET, "alice");
    let dir = FakeDirectory::with_member(target.clone());
    dir.fail_listing.store(true, Ordering::SeqCst);

    let page = renderer(dir, FakeHistory::new(), false).home(&target).await;
    assert_eq!(page.footer.as_deref(), Some("User ID: 200"));
    assert!(page.field_named("Joined Discord on:").is_some());
}

#[tokio::test]
async fn previous_names_are_listed_and_sanitized() {
    let target = member(TARGET, "alice");
    let history = FakeHistory::new();
    history.set(NameRecord {
        usernames: Some(vec!["old_alice".into(), "join discord.gg/spam now".into()]),
        nicknames: Some(vec!["Al".into()]),
    });

    let page = renderer(FakeDirectory::with_member(target.clone()), history, false)
        .home(&target)
        .await;
    assert_eq!(
        page.field_named("Previous Names:").unwrap().value,
        "old_alice, join [SANITIZED INVITE] now"
    );
    assert_eq!(page.field_named("Previous Nicknames:").unwrap().value, "Al");
}

#[tokio::test]
async fn history_failure_omits_name_fields() {
    let target = member(TARGET, "alice");
    let history = FakeHistory::new();
    history.fail.store(true, Ordering::SeqCst);

    let page = renderer(FakeDirectory::with_member(target.clone()), history, false)
        .home(&target)
        .await;
    assert!(page.field_named("Previous Names:").is_none());
    assert!(page.field_named("Previous Nicknames:").is_none());
    assert!(page.footer.is_some());
}

#[tokio::test]
async fn presence_shows_only_when_enabled() {
    let mut target = member(TARGET, "alice");
    target.mutual_guilds = 3;
    target.presence = Some(PresenceSnapshot {
        activity: Some("Playing chess".into()),
        devices: vec![(Device::Desktop, Status::Online)],
    });
    let dir = FakeDirectory::with_member(target.clone());

    let hidden = renderer(dir.clone(), FakeHistory::new(), false).home(&target).await;
    assert_eq!(hidden.description.as_deref(), Some("**Shared Servers: 3**"));

    let shown = renderer(dir, FakeHistory::new(), true).home(&target).await;
    let description = shown.description.unwrap();
    assert!(description.starts_with("Playing chess\n**Devices:** "));
    assert!(description.ends_with("\n\n**Shared Servers: 3**"));
}

#[tokio::test]
async fn voice_and_badges_render_as_fields() {
    let mut target = member(TARGET, "alice");
    target.voice_channel = Some(ChannelId::new(55));
    target.badges = vec!["HypeSquad Bravery".into()];
    target.special_badges = vec!["Server Owner".into(), "Server Booster".into()];

    let page = renderer(FakeDirectory::with_member(target.clone()), FakeHistory::new(), false)
        .home(&target)
        .await;
    assert_eq!(
        page.field_named("Current Voice Channel:").unwrap().value,
        "<#55> ID: 55"
    );
    assert_eq!(page.field_named("Badge:").unwrap().value, "HypeSquad Bravery");
    assert_eq!(
        page.field_named("Special Badges:").unwrap().value,
        "Server Owner\nServer Booster"
    );
}

#[test]
fn long_role_lists_are_truncated() {
    let mut target: MemberSnapshot = member(TARGET, "alice");
    target.roles = (0..50).map(|i| format!("{i:0>90}")).collect();

    let description = roles_page(&target).description.unwrap();
    assert!(description.chars().count() <= 4000);
    assert!(description.ends_with("and 7 more roles not displayed due to embed limits."));
    assert_eq!(description.lines().count(), 44);
}

#[test]
fn role_list_within_budget_is_comma_joined() {
    let mut target = member(TARGET, "alice");
    target.roles = vec!["<@&1>".into(), "<@&2>".into()];
    assert_eq!(roles_page(&target).description.as_deref(), Some("<@&1>, <@&2>"));
}
