//! Permission resolution tests
//!
//! Guild snapshots go through the entity cache; permissions are read back
//! through the permission service.
//!
//! Run with: cargo test -p integration-tests --test permission_tests

use anyhow::Result;
use integration_tests::{assert_missing, fixtures::*, TestCache};
use jda_core::{Permissions, Snowflake};
use jda_service::services::resolver;

const SEND: Permissions = Permissions::SEND_MESSAGES;

fn with_text_overrides(overrides: Vec<jda_cache::OverrideData>) -> Result<TestCache> {
    TestCache::start(GuildFixture::standard().overrides(TEXT, overrides).build())
}

// ============================================================================
// Override tiers
// ============================================================================

#[test]
fn test_administrator_ignores_channel_denies() -> Result<()> {
    let snapshot = GuildFixture::standard()
        .member(ALICE, &[ADMIN_ROLE])
        .overrides(
            TEXT,
            vec![
                role_override(GUILD_ID, Permissions::empty(), Permissions::all()),
                role_override(ADMIN_ROLE, Permissions::empty(), Permissions::all()),
                member_override(ALICE, Permissions::empty(), Permissions::all()),
            ],
        )
        .build();
    let test = TestCache::start(snapshot)?;

    let perms = test.permissions().compute_channel_permissions(TEXT, ALICE)?;
    assert_eq!(perms, Permissions::all());

    let guild = test.guild()?;
    let channel = guild.channel(TEXT).unwrap();
    let member = test.member(ALICE)?;
    assert_eq!(
        resolver::effective_permissions(guild.as_ref(), &member, channel.as_permission_container())?,
        Permissions::all()
    );
    Ok(())
}

#[test]
fn test_public_override_applies_to_member_without_roles() -> Result<()> {
    let test = with_text_overrides(vec![role_override(GUILD_ID, Permissions::empty(), SEND)])?;
    let service = test.permissions();

    assert!(!service.check_channel_permission(TEXT, BOB, SEND)?);
    assert!(service.check_channel_permission(TEXT, BOB, Permissions::VIEW_CHANNEL)?);
    assert!(service.check_permission(GUILD_ID, BOB, SEND)?);
    Ok(())
}

#[test]
fn test_role_allow_beats_public_deny() -> Result<()> {
    let test = with_text_overrides(vec![
        role_override(GUILD_ID, Permissions::empty(), SEND),
        role_override(MEMBER_ROLE, SEND, Permissions::empty()),
    ])?;
    let service = test.permissions();

    assert!(service.check_channel_permission(TEXT, ALICE, SEND)?);
    assert!(!service.check_channel_permission(TEXT, BOB, SEND)?);
    Ok(())
}

#[test]
fn test_role_deny_beats_public_allow() -> Result<()> {
    let test = with_text_overrides(vec![
        role_override(GUILD_ID, Permissions::EMBED_LINKS, Permissions::empty()),
        role_override(MEMBER_ROLE, Permissions::empty(), Permissions::EMBED_LINKS),
    ])?;
    let service = test.permissions();

    assert!(!service.check_channel_permission(TEXT, ALICE, Permissions::EMBED_LINKS)?);
    assert!(service.check_channel_permission(TEXT, BOB, Permissions::EMBED_LINKS)?);
    // Threads inherit the same outcome
    assert!(!service.check_channel_permission(THREAD, ALICE, Permissions::EMBED_LINKS)?);
    Ok(())
}

#[test]
fn test_role_deny_excludes_permission() -> Result<()> {
    let test = with_text_overrides(vec![role_override(MEMBER_ROLE, Permissions::empty(), SEND)])?;
    let service = test.permissions();

    assert!(!service.check_channel_permission(TEXT, ALICE, SEND)?);
    assert!(service.check_channel_permission(TEXT, BOB, SEND)?);
    Ok(())
}

#[test]
fn test_member_allow_beats_every_role_deny() -> Result<()> {
    let test = with_text_overrides(vec![
        role_override(GUILD_ID, Permissions::empty(), SEND),
        role_override(MEMBER_ROLE, Permissions::empty(), SEND),
        member_override(ALICE, SEND, Permissions::empty()),
    ])?;
    assert!(test.permissions().check_channel_permission(TEXT, ALICE, SEND)?);
    Ok(())
}

#[test]
fn test_role_without_override_contributes_nothing() -> Result<()> {
    let test = with_text_overrides(vec![role_override(MOD_ROLE, Permissions::EMBED_LINKS, SEND)])?;
    let guild = test.guild()?;
    let channel = guild.channel(TEXT).unwrap();
    let container = channel.as_permission_container().unwrap();

    let (allow, deny) = resolver::explicit_overrides(guild.as_ref(), &*test.member(ALICE)?, container)?;
    assert!(allow.is_empty());
    assert!(deny.is_empty());
    Ok(())
}

// ============================================================================
// Channel kinds
// ============================================================================

#[test]
fn test_thread_resolves_through_parent() -> Result<()> {
    let test = with_text_overrides(vec![
        role_override(GUILD_ID, Permissions::empty(), SEND),
        role_override(MEMBER_ROLE, SEND, Permissions::empty()),
    ])?;
    let service = test.permissions();

    for user in [ALICE, BOB] {
        assert_eq!(
            service.compute_channel_permissions(THREAD, user)?,
            service.compute_channel_permissions(TEXT, user)?
        );
    }
    assert!(!service.check_channel_permission(THREAD, BOB, SEND)?);
    Ok(())
}

#[test]
fn test_hidden_channel_grants_nothing() -> Result<()> {
    let test = with_text_overrides(vec![role_override(
        GUILD_ID,
        Permissions::empty(),
        Permissions::VIEW_CHANNEL,
    )])?;
    let service = test.permissions();

    assert!(service.compute_channel_permissions(TEXT, BOB)?.is_empty());
    assert_missing(service.require_channel_permission(TEXT, BOB, SEND), SEND)?;
    // The owner always sees everything
    assert_eq!(service.compute_channel_permissions(TEXT, OWNER)?, Permissions::all());
    Ok(())
}

#[test]
fn test_voice_channel_requires_connect() -> Result<()> {
    let snapshot = GuildFixture::standard()
        .overrides(
            VOICE,
            vec![role_override(GUILD_ID, Permissions::empty(), Permissions::CONNECT)],
        )
        .build();
    let test = TestCache::start(snapshot)?;
    let service = test.permissions();

    assert!(service.compute_channel_permissions(VOICE, BOB)?.is_empty());
    assert!(service.check_channel_permission(TEXT, BOB, SEND)?);
    Ok(())
}

// ============================================================================
// Service surface
// ============================================================================

#[test]
fn test_owner_holds_everything() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let service = test.permissions();

    assert!(service.is_guild_owner(GUILD_ID, OWNER)?);
    assert!(!service.is_guild_owner(GUILD_ID, ALICE)?);
    assert_eq!(service.get_member_permissions(GUILD_ID, OWNER)?, Permissions::all());
    Ok(())
}

#[test]
fn test_guild_permissions_union_roles() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let perms = test.permissions().get_member_permissions(GUILD_ID, ALICE)?;
    assert_eq!(
        perms,
        Permissions::VIEW_CHANNEL
            | Permissions::SEND_MESSAGES
            | Permissions::CONNECT
            | Permissions::ATTACH_FILES
    );
    Ok(())
}

#[test]
fn test_require_permission_reports_first_missing() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let service = test.permissions();

    assert_missing(
        service.require_permission(GUILD_ID, BOB, Permissions::BAN_MEMBERS | Permissions::KICK_MEMBERS),
        Permissions::KICK_MEMBERS,
    )?;
    service.require_permission(GUILD_ID, SELF_USER, Permissions::KICK_MEMBERS)?;
    service.require_channel_permission(TEXT, BOB, SEND)?;
    Ok(())
}

#[test]
fn test_unknown_entities_are_not_found() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let service = test.permissions();

    let err = service.get_member_permissions(GUILD_ID, Snowflake::new(404)).unwrap_err();
    assert!(err.is_not_found());
    let err = service.compute_channel_permissions(Snowflake::new(404), ALICE).unwrap_err();
    assert!(err.is_not_found());
    let err = service.check_permission(Snowflake::new(404), ALICE, SEND).unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
    Ok(())
}

// ============================================================================
// Live updates
// ============================================================================

#[test]
fn test_override_events_change_permissions() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let service = test.permissions();
    assert!(service.check_channel_permission(TEXT, BOB, SEND)?);

    test.cache
        .override_upsert(TEXT, member_override(BOB, Permissions::empty(), SEND))?;
    assert!(!service.check_channel_permission(TEXT, BOB, SEND)?);
    // Threads follow the parent without any event of their own
    assert!(!service.check_channel_permission(THREAD, BOB, SEND)?);

    test.cache.override_delete(TEXT, BOB)?;
    assert!(service.check_channel_permission(TEXT, BOB, SEND)?);
    Ok(())
}

#[test]
fn test_role_delete_removes_its_grants() -> Result<()> {
    let test = with_text_overrides(vec![role_override(
        MEMBER_ROLE,
        Permissions::EMBED_LINKS,
        Permissions::empty(),
    )])?;
    let service = test.permissions();
    assert!(service.check_channel_permission(TEXT, ALICE, Permissions::EMBED_LINKS)?);
    assert!(service.check_permission(GUILD_ID, ALICE, Permissions::ATTACH_FILES)?);

    test.cache.role_delete(GUILD_ID, MEMBER_ROLE)?;

    assert!(!service.check_channel_permission(TEXT, ALICE, Permissions::EMBED_LINKS)?);
    assert!(!service.check_permission(GUILD_ID, ALICE, Permissions::ATTACH_FILES)?);
    assert!(test.member(ALICE)?.role_ids.is_empty());
    let guild = test.guild()?;
    let channel = guild.channel(TEXT).unwrap();
    assert!(channel
        .as_permission_container()
        .unwrap()
        .permission_override(MEMBER_ROLE)
        .is_none());
    Ok(())
}

#[test]
fn test_role_update_changes_base() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let service = test.permissions();
    assert!(!service.check_permission(GUILD_ID, ALICE, Permissions::MANAGE_MESSAGES)?);

    test.cache
        .role_update(GUILD_ID, role_data(MEMBER_ROLE, 1, Permissions::MANAGE_MESSAGES))?;
    assert!(service.check_permission(GUILD_ID, ALICE, Permissions::MANAGE_MESSAGES)?);
    assert!(!service.check_permission(GUILD_ID, ALICE, Permissions::ATTACH_FILES)?);
    Ok(())
}
