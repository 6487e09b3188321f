//! Entity cache lifecycle tests
//!
//! Run with: cargo test -p integration-tests --test cache_tests

use std::sync::Arc;
use std::thread;

use anyhow::Result;
use integration_tests::{fixtures::*, TestCache};
use jda_cache::{EntityCache, GuildSnapshot};
use jda_common::{CacheConfig, CacheFlags, MemberCachePolicy};
use jda_core::{DomainError, GuildView, Permissions, Snowflake};
use jda_service::PermissionService;

#[test]
fn test_guild_from_json_payload() -> Result<()> {
    let snapshot: GuildSnapshot = serde_json::from_str(
        r#"{
            "id": "1000",
            "name": "Payload Guild",
            "owner_id": "2",
            "roles": [
                {"id": "1000", "name": "@everyone", "permissions": "3072", "position": 0},
                {"id": "2001", "name": "helpers", "permissions": "8192", "position": 1}
            ],
            "channels": [
                {
                    "id": "3001", "type": 0, "name": "general", "position": 0,
                    "permission_overwrites": [
                        {"id": "1000", "type": 0, "allow": "0", "deny": "2048"},
                        {"id": "2001", "type": 0, "allow": "2048", "deny": "0"}
                    ]
                },
                {"id": "3002", "type": 2, "name": "Lounge", "position": 0, "bitrate": 96000}
            ],
            "threads": [
                {"id": "3003", "type": 11, "name": "help", "parent_id": "3001",
                 "thread_metadata": {"archived": true}}
            ],
            "members": [
                {"user": {"id": "1", "username": "bot", "bot": true}, "roles": ["2001"]},
                {"user": {"id": "3", "username": "alice"}, "roles": []}
            ],
            "voice_states": [{"user_id": "3", "channel_id": "3002", "self_mute": true}]
        }"#,
    )?;

    let cache = Arc::new(EntityCache::new(self_user(), CacheConfig::default()));
    let guild = cache.guild_create(snapshot)?;

    assert_eq!(guild.guild().member_count, 2);
    assert_eq!(guild.roles().len(), 2);
    assert_eq!(guild.channels().len(), 3);
    assert!(guild.channel(THREAD).unwrap().as_thread().unwrap().archived);
    let alice = cache.member(GUILD_ID, ALICE).unwrap();
    assert!(alice.voice_state.unwrap().is_muted());
    assert_eq!(alice.voice_channel_id(), Some(VOICE));

    let ctx = jda_service::ServiceContext::new(Arc::clone(&cache));
    let service = PermissionService::new(&ctx);
    assert!(service.check_channel_permission(TEXT, SELF_USER, Permissions::SEND_MESSAGES)?);
    assert!(!service.check_channel_permission(TEXT, ALICE, Permissions::SEND_MESSAGES)?);
    assert!(service.check_channel_permission(THREAD, SELF_USER, Permissions::MANAGE_MESSAGES)?);
    Ok(())
}

#[test]
fn test_snapshot_without_public_role_is_rejected() -> Result<()> {
    let mut snapshot = GuildFixture::standard().build();
    snapshot.roles.retain(|role| role.id != GUILD_ID);

    let cache = EntityCache::new(self_user(), CacheConfig::default());
    assert_eq!(
        cache.guild_create(snapshot).unwrap_err(),
        DomainError::MissingPublicRole(GUILD_ID)
    );
    assert!(cache.guild(GUILD_ID).is_none());
    Ok(())
}

#[test]
fn test_owner_member_policy() -> Result<()> {
    let config = CacheConfig {
        member_policy: MemberCachePolicy::Owner,
        ..CacheConfig::default()
    };
    let test = TestCache::start_with_config(config, GuildFixture::standard().build())?;
    let guild = test.guild()?;

    let mut cached = guild.members().ids();
    cached.sort();
    assert_eq!(cached, vec![SELF_USER, OWNER]);
    assert_eq!(guild.guild().member_count, 4);
    Ok(())
}

#[test]
fn test_voice_member_policy() -> Result<()> {
    let config = CacheConfig {
        member_policy: MemberCachePolicy::Voice,
        ..CacheConfig::default()
    };
    let snapshot = GuildFixture::standard().voice_state(ALICE, VOICE).build();
    let test = TestCache::start_with_config(config, snapshot)?;

    assert!(test.cache.member(GUILD_ID, ALICE).is_some());
    assert!(test.cache.member(GUILD_ID, BOB).is_none());
    assert!(test.cache.user(BOB).is_none());
    Ok(())
}

#[test]
fn test_member_override_flag() -> Result<()> {
    let config = CacheConfig {
        flags: CacheFlags::VOICE_STATE,
        ..CacheConfig::default()
    };
    let snapshot = GuildFixture::standard()
        .overrides(
            TEXT,
            vec![
                member_override(ALICE, Permissions::EMBED_LINKS, Permissions::empty()),
                member_override(SELF_USER, Permissions::EMBED_LINKS, Permissions::empty()),
                role_override(MEMBER_ROLE, Permissions::empty(), Permissions::SEND_MESSAGES),
            ],
        )
        .build();
    let test = TestCache::start_with_config(config, snapshot)?;
    let guild = test.guild()?;
    let channel = guild.channel(TEXT).unwrap();
    let container = channel.as_permission_container().unwrap();

    // Role overrides and the client's own override are always kept
    assert_eq!(container.role_overrides().len(), 1);
    let members: Vec<Snowflake> = container
        .member_overrides()
        .iter()
        .map(|ov| ov.holder_id())
        .collect();
    assert_eq!(members, vec![SELF_USER]);

    assert!(test.cache.override_upsert(TEXT, member_override(BOB, Permissions::empty(), Permissions::all()))?.is_none());
    Ok(())
}

#[test]
fn test_override_for_unknown_role_is_rejected() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let err = test
        .cache
        .override_upsert(TEXT, role_override(Snowflake::new(9999), Permissions::all(), Permissions::empty()))
        .unwrap_err();
    assert!(matches!(err, DomainError::ForeignHolder { .. }));

    let err = test
        .cache
        .override_upsert(THREAD, role_override(MEMBER_ROLE, Permissions::all(), Permissions::empty()))
        .unwrap_err();
    assert_eq!(err, DomainError::NotPermissionContainer(THREAD));
    Ok(())
}

#[test]
fn test_channel_delete_removes_threads() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    test.cache.channel_delete(TEXT)?;

    assert!(test.cache.channel(TEXT).is_none());
    assert!(test.cache.channel(THREAD).is_none());
    assert!(test.cache.channel(VOICE).is_some());
    assert!(test.permissions().compute_channel_permissions(THREAD, ALICE).unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn test_guild_delete_prunes_users() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    assert!(test.cache.user(ALICE).is_some());

    let removed = test.cache.guild_delete(GUILD_ID).unwrap();
    assert_eq!(removed.id(), GUILD_ID);
    assert!(test.cache.user(ALICE).is_none());
    assert!(test.cache.user(SELF_USER).is_some());
    assert!(test.cache.channel(TEXT).is_none());
    Ok(())
}

#[test]
fn test_guild_recreate_prunes_departed_users() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let mut snapshot = GuildFixture::standard().build();
    snapshot.members.retain(|member| member.user_id() != ALICE);
    test.cache.guild_create(snapshot)?;

    assert!(test.cache.member(GUILD_ID, ALICE).is_none());
    assert!(test.cache.user(ALICE).is_none());
    assert!(test.cache.user(BOB).is_some());
    assert!(test.permissions().compute_channel_permissions(TEXT, ALICE).unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn test_voice_policy_drops_member_leaving_voice() -> Result<()> {
    let config = CacheConfig {
        member_policy: MemberCachePolicy::Voice,
        ..CacheConfig::default()
    };
    let snapshot = GuildFixture::standard().voice_state(ALICE, VOICE).build();
    let test = TestCache::start_with_config(config, snapshot)?;
    assert!(test.cache.member(GUILD_ID, ALICE).is_some());

    test.cache
        .voice_state_update(GUILD_ID, ALICE, jda_core::VoiceState::default())?;
    assert!(test.cache.member(GUILD_ID, ALICE).is_none());
    assert!(test.cache.user(ALICE).is_none());
    assert!(test.cache.self_member(GUILD_ID).is_some());
    Ok(())
}

#[test]
fn test_ownership_transfer() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    test.cache.guild_update(jda_cache::GuildUpdate {
        id: GUILD_ID,
        name: "Renamed".to_string(),
        owner_id: ALICE,
    })?;

    let guild = test.guild()?;
    assert!(guild.is_owner(ALICE));
    assert_eq!(
        test.permissions().get_member_permissions(GUILD_ID, ALICE)?,
        Permissions::all()
    );
    assert!(!test.permissions().check_permission(GUILD_ID, OWNER, Permissions::KICK_MEMBERS)?);
    Ok(())
}

#[test]
fn test_concurrent_reads_during_updates() -> Result<()> {
    let test = TestCache::start(GuildFixture::standard().build())?;
    let cache = Arc::clone(&test.cache);

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..200u64 {
                let (allow, deny) = if i % 2 == 0 {
                    (Permissions::EMBED_LINKS, Permissions::empty())
                } else {
                    (Permissions::empty(), Permissions::EMBED_LINKS)
                };
                cache
                    .override_upsert(TEXT, role_override(MEMBER_ROLE, allow, deny))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let ctx = jda_service::ServiceContext::new(cache);
                let service = PermissionService::new(&ctx);
                for _ in 0..200 {
                    let perms = service.compute_channel_permissions(TEXT, ALICE).unwrap();
                    // Every snapshot keeps the public role's grants
                    assert!(perms.contains(Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let guild = test.guild()?;
    let channel = guild.channel(TEXT).unwrap();
    let ov = channel
        .as_permission_container()
        .unwrap()
        .permission_override(MEMBER_ROLE)
        .unwrap();
    assert_eq!(ov.denied(), Permissions::EMBED_LINKS);
    Ok(())
}
