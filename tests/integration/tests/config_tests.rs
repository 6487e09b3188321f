//! Configuration tests
//!
//! Environment variables flow through `ClientConfig` into the cache and the
//! tracing setup.
//!
//! Run with: cargo test -p integration-tests --test config_tests

use std::collections::HashMap;

use anyhow::Result;
use integration_tests::{fixtures::*, TestCache};
use jda_common::{ClientConfig, Environment, TracingConfig};
use jda_core::Permissions;

fn load(vars: &[(&str, &str)]) -> Result<ClientConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Ok(ClientConfig::from_lookup(|key| vars.get(key).cloned())?)
}

#[test]
fn test_minimal_cache_from_environment() -> Result<()> {
    let config = load(&[
        ("JDA_CACHE_FLAGS", "none"),
        ("JDA_MEMBER_CACHE_POLICY", "none"),
        ("JDA_CACHE_SHARDS", "4"),
    ])?;
    let snapshot = GuildFixture::standard()
        .voice_state(ALICE, VOICE)
        .overrides(
            TEXT,
            vec![member_override(BOB, Permissions::empty(), Permissions::SEND_MESSAGES)],
        )
        .build();
    let test = TestCache::start_with_config(config.cache, snapshot)?;
    let guild = test.guild()?;

    assert_eq!(guild.members().ids(), vec![SELF_USER]);
    assert!(guild
        .channel(TEXT)
        .unwrap()
        .as_permission_container()
        .unwrap()
        .member_overrides()
        .is_empty());
    assert!(test
        .cache
        .voice_state_update(GUILD_ID, SELF_USER, jda_core::VoiceState::default())?
        .is_none());
    Ok(())
}

#[test]
fn test_default_cache_keeps_everything() -> Result<()> {
    let config = load(&[])?;
    let snapshot = GuildFixture::standard().voice_state(ALICE, VOICE).build();
    let test = TestCache::start_with_config(config.cache, snapshot)?;

    assert_eq!(test.guild()?.members().len(), 4);
    assert_eq!(test.member(ALICE)?.voice_channel_id(), Some(VOICE));
    Ok(())
}

#[test]
fn test_tracing_follows_environment() -> Result<()> {
    let config = load(&[("JDA_ENV", "production"), ("JDA_LOG_LEVEL", "warn")])?;
    assert_eq!(config.app.env, Environment::Production);

    let tracing = TracingConfig::from_logging(config.app.env, &config.logging);
    assert!(tracing.json);
    assert_eq!(tracing.level, config.logging.level);
    assert_eq!(config.logging.level.as_str(), "WARN");
    Ok(())
}
