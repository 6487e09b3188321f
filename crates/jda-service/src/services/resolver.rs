//! Permission resolution
//!
//! Pure functions over a [`GuildView`] and an optional channel. Channel
//! overrides are layered in three tiers, each applied as
//! `(permissions & !deny) | allow`:
//!
//! 1. the public role's override
//! 2. the union of the overrides of every role the member holds
//! 3. the member's own override
//!
//! Within one tier allow wins over deny. A later tier always wins over an
//! earlier one.

use jda_core::{
    DomainError, GuildView, Member, PermissionContainer, Permissions, Role, ViewResult,
};

/// Allow and deny accumulated across override tiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Layers {
    allow: Permissions,
    deny: Permissions,
}

impl Layers {
    /// Stack one tier on top of the accumulated ones
    fn push(&mut self, allow: Permissions, deny: Permissions) {
        self.deny = self.deny.difference(allow) | deny;
        self.allow = self.allow.difference(deny) | allow;
    }

    fn apply_to(self, base: Permissions) -> Permissions {
        base.difference(self.deny) | self.allow
    }

    /// Disjoint (allow, deny) with the same effect
    fn into_pair(self) -> (Permissions, Permissions) {
        (self.allow, self.deny.difference(self.allow))
    }
}

fn ensure_same_guild<G>(
    guild: &G,
    member: &Member,
    channel: Option<&dyn PermissionContainer>,
) -> ViewResult<()>
where
    G: GuildView + ?Sized,
{
    let guild_id = guild.guild_id();
    if member.guild_id != guild_id {
        return Err(DomainError::CrossGuild {
            left: guild_id,
            right: member.guild_id,
        });
    }
    if let Some(channel) = channel {
        if channel.guild_id() != guild_id {
            return Err(DomainError::CrossGuild {
                left: guild_id,
                right: channel.guild_id(),
            });
        }
    }
    Ok(())
}

/// Public role plus every explicit role, without any short-circuit
fn base_permissions<G>(guild: &G, member: &Member) -> ViewResult<Permissions>
where
    G: GuildView + ?Sized,
{
    let public = guild.public_role()?;
    let roles = guild.member_roles(member);
    Ok(public.permissions | Permissions::combine(roles.iter().map(|role| role.permissions)))
}

fn layers<G>(guild: &G, member: &Member, channel: &dyn PermissionContainer) -> ViewResult<Layers>
where
    G: GuildView + ?Sized,
{
    let public = guild.public_role()?;
    let mut layers = Layers::default();

    if let Some(ov) = channel.permission_override(public.id) {
        layers.push(ov.allowed(), ov.denied());
    }

    let mut role_allow = Permissions::empty();
    let mut role_deny = Permissions::empty();
    for role in guild.member_roles(member) {
        if let Some(ov) = channel.permission_override(role.id) {
            if ov.is_role_override() {
                role_allow |= ov.allowed();
                role_deny |= ov.denied();
            }
        }
    }
    layers.push(role_allow, role_deny);

    if let Some(ov) = channel.permission_override(member.user_id) {
        if ov.is_member_override() {
            layers.push(ov.allowed(), ov.denied());
        }
    }

    Ok(layers)
}

/// Effective permissions of a member, guild-wide or in one channel
///
/// The owner and administrators hold every permission, whatever the
/// channel's overrides say.
pub fn effective_permissions<G>(
    guild: &G,
    member: &Member,
    channel: Option<&dyn PermissionContainer>,
) -> ViewResult<Permissions>
where
    G: GuildView + ?Sized,
{
    ensure_same_guild(guild, member, channel)?;

    if guild.is_owner(member.user_id) {
        return Ok(Permissions::all());
    }

    let base = base_permissions(guild, member)?;
    if base.contains(Permissions::ADMINISTRATOR) {
        return Ok(Permissions::all());
    }

    match channel {
        Some(channel) => Ok(layers(guild, member, channel)?.apply_to(base)),
        None => Ok(base),
    }
}

/// Check that a member holds every permission in `permissions`
///
/// Malformed input (wrong guild, missing public role) counts as not held.
pub fn has_permission<G>(
    guild: &G,
    member: &Member,
    channel: Option<&dyn PermissionContainer>,
    permissions: Permissions,
) -> bool
where
    G: GuildView + ?Sized,
{
    effective_permissions(guild, member, channel).is_ok_and(|held| held.contains(permissions))
}

/// Overrides that apply to a member in a channel, folded into one pair
///
/// The returned sets are disjoint.
pub fn explicit_overrides<G>(
    guild: &G,
    member: &Member,
    channel: &dyn PermissionContainer,
) -> ViewResult<(Permissions, Permissions)>
where
    G: GuildView + ?Sized,
{
    ensure_same_guild(guild, member, Some(channel))?;
    Ok(layers(guild, member, channel)?.into_pair())
}

/// Layered permissions without the owner and administrator short-circuits
///
/// Answers whether a permission is granted by roles and overrides alone.
pub fn explicit_permissions<G>(
    guild: &G,
    member: &Member,
    channel: Option<&dyn PermissionContainer>,
) -> ViewResult<Permissions>
where
    G: GuildView + ?Sized,
{
    ensure_same_guild(guild, member, channel)?;
    let base = base_permissions(guild, member)?;
    match channel {
        Some(channel) => Ok(layers(guild, member, channel)?.apply_to(base)),
        None => Ok(base),
    }
}

/// Permissions a role alone would grant, guild-wide or in one channel
pub fn role_permissions<G>(
    guild: &G,
    role: &Role,
    channel: Option<&dyn PermissionContainer>,
) -> ViewResult<Permissions>
where
    G: GuildView + ?Sized,
{
    let guild_id = guild.guild_id();
    if role.guild_id != guild_id {
        return Err(DomainError::CrossGuild {
            left: guild_id,
            right: role.guild_id,
        });
    }

    let public = guild.public_role()?;
    let base = public.permissions | role.permissions;
    if base.contains(Permissions::ADMINISTRATOR) {
        return Ok(Permissions::all());
    }

    let Some(channel) = channel else {
        return Ok(base);
    };
    if channel.guild_id() != guild_id {
        return Err(DomainError::CrossGuild {
            left: guild_id,
            right: channel.guild_id(),
        });
    }

    let mut layers = Layers::default();
    if let Some(ov) = channel.permission_override(public.id) {
        layers.push(ov.allowed(), ov.denied());
    }
    if !role.is_public() {
        if let Some(ov) = channel.permission_override(role.id) {
            layers.push(ov.allowed(), ov.denied());
        }
    }
    Ok(layers.apply_to(base))
}

/// Effective channel permissions with implicit access gating
///
/// A member who cannot see the channel holds nothing in it. The same goes
/// for a voice-like channel the member cannot connect to.
pub fn accessible_permissions<G>(
    guild: &G,
    member: &Member,
    channel: &dyn PermissionContainer,
) -> ViewResult<Permissions>
where
    G: GuildView + ?Sized,
{
    let permissions = effective_permissions(guild, member, Some(channel))?;
    if !permissions.contains(Permissions::VIEW_CHANNEL) {
        return Ok(Permissions::empty());
    }
    if channel.kind().is_voice_like() && !permissions.contains(Permissions::CONNECT) {
        return Ok(Permissions::empty());
    }
    Ok(permissions)
}
