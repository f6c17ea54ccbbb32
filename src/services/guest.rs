use crate::models::{Favorite, UserIdRef};

/// Owner value written by sessions that had no authenticated user
pub const GUEST_SENTINEL: &str = "guest";

/// Value-based test: the favorite has no genuine owner.
///
/// True when the owner is absent, empty, or the guest sentinel, whatever
/// shape it was stored in. Used to exclude records from migration.
pub fn is_guest(favorite: &Favorite) -> bool {
    match favorite.owner() {
        None => true,
        Some(owner) => owner.is_empty() || owner == GUEST_SENTINEL,
    }
}

/// Shape-based test: the owner was stored as a bare string.
///
/// Any such record predates authentication, whatever its value. Used by
/// cleanup; this deliberately disagrees with [`is_guest`] on string owners
/// that are neither empty nor the sentinel.
pub fn is_legacy_shaped(favorite: &Favorite) -> bool {
    matches!(favorite.user_id, Some(UserIdRef::Legacy(_)))
}
