//! Round-to-round stance change detection
//!
//! Stance ids are re-derived on every classification, so they carry no
//! identity across rounds. A provider's stance is instead identified by
//! its group's membership: the provider changed stance iff the member set
//! of the group it sits in differs between the two rounds.

use crate::core::provider::Provider;
use crate::stance::group::{StanceGroup, group_of};

/// Fixed literal returned when no provider changed group membership.
pub const ALL_STOOD_BY: &str = "All advocates stood by their stances.";

/// Providers whose group membership differs between the two group sets,
/// in canonical provider order.
///
/// A provider absent from either side (degenerate input) is treated as
/// unchanged — there is nothing to compare.
pub fn changed_providers(previous: &[StanceGroup], current: &[StanceGroup]) -> Vec<Provider> {
    Provider::ALL
        .iter()
        .copied()
        .filter(|&provider| {
            match (group_of(previous, provider), group_of(current, provider)) {
                (Some(before), Some(after)) => before.members != after.members,
                _ => false,
            }
        })
        .collect()
}
