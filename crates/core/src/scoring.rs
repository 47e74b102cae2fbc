//! Scoring module - points awarded by merges and the win check
//!
//! Classic 2048 rules:
//! - A merge that produces a tile of rank `r` scores `2^r` (the new tile's value).
//! - Slides and spawns score nothing.
//! - Score only ever grows; additions saturate instead of wrapping.

use crate::snapshot::Merge;
use crate::types::rank_value;

/// Points for a merge that produced a tile of `new_rank`
pub fn merge_points(new_rank: u8) -> u64 {
    rank_value(new_rank)
}

/// Total points for a batch of merges
pub fn total_merge_points(merges: &[Merge]) -> u64 {
    merges
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(merge_points(m.rank)))
}

/// Check if the highest rank on the board reaches the target
///
/// A `None` target never wins.
pub fn reaches_target(max_rank: Option<u8>, target_rank: Option<u8>) -> bool {
    match (max_rank, target_rank) {
        (Some(max), Some(target)) => max >= target,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, TileId};

    fn merge(rank: u8) -> Merge {
        Merge {
            survivor: TileId::new(1),
            absorbed: TileId::new(2),
            position: Position::new(0, 0),
            rank,
        }
    }

    #[test]
    fn test_merge_points() {
        assert_eq!(merge_points(1), 2);
        assert_eq!(merge_points(2), 4);
        assert_eq!(merge_points(11), 2048);
    }

    #[test]
    fn test_total_merge_points() {
        assert_eq!(total_merge_points(&[]), 0);
        assert_eq!(total_merge_points(&[merge(2), merge(2), merge(3)]), 16);
        assert_eq!(total_merge_points(&[merge(64), merge(1)]), u64::MAX);
    }

    #[test]
    fn test_reaches_target() {
        assert!(reaches_target(Some(11), Some(11)));
        assert!(reaches_target(Some(12), Some(11)));
        assert!(!reaches_target(Some(10), Some(11)));
        assert!(!reaches_target(Some(20), None));
        assert!(!reaches_target(None, Some(1)));
    }
}
