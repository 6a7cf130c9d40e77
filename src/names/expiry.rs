//! Name expiration arithmetic
//!
//! Records expire a height-dependent number of blocks after their last
//! update. Expiry is a derived predicate over heights, never a deletion
//! event; storage layers scan for it in bulk and rely on the invariant
//! documented on [`expiration_depth`].

// =============================================================================
// Constants
// =============================================================================

/// Amount to lock in name transactions. Not enforced by the protocol
/// (yet), but required for acceptance to the mempool.
pub const NAME_LOCKED_AMOUNT: i64 = 100_000_000 / 100;

/// Confirmations a name registration needs before its first update
pub const MIN_FIRST_UPDATE_DEPTH: i64 = 12;

/// Maximum length of a name key in bytes
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of a name value in bytes
pub const MAX_NAME_VALUE_LENGTH: usize = 1023;

/// Tighter value limit enforced by user-facing tooling
pub const MAX_NAME_VALUE_LENGTH_UI: usize = 520;

/// Sentinel height for records not yet confirmed into a block
pub const MEMPOOL_HEIGHT: i64 = 0x7FFF_FFFF;

// =============================================================================
// Expiration
// =============================================================================

/// Number of blocks a name stays alive past its last update, at the given
/// chain height.
///
/// `height - expiration_depth(height)` (the update height up to which
/// names expire at `height`) must be non-decreasing in `height`; bulk
/// expiry scans forward from the previous block's cutoff and would miss
/// records if the cutoff ever moved backwards. The ramp between the two
/// plateaus keeps the cutoff monotone while bounding the depth at both
/// ends.
pub fn expiration_depth(height: i64) -> i64 {
    if height < 24_000 {
        return 12_000;
    }
    if height < 48_000 {
        return height - 12_000;
    }
    36_000
}

/// Whether a name last updated at `prev_height` has expired at `height`.
///
/// `prev_height == MEMPOOL_HEIGHT` marks an unconfirmed record, which
/// never expires. Panics if `height` itself is the mempool sentinel;
/// expiry is only defined against a confirmed chain height.
pub fn is_name_expired(prev_height: i64, height: i64) -> bool {
    if prev_height == MEMPOOL_HEIGHT {
        return false;
    }

    assert_ne!(
        height, MEMPOOL_HEIGHT,
        "expiry requires a confirmed chain height"
    );

    prev_height + expiration_depth(height) <= height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_depth_plateaus_and_ramp() {
        assert_eq!(expiration_depth(0), 12_000);
        assert_eq!(expiration_depth(23_999), 12_000);
        assert_eq!(expiration_depth(24_000), 12_000);
        assert_eq!(expiration_depth(30_000), 18_000);
        assert_eq!(expiration_depth(47_999), 35_999);
        assert_eq!(expiration_depth(48_000), 36_000);
        assert_eq!(expiration_depth(1_000_000), 36_000);
    }

    #[test]
    fn test_expiry_cutoff_is_monotone() {
        // The cutoff height - expiration_depth(height) never moves
        // backwards, including across both plateau boundaries.
        let mut prev_cutoff = i64::MIN;
        for height in 0..=60_000 {
            let cutoff = height - expiration_depth(height);
            assert!(
                cutoff >= prev_cutoff,
                "cutoff regressed at height {}: {} < {}",
                height,
                cutoff,
                prev_cutoff
            );
            prev_cutoff = cutoff;
        }
    }

    #[test]
    fn test_is_name_expired() {
        // First plateau: depth 12000
        assert!(!is_name_expired(100, 12_099));
        assert!(is_name_expired(100, 12_100));
        assert!(is_name_expired(100, 20_000));

        // Ramp: everything updated at or before 12000 expires
        assert!(is_name_expired(12_000, 24_000));
        assert!(!is_name_expired(12_001, 24_000));

        // Second plateau: depth 36000
        assert!(!is_name_expired(20_000, 55_999));
        assert!(is_name_expired(20_000, 56_000));
    }

    #[test]
    fn test_mempool_records_never_expire() {
        assert!(!is_name_expired(MEMPOOL_HEIGHT, 0));
        assert!(!is_name_expired(MEMPOOL_HEIGHT, 48_000));
        assert!(!is_name_expired(MEMPOOL_HEIGHT, i64::from(u32::MAX)));
    }

    #[test]
    #[should_panic(expected = "confirmed chain height")]
    fn test_mempool_height_as_current_height_panics() {
        is_name_expired(100, MEMPOOL_HEIGHT);
    }
}
