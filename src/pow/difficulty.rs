/// Length of a hex-rendered SHA-256 digest; no target above this can be met.
pub const MAX_DIFFICULTY: u32 = 64;

/// Returns true iff the first `difficulty` characters of `hex_digest` are all `'0'`.
///
/// A zero difficulty accepts every digest; a digest shorter than the
/// difficulty never qualifies.
pub fn satisfies(hex_digest: &str, difficulty: u32) -> bool {
    let k = difficulty as usize;
    hex_digest.len() >= k && hex_digest.bytes().take(k).all(|b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::{MAX_DIFFICULTY, satisfies};

    #[test]
    fn zero_difficulty_always_passes() {
        assert!(satisfies("ffff", 0));
        assert!(satisfies("", 0));
    }

    #[test]
    fn counts_leading_zeros_only() {
        assert!(satisfies("0000ab", 4));
        assert!(!satisfies("000ab0", 4));
        assert!(satisfies("000ab0", 3));
        assert!(!satisfies("a0000", 1));
    }

    #[test]
    fn full_length_is_the_ceiling() {
        let zeros = "0".repeat(64);
        assert!(satisfies(&zeros, MAX_DIFFICULTY));
        assert!(!satisfies(&zeros, MAX_DIFFICULTY + 1));
    }

    #[test]
    fn short_digest_never_qualifies() {
        assert!(!satisfies("000", 4));
    }
}
