//! Glob matching for pattern invalidation.
//!
//! `*` matches any run of characters (including none and including `:`).
//! Every other character matches itself.

/// Returns true if `key` matches the glob `pattern`.
pub fn glob_matches(pattern: &str, key: &str) -> bool {
    let pattern = pattern.as_bytes();
    let key = key.as_bytes();

    let (mut p, mut k) = (0, 0);
    // Position of the last `*` seen and the key index it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, k));
            p += 1;
        } else if p < pattern.len() && pattern[p] == key[k] {
            p += 1;
            k += 1;
        } else if let Some((star, star_k)) = backtrack {
            // Let the last star swallow one more byte
            p = star + 1;
            k = star_k + 1;
            backtrack = Some((star, star_k + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}
