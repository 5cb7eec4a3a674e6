//! Canonical address form.

/// Lower-cased form used for subscription identity, index keys, and
/// transaction endpoint matching.
pub fn canonical(address: &str) -> String {
    address.to_lowercase()
}

/// Case-insensitive address equality.
pub fn same_address(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
