/// Shorten a base58 address to its first and last eight characters for narrow panels.
pub fn truncate_address(address: &str) -> String {
    if address.len() > 20 {
        format!("{}...{}", &address[..8], &address[address.len() - 8..])
    } else {
        address.to_string()
    }
}
