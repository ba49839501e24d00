//! Utility functions and helpers

use alloy::primitives::U256;

/// Format a minor-unit amount as a decimal string, `formatUnits` style
pub fn format_units(amount: U256, decimals: u8) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / scale;
    let frac = amount % scale;

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

/// Convert a whole-unit amount into minor units for a token with the given decimals
pub fn units_to_minor(units: u64, decimals: u8) -> U256 {
    U256::from(units) * U256::from(10u64).pow(U256::from(decimals))
}

/// Hex-encode an amount the way the balance-override RPC methods expect it
pub fn to_hex_amount(amount: U256) -> String {
    format!("{amount:#x}")
}

/// Validate Ethereum address format
pub fn is_valid_address(address: &str) -> bool {
    if !address.starts_with("0x") {
        return false;
    }

    if address.len() != 42 {
        return false;
    }

    address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Sanitize string for logging (remove sensitive data)
pub fn sanitize_for_logging(s: &str) -> String {
    if s.len() <= 10 {
        return s.to_string();
    }

    // Show first 6 and last 4 characters for hashes/addresses
    if s.starts_with("0x") && s.len() > 20 {
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    } else {
        // For other strings, show first 10 characters
        format!("{}...", &s[..10])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(20_000_000u64), 6), "20");
        assert_eq!(format_units(U256::from(20_500_000u64), 6), "20.5");
        assert_eq!(format_units(U256::from(123u64), 6), "0.000123");
        assert_eq!(format_units(U256::ZERO, 6), "0");
    }

    #[test]
    fn test_units_to_minor() {
        assert_eq!(units_to_minor(20, 6), U256::from(20_000_000u64));
        assert_eq!(units_to_minor(100_000, 6), U256::from(100_000_000_000u64));
    }

    #[test]
    fn test_to_hex_amount() {
        // 1 ETH in wei, as the balance-override methods expect it
        assert_eq!(
            to_hex_amount(U256::from(1_000_000_000_000_000_000u64)),
            "0xde0b6b3a7640000"
        );
    }

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address("0x1234567890123456789012345678901234567890"));
        assert!(!is_valid_address("1234567890123456789012345678901234567890"));
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address("0xGGGG567890123456789012345678901234567890"));
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(
            sanitize_for_logging("0x1234567890123456789012345678901234567890"),
            "0x1234...7890"
        );
        assert_eq!(sanitize_for_logging("short"), "short");
        assert_eq!(sanitize_for_logging("verylongstring"), "verylongst...");
    }
}
