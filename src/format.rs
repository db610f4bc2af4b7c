//! Amount and fee formatting for reported transfers

/// Sun per TRX
const SUN_PER_TRX: f64 = 1_000_000.0;

/// Decimal precision of a TRC-20 token, looked up by symbol
///
/// Unknown symbols fall back to a precision of 1.
pub fn token_precision(symbol: &str) -> u32 {
    match symbol {
        "VNDO" => 2,
        "BCH" => 3,
        "USDT" | "XRP" | "ZEC" | "CBP" | "LUMI" | "SVIP" | "WIN" | "NFT" => 6,
        "BTC" | "LTC" | "ETC" | "DASH" | "SafeMoney" => 8,
        "XMR" => 16,
        "ETH" | "OSK" | "JST" | "SUNOLD" => 18,
        _ => 1,
    }
}

/// Insert thousands separators into the integer part of a decimal string
///
/// `"1234567.891"` -> `"1,234,567.891"`
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Scale a raw token quantity by the symbol's precision
///
/// Rounded half-up to two decimals, grouped, symbol appended:
/// `(1_000_000, "USDT")` -> `"1.00 USDT"`.
pub fn pretty_amount(quant: u128, symbol: &str) -> String {
    let divisor = 10u128.pow(token_precision(symbol));
    let mut whole = quant / divisor;
    // remainder < divisor <= 10^18, so the multiplication cannot overflow
    let mut cents = ((quant % divisor) * 100 + divisor / 2) / divisor;
    if cents >= 100 {
        whole += 1;
        cents -= 100;
    }

    format!("{}.{:02} {}", group_thousands(&whole.to_string()), cents, symbol)
}

/// Render a float the way the explorer UI does: shortest form, grouped
pub fn format_number(value: f64) -> String {
    group_thousands(&value.to_string())
}

/// `"Burn 0.345 TRX for bandwidth: 345 Bandwidth"`
pub fn bandwidth_description(net_fee: u64) -> String {
    format!(
        "Burn {} TRX for bandwidth: {} Bandwidth",
        net_fee as f64 / SUN_PER_TRX,
        format_number(net_fee as f64 / 1000.0)
    )
}

/// `"Burn 13.3959 TRX for energy: 31,895 Energy"`
pub fn energy_description(energy_fee: u64, energy_usage_total: u64) -> String {
    format!(
        "Burn {} TRX for energy: {} Energy",
        energy_fee as f64 / SUN_PER_TRX,
        group_thousands(&energy_usage_total.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_precision_table() {
        assert_eq!(token_precision("USDT"), 6);
        assert_eq!(token_precision("BTC"), 8);
        assert_eq!(token_precision("SafeMoney"), 8);
        assert_eq!(token_precision("XMR"), 16);
        assert_eq!(token_precision("JST"), 18);
        assert_eq!(token_precision("VNDO"), 2);
        assert_eq!(token_precision("BCH"), 3);
        assert_eq!(token_precision("UNKNOWN"), 1);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567.891"), "1,234,567.891");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
    }

    #[test]
    fn test_pretty_amount() {
        assert_eq!(pretty_amount(1_000_000, "USDT"), "1.00 USDT");
        assert_eq!(pretty_amount(100_000_000, "BTC"), "1.00 BTC");
        assert_eq!(pretty_amount(1_234_567_890_000, "USDT"), "1,234,567.89 USDT");
        assert_eq!(pretty_amount(5, "USDT"), "0.00 USDT");
        assert_eq!(pretty_amount(5_000, "USDT"), "0.01 USDT");
        assert_eq!(pretty_amount(999_999, "USDT"), "1.00 USDT");
        // unknown symbols scale by 10
        assert_eq!(pretty_amount(12_345, "FOO"), "1,234.50 FOO");
    }

    #[test]
    fn test_pretty_amount_eighteen_decimals() {
        let quant = 2_500_000_000_000_000_000u128;
        assert_eq!(pretty_amount(quant, "ETH"), "2.50 ETH");
    }

    #[test]
    fn test_fee_descriptions() {
        assert_eq!(
            bandwidth_description(1_000_000),
            "Burn 1 TRX for bandwidth: 1,000 Bandwidth"
        );
        assert_eq!(
            bandwidth_description(345_000),
            "Burn 0.345 TRX for bandwidth: 345 Bandwidth"
        );
        assert_eq!(energy_description(0, 500), "Burn 0 TRX for energy: 500 Energy");
        assert_eq!(
            energy_description(13_395_900, 31_895),
            "Burn 13.3959 TRX for energy: 31,895 Energy"
        );
    }
}
