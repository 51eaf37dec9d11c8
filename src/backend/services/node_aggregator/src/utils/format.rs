//! Formatting and numeric helpers for the presentation surfaces. Missing
//! data renders as [`NOT_AVAILABLE`], never as zero.

/// Rendered in place of any metric with no data behind it.
pub const NOT_AVAILABLE: &str = "N/A";

const WEI_PER_TOKEN: f64 = 1e18;

/// Convert a wei amount (18 decimals) to a token value.
pub fn wei_to_tokens(wei: u128) -> f64 {
    wei as f64 / WEI_PER_TOKEN
}

/// Abbreviate a number with K/M/B/T suffixes, keeping `precision`
/// significant digits: `abbreviate_number(12345.0, 3)` is `"12.3K"`.
pub fn abbreviate_number(value: f64, precision: u32) -> String {
    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];
    let mut value = value;
    let mut suffix = 0;
    while value >= 1000.0 && suffix < SUFFIXES.len() - 1 {
        value /= 1000.0;
        suffix += 1;
    }
    format!("{}{}", to_significant(value, precision), SUFFIXES[suffix])
}

fn to_significant(value: f64, precision: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return 0.0;
    }
    let digits = precision as i32 - 1 - value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Round to two decimal places, nudged by machine epsilon before rounding.
pub fn round_to_two(num: f64) -> f64 {
    (num * 100.0 + f64::EPSILON).round() / 100.0
}

/// Render a [0, 1] fraction as a whole percent: `0.5` becomes `"50%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round())
}

/// Render a [0, 1] score as a percent with one decimal, or "N/A" when
/// absent.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.1}%", s * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Render a count over its window, "28/30" style, or "N/A" for an empty
/// window.
pub fn format_ratio(count: usize, denominator: usize) -> String {
    if denominator == 0 {
        return NOT_AVAILABLE.to_string();
    }
    format!("{count}/{denominator}")
}

/// Shorten an address-like identity to its leading and trailing characters:
/// `0x123456…abcd`.
pub fn abbreviate_address(address: &str) -> String {
    if address.len() <= 14 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Standard percent change between two values, with non-finite results collapsed to 0.
pub fn percent_change(value_now: f64, value_before: f64) -> f64 {
    let change = (value_now - value_before) / value_before * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// Amount difference plus the percent change in the change itself between
/// two periods. The second-order term collapses to 0 when undefined.
pub fn two_period_percent_change(
    value_now: f64,
    value_period_one: f64,
    value_period_two: f64,
) -> (f64, f64) {
    let current_change = value_now - value_period_one;
    let previous_change = value_period_one - value_period_two;
    let adjusted = (current_change - previous_change) / previous_change * 100.0;
    if adjusted.is_finite() {
        (current_change, adjusted)
    } else {
        (current_change, 0.0)
    }
}

/// Estimate usage minutes implied by fee volume: converts the advertised
/// wei-per-pixel price into USD via the observed ETH/USD volume ratio, then
/// divides the USD volume through price and pixels-per-minute.
pub fn fee_derived_minutes(
    total_volume_eth: f64,
    total_volume_usd: f64,
    price_per_pixel: f64,
    pixels_per_minute: f64,
) -> f64 {
    let eth_usd_rate = total_volume_eth / total_volume_usd;
    let usd_price_per_pixel = price_per_pixel / eth_usd_rate;
    let minutes = total_volume_usd / usd_price_per_pixel / pixels_per_minute;
    if minutes.is_finite() {
        minutes
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wei_conversion_uses_18_decimals() {
        assert_eq!(wei_to_tokens(1_000_000_000_000_000_000), 1.0);
        assert_eq!(wei_to_tokens(2_500_000_000_000_000_000), 2.5);
        assert_eq!(wei_to_tokens(0), 0.0);
    }

    #[test]
    fn abbreviates_with_suffixes() {
        assert_eq!(abbreviate_number(950.0, 3), "950");
        assert_eq!(abbreviate_number(12345.0, 3), "12.3K");
        assert_eq!(abbreviate_number(1_234_000.0, 3), "1.23M");
        assert_eq!(abbreviate_number(5_000_000_000.0, 3), "5B");
        assert_eq!(abbreviate_number(7.2e12, 3), "7.2T");
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_to_two(1.007), 1.01);
        assert_eq!(round_to_two(2.344), 2.34);
    }

    #[test]
    fn formats_fractions_as_percents() {
        assert_eq!(format_percent(0.5), "50%");
        assert_eq!(format_percent(0.8), "80%");
    }

    #[test]
    fn missing_score_renders_not_available() {
        assert_eq!(format_score(None), NOT_AVAILABLE);
        assert_eq!(format_score(Some(0.915)), "91.5%");
    }

    #[test]
    fn ratio_over_empty_window_renders_not_available() {
        assert_eq!(format_ratio(28, 30), "28/30");
        assert_eq!(format_ratio(0, 0), NOT_AVAILABLE);
    }

    #[test]
    fn abbreviates_addresses() {
        assert_eq!(
            abbreviate_address("0x525419ff5707190389bfb5c87c375d710f5fcb0e"),
            "0x5254…cb0e"
        );
        assert_eq!(abbreviate_address("0xshort"), "0xshort");
    }

    #[test]
    fn percent_change_guards_division_by_zero() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(10.0, 0.0), 0.0);
    }

    #[test]
    fn two_period_change_reports_first_order_delta() {
        let (change, adjusted) = two_period_percent_change(300.0, 200.0, 100.0);
        assert_eq!(change, 100.0);
        assert_eq!(adjusted, 0.0);

        let (change, adjusted) = two_period_percent_change(400.0, 200.0, 100.0);
        assert_eq!(change, 200.0);
        assert_eq!(adjusted, 100.0);
    }

    #[test]
    fn fee_derived_minutes_collapses_when_undefined() {
        assert_eq!(fee_derived_minutes(0.0, 0.0, 1200.0, 2_995_488_000.0), 0.0);
        let minutes = fee_derived_minutes(10.0, 30_000.0, 1200.0, 2_995_488_000.0);
        assert!(minutes > 0.0);
    }
}
