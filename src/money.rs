use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole cents, halves away from zero.
pub fn cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// en-AU currency display: `$1,234.56`, `-$12.00`.
pub fn format_aud(amount: Decimal, decimal_places: u32) -> String {
    let rounded = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.*}", decimal_places as usize, rounded.abs());
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };
    match fraction {
        Some(fraction) => format!("{sign}${}.{fraction}", group_thousands(whole)),
        None => format!("{sign}${}", group_thousands(whole)),
    }
}

/// Two decimal places, as shown on screen and in e-mail.
pub fn display_aud(amount: Decimal) -> String {
    format_aud(amount, 2)
}

/// Whole dollars, as used in SMS.
pub fn compact_aud(amount: Decimal) -> String {
    format_aud(amount, 0)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
