use thiserror::Error;
use time::{macros::format_description, OffsetDateTime};

pub const NAIRA: char = '₦';

const ABBREVIATIONS: [(f64, char); 4] = [(1e12, 'T'), (1e9, 'B'), (1e6, 'M'), (1e3, 'K')];

/// Non-finite input formats as zero.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

pub fn format_currency(amount: f64, decimals: usize) -> String {
    let grouped = format_grouped(amount, decimals);
    match grouped.strip_prefix('-') {
        Some(digits) => format!("-{NAIRA}{digits}"),
        None => format!("{NAIRA}{grouped}"),
    }
}

pub fn format_signed_currency(amount: f64, decimals: usize) -> String {
    if amount >= 0.0 {
        format!("+{}", format_currency(amount, decimals))
    } else {
        format_currency(amount, decimals)
    }
}

pub fn format_number(n: f64) -> String {
    ABBREVIATIONS
        .iter()
        .find(|(scale, _)| n >= *scale)
        .map(|(scale, suffix)| format!("{:.2}{suffix}", n / scale))
        .unwrap_or_else(|| n.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not an abbreviated number")]
pub struct ParseAbbreviatedError(pub String);

pub fn parse_abbreviated(s: &str) -> Result<f64, ParseAbbreviatedError> {
    let trimmed = s.trim();
    let (digits, scale) = match trimmed.chars().last() {
        Some(last) => match ABBREVIATIONS
            .iter()
            .find(|(_, suffix)| suffix.eq_ignore_ascii_case(&last))
        {
            Some((scale, _)) => (&trimmed[..trimmed.len() - last.len_utf8()], *scale),
            None => (trimmed, 1.0),
        },
        None => return Err(ParseAbbreviatedError(s.to_owned())),
    };

    digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value * scale)
        .ok_or_else(|| ParseAbbreviatedError(s.to_owned()))
}

/// Zero counts as positive.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.decimals$}%")
}

pub fn format_time(t: OffsetDateTime) -> String {
    format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

pub fn format_date(t: OffsetDateTime) -> String {
    let description = format_description!("[month repr:short] [day padding:none], [year]");
    t.format(description).unwrap_or_else(|_| t.date().to_string())
}

pub fn format_shares(n: f64) -> String {
    if n.fract() == 0.0 {
        format_grouped(n, 0)
    } else {
        format_grouped(n, 2)
    }
}

pub fn change_class(value: f64) -> &'static str {
    if value > 0.0 {
        "positive"
    } else if value < 0.0 {
        "negative"
    } else {
        "neutral"
    }
}
