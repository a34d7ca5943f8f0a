/// `m:ss`, minutes unbounded: 605 s is `10:05`, 3725 s is `62:05`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Same as [`format_clock`] for a media position, truncated to whole seconds.
#[must_use]
pub fn format_position(seconds: f64) -> String {
    if seconds.is_finite() && seconds > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = seconds.floor().min(f64::from(u32::MAX)) as u32;
        format_clock(whole)
    } else {
        format_clock(0)
    }
}

/// Catalog price label. Missing or zero prices read as free.
#[must_use]
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => format!("${p:.2}"),
        _ => "Free".to_owned(),
    }
}
