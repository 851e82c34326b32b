//! Month windows over release timestamps
//!
//! `window_for` returns exclusive bounds such that a record's release
//! timestamp lies strictly between them iff it was released in the given
//! month. The same strict predicate filters any magazine collection, the
//! whole catalog or just the caller's purchases.

use chrono::NaiveDate;
use edicola_types::{EdicolaError, MagazineRecord, Result};

/// Exclusive bounds around one calendar month, in epoch milliseconds UTC
pub fn window_for(year: i32, month: u32) -> Result<(i64, i64)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        EdicolaError::Validation(format!("invalid year/month: {year}-{month}"))
    })?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EdicolaError::Validation(format!("invalid year/month: {year}-{month}")))?;

    let start = month_start_ms(first) - 1;
    let end = month_start_ms(next_first);
    Ok((start, end))
}

fn month_start_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight exists for every date")
        .and_utc()
        .timestamp_millis()
}

/// Records whose release timestamp lies strictly inside the window
pub fn filter_by_window(records: &[MagazineRecord], start: i64, end: i64) -> Vec<MagazineRecord> {
    records
        .iter()
        .filter(|record| {
            let ts = record.release_date as i64;
            start < ts && ts < end
        })
        .cloned()
        .collect()
}
