use chrono::{DateTime, Datelike, Duration, Month, NaiveDate, Offset, TimeZone, Utc};
use num_traits::FromPrimitive;
use std::ops::RangeInclusive;

use crate::tz::Tz;

/// Number of days assumed when a calendar cannot resolve its month length.
pub const FALLBACK_DAYS: u32 = 30;

/// A calendar system able to tell which days make up the month of an instant.
pub trait MonthCalendar {
    fn day_range(&self, reference: &DateTime<Utc>) -> Option<RangeInclusive<u32>>;
}

/// Gregorian calendar evaluated in an explicit time zone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gregorian {
    tz: Tz,
}

impl Gregorian {
    pub fn new(tz: Tz) -> Self {
        Gregorian { tz }
    }

    pub fn tz(&self) -> &Tz {
        &self.tz
    }

    /// Month of `reference` as seen on a wall clock in this calendar's zone.
    pub fn month_of(&self, reference: &DateTime<Utc>) -> Option<Month> {
        Month::from_u32(self.local_date(reference)?.month())
    }

    /// Wall clock date of `reference`, `None` if it lies outside the
    /// representable date range once shifted into this zone.
    fn local_date(&self, reference: &DateTime<Utc>) -> Option<NaiveDate> {
        let utc = reference.naive_utc();
        let offset = self.tz.offset_from_utc_datetime(&utc).fix();

        utc.checked_add_signed(Duration::seconds(offset.local_minus_utc().into()))
            .map(|local| local.date())
    }
}

impl MonthCalendar for Gregorian {
    fn day_range(&self, reference: &DateTime<Utc>) -> Option<RangeInclusive<u32>> {
        let local = self.local_date(reference)?;
        let month = Month::from_u32(local.month())?;

        days_of_month(&month, local.year()).map(|last| 1..=last)
    }
}

pub fn days_of_month(month: &Month, year: i32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)?;
    let next = if month.number_from_month() == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1)
    }?;

    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Ordered day-of-month numbers for the month containing `reference`.
///
/// Never fails: if `calendar` cannot resolve the month, the sequence
/// `1..=FALLBACK_DAYS` is returned instead.
pub fn days_in_month<C: MonthCalendar + ?Sized>(
    calendar: &C,
    reference: &DateTime<Utc>,
) -> Vec<u32> {
    match calendar.day_range(reference) {
        Some(range) => range.collect(),
        None => {
            log::debug!(
                "Could not resolve month of {}, assuming {} days",
                reference,
                FALLBACK_DAYS
            );
            (1..=FALLBACK_DAYS).collect()
        }
    }
}
