use chrono::{DateTime, Duration, Utc};

use crate::grid::GridEntry;

pub const DEFAULT_ENTRY_COUNT: usize = 5;

/// When the host should ask for the next timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReloadPolicy {
    #[default]
    AtEnd,
    After(DateTime<Utc>),
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<GridEntry>,
    policy: ReloadPolicy,
}

impl Timeline {
    /// Entries are kept in display order, sorted by timestamp.
    pub fn new(mut entries: Vec<GridEntry>, policy: ReloadPolicy) -> Self {
        entries.sort_by_key(|e| *e.timestamp());
        Timeline { entries, policy }
    }

    pub fn entries(&self) -> &[GridEntry] {
        &self.entries
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }

    pub fn next_reload(&self) -> Option<DateTime<Utc>> {
        match self.policy {
            ReloadPolicy::AtEnd => self.entries.last().map(|e| *e.timestamp()),
            ReloadPolicy::After(dt) => Some(dt),
            ReloadPolicy::Never => None,
        }
    }

    /// The entry on display at `now`: the latest one not scheduled after it.
    pub fn entry_at(&self, now: &DateTime<Utc>) -> Option<&GridEntry> {
        let idx = self
            .entries
            .partition_point(|e| e.timestamp() <= now)
            .checked_sub(1);

        idx.map(|i| &self.entries[i])
    }
}

/// Stamps out hourly copies of the same grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotGenerator {
    count: usize,
}

impl Default for SnapshotGenerator {
    fn default() -> Self {
        SnapshotGenerator {
            count: DEFAULT_ENTRY_COUNT,
        }
    }
}

impl SnapshotGenerator {
    /// Negative counts are treated as zero.
    pub fn new(count: i64) -> Self {
        if count < 0 {
            log::warn!("Negative snapshot count {} treated as 0", count);
        }

        SnapshotGenerator {
            count: usize::try_from(count).unwrap_or(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn generate(
        &self,
        reference: &DateTime<Utc>,
        habit_labels: &[String],
        days: &[u32],
    ) -> Vec<GridEntry> {
        (0..self.count)
            .map_while(|offset| {
                let hours = Duration::hours(i64::try_from(offset).ok()?);
                reference.checked_add_signed(hours)
            })
            .map(|timestamp| GridEntry::new(timestamp, habit_labels.to_vec(), days.to_vec()))
            .collect()
    }
}

pub fn generate(
    reference: &DateTime<Utc>,
    habit_labels: &[String],
    days: &[u32],
    count: i64,
) -> Vec<GridEntry> {
    SnapshotGenerator::new(count).generate(reference, habit_labels, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::default_habits;
    use chrono::{TimeZone, Timelike};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn five_entries_an_hour_apart() {
        let labels = default_habits();
        let days: Vec<u32> = (1..=31).collect();

        let entries = generate(&reference(), &labels, &days, 5);

        assert_eq!(entries.len(), 5);
        assert_eq!(
            entries.iter().map(|e| e.timestamp().hour()).collect::<Vec<_>>(),
            [10, 11, 12, 13, 14]
        );
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(*entry.timestamp(), reference() + Duration::hours(i as i64));
            assert_eq!(entry.habit_labels(), labels.as_slice());
            assert_eq!(entry.days(), days.as_slice());
        }
    }

    #[test]
    fn zero_and_negative_counts_are_empty() {
        let labels = default_habits();
        let days: Vec<u32> = (1..=30).collect();

        assert!(generate(&reference(), &labels, &days, 0).is_empty());
        assert!(generate(&reference(), &labels, &days, -3).is_empty());
        assert_eq!(SnapshotGenerator::new(-1).count(), 0);
    }

    #[test]
    fn generation_is_deterministic() {
        let labels = default_habits();
        let days: Vec<u32> = (1..=28).collect();

        assert_eq!(
            generate(&reference(), &labels, &days, 4),
            generate(&reference(), &labels, &days, 4)
        );
    }

    #[test]
    fn stops_at_end_of_representable_time() {
        let end = DateTime::<Utc>::MAX_UTC - Duration::minutes(90);

        let entries = generate(&end, &default_habits(), &[1, 2, 3], 5);

        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn reload_policy() {
        let entries = generate(&reference(), &default_habits(), &[1, 2], 3);
        let last = reference() + Duration::hours(2);

        let timeline = Timeline::new(entries.clone(), ReloadPolicy::default());
        assert_eq!(timeline.next_reload(), Some(last));

        let timeline = Timeline::new(entries.clone(), ReloadPolicy::After(reference()));
        assert_eq!(timeline.next_reload(), Some(reference()));

        let timeline = Timeline::new(entries, ReloadPolicy::Never);
        assert_eq!(timeline.next_reload(), None);

        let timeline = Timeline::new(Vec::new(), ReloadPolicy::AtEnd);
        assert_eq!(timeline.next_reload(), None);
    }

    #[test]
    fn entries_are_ordered_by_timestamp() {
        let mut entries = generate(&reference(), &default_habits(), &[1], 3);
        entries.reverse();

        let timeline = Timeline::new(entries, ReloadPolicy::AtEnd);

        assert_eq!(
            timeline.entries().iter().map(|e| *e.timestamp()).collect::<Vec<_>>(),
            [
                reference(),
                reference() + Duration::hours(1),
                reference() + Duration::hours(2)
            ]
        );
        assert_eq!(
            timeline
                .entry_at(&(reference() + Duration::minutes(90)))
                .map(|e| *e.timestamp()),
            Some(reference() + Duration::hours(1))
        );
        assert_eq!(timeline.next_reload(), Some(reference() + Duration::hours(2)));
    }

    #[test]
    fn entry_at_picks_latest_due_entry() {
        let timeline = Timeline::new(
            generate(&reference(), &default_habits(), &[1], 3),
            ReloadPolicy::AtEnd,
        );

        assert_eq!(timeline.entry_at(&(reference() - Duration::minutes(1))), None);
        assert_eq!(
            timeline.entry_at(&reference()).map(|e| *e.timestamp()),
            Some(reference())
        );
        assert_eq!(
            timeline
                .entry_at(&(reference() + Duration::minutes(150)))
                .map(|e| *e.timestamp()),
            Some(reference() + Duration::hours(2))
        );
        assert_eq!(
            timeline
                .entry_at(&(reference() + Duration::days(1)))
                .map(|e| *e.timestamp()),
            Some(reference() + Duration::hours(2))
        );
    }
}
