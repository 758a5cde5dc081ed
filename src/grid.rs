use chrono::{DateTime, Utc};
use derive_more::Constructor;

/// Habit rows shown when nothing else is configured.
pub const DEFAULT_HABITS: [&str; 4] = ["W", "L", "R", "P"];

const ROW_TITLE_LEN: usize = 3;

pub fn default_habits() -> Vec<String> {
    DEFAULT_HABITS.iter().map(|h| h.to_string()).collect()
}

/// One snapshot of the habit grid: rows are habits, columns are days of the
/// month, tagged with the instant at which it should be displayed.
#[derive(Clone, Constructor, Debug, PartialEq, Eq)]
pub struct GridEntry {
    timestamp: DateTime<Utc>,
    habit_labels: Vec<String>,
    days: Vec<u32>,
}

impl GridEntry {
    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn habit_labels(&self) -> &[String] {
        &self.habit_labels
    }

    pub fn days(&self) -> &[u32] {
        &self.days
    }

    /// Row headers, cut down to the first three characters of each label.
    pub fn row_titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.habit_labels.iter().map(|label| {
            label
                .char_indices()
                .nth(ROW_TITLE_LEN)
                .map_or(label.as_str(), |(idx, _)| &label[..idx])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn row_titles_are_truncated() {
        let entry = GridEntry::new(
            Utc.with_ymd_and_hms(2025, 12, 2, 10, 0, 0).unwrap(),
            vec!["Water".to_owned(), "R".to_owned(), "Läsen".to_owned()],
            (1..=31).collect(),
        );

        assert_eq!(entry.row_titles().collect::<Vec<_>>(), ["Wat", "R", "Läs"]);
    }

    #[test]
    fn default_habit_rows() {
        assert_eq!(default_habits(), ["W", "L", "R", "P"]);
    }
}
