//! Adapter types shaped after a home-screen widget host.
//!
//! The host owns the clock and the refresh cadence: it hands a
//! [`TimelineContext`] to a [`TimelineProvider`] and draws whatever entries
//! come back. Nothing in here computes anything itself, it only wires the
//! calendar and the snapshot generator together.

use chrono::{DateTime, Utc};

use crate::calendar::{days_in_month, MonthCalendar};
use crate::grid::{default_habits, GridEntry};
use crate::timeline::{ReloadPolicy, SnapshotGenerator, Timeline};

pub const HABGRID_KIND: &str = "HabgridWidget";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetFamily {
    Small,
    Medium,
    Large,
}

#[derive(Clone, Debug)]
pub struct TimelineContext {
    pub now: DateTime<Utc>,
    pub family: WidgetFamily,
}

impl TimelineContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        TimelineContext {
            now,
            family: WidgetFamily::Small,
        }
    }
}

pub trait TimelineProvider {
    /// Entry drawn while the widget has no real data yet.
    fn placeholder(&self, ctx: &TimelineContext) -> GridEntry;
    /// Entry drawn in transient previews, e.g. the widget gallery.
    fn snapshot(&self, ctx: &TimelineContext) -> GridEntry;
    fn timeline(&self, ctx: &TimelineContext) -> Timeline;
}

pub struct HabgridProvider<C: MonthCalendar> {
    calendar: C,
    habits: Vec<String>,
    generator: SnapshotGenerator,
}

impl<C: MonthCalendar> HabgridProvider<C> {
    pub fn new(calendar: C) -> Self {
        HabgridProvider {
            calendar,
            habits: default_habits(),
            generator: SnapshotGenerator::default(),
        }
    }

    pub fn with_habits(mut self, habits: Vec<String>) -> Self {
        self.habits = habits;
        self
    }

    pub fn with_generator(mut self, generator: SnapshotGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    fn single_entry(&self, now: &DateTime<Utc>) -> GridEntry {
        GridEntry::new(
            *now,
            self.habits.clone(),
            days_in_month(&self.calendar, now),
        )
    }
}

impl<C: MonthCalendar> TimelineProvider for HabgridProvider<C> {
    fn placeholder(&self, ctx: &TimelineContext) -> GridEntry {
        self.single_entry(&ctx.now)
    }

    fn snapshot(&self, ctx: &TimelineContext) -> GridEntry {
        self.single_entry(&ctx.now)
    }

    fn timeline(&self, ctx: &TimelineContext) -> Timeline {
        let days = days_in_month(&self.calendar, &ctx.now);
        let entries = self.generator.generate(&ctx.now, &self.habits, &days);

        log::debug!(
            "Generated {} entries for {:?} widget starting at {}",
            entries.len(),
            ctx.family,
            ctx.now
        );

        Timeline::new(entries, ReloadPolicy::AtEnd)
    }
}

/// Static description of a widget as registered with the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Widget {
    pub kind: String,
    pub display_name: String,
    pub description: String,
    pub supported_families: Vec<WidgetFamily>,
}

impl Default for Widget {
    fn default() -> Self {
        Widget {
            kind: HABGRID_KIND.to_owned(),
            display_name: "Habit Grid".to_owned(),
            description: "Your habits for every day of this month.".to_owned(),
            supported_families: vec![WidgetFamily::Small, WidgetFamily::Medium],
        }
    }
}

impl Widget {
    pub fn supports(&self, family: WidgetFamily) -> bool {
        self.supported_families.contains(&family)
    }
}

#[derive(Clone, Debug, Default)]
pub struct WidgetBundle {
    widgets: Vec<Widget>,
}

impl WidgetBundle {
    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn find(&self, kind: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.kind == kind)
    }
}
