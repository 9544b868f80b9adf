//! Calendar view model.
//!
//! Knows which granularity and date range are on screen, which events are
//! fit to render, and how user gestures become state-store actions. Drawing
//! lives in `render`.

use std::fmt;

use calboard_core::Event;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tokio::task::JoinHandle;

use crate::client::{ClientResult, EventApi};
use crate::dialog::{CreateDialog, DialogError};
use crate::state::{EventStateStore, UpdateOutcome};

/// Viewports narrower than this many columns get the compact layout.
pub const NARROW_VIEWPORT_COLUMNS: u16 = 100;

/// Used when the terminal size cannot be read.
const FALLBACK_COLUMNS: u16 = 120;

/// Days shown by the agenda.
pub const AGENDA_DAYS: i64 = 30;

/// Length of a slot selected with a single click.
pub const SLOT_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Granularity {
    Day,
    Week,
    Agenda,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Agenda => "agenda",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub columns: u16,
}

impl Viewport {
    pub fn new(columns: u16) -> Self {
        Viewport { columns }
    }

    /// Current terminal width.
    pub fn detect() -> Self {
        let columns = crossterm::terminal::size()
            .map(|(cols, _)| cols)
            .unwrap_or(FALLBACK_COLUMNS);
        Viewport { columns }
    }

    pub fn is_narrow(&self) -> bool {
        self.columns < NARROW_VIEWPORT_COLUMNS
    }

    pub fn default_granularity(&self) -> Granularity {
        if self.is_narrow() {
            Granularity::Day
        } else {
            Granularity::Week
        }
    }

    /// Granularities offered at this width, default first.
    pub fn granularities(&self) -> &'static [Granularity] {
        if self.is_narrow() {
            &[Granularity::Day, Granularity::Agenda]
        } else {
            &[Granularity::Week, Granularity::Day, Granularity::Agenda]
        }
    }
}

/// A selected time interval, the seed of a new event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    /// The slot a single click at `start` selects.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Slot {
            start,
            end: start + Duration::minutes(SLOT_MINUTES),
        }
    }
}

/// Events fit to render: anything without a title is skipped.
pub fn renderable(events: &[Event]) -> impl Iterator<Item = &Event> {
    events.iter().filter(|e| !e.title.is_empty())
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Whether `event` intersects the half-open interval `[from, to)`.
pub fn overlaps(event: &Event, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    event.start < to && event.end > from
}

pub struct CalendarView<A> {
    store: EventStateStore<A>,
    viewport: Viewport,
    granularity: Granularity,
    anchor: NaiveDate,
    dialog: CreateDialog,
}

impl<A: EventApi> CalendarView<A> {
    /// Mount the view. The granularity follows the viewport.
    pub fn new(store: EventStateStore<A>, viewport: Viewport, anchor: NaiveDate) -> Self {
        CalendarView {
            store,
            viewport,
            granularity: viewport.default_granularity(),
            anchor,
            dialog: CreateDialog::default(),
        }
    }

    /// Load the event table, as on mount.
    pub fn refresh(&self) -> JoinHandle<ClientResult<usize>> {
        self.store.dispatch_fetch_all()
    }

    pub fn store(&self) -> &EventStateStore<A> {
        &self.store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn on_viewport_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !viewport.granularities().contains(&self.granularity) {
            self.granularity = viewport.default_granularity();
        }
    }

    /// Switch granularity. Returns false if it is not offered at this width.
    pub fn set_granularity(&mut self, granularity: Granularity) -> bool {
        let offered = self.viewport.granularities().contains(&granularity);
        if offered {
            self.granularity = granularity;
        }
        offered
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }

    /// Move by whole pages (days, weeks or agenda spans).
    pub fn navigate(&mut self, pages: i64) {
        let days = match self.granularity {
            Granularity::Day => 1,
            Granularity::Week => 7,
            Granularity::Agenda => AGENDA_DAYS,
        };
        self.anchor += Duration::days(days * pages);
    }

    /// First day on screen.
    pub fn first_day(&self) -> NaiveDate {
        match self.granularity {
            Granularity::Week => week_start(self.anchor),
            Granularity::Day | Granularity::Agenda => self.anchor,
        }
    }

    /// Days on screen, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        let count = match self.granularity {
            Granularity::Day => 1,
            Granularity::Week => 7,
            Granularity::Agenda => AGENDA_DAYS,
        };
        let first = self.first_day();
        (0..count).map(|n| first + Duration::days(n)).collect()
    }

    /// The half-open time range on screen.
    pub fn range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let days = self.days();
        let from = start_of_day(self.first_day());
        (from, from + Duration::days(days.len() as i64))
    }

    /// Renderable events in the visible range, ordered by start.
    pub fn visible_events(&self, events: &[Event]) -> Vec<Event> {
        let (from, to) = self.range();
        let mut visible: Vec<Event> = renderable(events)
            .filter(|e| overlaps(e, from, to))
            .cloned()
            .collect();
        visible.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
        visible
    }

    pub fn dialog(&self) -> &CreateDialog {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut CreateDialog {
        &mut self.dialog
    }

    /// Slot selection opens the create dialog seeded with the slot.
    pub fn select_slot(&mut self, slot: Slot) {
        self.dialog.open_with(slot);
    }

    pub fn submit_dialog(&mut self) -> Result<JoinHandle<ClientResult<Event>>, DialogError> {
        self.dialog.submit(&self.store)
    }

    /// An event was dragged to a new time.
    pub fn drop_event(
        &self,
        event: &Event,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> JoinHandle<ClientResult<UpdateOutcome>> {
        self.store.dispatch_update_one(event.with_times(start, end))
    }

    /// An event's edge was dragged. Same action as a move.
    pub fn resize_event(
        &self,
        event: &Event,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> JoinHandle<ClientResult<UpdateOutcome>> {
        self.store.dispatch_update_one(event.with_times(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::settle;
    use crate::state::tests::{ScriptedApi, at, event};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn view(columns: u16) -> CalendarView<ScriptedApi> {
        let store = EventStateStore::new(ScriptedApi::default());
        // 2024-01-03 is a Wednesday
        CalendarView::new(store, Viewport::new(columns), date(2024, 1, 3))
    }

    #[test]
    fn test_default_granularity_follows_width() {
        assert_eq!(view(60).granularity(), Granularity::Day);
        assert_eq!(view(160).granularity(), Granularity::Week);
    }

    #[test]
    fn test_narrow_viewport_offers_no_week() {
        let mut v = view(60);
        assert!(!v.set_granularity(Granularity::Week));
        assert!(v.set_granularity(Granularity::Agenda));
        assert_eq!(v.granularity(), Granularity::Agenda);
    }

    #[test]
    fn test_resize_keeps_granularity_when_offered() {
        let mut v = view(160);
        v.set_granularity(Granularity::Agenda);
        v.on_viewport_resize(Viewport::new(60));
        assert_eq!(v.granularity(), Granularity::Agenda);

        let mut v = view(160);
        v.on_viewport_resize(Viewport::new(60));
        assert_eq!(v.granularity(), Granularity::Day);
    }

    #[test]
    fn test_week_starts_on_sunday() {
        assert_eq!(week_start(date(2024, 1, 3)), date(2023, 12, 31));
        assert_eq!(week_start(date(2023, 12, 31)), date(2023, 12, 31));

        let v = view(160);
        let days = v.days();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2023, 12, 31));
        assert_eq!(days[6], date(2024, 1, 6));
    }

    #[test]
    fn test_navigate_by_page() {
        let mut v = view(160);
        v.navigate(1);
        assert_eq!(v.anchor(), date(2024, 1, 10));

        v.set_granularity(Granularity::Day);
        v.navigate(-2);
        assert_eq!(v.anchor(), date(2024, 1, 8));
    }

    #[test]
    fn test_visible_events_filters_and_sorts() {
        let mut v = view(60);
        v.go_to(date(2024, 1, 1));

        let events = vec![
            event("b", "Swim", 8, 9),
            event("a", "Run", 6, 7),
            event("untitled", "", 6, 7),
        ];
        let mut next_day = event("c", "Tomorrow", 6, 7);
        next_day.start += Duration::days(1);
        next_day.end += Duration::days(1);

        let mut all = events.clone();
        all.push(next_day);

        let ids: Vec<_> = v.visible_events(&all).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_select_slot_opens_dialog() {
        let mut v = view(160);
        assert!(!v.dialog().is_open());

        v.select_slot(Slot::starting_at(at(6)));
        assert!(v.dialog().is_open());
        assert_eq!(v.dialog().start, "2024-01-01T06:00");
        assert_eq!(v.dialog().end, "2024-01-01T06:30");
    }

    #[tokio::test]
    async fn drag_and_resize_send_full_updates() {
        let (api, mut requests) = ScriptedApi::with_updates();
        api.push_fetch(Ok(vec![event("a", "Run", 6, 7)]));
        let store = EventStateStore::new(api);
        store.fetch_all().await.unwrap();
        let v = CalendarView::new(store, Viewport::new(160), date(2024, 1, 1));

        let original = event("a", "Run", 6, 7);

        let moved = v.drop_event(&original, at(7), at(8));
        let (sent, reply) = requests.recv().await.unwrap();
        assert_eq!(sent.id, "a");
        assert_eq!(sent.title, "Run");
        assert_eq!(sent.category, original.category);
        assert_eq!((sent.start, sent.end), (at(7), at(8)));
        reply.send(Ok(sent)).unwrap();
        assert_eq!(settle(moved).await.unwrap(), UpdateOutcome::Applied);

        let resized = v.resize_event(&original, at(6), at(9));
        let (sent, reply) = requests.recv().await.unwrap();
        assert_eq!((sent.start, sent.end), (at(6), at(9)));
        reply.send(Ok(sent)).unwrap();
        settle(resized).await.unwrap();

        assert_eq!(v.store().events()[0].end, at(9));
    }
}
