//! Calendar page and the "upcoming events" lists.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::bucket::{bucket_by_day_sorted, chronological, upcoming, DayBuckets, TimedRecord};
use crate::models::CalendarEvent;
use crate::period::Period;
use crate::time::Zone;

use super::{same_member, ViewContext};

/// A period of events bucketed by day, plus the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView<'a> {
    pub period: Period,
    pub days: DayBuckets<'a, CalendarEvent>,
    /// First events of the period by start time
    pub sidebar: Vec<&'a CalendarEvent>,
}

/// One line of an upcoming-events list.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingRow<'a> {
    pub event: &'a CalendarEvent,
    /// "Today", "Tomorrow" or "Sun, Mar 10"
    pub day: String,
    /// "9:30 AM", "9:30 AM - 10:00 AM" or "All day"
    pub time: String,
}

/// Build the calendar for `period`.
///
/// `events` are expected to be scoped to the period already; stragglers
/// are dropped by the bucketer. `member` narrows to one person's events.
#[must_use]
pub fn calendar<'a>(
    events: &'a [CalendarEvent],
    period: Period,
    member: Option<&str>,
    zone: &Zone,
    sidebar_limit: usize,
) -> CalendarView<'a> {
    let visible: Vec<&'a CalendarEvent> = events
        .iter()
        .filter(|e| member.map_or(true, |m| involves(e, m)))
        .collect();

    CalendarView {
        period,
        days: bucket_by_day_sorted(visible.iter().copied(), &period.days(), zone),
        sidebar: chronological(visible, zone, sidebar_limit),
    }
}

fn involves(event: &CalendarEvent, member: &str) -> bool {
    event.involves(member)
        || event
            .family_member_ids
            .iter()
            .any(|id| same_member(id, member))
}

/// The next `limit` events from `ctx.now`, labelled for the dashboard.
#[must_use]
pub fn upcoming_list<'a>(
    events: &'a [CalendarEvent],
    ctx: &ViewContext,
    limit: usize,
) -> Vec<UpcomingRow<'a>> {
    upcoming(events, &ctx.zone, ctx.now, limit)
        .into_iter()
        .map(|event| UpcomingRow {
            event,
            day: day_label(ctx.zone.calendar_day(&event.start), ctx.today),
            time: time_label(event, &ctx.zone),
        })
        .collect()
}

/// "Today", "Tomorrow", otherwise e.g. "Sun, Mar 10".
#[must_use]
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if day == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        day.format("%a, %b %-d").to_string()
    }
}

/// Clock time such as "9:30 AM".
#[must_use]
pub fn clock(at: NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

/// Start (and end, when known) of an event, or "All day".
#[must_use]
pub fn time_label(event: &CalendarEvent, zone: &Zone) -> String {
    if event.all_day() {
        return "All day".to_string();
    }
    let start = clock(zone.local_time(&event.start));
    match event.end_timestamp() {
        Some(end) => format!("{start} - {}", clock(zone.local_time(end))),
        None => start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;
    use crate::views::fixtures::{ctx, day, from_json};

    fn events() -> Vec<CalendarEvent> {
        from_json(
            r#"[
            {"id": "1", "title": "Piano", "start": "2024-03-12T16:00:00",
             "end": "2024-03-12T16:45:00", "familyMember": "Zoe"},
            {"id": "2", "title": "Dentist", "start": "2024-03-11T09:30:00"},
            {"id": "3", "title": "Pancakes", "start": "2024-03-10T08:00:00"},
            {"id": "4", "title": "Field trip", "start": "2024-03-12", "allDay": true,
             "familyMemberIds": ["Zoe"]},
            {"id": "5", "title": "Book club", "start": "2024-03-12T07:00:00"}
        ]"#,
        )
    }

    #[test]
    fn test_week_calendar_buckets_and_sidebar() {
        let events = events();
        let period = Period::compute(day(2024, 3, 10), PeriodKind::Week);
        let view = calendar(&events, period, None, &Zone::utc(), 3);

        assert_eq!(view.days.len(), 7);
        let tuesday: Vec<_> = view
            .days
            .get(day(2024, 3, 12))
            .unwrap()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(tuesday, vec!["Field trip", "Book club", "Piano"]);
        assert!(view.days.get(day(2024, 3, 15)).unwrap().is_empty());

        let sidebar: Vec<_> = view.sidebar.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(sidebar, vec!["3", "2", "4"]);
    }

    #[test]
    fn test_member_filter() {
        let events = events();
        let period = Period::compute(day(2024, 3, 10), PeriodKind::Week);
        let view = calendar(&events, period, Some("zoe"), &Zone::utc(), 5);
        assert_eq!(view.days.record_count(), 2);
    }

    #[test]
    fn test_labels() {
        let today = day(2024, 3, 10);
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(day(2024, 3, 11), today), "Tomorrow");
        assert_eq!(day_label(day(2024, 3, 17), today), "Sun, Mar 17");

        let events = events();
        assert_eq!(time_label(&events[0], &Zone::utc()), "4:00 PM - 4:45 PM");
        assert_eq!(time_label(&events[1], &Zone::utc()), "9:30 AM");
        assert_eq!(time_label(&events[3], &Zone::utc()), "All day");
    }

    #[test]
    fn test_upcoming_list() {
        let events = events();
        let rows = upcoming_list(&events, &ctx(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event.title, "Pancakes");
        assert_eq!(rows[0].day, "Today");
        assert_eq!(rows[1].day, "Tomorrow");
        assert_eq!(rows[1].time, "9:30 AM");
    }
}
