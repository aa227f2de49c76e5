//! Display utilities for printing dashboard views in the terminal.
//!
//! # Functions
//!
//! - [`truncate`] - Truncate strings to a maximum length with ellipsis
//! - [`make_bar`] - Create visual bar charts for relative values
//! - [`tone_marker`] - Two-character prefix for a status tone
//! - [`print_section`] / [`print_section_simple`] - Print section headers
//! - [`display_dashboard`] / [`display_bills`] / etc. - Print one page

use chrono::NaiveDate;

use crate::models::{FamilyMemberStatus, SystemHealth};
use crate::poll::DashboardSnapshot;
use crate::status::Tone;
use crate::time::Zone;
use crate::views::calendar::{day_label, time_label, CalendarView};
use crate::views::{
    BillRow, BillsBoard, ChoresBoard, Dashboard, MealWeek, MedicalOverview, ShoppingList,
};

/// Truncate a string to a maximum length, adding "..." if truncated.
///
/// Handles Unicode characters correctly by counting chars rather than bytes.
/// For `max_len < 3`, truncates without ellipsis since there's no room for "...".
///
/// # Examples
///
/// ```
/// use hearth::display::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("hello", 2), "he");
/// ```
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len < 3 {
        // No room for ellipsis, just truncate
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

/// Create a visual bar for displaying relative values.
///
/// Uses Unicode block characters to create a proportional bar chart.
///
/// # Arguments
///
/// * `value` - The value to represent (negative values treated as 0)
/// * `max_value` - The maximum value (determines 100% width)
/// * `width` - The total width of the bar in characters
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn make_bar(value: i64, max_value: i64, width: usize) -> String {
    if max_value <= 0 || value <= 0 {
        return " ".repeat(width);
    }
    let ratio = (value as f64 / max_value as f64).clamp(0.0, 1.0);
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Prefix marking the emphasis of a row.
#[must_use]
pub const fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Danger => "!!",
        Tone::Warning => "! ",
        Tone::Success => "✓ ",
        Tone::Muted => "- ",
        Tone::Neutral => "  ",
    }
}

/// Print a section header with equals signs.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("  {title}");
    println!("{}", "=".repeat(50));
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(30));
}

fn print_empty(what: &str) {
    println!("  No {what}.");
}

fn bill_line(row: &BillRow<'_>, symbol: &str) -> String {
    let mut badges = String::new();
    if row.bill.is_recurring {
        badges.push_str(" [recurring]");
    }
    if row.bill.is_autopay() {
        badges.push_str(" [autopay]");
    }
    format!(
        "{} {:<24} {:>12}  {:<18}{}",
        tone_marker(row.status.tone()),
        truncate(&row.bill.name, 24),
        row.bill.amount.format_with(symbol),
        row.status.due_phrase(),
        badges
    )
}

/// Display the bills page.
pub fn display_bills(board: &BillsBoard<'_>, symbol: &str) {
    print_section("BILLS");

    let summary = &board.summary;
    println!("  Total due:        {:>12}", summary.total_due.format_with(symbol));
    println!("  Total paid:       {:>12}", summary.total_paid.format_with(symbol));
    println!("  Overdue:          {:>12}", summary.overdue);
    println!("  Due this week:    {:>12}", summary.due_soon);

    print_section_simple("BY CATEGORY");
    let max = summary
        .by_category
        .iter()
        .map(|g| g.amount())
        .max()
        .unwrap_or(0);
    for group in &summary.by_category {
        println!(
            "  {:<14} {} {:>12} ({} bills)",
            group.key.display_name(),
            make_bar(group.amount(), max, 15),
            crate::types::Cents::new(group.amount()).format_with(symbol),
            group.count
        );
    }

    for (title, rows) in [
        ("OVERDUE", &board.overdue),
        ("UPCOMING", &board.upcoming),
        ("PAID", &board.paid),
    ] {
        if rows.is_empty() && title == "PAID" {
            continue;
        }
        print_section_simple(title);
        if rows.is_empty() {
            print_empty("bills");
        }
        for row in rows {
            println!("{}", bill_line(row, symbol));
        }
    }
}

/// Display the chores page.
pub fn display_chores(board: &ChoresBoard<'_>) {
    print_section("CHORES");

    print_section_simple("FAMILY PROGRESS");
    if board.members.is_empty() {
        print_empty("chores");
    }
    for stats in &board.members {
        println!(
            "  {:<14} {} {:>3}/{:<3} {:>8}",
            truncate(&stats.member, 14),
            make_bar(
                i64::try_from(stats.completed).unwrap_or(i64::MAX),
                i64::try_from(stats.total).unwrap_or(i64::MAX),
                15
            ),
            stats.completed,
            stats.total,
            stats.points
        );
    }

    for (status, rows) in &board.groups {
        print_section_simple(&status.label().to_uppercase());
        for row in rows {
            let points = row
                .chore
                .points
                .map(|p| format!(" ({p})"))
                .unwrap_or_default();
            println!(
                "{} {:<24} {:<12} {:<10} {}{}",
                tone_marker(row.status.tone()),
                truncate(&row.chore.name, 24),
                truncate(&row.chore.assigned_to, 12),
                row.chore.frequency,
                row.status.due_phrase(),
                points
            );
        }
    }
}

/// Display a calendar period.
pub fn display_calendar(view: &CalendarView<'_>, zone: &Zone, today: NaiveDate) {
    print_section(&format!("CALENDAR - {}", view.period.label().to_uppercase()));

    for bucket in view.days.iter() {
        let marker = if bucket.date == today { "*" } else { " " };
        println!("\n{marker} {}", bucket.date.format("%a %b %-d"));
        if bucket.is_empty() {
            println!("    -");
        }
        for event in &bucket.records {
            let location = event
                .location
                .as_deref()
                .map(|l| format!(" @ {}", truncate(l, 20)))
                .unwrap_or_default();
            println!(
                "    {:<20} {}{}",
                time_label(event, zone),
                truncate(&event.title, 30),
                location
            );
        }
    }

    print_section_simple("UPCOMING");
    if view.sidebar.is_empty() {
        print_empty("events");
    }
    for event in &view.sidebar {
        println!(
            "  {:<12} {:<20} {}",
            day_label(zone.calendar_day(&event.start), today),
            time_label(event, zone),
            truncate(&event.title, 30)
        );
    }
}

/// Display the meal planner.
pub fn display_meals(week: &MealWeek<'_>, today: NaiveDate) {
    print_section(&format!("MEALS - {}", week.period.label().to_uppercase()));

    print_section_simple("TODAY");
    if week.today.is_empty() {
        print_empty("meals planned today");
    }
    for meal in &week.today {
        println!("  {:<10} {}", meal.meal_type.display_name(), meal.recipe);
    }

    for day in &week.days {
        let marker = if day.date == today { "*" } else { " " };
        let minutes = if day.total_minutes > 0 {
            format!(" ({} min)", day.total_minutes)
        } else {
            String::new()
        };
        println!("\n{marker} {}{minutes}", day.date.format("%a %b %-d"));
        for (slot, meals) in &day.slots {
            let names: Vec<&str> = meals.iter().map(|m| m.recipe.as_str()).collect();
            let text = if names.is_empty() {
                "-".to_string()
            } else {
                names.join(", ")
            };
            println!("    {:<10} {}", slot.display_name(), truncate(&text, 40));
        }
    }
}

/// Display the medical page.
pub fn display_medical(view: &MedicalOverview<'_>, zone: &Zone, today: NaiveDate) {
    print_section("MEDICAL");

    print_section_simple("UPCOMING APPOINTMENTS");
    if view.upcoming.is_empty() {
        print_empty("appointments");
    }
    for row in &view.upcoming {
        let appt = row.appointment;
        println!(
            "{} {:<12} {:<14} {:<20} {}",
            tone_marker(row.status.tone()),
            day_label(zone.calendar_day(&appt.date), today),
            truncate(&appt.patient_name, 14),
            truncate(&appt.provider, 20),
            appt.time.as_deref().unwrap_or("")
        );
    }

    print_section_simple("REFILLS DUE");
    if view.refills.is_empty() {
        print_empty("refills due");
    }
    for med in &view.refills {
        let when = med
            .next_refill_date
            .as_ref()
            .map(|ts| day_label(zone.calendar_day(ts), today))
            .unwrap_or_default();
        println!(
            "  {:<20} {:<12} {:<14} {}",
            truncate(&med.name, 20),
            truncate(&med.dosage, 12),
            truncate(&med.taken_by, 14),
            when
        );
    }

    print_section_simple("RECORDS");
    if view.records.is_empty() {
        print_empty("records");
    }
    for summary in &view.patients {
        println!(
            "  {} ({} records, {} need attention)",
            summary.key,
            summary.count,
            summary.completed()
        );
        for record in view.records.get(&summary.key).into_iter().flatten() {
            let marker = if record.needs_attention() { "!!" } else { "  " };
            println!(
                "  {marker} {}  {}",
                zone.calendar_day(&record.date),
                truncate(&record.title, 36)
            );
        }
    }
}

/// Display the shopping list.
pub fn display_shopping(list: &ShoppingList<'_>) {
    print_section(&format!(
        "SHOPPING - {} left, {} in cart",
        list.unchecked, list.checked
    ));

    if list.groups.is_empty() {
        print_empty("items");
    }
    for group in &list.groups {
        print_section_simple(group.category().display_name());
        for item in &group.items {
            let check = if item.checked { "[x]" } else { "[ ]" };
            println!(
                "  {check} {:<28} {}",
                truncate(&item.name, 28),
                item.quantity_label()
            );
        }
    }
}

fn display_family(family: &[FamilyMemberStatus]) {
    print_section_simple("FAMILY");
    if family.is_empty() {
        print_empty("family members");
    }
    for status in family {
        let place = if status.is_home() {
            "home".to_string()
        } else {
            status
                .presence
                .as_ref()
                .and_then(|p| p.current_zone.clone())
                .unwrap_or_else(|| "away".to_string())
        };
        let next = status
            .next_appointment
            .as_ref()
            .map(|a| format!("  next: {}", truncate(&a.purpose, 20)))
            .unwrap_or_default();
        println!(
            "  {:<12} {:<10} {:<10} {} chores, {} events{}",
            truncate(status.member.display_name(), 12),
            status.member.role_label(),
            truncate(&place, 10),
            status.pending_chores,
            status.upcoming_events,
            next
        );
    }
}

fn display_health(health: &SystemHealth) {
    print_section_simple("SYSTEM");
    println!(
        "  Status: {}  Uptime: {}h",
        health.status,
        health.uptime_hours()
    );
    for (name, module) in &health.modules {
        println!("    {:<16} {}", name, module.status);
    }
}

/// Display the dashboard home page.
pub fn display_dashboard(page: &Dashboard<'_>, symbol: &str) {
    print_section("HEARTH");

    let s = &page.summary;
    println!("  Bills due:        {:>12}", s.bills_due.format_with(symbol));
    println!("  Bills overdue:    {:>12}", s.bills_overdue);
    println!("  Due this week:    {:>12}", s.bills_due_soon);
    println!("  Open chores:      {:>12}", s.chores_open);
    println!("  Overdue chores:   {:>12}", s.chores_overdue);
    println!("  Events today:     {:>12}", s.events_today);
    println!("  Refills due:      {:>12}", s.refills_due);
    println!("  Shopping left:    {:>12}", s.shopping_left);
    println!("  Home / away:      {:>8} / {}", s.home, s.away);

    display_family(page.family);

    print_section_simple("UPCOMING");
    if page.upcoming.is_empty() {
        print_empty("upcoming events");
    }
    for row in &page.upcoming {
        println!(
            "  {:<12} {:<20} {}",
            row.day,
            row.time,
            truncate(&row.event.title, 30)
        );
    }

    display_health(page.health);
}

/// Display the live panels published by the poller.
pub fn display_snapshot(snapshot: &DashboardSnapshot, zone: &Zone, today: NaiveDate) {
    print_section("HEARTH - LIVE");
    if let Some(at) = snapshot.refreshed_at {
        println!(
            "  Refreshed {}",
            at.with_timezone(&zone.tz()).format("%-I:%M:%S %p")
        );
    }

    match &snapshot.family {
        Some(family) => display_family(family),
        None => println!("\nFAMILY\n  loading..."),
    }

    print_section_simple("UPCOMING");
    match &snapshot.upcoming {
        Some(events) if events.is_empty() => print_empty("upcoming events"),
        Some(events) => {
            for event in events {
                println!(
                    "  {:<12} {:<20} {}",
                    day_label(zone.calendar_day(&event.start), today),
                    time_label(event, zone),
                    truncate(&event.title, 30)
                );
            }
        }
        None => println!("  loading..."),
    }

    match &snapshot.health {
        Some(health) => display_health(health),
        None => println!("\nSYSTEM\n  loading..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("Electric & Gas Company", 10), "Electri...");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("Crème brûlée tart", 8), "Crème...");
    }

    #[test]
    fn test_truncate_small_max_len() {
        // max_len < 3 means no room for ellipsis
        assert_eq!(truncate("hello", 2), "he");
        assert_eq!(truncate("hello", 0), "");
    }

    #[test]
    fn test_make_bar() {
        assert_eq!(make_bar(100, 100, 10), "██████████");
        assert_eq!(make_bar(50, 100, 10), "█████░░░░░");
        assert_eq!(make_bar(50, 0, 10), "          ");
    }

    #[test]
    fn test_tone_markers_are_two_wide() {
        for tone in [
            Tone::Danger,
            Tone::Warning,
            Tone::Success,
            Tone::Muted,
            Tone::Neutral,
        ] {
            assert_eq!(tone_marker(tone).chars().count(), 2);
        }
    }
}
