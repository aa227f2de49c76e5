//! Medical page: appointments, refills and records.

use std::collections::BTreeMap;

use crate::aggregate::{aggregate, order_by_priority, GroupSummary, Reducers};
use crate::models::{Appointment, MedicalRecord, Medication};
use crate::status::{Classification, RawStatus, UrgencyThreshold};

use super::{same_member, ViewContext};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppointmentRow<'a> {
    pub appointment: &'a Appointment,
    pub status: Classification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalOverview<'a> {
    /// Appointments with status `upcoming`, soonest first
    pub upcoming: Vec<AppointmentRow<'a>>,
    /// Medications whose refill falls within the window, soonest first
    pub refills: Vec<&'a Medication>,
    /// Records per patient, newest first
    pub records: BTreeMap<String, Vec<&'a MedicalRecord>>,
    /// Record counts per patient; `completed` counts results needing attention
    pub patients: Vec<GroupSummary<String>>,
    /// Abnormal or critical results
    pub attention: usize,
}

/// Build the medical page, optionally narrowed to one patient.
#[must_use]
pub fn overview<'a>(
    appointments: &'a [Appointment],
    medications: &'a [Medication],
    records: &'a [MedicalRecord],
    member: Option<&str>,
    ctx: &ViewContext,
    threshold: UrgencyThreshold,
    refill_window_days: i64,
) -> MedicalOverview<'a> {
    let wanted = |name: &str| member.map_or(true, |m| same_member(m, name));

    let mut upcoming: Vec<AppointmentRow<'a>> = appointments
        .iter()
        .filter(|a| a.status == RawStatus::Upcoming && wanted(&a.patient_name))
        .map(|appointment| AppointmentRow {
            appointment,
            status: appointment.classify(ctx.today, &ctx.zone, threshold),
        })
        .collect();
    upcoming.sort_by_key(|r| ctx.zone.instant(&r.appointment.date));

    let mut refills: Vec<&'a Medication> = medications
        .iter()
        .filter(|m| wanted(&m.taken_by))
        .filter(|m| m.needs_refill(ctx.today, &ctx.zone, refill_window_days))
        .collect();
    refills.sort_by_key(|m| m.days_until_refill(ctx.today, &ctx.zone));

    let visible: Vec<&'a MedicalRecord> =
        records.iter().filter(|r| wanted(&r.patient_name)).collect();

    let mut by_patient: BTreeMap<String, Vec<&'a MedicalRecord>> = BTreeMap::new();
    for &record in &visible {
        by_patient
            .entry(record.patient_name.clone())
            .or_default()
            .push(record);
    }
    for list in by_patient.values_mut() {
        list.sort_by_key(|r| std::cmp::Reverse(ctx.zone.instant(&r.date)));
    }

    let patients = order_by_priority(
        aggregate(
            visible.iter().copied(),
            |r| r.patient_name.clone(),
            &Reducers::count().completed(MedicalRecord::needs_attention),
        ),
        &[],
    );

    MedicalOverview {
        upcoming,
        refills,
        attention: patients.iter().map(GroupSummary::completed).sum(),
        records: by_patient,
        patients,
    }
}
