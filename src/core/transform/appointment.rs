//! Appointment resource transformer
//!
//! Appointments carry the most historical baggage upstream: the schedule
//! period and the patient reference each have several known encodings.
//! Both are resolved through ordered extractor chains (see
//! [`crate::core::transform::extract::first_some`]); the first encoding
//! that yields a value wins.

use crate::core::transform::extract;
use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, NurseId, PatientId, DEFAULT_CARE_SERVICE,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Resolved schedule period: start plus an optional end
type Period = (DateTime<Utc>, Option<DateTime<Utc>>);

/// Transform a FHIR Appointment resource into a flat [`Appointment`] record
///
/// Total function: malformed or missing fields degrade to defaults, never
/// to an error. `end_time` is always populated - it is coerced to
/// `start_time` when the source carries no end, and to start + 1 hour when
/// even the start had to be taken from the `created` timestamp.
pub fn transform_appointment(resource: &Value) -> Appointment {
    let id = AppointmentId::new(extract::resource_id(resource))
        .unwrap_or_else(|_| AppointmentId::synthetic());

    let (start_time, end_time) = resolve_period(resource);

    Appointment {
        id,
        patient_id: resolve_patient_reference(resource)
            .and_then(|reference| PatientId::new(reference).ok()),
        nurse_id: resolve_nurse_reference(resource)
            .and_then(|reference| NurseId::new(reference).ok()),
        start_time,
        end_time,
        status: AppointmentStatus::from_fhir(resource.get("status").and_then(Value::as_str)),
        notes: resource
            .get("comment")
            .or_else(|| resource.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string),
        care_services: collect_care_services(resource),
    }
}

/// Resolve start/end through the fixed fallback chain
///
/// Order: custom appointment-date-time extension, `requestedPeriod[0]`,
/// standard `start`/`end`, then `created` with a synthesized one-hour end.
/// An absent end falls back to the start.
fn resolve_period(resource: &Value) -> (DateTime<Utc>, DateTime<Utc>) {
    let period = extract::first_some(
        resource,
        &[
            period_from_date_time_extension,
            period_from_requested_period,
            period_from_standard_fields,
            period_from_created,
        ],
    );

    match period {
        Some((start, Some(end))) => (start, end),
        Some((start, None)) => (start, start),
        None => {
            // Degraded path: nothing usable at all, pin both ends to now
            let now = Utc::now();
            tracing::warn!(
                appointment_id = resource.get("id").and_then(serde_json::Value::as_str).unwrap_or("?"),
                "Appointment has no usable schedule data"
            );
            (now, now)
        }
    }
}

/// Encoding 1: nested `appointment-date-time` extension with separate
/// date and time-of-day sub-extensions
fn period_from_date_time_extension(resource: &Value) -> Option<Period> {
    let ext = extract::find_extension(resource, "appointment-date-time")?;
    let date = extract::extension_string(ext, "date")?;
    let time = extract::extension_string(ext, "time")?;
    let start = extract::combine_date_time(&date, &time)?;
    Some((start, None))
}

/// Encoding 2: `requestedPeriod[0]` start/end
fn period_from_requested_period(resource: &Value) -> Option<Period> {
    let period = resource
        .get("requestedPeriod")
        .and_then(Value::as_array)?
        .first()?;
    let start = period
        .get("start")
        .and_then(Value::as_str)
        .and_then(extract::parse_timestamp)?;
    let end = period
        .get("end")
        .and_then(Value::as_str)
        .and_then(extract::parse_timestamp);
    Some((start, end))
}

/// Encoding 3: standard `start`/`end` fields
fn period_from_standard_fields(resource: &Value) -> Option<Period> {
    let start = resource
        .get("start")
        .and_then(Value::as_str)
        .and_then(extract::parse_timestamp)?;
    let end = resource
        .get("end")
        .and_then(Value::as_str)
        .and_then(extract::parse_timestamp);
    Some((start, end))
}

/// Encoding 4: `created` timestamp, end synthesized as start + 1 hour
fn period_from_created(resource: &Value) -> Option<Period> {
    let start = resource
        .get("created")
        .and_then(Value::as_str)
        .and_then(extract::parse_timestamp)?;
    Some((start, Some(start + Duration::hours(1))))
}

/// Resolve the patient reference through the fixed fallback chain
fn resolve_patient_reference(resource: &Value) -> Option<String> {
    extract::first_some(
        resource,
        &[
            patient_from_subject_extension,
            patient_from_supporting_information,
            patient_from_subject_field,
        ],
    )
    .map(|reference| extract::reference_id(&reference, "Patient"))
}

/// Encoding 1: dedicated `subject` extension
fn patient_from_subject_extension(resource: &Value) -> Option<String> {
    let ext = extract::find_extension(resource, "subject")?;
    extract::extension_reference(ext)
}

/// Encoding 2: `supporting-information` extension holding a
/// `PatientReference` sub-extension
fn patient_from_supporting_information(resource: &Value) -> Option<String> {
    let ext = extract::find_extension(resource, "supporting-information")?;
    let inner = extract::find_extension(ext, "PatientReference")?;
    extract::extension_reference(inner)
}

/// Encoding 3: standard `subject.reference` field
fn patient_from_subject_field(resource: &Value) -> Option<String> {
    resource
        .get("subject")
        .and_then(|s| s.get("reference"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// First participant whose actor reference is a Practitioner
fn resolve_nurse_reference(resource: &Value) -> Option<String> {
    resource
        .get("participant")
        .and_then(Value::as_array)?
        .iter()
        .find_map(|p| {
            p.get("actor")
                .and_then(|a| a.get("reference"))
                .and_then(Value::as_str)
                .filter(|reference| reference.starts_with("Practitioner/"))
        })
        .map(|reference| extract::reference_id(reference, "Practitioner"))
}

/// Care-service display strings; never empty
///
/// Reads `serviceType[].coding[0].display` (or `.code`, or `.text`),
/// falls back to the same extraction on `appointmentType`, and finally to
/// the literal `"General Care"`.
fn collect_care_services(resource: &Value) -> Vec<String> {
    let mut services = codeable_concept_displays(resource.get("serviceType"));

    if services.is_empty() {
        services = codeable_concept_displays(resource.get("appointmentType"));
    }
    if services.is_empty() {
        services.push(DEFAULT_CARE_SERVICE.to_string());
    }
    services
}

/// Display values from a CodeableConcept or a list of them
fn codeable_concept_displays(value: Option<&Value>) -> Vec<String> {
    let concepts: Vec<&Value> = match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => return Vec::new(),
    };

    concepts
        .into_iter()
        .filter_map(|concept| {
            concept
                .get("coding")
                .and_then(Value::as_array)
                .and_then(|codings| codings.first())
                .and_then(|coding| {
                    coding
                        .get("display")
                        .or_else(|| coding.get("code"))
                        .and_then(Value::as_str)
                })
                .or_else(|| concept.get("text").and_then(Value::as_str))
                .map(str::to_string)
        })
        .collect()
}
