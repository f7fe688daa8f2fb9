//! Practitioner resource transformer

use crate::core::transform::extract;
use crate::domain::{Nurse, NurseId, DEFAULT_QUALIFICATION};
use serde_json::Value;

/// Transform a FHIR Practitioner resource into a flat [`Nurse`] record
///
/// Total function: malformed or missing fields degrade to defaults, never
/// to an error.
pub fn transform_practitioner(resource: &Value) -> Nurse {
    let id = NurseId::new(extract::resource_id(resource)).unwrap_or_else(|_| NurseId::synthetic());

    let name = extract::display_name(resource).unwrap_or_else(|| "Unknown".to_string());
    let qualification = first_qualification(resource);

    Nurse {
        id,
        name,
        title: qualification
            .clone()
            .unwrap_or_else(|| DEFAULT_QUALIFICATION.to_string()),
        specialty: qualification.unwrap_or_else(|| DEFAULT_QUALIFICATION.to_string()),
        phone: extract::telecom_value(resource, "phone"),
        email: extract::telecom_value(resource, "email"),
    }
}

/// First `qualification[].code.text` entry, if present
fn first_qualification(resource: &Value) -> Option<String> {
    resource
        .get("qualification")
        .and_then(Value::as_array)?
        .iter()
        .find_map(|q| q.get("code").and_then(|c| c.get("text")).and_then(Value::as_str))
        .map(str::to_string)
}
