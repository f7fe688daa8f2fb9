//! Patient resource transformer

use crate::core::transform::extract;
use crate::domain::{Patient, PatientId};
use serde_json::Value;

/// Transform a FHIR Patient resource into a flat [`Patient`] record
///
/// Total function: malformed or missing fields degrade to defaults, never
/// to an error. Care needs are accumulated in source order from the
/// recognized extensions; an empty list is valid.
pub fn transform_patient(resource: &Value) -> Patient {
    let id =
        PatientId::new(extract::resource_id(resource)).unwrap_or_else(|_| PatientId::synthetic());

    Patient {
        id,
        name: extract::display_name(resource).unwrap_or_else(|| "Unknown".to_string()),
        phone: extract::telecom_value(resource, "phone"),
        email: extract::telecom_value(resource, "email"),
        care_needs: collect_care_needs(resource),
        medical_notes: extract::extension_string(resource, "information"),
    }
}

/// Accumulate care-need strings from the recognized extension URLs
///
/// `diagnosis` values pass through as-is, `serviceCode` values get a
/// `"Service: "` prefix and `diet` values a `"Diet: "` prefix. Extensions
/// that are absent contribute nothing.
fn collect_care_needs(resource: &Value) -> Vec<String> {
    let Some(extensions) = resource.get("extension").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut needs = Vec::new();
    for ext in extensions {
        let Some(url) = ext.get("url").and_then(Value::as_str) else {
            continue;
        };
        let Some(value) = ext.get("valueString").and_then(Value::as_str) else {
            continue;
        };

        if url.ends_with("diagnosis") {
            needs.push(value.to_string());
        } else if url.ends_with("serviceCode") {
            needs.push(format!("Service: {value}"));
        } else if url.ends_with("diet") {
            needs.push(format!("Diet: {value}"));
        }
    }
    needs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EXT_BASE: &str = "https://hchb.example.com/fhir/StructureDefinition";

    #[test]
    fn test_full_patient() {
        let resource = json!({
            "resourceType": "Patient",
            "id": "patient-1",
            "name": [{"given": ["Karl", "Oskar"], "family": "Nilsson"}],
            "telecom": [{"system": "phone", "use": "home", "value": "555-0202"}],
            "extension": [
                {"url": format!("{EXT_BASE}/diagnosis"), "valueString": "COPD"},
                {"url": format!("{EXT_BASE}/serviceCode"), "valueString": "SN11"},
                {"url": format!("{EXT_BASE}/diet"), "valueString": "Low sodium"},
                {"url": format!("{EXT_BASE}/information"), "valueString": "Lives alone"}
            ]
        });

        let patient = transform_patient(&resource);
        assert_eq!(patient.id.as_str(), "patient-1");
        assert_eq!(patient.name, "Karl Oskar Nilsson");
        assert_eq!(patient.phone.as_deref(), Some("555-0202"));
        assert_eq!(
            patient.care_needs,
            vec!["COPD", "Service: SN11", "Diet: Low sodium"]
        );
        assert_eq!(patient.medical_notes.as_deref(), Some("Lives alone"));
    }

    #[test]
    fn test_minimal_patient_gets_defaults() {
        let resource = json!({"resourceType": "Patient", "id": "patient-2"});

        let patient = transform_patient(&resource);
        assert_eq!(patient.name, "Unknown");
        assert!(patient.phone.is_none());
        assert!(patient.email.is_none());
        assert!(patient.care_needs.is_empty());
        assert!(patient.medical_notes.is_none());
    }

    #[test]
    fn test_unrecognized_extensions_contribute_nothing() {
        let resource = json!({
            "id": "patient-3",
            "extension": [
                {"url": format!("{EXT_BASE}/somethingElse"), "valueString": "ignored"},
                {"url": format!("{EXT_BASE}/diagnosis"), "valueString": "CHF"}
            ]
        });
        let patient = transform_patient(&resource);
        assert_eq!(patient.care_needs, vec!["CHF"]);
    }

    #[test]
    fn test_extension_without_value_is_skipped() {
        let resource = json!({
            "id": "patient-4",
            "extension": [{"url": format!("{EXT_BASE}/diagnosis")}]
        });
        let patient = transform_patient(&resource);
        assert!(patient.care_needs.is_empty());
    }
}
