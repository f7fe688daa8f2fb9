//! Shared extraction helpers for loosely-typed FHIR documents
//!
//! The upstream service has shipped several historical encodings for the
//! same logical field. Each known encoding is modeled as a small extractor
//! function returning `Option`; callers chain extractors in a fixed order
//! and take the first present value. Missing or malformed input never
//! raises - extractors simply return `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;

/// Try an ordered list of extractors against a document; first `Some` wins.
pub fn first_some<T>(resource: &Value, extractors: &[fn(&Value) -> Option<T>]) -> Option<T> {
    extractors.iter().find_map(|extract| extract(resource))
}

/// Resource `id`, falling back to the first `identifier[].value`, and as a
/// last resort a synthetic `unknown-<timestamp>` id (degraded path).
pub fn resource_id(resource: &Value) -> String {
    if let Some(id) = resource
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
    {
        return id.to_string();
    }

    if let Some(value) = resource
        .get("identifier")
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(|ident| ident.get("value"))
        .and_then(Value::as_str)
    {
        return value.to_string();
    }

    let fallback = format!("unknown-{}", Utc::now().timestamp_millis());
    tracing::warn!(
        resource_type = resource
            .get("resourceType")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("?"),
        synthetic_id = %fallback,
        "Resource has no id or identifier, synthesizing one"
    );
    fallback
}

/// Display name from a `name` array
///
/// Prefers an entry tagged `use == "usual"` or `"official"`, else the
/// first entry. Given name parts are concatenated before the family name.
/// Returns `None` when no usable name data exists.
pub fn display_name(resource: &Value) -> Option<String> {
    let names = resource.get("name").and_then(Value::as_array)?;

    let entry = names
        .iter()
        .find(|n| {
            matches!(
                n.get("use").and_then(Value::as_str),
                Some("usual") | Some("official")
            )
        })
        .or_else(|| names.first())?;

    let mut parts: Vec<String> = Vec::new();
    if let Some(given) = entry.get("given").and_then(Value::as_array) {
        for part in given {
            if let Some(s) = part.as_str() {
                parts.push(s.to_string());
            }
        }
    }
    if let Some(family) = entry.get("family").and_then(Value::as_str) {
        parts.push(family.to_string());
    }

    if parts.is_empty() {
        // Some payloads carry a pre-rendered text field instead
        return entry
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string);
    }

    Some(parts.join(" "))
}

/// Contact point from a `telecom` array, matched on `system`
///
/// Prefers `use == "mobile"`, then `"work"`, then `"home"`, else the
/// first entry with the requested system.
pub fn telecom_value(resource: &Value, system: &str) -> Option<String> {
    let telecom = resource.get("telecom").and_then(Value::as_array)?;

    let matching: Vec<&Value> = telecom
        .iter()
        .filter(|t| t.get("system").and_then(Value::as_str) == Some(system))
        .collect();

    for preferred_use in ["mobile", "work", "home"] {
        if let Some(entry) = matching
            .iter()
            .find(|t| t.get("use").and_then(Value::as_str) == Some(preferred_use))
        {
            if let Some(value) = entry.get("value").and_then(Value::as_str) {
                return Some(value.to_string());
            }
        }
    }

    matching
        .first()
        .and_then(|t| t.get("value"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Find an extension entry whose `url` ends with the given suffix
pub fn find_extension<'a>(container: &'a Value, url_suffix: &str) -> Option<&'a Value> {
    container
        .get("extension")
        .and_then(Value::as_array)?
        .iter()
        .find(|ext| {
            ext.get("url")
                .and_then(Value::as_str)
                .is_some_and(|url| url.ends_with(url_suffix))
        })
}

/// String payload of an extension (`valueString`)
pub fn extension_string(container: &Value, url_suffix: &str) -> Option<String> {
    find_extension(container, url_suffix)?
        .get("valueString")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Reference payload of an extension (`valueReference.reference` or a bare
/// `valueString`)
pub fn extension_reference(extension: &Value) -> Option<String> {
    if let Some(reference) = extension
        .get("valueReference")
        .and_then(|r| r.get("reference"))
        .and_then(Value::as_str)
    {
        return Some(reference.to_string());
    }
    extension
        .get("valueString")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Strip a `ResourceType/` prefix from a reference string, if present
pub fn reference_id(reference: &str, resource_type: &str) -> String {
    reference
        .strip_prefix(&format!("{resource_type}/"))
        .unwrap_or(reference)
        .to_string()
}

/// Parse a timestamp in the formats the upstream has been observed to emit
///
/// RFC 3339 with offset, naive datetime (seconds optional), or a bare date
/// (midnight UTC).
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    None
}

/// Combine a date string and a time-of-day string into one timestamp
pub fn combine_date_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_some_order() {
        let doc = json!({"a": "1", "b": "2"});
        let got = first_some(
            &doc,
            &[
                |v: &Value| v.get("missing").and_then(Value::as_str).map(str::to_string),
                |v: &Value| v.get("b").and_then(Value::as_str).map(str::to_string),
                |v: &Value| v.get("a").and_then(Value::as_str).map(str::to_string),
            ],
        );
        assert_eq!(got, Some("2".to_string()));
    }

    #[test]
    fn test_resource_id_prefers_id_field() {
        let doc = json!({"id": "abc", "identifier": [{"value": "def"}]});
        assert_eq!(resource_id(&doc), "abc");
    }

    #[test]
    fn test_resource_id_identifier_fallback() {
        let doc = json!({"identifier": [{"value": "def"}]});
        assert_eq!(resource_id(&doc), "def");
    }

    #[test]
    fn test_resource_id_synthetic_fallback() {
        let doc = json!({"resourceType": "Patient"});
        assert!(resource_id(&doc).starts_with("unknown-"));
    }

    #[test]
    fn test_display_name_prefers_official() {
        let doc = json!({"name": [
            {"use": "nickname", "given": ["Bobby"], "family": "T"},
            {"use": "official", "given": ["Robert", "James"], "family": "Tables"}
        ]});
        assert_eq!(display_name(&doc), Some("Robert James Tables".to_string()));
    }

    #[test]
    fn test_display_name_first_entry_fallback() {
        let doc = json!({"name": [{"given": ["Ann"], "family": "Berg"}]});
        assert_eq!(display_name(&doc), Some("Ann Berg".to_string()));
    }

    #[test]
    fn test_display_name_text_fallback() {
        let doc = json!({"name": [{"text": "Ann Berg"}]});
        assert_eq!(display_name(&doc), Some("Ann Berg".to_string()));
    }

    #[test]
    fn test_display_name_none_when_absent() {
        assert_eq!(display_name(&json!({})), None);
        assert_eq!(display_name(&json!({"name": []})), None);
    }

    #[test]
    fn test_telecom_prefers_mobile_then_work_then_home() {
        let doc = json!({"telecom": [
            {"system": "phone", "use": "home", "value": "home-nr"},
            {"system": "phone", "use": "work", "value": "work-nr"},
            {"system": "phone", "use": "mobile", "value": "mobile-nr"},
            {"system": "email", "value": "a@b.c"}
        ]});
        assert_eq!(telecom_value(&doc, "phone"), Some("mobile-nr".to_string()));
        assert_eq!(telecom_value(&doc, "email"), Some("a@b.c".to_string()));
    }

    #[test]
    fn test_telecom_first_match_fallback() {
        let doc = json!({"telecom": [
            {"system": "phone", "use": "old", "value": "some-nr"}
        ]});
        assert_eq!(telecom_value(&doc, "phone"), Some("some-nr".to_string()));
        assert_eq!(telecom_value(&doc, "email"), None);
    }

    #[test]
    fn test_find_extension_by_url_suffix() {
        let doc = json!({"extension": [
            {"url": "https://hchb.example.com/fhir/StructureDefinition/diagnosis", "valueString": "CHF"}
        ]});
        let ext = find_extension(&doc, "diagnosis").unwrap();
        assert_eq!(ext["valueString"], "CHF");
        assert!(find_extension(&doc, "diet").is_none());
    }

    #[test]
    fn test_reference_id_strips_prefix() {
        assert_eq!(reference_id("Patient/p-1", "Patient"), "p-1");
        assert_eq!(reference_id("p-1", "Patient"), "p-1");
        assert_eq!(reference_id("Practitioner/n-1", "Patient"), "Practitioner/n-1");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-10T09:00:00Z").is_some());
        assert!(parse_timestamp("2024-01-10T09:00:00+01:00").is_some());
        assert!(parse_timestamp("2024-01-10T09:00:00").is_some());
        assert!(parse_timestamp("2024-01-10T09:00").is_some());
        assert!(parse_timestamp("2024-01-10").is_some());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_combine_date_time() {
        let ts = combine_date_time("2024-01-10", "09:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-10T09:30:00+00:00");
        assert!(combine_date_time("2024-01-10", "late morning").is_none());
    }
}
