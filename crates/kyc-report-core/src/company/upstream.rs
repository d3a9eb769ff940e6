//! Mapping of upstream company payloads onto [`CompanyInfo`] and
//! [`CompanyListItem`]. Every field has a default; nothing here fails.

use chrono::NaiveDate;
use serde_json::Value;

use super::records::{CompanyInfo, CompanyListItem};
use crate::investigation::fields;

const UBO_NAME_FIELDS: &[&str] = &["UBO name 1", "UBO name 2", "UBO name 3"];
const NO_DIRECTORS: &str = "No directors information available";

/// Rows of a `/companies` response (`{ companies: [...], total_count }`).
/// `today` fills in rows without a founding date.
pub fn company_list_from_value(value: &Value, today: NaiveDate) -> Vec<CompanyListItem> {
    let rows = match value.get("companies") {
        Some(Value::Array(rows)) => rows.as_slice(),
        _ => return Vec::new(),
    };

    rows.iter()
        .filter(|row| row.is_object())
        .map(|row| CompanyListItem {
            kvk_number: fields::scalar_text(row.get("kvk_number"))
                .unwrap_or_else(|| "Unknown".to_string()),
            company_name: fields::text(row.get("legal_entity_name"))
                .or_else(|| fields::text(row.get("legal_name")))
                .unwrap_or_else(|| "Unknown Company".to_string()),
            date: fields::text(row.get("founding_date"))
                .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
            category: "KYC".to_string(),
            urgency: fields::text(row.get("priority"))
                .or_else(|| fields::text(row.get("urgency")))
                .unwrap_or_else(|| "Medium".to_string()),
            status: fields::text(row.get("status")).unwrap_or_else(|| "New".to_string()),
            actions: "Investigation Required".to_string(),
        })
        .collect()
}

/// A `/companyDetails/` response. The company body sits under
/// `company_data` or at the top level; directors come from `ubo_data`.
pub fn company_info_from_value(value: &Value, requested_kvk: &str) -> CompanyInfo {
    let data = value.get("company_data").filter(|d| d.is_object()).unwrap_or(value);
    let defaults = CompanyInfo::default();

    let directors: Vec<String> = match value.get("ubo_data") {
        Some(Value::Array(ubos)) => ubos
            .iter()
            .filter_map(|ubo| {
                UBO_NAME_FIELDS
                    .iter()
                    .find_map(|k| fields::text(ubo.get(*k)))
            })
            .collect(),
        _ => Vec::new(),
    };

    CompanyInfo {
        legal_name: fields::text(data.get("legal_entity_name")).unwrap_or(defaults.legal_name),
        address: fields::text(data.get("registered_address")).unwrap_or(defaults.address),
        kvk_number: fields::scalar_text(data.get("kvk_number"))
            .unwrap_or_else(|| requested_kvk.trim().to_string()),
        legal_form: fields::text(data.get("legal_form")).unwrap_or(defaults.legal_form),
        founding_date: fields::text(data.get("founding_date")).unwrap_or(defaults.founding_date),
        status: fields::text(data.get("status")).unwrap_or(defaults.status),
        sbi_code: fields::scalar_text(data.get("sbi_code")).unwrap_or(defaults.sbi_code),
        sbi_description: fields::text(data.get("sbi_description"))
            .unwrap_or(defaults.sbi_description),
        directors: if directors.is_empty() {
            vec![NO_DIRECTORS.to_string()]
        } else {
            directors
        },
        description: fields::text(data.get("description"))
            .or_else(|| fields::text(data.get("company_description"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
    }

    #[test]
    fn test_company_list_mapping() {
        let v = json!({
            "companies": [
                {"kvk_number": 12345678, "legal_entity_name": "Acme B.V.", "founding_date": "2018-03-15", "priority": "High"},
                {"legal_name": "Beta", "urgency": "Low", "status": "In Progress"},
                "garbage"
            ],
            "total_count": 3
        });
        let rows = company_list_from_value(&v, today());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            CompanyListItem {
                kvk_number: "12345678".into(),
                company_name: "Acme B.V.".into(),
                date: "2018-03-15".into(),
                category: "KYC".into(),
                urgency: "High".into(),
                status: "New".into(),
                actions: "Investigation Required".into(),
            }
        );
        assert_eq!(rows[1].kvk_number, "Unknown");
        assert_eq!(rows[1].company_name, "Beta");
        assert_eq!(rows[1].date, "2024-01-20");
        assert_eq!(rows[1].urgency, "Low");
        assert_eq!(rows[1].status, "In Progress");
    }

    #[test]
    fn test_company_list_wrong_shape() {
        assert!(company_list_from_value(&json!({"companies": {}}), today()).is_empty());
        assert!(company_list_from_value(&json!([]), today()).is_empty());
    }

    #[test]
    fn test_company_details_nested() {
        let v = json!({
            "company_data": {
                "legal_entity_name": "Acme B.V.",
                "registered_address": "Herengracht 1, 1015 BG Amsterdam",
                "kvk_number": 12345678,
                "legal_form": "B.V.",
                "sbi_code": 62010
            },
            "ubo_data": [
                {"UBO name 1": "A. Jansen"},
                {"UBO name 2": "B. de Boer"},
                {"UBO name 3": ""}
            ]
        });
        let info = company_info_from_value(&v, "12345678");
        assert_eq!(info.legal_name, "Acme B.V.");
        assert_eq!(info.kvk_number, "12345678");
        assert_eq!(info.sbi_code, "62010");
        assert_eq!(info.sbi_description, "Unknown");
        assert_eq!(info.status, "Active");
        assert_eq!(info.directors, vec!["A. Jansen", "B. de Boer"]);
    }

    #[test]
    fn test_company_details_top_level_without_ubos() {
        let v = json!({"legal_entity_name": "Solo", "description": "One-person bakery"});
        let info = company_info_from_value(&v, " 23456789 ");
        assert_eq!(info.legal_name, "Solo");
        assert_eq!(info.kvk_number, "23456789");
        assert_eq!(info.directors, vec![NO_DIRECTORS]);
        assert_eq!(info.description.as_deref(), Some("One-person bakery"));
    }

    #[test]
    fn test_company_details_error_payload() {
        let info = company_info_from_value(&json!({"detail": "not found"}), "11223344");
        assert_eq!(info.legal_name, "Unknown Company");
        assert_eq!(info.address, "Address not available");
        assert_eq!(info.kvk_number, "11223344");
    }
}
