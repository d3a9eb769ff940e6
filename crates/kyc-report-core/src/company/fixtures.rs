//! Demo data used when the upstream service cannot be reached. The data lives
//! in `fixtures/*.json` and is embedded at compile time.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::records::{CompanyInfo, CompanyListItem};

const COMPANIES_JSON: &str = include_str!("../../fixtures/companies.json");
const INVESTIGATIONS_JSON: &str = include_str!("../../fixtures/investigations.json");

#[derive(Debug, Default, Deserialize)]
struct CompanyFixtures {
    #[serde(default)]
    companies: Vec<CompanyInfo>,
    #[serde(default)]
    tickets: Vec<CompanyListItem>,
}

fn load_companies() -> CompanyFixtures {
    serde_json::from_str(COMPANIES_JSON).unwrap_or_else(|e| {
        warn!(error = %e, "embedded company fixtures unreadable");
        CompanyFixtures::default()
    })
}

fn load_investigations() -> Map<String, Value> {
    match serde_json::from_str::<Value>(INVESTIGATIONS_JSON) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            warn!(error = %e, "embedded investigation fixtures unreadable");
            Map::new()
        }
    }
}

/// Fixture record for a known KvK number.
pub fn fixture_company(kvk_number: &str) -> Option<CompanyInfo> {
    let kvk = kvk_number.trim();
    load_companies()
        .companies
        .into_iter()
        .find(|c| c.kvk_number == kvk)
}

/// Ticket list shown when the upstream `/companies` call fails.
pub fn fixture_tickets() -> Vec<CompanyListItem> {
    load_companies().tickets
}

/// Canned investigation payload keyed by exact legal name.
pub fn fixture_investigation(company_name: &str) -> Option<Value> {
    load_investigations().remove(company_name)
}

/// Generic record for a KvK number nobody knows anything about.
pub fn placeholder_company(kvk_number: &str) -> CompanyInfo {
    CompanyInfo {
        legal_name: "Sample Company B.V.".to_string(),
        address: "Business Street 1, 1000 AB Amsterdam".to_string(),
        kvk_number: kvk_number.trim().to_string(),
        legal_form: "Besloten Vennootschap (B.V.)".to_string(),
        founding_date: "01-01-2020".to_string(),
        status: "Active".to_string(),
        sbi_code: "70221".to_string(),
        sbi_description: "Business and other management consultancy activities".to_string(),
        directors: vec!["John Doe".to_string(), "Jane Smith".to_string()],
        description: None,
    }
}

/// Fixture record when one exists, placeholder otherwise.
pub fn fixture_or_placeholder(kvk_number: &str) -> CompanyInfo {
    fixture_company(kvk_number).unwrap_or_else(|| placeholder_company(kvk_number))
}
