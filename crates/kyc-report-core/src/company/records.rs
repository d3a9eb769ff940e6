use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::KycReportError;
use crate::KycReportResult;

/// Registered business as described by the Chamber of Commerce extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub legal_name: String,
    pub address: String,
    pub kvk_number: String,
    pub legal_form: String,
    pub founding_date: String,
    pub status: String,
    pub sbi_code: String,
    pub sbi_description: String,
    pub directors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        CompanyInfo {
            legal_name: "Unknown Company".to_string(),
            address: "Address not available".to_string(),
            kvk_number: String::new(),
            legal_form: "Unknown".to_string(),
            founding_date: "Unknown".to_string(),
            status: "Active".to_string(),
            sbi_code: "Unknown".to_string(),
            sbi_description: "Unknown".to_string(),
            directors: Vec::new(),
            description: None,
        }
    }
}

impl CompanyInfo {
    /// True when the field carries a real value rather than a default marker.
    pub(crate) fn known(value: &str) -> bool {
        let v = value.trim();
        !v.is_empty() && !v.eq_ignore_ascii_case("unknown") && v != "Address not available"
    }

    /// City part of a Dutch address (`Street 1, 1015 BG Amsterdam`).
    pub fn city(&self) -> Option<&str> {
        if !Self::known(&self.address) {
            return None;
        }
        let tail = self.address.rsplit(',').next()?.trim();
        let words: Vec<&str> = tail.split_whitespace().collect();
        // Postcode is four digits and two letters ahead of the city name.
        let skip = match words.as_slice() {
            [digits, letters, ..]
                if digits.len() == 4
                    && digits.chars().all(|c| c.is_ascii_digit())
                    && letters.len() == 2
                    && letters.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                2
            }
            _ => 0,
        };
        let start = words.get(skip)?;
        let offset = tail.find(*start)?;
        let city = tail[offset..].trim();
        (!city.is_empty()).then_some(city)
    }
}

/// Dashboard ticket row for a company awaiting investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyListItem {
    pub kvk_number: String,
    pub company_name: String,
    pub date: String,
    pub category: String,
    pub urgency: String,
    pub status: String,
    pub actions: String,
}

/// Eight-digit Chamber of Commerce registration number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KvkNumber(String);

impl KvkNumber {
    pub fn parse(input: &str) -> KycReportResult<Self> {
        let trimmed = input.trim();
        if trimmed.len() != 8 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(KycReportError::InvalidInput {
                field: "kvk_number".to_string(),
                reason: format!("'{}' is not an 8-digit KvK number", trimmed),
            });
        }
        Ok(KvkNumber(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KvkNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for KvkNumber {
    type Error = KycReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        KvkNumber::parse(&value)
    }
}

impl From<KvkNumber> for String {
    fn from(value: KvkNumber) -> Self {
        value.0
    }
}

impl std::str::FromStr for KvkNumber {
    type Err = KycReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KvkNumber::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kvk_number_validation() {
        assert_eq!(KvkNumber::parse(" 12345678 ").unwrap().as_str(), "12345678");
        assert!(KvkNumber::parse("1234567").is_err());
        assert!(KvkNumber::parse("1234567a").is_err());
        assert!(KvkNumber::parse("").is_err());
        let err = KvkNumber::parse("abc").unwrap_err();
        assert!(err.to_string().contains("kvk_number"));
    }

    #[test]
    fn test_kvk_number_serde() {
        let k: KvkNumber = serde_json::from_str("\"01234567\"").unwrap();
        assert_eq!(serde_json::to_string(&k).unwrap(), "\"01234567\"");
        assert!(serde_json::from_str::<KvkNumber>("\"12\"").is_err());
    }

    #[test]
    fn test_company_info_partial_json() {
        let info: CompanyInfo =
            serde_json::from_str(r#"{"legal_name": "Acme B.V.", "kvk_number": "12345678"}"#)
                .unwrap();
        assert_eq!(info.legal_name, "Acme B.V.");
        assert_eq!(info.legal_form, "Unknown");
        assert!(info.directors.is_empty());
    }

    #[test]
    fn test_city_from_dutch_address() {
        let mut info = CompanyInfo {
            address: "Herengracht 123, 1015 BG Amsterdam".to_string(),
            ..CompanyInfo::default()
        };
        assert_eq!(info.city(), Some("Amsterdam"));

        info.address = "Maasboulevard 100, 3063 NS Rotterdam".to_string();
        assert_eq!(info.city(), Some("Rotterdam"));

        info.address = "Main Street, Den Haag".to_string();
        assert_eq!(info.city(), Some("Den Haag"));

        info.address = "Address not available".to_string();
        assert_eq!(info.city(), None);
    }
}
