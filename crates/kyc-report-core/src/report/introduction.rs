use crate::assessment::categories::RiskCategoryKey;
use crate::company::CompanyInfo;

/// Legal-form suffixes stripped when deriving search keywords.
const LEGAL_SUFFIXES: &[&str] = &["B.V.", "N.V.", "V.O.F.", "C.V."];

/// Opening paragraph of a report.
pub fn introduction(company_name: &str, kvk_number: &str, company: Option<&CompanyInfo>) -> String {
    let mut text = format!(
        "This report provides a comprehensive open-source investigation analysis for {} (KVK: {}).",
        company_name, kvk_number
    );

    if let Some(c) = company {
        if CompanyInfo::known(&c.address) {
            text.push_str(&format!(" The company is registered at {}.", c.address));
        }
        if CompanyInfo::known(&c.legal_form) {
            text.push_str(&format!(" Legal form: {}.", c.legal_form));
        }
        if CompanyInfo::known(&c.sbi_description) {
            text.push_str(&format!(
                " Primary business activity: {}.",
                c.sbi_description.trim_end_matches('.')
            ));
        }
    }

    let names: Vec<&str> = RiskCategoryKey::ALL.iter().map(|k| k.display_name()).collect();
    if let [rest @ .., last] = names.as_slice() {
        text.push_str(&format!(
            " The investigation covers six key risk categories: {}, and {}.",
            rest.join(", "),
            last
        ));
    }
    text
}

/// Keywords an analyst would search for: the legal name, the name without its
/// legal-form suffix, the business activity and `<suffix> <city>`.
pub fn search_keywords(company_name: &str, company: Option<&CompanyInfo>) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    let mut push = |k: String| {
        let k = k.trim().to_string();
        if !k.is_empty() && !keywords.iter().any(|e| e.eq_ignore_ascii_case(&k)) {
            keywords.push(k);
        }
    };

    push(company_name.to_string());

    let suffix = LEGAL_SUFFIXES
        .iter()
        .find(|s| company_name.trim_end().ends_with(**s))
        .copied();
    if let Some(s) = suffix {
        push(company_name.trim_end().trim_end_matches(s).to_string());
    }

    if let Some(c) = company {
        if CompanyInfo::known(&c.sbi_description) {
            push(c.sbi_description.clone());
        }
        if let (Some(s), Some(city)) = (suffix, c.city()) {
            push(format!("{} {}", s, city));
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::fixtures::fixture_company;

    #[test]
    fn test_introduction_with_company() {
        let company = fixture_company("12345678").unwrap();
        let text = introduction(&company.legal_name, &company.kvk_number, Some(&company));
        assert!(text.starts_with(
            "This report provides a comprehensive open-source investigation analysis for Amsterdam Tech Solutions B.V. (KVK: 12345678)."
        ));
        assert!(text.contains("registered at Herengracht 123, 1015 BG Amsterdam."));
        assert!(text.contains("Legal form: Besloten Vennootschap (B.V.)."));
        assert!(text.contains("Primary business activity: Computer programming activities."));
        assert!(text.ends_with(
            "Structure Risk, Adverse Media Risk, Sanctions Risk, and PEP Risk."
        ));
    }

    #[test]
    fn test_introduction_skips_unknown_fields() {
        let company = CompanyInfo::default();
        let text = introduction("Unknown Company", "Unknown", Some(&company));
        assert!(!text.contains("registered at"));
        assert!(!text.contains("Legal form"));
        assert!(!text.contains("Primary business activity"));
    }

    #[test]
    fn test_search_keywords() {
        let company = fixture_company("12345678").unwrap();
        assert_eq!(
            search_keywords(&company.legal_name, Some(&company)),
            vec![
                "Amsterdam Tech Solutions B.V.",
                "Amsterdam Tech Solutions",
                "Computer programming activities",
                "B.V. Amsterdam",
            ]
        );
    }

    #[test]
    fn test_search_keywords_without_suffix_or_company() {
        assert_eq!(
            search_keywords("Green Garden Services", None),
            vec!["Green Garden Services"]
        );
    }
}
