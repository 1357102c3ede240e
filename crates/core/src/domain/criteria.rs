use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyType {
    #[default]
    #[serde(rename = "Single Family Home")]
    SingleFamily,
    #[serde(rename = "Condo/Townhome")]
    Condo,
    #[serde(rename = "Multi-Family")]
    MultiFamily,
    #[serde(rename = "Commercial")]
    Commercial,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::SingleFamily,
        PropertyType::Condo,
        PropertyType::MultiFamily,
        PropertyType::Commercial,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "Single Family Home",
            PropertyType::Condo => "Condo/Townhome",
            PropertyType::MultiFamily => "Multi-Family",
            PropertyType::Commercial => "Commercial",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(needle) || t.cli_name() == needle)
            .ok_or_else(|| anyhow::anyhow!("unknown property type: {needle}"))
    }
}

impl PropertyType {
    fn cli_name(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "single-family",
            PropertyType::Condo => "condo",
            PropertyType::MultiFamily => "multi-family",
            PropertyType::Commercial => "commercial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Purpose {
    #[default]
    Buy,
    Sell,
    Invest,
}

impl Purpose {
    pub const ALL: [Purpose; 3] = [Purpose::Buy, Purpose::Sell, Purpose::Invest];

    pub fn label(self) -> &'static str {
        match self {
            Purpose::Buy => "Buy",
            Purpose::Sell => "Sell",
            Purpose::Invest => "Invest",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Purpose {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Purpose::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| anyhow::anyhow!("unknown purpose: {needle}"))
    }
}

/// Immutable snapshot of the search form, taken at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub location: String,
    pub property_type: PropertyType,
    /// Free-text budget range; empty when the user left it blank.
    pub budget: String,
    pub purpose: Purpose,
    pub contact_email: String,
}

/// Mutable form draft. Field names match the HTML form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub purpose: Purpose,
    #[serde(default, alias = "email")]
    pub contact_email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequired,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequired => {
                f.write_str("Please fill in at least location and email.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl SearchForm {
    pub fn submit(&self) -> Result<SearchCriteria, ValidationError> {
        let location = self.location.trim();
        let contact_email = self.contact_email.trim();
        if location.is_empty() || contact_email.is_empty() {
            return Err(ValidationError::MissingRequired);
        }

        Ok(SearchCriteria {
            location: location.to_string(),
            property_type: self.property_type,
            budget: self.budget.trim().to_string(),
            purpose: self.purpose,
            contact_email: contact_email.to_string(),
        })
    }
}

impl From<&SearchCriteria> for SearchForm {
    fn from(criteria: &SearchCriteria) -> Self {
        Self {
            location: criteria.location.clone(),
            property_type: criteria.property_type,
            budget: criteria.budget.clone(),
            purpose: criteria.purpose,
            contact_email: criteria.contact_email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SearchForm {
        SearchForm {
            location: "  Frisco ".to_string(),
            property_type: PropertyType::Condo,
            budget: " $400k - $600k ".to_string(),
            purpose: Purpose::Invest,
            contact_email: "buyer@example.com".to_string(),
        }
    }

    #[test]
    fn defaults_match_initial_form() {
        let form = SearchForm::default();
        assert_eq!(form.property_type, PropertyType::SingleFamily);
        assert_eq!(form.purpose, Purpose::Buy);
        assert!(form.budget.is_empty());
    }

    #[test]
    fn submit_rejects_blank_required_fields() {
        for (location, email) in [("", "a@b.c"), ("75201", ""), ("   ", "a@b.c"), ("75201", "\t")] {
            let form = SearchForm {
                location: location.to_string(),
                contact_email: email.to_string(),
                ..SearchForm::default()
            };
            assert_eq!(form.submit(), Err(ValidationError::MissingRequired));
        }
    }

    #[test]
    fn submit_trims_and_snapshots() {
        let criteria = filled().submit().unwrap();
        assert_eq!(criteria.location, "Frisco");
        assert_eq!(criteria.budget, "$400k - $600k");
        assert_eq!(criteria.property_type, PropertyType::Condo);
        assert_eq!(criteria.purpose, Purpose::Invest);
    }

    #[test]
    fn budget_is_optional() {
        let form = SearchForm {
            budget: String::new(),
            ..filled()
        };
        assert_eq!(form.submit().unwrap().budget, "");
    }

    #[test]
    fn property_type_parses_labels_and_cli_names() {
        assert_eq!("Condo/Townhome".parse::<PropertyType>().unwrap(), PropertyType::Condo);
        assert_eq!("multi-family".parse::<PropertyType>().unwrap(), PropertyType::MultiFamily);
        assert!("castle".parse::<PropertyType>().is_err());
        assert_eq!("invest".parse::<Purpose>().unwrap(), Purpose::Invest);
    }

    #[test]
    fn form_deserializes_from_urlencoded_labels() {
        let form: SearchForm = serde_json::from_value(serde_json::json!({
            "location": "Plano",
            "property_type": "Multi-Family",
            "purpose": "Sell",
            "email": "x@y.z",
        }))
        .unwrap();
        assert_eq!(form.property_type, PropertyType::MultiFamily);
        assert_eq!(form.purpose, Purpose::Sell);
        assert_eq!(form.contact_email, "x@y.z");
        assert_eq!(form.budget, "");
    }
}
