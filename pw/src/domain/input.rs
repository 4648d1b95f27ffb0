//! ProposalInput - what the client-facing form collects

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// Deliverables offered by the form out of the box
pub const DEFAULT_DELIVERABLES: [&str; 8] = [
    "Homepage design",
    "Responsive mobile design",
    "Up to 5 inner pages",
    "Contact form integration",
    "Basic SEO setup",
    "Content migration",
    "Browser testing",
    "Launch support",
];

/// Kind of project being proposed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    #[default]
    Website,
    LandingPage,
    Ecommerce,
    Redesign,
    Custom,
}

impl ProjectType {
    pub const ALL: [ProjectType; 5] = [
        ProjectType::Website,
        ProjectType::LandingPage,
        ProjectType::Ecommerce,
        ProjectType::Redesign,
        ProjectType::Custom,
    ];

    /// Wire value, as sent by the form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::LandingPage => "landing-page",
            Self::Ecommerce => "ecommerce",
            Self::Redesign => "redesign",
            Self::Custom => "custom",
        }
    }

    /// Human-readable label shown in the form
    pub fn label(&self) -> &'static str {
        match self {
            Self::Website => "Website Design & Development",
            Self::LandingPage => "Landing Page",
            Self::Ecommerce => "E-Commerce Store",
            Self::Redesign => "Website Redesign",
            Self::Custom => "Custom Project",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the work is billed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingType {
    #[default]
    Fixed,
    Hourly,
    Retainer,
}

impl PricingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Hourly => "hourly",
            Self::Retainer => "retainer",
        }
    }
}

impl std::fmt::Display for PricingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the form collects for one proposal
///
/// No field is validated here: empty strings flow into the prompt as-is.
/// Every field except `yourPhone` must be present when deserializing; the
/// form's initial values ([`Default`]) are never filled in for a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalInput {
    // Client
    pub client_name: String,
    pub client_company: String,
    pub client_email: String,

    // Project
    pub project_name: String,
    pub project_type: ProjectType,
    pub project_description: String,

    /// Order is meaningful: it becomes the order of the prompt's bullet list
    pub deliverables: Vec<String>,

    // Timeline
    pub estimated_duration: String,
    /// ISO date (YYYY-MM-DD) or empty
    pub start_date: String,

    // Pricing; amounts stay raw numbers, formatting happens at render time
    pub pricing_type: PricingType,
    #[serde(serialize_with = "serialize_amount")]
    pub total_price: f64,
    #[serde(serialize_with = "serialize_amount")]
    pub deposit_required: f64,
    pub payment_terms: String,

    // Sender
    pub your_name: String,
    pub your_company: String,
    pub your_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_phone: Option<String>,
}

/// Whole amounts go out as integers so `1500` echoes back as `1500`, not `1500.0`
fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // Largest integer an f64 holds exactly
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < EXACT_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl Default for ProposalInput {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            client_company: String::new(),
            client_email: String::new(),
            project_name: String::new(),
            project_type: ProjectType::Website,
            project_description: String::new(),
            deliverables: DEFAULT_DELIVERABLES[..5].iter().map(|d| d.to_string()).collect(),
            estimated_duration: "2-3 weeks".to_string(),
            start_date: String::new(),
            pricing_type: PricingType::Fixed,
            total_price: 1500.0,
            deposit_required: 500.0,
            payment_terms: "50% deposit to begin, 50% upon completion".to_string(),
            your_name: String::new(),
            your_company: String::new(),
            your_email: String::new(),
            your_phone: None,
        }
    }
}

impl ProposalInput {
    /// Soft consistency checks; returned as warnings, never enforced
    pub fn warnings(&self) -> Vec<String> {
        debug!(%self.total_price, %self.deposit_required, "ProposalInput::warnings: called");
        let mut warnings = Vec::new();

        if self.deposit_required > self.total_price {
            debug!("ProposalInput::warnings: deposit exceeds total");
            warnings.push(format!(
                "deposit {} exceeds total price {}",
                self.deposit_required, self.total_price
            ));
        }
        if self.total_price < 0.0 || self.deposit_required < 0.0 {
            debug!("ProposalInput::warnings: negative amount");
            warnings.push("negative currency amount".to_string());
        }
        if self.deliverables.is_empty() {
            debug!("ProposalInput::warnings: no deliverables");
            warnings.push("no deliverables listed".to_string());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "clientName": "Jane",
            "clientCompany": "Acme",
            "clientEmail": "jane@acme.test",
            "projectName": "Acme Relaunch",
            "projectType": "landing-page",
            "projectDescription": "New landing page",
            "deliverables": ["Homepage", "SEO"],
            "estimatedDuration": "4 weeks",
            "startDate": "2025-03-01",
            "pricingType": "retainer",
            "totalPrice": 1500,
            "depositRequired": 500,
            "paymentTerms": "Net 30",
            "yourName": "Sam",
            "yourCompany": "Studio",
            "yourEmail": "sam@studio.test",
            "yourPhone": "555-0100"
        }"#;

        let input: ProposalInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.client_name, "Jane");
        assert_eq!(input.project_type, ProjectType::LandingPage);
        assert_eq!(input.pricing_type, PricingType::Retainer);
        assert_eq!(input.deliverables, vec!["Homepage", "SEO"]);
        assert_eq!(input.total_price, 1500.0);
        assert_eq!(input.your_phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let partial = serde_json::from_str::<ProposalInput>(r#"{"clientName": "Jane", "projectName": "Site"}"#);
        assert!(partial.is_err());

        for key in ["totalPrice", "depositRequired", "deliverables", "paymentTerms", "clientName"] {
            let mut value = serde_json::to_value(ProposalInput::default()).unwrap();
            value.as_object_mut().unwrap().remove(key);
            let err = serde_json::from_value::<ProposalInput>(value).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }

    #[test]
    fn test_phone_is_optional() {
        let value = serde_json::to_value(ProposalInput::default()).unwrap();
        assert!(value.get("yourPhone").is_none());
        let input: ProposalInput = serde_json::from_value(value).unwrap();
        assert_eq!(input, ProposalInput::default());
    }

    #[test]
    fn test_whole_amounts_echo_as_integers() {
        let input = ProposalInput {
            total_price: 1500.0,
            deposit_required: 250.75,
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["totalPrice"], serde_json::json!(1500));
        assert_eq!(value["depositRequired"], serde_json::json!(250.75));
        assert_eq!(serde_json::to_string(&value["totalPrice"]).unwrap(), "1500");
    }

    #[test]
    fn test_unknown_project_type_rejected() {
        let result: Result<ProposalInput, _> = serde_json::from_str(r#"{"projectType": "mobile-app"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_phone_omitted_when_absent() {
        let value = serde_json::to_value(ProposalInput::default()).unwrap();
        assert!(value.get("yourPhone").is_none());
        assert_eq!(value["projectType"], "website");
        assert_eq!(value["pricingType"], "fixed");
    }

    #[test]
    fn test_project_type_wire_values_match_serde() {
        for pt in ProjectType::ALL {
            let value = serde_json::to_value(pt).unwrap();
            assert_eq!(value, pt.as_str());
        }
        assert_eq!(ProjectType::Ecommerce.label(), "E-Commerce Store");
    }

    #[test]
    fn test_warnings() {
        assert!(ProposalInput::default().warnings().is_empty());

        let input = ProposalInput {
            total_price: 100.0,
            deposit_required: 500.0,
            deliverables: vec![],
            ..Default::default()
        };
        let warnings = input.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("exceeds"));
    }
}
