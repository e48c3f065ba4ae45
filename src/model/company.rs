//! Company and brand-configuration records.
//!
//! These records arrive from an external document store with camelCase
//! field names; every optional field really can be absent in stored data,
//! so the serde derives default aggressively instead of failing.

use serde::{Deserialize, Serialize};

/// A company issuing quotations, including its visual brand configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Stable record identifier
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Registered legal name, when it differs from the display name
    pub legal_name: Option<String>,

    /// Registered address
    pub address: Option<Address>,

    /// Phone / email / website
    pub contact_info: Option<ContactInfo>,

    /// Tax registration identifiers
    pub tax_info: Option<TaxInfo>,

    /// Default bank details for quotations that carry none of their own
    pub bank_details: Option<BankDetails>,

    /// Visual branding (accent color, seal image)
    #[serde(default)]
    pub branding: Branding,

    /// Template configuration; when absent the selector applies a local
    /// default copy that is never written back
    pub template_config: Option<TemplateConfig>,
}

impl Company {
    /// Create a company with just an id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the legal name and return self.
    pub fn with_legal_name(mut self, legal_name: impl Into<String>) -> Self {
        self.legal_name = Some(legal_name.into());
        self
    }

    /// Set the branding and return self.
    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Set the template configuration and return self.
    pub fn with_template_config(mut self, config: TemplateConfig) -> Self {
        self.template_config = Some(config);
        self
    }

    /// The name to sign documents with: legal name when present,
    /// display name otherwise.
    pub fn signatory_name(&self) -> &str {
        self.legal_name.as_deref().unwrap_or(&self.name)
    }
}

/// A postal address. Fields are kept separate so builders can lay them
/// out per brand; [`Address::flattened`] joins whatever is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Join the present parts into a single display line, or `None` when
    /// every part is absent.
    pub fn flattened(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.street.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.postal_code.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Contact channels for the issuing company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Tax registration identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxInfo {
    /// GST registration number
    pub gstin: Option<String>,
    /// Permanent account number
    pub pan: Option<String>,
}

/// Bank account details printed in the bank-details section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch: Option<String>,
    pub micr_code: Option<String>,
    pub account_type: Option<String>,
}

/// Visual branding attached to a company record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    /// Accent color as a hex string (e.g. `#0066CC`)
    pub primary_color: Option<String>,

    /// URL of the company stamp image embedded near the signature
    pub seal_image_url: Option<String>,
}

/// Template configuration governing the document's visual structure.
///
/// `template_type` stays a raw string on purpose: unknown values must
/// survive deserialization so the selector can route them through its
/// fallback tiers instead of rejecting the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    #[serde(default)]
    pub template_type: String,

    #[serde(default)]
    pub color_scheme: ColorScheme,

    #[serde(default)]
    pub typography: TypographyOverride,

    #[serde(default)]
    pub spacing: SpacingOverride,

    /// Preferred section order; roles missing here are appended in
    /// canonical order so the document stays structurally complete
    #[serde(default)]
    pub section_order: Vec<crate::model::document::SectionRole>,
}

impl TemplateConfig {
    /// Create a config with just a template type.
    pub fn with_type(template_type: impl Into<String>) -> Self {
        Self {
            template_type: template_type.into(),
            ..Default::default()
        }
    }
}

/// Per-company color overrides merged over the registry palette.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub border: Option<String>,
    pub background: Option<String>,
}

/// Per-company typography overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyOverride {
    pub font_family: Option<String>,
    pub header_size: Option<f32>,
    pub body_size: Option<f32>,
}

/// Per-company spacing overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingOverride {
    pub section_gap: Option<f32>,
    pub cell_padding: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatory_name() {
        let company = Company::new("c1", "Acme");
        assert_eq!(company.signatory_name(), "Acme");

        let company = company.with_legal_name("Acme Industries Pvt Ltd");
        assert_eq!(company.signatory_name(), "Acme Industries Pvt Ltd");
    }

    #[test]
    fn test_address_flattened() {
        let address = Address {
            street: Some("12 Science Park".to_string()),
            city: Some("Pune".to_string()),
            state: None,
            postal_code: Some("411001".to_string()),
            country: None,
        };
        assert_eq!(
            address.flattened().unwrap(),
            "12 Science Park, Pune, 411001"
        );

        assert!(Address::default().flattened().is_none());
    }

    #[test]
    fn test_company_camel_case_wire_format() {
        let json = r##"{
            "id": "c1",
            "name": "Acme",
            "legalName": "Acme Pvt Ltd",
            "branding": {"primaryColor": "#112233", "sealImageUrl": "https://example.com/seal.png"},
            "templateConfig": {"templateType": "modern"}
        }"##;

        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.legal_name.as_deref(), Some("Acme Pvt Ltd"));
        assert_eq!(company.branding.primary_color.as_deref(), Some("#112233"));
        assert_eq!(
            company.template_config.unwrap().template_type,
            "modern"
        );
    }

    #[test]
    fn test_sparse_company_deserializes() {
        let company: Company = serde_json::from_str("{}").unwrap();
        assert!(company.id.is_empty());
        assert!(company.template_config.is_none());
    }
}
