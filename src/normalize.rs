//! Centralized defaulting pass applied once at selector entry.
//!
//! Every literal fallback a section builder may print lives here, so the
//! builders themselves stay free of scattered optional-field handling.
//! Normalization is idempotent and works on caller-local copies only;
//! nothing is ever written back to stored records.

use crate::model::{BillTo, Company, QuotationData};

/// Literal printed for an empty bill-to field.
pub const FIELD_PLACEHOLDER: &str = "-";

/// Literal printed when the company display name is missing.
pub const NAME_FALLBACK: &str = "Company Name";

/// Literal printed when the company address is missing.
pub const ADDRESS_FALLBACK: &str = "Address not available";

/// Literal printed when the company phone is missing.
pub const PHONE_FALLBACK: &str = "Phone not available";

/// Literal printed when the company email is missing.
pub const EMAIL_FALLBACK: &str = "Email not available";

/// Literal printed when the GST registration number is missing.
pub const GSTIN_FALLBACK: &str = "GSTIN not available";

/// Literal printed when the PAN is missing.
pub const PAN_FALLBACK: &str = "PAN not available";

/// Literal bank-detail fallbacks.
pub const BANK_NAME_FALLBACK: &str = "Bank name not available";
pub const ACCOUNT_NUMBER_FALLBACK: &str = "Account number not available";
pub const IFSC_FALLBACK: &str = "IFSC not available";
pub const BRANCH_FALLBACK: &str = "Branch not available";
pub const MICR_FALLBACK: &str = "MICR not available";
pub const ACCOUNT_TYPE_FALLBACK: &str = "Current Account";

/// A company record with every display field resolved to printable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCompany {
    pub display_name: String,
    pub signatory_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub gstin: String,
    pub pan: String,
    pub primary_color: Option<String>,
    pub seal_image_url: Option<String>,
}

/// A bill-to block with `"-"` substituted for every empty field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBillTo {
    pub name: String,
    pub company: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub contact_person: String,
}

/// Bank details with literal fallbacks for absent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBank {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub branch: String,
    pub micr_code: String,
    pub account_type: String,
}

impl Default for NormalizedBank {
    fn default() -> Self {
        Self {
            bank_name: BANK_NAME_FALLBACK.to_string(),
            account_number: ACCOUNT_NUMBER_FALLBACK.to_string(),
            ifsc_code: IFSC_FALLBACK.to_string(),
            branch: BRANCH_FALLBACK.to_string(),
            micr_code: MICR_FALLBACK.to_string(),
            account_type: ACCOUNT_TYPE_FALLBACK.to_string(),
        }
    }
}

/// A quotation paired with its normalized display blocks. The raw
/// business data rides along untouched: line items are rendered
/// verbatim, never defaulted.
#[derive(Debug, Clone)]
pub struct NormalizedQuotation {
    pub bill_to: NormalizedBillTo,
    pub bank: NormalizedBank,
    pub data: QuotationData,
}

/// Resolve a company record into printable fields.
pub fn normalize_company(company: &Company) -> NormalizedCompany {
    let display_name = fallback(&company.name, NAME_FALLBACK);
    let signatory_name = company
        .legal_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(&display_name)
        .to_string();

    let address = company
        .address
        .as_ref()
        .and_then(|address| address.flattened())
        .unwrap_or_else(|| ADDRESS_FALLBACK.to_string());

    let contact = company.contact_info.as_ref();
    let phone = opt_fallback(contact.and_then(|c| c.phone.as_deref()), PHONE_FALLBACK);
    let email = opt_fallback(contact.and_then(|c| c.email.as_deref()), EMAIL_FALLBACK);

    let tax = company.tax_info.as_ref();
    let gstin = opt_fallback(tax.and_then(|t| t.gstin.as_deref()), GSTIN_FALLBACK);
    let pan = opt_fallback(tax.and_then(|t| t.pan.as_deref()), PAN_FALLBACK);

    NormalizedCompany {
        display_name,
        signatory_name,
        address,
        phone,
        email,
        gstin,
        pan,
        primary_color: trimmed_opt(company.branding.primary_color.as_deref()),
        seal_image_url: trimmed_opt(company.branding.seal_image_url.as_deref()),
    }
}

/// Resolve a quotation's display blocks. Bank details prefer the
/// quotation's own record, then the company default, then literals.
pub fn normalize_quotation(
    quotation: &QuotationData,
    company: Option<&Company>,
) -> NormalizedQuotation {
    let bank_source = quotation
        .bank_details
        .as_ref()
        .or_else(|| company.and_then(|c| c.bank_details.as_ref()));

    let bank = NormalizedBank {
        bank_name: opt_fallback(
            bank_source.and_then(|b| b.bank_name.as_deref()),
            BANK_NAME_FALLBACK,
        ),
        account_number: opt_fallback(
            bank_source.and_then(|b| b.account_number.as_deref()),
            ACCOUNT_NUMBER_FALLBACK,
        ),
        ifsc_code: opt_fallback(bank_source.and_then(|b| b.ifsc_code.as_deref()), IFSC_FALLBACK),
        branch: opt_fallback(bank_source.and_then(|b| b.branch.as_deref()), BRANCH_FALLBACK),
        micr_code: opt_fallback(bank_source.and_then(|b| b.micr_code.as_deref()), MICR_FALLBACK),
        account_type: opt_fallback(
            bank_source.and_then(|b| b.account_type.as_deref()),
            ACCOUNT_TYPE_FALLBACK,
        ),
    };

    NormalizedQuotation {
        bill_to: normalize_bill_to(&quotation.bill_to),
        bank,
        data: quotation.clone(),
    }
}

fn normalize_bill_to(bill_to: &BillTo) -> NormalizedBillTo {
    NormalizedBillTo {
        name: fallback(&bill_to.name, FIELD_PLACEHOLDER),
        company: fallback(&bill_to.company, FIELD_PLACEHOLDER),
        address: fallback(&bill_to.address, FIELD_PLACEHOLDER),
        phone: fallback(&bill_to.phone, FIELD_PLACEHOLDER),
        email: fallback(&bill_to.email, FIELD_PLACEHOLDER),
        contact_person: opt_fallback(bill_to.contact_person.as_deref(), FIELD_PLACEHOLDER),
    }
}

fn fallback(value: &str, literal: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        literal.to_string()
    } else {
        trimmed.to_string()
    }
}

fn opt_fallback(value: Option<&str>, literal: &str) -> String {
    fallback(value.unwrap_or_default(), literal)
}

fn trimmed_opt(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
