//! Quotation business-data records.
//!
//! A [`QuotationData`] value is built by the caller, stays immutable
//! during generation, and yields exactly one document tree per call. Line
//! items are rendered verbatim; the engine never validates or corrects
//! business figures.

use super::BankDetails;
use serde::{Deserialize, Serialize};

/// One quotation's business content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationData {
    /// The customer being billed
    #[serde(default)]
    pub bill_to: BillTo,

    /// Quoted products, in display order
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Sum of line amounts before tax
    #[serde(default)]
    pub sub_total: f64,

    /// Total tax amount
    #[serde(default)]
    pub tax: f64,

    /// Rounding adjustment applied to reach the grand total
    #[serde(default)]
    pub round_off: f64,

    /// Final payable amount
    #[serde(default)]
    pub grand_total: f64,

    /// Free-form notes printed in the terms section
    pub notes: Option<String>,

    /// Payment terms printed in the terms section
    pub payment_terms: Option<String>,

    /// Quotation reference number
    #[serde(default)]
    pub quotation_ref: String,

    /// Quotation date as stored; parsed leniently for display
    #[serde(default)]
    pub quotation_date: String,

    /// Bank details for this quotation; overrides the company default
    pub bank_details: Option<BankDetails>,
}

impl QuotationData {
    /// Create a quotation with a reference and date.
    pub fn new(quotation_ref: impl Into<String>, quotation_date: impl Into<String>) -> Self {
        Self {
            quotation_ref: quotation_ref.into(),
            quotation_date: quotation_date.into(),
            ..Default::default()
        }
    }

    /// Set the bill-to block and return self.
    pub fn with_bill_to(mut self, bill_to: BillTo) -> Self {
        self.bill_to = bill_to;
        self
    }

    /// Replace the line items and return self.
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// Set the summary totals and return self.
    pub fn with_totals(mut self, sub_total: f64, tax: f64, round_off: f64, grand_total: f64) -> Self {
        self.sub_total = sub_total;
        self.tax = tax;
        self.round_off = round_off;
        self.grand_total = grand_total;
        self
    }

    /// Add a line item.
    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// The customer block of a quotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    pub contact_person: Option<String>,
}

/// One quoted product line.
///
/// Wire names are the store's own snake_case column names, so no serde
/// renaming is applied here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// Serial number as displayed
    #[serde(default)]
    pub sno: u32,

    /// Catalog number
    #[serde(default)]
    pub cat_no: String,

    /// Pack size (e.g. "500 g")
    #[serde(default)]
    pub pack_size: String,

    /// Product description
    #[serde(default)]
    pub product_description: String,

    /// Quantity
    #[serde(default)]
    pub qty: f64,

    /// Rate per unit
    #[serde(default)]
    pub unit_rate: f64,

    /// GST percentage
    #[serde(default)]
    pub gst_percent: f64,

    /// Line amount
    #[serde(default)]
    pub total_price: f64,

    /// Discount percentage, when offered
    pub discount_percent: Option<f64>,

    /// Manufacturer / make
    pub make: Option<String>,

    /// Quoted lead time (e.g. "2-3 weeks")
    pub lead_time: Option<String>,

    /// HSN classification code
    pub hsn_code: Option<String>,
}

impl LineItem {
    /// Create a line item with the required display fields.
    pub fn new(sno: u32, cat_no: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            sno,
            cat_no: cat_no.into(),
            product_description: description.into(),
            ..Default::default()
        }
    }

    /// Set quantity, unit rate and line amount, returning self.
    pub fn with_amounts(mut self, qty: f64, unit_rate: f64, total_price: f64) -> Self {
        self.qty = qty;
        self.unit_rate = unit_rate;
        self.total_price = total_price;
        self
    }

    /// Set the make and return self.
    pub fn with_make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }
}
