//! Section builders: four independent brand implementations of the same
//! six structural roles.
//!
//! Builders return a [`SectionResult`] instead of panicking or printing;
//! the assembler decides centrally what a failed section becomes. Two
//! deliberate, asymmetric tolerance rules hold across every brand:
//!
//! - header builders substitute literal fallbacks for every missing
//!   field and succeed even when the company is entirely absent;
//! - client-block builders error when the quotation is entirely absent,
//!   and that error is the one section failure the assembler propagates.

mod default;
mod formal;
mod modern;
mod technical;

pub use default::DefaultBuilder;
pub use formal::FormalBuilder;
pub use modern::ModernBuilder;
pub use technical::TechnicalBuilder;

pub use crate::model::SectionRole;

use crate::error::{Error, Result};
use crate::format::{format_currency, format_raw_number};
use crate::model::{LineItem, Node, QuotationData};
use crate::normalize::{NormalizedCompany, NormalizedQuotation, FIELD_PLACEHOLDER};
use crate::seal::SealOutcome;
use crate::style::{StyleSet, TemplateKind};

/// Result of building one section: a node, or the reason it failed.
pub type SectionResult = Result<Node>;

/// Everything a section builder may consume. The seal is resolved once
/// by the selector before assembly begins.
pub struct BuildContext<'a> {
    /// Normalized company, absent when the caller passed none
    pub company: Option<&'a NormalizedCompany>,

    /// Normalized quotation, absent when the caller passed none
    pub quotation: Option<&'a NormalizedQuotation>,

    /// Effective style set (registry values plus company overrides)
    pub style: &'a StyleSet,

    /// Pre-resolved seal outcome
    pub seal: &'a SealOutcome,
}

impl<'a> BuildContext<'a> {
    /// The quotation, or the error every client-block builder propagates
    /// when it is entirely absent.
    pub fn require_quotation(&self) -> Result<&'a NormalizedQuotation> {
        self.quotation.ok_or(Error::MissingQuotation)
    }
}

/// One brand's set of section builders.
pub trait SectionBuilder: Send + Sync {
    /// The brand this builder set belongs to.
    fn template_kind(&self) -> TemplateKind;

    /// Company banner.
    fn header(&self, ctx: &BuildContext) -> SectionResult;

    /// Customer bill-to block.
    fn client_block(&self, ctx: &BuildContext) -> SectionResult;

    /// Line-items table with summary rows.
    fn items_table(&self, ctx: &BuildContext) -> SectionResult;

    /// Terms and notes block.
    fn terms(&self, ctx: &BuildContext) -> SectionResult;

    /// Bank-details block.
    fn bank_details(&self, ctx: &BuildContext) -> SectionResult;

    /// Signature block with the resolved seal outcome.
    fn signature(&self, ctx: &BuildContext) -> SectionResult;

    /// Dispatch a role to its builder method.
    fn build(&self, role: SectionRole, ctx: &BuildContext) -> SectionResult {
        match role {
            SectionRole::Header => self.header(ctx),
            SectionRole::ClientBlock => self.client_block(ctx),
            SectionRole::ItemsTable => self.items_table(ctx),
            SectionRole::Terms => self.terms(ctx),
            SectionRole::BankDetails => self.bank_details(ctx),
            SectionRole::Signature => self.signature(ctx),
        }
    }
}

/// Look up the builder set for a brand.
pub fn builder_for(kind: TemplateKind) -> &'static dyn SectionBuilder {
    match kind {
        TemplateKind::Modern => &ModernBuilder,
        TemplateKind::Formal => &FormalBuilder,
        TemplateKind::Technical => &TechnicalBuilder,
        TemplateKind::Default => &DefaultBuilder,
    }
}

/// Fixed boilerplate printed in every terms block, before the
/// caller-supplied payment terms and notes.
pub(crate) const TERMS_BOILERPLATE: [&str; 4] = [
    "Prices are valid for 30 days from the date of this quotation.",
    "Goods once sold will not be taken back.",
    "Interest @18% p.a. will be charged on delayed payments.",
    "Subject to local jurisdiction.",
];

/// Column count of the items table.
pub(crate) const ITEM_COLUMN_COUNT: usize = 11;

/// Index of the make column, emphasized per brand.
pub(crate) const MAKE_COLUMN: usize = 3;

/// Index of the lead-time column, emphasized per brand.
pub(crate) const LEAD_TIME_COLUMN: usize = 9;

/// The eleven cell values of one item row, rendered as given: no
/// coercion, no sanitization of business data.
pub(crate) fn item_values(item: &LineItem) -> [String; ITEM_COLUMN_COUNT] {
    [
        item.sno.to_string(),
        item.cat_no.clone(),
        item.product_description.clone(),
        item.make.clone().unwrap_or_else(|| FIELD_PLACEHOLDER.to_string()),
        item.pack_size.clone(),
        format_raw_number(item.qty),
        format_raw_number(item.unit_rate),
        item.discount_percent
            .map(|discount| format!("{}%", format_raw_number(discount)))
            .unwrap_or_else(|| FIELD_PLACEHOLDER.to_string()),
        format!("{}%", format_raw_number(item.gst_percent)),
        item.lead_time
            .clone()
            .unwrap_or_else(|| FIELD_PLACEHOLDER.to_string()),
        format_raw_number(item.total_price),
    ]
}

/// Visible red placeholder when a configured seal image failed to load.
pub(crate) const SEAL_FAILED_TEXT: &str = "Seal image failed to load";

/// Neutral placeholder when no seal image is configured.
pub(crate) const SEAL_ABSENT_TEXT: &str = "(Seal not available)";

/// The six label/value pairs of the bank-details block, with literal
/// fallbacks when the quotation is absent.
pub(crate) fn bank_rows(ctx: &BuildContext) -> [(&'static str, String); 6] {
    let bank = ctx
        .quotation
        .map(|quotation| quotation.bank.clone())
        .unwrap_or_default();
    [
        ("Bank Name", bank.bank_name),
        ("Account Number", bank.account_number),
        ("IFSC Code", bank.ifsc_code),
        ("Branch", bank.branch),
        ("MICR Code", bank.micr_code),
        ("Account Type", bank.account_type),
    ]
}

/// The four summary rows below the item rows, formatted as currency.
pub(crate) fn summary_values(data: &QuotationData) -> [(&'static str, String); 4] {
    [
        ("Sub Total", format_currency(data.sub_total, true)),
        ("Tax", format_currency(data.tax, true)),
        ("Round Off", format_currency(data.round_off, true)),
        ("Grand Total", format_currency(data.grand_total, true)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_values_verbatim() {
        let item = LineItem::new(3, "CB-100", "Buffer solution")
            .with_amounts(f64::NAN, 450.0, 900.0)
            .with_make("Merck");

        let values = item_values(&item);
        assert_eq!(values[0], "3");
        assert_eq!(values[1], "CB-100");
        assert_eq!(values[MAKE_COLUMN], "Merck");
        assert_eq!(values[5], "NaN");
        assert_eq!(values[7], "-");
        assert_eq!(values[8], "0%");
        assert_eq!(values[LEAD_TIME_COLUMN], "-");
        assert_eq!(values[10], "900");
    }

    #[test]
    fn test_summary_values_zero_equivalents() {
        let data = QuotationData::default();
        let summary = summary_values(&data);
        assert_eq!(summary[0].0, "Sub Total");
        assert_eq!(summary[3].0, "Grand Total");
        for (_, amount) in &summary {
            assert_eq!(amount, &format_currency(0.0, true));
        }
    }

    #[test]
    fn test_builder_for_covers_every_kind() {
        for kind in [
            TemplateKind::Modern,
            TemplateKind::Formal,
            TemplateKind::Technical,
            TemplateKind::Default,
        ] {
            assert_eq!(builder_for(kind).template_kind(), kind);
        }
    }
}
