//! Data model types for quotation document composition.
//!
//! This module defines both sides of the engine: the input records a
//! caller hands in (company brand configuration and quotation business
//! data, as they arrive from a document store) and the output tree the
//! engine hands back for external serialization.

mod company;
mod document;
mod quotation;

pub use company::{
    Address, BankDetails, Branding, ColorScheme, Company, ContactInfo, SpacingOverride, TaxInfo,
    TemplateConfig, TypographyOverride,
};
pub use document::{
    Alignment, BorderStyle, Columns, DocumentStyles, DocumentTree, Footer, ImageNode, Margins,
    Node, PageGeometry, PageSize, Paragraph, ParagraphStyle, RunStyle, Section, SectionRole,
    Table, TableCell, TableRow, TextRun,
};
pub use quotation::{BillTo, LineItem, QuotationData};
