//! # quotedoc
//!
//! Brand-aware quotation document composition for Rust.
//!
//! Given a company's visual brand configuration and a quotation's
//! business data, this library always produces a complete, well-formed
//! document tree for an external serializer, selecting the brand
//! template through a tiered fallback chain and isolating failures at
//! the level of individual document sections.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quotedoc::model::{Company, QuotationData};
//!
//! #[tokio::main]
//! async fn main() {
//!     let company = Company::new("chembio-lifesciences", "Chembio Lifesciences");
//!     let quotation = QuotationData::new("Q-2024-001", "2024-03-15");
//!
//!     // Never fails: worst case is a renderable diagnostic document.
//!     let result = quotedoc::generate(Some(&company), Some(&quotation)).await;
//!     println!("{}", result.tree.to_json(true).unwrap());
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Always a document**: `generate` has no error channel. Unknown
//!   template types, missing fields, failed seal fetches and failed
//!   sections all degrade inside the tree instead of aborting.
//! - **Deterministic**: identical inputs produce structurally equal
//!   trees; nothing is cached between calls.
//! - **Traceable**: every result carries an ordered decision trace of
//!   the tiers visited.
//!
//! The only network call is the optional seal-image fetch; swap in
//! [`NullSealLoader`] (or any [`SealLoader`]) to run fully offline.

pub mod assemble;
pub mod builder;
pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod seal;
pub mod select;
pub mod style;

// Re-export commonly used types
pub use builder::{BuildContext, SectionBuilder, SectionResult};
pub use error::{Error, Result};
pub use model::{
    BillTo, Company, DocumentTree, LineItem, Node, QuotationData, SectionRole, TemplateConfig,
};
pub use seal::{HttpSealLoader, NullSealLoader, SealLoader, SealOutcome};
pub use select::{
    DecisionTrace, GenerateResult, Selector, StaticConfigProvider, TemplateConfigProvider, Tier,
    TierOutcome, TraceStep,
};
pub use style::{StyleSet, TemplateKind};

/// Compose a quotation document with a default [`Selector`].
///
/// # Arguments
///
/// * `company` - The issuing company record, if available
/// * `quotation` - The quotation business data, if available
///
/// # Example
///
/// ```no_run
/// use quotedoc::model::{Company, QuotationData};
///
/// # #[tokio::main]
/// # async fn main() {
/// let company = Company::new("c1", "Acme Lifesciences");
/// let quotation = QuotationData::new("Q-7", "2024-06-01");
/// let result = quotedoc::generate(Some(&company), Some(&quotation)).await;
/// assert!(result.tree.child_count() > 0);
/// # }
/// ```
pub async fn generate(
    company: Option<&Company>,
    quotation: Option<&QuotationData>,
) -> GenerateResult {
    Selector::new().generate(company, quotation).await
}

/// Compose a quotation document and keep only the tree.
pub async fn generate_tree(
    company: Option<&Company>,
    quotation: Option<&QuotationData>,
) -> DocumentTree {
    generate(company, quotation).await.into_tree()
}

/// Builder for configuring document generation.
///
/// # Example
///
/// ```no_run
/// use quotedoc::Quotedoc;
/// use quotedoc::model::{Company, QuotationData};
///
/// # #[tokio::main]
/// # async fn main() {
/// let composer = Quotedoc::new().offline();
/// let result = composer
///     .generate(
///         Some(&Company::new("c1", "Acme")),
///         Some(&QuotationData::new("Q-1", "2024-01-05")),
///     )
///     .await;
/// assert!(result.tree.child_count() > 0);
/// # }
/// ```
pub struct Quotedoc {
    selector: Selector,
}

impl Quotedoc {
    /// Create a new builder with default collaborators.
    pub fn new() -> Self {
        Self {
            selector: Selector::new(),
        }
    }

    /// Disable seal fetching; configured seal URLs render the visible
    /// load-failed placeholder instead of touching the network.
    pub fn offline(mut self) -> Self {
        self.selector = self.selector.with_seal_loader(Box::new(NullSealLoader));
        self
    }

    /// Use a custom seal loader.
    pub fn with_seal_loader(mut self, loader: Box<dyn SealLoader>) -> Self {
        self.selector = self.selector.with_seal_loader(loader);
        self
    }

    /// Use a custom default-template-config provider.
    pub fn with_config_provider(mut self, provider: Box<dyn TemplateConfigProvider>) -> Self {
        self.selector = self.selector.with_config_provider(provider);
        self
    }

    /// Compose a document.
    pub async fn generate(
        &self,
        company: Option<&Company>,
        quotation: Option<&QuotationData>,
    ) -> GenerateResult {
        self.selector.generate(company, quotation).await
    }
}

impl Default for Quotedoc {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_never_fails_on_empty_input() {
        let result = Quotedoc::new().offline().generate(None, None).await;
        // no quotation at all ends in the diagnostic tree
        assert!(result.trace.is_last_resort());
        assert!(result.tree.child_count() > 0);
    }

    #[tokio::test]
    async fn test_quotedoc_builder_generates() {
        let company = Company::new("c1", "Acme");
        let quotation = QuotationData::new("Q-1", "2024-01-05");

        let result = Quotedoc::new()
            .offline()
            .generate(Some(&company), Some(&quotation))
            .await;

        assert!(!result.trace.is_last_resort());
        assert!(result.tree.child_count() > 6);
    }

    #[tokio::test]
    async fn test_generate_tree_convenience() {
        // default selector would use the HTTP loader, but with no seal
        // URL configured it never touches the network
        let company = Company::new("c1", "Acme");
        let quotation = QuotationData::new("Q-1", "2024-01-05");
        let tree = generate_tree(Some(&company), Some(&quotation)).await;
        assert!(tree.plain_text().contains("Q-1"));
    }
}
