//! Template selection: tiered brand resolution that always yields a
//! document.
//!
//! [`Selector::generate`] is the engine entry point. It never returns an
//! error and never panics: each tier is individually isolated, a failed
//! tier logs and falls through, and the chain terminates in a neutral
//! default build or, at absolute worst, a static diagnostic tree. The
//! chain is strictly forward-progressing; no tier is ever re-entered.

use crate::assemble::assemble;
use crate::builder::BuildContext;
use crate::error::Error;
use crate::model::{
    Company, DocumentStyles, DocumentTree, Footer, Node, PageGeometry, Paragraph, QuotationData,
    RunStyle, Section, SectionRole, TemplateConfig, TextRun,
};
use crate::normalize::{normalize_company, normalize_quotation, NAME_FALLBACK};
use crate::seal::{self, HttpSealLoader, SealLoader, SealOutcome};
use crate::style::{StyleSet, TemplateKind, ERROR_RED, TEXT_MUTED, TEXT_PRIMARY};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// The neutral `templateType` the default config provider emits. The
/// config tier skips it quietly; only genuinely unknown values warn.
pub const DEFAULT_TEMPLATE_TYPE: &str = "default";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Supplies the template configuration applied locally when a company
/// record carries none. The copy is never persisted.
pub trait TemplateConfigProvider: Send + Sync {
    /// The default configuration.
    fn default_config(&self) -> TemplateConfig;
}

/// Built-in provider: neutral template type, canonical section order.
pub struct StaticConfigProvider;

impl TemplateConfigProvider for StaticConfigProvider {
    fn default_config(&self) -> TemplateConfig {
        TemplateConfig {
            template_type: DEFAULT_TEMPLATE_TYPE.to_string(),
            section_order: SectionRole::CANONICAL_ORDER.to_vec(),
            ..Default::default()
        }
    }
}

/// One attempt in the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    InputValidation,
    ConfigType,
    NameHeuristic,
    IdLookup,
    Default,
    LastResort,
}

/// What happened at a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierOutcome {
    /// Tier checks passed; resolution continues
    Passed,
    /// Tier chose a template and the build succeeded
    Selected(TemplateKind),
    /// Tier did not apply to this input
    Skipped,
    /// Tier applied but errored; resolution fell through
    Failed,
}

/// One entry of the decision trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    pub tier: Tier,
    pub outcome: TierOutcome,
    pub reason: String,
}

/// Ordered record of the tiers visited for one generation call,
/// consumable by any observability sink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionTrace {
    steps: Vec<TraceStep>,
}

impl DecisionTrace {
    fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, tier: Tier, outcome: TierOutcome, reason: impl Into<String>) {
        self.steps.push(TraceStep {
            tier,
            outcome,
            reason: reason.into(),
        });
    }

    /// The recorded steps, in tier order.
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// The template the successful tier selected, if any.
    pub fn selected_template(&self) -> Option<TemplateKind> {
        self.steps.iter().rev().find_map(|step| match step.outcome {
            TierOutcome::Selected(kind) => Some(kind),
            _ => None,
        })
    }

    /// Whether resolution ended in the diagnostic last-resort tree.
    pub fn is_last_resort(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.tier == Tier::LastResort && matches!(step.outcome, TierOutcome::Selected(_)))
    }

    /// Whether any tier failed or warned on the way to the result.
    pub fn has_warnings(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step.outcome, TierOutcome::Failed))
    }
}

/// A generated document plus the trace of how its template was chosen.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    /// The composed document tree
    pub tree: DocumentTree,

    /// The tier-by-tier decision trace
    pub trace: DecisionTrace,
}

impl GenerateResult {
    /// Consume the result, keeping only the tree.
    pub fn into_tree(self) -> DocumentTree {
        self.tree
    }

    /// The template the document was built with, when a brand tier
    /// resolved one.
    pub fn template(&self) -> Option<TemplateKind> {
        self.trace.selected_template()
    }
}

/// The template selector. Holds no mutable state; one instance can
/// serve any number of concurrent generations.
pub struct Selector {
    seal_loader: Box<dyn SealLoader>,
    config_provider: Box<dyn TemplateConfigProvider>,
}

impl Selector {
    /// Create a selector with the HTTP seal loader and the static
    /// config provider.
    pub fn new() -> Self {
        Self {
            seal_loader: Box::new(HttpSealLoader::new()),
            config_provider: Box::new(StaticConfigProvider),
        }
    }

    /// Replace the seal loader.
    pub fn with_seal_loader(mut self, loader: Box<dyn SealLoader>) -> Self {
        self.seal_loader = loader;
        self
    }

    /// Replace the default-config provider.
    pub fn with_config_provider(mut self, provider: Box<dyn TemplateConfigProvider>) -> Self {
        self.config_provider = provider;
        self
    }

    /// Compose a document tree for the given company and quotation.
    ///
    /// Infallible by contract: the worst case is a renderable diagnostic
    /// document, never an error.
    pub async fn generate(
        &self,
        company: Option<&Company>,
        quotation: Option<&QuotationData>,
    ) -> GenerateResult {
        let mut trace = DecisionTrace::new();

        // Tier 1: input validation. Missing input routes straight to the
        // default tier.
        let missing_input = match (company.is_some(), quotation.is_some()) {
            (true, true) => {
                trace.record(Tier::InputValidation, TierOutcome::Passed, "inputs present");
                false
            }
            (false, _) => {
                trace.record(Tier::InputValidation, TierOutcome::Failed, "company record missing");
                true
            }
            (_, false) => {
                trace.record(
                    Tier::InputValidation,
                    TierOutcome::Failed,
                    "quotation record missing",
                );
                true
            }
        };

        // Local defaulting pass: a missing template config gets the
        // provider's copy on a caller-local clone, never persisted.
        let company_local = company.map(|company| {
            let mut local = company.clone();
            if local.template_config.is_none() {
                local.template_config = Some(self.config_provider.default_config());
            }
            local
        });

        let normalized_company = company_local.as_ref().map(normalize_company);
        let normalized_quotation =
            quotation.map(|quotation| normalize_quotation(quotation, company_local.as_ref()));

        // The one suspension point: resolve the seal before any building.
        let seal = match &normalized_company {
            Some(company) => {
                seal::resolve(self.seal_loader.as_ref(), company.seal_image_url.as_deref()).await
            }
            None => SealOutcome::Absent,
        };

        let config = company_local
            .as_ref()
            .and_then(|company| company.template_config.clone())
            .unwrap_or_default();

        let attempt = |kind: TemplateKind| {
            let style = StyleSet::for_kind(kind)
                .with_primary(
                    normalized_company
                        .as_ref()
                        .and_then(|company| company.primary_color.as_deref()),
                )
                .with_overrides(&config);
            let ctx = BuildContext {
                company: normalized_company.as_ref(),
                quotation: normalized_quotation.as_ref(),
                style: &style,
                seal: &seal,
            };
            assemble(kind, &ctx, &config.section_order)
        };

        if !missing_input {
            // Tier 2: configured template type.
            let raw_type = config.template_type.trim();
            match TemplateKind::from_config_value(raw_type) {
                Some(kind) => match attempt(kind) {
                    Ok(tree) => {
                        trace.record(
                            Tier::ConfigType,
                            TierOutcome::Selected(kind),
                            format!("configured template type {raw_type:?}"),
                        );
                        return GenerateResult { tree, trace };
                    }
                    Err(err) => {
                        log::warn!("{kind} assembler failed, falling through: {err}");
                        trace.record(Tier::ConfigType, TierOutcome::Failed, err.to_string());
                    }
                },
                None if raw_type.is_empty() || raw_type == DEFAULT_TEMPLATE_TYPE => {
                    trace.record(
                        Tier::ConfigType,
                        TierOutcome::Skipped,
                        "no brand-specific template type configured",
                    );
                }
                None => {
                    let err = Error::UnknownTemplateType(raw_type.to_string());
                    log::warn!("{err}, falling through");
                    trace.record(Tier::ConfigType, TierOutcome::Failed, err.to_string());
                }
            }

            // Tier 3: name heuristics, most specific rule first.
            let normalized_name = company_local
                .as_ref()
                .map(normalized_company_name)
                .unwrap_or_default();
            match heuristic_match(&normalized_name) {
                Some((kind, rule)) => match attempt(kind) {
                    Ok(tree) => {
                        trace.record(
                            Tier::NameHeuristic,
                            TierOutcome::Selected(kind),
                            format!("name matched rule: {rule}"),
                        );
                        return GenerateResult { tree, trace };
                    }
                    Err(err) => {
                        log::warn!("{kind} assembler failed, falling through: {err}");
                        trace.record(Tier::NameHeuristic, TierOutcome::Failed, err.to_string());
                    }
                },
                None => {
                    trace.record(Tier::NameHeuristic, TierOutcome::Skipped, "no name rule matched");
                }
            }

            // Tier 4: exact id lookup.
            let id = company_local
                .as_ref()
                .map(|company| company.id.as_str())
                .unwrap_or_default();
            match id_lookup(id) {
                Some(kind) => match attempt(kind) {
                    Ok(tree) => {
                        trace.record(
                            Tier::IdLookup,
                            TierOutcome::Selected(kind),
                            format!("company id {id:?} is mapped"),
                        );
                        return GenerateResult { tree, trace };
                    }
                    Err(err) => {
                        log::warn!("{kind} assembler failed, falling through: {err}");
                        trace.record(Tier::IdLookup, TierOutcome::Failed, err.to_string());
                    }
                },
                None => {
                    trace.record(Tier::IdLookup, TierOutcome::Skipped, "company id not mapped");
                }
            }
        }

        // Tier 5: neutral default, the terminal template tier.
        let default_err = match attempt(TemplateKind::Default) {
            Ok(tree) => {
                trace.record(
                    Tier::Default,
                    TierOutcome::Selected(TemplateKind::Default),
                    "neutral default template",
                );
                return GenerateResult { tree, trace };
            }
            Err(err) => {
                log::warn!("default assembler failed: {err}");
                trace.record(Tier::Default, TierOutcome::Failed, err.to_string());
                err
            }
        };

        // Tier 6: static diagnostic tree. The only branch allowed to
        // expose error text in the output.
        let company_name = normalized_company
            .as_ref()
            .map(|company| company.display_name.as_str())
            .unwrap_or(NAME_FALLBACK);
        let tree = last_resort_tree(company_name, &default_err);
        trace.record(
            Tier::LastResort,
            TierOutcome::Selected(TemplateKind::Default),
            format!("diagnostic document: {default_err}"),
        );
        GenerateResult { tree, trace }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

/// NFKC + lowercase + whitespace-collapse + trim over the display and
/// legal names.
fn normalized_company_name(company: &Company) -> String {
    let combined = format!(
        "{} {}",
        company.name,
        company.legal_name.as_deref().unwrap_or_default()
    );
    let folded: String = combined.nfkc().collect::<String>().to_lowercase();
    WHITESPACE.replace_all(&folded, " ").trim().to_string()
}

struct HeuristicRule {
    requires: &'static [&'static str],
    excludes: &'static [&'static str],
    kind: TemplateKind,
    description: &'static str,
}

/// Ordered pattern rules, most specific first. First match wins.
const HEURISTIC_RULES: &[HeuristicRule] = &[
    HeuristicRule {
        requires: &["chembio", "lifesciences", "pvt"],
        excludes: &[],
        kind: TemplateKind::Formal,
        description: "chembio + lifesciences + pvt",
    },
    HeuristicRule {
        requires: &["chembio", "lifesciences"],
        excludes: &["pvt"],
        kind: TemplateKind::Modern,
        description: "chembio + lifesciences",
    },
    HeuristicRule {
        requires: &["chemlab"],
        excludes: &[],
        kind: TemplateKind::Technical,
        description: "chemlab",
    },
    HeuristicRule {
        requires: &["synthesis"],
        excludes: &[],
        kind: TemplateKind::Technical,
        description: "synthesis",
    },
    HeuristicRule {
        requires: &["lifesciences", "pvt"],
        excludes: &[],
        kind: TemplateKind::Formal,
        description: "lifesciences + pvt",
    },
    HeuristicRule {
        requires: &["lifesciences"],
        excludes: &[],
        kind: TemplateKind::Modern,
        description: "lifesciences",
    },
];

fn heuristic_match(normalized_name: &str) -> Option<(TemplateKind, &'static str)> {
    if normalized_name.is_empty() {
        return None;
    }
    HEURISTIC_RULES
        .iter()
        .find(|rule| {
            rule.requires.iter().all(|needle| normalized_name.contains(needle))
                && rule.excludes.iter().all(|needle| !normalized_name.contains(needle))
        })
        .map(|rule| (rule.kind, rule.description))
}

/// Fixed company-id mapping consulted after the heuristics.
fn id_lookup(id: &str) -> Option<TemplateKind> {
    match id {
        "chembio-lifesciences" => Some(TemplateKind::Modern),
        "chembio-lifesciences-pvt-ltd" => Some(TemplateKind::Formal),
        "chemlab-synthesis" => Some(TemplateKind::Technical),
        _ => None,
    }
}

/// Static minimal tree stating the generation error. Built from plain
/// literals so it cannot itself fail.
fn last_resort_tree(company_name: &str, err: &Error) -> DocumentTree {
    let styles = DocumentStyles::new(RunStyle::new("Helvetica", 10.0, TEXT_PRIMARY));
    let mut section = Section::new(
        PageGeometry::a4(40.0),
        Footer::centered("This is a computer generated quotation.", 8.0, TEXT_MUTED),
    );

    section.push(Node::Paragraph(Paragraph::from_runs(vec![TextRun::bold(
        "Quotation generation failed",
    )
    .with_color(ERROR_RED)
    .with_size(14.0)])));
    section.push(Node::text(format!("Company: {company_name}")));
    section.push(Node::text(format!("Error: {err}")));

    DocumentTree::new(styles, section)
}
