//! Per-brand document assembly.
//!
//! Each brand has its own assembly function with its own page geometry,
//! footer and title block, but all four emit the identical outer schema:
//! one styles object and one section holding a footer and a flat
//! children list. Section failures are handled centrally here: a failed
//! builder becomes an inline placeholder, except the client block whose
//! missing-quotation error propagates to the selector.

use crate::builder::{builder_for, BuildContext, SectionBuilder, SectionRole};
use crate::error::{Error, Result};
use crate::format::format_quotation_date;
use crate::model::{
    Alignment, DocumentStyles, DocumentTree, Footer, Node, PageGeometry, Paragraph, RunStyle,
    Section, TextRun,
};
use crate::normalize::FIELD_PLACEHOLDER;
use crate::style::{StyleSet, TemplateKind, TEXT_MUTED, TEXT_PRIMARY};

/// Assemble a full document tree for the given brand.
///
/// `order` is the caller-preferred section order; roles it omits are
/// appended in canonical order so the output is always structurally
/// complete.
pub fn assemble(
    kind: TemplateKind,
    ctx: &BuildContext,
    order: &[SectionRole],
) -> Result<DocumentTree> {
    match kind {
        TemplateKind::Modern => assemble_modern(ctx, order),
        TemplateKind::Formal => assemble_formal(ctx, order),
        TemplateKind::Technical => assemble_technical(ctx, order),
        TemplateKind::Default => assemble_default(ctx, order),
    }
}

fn assemble_modern(ctx: &BuildContext, order: &[SectionRole]) -> Result<DocumentTree> {
    let style = ctx.style;
    let builder = builder_for(TemplateKind::Modern);

    let mut section = Section::new(
        PageGeometry::a4(36.0),
        Footer::centered(
            "This is a computer-generated quotation and requires no physical signature.",
            7.5,
            TEXT_MUTED,
        ),
    );

    for role in complete_order(order) {
        push_section(&mut section, builder, role, ctx, style.spacing.section_gap)?;
        if role == SectionRole::Header {
            let (reference, date) = title_fields(ctx);
            section.push(Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold("QUOTATION")
                    .with_color(style.palette.primary.clone())
                    .with_size(style.typography.header.size - 2.0)])
                .space_after(style.spacing.line_gap),
            ));
            section.push(Node::text(format!("Ref: {reference}   Date: {date}")));
            section.push(Node::spacer(style.spacing.section_gap));
        }
    }

    trim_trailing_spacer(&mut section);
    Ok(DocumentTree::new(document_styles(style), section))
}

fn assemble_formal(ctx: &BuildContext, order: &[SectionRole]) -> Result<DocumentTree> {
    let style = ctx.style;
    let builder = builder_for(TemplateKind::Formal);

    let mut section = Section::new(
        PageGeometry::a4(48.0),
        Footer::centered(
            "This quotation is issued subject to the terms stated herein.",
            8.0,
            TEXT_MUTED,
        ),
    );

    for role in complete_order(order) {
        push_section(&mut section, builder, role, ctx, style.spacing.section_gap)?;
        if role == SectionRole::Header {
            let (reference, date) = title_fields(ctx);
            section.push(Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold("Q U O T A T I O N")
                    .with_color(style.palette.primary.clone())])
                .align(Alignment::Center)
                .space_after(style.spacing.line_gap),
            ));
            section.push(Node::Paragraph(
                Paragraph::with_text(format!("Ref. No.: {reference}  \u{2014}  Dated: {date}"))
                    .align(Alignment::Center),
            ));
            section.push(Node::spacer(style.spacing.section_gap));
        }
    }

    trim_trailing_spacer(&mut section);
    Ok(DocumentTree::new(document_styles(style), section))
}

fn assemble_technical(ctx: &BuildContext, order: &[SectionRole]) -> Result<DocumentTree> {
    let style = ctx.style;
    let builder = builder_for(TemplateKind::Technical);

    let mut section = Section::new(
        PageGeometry::a4(32.0),
        Footer::centered("computer generated quotation / no signature required", 7.0, TEXT_MUTED),
    );

    for role in complete_order(order) {
        push_section(&mut section, builder, role, ctx, style.spacing.section_gap)?;
        if role == SectionRole::Header {
            let (reference, date) = title_fields(ctx);
            section.push(Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold("[ QUOTATION ]")
                    .with_color(style.palette.primary.clone())])
                .space_after(style.spacing.line_gap),
            ));
            section.push(Node::text(format!("ref: {reference} / date: {date}")));
            section.push(Node::spacer(style.spacing.section_gap));
        }
    }

    trim_trailing_spacer(&mut section);
    Ok(DocumentTree::new(document_styles(style), section))
}

fn assemble_default(ctx: &BuildContext, order: &[SectionRole]) -> Result<DocumentTree> {
    let style = ctx.style;
    let builder = builder_for(TemplateKind::Default);

    let mut section = Section::new(
        PageGeometry::a4(40.0),
        Footer::centered("This is a computer generated quotation.", 8.0, TEXT_MUTED),
    );

    for role in complete_order(order) {
        push_section(&mut section, builder, role, ctx, style.spacing.section_gap)?;
        if role == SectionRole::Header {
            let (reference, date) = title_fields(ctx);
            section.push(Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold("QUOTATION")])
                    .space_after(style.spacing.line_gap),
            ));
            section.push(Node::text(format!("Ref: {reference}   Date: {date}")));
            section.push(Node::spacer(style.spacing.section_gap));
        }
    }

    trim_trailing_spacer(&mut section);
    Ok(DocumentTree::new(document_styles(style), section))
}

/// Build one section and append it, substituting an inline placeholder
/// on failure. The client block is the documented exception: its
/// missing-quotation error propagates instead of degrading.
fn push_section(
    section: &mut Section,
    builder: &dyn SectionBuilder,
    role: SectionRole,
    ctx: &BuildContext,
    gap: f32,
) -> Result<()> {
    match builder.build(role, ctx) {
        Ok(node) => {
            section.push(node);
            section.push(Node::spacer(gap));
            Ok(())
        }
        Err(err @ Error::MissingQuotation) if role == SectionRole::ClientBlock => Err(err),
        Err(err) => {
            let failure = Error::SectionBuild {
                section: role,
                reason: err.to_string(),
            };
            log::warn!("{failure}; substituting placeholder");
            section.push(placeholder_node(role));
            section.push(Node::spacer(gap));
            Ok(())
        }
    }
}

/// The inline text shown where a failed section would have been.
fn placeholder_node(role: SectionRole) -> Node {
    Node::Paragraph(Paragraph::from_runs(vec![TextRun::new(format!(
        "[{role} could not be rendered]"
    ))
    .with_color(TEXT_MUTED)]))
}

/// Dedup a preferred order and append any missing roles in canonical
/// order, so every document carries all six sections.
fn complete_order(preferred: &[SectionRole]) -> Vec<SectionRole> {
    let mut order: Vec<SectionRole> = Vec::with_capacity(SectionRole::CANONICAL_ORDER.len());
    for role in preferred {
        if !order.contains(role) {
            order.push(*role);
        }
    }
    for role in SectionRole::CANONICAL_ORDER {
        if !order.contains(&role) {
            order.push(role);
        }
    }
    order
}

/// Reference and date for the title block, with placeholders when the
/// quotation is absent.
fn title_fields(ctx: &BuildContext) -> (String, String) {
    match ctx.quotation {
        Some(quotation) => {
            let reference = quotation.data.quotation_ref.trim();
            let reference = if reference.is_empty() {
                FIELD_PLACEHOLDER.to_string()
            } else {
                reference.to_string()
            };
            (reference, format_quotation_date(&quotation.data.quotation_date))
        }
        None => (FIELD_PLACEHOLDER.to_string(), FIELD_PLACEHOLDER.to_string()),
    }
}

/// All four brands publish the same style keys.
fn document_styles(style: &StyleSet) -> DocumentStyles {
    let typography = &style.typography;
    let mut header_style = RunStyle::new(
        typography.header.family.clone(),
        typography.header.size,
        style.palette.primary.clone(),
    );
    if typography.header.bold {
        header_style = header_style.bold();
    }
    let mut label_style = RunStyle::new(
        typography.label.family.clone(),
        typography.label.size,
        TEXT_PRIMARY,
    );
    if typography.label.bold {
        label_style = label_style.bold();
    }

    DocumentStyles::new(RunStyle::new(
        typography.body.family.clone(),
        typography.body.size,
        TEXT_PRIMARY,
    ))
    .with_named("header", header_style)
    .with_named("label", label_style)
    .with_named(
        "table",
        RunStyle::new(typography.table.family.clone(), typography.table.size, TEXT_PRIMARY),
    )
    .with_named("footer", RunStyle::new(typography.body.family.clone(), 7.5, TEXT_MUTED))
}

fn trim_trailing_spacer(section: &mut Section) {
    if matches!(section.children.last(), Some(Node::Spacer { .. })) {
        section.children.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SectionResult;
    use crate::model::QuotationData;
    use crate::normalize::{normalize_company, normalize_quotation};
    use crate::seal::SealOutcome;

    fn assemble_with_quotation(kind: TemplateKind) -> DocumentTree {
        let company = normalize_company(&crate::model::Company::new("c1", "Acme"));
        let quotation = normalize_quotation(&QuotationData::new("Q-1", "2024-03-15"), None);
        let style = StyleSet::for_kind(kind);
        let ctx = BuildContext {
            company: Some(&company),
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };
        assemble(kind, &ctx, &[]).unwrap()
    }

    #[test]
    fn test_all_brands_emit_same_outer_schema() {
        for kind in [
            TemplateKind::Modern,
            TemplateKind::Formal,
            TemplateKind::Technical,
            TemplateKind::Default,
        ] {
            let tree = assemble_with_quotation(kind);
            assert!(tree.child_count() > 6, "{kind} produced a sparse body");
            assert!(tree.styles.get("header").is_some());
            assert!(tree.styles.get("table").is_some());
            assert!(!tree.section.footer.text.is_empty());
            assert!(tree.plain_text().contains("Q-1"));
            assert!(tree.plain_text().contains("15 Mar 2024"));
        }
    }

    #[test]
    fn test_missing_quotation_propagates_from_client_block() {
        let company = normalize_company(&crate::model::Company::new("c1", "Acme"));
        let style = StyleSet::for_kind(TemplateKind::Default);
        let ctx = BuildContext {
            company: Some(&company),
            quotation: None,
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let err = assemble(TemplateKind::Default, &ctx, &[]).unwrap_err();
        assert!(matches!(err, Error::MissingQuotation));
    }

    #[test]
    fn test_complete_order_appends_missing_roles() {
        let order = complete_order(&[SectionRole::ItemsTable, SectionRole::Header]);
        assert_eq!(order.len(), 6);
        assert_eq!(order[0], SectionRole::ItemsTable);
        assert_eq!(order[1], SectionRole::Header);
        assert!(order.contains(&SectionRole::Signature));

        let order = complete_order(&[SectionRole::Header, SectionRole::Header]);
        assert_eq!(order.len(), 6);
    }

    #[test]
    fn test_placeholder_substitution_for_failing_section() {
        struct FailingBuilder;

        impl SectionBuilder for FailingBuilder {
            fn template_kind(&self) -> TemplateKind {
                TemplateKind::Default
            }
            fn header(&self, _ctx: &BuildContext) -> SectionResult {
                Err(Error::Other("boom".to_string()))
            }
            fn client_block(&self, _ctx: &BuildContext) -> SectionResult {
                Err(Error::Other("boom".to_string()))
            }
            fn items_table(&self, _ctx: &BuildContext) -> SectionResult {
                Err(Error::Other("boom".to_string()))
            }
            fn terms(&self, _ctx: &BuildContext) -> SectionResult {
                Err(Error::Other("boom".to_string()))
            }
            fn bank_details(&self, _ctx: &BuildContext) -> SectionResult {
                Err(Error::Other("boom".to_string()))
            }
            fn signature(&self, _ctx: &BuildContext) -> SectionResult {
                Err(Error::Other("boom".to_string()))
            }
        }

        let style = StyleSet::for_kind(TemplateKind::Default);
        let ctx = BuildContext {
            company: None,
            quotation: None,
            style: &style,
            seal: &SealOutcome::Absent,
        };
        let mut section = Section::new(
            PageGeometry::a4(40.0),
            Footer::centered("f", 8.0, TEXT_MUTED),
        );

        // non-client sections degrade to placeholders
        push_section(&mut section, &FailingBuilder, SectionRole::Header, &ctx, 10.0).unwrap();
        assert!(section.plain_text().contains("header could not be rendered"));

        // a client-block failure that is not MissingQuotation also degrades
        push_section(
            &mut section,
            &FailingBuilder,
            SectionRole::ClientBlock,
            &ctx,
            10.0,
        )
        .unwrap();
        assert!(section.plain_text().contains("client block could not be rendered"));
    }

    #[test]
    fn test_custom_section_order_is_honored() {
        let company = normalize_company(&crate::model::Company::new("c1", "Acme"));
        let quotation = normalize_quotation(&QuotationData::new("Q-1", "2024-03-15"), None);
        let style = StyleSet::for_kind(TemplateKind::Modern);
        let ctx = BuildContext {
            company: Some(&company),
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let tree = assemble(
            TemplateKind::Modern,
            &ctx,
            &[SectionRole::Header, SectionRole::Signature],
        )
        .unwrap();

        // signature lands right after the header and title block
        let text = tree.plain_text();
        let signature_at = text.find("Authorised Signatory").unwrap();
        let terms_at = text.find("Terms & Conditions").unwrap();
        assert!(signature_at < terms_at);
    }
}
