//! Neutral default builder set: the terminal fallback that renders any
//! input the tiers could not place with a brand.

use super::{
    bank_rows, item_values, summary_values, BuildContext, SectionBuilder, SectionResult,
    SEAL_ABSENT_TEXT, SEAL_FAILED_TEXT, TERMS_BOILERPLATE,
};
use crate::model::{
    Alignment, BorderStyle, Columns, ImageNode, Node, Paragraph, Table, TableCell, TableRow,
    TextRun,
};
use crate::normalize::{
    ADDRESS_FALLBACK, EMAIL_FALLBACK, GSTIN_FALLBACK, NAME_FALLBACK, PAN_FALLBACK, PHONE_FALLBACK,
};
use crate::seal::SealOutcome;
use crate::style::{alternating_fill, TemplateKind, ERROR_RED, TEXT_MUTED};

const BANNER_TEXT: &str = "#FFFFFF";
const SEAL_WIDTH: f32 = 85.0;

/// Builder set for the neutral default style.
pub struct DefaultBuilder;

impl DefaultBuilder {
    fn seal_node(&self, ctx: &BuildContext) -> Node {
        match ctx.seal {
            SealOutcome::Embedded(image) => Node::Image(ImageNode {
                data: image.data.clone(),
                mime: image.mime.clone(),
                width: SEAL_WIDTH,
                height: None,
                alt: Some("Company seal".to_string()),
            }),
            SealOutcome::LoadFailed { .. } => Node::Paragraph(
                Paragraph::from_runs(vec![
                    TextRun::new(SEAL_FAILED_TEXT).with_color(ERROR_RED)
                ])
                .align(Alignment::Right),
            ),
            SealOutcome::Absent => Node::Paragraph(
                Paragraph::from_runs(vec![
                    TextRun::new(SEAL_ABSENT_TEXT).with_color(TEXT_MUTED)
                ])
                .align(Alignment::Right),
            ),
        }
    }
}

impl SectionBuilder for DefaultBuilder {
    fn template_kind(&self) -> TemplateKind {
        TemplateKind::Default
    }

    fn header(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;

        let name = ctx
            .company
            .map(|company| company.display_name.as_str())
            .unwrap_or(NAME_FALLBACK);
        let address = ctx
            .company
            .map(|company| company.address.as_str())
            .unwrap_or(ADDRESS_FALLBACK);
        let phone = ctx
            .company
            .map(|company| company.phone.as_str())
            .unwrap_or(PHONE_FALLBACK);
        let email = ctx
            .company
            .map(|company| company.email.as_str())
            .unwrap_or(EMAIL_FALLBACK);
        let gstin = ctx
            .company
            .map(|company| company.gstin.as_str())
            .unwrap_or(GSTIN_FALLBACK);
        let pan = ctx
            .company
            .map(|company| company.pan.as_str())
            .unwrap_or(PAN_FALLBACK);

        let mut name_line = Paragraph::from_runs(vec![TextRun::bold(name)
            .with_color(BANNER_TEXT)
            .with_size(style.typography.header.size)]);
        name_line.style.space_after = style.spacing.line_gap;

        let banner = TableCell {
            paragraphs: vec![
                name_line,
                Paragraph::from_runs(vec![TextRun::new(address).with_color(BANNER_TEXT)]),
                Paragraph::from_runs(vec![
                    TextRun::new(format!("Phone: {phone}")).with_color(BANNER_TEXT)
                ]),
                Paragraph::from_runs(vec![
                    TextRun::new(format!("Email: {email}")).with_color(BANNER_TEXT)
                ]),
                Paragraph::from_runs(vec![TextRun::new(format!("GSTIN: {gstin}  PAN: {pan}"))
                    .with_color(BANNER_TEXT)]),
            ],
            colspan: 1,
            alignment: Alignment::Left,
            fill: None,
        };

        let mut table = Table::new().with_cell_padding(style.spacing.cell_padding * 2.0);
        table.add_row(TableRow::new(vec![banner]).with_fill(style.palette.primary.clone()));
        Ok(Node::Table(table))
    }

    fn client_block(&self, ctx: &BuildContext) -> SectionResult {
        let quotation = ctx.require_quotation()?;
        let bill_to = &quotation.bill_to;

        let nodes = vec![
            Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold("Bill To")])
                    .space_after(ctx.style.spacing.line_gap),
            ),
            Node::text(format!("Name: {}", bill_to.name)),
            Node::text(format!("Company: {}", bill_to.company)),
            Node::text(format!("Contact Person: {}", bill_to.contact_person)),
            Node::text(format!("Address: {}", bill_to.address)),
            Node::text(format!("Phone: {}", bill_to.phone)),
            Node::text(format!("Email: {}", bill_to.email)),
        ];

        Ok(Node::Columns(Columns::new(0.0).with_column(nodes)))
    }

    fn items_table(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let data = ctx.quotation.map(|quotation| &quotation.data);

        let mut table = Table::new()
            .with_column_widths(vec![0.5, 1.0, 2.6, 0.9, 0.8, 0.5, 0.9, 0.6, 0.6, 0.9, 1.1])
            .with_border_color(style.palette.border.clone())
            .with_cell_padding(style.spacing.cell_padding);

        let header_cells = [
            "S.No", "Cat No", "Description", "Make", "Pack Size", "Qty", "Unit Rate", "Disc %",
            "GST %", "Lead Time", "Amount",
        ]
        .iter()
        .map(|label| {
            TableCell::paragraph(Paragraph::from_runs(vec![
                TextRun::bold(*label).with_color(BANNER_TEXT)
            ]))
        })
        .collect();
        table.add_row(TableRow::header(header_cells).with_fill(style.palette.primary.clone()));

        if let Some(data) = data {
            for (index, item) in data.items.iter().enumerate() {
                let values = item_values(item);
                let cells = values
                    .iter()
                    .map(|value| TableCell::text(value.clone()))
                    .collect();

                let mut row = TableRow::new(cells);
                if let Some(fill) = alternating_fill(&style.palette.border, index) {
                    row = row.with_fill(fill);
                }
                table.add_row(row);
            }
        }

        let totals = data
            .map(summary_values)
            .unwrap_or_else(|| summary_values(&Default::default()));
        for (index, (label, amount)) in totals.iter().enumerate() {
            let grand_total = index == totals.len() - 1;
            let label_run = if grand_total {
                TextRun::bold(*label)
            } else {
                TextRun::new(*label)
            };
            let amount_run = if grand_total {
                TextRun::bold(amount.clone())
            } else {
                TextRun::new(amount.clone())
            };

            let mut row = TableRow::new(vec![
                TableCell::paragraph(Paragraph::from_runs(vec![label_run]))
                    .colspan(10)
                    .align(Alignment::Right),
                TableCell::paragraph(Paragraph::from_runs(vec![amount_run]))
                    .align(Alignment::Right),
            ]);
            if grand_total {
                row = row.with_border_top(BorderStyle::Double);
            }
            table.add_row(row);
        }

        Ok(Node::Table(table))
    }

    fn terms(&self, ctx: &BuildContext) -> SectionResult {
        let mut nodes = vec![Node::Paragraph(
            Paragraph::from_runs(vec![TextRun::bold("Terms & Conditions")])
                .space_after(ctx.style.spacing.line_gap),
        )];

        for line in TERMS_BOILERPLATE {
            nodes.push(Node::text(format!("- {line}")));
        }

        if let Some(data) = ctx.quotation.map(|quotation| &quotation.data) {
            if let Some(terms) = data.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) {
                nodes.push(Node::text(format!("- Payment: {terms}")));
            }
            if let Some(notes) = data.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                nodes.push(Node::text(format!("Note: {notes}")));
            }
        }

        Ok(Node::Columns(Columns::new(0.0).with_column(nodes)))
    }

    fn bank_details(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let mut table = Table::new()
            .with_column_widths(vec![1.0, 2.4])
            .with_border_color(style.palette.border.clone())
            .with_cell_padding(style.spacing.cell_padding);

        table.add_row(
            TableRow::new(vec![TableCell::paragraph(Paragraph::from_runs(vec![
                TextRun::bold("Bank Details"),
            ]))
            .colspan(2)])
            .with_fill(style.palette.background.clone()),
        );

        for (label, value) in bank_rows(ctx) {
            table.add_row(TableRow::new(vec![
                TableCell::paragraph(Paragraph::from_runs(vec![TextRun::bold(label)])),
                TableCell::text(value),
            ]));
        }

        Ok(Node::Table(table))
    }

    fn signature(&self, ctx: &BuildContext) -> SectionResult {
        let signatory = ctx
            .company
            .map(|company| company.signatory_name.as_str())
            .unwrap_or(NAME_FALLBACK);

        let right = vec![
            Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold(format!("For {signatory}"))])
                    .align(Alignment::Right)
                    .space_after(ctx.style.spacing.line_gap * 2.0),
            ),
            self.seal_node(ctx),
            Node::Paragraph(Paragraph::with_text("Authorised Signatory").align(Alignment::Right)),
        ];

        Ok(Node::Columns(
            Columns::new(ctx.style.spacing.section_gap)
                .with_column(Vec::new())
                .with_column(right),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::QuotationData;
    use crate::normalize::{normalize_quotation, FIELD_PLACEHOLDER};
    use crate::style::StyleSet;

    fn style() -> StyleSet {
        StyleSet::for_kind(TemplateKind::Default)
    }

    #[test]
    fn test_every_section_succeeds_without_company() {
        let quotation = normalize_quotation(&QuotationData::default(), None);
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        assert!(DefaultBuilder.header(&ctx).is_ok());
        assert!(DefaultBuilder.client_block(&ctx).is_ok());
        assert!(DefaultBuilder.items_table(&ctx).is_ok());
        assert!(DefaultBuilder.terms(&ctx).is_ok());
        assert!(DefaultBuilder.bank_details(&ctx).is_ok());
        assert!(DefaultBuilder.signature(&ctx).is_ok());
    }

    #[test]
    fn test_header_prints_literals_for_missing_company() {
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: None,
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let text = DefaultBuilder.header(&ctx).unwrap().plain_text();
        assert!(text.contains(NAME_FALLBACK));
        assert!(text.contains(ADDRESS_FALLBACK));
        assert!(text.contains(GSTIN_FALLBACK));
    }

    #[test]
    fn test_client_block_requires_quotation_even_here() {
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: None,
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let err = DefaultBuilder.client_block(&ctx).unwrap_err();
        assert!(matches!(err, Error::MissingQuotation));
    }

    #[test]
    fn test_client_block_placeholders() {
        let quotation = normalize_quotation(&QuotationData::default(), None);
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let text = DefaultBuilder.client_block(&ctx).unwrap().plain_text();
        assert!(text.contains(&format!("Name: {FIELD_PLACEHOLDER}")));
        assert!(text.contains(&format!("Email: {FIELD_PLACEHOLDER}")));
    }

    #[test]
    fn test_deterministic_output() {
        let quotation = normalize_quotation(&QuotationData::default(), None);
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let first = DefaultBuilder.items_table(&ctx).unwrap();
        let second = DefaultBuilder.items_table(&ctx).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
