//! Modern brand: saturated banner header, two-column grids, striped
//! tables.

use super::{
    bank_rows, item_values, summary_values, BuildContext, SectionBuilder, SectionResult,
    LEAD_TIME_COLUMN, MAKE_COLUMN, SEAL_ABSENT_TEXT, SEAL_FAILED_TEXT, TERMS_BOILERPLATE,
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
const SEAL_WIDTH: f32 = 90.0;

/// Builder set for the modern brand.
pub struct ModernBuilder;

impl ModernBuilder {
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
                Paragraph::from_runs(vec![TextRun::new(SEAL_FAILED_TEXT).with_color(ERROR_RED)])
                    .align(Alignment::Right),
            ),
            SealOutcome::Absent => Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::new(SEAL_ABSENT_TEXT).with_color(TEXT_MUTED)])
                    .align(Alignment::Right),
            ),
        }
    }
}

impl SectionBuilder for ModernBuilder {
    fn template_kind(&self) -> TemplateKind {
        TemplateKind::Modern
    }

    fn header(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let typography = &style.typography;

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
            .with_size(typography.header.size)
            .with_font(typography.header.family.clone())]);
        name_line.style.space_after = style.spacing.line_gap;

        let banner = TableCell {
            paragraphs: vec![
                name_line,
                Paragraph::from_runs(vec![TextRun::new(address).with_color(BANNER_TEXT)]),
                Paragraph::from_runs(vec![
                    TextRun::new(format!("Phone: {phone}  |  Email: {email}"))
                        .with_color(BANNER_TEXT),
                ]),
                Paragraph::from_runs(vec![TextRun::new(format!(
                    "GSTIN: {gstin}  |  PAN: {pan}"
                ))
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
        let style = ctx.style;
        let bill_to = &quotation.bill_to;

        let heading = |text: &str| {
            Paragraph::from_runs(vec![TextRun::bold(text)
                .with_color(style.palette.primary.clone())
                .with_size(style.typography.label.size)])
        };

        let left = vec![
            Node::Paragraph(heading("QUOTED TO")),
            Node::Paragraph(Paragraph::from_runs(vec![TextRun::bold(&bill_to.name)])),
            Node::text(bill_to.company.clone()),
            Node::text(bill_to.address.clone()),
        ];
        let right = vec![
            Node::Paragraph(heading("CONTACT")),
            Node::text(format!("Contact Person: {}", bill_to.contact_person)),
            Node::text(format!("Phone: {}", bill_to.phone)),
            Node::text(format!("Email: {}", bill_to.email)),
        ];

        Ok(Node::Columns(
            Columns::new(style.spacing.section_gap)
                .with_column(left)
                .with_column(right),
        ))
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
                    .enumerate()
                    .map(|(column, value)| {
                        if column == MAKE_COLUMN || column == LEAD_TIME_COLUMN {
                            TableCell::paragraph(Paragraph::from_runs(vec![TextRun::new(value)
                                .with_color(style.palette.secondary.clone())]))
                        } else {
                            TableCell::text(value.clone())
                        }
                    })
                    .collect();

                let mut row = TableRow::new(cells);
                if let Some(fill) = alternating_fill(&style.palette.primary, index) {
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
                row = row
                    .with_border_top(BorderStyle::Double)
                    .with_fill(style.palette.background.clone());
            }
            table.add_row(row);
        }

        Ok(Node::Table(table))
    }

    fn terms(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let mut nodes = vec![Node::Paragraph(
            Paragraph::from_runs(vec![TextRun::bold("Terms & Conditions")
                .with_color(style.palette.primary.clone())])
            .space_after(style.spacing.line_gap),
        )];

        for line in TERMS_BOILERPLATE {
            nodes.push(Node::text(format!("\u{2022} {line}")));
        }

        if let Some(data) = ctx.quotation.map(|quotation| &quotation.data) {
            if let Some(terms) = data.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) {
                nodes.push(Node::text(format!("\u{2022} Payment: {terms}")));
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
                TextRun::bold("Bank Details").with_color(BANNER_TEXT),
            ]))
            .colspan(2)])
            .with_fill(style.palette.primary.clone()),
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
    use crate::normalize::{normalize_company, normalize_quotation};
    use crate::style::StyleSet;

    fn context_parts() -> (crate::normalize::NormalizedCompany, crate::normalize::NormalizedQuotation, StyleSet)
    {
        let company = crate::model::Company::new("c1", "Chembio Lifesciences");
        let mut quotation = QuotationData::new("Q-1", "2024-03-15");
        quotation.add_item(
            crate::model::LineItem::new(1, "CB-100", "Buffer solution").with_amounts(
                2.0, 450.0, 900.0,
            ),
        );
        (
            normalize_company(&company),
            normalize_quotation(&quotation, None),
            StyleSet::for_kind(TemplateKind::Modern),
        )
    }

    #[test]
    fn test_header_banner_uses_primary() {
        let (company, quotation, style) = context_parts();
        let ctx = BuildContext {
            company: Some(&company),
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let node = ModernBuilder.header(&ctx).unwrap();
        match node {
            Node::Table(table) => {
                assert_eq!(table.rows[0].fill.as_deref(), Some(style.palette.primary.as_str()));
                assert!(table.plain_text().contains("Chembio Lifesciences"));
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_header_tolerates_missing_company() {
        let (_, quotation, style) = context_parts();
        let ctx = BuildContext {
            company: None,
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let node = ModernBuilder.header(&ctx).unwrap();
        assert!(node.plain_text().contains(NAME_FALLBACK));
        assert!(node.plain_text().contains(ADDRESS_FALLBACK));
    }

    #[test]
    fn test_client_block_requires_quotation() {
        let (company, _, style) = context_parts();
        let ctx = BuildContext {
            company: Some(&company),
            quotation: None,
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let err = ModernBuilder.client_block(&ctx).unwrap_err();
        assert!(matches!(err, Error::MissingQuotation));
    }

    #[test]
    fn test_items_table_row_counts() {
        let (company, quotation, style) = context_parts();
        let ctx = BuildContext {
            company: Some(&company),
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let node = ModernBuilder.items_table(&ctx).unwrap();
        match node {
            // 1 header + 1 item + 4 summary
            Node::Table(table) => assert_eq!(table.row_count(), 6),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_signature_seal_failure_is_red() {
        let (company, quotation, style) = context_parts();
        let seal = SealOutcome::LoadFailed {
            url: "https://example.com/seal.png".to_string(),
            reason: "404".to_string(),
        };
        let ctx = BuildContext {
            company: Some(&company),
            quotation: Some(&quotation),
            style: &style,
            seal: &seal,
        };

        let node = ModernBuilder.signature(&ctx).unwrap();
        let text = node.plain_text();
        assert!(text.contains("For Chembio Lifesciences"));
        assert!(text.contains(SEAL_FAILED_TEXT));
    }
}
