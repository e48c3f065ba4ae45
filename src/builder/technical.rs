//! Technical brand: monospace type, bracketed section labels, a color
//! bar instead of a filled banner.

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

const SEAL_WIDTH: f32 = 85.0;

/// Builder set for the technical brand.
pub struct TechnicalBuilder;

impl TechnicalBuilder {
    fn bracket_heading(&self, ctx: &BuildContext, text: &str) -> Paragraph {
        Paragraph::from_runs(vec![TextRun::bold(format!("[ {text} ]"))
            .with_color(ctx.style.palette.primary.clone())
            .with_size(ctx.style.typography.label.size)])
        .space_after(ctx.style.spacing.line_gap)
    }

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

impl SectionBuilder for TechnicalBuilder {
    fn template_kind(&self) -> TemplateKind {
        TemplateKind::Technical
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

        // narrow color bar on the left, identity block on the right
        let bar = TableCell::empty().with_fill(style.palette.primary.clone());

        let mut name_line = Paragraph::from_runs(vec![TextRun::bold(name)
            .with_color(style.palette.primary.clone())
            .with_size(typography.header.size)
            .with_font(typography.header.family.clone())]);
        name_line.style.space_after = style.spacing.line_gap;

        let identity = TableCell {
            paragraphs: vec![
                name_line,
                Paragraph::with_text(address),
                Paragraph::with_text(format!("tel: {phone} / mail: {email}")),
                Paragraph::with_text(format!("gstin: {gstin} / pan: {pan}")),
            ],
            colspan: 1,
            alignment: Alignment::Left,
            fill: Some(style.palette.background.clone()),
        };

        let mut table = Table::new()
            .with_column_widths(vec![0.06, 3.2])
            .with_cell_padding(style.spacing.cell_padding * 2.0);
        table.add_row(TableRow::new(vec![bar, identity]));
        Ok(Node::Table(table))
    }

    fn client_block(&self, ctx: &BuildContext) -> SectionResult {
        let quotation = ctx.require_quotation()?;
        let style = ctx.style;
        let bill_to = &quotation.bill_to;

        let mut nodes = vec![Node::Paragraph(self.bracket_heading(ctx, "QUOTED TO"))];

        let mut table = Table::new()
            .with_column_widths(vec![1.0, 3.0])
            .with_border_color(style.palette.border.clone())
            .with_cell_padding(style.spacing.cell_padding);

        let rows = [
            ("name", bill_to.name.as_str()),
            ("company", bill_to.company.as_str()),
            ("contact", bill_to.contact_person.as_str()),
            ("address", bill_to.address.as_str()),
            ("phone", bill_to.phone.as_str()),
            ("email", bill_to.email.as_str()),
        ];
        for (label, value) in rows {
            table.add_row(TableRow::new(vec![
                TableCell::paragraph(Paragraph::from_runs(vec![
                    TextRun::bold(label).with_color(style.palette.secondary.clone())
                ])),
                TableCell::text(value),
            ]));
        }
        nodes.push(Node::Table(table));

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
            "#", "cat_no", "description", "make", "pack", "qty", "rate", "disc%", "gst%", "lead",
            "amount",
        ]
        .iter()
        .map(|label| {
            TableCell::paragraph(Paragraph::from_runs(vec![
                TextRun::bold(*label).with_color(style.palette.primary.clone())
            ]))
        })
        .collect();
        table.add_row(TableRow::header(header_cells).with_fill(style.palette.background.clone()));

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
            let label_text = format!("{} =", label.to_lowercase());
            let label_run = if grand_total {
                TextRun::bold(label_text).with_color(style.palette.primary.clone())
            } else {
                TextRun::new(label_text)
            };
            let amount_run = if grand_total {
                TextRun::bold(amount.clone()).with_color(style.palette.primary.clone())
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
        let mut nodes = vec![Node::Paragraph(self.bracket_heading(ctx, "TERMS"))];

        for line in TERMS_BOILERPLATE {
            nodes.push(Node::text(format!("- {line}")));
        }

        if let Some(data) = ctx.quotation.map(|quotation| &quotation.data) {
            if let Some(terms) = data.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) {
                nodes.push(Node::text(format!("- payment: {terms}")));
            }
            if let Some(notes) = data.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                nodes.push(Node::text(format!("- note: {notes}")));
            }
        }

        Ok(Node::Columns(Columns::new(0.0).with_column(nodes)))
    }

    fn bank_details(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let mut nodes = vec![Node::Paragraph(self.bracket_heading(ctx, "BANK DETAILS"))];

        let mut table = Table::new()
            .with_column_widths(vec![1.0, 3.0])
            .with_border_color(style.palette.border.clone())
            .with_cell_padding(style.spacing.cell_padding);

        for (label, value) in bank_rows(ctx) {
            table.add_row(TableRow::new(vec![
                TableCell::paragraph(Paragraph::from_runs(vec![TextRun::bold(
                    label.to_lowercase(),
                )
                .with_color(style.palette.secondary.clone())])),
                TableCell::text(value),
            ]));
        }
        nodes.push(Node::Table(table));

        Ok(Node::Columns(Columns::new(0.0).with_column(nodes)))
    }

    fn signature(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let signatory = ctx
            .company
            .map(|company| company.signatory_name.as_str())
            .unwrap_or(NAME_FALLBACK);

        let left = vec![Node::Paragraph(self.bracket_heading(ctx, "AUTHORISATION"))];
        let right = vec![
            Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold(format!("For {signatory}"))])
                    .align(Alignment::Right)
                    .space_after(style.spacing.line_gap * 2.0),
            ),
            self.seal_node(ctx),
            Node::Paragraph(Paragraph::with_text("Authorised Signatory").align(Alignment::Right)),
        ];

        Ok(Node::Columns(
            Columns::new(style.spacing.section_gap)
                .with_column(left)
                .with_column(right),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{LineItem, QuotationData};
    use crate::normalize::{normalize_company, normalize_quotation};
    use crate::style::StyleSet;

    fn style() -> StyleSet {
        StyleSet::for_kind(TemplateKind::Technical)
    }

    #[test]
    fn test_header_color_bar_uses_primary() {
        let company = normalize_company(&crate::model::Company::new("c1", "Chemlab Synthesis"));
        let style = style();
        let ctx = BuildContext {
            company: Some(&company),
            quotation: None,
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let node = TechnicalBuilder.header(&ctx).unwrap();
        match node {
            Node::Table(table) => {
                let bar = &table.rows[0].cells[0];
                assert_eq!(bar.fill.as_deref(), Some(style.palette.primary.as_str()));
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_client_block_requires_quotation() {
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: None,
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let err = TechnicalBuilder.client_block(&ctx).unwrap_err();
        assert!(matches!(err, Error::MissingQuotation));
    }

    #[test]
    fn test_items_emphasis_on_make_and_lead_time() {
        let mut data = QuotationData::default();
        data.add_item(
            LineItem::new(1, "CL-1", "Reagent")
                .with_make("Sigma")
                .with_amounts(1.0, 100.0, 100.0),
        );
        let quotation = normalize_quotation(&data, None);
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: Some(&quotation),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let node = TechnicalBuilder.items_table(&ctx).unwrap();
        match node {
            Node::Table(table) => {
                let item_row = &table.rows[1];
                let make_cell = &item_row.cells[MAKE_COLUMN];
                assert_eq!(
                    make_cell.paragraphs[0].runs[0].color.as_deref(),
                    Some(style.palette.secondary.as_str())
                );
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_signature_embeds_seal() {
        let seal = SealOutcome::Embedded(crate::seal::SealImage {
            data: "aGVsbG8=".to_string(),
            mime: "image/png".to_string(),
        });
        let style = style();
        let ctx = BuildContext {
            company: None,
            quotation: None,
            style: &style,
            seal: &seal,
        };

        let node = TechnicalBuilder.signature(&ctx).unwrap();
        match node {
            Node::Columns(columns) => {
                let has_image = columns
                    .columns
                    .iter()
                    .flatten()
                    .any(|node| matches!(node, Node::Image(_)));
                assert!(has_image);
            }
            other => panic!("expected columns, got {other:?}"),
        }
    }
}
