//! Formal brand: centered letterhead, ledger tables, restrained color.

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

const SEAL_WIDTH: f32 = 80.0;

/// Builder set for the formal brand.
pub struct FormalBuilder;

impl FormalBuilder {
    fn ledger_heading(&self, ctx: &BuildContext, text: &str) -> TableRow {
        TableRow::new(vec![TableCell::paragraph(Paragraph::from_runs(vec![
            TextRun::bold(text).with_color(ctx.style.palette.primary.clone()),
        ]))
        .colspan(2)])
        .with_fill(ctx.style.palette.background.clone())
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

impl SectionBuilder for FormalBuilder {
    fn template_kind(&self) -> TemplateKind {
        TemplateKind::Formal
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
            .with_color(style.palette.primary.clone())
            .with_size(typography.header.size)
            .with_font(typography.header.family.clone())])
        .align(Alignment::Center);
        name_line.style.space_after = style.spacing.line_gap;

        let letterhead = TableCell {
            paragraphs: vec![
                name_line,
                Paragraph::with_text(address).align(Alignment::Center),
                Paragraph::with_text(format!("Telephone: {phone} \u{2014} Email: {email}"))
                    .align(Alignment::Center),
                Paragraph::from_runs(vec![TextRun::new(format!("GSTIN: {gstin}   PAN: {pan}"))
                    .with_size(typography.label.size)])
                .align(Alignment::Center),
            ],
            colspan: 1,
            alignment: Alignment::Center,
            fill: None,
        };

        let mut table = Table::new()
            .with_border_color(style.palette.primary.clone())
            .with_cell_padding(style.spacing.cell_padding * 1.5);
        table.add_row(TableRow::new(vec![letterhead]));
        Ok(Node::Table(table))
    }

    fn client_block(&self, ctx: &BuildContext) -> SectionResult {
        let quotation = ctx.require_quotation()?;
        let style = ctx.style;
        let bill_to = &quotation.bill_to;

        let mut table = Table::new()
            .with_column_widths(vec![1.0, 2.8])
            .with_border_color(style.palette.border.clone())
            .with_cell_padding(style.spacing.cell_padding);

        table.add_row(self.ledger_heading(ctx, "Bill To"));

        let rows = [
            ("Name", bill_to.name.as_str()),
            ("Company", bill_to.company.as_str()),
            ("Contact Person", bill_to.contact_person.as_str()),
            ("Address", bill_to.address.as_str()),
            ("Telephone", bill_to.phone.as_str()),
            ("Email", bill_to.email.as_str()),
        ];
        for (label, value) in rows {
            table.add_row(TableRow::new(vec![
                TableCell::paragraph(Paragraph::from_runs(vec![TextRun::bold(label)])),
                TableCell::text(value),
            ]));
        }

        Ok(Node::Table(table))
    }

    fn items_table(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let data = ctx.quotation.map(|quotation| &quotation.data);

        let mut table = Table::new()
            .with_column_widths(vec![0.5, 1.0, 2.6, 0.9, 0.8, 0.5, 0.9, 0.6, 0.6, 0.9, 1.1])
            .with_border_color(style.palette.primary.clone())
            .with_cell_padding(style.spacing.cell_padding);

        let header_cells = [
            "S.No", "Cat No", "Description", "Make", "Pack Size", "Qty", "Unit Rate", "Disc %",
            "GST %", "Lead Time", "Amount",
        ]
        .iter()
        .map(|label| {
            TableCell::paragraph(Paragraph::from_runs(vec![
                TextRun::bold(*label).with_color(style.palette.primary.clone())
            ]))
            .align(Alignment::Center)
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
                                .with_color(style.palette.primary.clone())]))
                        } else {
                            TableCell::text(value.clone())
                        }
                    })
                    .collect();

                let mut row = TableRow::new(cells);
                if let Some(fill) = alternating_fill(&style.palette.secondary, index) {
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
        let style = ctx.style;
        let mut nodes = vec![Node::Paragraph(
            Paragraph::from_runs(vec![TextRun::bold("Terms and Conditions")
                .with_color(style.palette.primary.clone())])
            .space_after(style.spacing.line_gap),
        )];

        for (number, line) in TERMS_BOILERPLATE.iter().enumerate() {
            nodes.push(Node::text(format!("{}. {line}", number + 1)));
        }

        let mut next = TERMS_BOILERPLATE.len() + 1;
        if let Some(data) = ctx.quotation.map(|quotation| &quotation.data) {
            if let Some(terms) = data.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) {
                nodes.push(Node::text(format!("{next}. Payment: {terms}")));
                next += 1;
            }
            if let Some(notes) = data.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                nodes.push(Node::text(format!("{next}. {notes}")));
            }
        }

        Ok(Node::Columns(Columns::new(0.0).with_column(nodes)))
    }

    fn bank_details(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let mut table = Table::new()
            .with_column_widths(vec![1.0, 2.8])
            .with_border_color(style.palette.border.clone())
            .with_cell_padding(style.spacing.cell_padding);

        table.add_row(self.ledger_heading(ctx, "Banker's Details"));

        for (label, value) in bank_rows(ctx) {
            table.add_row(TableRow::new(vec![
                TableCell::paragraph(Paragraph::from_runs(vec![TextRun::bold(label)])),
                TableCell::text(value),
            ]));
        }

        Ok(Node::Table(table))
    }

    fn signature(&self, ctx: &BuildContext) -> SectionResult {
        let style = ctx.style;
        let signatory = ctx
            .company
            .map(|company| company.signatory_name.as_str())
            .unwrap_or(NAME_FALLBACK);

        let left = vec![Node::Paragraph(Paragraph::from_runs(vec![TextRun::new(
            "E. & O. E.",
        )
        .with_color(TEXT_MUTED)]))];

        let right = vec![
            Node::Paragraph(
                Paragraph::from_runs(vec![TextRun::bold(format!("For {signatory}"))])
                    .align(Alignment::Right)
                    .space_after(style.spacing.line_gap * 2.0),
            ),
            self.seal_node(ctx),
            Node::Paragraph(
                Paragraph::with_text("_____________________").align(Alignment::Right),
            ),
            Node::Paragraph(Paragraph::with_text("Authorised Signatory").align(Alignment::Right)),
        ];

        Ok(Node::Columns(
            Columns::new(style.spacing.section_gap)
                .with_column(left)
                .with_column(right),
        ))
    }
}
