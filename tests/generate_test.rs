//! Integration tests for end-to-end document generation.

use quotedoc::builder::{builder_for, BuildContext, SectionBuilder};
use quotedoc::model::{
    BillTo, Branding, Company, DocumentTree, LineItem, Node, QuotationData, TemplateConfig,
};
use quotedoc::normalize::{normalize_company, normalize_quotation, FIELD_PLACEHOLDER};
use quotedoc::select::{Tier, TierOutcome};
use quotedoc::style::{StyleSet, TemplateKind};
use quotedoc::{Quotedoc, SealOutcome};

fn composer() -> Quotedoc {
    Quotedoc::new().offline()
}

fn sample_quotation() -> QuotationData {
    let mut quotation = QuotationData::new("Q-2024-001", "2024-03-15")
        .with_bill_to(BillTo {
            name: "Dr. Rao".to_string(),
            company: "National Chemical Laboratory".to_string(),
            address: "Pashan Road, Pune".to_string(),
            phone: "+91 20 5550 1234".to_string(),
            email: "stores@ncl.example".to_string(),
            contact_person: Some("Stores Officer".to_string()),
        })
        .with_totals(900.0, 162.0, -2.0, 1060.0);
    quotation.add_item(
        LineItem::new(1, "CB-100", "Phosphate buffer solution")
            .with_amounts(2.0, 450.0, 900.0)
            .with_make("Merck"),
    );
    quotation
}

fn branded_company(template_type: &str) -> Company {
    Company::new("chembio-lifesciences", "Chembio Lifesciences")
        .with_template_config(TemplateConfig::with_type(template_type))
}

/// All color tokens (fills, borders, run colors) reachable from a node.
fn collect_colors(node: &Node, colors: &mut Vec<String>) {
    match node {
        Node::Paragraph(paragraph) => {
            if let Some(fill) = &paragraph.style.fill {
                colors.push(fill.clone());
            }
            for run in &paragraph.runs {
                if let Some(color) = &run.color {
                    colors.push(color.clone());
                }
            }
        }
        Node::Table(table) => {
            if let Some(border) = &table.border_color {
                colors.push(border.clone());
            }
            for row in &table.rows {
                if let Some(fill) = &row.fill {
                    colors.push(fill.clone());
                }
                for cell in &row.cells {
                    if let Some(fill) = &cell.fill {
                        colors.push(fill.clone());
                    }
                    for paragraph in &cell.paragraphs {
                        for run in &paragraph.runs {
                            if let Some(color) = &run.color {
                                colors.push(color.clone());
                            }
                        }
                    }
                }
            }
        }
        Node::Columns(columns) => {
            for node in columns.columns.iter().flatten() {
                collect_colors(node, colors);
            }
        }
        Node::Image(_) | Node::Spacer { .. } => {}
    }
}

/// Top-level node kinds, ignoring spacers.
fn node_kinds(tree: &DocumentTree) -> Vec<&'static str> {
    tree.section
        .children
        .iter()
        .filter_map(|node| match node {
            Node::Paragraph(_) => Some("paragraph"),
            Node::Table(_) => Some("table"),
            Node::Columns(_) => Some("columns"),
            Node::Image(_) => Some("image"),
            Node::Spacer { .. } => None,
        })
        .collect()
}

/// The items table is the one with eleven columns in its header row.
fn items_table(tree: &DocumentTree) -> &quotedoc::model::Table {
    tree.section
        .children
        .iter()
        .find_map(|node| match node {
            Node::Table(table) if table.column_count() == 11 => Some(table),
            _ => None,
        })
        .expect("items table present")
}

#[tokio::test]
async fn scenario_a_modern_with_color_override() {
    let mut company = branded_company("modern");
    if let Some(config) = company.template_config.as_mut() {
        config.color_scheme.primary = Some("#0066CC".to_string());
    }

    let result = composer()
        .generate(Some(&company), Some(&sample_quotation()))
        .await;

    // resolved at the config tier, no fallback
    assert_eq!(result.template(), Some(TemplateKind::Modern));
    assert!(result
        .trace
        .steps()
        .iter()
        .any(|step| step.tier == Tier::ConfigType
            && step.outcome == TierOutcome::Selected(TemplateKind::Modern)));

    // header banner carries the overridden primary
    let header = result
        .tree
        .section
        .children
        .first()
        .expect("non-empty body");
    let mut colors = Vec::new();
    collect_colors(header, &mut colors);
    assert!(colors.contains(&"#0066CC".to_string()));

    // 1 header row + 1 item row + 4 summary rows
    assert_eq!(items_table(&result.tree).row_count(), 6);
}

#[tokio::test]
async fn scenario_b_formal_with_no_items() {
    let company = branded_company("formal");
    let mut quotation = sample_quotation();
    quotation.items.clear();
    quotation = quotation.with_totals(0.0, 0.0, 0.0, 0.0);

    let result = composer().generate(Some(&company), Some(&quotation)).await;
    assert_eq!(result.template(), Some(TemplateKind::Formal));

    let table = items_table(&result.tree);
    // header row + 4 summary rows survive an empty item list
    assert_eq!(table.row_count(), 5);
    let text = table.plain_text();
    assert!(text.contains("Sub Total"));
    assert!(text.contains("\u{20B9}0.00"));
}

#[tokio::test]
async fn scenario_c_missing_company_uses_default_tier() {
    let quotation = sample_quotation();

    let result = composer().generate(None, Some(&quotation)).await;
    assert!(!result.trace.is_last_resort());
    assert!(result
        .trace
        .steps()
        .iter()
        .any(|step| step.tier == Tier::Default
            && step.outcome == TierOutcome::Selected(TemplateKind::Default)));

    // structurally identical to an ordinary default-tier document
    let unmatched = Company::new("acme", "Acme Corp");
    let reference = composer()
        .generate(Some(&unmatched), Some(&quotation))
        .await;
    assert_eq!(node_kinds(&result.tree), node_kinds(&reference.tree));
}

#[tokio::test]
async fn scenario_d_seal_fetch_failure_degrades_visibly() {
    let mut company = branded_company("modern");
    company.branding = Branding {
        primary_color: None,
        // the offline composer fails every fetch, standing in for an
        // unreachable resource
        seal_image_url: Some("https://unreachable.example/seal.png".to_string()),
    };

    let result = composer()
        .generate(Some(&company), Some(&sample_quotation()))
        .await;

    assert!(!result.trace.is_last_resort());
    assert!(result.tree.plain_text().contains("Seal image failed to load"));
}

#[tokio::test]
async fn scenario_e_empty_bill_to_renders_placeholders_in_every_brand() {
    let mut quotation = sample_quotation();
    quotation.bill_to = BillTo::default();
    let normalized = normalize_quotation(&quotation, None);
    let company = normalize_company(&Company::new("c1", "Acme"));

    for kind in [
        TemplateKind::Modern,
        TemplateKind::Formal,
        TemplateKind::Technical,
    ] {
        let style = StyleSet::for_kind(kind);
        let ctx = BuildContext {
            company: Some(&company),
            quotation: Some(&normalized),
            style: &style,
            seal: &SealOutcome::Absent,
        };

        let node = builder_for(kind).client_block(&ctx).unwrap();
        let text = node.plain_text();
        let placeholders = text.matches(FIELD_PLACEHOLDER).count();
        assert!(
            placeholders >= 6,
            "{kind} rendered {placeholders} placeholders: {text}"
        );
    }
}

#[tokio::test]
async fn missing_template_config_still_produces_full_document() {
    let company = Company::new("c1", "Acme Corp");
    assert!(company.template_config.is_none());

    let result = composer()
        .generate(Some(&company), Some(&sample_quotation()))
        .await;

    assert!(result.tree.child_count() > 0);
    assert!(result.tree.plain_text().contains("QUOTATION"));
    assert!(result.tree.plain_text().contains("Q-2024-001"));

    // defaulting is local and repeatable
    let again = composer()
        .generate(Some(&company), Some(&sample_quotation()))
        .await;
    assert_eq!(node_kinds(&result.tree), node_kinds(&again.tree));
}

#[tokio::test]
async fn each_known_template_type_uses_its_registry_primary() {
    for (template_type, kind) in [
        ("modern", TemplateKind::Modern),
        ("formal", TemplateKind::Formal),
        ("technical", TemplateKind::Technical),
    ] {
        let company = branded_company(template_type);
        let result = composer()
            .generate(Some(&company), Some(&sample_quotation()))
            .await;

        // the config tier resolved; no fallback tier ran
        assert_eq!(result.template(), Some(kind), "{template_type}");
        assert!(!result
            .trace
            .steps()
            .iter()
            .any(|step| step.tier == Tier::NameHeuristic || step.tier == Tier::IdLookup));

        let expected = StyleSet::for_kind(kind).palette.primary;
        let header = result.tree.section.children.first().expect("body");
        let mut colors = Vec::new();
        collect_colors(header, &mut colors);
        assert!(
            colors.contains(&expected),
            "{template_type} header missing {expected}, had {colors:?}"
        );
    }
}

#[tokio::test]
async fn unknown_template_type_matches_default_output_and_warns() {
    let company = Company::new("acme", "Acme Corp")
        .with_template_config(TemplateConfig::with_type("unknown"));

    let result = composer()
        .generate(Some(&company), Some(&sample_quotation()))
        .await;

    // observable warning in the trace
    assert!(result.trace.steps().iter().any(|step| {
        step.tier == Tier::ConfigType
            && step.outcome == TierOutcome::Failed
            && step.reason.contains("unknown template type")
    }));

    // structurally identical to the default-tier output
    let plain = Company::new("acme", "Acme Corp");
    let reference = composer()
        .generate(Some(&plain), Some(&sample_quotation()))
        .await;
    assert_eq!(node_kinds(&result.tree), node_kinds(&reference.tree));
    assert_eq!(reference.template(), Some(TemplateKind::Default));
}

#[tokio::test]
async fn identical_inputs_produce_structurally_equal_trees() {
    let company = branded_company("technical");
    let quotation = sample_quotation();

    let first = composer().generate(Some(&company), Some(&quotation)).await;
    let second = composer().generate(Some(&company), Some(&quotation)).await;

    assert_eq!(
        first.tree.to_json(false).unwrap(),
        second.tree.to_json(false).unwrap()
    );
}

#[tokio::test]
async fn malformed_item_values_render_verbatim() {
    let company = branded_company("modern");
    let mut quotation = sample_quotation();
    quotation.items[0].qty = f64::NAN;

    let result = composer().generate(Some(&company), Some(&quotation)).await;
    assert!(items_table(&result.tree).plain_text().contains("NaN"));
}

#[tokio::test]
async fn tree_json_survives_round_trip() {
    let company = branded_company("formal");
    let result = composer()
        .generate(Some(&company), Some(&sample_quotation()))
        .await;

    let json = result.tree.to_json(true).unwrap();
    let parsed: DocumentTree = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.child_count(), result.tree.child_count());
}
