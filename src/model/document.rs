//! Output document tree types.
//!
//! Every generation call constructs one [`DocumentTree`] from scratch: a
//! styles object plus a single section holding page geometry, a
//! persistent footer, and an ordered list of children. All four brand
//! assemblers emit this same outer schema, so a downstream packer can
//! serialize any of them uniformly.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The engine's output tree. Never cached, never mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    /// Default run style plus named styles referenced by nodes
    pub styles: DocumentStyles,

    /// The single document section
    pub section: Section,
}

impl DocumentTree {
    /// Create a tree from styles and a section.
    pub fn new(styles: DocumentStyles, section: Section) -> Self {
        Self { styles, section }
    }

    /// Number of direct children in the section body.
    pub fn child_count(&self) -> usize {
        self.section.children.len()
    }

    /// Serialize the tree to JSON for a downstream packer.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Plain text of the whole visible body.
    pub fn plain_text(&self) -> String {
        self.section.plain_text()
    }
}

/// Document-wide styling: one default run style and a deterministic map
/// of named styles (ordered so identical inputs serialize identically).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Style applied to every run that carries no override
    pub default_run: RunStyle,

    /// Named styles nodes may reference
    pub named: BTreeMap<String, RunStyle>,
}

impl DocumentStyles {
    /// Create styles with the given default run style.
    pub fn new(default_run: RunStyle) -> Self {
        Self {
            default_run,
            named: BTreeMap::new(),
        }
    }

    /// Insert a named style and return self.
    pub fn with_named(mut self, name: impl Into<String>, style: RunStyle) -> Self {
        self.named.insert(name.into(), style);
        self
    }

    /// Look up a named style.
    pub fn get(&self, name: &str) -> Option<&RunStyle> {
        self.named.get(name)
    }
}

/// A concrete text style entry in the styles object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStyle {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub color: String,
}

impl RunStyle {
    /// Create a regular-weight run style.
    pub fn new(font_family: impl Into<String>, font_size: f32, color: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            bold: false,
            color: color.into(),
        }
    }

    /// Mark the style bold and return self.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// The single section of a document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Page size and margins
    pub page: PageGeometry,

    /// Footer repeated on every rendered page
    pub footer: Footer,

    /// Ordered body content
    pub children: Vec<Node>,
}

impl Section {
    /// Create an empty section.
    pub fn new(page: PageGeometry, footer: Footer) -> Self {
        Self {
            page,
            footer,
            children: Vec::new(),
        }
    }

    /// Append a child node.
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Plain text of the section body.
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .map(Node::plain_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Page size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageGeometry {
    pub size: PageSize,
    pub margins: Margins,
}

impl PageGeometry {
    /// A4 page with uniform margins.
    pub fn a4(margin: f32) -> Self {
        Self {
            size: PageSize::A4,
            margins: Margins::uniform(margin),
        }
    }
}

/// Standard or custom page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageSize {
    /// 210 x 297 mm
    A4,
    /// 8.5 x 11 inches
    Letter,
    /// Explicit dimensions in points
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Dimensions in points (1 point = 1/72 inch).
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Equal margins on all sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Footer repeated on every page of the rendered document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footer {
    pub text: String,
    pub alignment: Alignment,
    pub font_size: f32,
    pub color: String,
}

impl Footer {
    /// Create a centered footer.
    pub fn centered(text: impl Into<String>, font_size: f32, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alignment: Alignment::Center,
            font_size,
            color: color.into(),
        }
    }
}

/// The six structural roles a quotation document is composed from.
///
/// Also the vocabulary of `templateConfig.sectionOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionRole {
    Header,
    ClientBlock,
    ItemsTable,
    Terms,
    BankDetails,
    Signature,
}

impl SectionRole {
    /// The canonical order sections appear in when no override is given.
    pub const CANONICAL_ORDER: [SectionRole; 6] = [
        SectionRole::Header,
        SectionRole::ClientBlock,
        SectionRole::ItemsTable,
        SectionRole::Terms,
        SectionRole::BankDetails,
        SectionRole::Signature,
    ];

    /// Lowercase display label.
    pub fn label(&self) -> &'static str {
        match self {
            SectionRole::Header => "header",
            SectionRole::ClientBlock => "client block",
            SectionRole::ItemsTable => "items table",
            SectionRole::Terms => "terms",
            SectionRole::BankDetails => "bank details",
            SectionRole::Signature => "signature",
        }
    }
}

impl fmt::Display for SectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A content node in the section body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A paragraph of text runs
    Paragraph(Paragraph),

    /// A table
    Table(Table),

    /// Side-by-side column groups
    Columns(Columns),

    /// An embedded image
    Image(ImageNode),

    /// Vertical whitespace between sections
    Spacer {
        /// Height in points
        height: f32,
    },
}

impl Node {
    /// Create a paragraph node from plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Paragraph(Paragraph::with_text(text))
    }

    /// Create a spacer node.
    pub fn spacer(height: f32) -> Self {
        Node::Spacer { height }
    }

    /// Check if this node is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Node::Table(_))
    }

    /// Check if this node is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Node::Paragraph(_))
    }

    /// Plain text content of the node, recursively.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Paragraph(paragraph) => paragraph.plain_text(),
            Node::Table(table) => table.plain_text(),
            Node::Columns(columns) => columns.plain_text(),
            Node::Image(image) => image.alt.clone().unwrap_or_default(),
            Node::Spacer { .. } => String::new(),
        }
    }
}

/// Side-by-side column groups, each holding its own node list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Columns {
    /// Gap between columns in points
    pub gap: f32,

    /// Column contents, left to right
    pub columns: Vec<Vec<Node>>,
}

impl Columns {
    /// Create a column layout with the given gap.
    pub fn new(gap: f32) -> Self {
        Self {
            gap,
            columns: Vec::new(),
        }
    }

    /// Append a column and return self.
    pub fn with_column(mut self, nodes: Vec<Node>) -> Self {
        self.columns.push(nodes);
        self
    }

    /// Plain text of all columns.
    pub fn plain_text(&self) -> String {
        self.columns
            .iter()
            .flatten()
            .map(Node::plain_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An image embedded directly in the tree as base64 data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageNode {
    /// Base64-encoded image bytes
    pub data: String,

    /// MIME type (e.g. "image/png")
    pub mime: String,

    /// Display width in points
    pub width: f32,

    /// Display height in points; packer derives it from the aspect
    /// ratio when absent
    pub height: Option<f32>,

    /// Alternative text
    pub alt: Option<String>,
}

/// A paragraph of styled text runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub runs: Vec<TextRun>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut paragraph = Self::new();
        paragraph.add_text(text);
        paragraph
    }

    /// Create a paragraph from prepared runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            style: ParagraphStyle::default(),
        }
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.runs.push(TextRun::new(text));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Set the alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.style.alignment = alignment;
        self
    }

    /// Set the background fill and return self.
    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.style.fill = Some(color.into());
        self
    }

    /// Set spacing after the paragraph and return self.
    pub fn space_after(mut self, points: f32) -> Self {
        self.style.space_after = points;
        self
    }

    /// Plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Check if the paragraph renders no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() || self.plain_text().trim().is_empty()
    }
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Alignment,

    /// Background fill color
    pub fill: Option<String>,

    /// Space before the paragraph in points
    pub space_before: f32,

    /// Space after the paragraph in points
    pub space_after: f32,
}

/// A run of text with optional style overrides over the default run style.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Bold weight
    pub bold: bool,

    /// Italic slant
    pub italic: bool,

    /// Font family override
    pub font_family: Option<String>,

    /// Font size override in points
    pub font_size: Option<f32>,

    /// Color override (hex string)
    pub color: Option<String>,
}

impl TextRun {
    /// Create a run with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    /// Set the color and return self.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the font size and return self.
    pub fn with_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the font family and return self.
    pub fn with_font(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

/// A table structure with per-row fills and border emphasis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Relative column widths (optional)
    pub column_widths: Option<Vec<f32>>,

    /// Border color (hex string)
    pub border_color: Option<String>,

    /// Cell padding in points
    pub cell_padding: f32,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set relative column widths and return self.
    pub fn with_column_widths(mut self, widths: Vec<f32>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    /// Set the border color and return self.
    pub fn with_border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    /// Set the cell padding and return self.
    pub fn with_cell_padding(mut self, padding: f32) -> Self {
        self.cell_padding = padding;
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on the first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|row| row.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows flagged as header rows.
    pub fn header_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|row| row.is_header)
    }

    /// Rows not flagged as header rows.
    pub fn body_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|row| !row.is_header)
    }

    /// Plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(TableRow::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,

    /// Background fill color for the whole row
    pub fill: Option<String>,

    /// Emphasis border above the row
    pub border_top: BorderStyle,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
            ..Default::default()
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Set the row fill and return self.
    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    /// Set the top border style and return self.
    pub fn with_border_top(mut self, border: BorderStyle) -> Self {
        self.border_top = border;
        self
    }

    /// Plain text representation of the row.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(TableCell::plain_text)
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// Border emphasis style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No extra border
    #[default]
    None,
    /// Single rule
    Single,
    /// Double rule, used for grand-total emphasis
    Double,
}

/// A table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub paragraphs: Vec<Paragraph>,

    /// Number of columns this cell spans
    pub colspan: u8,

    /// Cell alignment
    pub alignment: Alignment,

    /// Background fill for this cell only
    pub fill: Option<String>,
}

impl TableCell {
    /// Create a cell with plain text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![Paragraph::with_text(text)],
            colspan: 1,
            alignment: Alignment::Left,
            fill: None,
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self {
            colspan: 1,
            ..Default::default()
        }
    }

    /// Create a cell from a prepared paragraph.
    pub fn paragraph(paragraph: Paragraph) -> Self {
        Self {
            paragraphs: vec![paragraph],
            colspan: 1,
            alignment: Alignment::Left,
            fill: None,
        }
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u8) -> Self {
        self.colspan = span;
        self
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the cell fill and return self.
    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    /// Plain text content of the cell.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the cell renders no visible text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() || self.plain_text().trim().is_empty()
    }
}
