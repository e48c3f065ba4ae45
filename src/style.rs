//! Static style registry: palettes, typography and spacing per brand.
//!
//! Pure lookup data plus small color-derivation helpers. No I/O, no
//! branching beyond key lookup; per-company overrides from a
//! [`TemplateConfig`] are merged over the registry values.

use crate::model::{ColorScheme, TemplateConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default body text color shared by every brand.
pub const TEXT_PRIMARY: &str = "#1A1A1A";

/// Muted gray used for secondary labels and neutral placeholders.
pub const TEXT_MUTED: &str = "#8A8A8A";

/// Red used for visible load-failure placeholders.
pub const ERROR_RED: &str = "#D32F2F";

/// One of the fixed brand styles governing document visual structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Modern,
    Formal,
    Technical,
    /// Neutral style used when no brand tier resolves
    Default,
}

impl TemplateKind {
    /// Map a raw `templateType` config value to a known brand.
    ///
    /// Returns `None` for anything outside the known set; the selector
    /// routes those through its fallback tiers.
    pub fn from_config_value(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "modern" => Some(TemplateKind::Modern),
            "formal" => Some(TemplateKind::Formal),
            "technical" => Some(TemplateKind::Technical),
            _ => None,
        }
    }

    /// Lowercase display label.
    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::Modern => "modern",
            TemplateKind::Formal => "formal",
            TemplateKind::Technical => "technical",
            TemplateKind::Default => "default",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Brand color tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub border: String,
    pub background: String,
}

/// One font specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

impl FontSpec {
    fn new(family: &str, size: f32) -> Self {
        Self {
            family: family.to_string(),
            size,
            bold: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Brand typography tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub header: FontSpec,
    pub body: FontSpec,
    pub table: FontSpec,
    pub label: FontSpec,
}

/// Brand spacing constants, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub section_gap: f32,
    pub cell_padding: f32,
    pub line_gap: f32,
}

/// The full style set for one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    pub kind: TemplateKind,
    pub palette: Palette,
    pub typography: Typography,
    pub spacing: Spacing,
}

impl StyleSet {
    /// Look up the registry style set for a brand.
    pub fn for_kind(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Modern => Self {
                kind,
                palette: Palette {
                    primary: "#2563EB".to_string(),
                    secondary: "#0EA5E9".to_string(),
                    border: "#BFDBFE".to_string(),
                    background: "#EFF6FF".to_string(),
                },
                typography: Typography {
                    header: FontSpec::new("Helvetica", 16.0).bold(),
                    body: FontSpec::new("Helvetica", 9.5),
                    table: FontSpec::new("Helvetica", 9.0),
                    label: FontSpec::new("Helvetica", 8.5).bold(),
                },
                spacing: Spacing {
                    section_gap: 14.0,
                    cell_padding: 4.0,
                    line_gap: 2.0,
                },
            },
            TemplateKind::Formal => Self {
                kind,
                palette: Palette {
                    primary: "#1F2937".to_string(),
                    secondary: "#6B7280".to_string(),
                    border: "#9CA3AF".to_string(),
                    background: "#F3F4F6".to_string(),
                },
                typography: Typography {
                    header: FontSpec::new("Times New Roman", 15.0).bold(),
                    body: FontSpec::new("Times New Roman", 10.0),
                    table: FontSpec::new("Times New Roman", 9.5),
                    label: FontSpec::new("Times New Roman", 9.0).bold(),
                },
                spacing: Spacing {
                    section_gap: 18.0,
                    cell_padding: 6.0,
                    line_gap: 3.0,
                },
            },
            TemplateKind::Technical => Self {
                kind,
                palette: Palette {
                    primary: "#0F766E".to_string(),
                    secondary: "#EA580C".to_string(),
                    border: "#94A3B8".to_string(),
                    background: "#F0FDFA".to_string(),
                },
                typography: Typography {
                    header: FontSpec::new("Courier New", 14.0).bold(),
                    body: FontSpec::new("Courier New", 9.0),
                    table: FontSpec::new("Courier New", 8.5),
                    label: FontSpec::new("Courier New", 8.5).bold(),
                },
                spacing: Spacing {
                    section_gap: 12.0,
                    cell_padding: 3.0,
                    line_gap: 2.0,
                },
            },
            TemplateKind::Default => Self {
                kind,
                palette: Palette {
                    primary: "#4B5563".to_string(),
                    secondary: "#6B7280".to_string(),
                    border: "#D1D5DB".to_string(),
                    background: "#F9FAFB".to_string(),
                },
                typography: Typography {
                    header: FontSpec::new("Helvetica", 14.0).bold(),
                    body: FontSpec::new("Helvetica", 9.5),
                    table: FontSpec::new("Helvetica", 9.0),
                    label: FontSpec::new("Helvetica", 8.5).bold(),
                },
                spacing: Spacing {
                    section_gap: 16.0,
                    cell_padding: 4.0,
                    line_gap: 2.0,
                },
            },
        }
    }

    /// Apply a company's brand accent color. Config color-scheme
    /// overrides applied afterwards take precedence over this.
    pub fn with_primary(mut self, primary: Option<&str>) -> Self {
        if let Some(color) = primary {
            if !color.trim().is_empty() {
                self.palette.primary = color.trim().to_string();
            }
        }
        self
    }

    /// Merge per-company template-config overrides over the registry
    /// values.
    pub fn with_overrides(mut self, config: &TemplateConfig) -> Self {
        self.apply_color_scheme(&config.color_scheme);

        if let Some(family) = config.typography.font_family.as_deref() {
            if !family.trim().is_empty() {
                let family = family.trim().to_string();
                self.typography.header.family = family.clone();
                self.typography.body.family = family.clone();
                self.typography.table.family = family.clone();
                self.typography.label.family = family;
            }
        }
        if let Some(size) = config.typography.header_size {
            if size > 0.0 {
                self.typography.header.size = size;
            }
        }
        if let Some(size) = config.typography.body_size {
            if size > 0.0 {
                self.typography.body.size = size;
                self.typography.table.size = size;
            }
        }

        if let Some(gap) = config.spacing.section_gap {
            if gap >= 0.0 {
                self.spacing.section_gap = gap;
            }
        }
        if let Some(padding) = config.spacing.cell_padding {
            if padding >= 0.0 {
                self.spacing.cell_padding = padding;
            }
        }

        self
    }

    fn apply_color_scheme(&mut self, scheme: &ColorScheme) {
        if let Some(primary) = scheme.primary.as_deref() {
            if !primary.trim().is_empty() {
                self.palette.primary = primary.trim().to_string();
            }
        }
        if let Some(secondary) = scheme.secondary.as_deref() {
            if !secondary.trim().is_empty() {
                self.palette.secondary = secondary.trim().to_string();
            }
        }
        if let Some(border) = scheme.border.as_deref() {
            if !border.trim().is_empty() {
                self.palette.border = border.trim().to_string();
            }
        }
        if let Some(background) = scheme.background.as_deref() {
            if !background.trim().is_empty() {
                self.palette.background = background.trim().to_string();
            }
        }
    }
}

/// Fill color for a zero-indexed table body row: odd rows get a light
/// shade derived from `base`, even rows stay unfilled.
///
/// Returns `None` for even rows and for unparseable base colors.
pub fn alternating_fill(base: &str, row: usize) -> Option<String> {
    if row % 2 == 0 {
        return None;
    }
    lighten(base, 0.92)
}

/// Blend a hex color toward white by `amount` in `[0, 1]`.
///
/// Returns `None` when `base` is not a parseable hex color.
pub fn lighten(base: &str, amount: f32) -> Option<String> {
    let (r, g, b) = parse_hex(base)?;
    let amount = amount.clamp(0.0, 1.0);
    let blend = |channel: u8| -> u8 {
        let value = f32::from(channel) + (255.0 - f32::from(channel)) * amount;
        value.round() as u8
    };
    Some(format!("#{:02X}{:02X}{:02X}", blend(r), blend(g), blend(b)))
}

/// Parse `#RGB` or `#RRGGBB` into channel values.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut channels = hex.chars().filter_map(|c| c.to_digit(16));
            let r = channels.next()? as u8;
            let g = channels.next()? as u8;
            let b = channels.next()? as u8;
            Some((r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}
