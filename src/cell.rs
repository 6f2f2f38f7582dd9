use crate::address::CellPosition;
use serde::{Deserialize, Serialize};

/// Cell store key.
pub type CellKey = CellPosition;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Per-cell formatting. Every field is independent; `None` means
/// "use the default".
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CellStyle {
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_decoration: Option<TextDecoration>,
    pub text_align: Option<TextAlign>,
    pub background_color: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub number_format: Option<String>,
}

/// A style with the render-time defaults filled in. Color, size and
/// family stay `None` when they are inherited from the surrounding grid.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub text_align: TextAlign,
    pub background_color: String,
    pub color: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub number_format: Option<String>,
}

impl CellStyle {
    /// Shallow merge: fields set in `patch` overwrite, the rest are kept.
    pub fn merge(&mut self, patch: &CellStyle) {
        fn take<T: Clone>(slot: &mut Option<T>, patch: &Option<T>) {
            if let Some(v) = patch {
                *slot = Some(v.clone());
            }
        }
        take(&mut self.font_weight, &patch.font_weight);
        take(&mut self.font_style, &patch.font_style);
        take(&mut self.text_decoration, &patch.text_decoration);
        take(&mut self.text_align, &patch.text_align);
        take(&mut self.background_color, &patch.background_color);
        take(&mut self.color, &patch.color);
        take(&mut self.font_size, &patch.font_size);
        take(&mut self.font_family, &patch.font_family);
        take(&mut self.number_format, &patch.number_format);
    }

    pub fn resolved(&self) -> ResolvedStyle {
        ResolvedStyle {
            font_weight: self.font_weight.unwrap_or_default(),
            font_style: self.font_style.unwrap_or_default(),
            text_decoration: self.text_decoration.unwrap_or_default(),
            text_align: self.text_align.unwrap_or_default(),
            background_color: self
                .background_color
                .clone()
                .unwrap_or_else(|| "transparent".to_string()),
            color: self.color.clone(),
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            number_format: self.number_format.clone(),
        }
    }
}

/// What a cell holds. A missing store entry is equivalent to
/// `CellContent::default()`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CellContent {
    /// Displayed text; for formula cells the last evaluated result.
    pub value: String,
    /// Raw formula text including the leading `=`.
    pub formula: Option<String>,
    pub style: Option<CellStyle>,
}

impl CellContent {
    pub fn text(value: impl Into<String>) -> Self {
        CellContent {
            value: value.into(),
            formula: None,
            style: None,
        }
    }

    /// Interprets user input: text starting with `=` is a formula whose
    /// value is filled in by the next recalculation.
    pub fn from_input(input: &str) -> Self {
        if input.starts_with('=') {
            CellContent {
                value: String::new(),
                formula: Some(input.to_string()),
                style: None,
            }
        } else {
            Self::text(input)
        }
    }

    pub fn has_formula(&self) -> bool {
        self.formula.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn style_or_default(&self) -> CellStyle {
        self.style.clone().unwrap_or_default()
    }
}
