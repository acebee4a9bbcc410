use super::super::domain::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of a single report cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(u64),
    Blank,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(value) => f.write_str(value),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Blank => Ok(()),
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map(CellValue::Text).unwrap_or(CellValue::Blank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleTag {
    Title,
    CategoryHeader,
    ColumnHeader,
    StatsHeader,
    StatsBody,
    RosterHeader,
}

impl StyleTag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CategoryHeader => "categoryHeader",
            Self::ColumnHeader => "columnHeader",
            Self::StatsHeader => "statsHeader",
            Self::StatsBody => "statsBody",
            Self::RosterHeader => "rosterHeader",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }
}

/// Visual treatment applied by the sink to every cell of a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
}

/// Rectangle `[row_start, row_end) x [col_start, col_end)` of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRegion {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
    pub style: StyleTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl StyleRegion {
    pub fn rows(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..self.row_end).contains(&row) && (self.col_start..self.col_end).contains(&col)
    }

    pub fn descriptor(&self) -> StyleDescriptor {
        match (self.style, self.category) {
            (StyleTag::Title, _) => StyleDescriptor {
                bold: true,
                font_size: Some(14),
                foreground: None,
                background: None,
            },
            (StyleTag::CategoryHeader, Some(Category::Supporter)) => StyleDescriptor {
                bold: true,
                font_size: None,
                foreground: Some(Rgb::WHITE),
                background: Some(Rgb::new(0.2, 0.4, 0.8)),
            },
            (StyleTag::CategoryHeader, _) => StyleDescriptor {
                bold: true,
                font_size: None,
                foreground: Some(Rgb::WHITE),
                background: Some(Rgb::new(0.8, 0.2, 0.2)),
            },
            (StyleTag::ColumnHeader, Some(Category::Leader)) => StyleDescriptor {
                bold: true,
                font_size: None,
                foreground: None,
                background: Some(Rgb::new(0.95, 0.8, 0.8)),
            },
            (StyleTag::ColumnHeader, Some(Category::Supporter)) => StyleDescriptor {
                bold: true,
                font_size: None,
                foreground: None,
                background: Some(Rgb::new(0.8, 0.85, 0.95)),
            },
            (StyleTag::ColumnHeader, None) => StyleDescriptor {
                bold: true,
                font_size: None,
                foreground: None,
                background: Some(Rgb::new(0.85, 0.85, 0.85)),
            },
            (StyleTag::StatsHeader, _) => StyleDescriptor {
                bold: true,
                font_size: None,
                foreground: Some(Rgb::WHITE),
                background: Some(Rgb::new(0.3, 0.3, 0.3)),
            },
            (StyleTag::StatsBody, _) => StyleDescriptor {
                bold: false,
                font_size: None,
                foreground: None,
                background: Some(Rgb::new(0.95, 0.95, 0.95)),
            },
            (StyleTag::RosterHeader, _) => StyleDescriptor {
                bold: true,
                font_size: None,
                foreground: Some(Rgb::WHITE),
                background: Some(Rgb::new(0.2, 0.4, 0.8)),
            },
        }
    }
}

/// Everything the sink needs: the full cell matrix and the regions to style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub matrix: Vec<Vec<CellValue>>,
    pub regions: Vec<StyleRegion>,
}

impl ReportPayload {
    pub fn row_count(&self) -> usize {
        self.matrix.len()
    }

    pub fn width(&self) -> usize {
        self.matrix.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.matrix.get(row).and_then(|cells| cells.get(col))
    }

    pub fn regions_tagged(&self, style: StyleTag) -> impl Iterator<Item = &StyleRegion> {
        self.regions.iter().filter(move |region| region.style == style)
    }
}
