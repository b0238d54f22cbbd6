//! Legend layout
//!
//! One centered row of entries above the plot area. Hidden series keep
//! their entry so they can be toggled back on.

use crate::geometry::{LayoutPoint, LayoutRect};
use crate::model::Color;
use crate::options::Direction;
use crate::render::TextMeasurer;
use serde::{Deserialize, Serialize};

/// Gap between swatch and text
const SWATCH_GAP: f64 = 6.0;
/// Gap between entries
const ENTRY_GAP: f64 = 16.0;

/// What a legend entry shows
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub series_id: String,
    pub title: String,
    pub color: Color,
    pub hidden: bool,
}

/// Layout for a legend entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntryLayout {
    pub series_id: String,
    pub text: String,
    pub color: Color,
    pub hidden: bool,
    /// Clickable area of the whole entry
    pub bounds: LayoutRect,
    pub swatch: LayoutRect,
    pub text_position: LayoutPoint,
}

/// Layout for the legend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub bounds: LayoutRect,
    pub font_size: f64,
    pub entries: Vec<LegendEntryLayout>,
}

impl LegendLayout {
    /// Height a legend row of `font_size` text occupies
    pub fn row_height(font_size: f64) -> f64 {
        font_size * 2.0
    }

    /// Entry under a point, for toggling
    pub fn entry_at(&self, x: f64, y: f64) -> Option<&LegendEntryLayout> {
        self.entries.iter().find(|e| e.bounds.contains(x, y))
    }
}

/// Lay out a centered row of entries spanning `width` at vertical offset `top`
pub fn layout_legend(
    items: &[LegendItem],
    width: f64,
    top: f64,
    font_size: f64,
    direction: Direction,
    measurer: &dyn TextMeasurer,
) -> LegendLayout {
    let row_height = LegendLayout::row_height(font_size);
    let swatch_size = font_size;

    let widths: Vec<f64> = items
        .iter()
        .map(|item| swatch_size + SWATCH_GAP + measurer.measure_text(&item.title, font_size))
        .collect();
    let total = widths.iter().sum::<f64>() + ENTRY_GAP * widths.len().saturating_sub(1) as f64;
    let start = ((width - total) / 2.0).max(0.0);

    let mut entries = Vec::with_capacity(items.len());
    let mut cursor = start;
    for (item, entry_width) in items.iter().zip(&widths) {
        let x = match direction {
            Direction::Ltr => cursor,
            Direction::Rtl => start + total - (cursor - start) - entry_width,
        };
        let swatch_x = match direction {
            Direction::Ltr => x,
            Direction::Rtl => x + entry_width - swatch_size,
        };
        let text_x = match direction {
            Direction::Ltr => x + swatch_size + SWATCH_GAP,
            Direction::Rtl => swatch_x - SWATCH_GAP,
        };
        entries.push(LegendEntryLayout {
            series_id: item.series_id.clone(),
            text: item.title.clone(),
            color: item.color,
            hidden: item.hidden,
            bounds: LayoutRect::new(x, top, *entry_width, row_height),
            swatch: LayoutRect::new(
                swatch_x,
                top + (row_height - swatch_size) / 2.0,
                swatch_size,
                swatch_size,
            ),
            text_position: LayoutPoint::new(text_x, top + row_height / 2.0),
        });
        cursor += entry_width + ENTRY_GAP;
    }

    LegendLayout {
        bounds: LayoutRect::new(start, top, total, row_height),
        font_size,
        entries,
    }
}
