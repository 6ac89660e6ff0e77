//! Row layout of a page
//!
//! Sections are stacked top to bottom with a fixed gap. Positions are in
//! terminal rows; the stage works in units, `units_per_row` apiece.

use reveal_core::page::SectionContent;
use reveal_core::Layout;

use crate::widgets::SectionWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// First row of the section on the page
    pub top: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    slots: Vec<Slot>,
    total_height: u16,
    units_per_row: f64,
}

impl PageLayout {
    /// Lay out `sections` given as (content, class name) pairs
    pub fn new<'a>(
        sections: impl IntoIterator<Item = (&'a SectionContent, &'a str)>,
        gap: u16,
        units_per_row: f64,
    ) -> Self {
        let mut slots = Vec::new();
        // One blank row above the first section
        let mut row: u16 = 1;
        for (content, class_name) in sections {
            let height = SectionWidget::height(content, class_name);
            slots.push(Slot { top: row, height });
            row = row.saturating_add(height).saturating_add(gap);
        }

        Self {
            slots,
            total_height: row,
            units_per_row: if units_per_row > 0.0 { units_per_row } else { 1.0 },
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Rows the whole page needs
    pub fn total_height(&self) -> u16 {
        self.total_height
    }

    pub fn units_per_row(&self) -> f64 {
        self.units_per_row
    }

    pub fn max_scroll(&self, viewport_rows: u16) -> u16 {
        self.total_height.saturating_sub(viewport_rows)
    }

    pub fn rows_to_units(&self, rows: u16) -> f64 {
        rows as f64 * self.units_per_row
    }

    /// Stage layout of the section at `index`
    pub fn stage_layout(&self, index: usize) -> Option<Layout> {
        self.slot(index).map(|slot| {
            Layout::new(
                self.rows_to_units(slot.top),
                self.rows_to_units(slot.height),
            )
        })
    }
}
