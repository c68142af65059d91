//! Mapping of real-valued slot widths onto terminal columns.
//!
//! Widths live in the same units as `total_space`. The row occupies
//! `sum(widths) / total_space` of the available columns (all of it once an
//! adaptive session has resized), each slot gets at least one column, and
//! columns left over after flooring go to the largest remainders, ties in
//! slot order.

use itertools::Itertools;
use ratatui::layout::{Position, Rect};
use std::cmp::Ordering;

use crate::slot::NUM_SLOTS;

/// Whole terminal columns per slot for a row `columns` cells wide
pub fn allocate_columns(
    widths: &[f64; NUM_SLOTS],
    total_space: f64,
    columns: u16,
) -> [u16; NUM_SLOTS] {
    let mut cells = [0u16; NUM_SLOTS];
    let sum: f64 = widths.iter().sum();
    let track = total_space.max(sum);

    if columns < NUM_SLOTS as u16 || sum <= 0.0 {
        for cell in cells.iter_mut().take(columns as usize) {
            *cell = 1;
        }
        return cells;
    }

    let used = ((columns as f64 * sum / track).round() as u16).clamp(NUM_SLOTS as u16, columns);
    let spare = (used - NUM_SLOTS as u16) as f64;
    let exact = widths.map(|w| w / sum * spare);

    for (cell, e) in cells.iter_mut().zip(exact) {
        *cell = 1 + e.floor() as u16;
    }

    let assigned: u16 = cells.iter().sum();
    let leftover = used.saturating_sub(assigned) as usize;
    let by_remainder = (0..NUM_SLOTS).sorted_by(|&a, &b| {
        exact[b]
            .fract()
            .partial_cmp(&exact[a].fract())
            .unwrap_or(Ordering::Equal)
    });
    for idx in by_remainder.take(leftover) {
        cells[idx] += 1;
    }

    cells
}

/// Rectangles for each slot, centered horizontally inside `area`
pub fn slot_rects(area: Rect, widths: &[f64; NUM_SLOTS], total_space: f64) -> [Rect; NUM_SLOTS] {
    let cells = allocate_columns(widths, total_space, area.width);
    let used: u16 = cells.iter().sum();
    let mut x = area.x + (area.width - used) / 2;

    cells.map(|w| {
        let rect = Rect::new(x, area.y, w, area.height);
        x += w;
        rect
    })
}

/// Slot under the given terminal cell, if any
pub fn slot_at(rects: &[Rect; NUM_SLOTS], column: u16, row: u16) -> Option<usize> {
    rects
        .iter()
        .position(|r| r.width > 0 && r.contains(Position::new(column, row)))
}
