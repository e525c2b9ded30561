//! Alignment and distribution of the selected components.
//!
//! Every operation is a silent no-op below its minimum cardinality: aligning
//! a single component is meaningless, so callers do not need to guard.

use crate::component::ComponentId;
use crate::registry::ComponentRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum number of components for alignment.
pub const MIN_ALIGN_COUNT: usize = 2;
/// Minimum number of components for distribution.
pub const MIN_DISTRIBUTE_COUNT: usize = 3;

/// Alignment mode.
///
/// `CenterHorizontal` lines components up along a shared horizontal axis
/// (it adjusts `y`); `CenterVertical` shares a vertical axis (adjusts `x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    CenterHorizontal,
    CenterVertical,
}

impl Alignment {
    /// Human-readable name, used as the history description.
    pub fn label(self) -> &'static str {
        match self {
            Alignment::Left => "Align left",
            Alignment::Right => "Align right",
            Alignment::Top => "Align top",
            Alignment::Bottom => "Align bottom",
            Alignment::CenterHorizontal => "Align center horizontally",
            Alignment::CenterVertical => "Align center vertically",
        }
    }
}

/// Distribution axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distribution {
    Horizontal,
    Vertical,
}

impl Distribution {
    /// Human-readable name, used as the history description.
    pub fn label(self) -> &'static str {
        match self {
            Distribution::Horizontal => "Distribute horizontally",
            Distribution::Vertical => "Distribute vertically",
        }
    }
}

/// Geometry of one selected component, copied out of the registry.
#[derive(Debug, Clone)]
struct Item {
    id: ComponentId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Selected components that still exist, in insertion order.
fn collect(registry: &ComponentRegistry, selected: &BTreeSet<ComponentId>) -> Vec<Item> {
    registry
        .components()
        .iter()
        .filter(|c| selected.contains(c.id()))
        .map(|c| Item {
            id: c.id().to_string(),
            x: c.x,
            y: c.y,
            width: c.width,
            height: c.height,
        })
        .collect()
}

/// Write new positions back. Returns true if anything moved.
fn write_back(registry: &mut ComponentRegistry, items: &[Item]) -> bool {
    let mut changed = false;
    for item in items {
        if let Some(component) = registry.get_mut(&item.id) {
            if component.x != item.x || component.y != item.y {
                component.x = item.x;
                component.y = item.y;
                changed = true;
            }
        }
    }
    changed
}

/// Align the selected components.
/// Returns true if any component moved.
pub fn align(
    registry: &mut ComponentRegistry,
    selected: &BTreeSet<ComponentId>,
    mode: Alignment,
) -> bool {
    let mut items = collect(registry, selected);
    if items.len() < MIN_ALIGN_COUNT {
        log::trace!("{} ignored: {} component(s) selected", mode.label(), items.len());
        return false;
    }
    let count = items.len() as f64;

    match mode {
        Alignment::Left => {
            let left = items.iter().map(|i| i.x).fold(f64::INFINITY, f64::min);
            for item in &mut items {
                item.x = left;
            }
        }
        Alignment::Right => {
            let right = items
                .iter()
                .map(|i| i.x + i.width)
                .fold(f64::NEG_INFINITY, f64::max);
            for item in &mut items {
                item.x = right - item.width;
            }
        }
        Alignment::Top => {
            let top = items.iter().map(|i| i.y).fold(f64::INFINITY, f64::min);
            for item in &mut items {
                item.y = top;
            }
        }
        Alignment::Bottom => {
            let bottom = items
                .iter()
                .map(|i| i.y + i.height)
                .fold(f64::NEG_INFINITY, f64::max);
            for item in &mut items {
                item.y = bottom - item.height;
            }
        }
        Alignment::CenterHorizontal => {
            let center = items.iter().map(|i| i.y + i.height / 2.0).sum::<f64>() / count;
            for item in &mut items {
                item.y = center - item.height / 2.0;
            }
        }
        Alignment::CenterVertical => {
            let center = items.iter().map(|i| i.x + i.width / 2.0).sum::<f64>() / count;
            for item in &mut items {
                item.x = center - item.width / 2.0;
            }
        }
    }

    write_back(registry, &items)
}

/// Space the selected components evenly between the two outermost ones.
///
/// Components are sorted by their leading edge; the first and last stay put
/// and every interior component is placed so consecutive gaps are equal.
/// A negative gap (components wider than the span) yields overlap.
/// Returns true if any component moved.
pub fn distribute(
    registry: &mut ComponentRegistry,
    selected: &BTreeSet<ComponentId>,
    axis: Distribution,
) -> bool {
    let mut items = collect(registry, selected);
    if items.len() < MIN_DISTRIBUTE_COUNT {
        log::trace!("{} ignored: {} component(s) selected", axis.label(), items.len());
        return false;
    }

    // (leading edge, size) accessors for the chosen axis
    let lead = |i: &Item| match axis {
        Distribution::Horizontal => i.x,
        Distribution::Vertical => i.y,
    };
    let size = |i: &Item| match axis {
        Distribution::Horizontal => i.width,
        Distribution::Vertical => i.height,
    };

    items.sort_by(|a, b| lead(a).total_cmp(&lead(b)));

    let first = &items[0];
    let last = &items[items.len() - 1];
    let outer_span = lead(last) + size(last) - lead(first);
    let total_size: f64 = items.iter().map(size).sum();
    let space_between = (outer_span - total_size) / (items.len() - 1) as f64;

    let mut cursor = lead(first) + size(first) + space_between;
    let interior = items.len() - 1;
    for item in &mut items[1..interior] {
        match axis {
            Distribution::Horizontal => item.x = cursor,
            Distribution::Vertical => item.y = cursor,
        }
        cursor += size(item) + space_between;
    }

    write_back(registry, &items)
}
