//! Static gradient field builder used by the world crate.

use std::collections::HashSet;

use grid_hunt_core::{CellCoord, ITEM_VALUE, WALL_VALUE, WARNING_VALUE};

use crate::{Item, Wall};

/// Dense scalar sensor field generated once at world construction.
///
/// The field mirrors the world's dimensions and stores the overlay of item
/// gradients, wall bodies, and wall warning zones in row-major order. It is
/// never rebuilt after the world exists.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SignalField {
    width: u32,
    height: u32,
    cells: Vec<f64>,
}

impl SignalField {
    fn zeroed(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![0.0; capacity],
        }
    }

    /// Value stored for the provided cell, if it lies within the field.
    #[must_use]
    pub(crate) fn value(&self, cell: CellCoord) -> Option<f64> {
        if cell.x() >= self.width || cell.y() >= self.height {
            return None;
        }
        index(self.width, cell).and_then(|offset| self.cells.get(offset).copied())
    }

    /// Dense cell values stored in row-major order.
    #[must_use]
    pub(crate) fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Dimensions of the field as (width, height).
    #[must_use]
    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write(&mut self, cell: CellCoord, value: f64) {
        if cell.x() >= self.width || cell.y() >= self.height {
            return;
        }
        if let Some(offset) = index(self.width, cell) {
            if let Some(slot) = self.cells.get_mut(offset) {
                *slot = value;
            }
        }
    }
}

/// Builds the sensor field from the map's items and walls.
///
/// Items are written first: full occupancy at the item cell, the falloff
/// across the 8-neighborhood, half the falloff across the ring at Chebyshev
/// distance 2. Every cell an item touches (in or out of bounds) joins the
/// protected set. Walls come second and never reach into the protected set:
/// warning values land only on cells still at zero, wall bodies overwrite
/// anything else, including warning values from other walls. The result is
/// independent of the order items and walls are listed in.
pub(crate) fn generate(width: u32, height: u32, items: &[Item], walls: &[Wall]) -> SignalField {
    let mut field = SignalField::zeroed(width, height);
    let mut protected: HashSet<(i64, i64)> = HashSet::new();

    for item in items {
        let origin = (i64::from(item.cell.x()), i64::from(item.cell.y()));
        for dy in -2_i64..=2 {
            for dx in -2_i64..=2 {
                let target = (origin.0 + dx, origin.1 + dy);
                let _ = protected.insert(target);
                let value = match dx.abs().max(dy.abs()) {
                    0 => ITEM_VALUE,
                    1 => item.kind.falloff(),
                    _ => item.kind.falloff() / 2.0,
                };
                if let Some(cell) = to_cell(target, width, height) {
                    field.write(cell, value);
                }
            }
        }
    }

    for wall in walls {
        for &target in &wall.warning_zone() {
            if protected.contains(&target) {
                continue;
            }
            if let Some(cell) = to_cell(target, width, height) {
                if field.value(cell) == Some(0.0) {
                    field.write(cell, WARNING_VALUE);
                }
            }
        }
        for cell in wall.cells() {
            let target = (i64::from(cell.x()), i64::from(cell.y()));
            if protected.contains(&target) {
                continue;
            }
            field.write(cell, WALL_VALUE);
        }
    }

    field
}

fn to_cell(target: (i64, i64), width: u32, height: u32) -> Option<CellCoord> {
    let (x, y) = target;
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return None;
    }
    let x = u32::try_from(x).ok()?;
    let y = u32::try_from(y).ok()?;
    Some(CellCoord::new(x, y))
}

fn index(width: u32, cell: CellCoord) -> Option<usize> {
    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    let width = usize::try_from(width).ok()?;
    y.checked_mul(width)?.checked_add(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_hunt_core::{ItemKind, WallRotation};

    fn key_at(x: u32, y: u32) -> Item {
        Item {
            cell: CellCoord::new(x, y),
            kind: ItemKind::Key,
        }
    }

    fn box_at(x: u32, y: u32) -> Item {
        Item {
            cell: CellCoord::new(x, y),
            kind: ItemKind::Box,
        }
    }

    fn wall_at(x: u32, y: u32, rotation: WallRotation) -> Wall {
        Wall::new(CellCoord::new(x, y), rotation)
    }

    #[test]
    fn item_rings_carry_the_documented_values() {
        let field = generate(10, 10, &[key_at(5, 5)], &[]);

        assert_eq!(field.value(CellCoord::new(5, 5)), Some(ITEM_VALUE));
        assert_eq!(field.value(CellCoord::new(5, 4)), Some(0.5));
        assert_eq!(field.value(CellCoord::new(4, 4)), Some(0.5));
        assert_eq!(field.value(CellCoord::new(5, 3)), Some(0.25));
        assert_eq!(field.value(CellCoord::new(3, 3)), Some(0.25));
        assert_eq!(field.value(CellCoord::new(5, 2)), Some(0.0));
    }

    #[test]
    fn rings_are_clipped_at_the_border() {
        let field = generate(10, 10, &[key_at(0, 0)], &[]);

        assert_eq!(field.value(CellCoord::new(0, 0)), Some(ITEM_VALUE));
        assert_eq!(field.value(CellCoord::new(1, 1)), Some(0.5));
        assert_eq!(field.value(CellCoord::new(2, 2)), Some(0.25));
    }

    #[test]
    fn generation_is_invariant_under_processing_order() {
        let items = vec![key_at(4, 4), box_at(12, 4), key_at(4, 12)];
        let walls = vec![
            wall_at(9, 9, WallRotation::TopLeft),
            wall_at(14, 10, WallRotation::BottomRight),
        ];

        let forward = generate(20, 20, &items, &walls);

        let mut reversed_items = items;
        reversed_items.reverse();
        let mut reversed_walls = walls;
        reversed_walls.reverse();
        let backward = generate(20, 20, &reversed_items, &reversed_walls);

        assert_eq!(forward, backward);
    }

    #[test]
    fn item_rings_survive_an_overlapping_wall() {
        // The wall's bounding box reaches into the key's far ring.
        let key = key_at(5, 5);
        let wall = wall_at(6, 6, WallRotation::TopLeft);
        let field = generate(12, 12, &[key], &[wall]);

        // Ring cells covered by wall body or warning zone keep item values.
        assert_eq!(field.value(CellCoord::new(6, 6)), Some(0.5));
        assert_eq!(field.value(CellCoord::new(7, 6)), Some(0.25));
        assert_eq!(field.value(CellCoord::new(6, 7)), Some(0.25));
        // Wall body cells outside the protected 5x5 block are real walls.
        assert_eq!(field.value(CellCoord::new(8, 6)), Some(WALL_VALUE));
        assert_eq!(field.value(CellCoord::new(6, 8)), Some(WALL_VALUE));
    }

    #[test]
    fn warning_zone_never_overwrites_a_nonzero_cell() {
        // Two walls close enough that one's warning ring crosses the other's
        // body and warning cells.
        let near = wall_at(2, 2, WallRotation::TopLeft);
        let far = wall_at(5, 2, WallRotation::TopLeft);
        let field = generate(12, 12, &[], &[near, far]);

        for wall in [&near, &far] {
            for cell in wall.cells() {
                assert_eq!(
                    field.value(cell),
                    Some(WALL_VALUE),
                    "body cell ({}, {}) lost its wall value",
                    cell.x(),
                    cell.y(),
                );
            }
        }
    }

    #[test]
    fn wall_body_overwrites_a_foreign_warning_value() {
        let left = wall_at(2, 2, WallRotation::TopLeft);
        // Anchored so its top row starts inside the left wall's warning ring.
        let right = wall_at(5, 3, WallRotation::TopRight);
        let field = generate(12, 12, &[], &[left, right]);

        assert_eq!(field.value(CellCoord::new(5, 3)), Some(WALL_VALUE));
    }

    #[test]
    fn rotations_produce_the_documented_footprints() {
        let expected = [
            (WallRotation::TopLeft, [(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)]),
            (WallRotation::TopRight, [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]),
            (WallRotation::BottomLeft, [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]),
            (WallRotation::BottomRight, [(2, 0), (2, 1), (0, 2), (1, 2), (2, 2)]),
        ];

        for (rotation, offsets) in expected {
            let wall = wall_at(4, 4, rotation);
            let cells = wall.cells();
            for (slot, &(dx, dy)) in offsets.iter().enumerate() {
                assert_eq!(
                    cells[slot],
                    CellCoord::new(4 + dx, 4 + dy),
                    "footprint mismatch for {rotation:?}",
                );
            }
        }
    }

    #[test]
    fn warning_zone_surrounds_the_footprint_without_covering_it() {
        let wall = wall_at(4, 4, WallRotation::TopLeft);
        let zone = wall.warning_zone();

        for cell in wall.cells() {
            assert!(!zone.contains(&(i64::from(cell.x()), i64::from(cell.y()))));
        }
        // The inner corner of the L is an 8-neighbor of three body cells.
        assert!(zone.contains(&(5, 5)));
        // One step beyond the bounding box on the anchor diagonal.
        assert!(zone.contains(&(3, 3)));
    }
}
