//! Frontline target selection.
//!
//! Only the frontmost living unit of each row may be targeted. Which end of
//! the row counts as "front" depends on which army is being attacked.

use crate::unit::UnitInstance;

/// Which extreme of the transverse (`y`) coordinate is the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEdge {
    /// Smallest `y` is frontmost. Used when the left army is the target.
    MinY,
    /// Largest `y` is frontmost.
    MaxY,
}

impl FrontEdge {
    /// Front edge for a query against the left or right army.
    #[must_use]
    pub const fn for_target(is_left_army_target: bool) -> Self {
        if is_left_army_target {
            Self::MinY
        } else {
            Self::MaxY
        }
    }

    #[inline]
    fn is_further(self, candidate: i32, current: i32) -> bool {
        match self {
            Self::MinY => candidate < current,
            Self::MaxY => candidate > current,
        }
    }
}

/// Anything that can stand in a row.
pub trait RowMember {
    /// Whether the member can still be targeted.
    fn is_alive(&self) -> bool;

    /// Transverse coordinate compared against the front edge.
    fn transverse(&self) -> i32;
}

impl RowMember for UnitInstance {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn transverse(&self) -> i32 {
        self.position.y
    }
}

impl<T: RowMember + ?Sized> RowMember for &T {
    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }

    fn transverse(&self) -> i32 {
        (**self).transverse()
    }
}

/// The frontmost living member of one row.
///
/// Ties go to the first such member in row order. Returns `None` if nobody
/// in the row is alive.
pub fn frontmost<T: RowMember>(row: &[T], edge: FrontEdge) -> Option<&T> {
    let mut selected: Option<&T> = None;
    for candidate in row.iter().filter(|m| m.is_alive()) {
        match selected {
            Some(current) if !edge.is_further(candidate.transverse(), current.transverse()) => {}
            _ => selected = Some(candidate),
        }
    }
    selected
}

/// One frontline member per row that still has a living member, in row
/// order.
pub fn select_frontline<R, T>(rows: &[R], edge: FrontEdge) -> Vec<&T>
where
    R: AsRef<[T]>,
    T: RowMember,
{
    rows.iter()
        .filter_map(|row| frontmost(row.as_ref(), edge))
        .collect()
}

/// [`select_frontline`] keyed by whether the left army is the target.
pub fn suitable_units<R, T>(rows: &[R], is_left_army_target: bool) -> Vec<&T>
where
    R: AsRef<[T]>,
    T: RowMember,
{
    select_frontline(rows, FrontEdge::for_target(is_left_army_target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPos;
    use crate::unit::UnitArchetype;

    fn unit(name: &str, y: i32, alive: bool) -> UnitInstance {
        let arch = UnitArchetype::new(name, 10, 1, 1, "melee");
        let mut unit = UnitInstance::from_archetype(&arch, 1, GridPos::new(0, y));
        unit.alive = alive;
        unit
    }

    fn names<'a>(units: &[&'a UnitInstance]) -> Vec<&'a str> {
        units.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn test_dead_unit_is_skipped() {
        let rows = vec![vec![
            unit("Mid", 5, true),
            unit("Dead", 3, false),
            unit("Front", 1, true),
        ]];

        let selected = suitable_units(&rows, true);
        assert_eq!(names(&selected), vec!["Front 1"]);
        assert_eq!(selected[0].y(), 1);
    }

    #[test]
    fn test_max_edge() {
        let rows = vec![vec![unit("Low", 1, true), unit("High", 5, true)]];
        let selected = select_frontline(&rows, FrontEdge::MaxY);
        assert_eq!(names(&selected), vec!["High 1"]);
    }

    #[test]
    fn test_first_in_row_wins_ties() {
        let rows = vec![vec![
            unit("First", 2, true),
            unit("Second", 2, true),
        ]];
        assert_eq!(names(&select_frontline(&rows, FrontEdge::MinY)), vec!["First 1"]);
        assert_eq!(names(&select_frontline(&rows, FrontEdge::MaxY)), vec!["First 1"]);
    }

    #[test]
    fn test_one_entry_per_living_row() {
        let rows = vec![
            vec![unit("A", 4, true), unit("B", 9, true)],
            vec![],
            vec![unit("Gone", 0, false)],
            vec![unit("C", 7, true)],
        ];

        let selected = select_frontline(&rows, FrontEdge::MinY);
        assert_eq!(names(&selected), vec!["A 1", "C 1"]);
    }

    #[test]
    fn test_rows_of_references() {
        let a = unit("A", 3, true);
        let b = unit("B", 8, true);
        let rows: Vec<Vec<&UnitInstance>> = vec![vec![&a, &b]];

        let selected = select_frontline(&rows, FrontEdge::MaxY);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "B 1");
    }
}
