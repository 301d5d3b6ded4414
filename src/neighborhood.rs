//! Perturbation moves over an [`Assignment`].
//!
//! Shared by both engines: the constructive engine scans the full
//! neighborhood deterministically, the annealing engine draws single moves
//! at random. A move is only ever applied when every tour it touches still
//! fits the route budget.

use rand::Rng;

use crate::instance::Instance;
use crate::models::Assignment;

/// A single change to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Take the stop at `from` out of the tour and reinsert it at `to`.
    Relocate { drone: usize, from: usize, to: usize },
    /// Reverse the tour segment `i..=j` (2-opt).
    Reverse { drone: usize, i: usize, j: usize },
    /// Move a stop to position `to` of another drone's tour.
    Transfer {
        from_drone: usize,
        from: usize,
        to_drone: usize,
        to: usize,
    },
    /// Swap stop `i` of drone `a` with stop `j` of drone `b`.
    Swap { a: usize, i: usize, b: usize, j: usize },
    /// Insert an unvisited node at position `at`.
    Insert { node: usize, drone: usize, at: usize },
    /// Replace the stop at `at` by an unvisited node.
    Exchange { drone: usize, at: usize, node: usize },
}

impl Move {
    /// Drones whose tours the move changes.
    pub fn touched(&self) -> (usize, Option<usize>) {
        match *self {
            Move::Relocate { drone, .. }
            | Move::Reverse { drone, .. }
            | Move::Insert { drone, .. }
            | Move::Exchange { drone, .. } => (drone, None),
            Move::Transfer {
                from_drone,
                to_drone,
                ..
            } => (from_drone, Some(to_drone)),
            Move::Swap { a, b, .. } => (a, Some(b)),
        }
    }

    /// Applies the move to a copy of `assignment`.
    ///
    /// Indices must be valid for `assignment`; [`enumerate`] and
    /// [`random_move`] only produce such moves.
    pub fn apply(&self, assignment: &Assignment) -> Assignment {
        let mut next = assignment.clone();
        match *self {
            Move::Relocate { drone, from, to } => {
                let tour = next.tour_mut(drone);
                let node = tour.remove(from);
                tour.insert(to, node);
            }
            Move::Reverse { drone, i, j } => {
                next.tour_mut(drone)[i..=j].reverse();
            }
            Move::Transfer {
                from_drone,
                from,
                to_drone,
                to,
            } => {
                let node = next.tour_mut(from_drone).remove(from);
                next.tour_mut(to_drone).insert(to, node);
            }
            Move::Swap { a, i, b, j } => {
                let left = next.tour(a)[i];
                let right = next.tour(b)[j];
                next.tour_mut(a)[i] = right;
                next.tour_mut(b)[j] = left;
            }
            Move::Insert { node, drone, at } => {
                next.tour_mut(drone).insert(at, node);
            }
            Move::Exchange { drone, at, node } => {
                next.tour_mut(drone)[at] = node;
            }
        }
        next
    }
}

/// Applies `mv` if every touched tour stays within budget.
pub fn try_apply(mv: &Move, assignment: &Assignment, instance: &Instance) -> Option<Assignment> {
    let next = mv.apply(assignment);
    let (first, second) = mv.touched();
    let fits = instance.fits(next.tour(first))
        && second.is_none_or(|d| instance.fits(next.tour(d)));
    fits.then_some(next)
}

/// Every move on `assignment`, in a fixed order.
///
/// Budget feasibility is not checked here; see [`try_apply`].
pub fn enumerate(assignment: &Assignment, instance: &Instance) -> Vec<Move> {
    let fleet = assignment.fleet_size();
    let unvisited = assignment.unvisited(instance);
    let mut moves = Vec::new();

    for drone in 0..fleet {
        let len = assignment.tour(drone).len();
        for from in 0..len {
            for to in 0..len {
                if to != from {
                    moves.push(Move::Relocate { drone, from, to });
                }
            }
        }
        for i in 0..len {
            for j in i + 1..len {
                moves.push(Move::Reverse { drone, i, j });
            }
        }
    }

    for from_drone in 0..fleet {
        for from in 0..assignment.tour(from_drone).len() {
            for to_drone in (0..fleet).filter(|&d| d != from_drone) {
                for to in 0..=assignment.tour(to_drone).len() {
                    moves.push(Move::Transfer {
                        from_drone,
                        from,
                        to_drone,
                        to,
                    });
                }
            }
        }
    }

    for a in 0..fleet {
        for b in a + 1..fleet {
            for i in 0..assignment.tour(a).len() {
                for j in 0..assignment.tour(b).len() {
                    moves.push(Move::Swap { a, i, b, j });
                }
            }
        }
    }

    for &node in &unvisited {
        for drone in 0..fleet {
            for at in 0..=assignment.tour(drone).len() {
                moves.push(Move::Insert { node, drone, at });
            }
            for at in 0..assignment.tour(drone).len() {
                moves.push(Move::Exchange { drone, at, node });
            }
        }
    }

    moves
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Relocate,
    Reverse,
    Transfer,
    Swap,
    Insert,
    Exchange,
}

/// Draws one move uniformly over the applicable move kinds.
///
/// Returns `None` when no kind applies (nothing visited and nothing left
/// to visit).
pub fn random_move<R: Rng>(assignment: &Assignment, instance: &Instance, rng: &mut R) -> Option<Move> {
    let fleet = assignment.fleet_size();
    let unvisited = assignment.unvisited(instance);
    let busy: Vec<usize> = (0..fleet)
        .filter(|&d| !assignment.tour(d).is_empty())
        .collect();
    let long: Vec<usize> = (0..fleet)
        .filter(|&d| assignment.tour(d).len() >= 2)
        .collect();

    let mut kinds = Vec::with_capacity(6);
    if !long.is_empty() {
        kinds.push(Kind::Relocate);
        kinds.push(Kind::Reverse);
    }
    if !busy.is_empty() && fleet >= 2 {
        kinds.push(Kind::Transfer);
    }
    if busy.len() >= 2 {
        kinds.push(Kind::Swap);
    }
    if !unvisited.is_empty() {
        kinds.push(Kind::Insert);
        if !busy.is_empty() {
            kinds.push(Kind::Exchange);
        }
    }
    if kinds.is_empty() {
        return None;
    }

    let mv = match kinds[rng.random_range(0..kinds.len())] {
        Kind::Relocate => {
            let drone = long[rng.random_range(0..long.len())];
            let len = assignment.tour(drone).len();
            let from = rng.random_range(0..len);
            let mut to = rng.random_range(0..len - 1);
            if to >= from {
                to += 1;
            }
            Move::Relocate { drone, from, to }
        }
        Kind::Reverse => {
            let drone = long[rng.random_range(0..long.len())];
            let len = assignment.tour(drone).len();
            let i = rng.random_range(0..len - 1);
            let j = rng.random_range(i + 1..len);
            Move::Reverse { drone, i, j }
        }
        Kind::Transfer => {
            let from_drone = busy[rng.random_range(0..busy.len())];
            let from = rng.random_range(0..assignment.tour(from_drone).len());
            let mut to_drone = rng.random_range(0..fleet - 1);
            if to_drone >= from_drone {
                to_drone += 1;
            }
            let to = rng.random_range(0..=assignment.tour(to_drone).len());
            Move::Transfer {
                from_drone,
                from,
                to_drone,
                to,
            }
        }
        Kind::Swap => {
            let x = rng.random_range(0..busy.len());
            let mut y = rng.random_range(0..busy.len() - 1);
            if y >= x {
                y += 1;
            }
            let (a, b) = (busy[x.min(y)], busy[x.max(y)]);
            let i = rng.random_range(0..assignment.tour(a).len());
            let j = rng.random_range(0..assignment.tour(b).len());
            Move::Swap { a, i, b, j }
        }
        Kind::Insert => {
            let node = unvisited[rng.random_range(0..unvisited.len())];
            let drone = rng.random_range(0..fleet);
            let at = rng.random_range(0..=assignment.tour(drone).len());
            Move::Insert { node, drone, at }
        }
        Kind::Exchange => {
            let drone = busy[rng.random_range(0..busy.len())];
            let at = rng.random_range(0..assignment.tour(drone).len());
            let node = unvisited[rng.random_range(0..unvisited.len())];
            Move::Exchange { drone, at, node }
        }
    };
    Some(mv)
}

/// Draws moves until one respects the budget, giving up after `attempts`.
pub fn random_neighbor<R: Rng>(
    assignment: &Assignment,
    instance: &Instance,
    rng: &mut R,
    attempts: usize,
) -> Option<Assignment> {
    for _ in 0..attempts {
        let mv = random_move(assignment, instance, rng)?;
        if let Some(next) = try_apply(&mv, assignment, instance) {
            return Some(next);
        }
    }
    None
}
