//! Capacity-constrained assignment of sequenced clusters to trucks.
//!
//! # Algorithm
//!
//! 1. Order clusters by high-priority bin count, then size (both descending),
//!    keeping input order on ties.
//! 2. Every truck starts empty. Before each step trucks are ranked by
//!    remaining capacity (descending), then capacity, then id.
//! 3. A cluster goes whole to the first truck that can hold it.
//! 4. Otherwise the longest prefix that fits goes to the top-ranked truck
//!    (the one with the most room, hence the longest prefix). The first bin
//!    past the prefix rides along with its waste clipped to the room left,
//!    filling the truck exactly. The rest becomes the next pending cluster.
//!    Visiting order is never changed.
//! 5. A bin heavier than every truck is reported unassignable and skipped.
//!    Once every truck is full, the remaining bins are reported unassigned.
//!
//! Every bin appears in at most one route. Each truck's routes together
//! never exceed its capacity, so no single route does either.

use std::collections::{HashSet, VecDeque};

use crate::distance::Graph;
use crate::error::PlanError;
use crate::models::{BinId, Route, Truck};
use crate::sequencing::SequencedCluster;

/// A condition the assignment worked around rather than failed on.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentIssue {
    /// There were bins to collect but no trucks.
    NoCapacityAvailable,
    /// The bin holds more waste than any truck can carry.
    Unassignable {
        /// Bin ID.
        bin_id: BinId,
        /// Waste in the bin, in kg.
        waste_kg: f64,
    },
    /// The fleet ran out of room before reaching this bin.
    Unassigned {
        /// Bin ID.
        bin_id: BinId,
    },
    /// The bin closed a split route and was only partly emptied. It is
    /// still routed, once.
    PartialPickup {
        /// Bin ID.
        bin_id: BinId,
        /// Waste loaded onto the truck, in kg.
        collected_kg: f64,
        /// Waste left in the bin, in kg.
        left_kg: f64,
    },
}

/// Routes produced by [`assign_routes`] plus anything left behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// One route per truck/cluster assignment, in assignment order.
    pub routes: Vec<Route>,
    /// Everything that could not be routed.
    pub issues: Vec<AssignmentIssue>,
}

impl Assignment {
    /// Bins left out because the fleet was full.
    pub fn unassigned(&self) -> Vec<BinId> {
        self.issues
            .iter()
            .filter_map(|i| match i {
                AssignmentIssue::Unassigned { bin_id } => Some(*bin_id),
                _ => None,
            })
            .collect()
    }

    /// Bins heavier than every truck.
    pub fn unassignable(&self) -> Vec<BinId> {
        self.issues
            .iter()
            .filter_map(|i| match i {
                AssignmentIssue::Unassignable { bin_id, .. } => Some(*bin_id),
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if bins were offered with no trucks to carry them.
    pub fn no_capacity_available(&self) -> bool {
        self.issues.contains(&AssignmentIssue::NoCapacityAvailable)
    }

    /// Bins collected only in part, in assignment order.
    pub fn partial_pickups(&self) -> Vec<BinId> {
        self.issues
            .iter()
            .filter_map(|i| match i {
                AssignmentIssue::PartialPickup { bin_id, .. } => Some(*bin_id),
                _ => None,
            })
            .collect()
    }

    /// Waste left behind in partly emptied bins, in kg.
    pub fn uncollected_kg(&self) -> f64 {
        self.issues
            .iter()
            .map(|i| match i {
                AssignmentIssue::PartialPickup { left_kg, .. } => *left_kg,
                _ => 0.0,
            })
            .sum()
    }

    /// Returns `true` if every offered bin was routed, possibly in part.
    pub fn is_complete(&self) -> bool {
        self.issues
            .iter()
            .all(|i| matches!(i, AssignmentIssue::PartialPickup { .. }))
    }

    /// Routes served by one truck.
    pub fn routes_for(&self, truck_id: u32) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |r| r.truck_id() == truck_id)
    }
}

/// Room below which a truck counts as full, in kg.
const MIN_PICKUP_KG: f64 = 1e-9;

#[derive(Debug, Clone)]
struct TruckSlot {
    id: u32,
    capacity: f64,
    remaining: f64,
}

/// Assigns sequenced clusters to trucks under capacity limits.
///
/// Clusters with more bins in `high_priority` are served first. Fails if a
/// sequence names a bin missing from `graph` or two trucks share an ID.
///
/// # Examples
///
/// ```
/// use waste_routing::models::{Bin, Truck};
/// use waste_routing::distance::build_graph;
/// use waste_routing::assignment::assign_routes;
/// use waste_routing::sequencing::SequencedCluster;
///
/// let bins = vec![
///     Bin::at(1, 51.500, -0.10, 90, 100.0).unwrap(),
///     Bin::at(2, 51.501, -0.10, 60, 100.0).unwrap(),
///     Bin::at(3, 51.502, -0.10, 70, 100.0).unwrap(),
/// ];
/// let graph = build_graph(&bins).unwrap();
/// let cluster = SequencedCluster { order: vec![1, 2, 3], distance: 0.0, optimal: true };
/// let trucks = vec![Truck::new(1, 200.0).unwrap(), Truck::new(2, 100.0).unwrap()];
///
/// let plan = assign_routes(&[cluster], &trucks, &[1], &graph).unwrap();
/// // 220 kg against 200 kg of room: bin 3 is emptied down to 20 kg.
/// assert_eq!(plan.routes.len(), 1);
/// assert_eq!(plan.routes[0].bin_sequence(), &[1, 2, 3]);
/// assert_eq!(plan.routes[0].total_waste_collected(), 200.0);
/// assert_eq!(plan.partial_pickups(), vec![3]);
/// assert!(plan.is_complete());
/// ```
pub fn assign_routes(
    sequenced: &[SequencedCluster],
    trucks: &[Truck],
    high_priority: &[BinId],
    graph: &Graph,
) -> Result<Assignment, PlanError> {
    let mut truck_ids = HashSet::with_capacity(trucks.len());
    for truck in trucks {
        if !truck_ids.insert(truck.id()) {
            return Err(PlanError::DuplicateTruckId(truck.id()));
        }
    }

    let priority: HashSet<BinId> = high_priority.iter().copied().collect();
    let mut pending: VecDeque<Vec<BinId>> = priority_order(sequenced, &priority).into();
    let mut assignment = Assignment::default();

    if trucks.is_empty() {
        if pending.iter().any(|c| !c.is_empty()) {
            tracing::warn!("no trucks available, nothing can be routed");
            assignment.issues.push(AssignmentIssue::NoCapacityAvailable);
            for bin_id in pending.into_iter().flatten() {
                assignment.issues.push(AssignmentIssue::Unassigned { bin_id });
            }
        }
        return Ok(assignment);
    }

    let mut slots: Vec<TruckSlot> = trucks
        .iter()
        .map(|t| TruckSlot {
            id: t.id(),
            capacity: t.capacity(),
            remaining: t.capacity(),
        })
        .collect();
    let largest_capacity = slots.iter().map(|s| s.capacity).fold(0.0, f64::max);

    while let Some(cluster) = pending.pop_front() {
        if cluster.is_empty() {
            continue;
        }
        let wastes = cluster
            .iter()
            .map(|&id| graph.bin(id).map(|b| b.waste_kg()).ok_or(PlanError::UnknownBin(id)))
            .collect::<Result<Vec<f64>, PlanError>>()?;

        let ranked = rank_trucks(&slots);
        let total = wastes.iter().sum::<f64>();
        if let Some(&slot) = ranked.iter().find(|&&i| total <= slots[i].remaining) {
            load_route(&mut assignment, &mut slots[slot], cluster, total, graph)?;
            continue;
        }

        let slot = ranked[0];
        let room = slots[slot].remaining;
        let (taken, load) = fitting_prefix(&wastes, room);
        let (boundary, boundary_waste) = (cluster[taken], wastes[taken]);

        if boundary_waste > largest_capacity {
            let issue = AssignmentIssue::Unassignable {
                bin_id: boundary,
                waste_kg: boundary_waste,
            };
            tracing::warn!(?issue, "bin left out of routing");
            assignment.issues.push(issue);
            if taken > 0 {
                let head = cluster[..taken].to_vec();
                load_route(&mut assignment, &mut slots[slot], head, load, graph)?;
            }
            pending.push_front(cluster[taken + 1..].to_vec());
            continue;
        }

        let clipped = room - load;
        if clipped > MIN_PICKUP_KG {
            let head = cluster[..=taken].to_vec();
            load_route(&mut assignment, &mut slots[slot], head, room, graph)?;
            let issue = AssignmentIssue::PartialPickup {
                bin_id: boundary,
                collected_kg: clipped,
                left_kg: boundary_waste - clipped,
            };
            tracing::debug!(?issue, truck = slots[slot].id, "bin clipped to fill truck");
            assignment.issues.push(issue);
            pending.push_front(cluster[taken + 1..].to_vec());
        } else if taken > 0 {
            let head = cluster[..taken].to_vec();
            load_route(&mut assignment, &mut slots[slot], head, load, graph)?;
            pending.push_front(cluster[taken..].to_vec());
        } else {
            let issue = leftover_issue(boundary, boundary_waste, largest_capacity);
            tracing::warn!(?issue, "bin left out of routing");
            assignment.issues.push(issue);
            pending.push_front(cluster[1..].to_vec());
        }
    }

    tracing::debug!(
        routes = assignment.routes.len(),
        issues = assignment.issues.len(),
        "assigned clusters to trucks"
    );
    Ok(assignment)
}

/// Appends a route for `bins` carrying `load` kg and charges it to `slot`.
fn load_route(
    assignment: &mut Assignment,
    slot: &mut TruckSlot,
    bins: Vec<BinId>,
    load: f64,
    graph: &Graph,
) -> Result<(), PlanError> {
    let distance = graph.path_distance(&bins)?;
    slot.remaining = (slot.remaining - load).max(0.0);
    assignment.routes.push(Route::new(slot.id, bins, distance, load));
    Ok(())
}

/// Cluster orders sorted by high-priority count, then size, both descending.
fn priority_order(
    sequenced: &[SequencedCluster],
    priority: &HashSet<BinId>,
) -> Vec<Vec<BinId>> {
    let mut keyed: Vec<(usize, usize, &SequencedCluster)> = sequenced
        .iter()
        .map(|s| {
            let hp = s.order.iter().filter(|id| priority.contains(id)).count();
            (hp, s.len(), s)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    keyed.into_iter().map(|(_, _, s)| s.order.clone()).collect()
}

/// Truck indices by remaining capacity, then capacity (descending), then id.
fn rank_trucks(slots: &[TruckSlot]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (&slots[a], &slots[b]);
        sb.remaining
            .total_cmp(&sa.remaining)
            .then_with(|| sb.capacity.total_cmp(&sa.capacity))
            .then_with(|| sa.id.cmp(&sb.id))
    });
    order
}

/// Longest prefix of `wastes` fitting in `room`, and its load.
fn fitting_prefix(wastes: &[f64], room: f64) -> (usize, f64) {
    let mut load = 0.0;
    for (i, &w) in wastes.iter().enumerate() {
        if load + w > room {
            return (i, load);
        }
        load += w;
    }
    (wastes.len(), load)
}

fn leftover_issue(bin_id: BinId, waste_kg: f64, largest_capacity: f64) -> AssignmentIssue {
    if waste_kg > largest_capacity {
        AssignmentIssue::Unassignable { bin_id, waste_kg }
    } else {
        AssignmentIssue::Unassigned { bin_id }
    }
}
