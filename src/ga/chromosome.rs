//! Activity-indexed chromosome for timetabling.
//!
//! # Encoding
//!
//! A chromosome is a vector of genes, one per catalog activity, in catalog
//! order. Gene `i` holds the room, time slot, and facilitator assigned to
//! activity `i`, each as an index into the catalog.
//!
//! Because position *is* identity, every activity appears exactly once in
//! every chromosome. Crossover and mutation only ever exchange or rewrite
//! gene values, never positions, so no repair step is needed.
//!
//! Fitness is not stored here. Scores live next to the chromosome in
//! [`EvaluatedPopulation`](super::EvaluatedPopulation).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Catalog, Schedule, ScheduledActivity};

/// Room, time slot, and facilitator assigned to one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gene {
    /// Index into `Catalog::rooms`.
    pub room: usize,
    /// Index into `Catalog::time_slots`.
    pub time_slot: usize,
    /// Index into `Catalog::facilitators`.
    pub facilitator: usize,
}

impl Gene {
    pub fn new(room: usize, time_slot: usize, facilitator: usize) -> Self {
        Self {
            room,
            time_slot,
            facilitator,
        }
    }

    /// Draws every field uniformly from its full domain.
    pub fn random<R: Rng>(catalog: &Catalog, rng: &mut R) -> Self {
        Self {
            room: rng.random_range(0..catalog.room_count()),
            time_slot: rng.random_range(0..catalog.time_slot_count()),
            facilitator: rng.random_range(0..catalog.facilitator_count()),
        }
    }
}

/// One candidate timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleChromosome {
    genes: Vec<Gene>,
}

impl ScheduleChromosome {
    /// Wraps an explicit gene vector (gene `i` belongs to activity `i`).
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// Creates a random chromosome.
    ///
    /// Each activity independently gets a uniform room, slot, and
    /// facilitator. Preference lists are not consulted.
    ///
    /// The catalog must have non-empty room, slot, and facilitator domains.
    pub fn random<R: Rng>(catalog: &Catalog, rng: &mut R) -> Self {
        let genes = (0..catalog.activity_count())
            .map(|_| Gene::random(catalog, rng))
            .collect();
        Self { genes }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Gene of the activity at `activity` index.
    pub fn gene(&self, activity: usize) -> Option<&Gene> {
        self.genes.get(activity)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether every gene has one entry per activity and in-range indices.
    pub fn is_valid(&self, catalog: &Catalog) -> bool {
        self.genes.len() == catalog.activity_count()
            && self.genes.iter().all(|g| {
                g.room < catalog.room_count()
                    && g.time_slot < catalog.time_slot_count()
                    && g.facilitator < catalog.facilitator_count()
            })
    }

    /// Decodes into a schedule sorted by time slot then room.
    ///
    /// Genes beyond the catalog or with out-of-range indices are skipped.
    pub fn decode(&self, catalog: &Catalog) -> Schedule {
        let entries = self
            .genes
            .iter()
            .zip(&catalog.activities)
            .filter_map(|(gene, activity)| {
                let room = catalog.rooms.get(gene.room)?;
                let slot = catalog.time_slots.get(gene.time_slot)?;
                let facilitator = catalog.facilitators.get(gene.facilitator)?;
                Some(ScheduledActivity {
                    activity_id: activity.id.clone(),
                    room_id: room.id.clone(),
                    time_slot: slot.label.clone(),
                    hour: slot.hour,
                    facilitator_id: facilitator.id.clone(),
                    enrollment: activity.enrollment,
                    capacity: room.capacity,
                })
            })
            .collect();
        Schedule::from_entries(entries)
    }
}

// ======================== Crossover ========================

/// Single-point crossover.
///
/// Picks a cut uniformly in `[1, len - 1]`. The first child takes `p1`'s
/// genes before the cut and `p2`'s from the cut on; the second child is
/// the complement. Chromosomes shorter than two genes have no interior cut
/// and are returned as copies.
pub fn single_point_crossover<R: Rng>(
    p1: &ScheduleChromosome,
    p2: &ScheduleChromosome,
    rng: &mut R,
) -> (ScheduleChromosome, ScheduleChromosome) {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return (p1.clone(), p2.clone());
    }
    let cut = rng.random_range(1..len);
    crossover_at(p1, p2, cut)
}

/// Crossover at a fixed cut index.
pub fn crossover_at(
    p1: &ScheduleChromosome,
    p2: &ScheduleChromosome,
    cut: usize,
) -> (ScheduleChromosome, ScheduleChromosome) {
    let cut = cut.min(p1.len()).min(p2.len());
    let child1 = p1.genes[..cut].iter().chain(&p2.genes[cut..]).copied().collect();
    let child2 = p2.genes[..cut].iter().chain(&p1.genes[cut..]).copied().collect();
    (
        ScheduleChromosome::from_genes(child1),
        ScheduleChromosome::from_genes(child2),
    )
}

// ======================== Mutation ========================

/// Per-gene mutation.
///
/// Each gene mutates independently with probability `rate`. A mutating
/// gene has exactly one field (room, slot, or facilitator, chosen
/// uniformly) redrawn from its full domain. Returns the number of genes
/// that mutated.
pub fn mutate_genes<R: Rng>(
    chromosome: &mut ScheduleChromosome,
    catalog: &Catalog,
    rate: f64,
    rng: &mut R,
) -> usize {
    let mut mutated = 0;
    for gene in &mut chromosome.genes {
        if rng.random::<f64>() >= rate {
            continue;
        }
        match rng.random_range(0..3) {
            0 => gene.room = rng.random_range(0..catalog.room_count()),
            1 => gene.time_slot = rng.random_range(0..catalog.time_slot_count()),
            _ => gene.facilitator = rng.random_range(0..catalog.facilitator_count()),
        }
        mutated += 1;
    }
    mutated
}
