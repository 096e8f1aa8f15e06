//! Multi-factor timetable fitness.
//!
//! Fitness is a sum of independent terms, each computed once per unit:
//!
//! | Term | Unit |
//! |------|------|
//! | Room size, facilitator preference | Activity |
//! | Room conflict | Room × time slot |
//! | Slot load | Facilitator × time slot |
//! | Total load | Facilitator with at least one activity |
//! | Consecutive slots | Activity pair, same facilitator, one hour apart |
//! | Section / course spacing | Linked activity pair |
//!
//! Higher is better. There is no early exit: every applicable term is
//! added. Terms are summed in a fixed order so the same chromosome always
//! yields a bit-identical score.

use serde::{Deserialize, Serialize};

use super::ScheduleChromosome;
use crate::error::ConfigError;
use crate::models::{Catalog, FacilitatorPreference, PairRule};
use crate::validation::validate_catalog;

/// Per-category tally of one evaluation.
///
/// Counters record how many times each term fired; `total` is the
/// fitness. Equipment mismatches are counted for reporting only and do not
/// affect the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    /// Room × slot cells hosting two or more activities.
    pub room_conflicts: u32,
    pub room_too_small: u32,
    /// Capacity above 3× enrollment.
    pub room_very_large: u32,
    /// Capacity above 1.5× enrollment.
    pub room_oversized: u32,
    pub room_good_fit: u32,
    pub facilitator_preferred: u32,
    pub facilitator_other: u32,
    pub facilitator_unlisted: u32,
    /// Facilitator × slot cells with exactly one activity.
    pub facilitator_single_slot: u32,
    /// Facilitator × slot cells with more than one activity.
    pub facilitator_double_booked: u32,
    pub facilitator_overloaded: u32,
    pub facilitator_underloaded: u32,
    /// Consecutive same-facilitator pairs that earned the bonus.
    pub facilitator_consecutive: u32,
    /// Consecutive same-facilitator pairs split across buildings.
    pub facilitator_consecutive_split: u32,
    pub section_far_apart: u32,
    pub section_same_slot: u32,
    pub course_consecutive: u32,
    pub course_consecutive_split: u32,
    /// Course pairs two hours apart.
    pub course_one_gap: u32,
    pub course_same_slot: u32,
    /// Activities whose room lacks the required equipment.
    pub missing_equipment: u32,
    /// Sum of the per-activity terms (room size and preference).
    pub activity_terms: f64,
    /// Overall fitness.
    pub total: f64,
}

/// Evaluates chromosomes against a catalog.
///
/// Construction resolves every id reference in the scoring rules to an
/// index once, so evaluation does no string comparison.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    catalog: &'a Catalog,
    /// Slot hours by slot index.
    hours: Vec<i32>,
    /// Whether each room is in a split building.
    room_split: Vec<bool>,
    /// activities × facilitators preference matrix.
    preference: Vec<FacilitatorPreference>,
    /// activities × rooms equipment matrix.
    equipment_ok: Vec<bool>,
    /// Minimum load by facilitator index.
    min_loads: Vec<usize>,
    pairs: Vec<ResolvedPair<'a>>,
}

#[derive(Debug, Clone)]
struct ResolvedPair<'a> {
    first: usize,
    second: usize,
    rule: &'a PairRule,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator for a catalog.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidCatalog`] if the catalog fails
    /// [`validate_catalog`].
    pub fn new(catalog: &'a Catalog) -> Result<Self, ConfigError> {
        validate_catalog(catalog).map_err(ConfigError::InvalidCatalog)?;
        let rules = &catalog.rules;

        let hours = catalog.time_slots.iter().map(|t| t.hour).collect();
        let room_split = catalog
            .rooms
            .iter()
            .map(|r| rules.is_split_building(&r.building))
            .collect();

        let mut preference =
            Vec::with_capacity(catalog.activity_count() * catalog.facilitator_count());
        let mut equipment_ok = Vec::with_capacity(catalog.activity_count() * catalog.room_count());
        for act in &catalog.activities {
            preference.extend(catalog.facilitators.iter().map(|f| act.preference_of(&f.id)));
            equipment_ok.extend(catalog.rooms.iter().map(|r| {
                act.required_equipment
                    .as_deref()
                    .is_none_or(|tag| r.has_equipment(tag))
            }));
        }

        let min_loads = catalog
            .facilitators
            .iter()
            .map(|f| rules.total_load.min_load_for(&f.id))
            .collect();

        // Validation guarantees both ends resolve
        let pairs = rules
            .linked_pairs
            .iter()
            .filter_map(|p| {
                Some(ResolvedPair {
                    first: catalog.activity_index(&p.first)?,
                    second: catalog.activity_index(&p.second)?,
                    rule: &p.rule,
                })
            })
            .collect();

        Ok(Self {
            catalog,
            hours,
            room_split,
            preference,
            equipment_ok,
            min_loads,
            pairs,
        })
    }

    /// The catalog being evaluated against.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Computes fitness. Higher is better.
    ///
    /// # Panics
    /// If the chromosome is not valid for this evaluator's catalog
    /// (see [`ScheduleChromosome::is_valid`]).
    pub fn evaluate(&self, chromosome: &ScheduleChromosome) -> f64 {
        self.breakdown(chromosome).total
    }

    /// Computes fitness together with per-term counts.
    ///
    /// # Panics
    /// Same as [`evaluate`](Self::evaluate).
    pub fn breakdown(&self, chromosome: &ScheduleChromosome) -> FitnessBreakdown {
        let catalog = self.catalog;
        let rules = &catalog.rules;
        let genes = chromosome.genes();
        let n_slots = self.hours.len();
        let n_facilitators = self.min_loads.len();

        let mut b = FitnessBreakdown::default();
        let mut room_slot = vec![0u32; self.room_split.len() * n_slots];
        let mut facilitator_slot = vec![0u32; n_facilitators * n_slots];
        let mut facilitator_total = vec![0usize; n_facilitators];

        // Per-activity terms
        for (a, gene) in genes.iter().enumerate() {
            room_slot[gene.room * n_slots + gene.time_slot] += 1;
            facilitator_slot[gene.facilitator * n_slots + gene.time_slot] += 1;
            facilitator_total[gene.facilitator] += 1;

            let enrollment = f64::from(catalog.activities[a].enrollment);
            let capacity = f64::from(catalog.rooms[gene.room].capacity);
            let size = &rules.room_size;
            let size_term = if enrollment > capacity {
                b.room_too_small += 1;
                size.too_small
            } else if capacity > size.large_factor * enrollment {
                b.room_very_large += 1;
                size.very_large
            } else if capacity > size.oversized_factor * enrollment {
                b.room_oversized += 1;
                size.oversized
            } else {
                b.room_good_fit += 1;
                size.good_fit
            };

            let preference_term = match self.preference[a * n_facilitators + gene.facilitator] {
                FacilitatorPreference::Preferred => {
                    b.facilitator_preferred += 1;
                    rules.preference.preferred
                }
                FacilitatorPreference::Other => {
                    b.facilitator_other += 1;
                    rules.preference.other
                }
                FacilitatorPreference::Unlisted => {
                    b.facilitator_unlisted += 1;
                    rules.preference.unlisted
                }
            };

            if !self.equipment_ok[a * self.room_split.len() + gene.room] {
                b.missing_equipment += 1;
            }

            b.activity_terms += size_term;
            b.activity_terms += preference_term;
        }
        b.total = b.activity_terms;

        // Room conflicts
        for &count in &room_slot {
            if count >= 2 {
                b.room_conflicts += 1;
                b.total += rules.room_conflict_penalty;
            }
        }

        // Facilitator slot load
        for &count in &facilitator_slot {
            match count {
                0 => {}
                1 => {
                    b.facilitator_single_slot += 1;
                    b.total += rules.slot_load.single;
                }
                _ => {
                    b.facilitator_double_booked += 1;
                    b.total += rules.slot_load.double_booked;
                }
            }
        }

        // Facilitator total load (idle facilitators carry no load term)
        let load = &rules.total_load;
        for (f, &count) in facilitator_total.iter().enumerate() {
            if count == 0 {
                continue;
            }
            if count > load.max_load {
                b.facilitator_overloaded += 1;
                b.total += load.overload;
            } else if count < self.min_loads[f] {
                b.facilitator_underloaded += 1;
                b.total += load.underload;
            }
        }

        // Same facilitator in adjacent slots
        let consecutive = &rules.facilitator_consecutive;
        for (i, gi) in genes.iter().enumerate() {
            for gj in &genes[i + 1..] {
                if gi.facilitator != gj.facilitator || self.gap(gi.time_slot, gj.time_slot) != 1 {
                    continue;
                }
                let (split_i, split_j) = (self.room_split[gi.room], self.room_split[gj.room]);
                if split_i != split_j {
                    b.facilitator_consecutive_split += 1;
                } else {
                    b.facilitator_consecutive += 1;
                }
                b.total += consecutive.score(split_i, split_j);
            }
        }

        // Linked activity pairs
        for pair in &self.pairs {
            let (g1, g2) = (&genes[pair.first], &genes[pair.second]);
            let gap = self.gap(g1.time_slot, g2.time_slot);
            match pair.rule {
                PairRule::Sections(rule) => {
                    if gap > rule.far_apart_hours {
                        b.section_far_apart += 1;
                    } else if gap == 0 {
                        b.section_same_slot += 1;
                    }
                    b.total += rule.score(gap);
                }
                PairRule::Courses(rule) => match gap {
                    0 => {
                        b.course_same_slot += 1;
                        b.total += rule.same_slot_penalty;
                    }
                    1 => {
                        let (s1, s2) = (self.room_split[g1.room], self.room_split[g2.room]);
                        if s1 != s2 {
                            b.course_consecutive_split += 1;
                        } else {
                            b.course_consecutive += 1;
                        }
                        b.total += rule.consecutive.score(s1, s2);
                    }
                    2 => {
                        b.course_one_gap += 1;
                        b.total += rule.one_gap_bonus;
                    }
                    _ => {}
                },
            }
        }

        b
    }

    /// Distance in hours between two slots.
    fn gap(&self, a: usize, b: usize) -> u32 {
        self.hours[a].abs_diff(self.hours[b])
    }
}
