//! Mission simulator — the turn-resolution state machine.
//!
//! A mission moves `Assembling → Running → {Arrived, Failed}`. Assembly
//! validates the module loadout against the performance model's payload
//! capacity; the running phase is a pure sequential fold over randomly
//! drawn events, appending one diary entry per turn. All probabilities and
//! magnitudes live in [`Tuning`] so classrooms can rebalance without code
//! changes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, EffectKind, MissionEvent};
use crate::performance::max_payload_for_destination;

// ============================================================================
// TUNING
// ============================================================================

/// Every constant of the turn-resolution table, overridable as a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Score gained on an uneventful turn.
    pub base_turn_reward: i32,
    /// Chance that a solar storm damages a module.
    pub damage_chance: f64,
    /// Score lost when a module is damaged.
    pub damage_penalty: i32,
    /// Score lost to a mechanical delay.
    pub delay_penalty: i32,
    /// Extra energy drawn during a delay turn, kW.
    pub delay_extra_energy: f64,
    /// Extra water drawn during a delay turn, liters.
    pub delay_extra_water: f64,
    /// Chance that an impact sheds cargo.
    pub cargo_loss_chance: f64,
    /// Fraction of carried payload lost when cargo is shed.
    pub cargo_loss_fraction: f64,
    /// Score lost when cargo is shed.
    pub cargo_loss_penalty: i32,
    /// Score lost to a power surge.
    pub surge_penalty: i32,
    /// Extra energy drawn during a surge turn, kW.
    pub surge_extra_energy: f64,
    /// Score gained from an optimized trajectory.
    pub efficiency_reward: i32,
    /// Multiplier applied to the propellant drain rate per efficiency bonus.
    pub efficiency_factor: f64,
    /// Damaged-module count above which life support is lost.
    pub module_damage_threshold: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_turn_reward: 5,
            damage_chance: 0.30,
            damage_penalty: 10,
            delay_penalty: 5,
            delay_extra_energy: 8.0,
            delay_extra_water: 6.0,
            cargo_loss_chance: 0.20,
            cargo_loss_fraction: 0.10,
            cargo_loss_penalty: 15,
            surge_penalty: 5,
            surge_extra_energy: 12.0,
            efficiency_reward: 10,
            efficiency_factor: 0.95,
            module_damage_threshold: 3,
        }
    }
}

// ============================================================================
// MISSION STATE
// ============================================================================

/// Lifecycle of one mission run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    Assembling,
    Running,
    Arrived,
    Failed,
}

/// Per-turn resource movement recorded in the diary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDelta {
    /// Energy consumed this turn, kWh.
    pub energy: f64,
    /// Water consumed this turn, liters.
    pub water: f64,
    /// Change in carried payload mass, kg (negative when cargo is lost).
    pub payload_kg: f64,
    /// Modules newly damaged this turn.
    pub modules_damaged: u32,
}

/// One turn's outcome. The dispatcher replays these verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// 1-based turn number.
    pub turn: u32,
    /// Catalog id of the drawn event.
    pub event_id: String,
    pub score_delta: i32,
    pub resources: ResourceDelta,
    /// Set on the final entry of a failed mission.
    pub fatal: bool,
}

/// Running totals for the voyage.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceLedger {
    pub energy_consumed: f64,
    pub water_consumed: f64,
    pub damaged_modules: u32,
    /// Carried payload mass, kg.
    pub payload_kg: f64,
    /// Remaining propellant reserve, metric tons.
    pub propellant_reserve_t: f64,
    /// Multiplier on the propellant drain rate; efficiency bonuses lower it.
    pub propellant_rate_factor: f64,
}

/// A selected habitat module and its damage flag.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSlot {
    pub module_id: String,
    pub mass_kg: f64,
    pub energy_draw: f64,
    pub water_draw: f64,
    pub damaged: bool,
}

/// Module selection exceeds the computed payload capacity.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "selected modules weigh {selected_kg:.0} kg but {spacecraft_id} can carry \
     only {capacity_kg:.0} kg to {destination_id}"
)]
pub struct AssemblyError {
    pub spacecraft_id: String,
    pub destination_id: String,
    pub selected_kg: f64,
    pub capacity_kg: f64,
}

/// Why a departure request was refused. Nothing launches past this point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DepartureError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Final result handed back to the session layer once a run is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionOutcome {
    pub arrived: bool,
    pub score: i64,
    pub diary: Vec<DiaryEntry>,
}

/// Mutable state of one mission run. Created by [`MissionState::assemble`],
/// mutated exclusively by [`MissionState::depart`], then read out.
#[derive(Debug, Clone, Serialize)]
pub struct MissionState {
    spacecraft_id: String,
    destination_id: String,
    turn: u32,
    turn_count: u32,
    status: MissionStatus,
    modules: Vec<ModuleSlot>,
    ledger: ResourceLedger,
    /// Unclamped running score; clamped at read time.
    score_raw: i64,
    diary: Vec<DiaryEntry>,
    /// Nominal propellant drain per turn, tons.
    propellant_per_turn: f64,
}

impl MissionState {
    /// Validate a loadout and create a mission ready for departure.
    ///
    /// Unknown catalog ids and over-capacity selections are refused here;
    /// no mission state exists for a refused request.
    pub fn assemble(
        catalog: &Catalog,
        spacecraft_id: &str,
        destination_id: &str,
        module_ids: &[String],
    ) -> Result<Self, DepartureError> {
        let spec = catalog.spacecraft(spacecraft_id)?;
        let destination = catalog.destination(destination_id)?;
        let mut modules = Vec::with_capacity(module_ids.len());
        for id in module_ids {
            let module = catalog.module(id)?;
            modules.push(ModuleSlot {
                module_id: module.id.to_string(),
                mass_kg: module.mass_kg,
                energy_draw: module.energy_draw,
                water_draw: module.water_draw,
                damaged: false,
            });
        }

        let selected_kg: f64 = modules.iter().map(|m| m.mass_kg).sum();
        let capacity_kg =
            max_payload_for_destination(spec, destination, destination.nominal_distance);
        if selected_kg > capacity_kg {
            return Err(AssemblyError {
                spacecraft_id: spec.id.to_string(),
                destination_id: destination.id.to_string(),
                selected_kg,
                capacity_kg,
            }
            .into());
        }

        let turn_count = destination.turn_count;
        Ok(Self {
            spacecraft_id: spec.id.to_string(),
            destination_id: destination.id.to_string(),
            turn: 0,
            turn_count,
            status: MissionStatus::Assembling,
            modules,
            ledger: ResourceLedger {
                energy_consumed: 0.0,
                water_consumed: 0.0,
                damaged_modules: 0,
                payload_kg: selected_kg,
                propellant_reserve_t: spec.propellant_mass_t,
                propellant_rate_factor: 1.0,
            },
            score_raw: 0,
            diary: Vec::with_capacity(turn_count as usize),
            propellant_per_turn: spec.propellant_mass_t / turn_count.max(1) as f64,
        })
    }

    /// Run the mission to completion, drawing one event per turn.
    ///
    /// Returns the terminal status. Calling this on anything other than an
    /// assembled mission is a no-op that reports the current status.
    pub fn depart(
        &mut self,
        events: &[MissionEvent],
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> MissionStatus {
        assert!(!events.is_empty(), "event table must not be empty");
        if self.status != MissionStatus::Assembling {
            return self.status;
        }
        self.status = MissionStatus::Running;

        while self.turn < self.turn_count {
            let event = &events[rng.gen_range(0..events.len())];
            self.turn += 1;
            let entry = self.resolve_turn(event, tuning, rng);
            let fatal = entry.fatal;
            self.diary.push(entry);
            if fatal {
                self.status = MissionStatus::Failed;
                return self.status;
            }
        }

        self.status = MissionStatus::Arrived;
        self.status
    }

    /// Apply one event's resolution rule and produce the turn's diary entry.
    fn resolve_turn(
        &mut self,
        event: &MissionEvent,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> DiaryEntry {
        // Baseline habitat draw; damaged modules pull double.
        let mut energy: f64 = self
            .modules
            .iter()
            .map(|m| if m.damaged { m.energy_draw * 2.0 } else { m.energy_draw })
            .sum();
        let mut water: f64 = self
            .modules
            .iter()
            .map(|m| if m.damaged { m.water_draw * 2.0 } else { m.water_draw })
            .sum();
        let mut payload_change = 0.0;
        let mut newly_damaged = 0;
        let mut score_delta: i32 = 0;

        match event.effect {
            EffectKind::None => {
                score_delta += tuning.base_turn_reward;
            }
            EffectKind::ResourceDamageRisk => {
                if rng.gen_bool(tuning.damage_chance) {
                    if let Some(slot) = pick_undamaged(&mut self.modules, rng) {
                        slot.damaged = true;
                        self.ledger.damaged_modules += 1;
                        newly_damaged = 1;
                        score_delta -= tuning.damage_penalty;
                    }
                }
            }
            EffectKind::DelayAndExtraConsumption => {
                energy += tuning.delay_extra_energy;
                water += tuning.delay_extra_water;
                score_delta -= tuning.delay_penalty;
            }
            EffectKind::CargoLossRisk => {
                if rng.gen_bool(tuning.cargo_loss_chance) {
                    let lost = self.ledger.payload_kg * tuning.cargo_loss_fraction;
                    self.ledger.payload_kg -= lost;
                    payload_change = -lost;
                    score_delta -= tuning.cargo_loss_penalty;
                }
            }
            EffectKind::ExtraConsumption => {
                energy += tuning.surge_extra_energy;
                score_delta -= tuning.surge_penalty;
            }
            EffectKind::EfficiencyBonus => {
                self.ledger.propellant_rate_factor *= tuning.efficiency_factor;
                score_delta += tuning.efficiency_reward;
            }
        }

        self.ledger.energy_consumed += energy;
        self.ledger.water_consumed += water;
        let drain = self.propellant_per_turn * self.ledger.propellant_rate_factor;
        self.ledger.propellant_reserve_t = (self.ledger.propellant_reserve_t - drain).max(0.0);
        self.score_raw += i64::from(score_delta);

        let fatal = self.ledger.damaged_modules > tuning.module_damage_threshold;
        DiaryEntry {
            turn: self.turn,
            event_id: event.id.to_string(),
            score_delta,
            resources: ResourceDelta {
                energy,
                water,
                payload_kg: payload_change,
                modules_damaged: newly_damaged,
            },
            fatal,
        }
    }

    /// Cumulative score, clamped to zero.
    pub fn score(&self) -> i64 {
        self.score_raw.max(0)
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    pub fn arrived(&self) -> bool {
        self.status == MissionStatus::Arrived
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn diary(&self) -> &[DiaryEntry] {
        &self.diary
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn modules(&self) -> &[ModuleSlot] {
        &self.modules
    }

    pub fn spacecraft_id(&self) -> &str {
        &self.spacecraft_id
    }

    pub fn destination_id(&self) -> &str {
        &self.destination_id
    }

    /// Snapshot the final result for the session layer.
    pub fn outcome(&self) -> MissionOutcome {
        MissionOutcome {
            arrived: self.arrived(),
            score: self.score(),
            diary: self.diary.clone(),
        }
    }
}

/// Pick a random still-undamaged module, if any remain.
fn pick_undamaged<'a>(
    modules: &'a mut [ModuleSlot],
    rng: &mut impl Rng,
) -> Option<&'a mut ModuleSlot> {
    let undamaged: Vec<usize> = modules
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.damaged)
        .map(|(i, _)| i)
        .collect();
    if undamaged.is_empty() {
        return None;
    }
    let index = undamaged[rng.gen_range(0..undamaged.len())];
    Some(&mut modules[index])
}
