//! Static mission catalogs — spacecraft, habitat modules, destinations, events.
//!
//! All four tables are fixed educational content: they are built once at
//! process start via [`Catalog::builtin`] and passed by reference into the
//! simulator. Nothing here is ever mutated at runtime.

use serde::Serialize;
use thiserror::Error;

/// Launch vehicle catalog entry with the derived performance figures the
/// assembly screen shows to students.
#[derive(Debug, Clone, Serialize)]
pub struct SpacecraftSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub operator: &'static str,
    pub description: &'static str,
    /// Nominal payload capacity in metric tons.
    pub payload_capacity_t: f64,
    pub mission_profile: &'static str,
    /// Total thrust in kN.
    pub total_thrust_kn: f64,
    /// Specific impulse in seconds.
    pub specific_impulse_s: f64,
    /// Dry mass in metric tons.
    pub dry_mass_t: f64,
    /// Propellant mass in metric tons.
    pub propellant_mass_t: f64,
    /// Total delta-v capability in m/s.
    pub delta_v_total: f64,
    pub thrust_to_weight: f64,
}

/// Habitat module catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct HabitatModule {
    pub id: &'static str,
    pub name: &'static str,
    /// Module mass in kg.
    pub mass_kg: f64,
    /// Energy draw per turn in kW.
    pub energy_draw: f64,
    /// Water draw per turn in liters.
    pub water_draw: f64,
    pub note: &'static str,
}

/// How eventful a voyage to this destination tends to be.
///
/// Retained as catalog metadata for display; the per-turn event draw itself
/// is uniform across the event table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Mission destination catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Destination {
    pub id: &'static str,
    pub name: &'static str,
    /// Delta-v needed to reach the destination at all, in m/s.
    pub required_delta_v: f64,
    /// Nominal trip distance in simulation distance units (classroom scale,
    /// deliberately compressed relative to real trajectories).
    pub nominal_distance: f64,
    /// Number of turns a nominal trip takes.
    pub turn_count: u32,
    pub risk_tier: RiskTier,
}

/// What a drawn event does to the running mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    None,
    ResourceDamageRisk,
    DelayAndExtraConsumption,
    CargoLossRisk,
    ExtraConsumption,
    EfficiencyBonus,
}

/// Randomized turn event catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct MissionEvent {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub effect: EffectKind,
}

/// Unknown catalog reference. Reported before any mission state is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown spacecraft id `{0}`")]
    UnknownSpacecraft(String),
    #[error("unknown destination id `{0}`")]
    UnknownDestination(String),
    #[error("unknown habitat module id `{0}`")]
    UnknownModule(String),
    #[error("unknown event id `{0}`")]
    UnknownEvent(String),
}

/// The full static data set, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct Catalog {
    spacecraft: Vec<SpacecraftSpec>,
    modules: Vec<HabitatModule>,
    destinations: Vec<Destination>,
    events: Vec<MissionEvent>,
}

impl Catalog {
    /// Build the built-in educational data set.
    pub fn builtin() -> Self {
        Self {
            spacecraft: spacecraft_catalog(),
            modules: module_catalog(),
            destinations: destination_catalog(),
            events: event_catalog(),
        }
    }

    pub fn spacecraft(&self, id: &str) -> Result<&SpacecraftSpec, CatalogError> {
        self.spacecraft
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::UnknownSpacecraft(id.to_string()))
    }

    pub fn module(&self, id: &str) -> Result<&HabitatModule, CatalogError> {
        self.modules
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::UnknownModule(id.to_string()))
    }

    pub fn destination(&self, id: &str) -> Result<&Destination, CatalogError> {
        self.destinations
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| CatalogError::UnknownDestination(id.to_string()))
    }

    pub fn event(&self, id: &str) -> Result<&MissionEvent, CatalogError> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CatalogError::UnknownEvent(id.to_string()))
    }

    pub fn all_spacecraft(&self) -> &[SpacecraftSpec] {
        &self.spacecraft
    }

    pub fn all_modules(&self) -> &[HabitatModule] {
        &self.modules
    }

    pub fn all_destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn all_events(&self) -> &[MissionEvent] {
        &self.events
    }
}

/// All available launch vehicles.
fn spacecraft_catalog() -> Vec<SpacecraftSpec> {
    vec![
        SpacecraftSpec {
            id: "falcon9",
            name: "Falcon 9",
            operator: "USA / SpaceX",
            description: "Reusable two-stage rocket with an excellent thrust-to-weight ratio. Ideal for heavy payloads.",
            payload_capacity_t: 22.8,
            mission_profile: "Two-Stage",
            total_thrust_kn: 7607.0,
            specific_impulse_s: 282.0,
            dry_mass_t: 28.2,
            propellant_mass_t: 433.1,
            delta_v_total: 9300.0,
            thrust_to_weight: 1.8,
        },
        SpacecraftSpec {
            id: "pslv",
            name: "PSLV",
            operator: "India / ISRO",
            description: "Reliable multi-stage rocket capable of inserting payloads into polar and sun-synchronous orbits.",
            payload_capacity_t: 3.8,
            mission_profile: "Multiple Burns",
            total_thrust_kn: 4800.0,
            specific_impulse_s: 262.0,
            dry_mass_t: 18.5,
            propellant_mass_t: 230.0,
            delta_v_total: 8200.0,
            thrust_to_weight: 1.4,
        },
        SpacecraftSpec {
            id: "longmarch8a",
            name: "Long March 8A",
            operator: "China / CASC",
            description: "Medium-lift launcher with capability for multiple orbits and extended coasting phases.",
            payload_capacity_t: 9.8,
            mission_profile: "Extended Coasting",
            total_thrust_kn: 5800.0,
            specific_impulse_s: 275.0,
            dry_mass_t: 22.1,
            propellant_mass_t: 320.5,
            delta_v_total: 8800.0,
            thrust_to_weight: 1.6,
        },
        SpacecraftSpec {
            id: "gslv",
            name: "GSLV",
            operator: "India / ISRO",
            description: "Rocket with a cryogenic upper stage for precise insertion into transfer orbits.",
            payload_capacity_t: 2.5,
            mission_profile: "Cryogenic Upper Stage",
            total_thrust_kn: 4200.0,
            specific_impulse_s: 295.0,
            dry_mass_t: 16.8,
            propellant_mass_t: 198.7,
            delta_v_total: 9500.0,
            thrust_to_weight: 1.3,
        },
    ]
}

/// All available habitat modules.
fn module_catalog() -> Vec<HabitatModule> {
    vec![
        HabitatModule {
            id: "life_support",
            name: "Life Support",
            mass_kg: 800.0,
            energy_draw: 15.0,
            water_draw: 50.0,
            note: "Essential. Connects to quarters, sanitation, and food production.",
        },
        HabitatModule {
            id: "quarters",
            name: "Private Quarters",
            mass_kg: 200.0,
            energy_draw: 1.0,
            water_draw: 5.0,
            note: "Crew accommodations. Can be integrated with recreation.",
        },
        HabitatModule {
            id: "galley",
            name: "Food and Meals",
            mass_kg: 300.0,
            energy_draw: 3.0,
            water_draw: 20.0,
            note: "Area for food preparation and consumption.",
        },
        HabitatModule {
            id: "medical",
            name: "Medical Module",
            mass_kg: 250.0,
            energy_draw: 2.0,
            water_draw: 5.0,
            note: "For medical emergencies and crew health monitoring.",
        },
        HabitatModule {
            id: "exercise",
            name: "Exercise",
            mass_kg: 400.0,
            energy_draw: 5.0,
            water_draw: 2.0,
            note: "Equipment to mitigate muscle and bone loss.",
        },
        HabitatModule {
            id: "research",
            name: "Work and Research",
            mass_kg: 350.0,
            energy_draw: 4.0,
            water_draw: 2.0,
            note: "Laboratory for conducting scientific experiments.",
        },
        HabitatModule {
            id: "storage",
            name: "Storage",
            mass_kg: 150.0,
            energy_draw: 0.5,
            water_draw: 0.0,
            note: "Stock of supplies, tools, and samples.",
        },
        HabitatModule {
            id: "sanitation",
            name: "Sanitation and Hygiene",
            mass_kg: 250.0,
            energy_draw: 2.0,
            water_draw: 30.0,
            note: "Bathroom, shower, and water recycling systems.",
        },
        HabitatModule {
            id: "inflatable",
            name: "Expandable Inflatable",
            mass_kg: 500.0,
            energy_draw: 2.0,
            water_draw: 5.0,
            note: "Large-volume module when inflated, highly versatile.",
        },
        HabitatModule {
            id: "airlock",
            name: "Airlock",
            mass_kg: 300.0,
            energy_draw: 2.0,
            water_draw: 2.0,
            note: "Depressurization chamber for extravehicular activities.",
        },
        HabitatModule {
            id: "shielding",
            name: "Shielding and Protection",
            mass_kg: 600.0,
            energy_draw: 0.0,
            water_draw: 0.0,
            note: "Integrated with inflatable or structural modules.",
        },
        HabitatModule {
            id: "structural",
            name: "Modular Structural",
            mass_kg: 400.0,
            energy_draw: 1.0,
            water_draw: 0.0,
            note: "Base for other modules, easy reconfiguration.",
        },
        HabitatModule {
            id: "recreation",
            name: "Culture and Leisure",
            mass_kg: 150.0,
            energy_draw: 1.0,
            water_draw: 0.0,
            note: "Integrates with quarters, inflatable, or research.",
        },
        HabitatModule {
            id: "robotics",
            name: "Construction and Maintenance Robotics",
            mass_kg: 350.0,
            energy_draw: 6.0,
            water_draw: 0.0,
            note: "Connects to structural and storage modules.",
        },
        HabitatModule {
            id: "hydroponics",
            name: "Food Production (Hydroponics)",
            mass_kg: 500.0,
            energy_draw: 8.0,
            water_draw: 40.0,
            note: "Growing plants in a controlled environment to supplement the diet.",
        },
        HabitatModule {
            id: "control",
            name: "Control and Communications",
            mass_kg: 200.0,
            energy_draw: 3.0,
            water_draw: 0.0,
            note: "Overlaps with research and operations.",
        },
        HabitatModule {
            id: "multipurpose",
            name: "Multifunctional Module",
            mass_kg: 600.0,
            energy_draw: 4.0,
            water_draw: 10.0,
            note: "Dormitory, meals, leisure, and work in one volume.",
        },
        HabitatModule {
            id: "printshop",
            name: "3D Printing and Manufacturing",
            mass_kg: 300.0,
            energy_draw: 5.0,
            water_draw: 2.0,
            note: "Manufacturing spare parts and tools on demand.",
        },
    ]
}

/// All available mission destinations.
///
/// Distances and delta-v requirements are tuned so that every vehicle has a
/// niche: some vehicle/destination pairings leave generous payload margins,
/// some leave tight ones, and some are outright infeasible.
fn destination_catalog() -> Vec<Destination> {
    vec![
        Destination {
            id: "moon",
            name: "Moon",
            required_delta_v: 7800.0,
            nominal_distance: 12_000.0,
            turn_count: 15,
            risk_tier: RiskTier::Low,
        },
        Destination {
            id: "mars",
            name: "Mars",
            required_delta_v: 8600.0,
            nominal_distance: 30_000.0,
            turn_count: 60,
            risk_tier: RiskTier::Medium,
        },
        Destination {
            id: "exoplanet",
            name: "Exoplanet",
            required_delta_v: 9200.0,
            nominal_distance: 50_000.0,
            turn_count: 250,
            risk_tier: RiskTier::High,
        },
    ]
}

/// The six randomized turn events.
fn event_catalog() -> Vec<MissionEvent> {
    vec![
        MissionEvent {
            id: "solar_storm",
            name: "Solar Storm",
            description: "A radiation wave hits the spacecraft. Modules with low shielding may suffer damage.",
            effect: EffectKind::ResourceDamageRisk,
        },
        MissionEvent {
            id: "mechanical_failure",
            name: "Minor Mechanical Failure",
            description: "A subsystem experiences a minor failure, consuming extra resources for repair and causing a slight delay.",
            effect: EffectKind::DelayAndExtraConsumption,
        },
        MissionEvent {
            id: "micrometeoroid",
            name: "Micrometeoroid Impact",
            description: "Small space debris collides with the hull. The spacecraft's shielding is tested.",
            effect: EffectKind::CargoLossRisk,
        },
        MissionEvent {
            id: "power_surge",
            name: "Power Surge",
            description: "A fluctuation in the power systems forces resource diversion for stabilization.",
            effect: EffectKind::ExtraConsumption,
        },
        MissionEvent {
            id: "all_calm",
            name: "All Calm",
            description: "The journey proceeds without incidents. The crew uses the calm to check systems.",
            effect: EffectKind::None,
        },
        MissionEvent {
            id: "optimized_navigation",
            name: "Optimized Navigation",
            description: "The flight team finds a more efficient trajectory, saving propellant and slightly advancing arrival.",
            effect: EffectKind::EfficiencyBonus,
        },
    ]
}
