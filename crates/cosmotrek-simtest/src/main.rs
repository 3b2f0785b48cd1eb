//! Cosmotrek headless simulation harness.
//!
//! Validates catalogs, the performance model, and full mission runs
//! without any networking. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p cosmotrek-simtest
//!   cargo run -p cosmotrek-simtest -- --verbose

use cosmotrek_logic::catalog::{Catalog, EffectKind, RiskTier};
use cosmotrek_logic::performance::{delta_v, max_payload_for_destination, max_unladen_range};
use cosmotrek_logic::simulation::{MissionState, MissionStatus, Tuning};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Cosmotrek Simulation Harness ===\n");

    let catalog = Catalog::builtin();
    let mut results = Vec::new();

    // 1. Catalog integrity
    results.extend(validate_catalog(&catalog, verbose));

    // 2. Performance model
    results.extend(validate_performance(&catalog, verbose));

    // 3. Assembly gate
    results.extend(validate_assembly(&catalog));

    // 4. Mission run sweep
    results.extend(validate_mission_runs(&catalog, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Catalog integrity ────────────────────────────────────────────────

fn validate_catalog(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog Integrity ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "catalog_counts".into(),
        passed: catalog.all_spacecraft().len() == 4
            && catalog.all_modules().len() == 18
            && catalog.all_destinations().len() == 3
            && catalog.all_events().len() == 6,
        detail: format!(
            "{} spacecraft, {} modules, {} destinations, {} events",
            catalog.all_spacecraft().len(),
            catalog.all_modules().len(),
            catalog.all_destinations().len(),
            catalog.all_events().len()
        ),
    });

    let bad_mass: Vec<_> = catalog
        .all_modules()
        .iter()
        .filter(|m| m.mass_kg <= 0.0)
        .collect();
    results.push(TestResult {
        name: "module_positive_masses".into(),
        passed: bad_mass.is_empty(),
        detail: if bad_mass.is_empty() {
            "all modules have positive mass".into()
        } else {
            format!("{} modules with non-positive mass", bad_mass.len())
        },
    });

    let effects: std::collections::HashSet<_> =
        catalog.all_events().iter().map(|e| e.effect).collect();
    results.push(TestResult {
        name: "events_cover_all_effects".into(),
        passed: effects.len() == 6 && effects.contains(&EffectKind::None),
        detail: format!("{} distinct effect kinds", effects.len()),
    });

    let tiers: Vec<RiskTier> = catalog.all_destinations().iter().map(|d| d.risk_tier).collect();
    results.push(TestResult {
        name: "destination_risk_tiers".into(),
        passed: tiers.contains(&RiskTier::Low)
            && tiers.contains(&RiskTier::Medium)
            && tiers.contains(&RiskTier::High),
        detail: "low/medium/high tiers all present".into(),
    });

    if verbose {
        for destination in catalog.all_destinations() {
            println!(
                "    {}: {} turns, {:.0} m/s required, {:?} risk",
                destination.id, destination.turn_count, destination.required_delta_v,
                destination.risk_tier
            );
        }
    }

    results
}

// ── 2. Performance model ────────────────────────────────────────────────

fn validate_performance(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Performance Model ---");
    let mut results = Vec::new();

    // Worked example: Falcon 9 first stage figures
    let dv = delta_v(28.2, 433.1, 282.0);
    results.push(TestResult {
        name: "rocket_equation_example".into(),
        passed: (dv - 8177.0).abs() < 5.0,
        detail: format!("computed {dv:.0} m/s, expected ~8177"),
    });

    results.push(TestResult {
        name: "delta_v_zero_dry_mass_guard".into(),
        passed: delta_v(0.0, 100.0, 300.0) == 0.0,
        detail: "non-positive dry mass yields zero".into(),
    });

    // Payload monotonicity across every vehicle/destination pairing
    let mut monotonic = true;
    for spec in catalog.all_spacecraft() {
        for destination in catalog.all_destinations() {
            let mut prev = f64::INFINITY;
            for step in 0..=20 {
                let distance = destination.nominal_distance * step as f64 / 10.0;
                let payload = max_payload_for_destination(spec, destination, distance);
                if payload > prev + 1e-9 {
                    monotonic = false;
                }
                prev = payload;
            }
        }
    }
    results.push(TestResult {
        name: "payload_monotonic_in_distance".into(),
        passed: monotonic,
        detail: "payload capacity never grows with distance".into(),
    });

    // Every destination must be reachable by at least one vehicle
    let mut unreachable = Vec::new();
    for destination in catalog.all_destinations() {
        let feasible = catalog.all_spacecraft().iter().any(|spec| {
            max_payload_for_destination(spec, destination, destination.nominal_distance) > 150.0
        });
        if !feasible {
            unreachable.push(destination.id);
        }
    }
    results.push(TestResult {
        name: "every_destination_reachable".into(),
        passed: unreachable.is_empty(),
        detail: if unreachable.is_empty() {
            "each destination has at least one capable vehicle".into()
        } else {
            format!("unreachable: {unreachable:?}")
        },
    });

    if verbose {
        for spec in catalog.all_spacecraft() {
            for destination in catalog.all_destinations() {
                let range = max_unladen_range(spec, destination);
                let payload =
                    max_payload_for_destination(spec, destination, destination.nominal_distance);
                println!(
                    "    {} -> {}: range {:.0}, payload {:.0} kg",
                    spec.id, destination.id, range, payload
                );
            }
        }
    }

    results
}

// ── 3. Assembly gate ────────────────────────────────────────────────────

fn validate_assembly(catalog: &Catalog) -> Vec<TestResult> {
    println!("--- Assembly Gate ---");
    let mut results = Vec::new();

    let light = vec!["storage".to_string(), "quarters".to_string()];
    results.push(TestResult {
        name: "light_loadout_accepted".into(),
        passed: MissionState::assemble(catalog, "falcon9", "moon", &light).is_ok(),
        detail: "350 kg loadout fits falcon9 -> moon".into(),
    });

    let heavy: Vec<String> = catalog
        .all_modules()
        .iter()
        .map(|m| m.id.to_string())
        .collect();
    results.push(TestResult {
        name: "full_catalog_loadout_rejected_somewhere".into(),
        passed: MissionState::assemble(catalog, "gslv", "exoplanet", &heavy).is_err(),
        detail: "all 18 modules exceed gslv's exoplanet margin".into(),
    });

    results.push(TestResult {
        name: "unknown_ids_rejected".into(),
        passed: MissionState::assemble(catalog, "nostromo", "moon", &[]).is_err()
            && MissionState::assemble(catalog, "falcon9", "krypton", &[]).is_err(),
        detail: "bad spacecraft/destination ids fail fast".into(),
    });

    results
}

// ── 4. Mission run sweep ────────────────────────────────────────────────

fn validate_mission_runs(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Mission Runs ---");
    let mut results = Vec::new();
    let tuning = Tuning::default();

    let mut arrived = 0u32;
    let mut failed = 0u32;
    let mut invariant_violations = Vec::new();

    for seed in 0..50u64 {
        let mut state = match MissionState::assemble(
            catalog,
            "falcon9",
            "mars",
            &["storage".to_string(), "quarters".to_string(), "recreation".to_string()],
        ) {
            Ok(state) => state,
            Err(err) => {
                invariant_violations.push(format!("assembly refused: {err}"));
                break;
            }
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let status = state.depart(catalog.all_events(), &tuning, &mut rng);

        match status {
            MissionStatus::Arrived => {
                arrived += 1;
                if state.diary().len() != state.turn_count() as usize {
                    invariant_violations.push(format!("seed {seed}: short diary on arrival"));
                }
            }
            MissionStatus::Failed => {
                failed += 1;
                if !state.diary().last().map(|e| e.fatal).unwrap_or(false) {
                    invariant_violations.push(format!("seed {seed}: failure without fatal entry"));
                }
            }
            other => invariant_violations.push(format!("seed {seed}: non-terminal {other:?}")),
        }
        if state.score() < 0 {
            invariant_violations.push(format!("seed {seed}: negative score"));
        }
    }

    results.push(TestResult {
        name: "run_sweep_invariants".into(),
        passed: invariant_violations.is_empty(),
        detail: if invariant_violations.is_empty() {
            format!("50 seeds: {arrived} arrived, {failed} failed, all invariants held")
        } else {
            invariant_violations.join("; ")
        },
    });

    // Determinism: one seed, two runs, identical diaries
    let run = |seed: u64| {
        let mut state = MissionState::assemble(
            catalog,
            "longmarch8a",
            "moon",
            &["storage".to_string()],
        )
        .expect("loadout fits");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        state.depart(catalog.all_events(), &tuning, &mut rng);
        state
    };
    let first = run(42);
    let second = run(42);
    results.push(TestResult {
        name: "deterministic_replay".into(),
        passed: first.diary() == second.diary() && first.score() == second.score(),
        detail: format!("seed 42 reproduces {} entries", first.diary().len()),
    });

    if verbose {
        println!(
            "    sample run: status {:?}, score {}, {:.1} kWh, {:.1} L",
            first.status(),
            first.score(),
            first.ledger().energy_consumed,
            first.ledger().water_consumed
        );
    }

    results
}
