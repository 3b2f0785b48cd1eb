//! Spacecraft performance model — delta-v, reachable range, payload capacity.
//!
//! Pure derived-value functions over catalog data. The range and payload
//! relations are a deliberately simplified classroom model, not trajectory
//! mechanics: a vehicle short on delta-v degrades gracefully instead of
//! failing hard, and payload capacity shrinks linearly with distance.

use crate::catalog::{Destination, SpacecraftSpec};

/// Standard gravity at Earth's surface, m/s².
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Conversion from surplus delta-v to bonus range: distance units gained per
/// km/s of surplus.
pub const RANGE_PER_SURPLUS_KM_S: f64 = 10_000.0;

/// Delta-v from the Tsiolkovsky rocket equation.
///
/// `Δv = Isp · g0 · ln(m0 / mf)` where `m0` is wet mass and `mf` dry mass.
/// Returns 0 for a non-positive dry mass; that is a guard against the mass
/// ratio collapsing, not an error condition.
pub fn delta_v(dry_mass_t: f64, propellant_mass_t: f64, specific_impulse_s: f64) -> f64 {
    if dry_mass_t <= 0.0 {
        return 0.0;
    }
    let wet_mass = dry_mass_t + propellant_mass_t;
    specific_impulse_s * STANDARD_GRAVITY * (wet_mass / dry_mass_t).ln()
}

/// Maximum distance the vehicle can reach with no payload aboard.
///
/// With surplus delta-v the nominal distance is extended proportionally to
/// the surplus; without enough delta-v the vehicle only reaches a fraction
/// of the nominal distance.
pub fn max_unladen_range(spec: &SpacecraftSpec, destination: &Destination) -> f64 {
    let available = spec.delta_v_total;
    let required = destination.required_delta_v;
    if available >= required {
        let surplus = available - required;
        destination.nominal_distance + (surplus / 1000.0) * RANGE_PER_SURPLUS_KM_S
    } else {
        destination.nominal_distance * (available / required)
    }
}

/// Maximum payload the vehicle can carry to a destination over `distance`.
///
/// Linear falloff from the nominal capacity: at zero distance the full
/// capacity is available, at the unladen-range limit nothing is. This is
/// the single feasibility gate applied at assembly time, and it is
/// monotonically non-increasing in distance.
pub fn max_payload_for_destination(
    spec: &SpacecraftSpec,
    destination: &Destination,
    distance: f64,
) -> f64 {
    let range = max_unladen_range(spec, destination);
    if range <= 0.0 {
        return 0.0;
    }
    let fraction = (1.0 - distance / range).clamp(0.0, 1.0);
    spec.payload_capacity_t * 1000.0 * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn falcon9_delta_v_matches_rocket_equation() {
        // 282 s × 9.81 m/s² × ln(461.3 / 28.2) ≈ 8177 m/s
        let dv = delta_v(28.2, 433.1, 282.0);
        assert!((dv - 8177.0).abs() < 5.0, "delta-v was {dv}");
    }

    #[test]
    fn delta_v_zero_for_non_positive_dry_mass() {
        assert_eq!(delta_v(0.0, 433.1, 282.0), 0.0);
        assert_eq!(delta_v(-1.0, 433.1, 282.0), 0.0);
    }

    #[test]
    fn delta_v_monotonic_in_propellant_mass() {
        let mut prev = 0.0;
        for propellant in [50.0, 100.0, 200.0, 400.0, 800.0] {
            let dv = delta_v(28.2, propellant, 282.0);
            assert!(dv > prev, "delta-v should grow with propellant");
            prev = dv;
        }
    }

    #[test]
    fn delta_v_monotonic_in_specific_impulse() {
        let mut prev = 0.0;
        for isp in [200.0, 250.0, 300.0, 350.0, 450.0] {
            let dv = delta_v(28.2, 433.1, isp);
            assert!(dv > prev, "delta-v should grow with Isp");
            prev = dv;
        }
    }

    #[test]
    fn surplus_delta_v_extends_range() {
        let catalog = Catalog::builtin();
        let falcon = catalog.spacecraft("falcon9").unwrap();
        let moon = catalog.destination("moon").unwrap();
        // falcon9 has 1500 m/s surplus over the moon requirement
        let range = max_unladen_range(falcon, moon);
        assert!(range > moon.nominal_distance);
        assert!((range - (moon.nominal_distance + 15_000.0)).abs() < 1e-6);
    }

    #[test]
    fn deficient_delta_v_degrades_range() {
        let catalog = Catalog::builtin();
        let pslv = catalog.spacecraft("pslv").unwrap();
        let mars = catalog.destination("mars").unwrap();
        // pslv's 8200 m/s falls short of the 8600 m/s mars requirement
        let range = max_unladen_range(pslv, mars);
        assert!(range < mars.nominal_distance);
        assert!(range > 0.0);
    }

    #[test]
    fn payload_non_increasing_in_distance() {
        let catalog = Catalog::builtin();
        let falcon = catalog.spacecraft("falcon9").unwrap();
        let moon = catalog.destination("moon").unwrap();
        let mut prev = f64::INFINITY;
        for step in 0..20 {
            let distance = step as f64 * 2_500.0;
            let payload = max_payload_for_destination(falcon, moon, distance);
            assert!(payload <= prev, "payload should not grow with distance");
            prev = payload;
        }
    }

    #[test]
    fn payload_clamps_to_zero_beyond_range() {
        let catalog = Catalog::builtin();
        let pslv = catalog.spacecraft("pslv").unwrap();
        let mars = catalog.destination("mars").unwrap();
        // pslv cannot even reach mars unladen
        let payload = max_payload_for_destination(pslv, mars, mars.nominal_distance);
        assert_eq!(payload, 0.0);
    }

    #[test]
    fn payload_at_zero_distance_is_nominal_capacity() {
        let catalog = Catalog::builtin();
        let falcon = catalog.spacecraft("falcon9").unwrap();
        let moon = catalog.destination("moon").unwrap();
        let payload = max_payload_for_destination(falcon, moon, 0.0);
        assert!((payload - falcon.payload_capacity_t * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn catalog_delta_v_figures_are_roughly_consistent() {
        // The catalog's advertised totals include upper-stage contributions,
        // so they sit above the single-stage rocket equation value but in
        // the same band.
        let catalog = Catalog::builtin();
        for spec in catalog.all_spacecraft() {
            let dv = delta_v(spec.dry_mass_t, spec.propellant_mass_t, spec.specific_impulse_s);
            assert!(dv > 5_000.0, "{} computes {dv}", spec.id);
            assert!(dv < spec.delta_v_total * 1.2, "{} computes {dv}", spec.id);
        }
    }
}
