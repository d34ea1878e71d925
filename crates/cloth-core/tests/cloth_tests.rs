use glam::Vec3;
use cloth_core::constraints::distance::{
    solve_distance_constraints, ConstraintKind, DistanceConstraint,
};
use cloth_core::{step_all, ClothConfig, ClothSimulator};

fn sim_with(config: ClothConfig) -> ClothSimulator {
    ClothSimulator::new(config).unwrap()
}

fn assert_all_finite(sim: &ClothSimulator) {
    for (i, p) in sim.positions().iter().enumerate() {
        assert!(p.is_finite(), "non-finite position at particle {i}: {p}");
    }
    for (i, p) in sim.previous_positions().iter().enumerate() {
        assert!(p.is_finite(), "non-finite previous position at particle {i}: {p}");
    }
}

#[test]
fn test_single_step_from_rest_falls_straight_down() {
    let config = ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        ..ClothConfig::with_grid_size(4)
    };
    let mut sim = sim_with(config);
    let before: Vec<Vec3> = sim.positions().to_vec();

    sim.step(0.01);

    let expected_dy = -9.8 * 0.01 * 0.01;
    for (i, (&now, &was)) in sim.positions().iter().zip(&before).enumerate() {
        assert_eq!(now.x, was.x, "particle {i} drifted in x");
        assert_eq!(now.z, was.z, "particle {i} drifted in z");
        assert!(now.y < was.y, "particle {i} did not fall");
        assert!(
            (now.y - was.y - expected_dy).abs() < 1e-7,
            "particle {i} fell {} instead of {expected_dy}",
            now.y - was.y
        );
    }

    assert_eq!(sim.previous_positions(), &before[..], "history must hold pre-step positions");
    assert!(sim.accelerations().iter().all(|&a| a == Vec3::new(0.0, -9.8, 0.0)));
}

#[test]
fn test_rest_state_is_stable_without_force_or_time() {
    for n in [4, 5, 16] {
        let mut sim = sim_with(ClothConfig::weightless(n));
        let rest: Vec<Vec3> = sim.positions().to_vec();

        for _ in 0..100 {
            sim.step(0.0);
        }

        assert_eq!(sim.positions(), &rest[..], "grid size {n} drifted at rest");
    }
}

#[test]
fn test_identical_runs_are_deterministic() {
    let config = ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        iterations: 3,
        ..ClothConfig::with_grid_size(12)
    };
    let mut a = sim_with(config.clone());
    let mut b = sim_with(config);

    for step in 0..200 {
        let dt = 0.005 + (step % 7) as f32 * 0.001;
        a.step(dt);
        b.step(dt);
    }

    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.previous_positions(), b.previous_positions());
}

#[test]
fn test_particles_stay_outside_sphere() {
    let config = ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        ..ClothConfig::with_grid_size(16)
    };
    let mut sim = sim_with(config);
    let sphere = *sim.sphere();
    let min_dist = sphere.effective_radius() - 1e-5;

    for step in 0..300 {
        sim.step(0.01);
        for (i, p) in sim.positions().iter().enumerate() {
            let dist = p.distance(sphere.center);
            assert!(dist >= min_dist, "step {step}: particle {i} inside sphere, dist={dist}");
        }
    }

    assert_all_finite(&sim);
    let touching = sim
        .positions()
        .iter()
        .filter(|p| p.distance(sphere.center) < sphere.effective_radius() + 1e-3)
        .count();
    assert!(touching > 0, "cloth never reached the sphere");
}

#[test]
fn test_coincident_pair_is_skipped() {
    let p = Vec3::new(0.25, -0.1, 0.4);
    let mut positions = vec![p, p];
    let constraints = [DistanceConstraint::new(0, 1, 0.1, ConstraintKind::Horizontal)];

    let skipped = solve_distance_constraints(&constraints, &mut positions);

    assert_eq!(skipped, 1);
    assert_eq!(positions, vec![p, p], "skipped constraint must not move particles");
}

#[test]
fn test_coincident_particles_in_cloth_stay_finite() {
    let mut sim = sim_with(ClothConfig::weightless(4));
    let target = sim.positions()[0];
    sim.particles.position[1] = target;
    sim.particles.previous[1] = target;

    sim.step(0.0);
    assert_all_finite(&sim);

    for _ in 0..50 {
        sim.step(0.01);
    }
    assert_all_finite(&sim);
}

#[test]
fn test_more_iterations_tighten_constraints() {
    let stretch = |iterations: u32| {
        let config = ClothConfig {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            iterations,
            ..ClothConfig::with_grid_size(16)
        };
        let mut sim = sim_with(config);
        for _ in 0..100 {
            sim.step(0.01);
        }
        sim.constraints()
            .iter()
            .map(|c| {
                let len = sim.positions()[c.a as usize].distance(sim.positions()[c.b as usize]);
                (len - c.rest_length).abs()
            })
            .sum::<f32>()
    };

    let loose = stretch(1);
    let tight = stretch(8);
    assert!(tight < loose, "8 iterations ({tight}) should beat 1 ({loose})");
}

#[test]
fn test_initialize_restores_reference_configuration() {
    let config = ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        ..ClothConfig::with_grid_size(8)
    };
    let fresh = sim_with(config.clone());
    let mut sim = sim_with(config);

    for _ in 0..50 {
        sim.step(0.01);
    }
    assert_ne!(sim.positions(), fresh.positions());

    sim.initialize();
    assert_eq!(sim.positions(), fresh.positions());
    assert_eq!(sim.previous_positions(), fresh.previous_positions());
    assert_eq!(sim.accelerations(), fresh.accelerations());
    assert_eq!(sim.constraints(), fresh.constraints());

    sim.initialize();
    assert_eq!(sim.positions(), fresh.positions(), "initialize must be idempotent");
}

#[test]
fn test_anchor_unpinned_by_default() {
    let mut sim = sim_with(ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        ..ClothConfig::with_grid_size(8)
    });
    assert!(!sim.config().pin_anchor);
    let rest = sim.anchor_rest_position();

    for _ in 0..20 {
        sim.step(0.01);
    }

    assert!(sim.anchor_position().y < rest.y, "unpinned anchor should fall");
}

#[test]
fn test_pinned_anchor_holds_rest_position() {
    let mut sim = sim_with(ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        pin_anchor: true,
        ..ClothConfig::with_grid_size(8)
    });
    let rest = sim.anchor_rest_position();

    for _ in 0..50 {
        sim.step(0.01);
        assert_eq!(sim.anchor_position(), rest);
    }

    // Everything else still falls away from the pin.
    let corner = sim.positions()[0];
    assert!(corner.y < 0.0, "corner should sag, got {corner}");
}

#[test]
fn test_advance_uses_stored_time_step() {
    let config = ClothConfig::with_grid_size(6);
    let mut a = sim_with(config.clone());
    let mut b = sim_with(config);

    a.set_time_step(1.0 / 60.0).unwrap();
    for _ in 0..10 {
        a.advance();
        b.step(1.0 / 60.0);
    }

    assert_eq!(a.time_step(), 1.0 / 60.0);
    assert_eq!(a.positions(), b.positions());
}

#[test]
fn test_set_time_step_rejects_invalid_values() {
    let mut sim = sim_with(ClothConfig::with_grid_size(4));
    let original = sim.time_step();

    for dt in [0.0, -0.01, f32::NAN, f32::INFINITY] {
        assert!(sim.set_time_step(dt).is_err(), "dt={dt} should be rejected");
        assert_eq!(sim.time_step(), original);
    }
}

#[test]
fn test_step_all_matches_individual_steps() {
    let config = ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        ..ClothConfig::with_grid_size(8)
    };
    let mut batch = vec![sim_with(config.clone()), sim_with(ClothConfig::weightless(8))];
    let mut single = sim_with(config);

    for _ in 0..20 {
        step_all(&mut batch, 0.01);
        single.step(0.01);
    }

    assert_eq!(batch[0].positions(), single.positions());
    assert_eq!(batch[1].positions(), sim_with(ClothConfig::weightless(8)).positions());
}

#[test]
fn test_invalid_step_leaves_state_untouched() {
    let config = ClothConfig {
        gravity: Vec3::new(0.0, -9.8, 0.0),
        ..ClothConfig::with_grid_size(6)
    };
    let mut sim = sim_with(config.clone());
    let mut reference = sim_with(config);
    sim.step(0.01);
    reference.step(0.01);

    let positions = sim.positions().to_vec();
    let previous = sim.previous_positions().to_vec();
    for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.01] {
        sim.step(dt);
        assert_eq!(sim.positions(), &positions[..], "dt={dt} moved particles");
        assert_eq!(sim.previous_positions(), &previous[..], "dt={dt} touched history");
    }

    for _ in 0..10 {
        sim.step(0.01);
        reference.step(0.01);
    }
    assert_all_finite(&sim);
    assert_eq!(sim.positions(), reference.positions());
}

#[test]
fn test_set_gravity_rejects_non_finite_values() {
    let mut sim = sim_with(ClothConfig::with_grid_size(4));
    let original = sim.config().gravity;

    for gravity in [
        Vec3::new(0.0, f32::INFINITY, 0.0),
        Vec3::new(f32::NAN, 0.0, 0.0),
    ] {
        assert!(sim.set_gravity(gravity).is_err(), "gravity {gravity} should be rejected");
        assert_eq!(sim.config().gravity, original);
    }

    sim.set_gravity(Vec3::new(0.0, -9.8, 0.0)).unwrap();
    assert_eq!(sim.config().gravity, Vec3::new(0.0, -9.8, 0.0));
}

#[test]
fn test_nan_pair_is_skipped() {
    let good = Vec3::new(0.25, -0.1, 0.4);
    let mut positions = vec![Vec3::splat(f32::NAN), good];
    let constraints = [DistanceConstraint::new(0, 1, 0.1, ConstraintKind::Horizontal)];

    let skipped = solve_distance_constraints(&constraints, &mut positions);

    assert_eq!(skipped, 1);
    assert_eq!(positions[1], good, "NaN must not spread to the partner particle");
}

#[test]
fn test_set_iterations_rejects_zero() {
    let mut sim = sim_with(ClothConfig::with_grid_size(4));
    let original = sim.config().iterations;

    assert!(sim.set_iterations(0).is_err());
    assert_eq!(sim.config().iterations, original);

    sim.set_iterations(4).unwrap();
    assert_eq!(sim.config().iterations, 4);
}
