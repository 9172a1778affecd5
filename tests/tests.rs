use approx::assert_relative_eq;

use nbody::simulation::quadtree::{BBox, GNode, Gadget, Source};
use nbody::{
    AccelSet, Acceleration, Body, ConfigError, FastSimulation, IntegratorConfig, NBodySimulation, NVec2,
    NewtonianGravity, Parameters, Scenario, ScenarioConfig, SimError, Simulation, System, G_SOLAR,
};

/// Build a simple 2-body System separated along the x-axis
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    System::new(vec![
        Body::from_tuple((m1, -dist / 2.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((m2, dist / 2.0, 0.0, 0.0, 0.0)),
    ])
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters::new(1.0, 0.001, 1e-6).with_G(0.1)
}

/// Build a gravity term + AccelSet
pub fn gravity_set(p: &Parameters) -> AccelSet {
    AccelSet::new().with(NewtonianGravity { G: p.G, eps2: p.eps2 })
}

/// `3n` bodies on three concentric circles, masses 1..5
pub fn three_circles(n: usize) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(3 * n);
    for i in 0..n {
        let a = i as f64 * 0.3;
        let (x, y) = (50.0 * a.cos(), 50.0 * a.sin());
        let (vx, vy) = (50.0 * (i as f64 * 0.7).cos(), 50.0 * (i as f64 * 0.7).sin());
        let m = 1.0 + (i % 5) as f64;
        bodies.push(Body::from_tuple((m, x, y, 3.0 * vx, 3.0 * vy)));
        bodies.push(Body::from_tuple((m, 2.0 * x, 2.0 * y, 2.0 * vx, 2.0 * vy)));
        bodies.push(Body::from_tuple((m, 3.0 * x, 3.0 * y, vx, vy)));
    }
    bodies
}

/// Exact forces (not accelerations) by direct summation
fn direct_forces(bodies: &[Body], p: &Parameters) -> Vec<NVec2> {
    let sys = System::new(bodies.to_vec());
    let mut acc = vec![NVec2::zeros(); bodies.len()];
    gravity_set(p).acceleration(0.0, &sys, &mut acc);
    acc.iter().zip(bodies).map(|(a, b)| a * b.m).collect()
}

fn tree_forces(bodies: &[Body], p: &Parameters, theta: f64) -> Vec<NVec2> {
    let tree = Gadget::build(bodies, p.max_depth);
    bodies
        .iter()
        .enumerate()
        .map(|(i, b)| tree.compute_force(i, b, p.G, p.eps2, theta))
        .collect()
}

/// Walks the subtree and checks every aggregate against its residents.
/// Returns (mass, mass-weighted position sum, body count) of the subtree.
fn check_subtree(node: &GNode, bbox: &BBox) -> (f64, NVec2, usize) {
    match node.children() {
        None => {
            let mut mass = 0.0;
            let mut weighted = NVec2::zeros();
            for b in node.residents() {
                assert!(bbox.contains(&b.x), "body {} outside its leaf box {}", b.index, bbox);
                mass += b.m;
                weighted += b.x * b.m;
            }
            (mass, weighted, node.residents().len())
        }
        Some(children) => {
            let mut mass = 0.0;
            let mut weighted = NVec2::zeros();
            let mut count = 0;
            for (child, child_box) in children.iter().zip(bbox.split4()) {
                let (m, w, c) = check_subtree(child, &child_box);
                mass += m;
                weighted += w;
                count += c;
            }
            assert!(count >= 2, "internal node with {count} bodies");
            assert_eq!(node.len(), count);
            assert_relative_eq!(node.mass(), mass, max_relative = 1e-12);
            let com = node.center_of_mass().expect("internal nodes have a center of mass");
            let expected = weighted / mass;
            assert_relative_eq!(com.x, expected.x, epsilon = 1e-9, max_relative = 1e-9);
            assert_relative_eq!(com.y, expected.y, epsilon = 1e-9, max_relative = 1e-9);
            (mass, weighted, count)
        }
    }
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let sys = two_body_system(1.0, 2.0, 3.0);
    let p = test_params();
    let forces = gravity_set(&p);

    let mut acc = vec![NVec2::zeros(); 2];
    forces.acceleration(sys.t, &sys, &mut acc);

    let net = acc[0] * sys.bodies[0].m + acc[1] * sys.bodies[1].m;

    assert!(net.norm() < 1e-12, "Net momentum not zero: {:?}", net);
}

#[test]
fn gravity_points_toward_other_body() {
    let sys = two_body_system(2.0, 1.0, 1.0);
    let p = test_params();
    let forces = gravity_set(&p);

    let mut acc = vec![NVec2::zeros(); 2];
    forces.acceleration(sys.t, &sys, &mut acc);

    let dx = sys.bodies[1].x - sys.bodies[0].x;
    assert!(acc[0].dot(&dx) > 0.0, "Acceleration is not toward second body");
}

#[test]
fn gravity_inverse_square_law() {
    let sys_r = two_body_system(1.0, 1.0, 1.0);
    let sys_2r = two_body_system(2.0, 1.0, 1.0);
    let p = test_params();
    let forces = gravity_set(&p);

    let mut acc_r = vec![NVec2::zeros(); 2];
    let mut acc_2r = vec![NVec2::zeros(); 2];
    forces.acceleration(sys_r.t, &sys_r, &mut acc_r);
    forces.acceleration(sys_2r.t, &sys_2r, &mut acc_2r);

    let ratio = acc_r[0].norm() / acc_2r[0].norm();
    assert!((ratio - 4.0).abs() < 1e-3, "Expected ~4x, got {}", ratio);
}

#[test]
fn gravity_softening_prevents_blowup() {
    let mut p = test_params();
    p.eps2 = 0.1;

    let sys = two_body_system(1e-9, 1.0, 1.0);
    let forces = gravity_set(&p);

    let mut acc = vec![NVec2::zeros(); 2];
    forces.acceleration(sys.t, &sys, &mut acc);

    assert!(acc[0].norm() < 1e9, "Softening failed; acceleration too large");
}

// ==================================================================================
// Barnes-Hut tests
// ==================================================================================

#[test]
fn bh_root_mass_is_total_mass() {
    let bodies = three_circles(20);
    let tree = Gadget::build(&bodies, 48);
    let total: f64 = bodies.iter().map(|b| b.m).sum();

    assert_eq!(tree.len(), bodies.len());
    assert_relative_eq!(tree.mass(), total, max_relative = 1e-12);
}

#[test]
fn bh_aggregates_match_descendants() {
    let bodies = three_circles(20);
    let tree = Gadget::build(&bodies, 48);
    let (mass, _, count) = check_subtree(tree.root(), tree.bbox());
    assert_eq!(count, bodies.len());
    assert_relative_eq!(mass, tree.mass(), max_relative = 1e-12);
}

#[test]
fn bh_four_corners_tree_layout() {
    let bodies: Vec<Body> = [(50.0, 50.0), (-50.0, 50.0), (-50.0, -50.0), (50.0, -50.0)]
        .iter()
        .map(|&(x, y)| Body::from_tuple((1.0, x, y, 0.0, 0.0)))
        .collect();
    let tree = Gadget::build(&bodies, 48);

    let children = tree.root().children().expect("root splits");
    let placed: Vec<usize> = children.iter().map(|c| c.residents()[0].index).collect();
    // NE, NW, SW, SE
    assert_eq!(placed, vec![0, 1, 2, 3]);
    let com = tree.center_of_mass().unwrap();
    assert!(com.norm() < 1e-12, "center of mass {:?}", com);
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.node_count(), 5);
}

#[test]
fn bh_small_theta_matches_direct_sum() {
    // 7x7 lattice with unit spacing: every pair of bodies sits closer than
    // 100x their node size, so theta = 0.01 never approximates
    let bodies: Vec<Body> = (0..49)
        .map(|i| {
            let (x, y) = ((i % 7) as f64, (i / 7) as f64);
            Body::from_tuple((1.0 + (i % 3) as f64, x + 0.01 * y, y - 0.02 * x, 0.0, 0.0))
        })
        .collect();
    let p = test_params();

    let exact = direct_forces(&bodies, &p);
    let approx = tree_forces(&bodies, &p, 0.01);

    for (e, a) in exact.iter().zip(&approx) {
        let err = (e - a).norm();
        assert!(err <= 1e-6 * e.norm() + 1e-15, "error {err} against {}", e.norm());
    }
}

/// RMS of the force error over all bodies, relative to the RMS force
fn rms_relative_error(exact: &[NVec2], approx: &[NVec2]) -> f64 {
    let err2: f64 = exact.iter().zip(approx).map(|(e, a)| (e - a).norm_squared()).sum();
    let norm2: f64 = exact.iter().map(|e| e.norm_squared()).sum();
    (err2 / norm2).sqrt()
}

#[test]
fn bh_error_shrinks_with_theta() {
    let bodies = three_circles(40);
    let p = test_params();
    let exact = direct_forces(&bodies, &p);

    let errors: Vec<f64> = [1.0, 0.3, 0.1, 0.03, 0.0]
        .iter()
        .map(|&theta| rms_relative_error(&exact, &tree_forces(&bodies, &p, theta)))
        .collect();

    for pair in errors.windows(2) {
        assert!(pair[1] <= pair[0], "error grew as theta shrank: {errors:?}");
    }
    assert!(errors[0] > 10.0 * errors[2], "no convergence: {errors:?}");
    assert!(errors[4] < 1e-12, "theta = 0 differs from direct summation: {errors:?}");
}

#[test]
fn bh_moderate_theta_is_close_to_direct_sum() {
    let bodies = three_circles(40);
    let p = test_params();

    let exact = direct_forces(&bodies, &p);
    let approx = tree_forces(&bodies, &p, 0.5);

    let err2: f64 = exact.iter().zip(&approx).map(|(e, a)| (e - a).norm_squared()).sum();
    let norm2: f64 = exact.iter().map(|e| e.norm_squared()).sum();
    assert!((err2 / norm2).sqrt() < 0.05, "rms relative error {}", (err2 / norm2).sqrt());
}

#[test]
fn bh_identical_positions_terminate_with_finite_forces() {
    let bodies = vec![
        Body::from_tuple((1.0, 1.0, 1.0, 0.0, 0.0)),
        Body::from_tuple((2.0, 1.0, 1.0, 0.0, 0.0)),
    ];
    let p = test_params();
    let tree = Gadget::build(&bodies, p.max_depth);

    assert_eq!(tree.len(), 2);
    assert!(tree.depth() <= p.max_depth);
    for f in tree_forces(&bodies, &p, 0.5) {
        assert!(f.x.is_finite() && f.y.is_finite());
    }
}

#[test]
fn bh_coincident_pair_with_neighbour() {
    let bodies = vec![
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((1.0, 3.0, 4.0, 0.0, 0.0)),
    ];
    let p = test_params();
    let exact = direct_forces(&bodies, &p);
    let approx = tree_forces(&bodies, &p, 0.5);

    for (e, a) in exact.iter().zip(&approx) {
        assert!(a.x.is_finite() && a.y.is_finite());
        assert_relative_eq!(e.x, a.x, epsilon = 1e-12, max_relative = 1e-9);
        assert_relative_eq!(e.y, a.y, epsilon = 1e-12, max_relative = 1e-9);
    }
}

#[test]
fn bh_rebuild_is_deterministic() {
    let bodies = three_circles(15);
    let p = test_params();

    let a = Gadget::build(&bodies, p.max_depth);
    let b = Gadget::build(&bodies, p.max_depth);
    assert_eq!(a.root(), b.root());
    assert_eq!(a.to_string(), b.to_string());

    assert_eq!(tree_forces(&bodies, &p, 0.5), tree_forces(&bodies, &p, 0.5));
}

#[test]
fn bh_newton_third_law() {
    let sys = two_body_system(1.5, 2.0, 5.0);
    let p = test_params();

    let tree = tree_forces(&sys.bodies, &p, 0.5);
    let direct = direct_forces(&sys.bodies, &p);

    for f in [&tree, &direct] {
        assert_relative_eq!(f[0].x, -f[1].x, max_relative = 1e-12);
        assert_relative_eq!(f[0].y, -f[1].y, epsilon = 1e-15);
    }
    assert_relative_eq!(tree[0].x, direct[0].x, max_relative = 1e-12);
}

#[test]
fn bh_single_body_feels_nothing() {
    let bodies = vec![Body::from_tuple((1.0, 2.0, 3.0, 0.0, 0.0))];
    let p = test_params();
    assert_eq!(tree_forces(&bodies, &p, 0.5), vec![NVec2::zeros()]);
}

#[test]
fn bh_large_theta_never_counts_self() {
    // with a huge theta every node not holding the body is approximated
    let bodies = three_circles(10);
    let tree = Gadget::build(&bodies, 48);

    for (i, b) in bodies.iter().enumerate() {
        let list = tree.interaction_list(i, &b.x, &nbody::BarnesHut { theta: 1e6 });
        let mass: f64 = list.iter().map(|p| p.m).sum();
        assert_relative_eq!(mass, tree.mass() - b.m, max_relative = 1e-12);
        assert!(list.iter().all(|p| p.source != Source::Body(i)));
    }
}

#[test]
fn bh_zero_theta_lists_every_other_body() {
    let bodies = three_circles(5);
    let tree = Gadget::build(&bodies, 48);

    let list = tree.interaction_list(4, &bodies[4].x, &nbody::BarnesHut { theta: 0.0 });
    let mut seen: Vec<usize> = list
        .iter()
        .map(|p| match p.source {
            Source::Body(j) => j,
            Source::Aggregate { .. } => panic!("aggregate with theta = 0"),
        })
        .collect();
    seen.sort_unstable();
    let expected: Vec<usize> = (0..bodies.len()).filter(|&j| j != 4).collect();
    assert_eq!(seen, expected);
}

#[test]
fn bh_custom_criterion_closure() {
    let bodies = three_circles(5);
    let tree = Gadget::build(&bodies, 48);

    // never open anything: the root itself is the only pseudo-body
    let never = |_: &BBox, _: f64, _: &NVec2, _: &NVec2| false;
    let list = tree.interaction_list(0, &bodies[0].x, &never);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].source, Source::Aggregate { len: bodies.len() });
}

#[test]
fn gadget_lists_and_removes_bodies() {
    let bodies = vec![
        Body::from_tuple((1.0, 100.0, 100.0, 0.0, 0.0)),
        Body::from_tuple((2.0, -100.0, 100.0, 0.0, 0.0)),
        Body::from_tuple((3.0, -100.0, -100.0, 0.0, 0.0)),
        Body::from_tuple((4.0, 100.0, -100.0, 0.0, 0.0)),
    ];
    let mut tree = Gadget::build(&bodies, 48);

    let mut listed = tree.bodies();
    listed.sort_unstable();
    assert_eq!(listed, vec![0, 1, 2, 3]);

    assert!(tree.remove(0, &bodies[0].x));
    assert!(!tree.remove(0, &bodies[0].x));
    assert_eq!(tree.len(), 3);
    assert_relative_eq!(tree.mass(), 9.0);
    check_subtree(tree.root(), tree.bbox());

    assert!(tree.remove(1, &bodies[1].x));
    assert!(tree.remove(2, &bodies[2].x));
    assert!(tree.root().is_leaf());
    assert_eq!(tree.bodies(), vec![3]);
    assert_eq!(tree.center_of_mass(), Some(bodies[3].x));
}

#[test]
fn gadget_remove_half_of_a_circle() {
    let bodies = three_circles(10);
    let mut tree = Gadget::build(&bodies, 48);
    for (i, b) in bodies.iter().enumerate().take(15) {
        assert!(tree.remove(i, &b.x));
    }
    let remaining: f64 = bodies[15..].iter().map(|b| b.m).sum();
    assert_eq!(tree.len(), 15);
    assert_relative_eq!(tree.mass(), remaining, max_relative = 1e-12);
    check_subtree(tree.root(), tree.bbox());
}

#[test]
fn gadget_display_shows_every_node() {
    let bodies = three_circles(3);
    let tree = Gadget::build(&bodies, 48);
    let dump = tree.to_string();
    assert_eq!(dump.lines().count(), tree.node_count());
    assert!(dump.starts_with("Box("));
    assert!(dump.contains("└─ "));
}

// ==================================================================================
// Integrator tests
// ==================================================================================

/// Period of the two-body orbit from the vis-viva relation
fn kepler_period(g: f64, m_total: f64, r: f64, v: f64) -> f64 {
    let energy = 0.5 * v * v - g * m_total / r;
    let a = -g * m_total / (2.0 * energy);
    2.0 * std::f64::consts::PI * (a.powi(3) / (g * m_total)).sqrt()
}

#[test]
fn kepler_orbit_returns_after_one_period() {
    let bodies = vec![
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((3.0e-6, 0.0, 1.0, 4.44, 0.0)),
    ];
    let period = kepler_period(G_SOLAR, 1.0 + 3.0e-6, 1.0, 4.44);
    let params = Parameters::new(period, period / 50_000.0, 1e-4);

    let mut sim = FastSimulation::new(bodies.clone(), params).unwrap();
    assert_eq!(sim.timesteps(), 50_000);
    let trajectory = sim.run().unwrap();
    assert_eq!(trajectory.len(), 50_001);

    let end = &sim.system().bodies;
    assert!((end[1].x - bodies[1].x).norm() < 1e-2, "planet ended at {:?}", end[1].x);
    assert!(end[0].x.norm() < 1e-3, "sun drifted to {:?}", end[0].x);

    // it did go around: the far side of the orbit is about 1.33 AU away
    let far = trajectory.path(1).iter().map(|x| (x - bodies[1].x).norm()).fold(0.0, f64::max);
    assert!(far > 1.2, "max excursion {far}");
}

#[test]
fn direct_and_fast_agree_for_two_bodies() {
    let bodies = vec![
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((3.0e-6, 0.0, 1.0, 4.44, 0.0)),
    ];
    let params = Parameters::new(0.1, 1e-4, 1e-4);

    let mut direct = Simulation::new(bodies.clone(), params.clone()).unwrap();
    let mut fast = FastSimulation::new(bodies, params).unwrap();
    direct.run().unwrap();
    fast.run().unwrap();

    for (a, b) in direct.system().bodies.iter().zip(&fast.system().bodies) {
        assert_relative_eq!(a.x.x, b.x.x, epsilon = 1e-9);
        assert_relative_eq!(a.x.y, b.x.y, epsilon = 1e-9);
    }
}

#[test]
fn verlet_keeps_circular_orbit_round() {
    let v = (G_SOLAR * (1.0 + 3.0e-6)).sqrt();
    let bodies = vec![
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((3.0e-6, 0.0, 1.0, v, 0.0)),
    ];
    let params = Parameters::new(1.0, 1e-3, 1e-4);
    let mut sim = Simulation::new(bodies, params).unwrap().integrator(IntegratorConfig::Verlet);
    let trajectory = sim.run().unwrap();

    for s in &trajectory.snapshots {
        let r = (s.positions[1] - s.positions[0]).norm();
        assert!((r - 1.0).abs() < 1e-3, "radius {r} at t = {}", s.t);
    }
}

#[test]
fn steps_tolerate_rounding() {
    assert_eq!(Parameters::new(0.3, 0.1, 1e-3).steps(), 3);
    assert_eq!(Parameters::new(10.0, 0.01, 1e-3).steps(), 1000);
    assert_eq!(Parameters::new(0.25, 0.1, 1e-3).steps(), 2);
}

struct Poisoned;

impl Acceleration for Poisoned {
    fn acceleration(&self, _t: f64, _sys: &System, out: &mut [NVec2]) {
        if let Some(a) = out.last_mut() {
            a.x = f64::NAN;
        }
    }
}

#[test]
fn non_finite_step_is_rejected() {
    let bodies = vec![
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((1.0, 1.0, 0.0, 0.0, 0.0)),
    ];
    let mut sim = NBodySimulation::with_forces(bodies.clone(), test_params(), Poisoned).unwrap();

    assert_eq!(sim.step(), Err(SimError::NonFinite { step: 0, body: 1 }));
    assert_eq!(sim.system().bodies, bodies);
    assert_eq!(sim.system().t, 0.0);
    assert_eq!(sim.steps_taken(), 0);
}

// ==================================================================================
// Simulation / configuration tests
// ==================================================================================

#[test]
fn closest_distance_of_stationary_pair() {
    let bodies = vec![
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((1.0, 3.0, 4.0, 0.0, 0.0)),
    ];
    let mut sim = Simulation::new(bodies, Parameters::new(0.01, 0.001, 1e-3)).unwrap();
    let d = sim.closest_distance().unwrap().unwrap();
    assert!((d - 5.0).abs() < 0.1, "got {d}");

    let mut lonely = Simulation::new(vec![Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0))], Parameters::default()).unwrap();
    assert_eq!(lonely.closest_distance().unwrap(), None);
}

#[test]
fn invalid_setup_fails_fast() {
    let good = vec![Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0))];

    let bad_mass = vec![Body::from_tuple((0.0, 0.0, 0.0, 0.0, 0.0))];
    assert_eq!(
        FastSimulation::new(bad_mass, Parameters::default()).err(),
        Some(ConfigError::InvalidMass { index: 0, mass: 0.0 })
    );

    let zero_dt = Parameters::new(1.0, 0.0, 1e-3);
    assert!(matches!(
        Simulation::new(good.clone(), zero_dt).err(),
        Some(ConfigError::NonPositive { name: "dt", .. })
    ));

    let zero_theta = Parameters::default().with_theta(0.0);
    assert!(matches!(
        FastSimulation::new(good.clone(), zero_theta).err(),
        Some(ConfigError::NonPositive { name: "theta", .. })
    ));

    let no_softening = Parameters::new(1.0, 0.01, 0.0);
    assert!(matches!(
        FastSimulation::new(good.clone(), no_softening).err(),
        Some(ConfigError::NonPositive { name: "softening", .. })
    ));

    let negative_softening = Parameters::new(1.0, 0.01, -1e-3);
    assert_eq!(
        FastSimulation::new(good.clone(), negative_softening).err(),
        Some(ConfigError::NonPositive { name: "softening", value: -1e-3 })
    );

    let negative_time = Parameters::new(-1.0, 0.01, 1e-3);
    assert!(matches!(
        FastSimulation::new(good, negative_time).err(),
        Some(ConfigError::NonPositive { name: "total_time", .. })
    ));
}

#[test]
fn uncountable_step_total_is_rejected() {
    let one = vec![Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0))];

    assert_eq!(
        FastSimulation::new(one.clone(), Parameters::new(1e300, 1e-300, 1e-3)).err(),
        Some(ConfigError::TooManySteps { dt: 1e-300, total_time: 1e300 })
    );
    assert!(Simulation::new(one.clone(), Parameters::new(1e30, 1e-3, 1e-3)).is_err());

    // a long but countable run is accepted and only runs what is asked
    let mut sim = Simulation::new(one, Parameters::new(1e9, 1.0, 1e-3)).unwrap();
    assert_eq!(sim.timesteps(), 1_000_000_000);
    sim.step().unwrap();
    assert_eq!(sim.steps_taken(), 1);
}

/// Accepts writes but fails when flushed, like a full disk
struct FailingFlush(Vec<u8>);

impl std::io::Write for FailingFlush {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("disk full"))
    }
}

#[test]
fn trajectory_write_reports_flush_failure() {
    let bodies = vec![
        Body::from_tuple((1.0, 0.0, 0.0, 0.0, 0.0)),
        Body::from_tuple((1.0, 3.0, 4.0, 0.0, 0.0)),
    ];
    let mut sim = Simulation::new(bodies, Parameters::new(0.003, 0.001, 1e-3)).unwrap();
    let trajectory = sim.run().unwrap();

    let mut out = Vec::new();
    trajectory.write_yaml(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("snapshots"));
    assert_eq!(text.matches("positions").count(), trajectory.len());

    let err = trajectory.write_yaml(FailingFlush(Vec::new())).unwrap_err();
    assert_eq!(err.to_string(), "disk full");
}

const SCENARIO: &str = r#"
engine:
  method: "barnes_hut"
  integrator: "verlet"
  theta: 0.3
parameters:
  total_time: 0.05
  dt: 0.001
  softening: 1.0e-3
bodies:
  - m: 1.0
    x: [0.0, 0.0]
  - m: 3.0e-6
    x: [0.0, 1.0]
    v: [4.44, 0.0]
  - m: 1.0e-3
    x: [5.0, 0.0]
    v: [0.0, 2.8]
"#;

#[test]
fn scenario_from_yaml_runs() {
    let cfg = ScenarioConfig::from_yaml_str(SCENARIO).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert_eq!(scenario.parameters.theta, 0.3);
    assert_eq!(scenario.parameters.G, G_SOLAR);
    assert_eq!(scenario.system.bodies[0].v, NVec2::zeros());

    let mut sim = scenario.into_simulation().unwrap();
    let trajectory = sim.run().unwrap();
    assert_eq!(trajectory.len(), 51);
    assert_relative_eq!(sim.system().t, 0.05, epsilon = 1e-12);
}

#[test]
fn scenario_rejects_bad_bodies() {
    let three_d = SCENARIO.replace("x: [5.0, 0.0]", "x: [5.0, 0.0, 1.0]");
    let cfg = ScenarioConfig::from_yaml_str(&three_d).unwrap();
    assert_eq!(
        Scenario::build_scenario(cfg).err(),
        Some(ConfigError::Dimension { index: 2, field: "x", len: 3 })
    );

    let negative = SCENARIO.replace("m: 1.0e-3", "m: -1.0e-3");
    let cfg = ScenarioConfig::from_yaml_str(&negative).unwrap();
    assert!(matches!(
        Scenario::build_scenario(cfg).err(),
        Some(ConfigError::InvalidMass { index: 2, .. })
    ));

    let unsoftened = SCENARIO.replace("softening: 1.0e-3", "softening: 0.0");
    let cfg = ScenarioConfig::from_yaml_str(&unsoftened).unwrap();
    assert!(matches!(
        Scenario::build_scenario(cfg).err(),
        Some(ConfigError::NonPositive { name: "softening", .. })
    ));
}
