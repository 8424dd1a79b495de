//! Integration test: several devices drawing from one registry stream.
//!
//! A host steps devices in a fixed order each tick, and every enabled channel
//! advances the shared stream.  These tests replay the same stream by hand
//! and check that:
//! 1. Devices consume draws in step order, channel by channel
//! 2. Disabled channels leave the stream untouched
//! 3. Resetting the registry and the devices reproduces a run

use nalgebra::{UnitQuaternion, Vector3};
use perturb_core::prelude::*;
use perturb_devices::prelude::*;

const SEED: u64 = 2024;
const TICK: f64 = 0.01;

const CONFIG: &str = r#"
[battery.noise]
model = "uniform"
level = 0.05

[positioning.pos_noise]
model = "gaussian"
stddev = 0.01

[rotors.noise]
model = "uniform"
level = 0.1
"#;

fn config() -> ConfigNode {
    ConfigNode::from_toml_str("robot", CONFIG).expect("valid TOML")
}

struct Robot {
    battery: BatterySensor,
    positioning: PositioningSensor,
    rotors: RotorActuator,
}

impl Robot {
    fn new(registry: &mut RandomRegistry, config: &ConfigNode) -> Self {
        let rng = registry.default_stream();
        let mut robot = Self {
            battery: BatterySensor::new(rng.clone(), TICK),
            positioning: PositioningSensor::new(&rng),
            rotors: RotorActuator::new(rng),
        };
        robot.battery.init(config.child("battery").unwrap()).unwrap();
        robot.positioning.init(config.child("positioning").unwrap()).unwrap();
        robot.rotors.init(config.child("rotors").unwrap()).unwrap();
        robot
    }

    /// One host tick: battery, positioning, then rotors.
    fn step(&mut self, body: &mut RobotBody) -> (f64, Vector3<f64>, [f64; NUM_ROTORS]) {
        let charge = self.battery.update(body).available_charge;
        let position = self.positioning.update(body).position;
        self.rotors.set_rotor_velocities([400.0; NUM_ROTORS]);
        self.rotors.update(body);
        (charge, position, body.rotor_velocities)
    }

    fn reset(&mut self) {
        self.battery.reset();
        self.positioning.reset();
        self.rotors.reset();
    }
}

fn body() -> RobotBody {
    RobotBody {
        position: Vector3::new(1.0, -1.0, 0.5),
        orientation: UnitQuaternion::identity(),
        available_charge: 0.5,
        full_charge: 1.0,
        ..RobotBody::default()
    }
}

#[test]
fn devices_consume_draws_in_step_order() {
    let mut registry = RandomRegistry::new(SEED);
    let mut robot = Robot::new(&mut registry, &config());
    let mut body = body();
    let (charge, position, rotors) = robot.step(&mut body);

    let reference = RandomRegistry::new(SEED).default_stream();
    let expected_charge = 0.5 + reference.uniform_real(-0.05, 0.05);
    let expected_position = Vector3::new(
        1.0 + reference.gaussian_real(0.01, 0.0),
        -1.0 + reference.gaussian_real(0.01, 0.0),
        0.5 + reference.gaussian_real(0.01, 0.0),
    );
    let expected_rotors = [(); NUM_ROTORS].map(|()| 400.0 + 400.0 * reference.uniform_real(-0.1, 0.1));

    assert!((charge - expected_charge).abs() < 1e-12);
    assert!((position - expected_position).norm() < 1e-12);
    for (got, want) in rotors.iter().zip(expected_rotors) {
        assert!((got - want).abs() < 1e-9);
    }
}

#[test]
fn disabled_channels_do_not_advance_the_stream() {
    // Angle and axis channels are unconfigured; only the three position draws
    // and the battery draw happen before the rotors.
    let mut registry = RandomRegistry::new(SEED);
    let mut robot = Robot::new(&mut registry, &config());
    robot.step(&mut body());
    let after_step = registry.default_stream().uniform_real(0.0, 1.0);

    let reference = RandomRegistry::new(SEED).default_stream();
    reference.uniform_real(-0.05, 0.05);
    for _ in 0..3 {
        reference.gaussian_real(0.01, 0.0);
    }
    for _ in 0..NUM_ROTORS {
        reference.uniform_real(-0.1, 0.1);
    }
    assert!((after_step - reference.uniform_real(0.0, 1.0)).abs() < f64::EPSILON);
}

#[test]
fn reset_reproduces_run() {
    let mut registry = RandomRegistry::new(SEED);
    let mut robot = Robot::new(&mut registry, &config());

    let run = |robot: &mut Robot| {
        let mut body = body();
        (0..5).map(|_| robot.step(&mut body)).collect::<Vec<_>>()
    };
    let first = run(&mut robot);

    registry.reset();
    robot.reset();
    assert_eq!(run(&mut robot), first);
}

#[test]
fn streams_are_independent() {
    let mut registry = RandomRegistry::new(SEED);
    let config = config();

    let mut battery = BatterySensor::new(registry.stream("battery"), TICK);
    battery.init(config.child("battery").unwrap()).unwrap();
    let mut rotors = RotorActuator::new(registry.stream("rotors"));
    rotors.init(config.child("rotors").unwrap()).unwrap();

    let mut body = body();
    rotors.set_rotor_velocities([400.0; NUM_ROTORS]);
    rotors.update(&mut body);
    let charge = battery.update(&body).available_charge;

    // The battery's first draw is unaffected by the rotor draws before it.
    let reference = RandomRegistry::new(SEED).stream("battery");
    assert!((charge - (0.5 + reference.uniform_real(-0.05, 0.05))).abs() < 1e-12);
}
