use approx::assert_abs_diff_eq;
use glam::Vec3;
use rapier3d::prelude::RigidBodyBuilder;

use stride::{
    ActorId, ActorSetup, ButtonState, GroundReading, InputSnapshot, Landmark, Layers, Orientation,
    ScriptedInput, SetupError, Simulation, StateEvent, StateKind, StatsConfig, TestCourse,
};

const TICK_RATE: u32 = 50;
const FRAME: f32 = 1.0 / TICK_RATE as f32;
const RADIUS: f32 = 0.4;

fn course() -> (Simulation, TestCourse) {
    let mut sim = Simulation::new(TICK_RATE);
    let course = TestCourse::new();
    course.spawn(sim.physics_mut());
    (sim, course)
}

fn spawn(
    sim: &mut Simulation,
    course: &TestCourse,
    landmark: Landmark,
    y_scale: f32,
    input: ScriptedInput,
) -> ActorId {
    let stats = StatsConfig::default();
    let height = stats.player_height;
    let position = course.spawn_point(landmark, height * y_scale);
    let body = sim
        .physics_mut()
        .add_character(position, height, RADIUS, y_scale);

    sim.spawn_actor(
        ActorSetup::new(stats)
            .with_body(body)
            .with_input(input)
            .with_orientation(Orientation::default()),
    )
}

fn run(sim: &mut Simulation, seconds: f32) {
    let frames = (seconds / FRAME).round() as usize;
    for _ in 0..frames {
        sim.frame(FRAME);
    }
}

#[test]
fn character_settles_on_flat_ground() {
    let (mut sim, course) = course();
    let id = spawn(&mut sim, &course, Landmark::Start, 1.0, ScriptedInput::new());

    run(&mut sim, 1.0);

    let readout = sim.readout(id).expect("enabled actor");
    assert!(readout.is_grounded);
    assert_eq!(readout.state, StateKind::Walk);
    assert!(readout.speed < 0.1);

    let controller = sim.controller(id).expect("controller");
    assert!(!controller.ground().on_slope);

    let handle = sim.body_handle(id).expect("body");
    let position = sim.physics().body_position(handle).expect("position");
    assert_abs_diff_eq!(position.y, 1.0, epsilon = 0.05);
}

#[test]
fn spawned_on_flat_ground_is_grounded_from_the_start() {
    let (mut sim, course) = course();
    let id = spawn(&mut sim, &course, Landmark::Start, 1.0, ScriptedInput::new());

    let controller = sim.controller(id).expect("controller");
    assert!(controller.is_grounded());
    assert_eq!(controller.active_state(), StateKind::Walk);

    sim.frame(FRAME);

    let events: Vec<StateEvent> = sim.drain_events().map(|(_, event)| event).collect();
    assert_eq!(events, vec![StateEvent::Entered(StateKind::Walk)]);
    assert!(sim.controller(id).expect("controller").is_grounded());
}

#[test]
fn gentle_ramp_reads_as_slope() {
    let (mut sim, course) = course();
    let id = spawn(&mut sim, &course, Landmark::GentleRamp, 1.0, ScriptedInput::new());

    run(&mut sim, 0.5);

    let ground = *sim.controller(id).expect("controller").ground();
    assert!(ground.grounded);
    assert!(ground.on_slope);
    assert_abs_diff_eq!(ground.slope_angle, TestCourse::GENTLE_RAMP_ANGLE, epsilon = 0.5);
}

#[test]
fn steep_ramp_is_ground_but_not_slope() {
    let (sim, course) = course();
    let top = course.landmark(Landmark::SteepRamp);

    let hit = sim
        .physics()
        .cast_ray(top + Vec3::Y, Vec3::NEG_Y, 3.0, Layers::GROUND, None)
        .expect("ramp below");
    let reading = GroundReading::from_normal(hit.normal, StatsConfig::default().max_slope_angle);

    assert!(reading.grounded);
    assert!(!reading.on_slope);
    assert_abs_diff_eq!(reading.slope_angle, TestCourse::STEEP_RAMP_ANGLE, epsilon = 0.5);
}

#[test]
fn props_are_invisible_to_the_ground_mask() {
    let (sim, _) = course();
    let above_prop = Vec3::new(4.0, 2.0, -6.0);

    let ground = sim
        .physics()
        .cast_ray(above_prop, Vec3::NEG_Y, 5.0, Layers::GROUND, None)
        .expect("ground below");
    assert_abs_diff_eq!(ground.distance, 2.0, epsilon = 1e-3);

    let prop = sim
        .physics()
        .cast_ray(above_prop, Vec3::NEG_Y, 5.0, Layers::PROPS, None)
        .expect("prop below");
    assert_abs_diff_eq!(prop.distance, 1.4, epsilon = 1e-3);
}

#[test]
fn tunnel_roof_blocks_standing_up() {
    let (mut sim, course) = course();
    let crouch = ButtonState {
        crouch: true,
        ..Default::default()
    };
    let input = ScriptedInput::new().hold(0.5, crouch);
    let id = spawn(&mut sim, &course, Landmark::TunnelInside, 0.5, input);

    run(&mut sim, 0.5);
    assert_eq!(sim.readout(id).map(|r| r.state), Some(StateKind::Crouch));

    // Crouch is released here; the roof keeps the actor down.
    run(&mut sim, 1.0);
    let readout = sim.readout(id).expect("enabled actor");
    assert_eq!(readout.state, StateKind::Crouch);
    assert!(readout.is_crouching);
}

#[test]
fn crouch_release_in_the_open_stands_up() {
    let (mut sim, course) = course();
    let crouch = ButtonState {
        crouch: true,
        ..Default::default()
    };
    let input = ScriptedInput::new().hold(0.5, crouch);
    let id = spawn(&mut sim, &course, Landmark::Start, 1.0, input);

    run(&mut sim, 0.5);
    assert_eq!(sim.readout(id).map(|r| r.state), Some(StateKind::Crouch));

    run(&mut sim, 1.0);
    let readout = sim.readout(id).expect("enabled actor");
    assert_eq!(readout.state, StateKind::Walk);
    assert!(!readout.is_crouching);
}

#[test]
fn sprinting_is_capped_at_sprint_speed() {
    let (mut sim, course) = course();
    let sprint = ButtonState {
        vertical: 1.0,
        sprint: true,
        ..Default::default()
    };
    let id = spawn(
        &mut sim,
        &course,
        Landmark::Start,
        1.0,
        ScriptedInput::new().hold(3.0, sprint),
    );
    // Face -Z, away from the course furniture.
    sim.set_yaw(id, std::f32::consts::PI);

    run(&mut sim, 2.0);

    let readout = sim.readout(id).expect("enabled actor");
    assert_eq!(readout.state, StateKind::Sprint);
    assert_abs_diff_eq!(readout.speed, 10.0, epsilon = 0.5);

    let handle = sim.body_handle(id).expect("body");
    let position = sim.physics().body_position(handle).expect("position");
    assert!(position.z < -5.0);

    let events: Vec<_> = sim.drain_events().collect();
    assert!(events.contains(&(id, StateEvent::Entered(StateKind::Sprint))));
}

#[test]
fn jump_leaves_and_returns_to_the_ground() {
    let (mut sim, course) = course();
    let jump = ButtonState {
        jump: true,
        ..Default::default()
    };
    let input = ScriptedInput::new().hold(0.5, ButtonState::default()).hold(0.05, jump);
    let id = spawn(&mut sim, &course, Landmark::Start, 1.0, input);

    run(&mut sim, 0.7);
    assert_eq!(sim.readout(id).map(|r| r.state), Some(StateKind::Air));

    run(&mut sim, 3.0);
    assert_eq!(sim.readout(id).map(|r| r.state), Some(StateKind::Walk));

    let events: Vec<StateEvent> = sim.drain_events().map(|(_, event)| event).collect();
    let jumps = events.iter().filter(|e| **e == StateEvent::Jumped).count();
    assert_eq!(jumps, 1);
    assert!(events.contains(&StateEvent::Entered(StateKind::Air)));
}

#[test]
fn missing_collaborators_disable_the_actor() {
    let (mut sim, _) = course();

    let no_body = sim.spawn_actor(
        ActorSetup::new(StatsConfig::default())
            .with_input(InputSnapshot::default())
            .with_orientation(Orientation::default()),
    );
    assert!(!sim.is_enabled(no_body));
    assert!(matches!(sim.setup_error(no_body), Some(SetupError::MissingBody)));
    assert!(sim.readout(no_body).is_none());

    let prop = sim
        .physics_mut()
        .bodies
        .insert(RigidBodyBuilder::dynamic().build());
    let not_a_character = sim.spawn_actor(
        ActorSetup::new(StatsConfig::default())
            .with_body(prop)
            .with_input(InputSnapshot::default())
            .with_orientation(Orientation::default()),
    );
    assert!(matches!(
        sim.setup_error(not_a_character),
        Some(SetupError::MissingBody)
    ));

    let body = sim
        .physics_mut()
        .add_character(Vec3::new(0.0, 1.05, 0.0), 2.0, RADIUS, 1.0);
    let no_input = sim.spawn_actor(
        ActorSetup::new(StatsConfig::default())
            .with_body(body)
            .with_orientation(Orientation::default()),
    );
    assert!(matches!(sim.setup_error(no_input), Some(SetupError::MissingInput)));

    // Disabled actors are skipped, not fatal.
    run(&mut sim, 0.1);
    assert_eq!(sim.drain_events().count(), 0);
}

#[test]
fn actor_is_disabled_when_its_body_disappears() {
    let (mut sim, course) = course();
    let id = spawn(&mut sim, &course, Landmark::Start, 1.0, ScriptedInput::new());
    run(&mut sim, 0.1);
    assert!(sim.is_enabled(id));

    let handle = sim.body_handle(id).expect("body");
    sim.physics_mut().remove_body(handle);
    sim.frame(FRAME);

    assert!(!sim.is_enabled(id));
    assert!(sim.readout(id).is_none());
}
