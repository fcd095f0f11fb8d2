//! Session-level tests for dispatch, correlation and the world facade.


use std::io;
use std::time::Duration;

use camino::Utf8Path;
use rstest::rstest;
use tempfile::NamedTempFile;

use self::support::{MockWire, scripted_world, settings};
use crate::{
    AngleUnit, ClientSettings, ForceFrame, Message, ReceiveMode, RotationMode, Side,
    TransportOperation, World, WorldError,
};

fn vision_line(code: &str, cells: usize) -> String {
    let body: Vec<String> = (0..cells).map(|index| index.to_string()).collect();
    format!("{code},{}", body.join(","))
}

#[rstest]
fn blocking_receive_skips_non_matching_messages(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["X,1", "Y,2", "A,3"]);

    let message = world
        .get_message("A", ReceiveMode::Blocking)
        .expect("receive")
        .expect("blocking receive yields a message");

    assert_eq!(message.as_str(), "A,3");
    assert_eq!(world.connection().buffered_bytes(), 0);
}

#[rstest]
fn blocking_receive_reassembles_split_replies(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push("B");
    transport.push("P,4.5");
    transport.push(",-1\nX");

    let position = world.agent().get_position().expect("position");

    assert_eq!(position.x, 4.5);
    assert_eq!(position.y, -1.0);
    assert_eq!(world.connection().buffered_bytes(), 1);
}

#[rstest]
fn prefix_codes_do_not_match_longer_codes(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["BPX,9,9", "BP,1,2"]);

    let position = world.agent().get_position().expect("position");

    assert_eq!((position.x, position.y), (1.0, 2.0));
}

#[rstest]
fn empty_code_returns_the_first_message(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["X,1", "A,2"]);

    let message = world.get_message("", ReceiveMode::Blocking).expect("receive");

    assert_eq!(message.map(Message::into_string).as_deref(), Some("X,1"));
}

#[rstest]
fn non_blocking_receive_never_discards(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["X,1", "A,2"]);

    let first = world.get_message("A", ReceiveMode::NonBlocking).expect("peek");
    assert!(first.is_none());

    let head = world.get_message("X", ReceiveMode::NonBlocking).expect("peek");
    assert_eq!(head.map(Message::into_string).as_deref(), Some("X,1"));

    let next = world.get_message("A", ReceiveMode::NonBlocking).expect("peek");
    assert_eq!(next.map(Message::into_string).as_deref(), Some("A,2"));
}

#[rstest]
fn non_blocking_receive_on_idle_stream_is_empty(settings: ClientSettings) {
    let (mut world, _transport) = scripted_world(settings);

    let message = world.get_message("BP", ReceiveMode::NonBlocking).expect("peek");

    assert!(message.is_none());
    assert!(world.is_connected());
}

#[rstest]
fn non_blocking_receive_reports_a_closed_peer(settings: ClientSettings) {
    let mut wire = MockWire::new();
    wire.expect_poll().times(1).returning(|_| Ok(Some(0)));
    let mut world = World::from_transport(wire, settings);

    let error = world
        .get_message("BP", ReceiveMode::NonBlocking)
        .expect_err("peer has hung up");

    assert!(matches!(error, WorldError::ConnectionClosed));
    assert!(!world.is_connected());
}

#[rstest]
fn invalid_sensor_fails_before_writing(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);

    let error = world
        .send_message("sensorRequest,ZZZ")
        .expect_err("sensor is unknown");

    assert!(matches!(error, WorldError::InvalidSensor { ref sensor, .. } if sensor == "ZZZ"));
    assert!(transport.written().is_empty());
    assert!(world.connection().command_log().is_empty());
}

#[rstest]
#[case("sensorRequest,ZZZ")]
#[case("addForce,FLY,1")]
#[case("teleport,1,2")]
fn invalid_commands_never_reach_the_transport(settings: ClientSettings, #[case] raw: &str) {
    let mut wire = MockWire::new();
    wire.expect_send().never();
    wire.expect_close().never();
    let mut world = World::from_transport(wire, settings);

    assert!(world.send_message(raw).is_err());
}

#[rstest]
fn write_failures_surface_as_transport_errors(settings: ClientSettings) {
    let mut wire = MockWire::new();
    wire.expect_send()
        .times(1)
        .returning(|_| Err(io::Error::from(io::ErrorKind::BrokenPipe)));
    let mut world = World::from_transport(wire, settings);

    let error = world
        .send_message("print,hello")
        .expect_err("write fails");

    assert!(matches!(
        error,
        WorldError::Transport {
            operation: TransportOperation::Send,
            ..
        }
    ));
}

#[rstest]
fn print_round_trips(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["print,hello"]);

    let echo = world.print_text("hello").expect("print");

    assert_eq!(transport.written(), "print,hello\n");
    assert_eq!(echo.as_str(), "print,hello");
}

#[rstest]
#[case(0.0, "addForce,BR,10.000000\n")]
#[case(350.0, "addForce,BR,-340.000000\n")]
fn absolute_rotation_normalises_before_the_delta(
    settings: ClientSettings,
    #[case] current: f64,
    #[case] expected: &str,
) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&[&format!("BR,{current}"), "BR,1"]);

    world
        .agent()
        .rotate(370.0, AngleUnit::Degrees, RotationMode::Absolute)
        .expect("rotate");

    assert_eq!(transport.written(), format!("sensorRequest,A\n{expected}"));
}

#[rstest]
fn relative_rotation_in_radians_sends_degrees(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["BR,1"]);

    world
        .agent()
        .rotate(std::f64::consts::FRAC_PI_2, AngleUnit::Radians, RotationMode::Relative)
        .expect("rotate");

    assert_eq!(transport.written(), "addForce,BR,90.000000\n");
}

#[rstest]
fn rotation_is_reported_in_radians(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["BR,-180"]);

    let rotation = world
        .agent()
        .get_rotation(AngleUnit::Radians)
        .expect("rotation");

    assert!((rotation - std::f64::consts::PI).abs() < 1e-9);
}

#[rstest]
fn jump_reports_outcome(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["J,0"]);

    let jumped = world.agent().jump().expect("jump");

    assert!(!jumped);
    assert_eq!(transport.written(), "addForce,J,1000\n");
}

#[rstest]
fn world_frame_force_is_rotated_into_the_agent_frame(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["BR,90", "BMvec,1"]);

    world
        .agent()
        .send_force(1000.0, 0.0, ForceFrame::World)
        .expect("force");

    assert_eq!(
        transport.written(),
        "sensorRequest,A\naddForce,BMvec,0.000000,-1000.000000\n"
    );
}

#[rstest]
fn moving_paces_pushes_once_per_pace(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["BR,0", "BMvec", "BR,0", "BMvec"]);

    world.agent().move_paces(2, Side::Left).expect("move");

    let pace = "sensorRequest,A\naddForce,BMvec,-1000.000000,0.000000\n";
    assert_eq!(transport.written(), pace.repeat(2));
}

#[rstest]
fn hand_gestures_use_side_prefixed_forces(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["LHG,1", "LHR,1", "RP,3,4"]);

    let mut agent = world.agent();
    agent.left_hand().grab().expect("grab");
    agent.left_hand().release().expect("release");
    let position = agent.right_hand().get_position().expect("hand position");

    assert_eq!((position.x, position.y), (3.0, 4.0));
    assert_eq!(
        transport.written(),
        "addForce,LHG,1\naddForce,LHR,1\nsensorRequest,RP\n"
    );
}

#[rstest]
fn raw_release_forces_are_rejected(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);

    let error = world
        .send_message("addForce,RHR,1")
        .expect_err("release codes are gesture-only");

    assert!(matches!(error, WorldError::InvalidForce { ref force, .. } if force == "RHR"));
    assert!(transport.written().is_empty());
}

#[rstest]
fn world_frame_hand_force_uses_the_agent_rotation(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["BR,90", "RHvec,1"]);

    world
        .agent()
        .right_hand()
        .send_force(1000.0, 0.0, ForceFrame::World)
        .expect("hand force");

    assert_eq!(
        transport.written(),
        "sensorRequest,A\naddForce,RHvec,0.000000,-1000.000000\n"
    );
}

#[rstest]
fn detailed_vision_is_rebuilt_into_rows(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["X,1", &vision_line("MDN", 21 * 3)]);

    let grid = world.agent().get_detailed_vision().expect("vision");

    assert_eq!(grid.height(), 3);
    assert_eq!(grid.width(), 21);
    assert_eq!(grid.cell(2, 20), Some("62"));
    assert_eq!(transport.written(), "sensorRequest,MDN\n");
}

#[rstest]
fn peripheral_vision_is_rebuilt_into_rows(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&[&vision_line("MPN", 16 * 11)]);

    let grid = world.agent().get_peripheral_vision().expect("vision");

    assert_eq!(grid.height(), 11);
    assert_eq!(grid.width(), 16);
    assert_eq!(grid.cell(10, 15), Some("175"));
}

#[rstest]
fn malformed_replies_are_reported(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["BP,north,1"]);

    let error = world.agent().get_position().expect_err("x is not a number");

    assert!(matches!(error, WorldError::MalformedResponse { ref code, .. } if code == "BP"));
}

#[rstest]
fn states_and_reflexes_are_listed(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["activeStates,hungry,tired", "activeReflexes"]);

    assert_eq!(world.get_all_states().expect("states"), ["hungry", "tired"]);
    assert!(world.get_all_reflexes().expect("reflexes").is_empty());
    assert_eq!(transport.written(), "getActiveStates\ngetActiveReflexes\n");
}

#[rstest]
fn removing_a_state_zeroes_its_lifetime(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push_lines(&["setState,hungry,0", "removeReflex,dodge"]);

    world.remove_state("hungry").expect("remove state");
    world.remove_reflex("dodge").expect("remove reflex");

    assert_eq!(transport.written(), "setState,hungry,0\nremoveReflex,dodge\n");
}

#[rstest]
fn disconnect_resets_the_session(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    transport.push("print,hello\npartial");
    world.print_text("hello").expect("print");
    assert_eq!(world.connection().command_log().len(), 1);
    assert!(world.connection().buffered_bytes() > 0);

    world.disconnect().expect("disconnect");

    assert!(transport.is_closed());
    assert!(world.connection().command_log().is_empty());
    assert_eq!(world.connection().buffered_bytes(), 0);
    assert!(matches!(
        world.send_message("print,again"),
        Err(WorldError::NotConnected)
    ));
    assert!(matches!(world.disconnect(), Err(WorldError::NotConnected)));
}

#[rstest]
fn command_log_keeps_the_most_recent_entries(settings: ClientSettings) {
    let settings = ClientSettings {
        command_log_capacity: 2,
        ..settings
    };
    let (mut world, _transport) = scripted_world(settings);
    for text in ["one", "two", "three"] {
        world
            .send_message(&format!("print,{text}"))
            .expect("send");
    }

    let primaries: Vec<&str> = world
        .connection()
        .command_log()
        .iter()
        .map(|entry| entry.primary.as_str())
        .collect();
    assert_eq!(primaries, ["two", "three"]);
}

#[rstest]
fn configured_timeout_bounds_blocking_receive(settings: ClientSettings) {
    let settings = ClientSettings {
        receive_timeout: Some(Duration::from_millis(30)),
        ..settings
    };
    let (mut world, transport) = scripted_world(settings);
    transport.stall();
    transport.push_lines(&["X,1"]);

    let error = world
        .get_message("BP", ReceiveMode::Blocking)
        .expect_err("no BP reply arrives");

    assert!(matches!(
        error,
        WorldError::Timeout { ref code, timeout } if code == "BP" && timeout == Duration::from_millis(30)
    ));
    assert!(world.is_connected());
}

#[rstest]
fn peer_hang_up_closes_the_session(settings: ClientSettings) {
    let (mut world, _transport) = scripted_world(settings);

    let error = world
        .get_message("BP", ReceiveMode::Blocking)
        .expect_err("script is empty");

    assert!(matches!(error, WorldError::ConnectionClosed));
    assert!(!world.is_connected());
    assert!(matches!(
        world.send_message("print,hello"),
        Err(WorldError::NotConnected)
    ));
}

#[rstest]
fn oversized_messages_are_rejected(settings: ClientSettings) {
    let settings = ClientSettings {
        max_message_bytes: 8,
        ..settings
    };
    let (mut world, transport) = scripted_world(settings);
    transport.push("MPN,0,0,0,0,0,0");

    let error = world
        .get_message("MPN", ReceiveMode::Blocking)
        .expect_err("message exceeds the limit");

    assert!(matches!(error, WorldError::MessageTooLarge { limit: 8, .. }));
}

#[rstest]
fn receive_resumes_after_the_oversized_line_ends(settings: ClientSettings) {
    let settings = ClientSettings {
        max_message_bytes: 8,
        ..settings
    };
    let (mut world, transport) = scripted_world(settings);
    transport.push("MPN,0,0,0,0,0,0");
    transport.push(",0,J,1\nprint,ok\n");

    let _ = world
        .get_message("", ReceiveMode::Blocking)
        .expect_err("message exceeds the limit");
    let next = world
        .get_message("", ReceiveMode::Blocking)
        .expect("receive")
        .expect("blocking receive yields a message");

    assert_eq!(next.as_str(), "print,ok");
}

#[rstest]
fn reserved_operations_are_unsupported(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);

    let results = [
        world.set_state("hungry", 10),
        world.set_reflex("dodge", "", ""),
        world.create_item(),
        world.agent().center_hands(),
    ];

    for result in results {
        assert!(matches!(result, Err(WorldError::Unsupported { .. })));
    }
    assert!(transport.written().is_empty());
}

#[rstest]
fn load_task_sends_without_waiting_and_can_be_reset(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    let task = NamedTempFile::new().expect("task file");
    let path = Utf8Path::from_path(task.path()).expect("utf-8 temp path");

    world.load_task(path).expect("load task");
    world.reset_task().expect("reset task");

    let expected = format!("loadTask,{path}\n");
    assert_eq!(transport.written(), expected.repeat(2));
    assert_eq!(world.task_file(), Some(path));
}

#[rstest]
fn failed_task_load_keeps_the_previous_task(settings: ClientSettings) {
    let mut wire = MockWire::new();
    let mut sends = 0;
    wire.expect_send().times(2).returning(move |_| {
        sends += 1;
        if sends == 1 {
            Ok(())
        } else {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    });
    let mut world = World::from_transport(wire, settings);
    let first = NamedTempFile::new().expect("first task file");
    let second = NamedTempFile::new().expect("second task file");
    let first_path = Utf8Path::from_path(first.path()).expect("utf-8 temp path");
    let second_path = Utf8Path::from_path(second.path()).expect("utf-8 temp path");
    world.load_task(first_path).expect("first load");

    let error = world.load_task(second_path).expect_err("write fails");

    assert!(matches!(
        error,
        WorldError::Transport {
            operation: TransportOperation::Send,
            ..
        }
    ));
    assert_eq!(world.task_file(), Some(first_path));
}

#[rstest]
fn missing_task_file_is_reported(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);

    let error = world
        .load_task(Utf8Path::new("/definitely/not/here.xml"))
        .expect_err("file is missing");

    assert!(matches!(error, WorldError::TaskFileNotFound { .. }));
    assert!(transport.written().is_empty());
}

#[rstest]
fn reset_without_task_fails(settings: ClientSettings) {
    let (mut world, _transport) = scripted_world(settings);
    assert!(matches!(world.reset_task(), Err(WorldError::NoPreviousTask)));
}

#[rstest]
fn disconnect_forgets_the_task(settings: ClientSettings) {
    let (mut world, _transport) = scripted_world(settings);
    let task = NamedTempFile::new().expect("task file");
    let path = Utf8Path::from_path(task.path()).expect("utf-8 temp path");
    world.load_task(path).expect("load task");

    world.disconnect().expect("disconnect");

    assert_eq!(world.task_file(), None);
}

#[rstest]
fn requests_without_replies_are_refused(settings: ClientSettings) {
    let (mut world, transport) = scripted_world(settings);
    let command = crate::Command::parse("loadTask,/tmp/task.xml").expect("valid command");

    let error = world
        .request::<Message>(&command)
        .expect_err("loadTask has no reply");

    assert!(matches!(error, WorldError::InvalidCommand { .. }));
    assert!(transport.written().is_empty());
}
