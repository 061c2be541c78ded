use std::time::Duration;

use scrubber::surface::HeadlessNode;
use scrubber::{
    Command, Event, HeadlessSurface, ManualClock, Scrubber, ScrubberConfig, TimeRange, ZoomLevel,
};

fn config() -> ScrubberConfig {
    ScrubberConfig {
        zoom_levels: [30.0, 60.0, 300.0]
            .into_iter()
            .map(|segment_duration| ZoomLevel {
                segment_duration,
                timestamp_spread: segment_duration * 10.0,
            })
            .collect(),
        initial_zoom_index: 0,
        time_range: TimeRange {
            start: 0.0,
            end: 36_000.0,
        },
        ..ScrubberConfig::default()
    }
}

fn scrubber(surface: HeadlessSurface) -> (Scrubber<HeadlessSurface, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let scrubber =
        Scrubber::with_clock(surface, &config(), clock.clone()).expect("valid config");
    (scrubber, clock)
}

fn send(scrubber: &mut Scrubber<HeadlessSurface, ManualClock>, command: Command) -> Vec<Event> {
    scrubber
        .handle_command(command)
        .expect("command should succeed")
}

#[test]
fn drag_inside_nested_scroll_containers_uses_every_offset() {
    let mut surface = HeadlessSurface::new(400.0, 0.0);
    surface.rect_top = 50.0;
    surface.node.parent = Some(Box::new(HeadlessNode {
        scroll_top: 100.0,
        client_height: 900.0,
        scroll_height: 3_000.0,
        parent: None,
    }));
    let (mut scrubber, _clock) = scrubber(surface);

    send(&mut scrubber, Command::PointerDown { client_y: 250.0 });
    send(&mut scrubber, Command::PointerMove { client_y: 330.0 });
    let events = send(&mut scrubber, Command::AnimationFrame);

    assert_eq!(events, vec![Event::PositionChanged { position: 80.0 }]);
    assert_eq!(scrubber.surface().handle_top, 80.0);
    assert_eq!(scrubber.surface().label, "09:55:00");

    let events = send(&mut scrubber, Command::PointerUp);
    assert_eq!(events, vec![Event::TimeChanged { time: 35_700.0 }]);
}

#[test]
fn holding_the_pointer_at_the_bottom_edge_keeps_scrolling() {
    let (mut scrubber, _clock) = scrubber(HeadlessSurface::new(400.0, 0.0));
    send(&mut scrubber, Command::PointerDown { client_y: 200.0 });
    send(&mut scrubber, Command::PointerMove { client_y: 398.0 });

    let mut offsets = Vec::new();
    let mut positions = Vec::new();
    for _ in 0..3 {
        let events = send(&mut scrubber, Command::AnimationFrame);
        assert!(events.contains(&Event::FrameRequested));
        assert!(scrubber.wants_frame());
        offsets.push(scrubber.surface().node.scroll_top);
        positions.push(scrubber.handle_position().expect("frame ran"));
    }
    assert!(offsets[0] > 0.0);
    assert!(offsets.windows(2).all(|pair| pair[1] > pair[0]));
    assert!(positions.windows(2).all(|pair| pair[1] > pair[0]));

    send(&mut scrubber, Command::PointerMove { client_y: 200.0 });
    let events = send(&mut scrubber, Command::AnimationFrame);
    assert!(!events.contains(&Event::FrameRequested));
    assert!(!scrubber.wants_frame());
}

#[test]
fn zooming_out_and_back_in_restores_the_centred_time() {
    let (mut scrubber, clock) = scrubber(HeadlessSurface::new(400.0, 0.0));
    send(&mut scrubber, Command::SetHandlebarTime { time: 30_000.0 });
    assert_eq!(scrubber.surface().node.scroll_top, 1_400.0);
    send(&mut scrubber, Command::UserScroll);

    scrubber.surface_mut().node.scroll_top = 4_000.0;
    send(&mut scrubber, Command::ZoomOut);
    assert_eq!(scrubber.surface().handle_top, 800.0);
    send(&mut scrubber, Command::Tick);
    assert_eq!(scrubber.surface().node.scroll_top, 1_900.0);
    assert_eq!(scrubber.segments().len(), 600);

    send(&mut scrubber, Command::ZoomIn);
    send(&mut scrubber, Command::Tick);
    assert_eq!(scrubber.surface().node.scroll_top, 4_000.0);
    assert_eq!(scrubber.surface().handle_top, 1_600.0);

    clock.advance(Duration::from_millis(500));
    let events = send(&mut scrubber, Command::Tick);
    assert_eq!(
        events,
        vec![Event::ZoomTransition {
            zooming: false,
            direction: None
        }]
    );
}

#[test]
fn json_config_and_script_drive_a_session() {
    let path = std::env::temp_dir().join(format!(
        "scrubber-session-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        r#"{
            "zoom_levels": [
                { "segment_duration": 30, "timestamp_spread": 300 },
                { "segment_duration": 60, "timestamp_spread": 900 }
            ],
            "initial_zoom_index": 1,
            "time_range": { "start": 0, "end": 3600 },
            "drag": { "update_handle": true }
        }"#,
    )
    .expect("write config");
    let config = ScrubberConfig::load(&path).expect("config should load");
    let _ = std::fs::remove_file(&path);

    let commands: Vec<Command> = serde_json::from_str(
        r#"[
            { "type": "pointer_down", "client_y": 100 },
            { "type": "animation_frame" },
            { "type": "pointer_up" }
        ]"#,
    )
    .expect("valid script");

    let mut scrubber =
        Scrubber::new(HeadlessSurface::new(200.0, 0.0), &config).expect("valid config");
    let events: Vec<Event> = commands
        .into_iter()
        .flat_map(|command| {
            scrubber
                .handle_command(command)
                .expect("command should succeed")
        })
        .collect();

    let times: Vec<f64> = events
        .iter()
        .filter_map(|event| match event {
            Event::TimeChanged { time } => Some(*time),
            _ => None,
        })
        .collect();
    assert_eq!(times, vec![3_600.0 - 60.0, 3_600.0 - 60.0]);
    assert_eq!(scrubber.surface().node.scroll_height, 480.0);
}

#[test]
fn owner_time_on_collapsed_rows_round_trips_through_the_handle() {
    let config = ScrubberConfig {
        time_range: TimeRange {
            start: 0.0,
            end: 3_000.0,
        },
        ..config()
    };
    let mut scrubber =
        Scrubber::with_clock(HeadlessSurface::new(400.0, 0.0), &config, ManualClock::new())
            .expect("valid config");
    let every_other_row: Vec<f64> = (0..50).map(|row| 3_000.0 - row as f64 * 60.0).collect();

    send(
        &mut scrubber,
        Command::SetCollapsed {
            collapsed: true,
            segments: every_other_row,
        },
    );
    send(&mut scrubber, Command::SetHandlebarTime { time: 2_880.0 });

    assert_eq!(scrubber.surface().node.scroll_height, 400.0);
    assert_eq!(scrubber.surface().handle_top, 16.0);

    send(&mut scrubber, Command::PointerDown { client_y: 20.0 });
    let clicked = send(&mut scrubber, Command::PointerUp);
    assert!(
        !clicked
            .iter()
            .any(|event| matches!(event, Event::TimeChanged { .. }))
    );

    send(&mut scrubber, Command::PointerDown { client_y: 20.0 });
    send(&mut scrubber, Command::AnimationFrame);
    let released = send(&mut scrubber, Command::PointerUp);
    let committed: Vec<f64> = released
        .iter()
        .filter_map(|event| match event {
            Event::TimeChanged { time } => Some(*time),
            _ => None,
        })
        .collect();
    assert_eq!(committed, vec![2_880.0]);
    assert_eq!(scrubber.handlebar_time(), Some(2_880.0));
}
