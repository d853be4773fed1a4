use vatplay::vat::{select_frame, PlaybackState};

fn animated(t: f32, speed: f32) -> PlaybackState {
    PlaybackState {
        animated: true,
        elapsed_time: t,
        speed,
        manual_frame: 0,
    }
}

fn manual(frame: u32) -> PlaybackState {
    PlaybackState {
        animated: false,
        elapsed_time: 123.4,
        speed: 24.0,
        manual_frame: frame,
    }
}

#[test]
fn frame_time_stays_in_range() {
    for &frame_count in &[1u32, 2, 7, 60, 512] {
        for &speed in &[0.5f32, 24.0, 60.0, 240.0] {
            for i in 0..200 {
                let t = i as f32 * 0.173;
                let c = select_frame(&animated(t, speed), frame_count).expect("select");
                assert!(c.current < frame_count, "current {} out of range", c.current);
                assert!(c.next < frame_count, "next {} out of range", c.next);
                assert!((0.0..1.0).contains(&c.blend), "blend {} out of range", c.blend);
            }
        }
    }
}

#[test]
fn loop_is_periodic() {
    // Dyadic values so both evaluations are exact in f32.
    let frame_count = 40;
    let speed = 16.0;
    let t = 1.28125; // frame_time 20.5
    let a = select_frame(&animated(t, speed), frame_count).expect("select");
    let b = select_frame(&animated(t + frame_count as f32 / speed, speed), frame_count)
        .expect("select");
    assert_eq!(a.current, b.current);
    assert!((a.blend - b.blend).abs() < 1e-5);
    assert_eq!(a.current, 20);
    assert!((a.blend - 0.5).abs() < 1e-6);
}

#[test]
fn manual_mode_never_blends() {
    let c = select_frame(&manual(7), 60).expect("select");
    assert_eq!(c.current, 7);
    assert_eq!(c.next, 7);
    assert_eq!(c.blend, 0.0);

    // Out-of-range manual frames clamp to the last frame.
    let c = select_frame(&manual(999), 60).expect("select");
    assert_eq!(c.current, 59);
    assert_eq!(c.next, 59);
}

#[test]
fn exact_loop_point_has_no_discontinuity() {
    // frame_count=60, speed=24, t=2.5s: frame_time lands exactly on the wrap.
    let c = select_frame(&animated(2.5, 24.0), 60).expect("select");
    assert_eq!(c.current, 0);
    assert_eq!(c.next, 1);
    assert_eq!(c.blend, 0.0);
    assert!(c.blend.is_finite());
}

#[test]
fn last_frame_blends_toward_zero() {
    let c = select_frame(&animated(3.5, 1.0), 4).expect("select");
    assert_eq!(c.current, 3);
    assert_eq!(c.next, 0);
    assert!((c.blend - 0.5).abs() < 1e-6);
}

#[test]
fn invalid_configuration_is_rejected() {
    assert!(select_frame(&animated(1.0, 24.0), 0).is_err());
    assert!(select_frame(&animated(1.0, 0.0), 60).is_err());
    assert!(select_frame(&animated(1.0, -5.0), 60).is_err());
    // Speed is not consulted in manual mode.
    let mut paused = manual(3);
    paused.speed = 0.0;
    assert!(select_frame(&paused, 60).is_ok());
}

#[test]
fn clock_is_monotonic() {
    let mut state = PlaybackState::default();
    state.advance(0.016);
    let t = state.elapsed_time;
    state.advance(-1.0);
    assert_eq!(state.elapsed_time, t);
    state.advance(0.016);
    assert!(state.elapsed_time > t);
}
