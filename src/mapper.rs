//! The `Mapper` contract: the only side-effecting surface actions can reach.
//!
//! Grounded in the distilled spec's §4.7 operation table. `TestMapper` is
//! the reference implementation used throughout this crate's test suite and
//! by `main`'s demo run; it is deliberately the same shape as the "test
//! mapper" the distilled spec's own §8 scenario oracles assume (1 ms/tick,
//! a key-press log, a key-press-count map).

use std::collections::HashMap;

use crate::constants::{evdev_code, Axis, KeyCode, Pst, SCButton};
use crate::scheduler::{Scheduler, TaskId};

/// Capability bits a controller may or may not report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapperFlags(pub u32);

impl MapperFlags {
    pub const HAS_RSTICK: u32 = 1 << 0;
    pub const EUREL_GYROS: u32 = 1 << 1;

    pub fn has(self, bit: u32) -> bool {
        self.0 & bit != 0
    }
}

/// Tagged payload handed to `Mapper::special_action`.
///
/// Grounded in the distilled spec's §6 "Mapper special-action payloads":
/// CemuHook carries six floats, Menu a small struct, Profile a string id,
/// Turnoff/Keyboard nothing.
#[derive(Debug, Clone)]
pub enum SpecialActionPayload {
    CemuHook([f32; 6]),
    Menu {
        menu_id: String,
        size: i64,
    },
    Profile(String),
    Turnoff,
    Keyboard,
}

/// Raw IMU sample delivered to gyro-dispatching actions: pitch/yaw/roll plus
/// the orientation quaternion and linear acceleration, mirroring
/// `struct GyroInput` in `include/scc/controller.h`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GyroInput {
    pub gpitch: f64,
    pub gyaw: f64,
    pub groll: f64,
    pub q0: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
}

/// The abstract output surface every action dispatches against.
///
/// Not owned by actions: passed by `&mut dyn Mapper` on every event. The
/// single-threaded cooperative model (distilled spec §5) means no method
/// here needs to be `Send`/`Sync`.
pub trait Mapper {
    fn get_flags(&self) -> MapperFlags;

    /// Presses a virtual key, incrementing its press count. `allow_repress`
    /// mirrors the original's flag permitting a key already pressed by one
    /// caller to be "pressed again" by another without first releasing it.
    fn key_press(&mut self, key: KeyCode, allow_repress: bool);
    fn key_release(&mut self, key: KeyCode);
    fn is_virtual_key_pressed(&self, key: KeyCode) -> bool;

    fn set_axis(&mut self, axis: Axis, value: f64);
    fn move_mouse(&mut self, dx: f64, dy: f64);
    fn move_wheel(&mut self, dx: f64, dy: f64);

    fn is_pressed(&self, button: SCButton) -> bool;
    fn was_pressed(&self, button: SCButton) -> bool;
    fn is_touched(&self, what: Pst) -> bool;
    fn was_touched(&self, what: Pst) -> bool;

    /// Fire-and-forget haptic pulse. Best-effort: a `Mapper` without haptic
    /// hardware simply does nothing.
    fn haptic_effect(&mut self, amplitude: f64, frequency: f64, period: f64);

    /// Dispatches a tagged special-action payload. Returns whether the
    /// mapper understood it; callers log a rate-limited warning on `false`
    /// rather than treating it as an error (distilled spec §7).
    fn special_action(&mut self, payload: SpecialActionPayload) -> bool;

    fn scheduler_mut(&mut self) -> &mut Scheduler;
    fn now(&self) -> u64;

    /// Convenience wrapper over `scheduler_mut().schedule`, taking `now()`
    /// implicitly so callers don't have to fetch it themselves.
    fn schedule(
        &mut self,
        delay_ticks: u64,
        callback: crate::scheduler::SchedulerCallback,
    ) -> TaskId {
        let now = self.now();
        self.scheduler_mut().schedule(now, delay_ticks, callback)
    }

    fn cancel(&mut self, id: TaskId) {
        self.scheduler_mut().cancel(id);
    }
}

// ---------------------------------------------------------------------------
// TestMapper
// ---------------------------------------------------------------------------

/// Reference `Mapper` used by tests and the demo binary.
///
/// Ticks are abstract and advance only via `advance_ticks`; 1 tick = 1 ms,
/// matching the distilled spec's statement that "the test mapper uses 1
/// ms/tick so `sleep(0.1)` schedules 100 ticks".
pub struct TestMapper {
    pub flags: MapperFlags,
    key_counts: HashMap<KeyCode, u32>,
    /// Every evdev code logged by a `key_press` call, in call order. This is
    /// the "key-log" the distilled spec's scenario oracles assert against.
    pub key_log: Vec<u32>,
    axes: HashMap<Axis, f64>,
    pub mouse_delta: (f64, f64),
    pub wheel_delta: (f64, f64),
    pressed: HashMap<SCButton, bool>,
    was_pressed: HashMap<SCButton, bool>,
    touched: HashMap<Pst, bool>,
    was_touched: HashMap<Pst, bool>,
    pub haptic_log: Vec<(f64, f64, f64)>,
    pub special_action_log: Vec<SpecialActionPayload>,
    scheduler: Scheduler,
    now: u64,
}

impl TestMapper {
    pub fn new() -> Self {
        TestMapper {
            flags: MapperFlags::default(),
            key_counts: HashMap::new(),
            key_log: Vec::new(),
            axes: HashMap::new(),
            mouse_delta: (0.0, 0.0),
            wheel_delta: (0.0, 0.0),
            pressed: HashMap::new(),
            was_pressed: HashMap::new(),
            touched: HashMap::new(),
            was_touched: HashMap::new(),
            haptic_log: Vec::new(),
            special_action_log: Vec::new(),
            scheduler: Scheduler::new(),
            now: 0,
        }
    }

    pub fn key_count(&self, key: KeyCode) -> u32 {
        *self.key_counts.get(&key).unwrap_or(&0)
    }

    pub fn axis_value(&self, axis: Axis) -> f64 {
        *self.axes.get(&axis).unwrap_or(&0.0)
    }

    /// Sets the current/previous button state, simulating an external input
    /// edge. Call once per tick the button state changes; `advance_ticks`
    /// does not itself roll `pressed` into `was_pressed` since the
    /// distilled spec treats button state as Mapper-external truth, not
    /// scheduler-driven state.
    pub fn set_pressed(&mut self, button: SCButton, value: bool) {
        let previous = *self.pressed.get(&button).unwrap_or(&false);
        self.was_pressed.insert(button, previous);
        self.pressed.insert(button, value);
    }

    pub fn set_touched(&mut self, what: Pst, value: bool) {
        let previous = *self.touched.get(&what).unwrap_or(&false);
        self.was_touched.insert(what, previous);
        self.touched.insert(what, value);
    }

    /// Advances the tick counter by `ticks` one tick at a time, running any
    /// scheduled task due at each intermediate tick. Stepping one tick at a
    /// time (rather than jumping straight to `now + ticks`) matches the
    /// driver-loop contract: tasks scheduled by an earlier task in this same
    /// call must still be observed in their own right tick.
    pub fn advance_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.now += 1;
            crate::scheduler::run_due(self, self.now);
        }
    }
}

impl Default for TestMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper for TestMapper {
    fn get_flags(&self) -> MapperFlags {
        self.flags
    }

    fn key_press(&mut self, key: KeyCode, _allow_repress: bool) {
        *self.key_counts.entry(key).or_insert(0) += 1;
        self.key_log.push(evdev_code(key));
    }

    fn key_release(&mut self, key: KeyCode) {
        if let Some(count) = self.key_counts.get_mut(&key) {
            *count = count.saturating_sub(1);
        }
    }

    fn is_virtual_key_pressed(&self, key: KeyCode) -> bool {
        self.key_count(key) > 0
    }

    fn set_axis(&mut self, axis: Axis, value: f64) {
        self.axes.insert(axis, value);
    }

    fn move_mouse(&mut self, dx: f64, dy: f64) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    fn move_wheel(&mut self, dx: f64, dy: f64) {
        self.wheel_delta.0 += dx;
        self.wheel_delta.1 += dy;
    }

    fn is_pressed(&self, button: SCButton) -> bool {
        *self.pressed.get(&button).unwrap_or(&false)
    }

    fn was_pressed(&self, button: SCButton) -> bool {
        *self.was_pressed.get(&button).unwrap_or(&false)
    }

    fn is_touched(&self, what: Pst) -> bool {
        *self.touched.get(&what).unwrap_or(&false)
    }

    fn was_touched(&self, what: Pst) -> bool {
        *self.was_touched.get(&what).unwrap_or(&false)
    }

    fn haptic_effect(&mut self, amplitude: f64, frequency: f64, period: f64) {
        self.haptic_log.push((amplitude, frequency, period));
    }

    fn special_action(&mut self, payload: SpecialActionPayload) -> bool {
        self.special_action_log.push(payload);
        true
    }

    fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    fn now(&self) -> u64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_increments_count_and_logs() {
        let mut m = TestMapper::new();
        m.key_press(KeyCode::Q, false);
        assert_eq!(m.key_count(KeyCode::Q), 1);
        assert_eq!(m.key_log, vec![16]);
    }

    #[test]
    fn key_release_decrements_to_zero_floor() {
        let mut m = TestMapper::new();
        m.key_release(KeyCode::Q);
        assert_eq!(m.key_count(KeyCode::Q), 0);
        m.key_press(KeyCode::Q, false);
        m.key_release(KeyCode::Q);
        m.key_release(KeyCode::Q);
        assert_eq!(m.key_count(KeyCode::Q), 0);
    }

    #[test]
    fn button_state_tracks_previous_value() {
        let mut m = TestMapper::new();
        m.set_pressed(SCButton::A, true);
        assert!(m.is_pressed(SCButton::A));
        assert!(!m.was_pressed(SCButton::A));
        m.set_pressed(SCButton::A, false);
        assert!(!m.is_pressed(SCButton::A));
        assert!(m.was_pressed(SCButton::A));
    }
}
