//! Symbolic constant tables: key codes, axis codes, button names, and
//! pad/stick/trigger ("PST") identifiers, plus the lookup functions that
//! translate between their textual and integer forms.
//!
//! Grounded in `include/scc/controller.h` / `conversions/methods.c` of the
//! original source and in the teacher's `platform::keycodes` match-table
//! style (`evdev_to_keycode` / `keycode_to_evdev`).

use std::fmt;

// ---------------------------------------------------------------------------
// Key codes
// ---------------------------------------------------------------------------

/// A synthesizable keyboard key, Linux input-event compatible in spirit
/// (1..SCC_KEYCODE_MAX in the original) but expressed as a closed Rust enum
/// rather than a raw integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum KeyCode {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Ctrl, Shift, Alt, Meta,
    Space, Enter, Tab, Escape, Backspace,
    Left, Right, Up, Down,
}

/// Table of `(name, KeyCode)` pairs used for both directions of lookup.
/// Kept as one literal table (rather than two independent match statements)
/// so the name and the enum variant can never drift apart.
const KEYCODE_TABLE: &[(&str, KeyCode)] = &[
    ("KEY_A", KeyCode::A), ("KEY_B", KeyCode::B), ("KEY_C", KeyCode::C),
    ("KEY_D", KeyCode::D), ("KEY_E", KeyCode::E), ("KEY_F", KeyCode::F),
    ("KEY_G", KeyCode::G), ("KEY_H", KeyCode::H), ("KEY_I", KeyCode::I),
    ("KEY_J", KeyCode::J), ("KEY_K", KeyCode::K), ("KEY_L", KeyCode::L),
    ("KEY_M", KeyCode::M), ("KEY_N", KeyCode::N), ("KEY_O", KeyCode::O),
    ("KEY_P", KeyCode::P), ("KEY_Q", KeyCode::Q), ("KEY_R", KeyCode::R),
    ("KEY_S", KeyCode::S), ("KEY_T", KeyCode::T), ("KEY_U", KeyCode::U),
    ("KEY_V", KeyCode::V), ("KEY_W", KeyCode::W), ("KEY_X", KeyCode::X),
    ("KEY_Y", KeyCode::Y), ("KEY_Z", KeyCode::Z),
    ("KEY_0", KeyCode::Key0), ("KEY_1", KeyCode::Key1), ("KEY_2", KeyCode::Key2),
    ("KEY_3", KeyCode::Key3), ("KEY_4", KeyCode::Key4), ("KEY_5", KeyCode::Key5),
    ("KEY_6", KeyCode::Key6), ("KEY_7", KeyCode::Key7), ("KEY_8", KeyCode::Key8),
    ("KEY_9", KeyCode::Key9),
    ("KEY_F1", KeyCode::F1), ("KEY_F2", KeyCode::F2), ("KEY_F3", KeyCode::F3),
    ("KEY_F4", KeyCode::F4), ("KEY_F5", KeyCode::F5), ("KEY_F6", KeyCode::F6),
    ("KEY_F7", KeyCode::F7), ("KEY_F8", KeyCode::F8), ("KEY_F9", KeyCode::F9),
    ("KEY_F10", KeyCode::F10), ("KEY_F11", KeyCode::F11), ("KEY_F12", KeyCode::F12),
    ("KEY_LEFTCTRL", KeyCode::Ctrl), ("KEY_LEFTSHIFT", KeyCode::Shift),
    ("KEY_LEFTALT", KeyCode::Alt), ("KEY_LEFTMETA", KeyCode::Meta),
    ("KEY_SPACE", KeyCode::Space), ("KEY_ENTER", KeyCode::Enter),
    ("KEY_TAB", KeyCode::Tab), ("KEY_ESC", KeyCode::Escape),
    ("KEY_BACKSPACE", KeyCode::Backspace),
    ("KEY_LEFT", KeyCode::Left), ("KEY_RIGHT", KeyCode::Right),
    ("KEY_UP", KeyCode::Up), ("KEY_DOWN", KeyCode::Down),
];

/// Canonical key name for a `KeyCode`, e.g. `KeyCode::A` -> `"KEY_A"`.
pub fn get_key_name(key: KeyCode) -> &'static str {
    KEYCODE_TABLE
        .iter()
        .find(|(_, k)| *k == key)
        .map(|(name, _)| *name)
        .expect("every KeyCode variant has a table entry")
}

/// Looks up a key by its canonical name (e.g. `"KEY_A"`).
pub fn get_int_constant(name: &str) -> Option<KeyCode> {
    KEYCODE_TABLE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, k)| *k)
}

/// The Linux evdev code for a `KeyCode`. Not part of the dispatch contract;
/// exposed so the `button`/`tap`/`type` actions have a stable integer to log
/// against in tests (the scenario oracles in the distilled spec's §8 assert
/// against these exact numbers, e.g. `KEY_Q` = 16, `KEY_X` = 45).
///
/// Grounded in the teacher's `platform::linux::keycodes::keycode_to_evdev`
/// match table; only the subset of keys this engine's tests exercise is
/// populated, the rest fall back to `0`.
pub fn evdev_code(key: KeyCode) -> u32 {
    match key {
        KeyCode::A => 30, KeyCode::B => 48, KeyCode::C => 46, KeyCode::D => 32,
        KeyCode::E => 18, KeyCode::F => 33, KeyCode::G => 34, KeyCode::H => 35,
        KeyCode::I => 23, KeyCode::J => 36, KeyCode::K => 37, KeyCode::L => 38,
        KeyCode::M => 50, KeyCode::N => 49, KeyCode::O => 24, KeyCode::P => 25,
        KeyCode::Q => 16, KeyCode::R => 19, KeyCode::S => 31, KeyCode::T => 20,
        KeyCode::U => 22, KeyCode::V => 47, KeyCode::W => 17, KeyCode::X => 45,
        KeyCode::Y => 21, KeyCode::Z => 44,
        KeyCode::Key0 => 11, KeyCode::Key1 => 2, KeyCode::Key2 => 3, KeyCode::Key3 => 4,
        KeyCode::Key4 => 5, KeyCode::Key5 => 6, KeyCode::Key6 => 7, KeyCode::Key7 => 8,
        KeyCode::Key8 => 9, KeyCode::Key9 => 10,
        KeyCode::F1 => 59, KeyCode::F2 => 60, KeyCode::F3 => 61, KeyCode::F4 => 62,
        KeyCode::F5 => 63, KeyCode::F6 => 64, KeyCode::F7 => 65, KeyCode::F8 => 66,
        KeyCode::F9 => 67, KeyCode::F10 => 68, KeyCode::F11 => 87, KeyCode::F12 => 88,
        KeyCode::Ctrl => 29, KeyCode::Shift => 42, KeyCode::Alt => 56, KeyCode::Meta => 125,
        KeyCode::Space => 57, KeyCode::Enter => 28, KeyCode::Tab => 15,
        KeyCode::Escape => 1, KeyCode::Backspace => 14,
        KeyCode::Left => 105, KeyCode::Right => 106, KeyCode::Up => 103, KeyCode::Down => 108,
    }
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Absolute or relative axis identifier. `RelCnt` is the sentinel meaning
/// "combined x+y", used by `mouse`/`trackpad` as the default axis parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    AbsX, AbsY, AbsZ, AbsRx, AbsRy, AbsRz,
    AbsHat0X, AbsHat0Y,
    RelX, RelY, RelWheel, RelHWheel,
    /// "xy-combined" sentinel axis used by `mouse()` with no explicit axis.
    RelCnt,
}

impl Axis {
    /// True for axes that are driven by the relative (mouse/wheel) family.
    pub fn is_relative(self) -> bool {
        matches!(
            self,
            Axis::RelX | Axis::RelY | Axis::RelWheel | Axis::RelHWheel | Axis::RelCnt
        )
    }
}

const AXIS_TABLE: &[(&str, Axis)] = &[
    ("ABS_X", Axis::AbsX), ("ABS_Y", Axis::AbsY), ("ABS_Z", Axis::AbsZ),
    ("ABS_RX", Axis::AbsRx), ("ABS_RY", Axis::AbsRy), ("ABS_RZ", Axis::AbsRz),
    ("ABS_HAT0X", Axis::AbsHat0X), ("ABS_HAT0Y", Axis::AbsHat0Y),
    ("REL_X", Axis::RelX), ("REL_Y", Axis::RelY),
    ("REL_WHEEL", Axis::RelWheel), ("REL_HWHEEL", Axis::RelHWheel),
    ("REL_CNT", Axis::RelCnt),
];

pub fn axis_name(axis: Axis) -> &'static str {
    AXIS_TABLE
        .iter()
        .find(|(_, a)| *a == axis)
        .map(|(n, _)| *n)
        .expect("every Axis variant has a table entry")
}

pub fn string_to_axis(name: &str) -> Option<Axis> {
    AXIS_TABLE.iter().find(|(n, _)| *n == name).map(|(_, a)| *a)
}

pub const STICK_PAD_MIN: f64 = -32768.0;
pub const STICK_PAD_MAX: f64 = 32767.0;
pub const TRIGGER_MIN: f64 = 0.0;
pub const TRIGGER_MAX: f64 = 255.0;
pub const TRIGGER_HALF: f64 = TRIGGER_MAX / 2.0;

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// A physical controller button, independent of which key it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SCButton {
    A, B, X, Y,
    Start, Select, Guide,
    Lb, Rb, Lgrip, Rgrip,
    LpadTouch, RpadTouch, CpadTouch,
    StickClick, LpadClick, RpadClick, CpadClick,
}

const BUTTON_TABLE: &[(&str, SCButton)] = &[
    ("A", SCButton::A), ("B", SCButton::B), ("X", SCButton::X), ("Y", SCButton::Y),
    ("START", SCButton::Start), ("SELECT", SCButton::Select), ("GUIDE", SCButton::Guide),
    ("LB", SCButton::Lb), ("RB", SCButton::Rb),
    ("LGRIP", SCButton::Lgrip), ("RGRIP", SCButton::Rgrip),
    ("LPADTOUCH", SCButton::LpadTouch), ("RPADTOUCH", SCButton::RpadTouch),
    ("CPADTOUCH", SCButton::CpadTouch),
    ("STICKPRESS", SCButton::StickClick), ("LPAD", SCButton::LpadClick),
    ("RPAD", SCButton::RpadClick), ("CPAD", SCButton::CpadClick),
];

pub fn string_to_button(name: &str) -> Option<SCButton> {
    BUTTON_TABLE.iter().find(|(n, _)| *n == name).map(|(_, b)| *b)
}

pub fn button_to_string(button: SCButton) -> &'static str {
    BUTTON_TABLE
        .iter()
        .find(|(_, b)| *b == button)
        .map(|(n, _)| *n)
        .expect("every SCButton variant has a table entry")
}

impl fmt::Display for SCButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", button_to_string(*self))
    }
}

// ---------------------------------------------------------------------------
// Pad / Stick / Trigger identifiers ("PST")
// ---------------------------------------------------------------------------

/// Identifies which physical input surface an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pst {
    Left,
    Right,
    Stick,
    Cpad,
    Gyro,
}

const PST_TABLE: &[(&str, Pst)] = &[
    ("LEFT", Pst::Left),
    ("RIGHT", Pst::Right),
    ("STICK", Pst::Stick),
    ("CPAD", Pst::Cpad),
    ("GYRO", Pst::Gyro),
];

pub fn string_to_pst(name: &str) -> Option<Pst> {
    PST_TABLE.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
}

pub fn what_to_string(what: Pst) -> &'static str {
    PST_TABLE
        .iter()
        .find(|(_, p)| *p == what)
        .map(|(n, _)| *n)
        .expect("every Pst variant has a table entry")
}

/// Maps a pad/stick/trigger identifier to the button reporting its click.
pub fn what_to_pressed_button(what: Pst) -> SCButton {
    match what {
        Pst::Left => SCButton::LpadClick,
        Pst::Right => SCButton::RpadClick,
        Pst::Stick => SCButton::StickClick,
        Pst::Cpad => SCButton::CpadClick,
        Pst::Gyro => SCButton::StickClick,
    }
}

/// Maps a pad/stick/trigger identifier to the button reporting its touch.
pub fn what_to_touch_button(what: Pst) -> SCButton {
    match what {
        Pst::Left => SCButton::LpadTouch,
        Pst::Right => SCButton::RpadTouch,
        Pst::Stick => SCButton::StickClick,
        Pst::Cpad => SCButton::CpadTouch,
        Pst::Gyro => SCButton::StickClick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycode_name_round_trips() {
        for (name, key) in KEYCODE_TABLE {
            assert_eq!(get_int_constant(name), Some(*key));
            assert_eq!(get_key_name(*key), *name);
        }
    }

    #[test]
    fn axis_name_round_trips() {
        for (name, axis) in AXIS_TABLE {
            assert_eq!(string_to_axis(name), Some(*axis));
            assert_eq!(axis_name(*axis), *name);
        }
    }

    #[test]
    fn button_name_round_trips() {
        for (name, button) in BUTTON_TABLE {
            assert_eq!(string_to_button(name), Some(*button));
            assert_eq!(button_to_string(*button), *name);
        }
    }

    #[test]
    fn unknown_key_name_is_none() {
        assert_eq!(get_int_constant("KEY_DOES_NOT_EXIST"), None);
    }

    #[test]
    fn relative_axes_are_tagged() {
        assert!(Axis::RelCnt.is_relative());
        assert!(Axis::RelWheel.is_relative());
        assert!(!Axis::AbsX.is_relative());
    }

    #[test]
    fn evdev_codes_match_scenario_oracles() {
        assert_eq!(evdev_code(KeyCode::Q), 16);
        assert_eq!(evdev_code(KeyCode::W), 17);
        assert_eq!(evdev_code(KeyCode::E), 18);
        assert_eq!(evdev_code(KeyCode::A), 30);
        assert_eq!(evdev_code(KeyCode::X), 45);
        assert_eq!(evdev_code(KeyCode::Z), 44);
    }

    #[test]
    fn pst_pressed_and_touch_buttons() {
        assert_eq!(what_to_pressed_button(Pst::Left), SCButton::LpadClick);
        assert_eq!(what_to_touch_button(Pst::Left), SCButton::LpadTouch);
    }
}
