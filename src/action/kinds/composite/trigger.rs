//! `trigger(press_level, release_level?, child)`: analog-trigger hysteresis.
//!
//! Comparing `release_level` against `press_level` selects one of three
//! regimes (distilled spec §4.4 "trigger (action)"):
//!
//! - `release > press` — active while the trigger position is inside the
//!   band `[press, release]`.
//! - `release == press` — active whenever the position is at or above
//!   `press`; stateless, no hysteresis.
//! - `release < press` — crossing `press` activates; falling back below
//!   `release` deactivates. This is the only regime with real hysteresis.
//!
//! A child flagged `AXIS` receives the raw `trigger` event while active
//! instead of a `button_press`/`button_release` edge (distilled spec §9(c)),
//! so e.g. `trigger(50, 20, axis(ABS_RZ))` forwards continuous position
//! rather than treating the trigger as a two-state button.
//!
//! Grounded in `src/actions/modifiers.c`'s `TriggerAction` and the
//! open question recorded in distilled spec §9(c).

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

const ACTIVATION_AMPLITUDE: f64 = 4.0;
const ACTIVATION_FREQUENCY: f64 = 0.2;

pub struct TriggerAction {
    press_level: f64,
    release_level: f64,
    child: ActionRef,
    active: Cell<bool>,
}

impl TriggerAction {
    fn compute_active(&self, pos: f64) -> bool {
        if self.release_level > self.press_level {
            pos >= self.press_level && pos <= self.release_level
        } else if (self.release_level - self.press_level).abs() < f64::EPSILON {
            pos >= self.press_level
        } else if self.active.get() {
            pos >= self.release_level
        } else {
            pos >= self.press_level
        }
    }
}

impl Action for TriggerAction {
    fn kind(&self) -> &'static str {
        "trigger"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MODIFIER)
    }

    fn trigger(&self, m: &mut dyn Mapper, old_pos: i64, pos: i64, what: Pst) {
        let was_active = self.active.get();
        let now_active = self.compute_active(pos as f64);
        self.active.set(now_active);

        if now_active && !was_active {
            m.haptic_effect(ACTIVATION_AMPLITUDE, ACTIVATION_FREQUENCY, 0.0);
        }

        if self.child.action_flags().has(ActionFlags::AXIS) {
            if now_active || was_active {
                self.child.trigger(m, old_pos, pos, what);
            }
        } else if now_active && !was_active {
            self.child.button_press(m);
        } else if !now_active && was_active {
            self.child.button_release(m);
        }
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("trigger({}, {}, {})", self.press_level, self.release_level, self.child.to_text())
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(TriggerAction {
                press_level: self.press_level,
                release_level: self.release_level,
                child,
                active: Cell::new(false),
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("ff?a").with_defaults(vec![Parameter::float(f64::NAN)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    let press_level = filled[0].as_float();
    let mut release_level = filled[1].as_float();
    if release_level.is_nan() {
        release_level = press_level;
    }
    Ok(std::rc::Rc::new(TriggerAction {
        press_level,
        release_level,
        child: filled[2].as_action(),
        active: Cell::new(false),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("trigger", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::leaves::axis::construct_axis;
    use crate::action::kinds::leaves::button::construct as build_button;
    use crate::mapper::TestMapper;

    #[test]
    fn mode_ii_equal_thresholds_is_stateless() {
        let child = build_button("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap();
        let a = construct(
            "trigger",
            vec![Parameter::float(100.0), Parameter::action(child)],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.trigger(&mut m, 0, 150, Pst::Left);
        assert_eq!(m.key_log, vec![45]);
        a.trigger(&mut m, 150, 50, Pst::Left);
        assert_eq!(m.key_count(crate::constants::KeyCode::X), 0);
    }

    #[test]
    fn mode_iii_hysteresis_deactivates_only_below_release() {
        let child = build_button("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap();
        let a = construct(
            "trigger",
            vec![Parameter::float(150.0), Parameter::float(50.0), Parameter::action(child)],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.trigger(&mut m, 0, 150, Pst::Left);
        assert_eq!(m.key_log, vec![45]);
        // Falls below press_level but stays above release_level: still active.
        a.trigger(&mut m, 150, 100, Pst::Left);
        assert_eq!(m.key_count(crate::constants::KeyCode::X), 1);
        // Falls below release_level: deactivates.
        a.trigger(&mut m, 100, 30, Pst::Left);
        assert_eq!(m.key_count(crate::constants::KeyCode::X), 0);
    }

    #[test]
    fn af_axis_child_receives_raw_trigger_events_while_active() {
        let child = construct_axis("axis", vec![Parameter::const_string("ABS_RZ")]).unwrap();
        let a = construct(
            "trigger",
            vec![Parameter::float(150.0), Parameter::float(50.0), Parameter::action(child)],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.trigger(&mut m, 0, 150, Pst::Left);
        assert!(m.axis_value(crate::constants::Axis::AbsRz) != 0.0);
        a.trigger(&mut m, 150, 30, Pst::Left);
    }
}
