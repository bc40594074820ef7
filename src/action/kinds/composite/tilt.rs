//! `tilt(child, threshold?)`: turns a gyro's pitch/roll magnitude into a
//! momentary button edge on `child` — press once the tilt magnitude crosses
//! `threshold`, release once it drops back below.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s gyro-to-
//! button edge detector.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::{GyroInput, Mapper};
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

const DEFAULT_THRESHOLD: f64 = 0.3;

pub struct TiltAction {
    child: ActionRef,
    threshold: f64,
    active: Cell<bool>,
}

impl Action for TiltAction {
    fn kind(&self) -> &'static str {
        "tilt"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MODIFIER)
    }

    fn gyro(&self, m: &mut dyn Mapper, value: &GyroInput) {
        let magnitude = value.gpitch.hypot(value.groll);
        let now_active = magnitude >= self.threshold;
        if now_active && !self.active.get() {
            self.child.button_press(m);
        } else if !now_active && self.active.get() {
            self.child.button_release(m);
        }
        self.active.set(now_active);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("tilt({}, {})", self.child.to_text(), self.threshold)
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(TiltAction {
                child,
                threshold: self.threshold,
                active: Cell::new(false),
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("af?").with_defaults(vec![Parameter::float(DEFAULT_THRESHOLD)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(TiltAction {
        child: filled[0].as_action(),
        threshold: filled[1].as_float(),
        active: Cell::new(false),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("tilt", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child() -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap()
    }

    #[test]
    fn crossing_threshold_presses_then_releases_child() {
        let a = construct("tilt", vec![Parameter::action(button_child())]).unwrap();
        let mut m = TestMapper::new();
        a.gyro(&mut m, &GyroInput { gpitch: 0.5, ..Default::default() });
        assert_eq!(m.key_log, vec![45]);
        a.gyro(&mut m, &GyroInput::default());
        assert_eq!(m.key_count(crate::constants::KeyCode::X), 0);
    }
}
