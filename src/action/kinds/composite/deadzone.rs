//! `deadzone(child, lower?, upper?)`: forwards axis/trigger events to
//! `child` only once their magnitude clears `lower`, clamping to `upper`;
//! below `lower` the child sees a clean zero instead of noise.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s
//! `DeadzoneModifier`.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::{Pst, STICK_PAD_MAX};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

const DEFAULT_LOWER: f64 = 0.1;

pub struct DeadzoneAction {
    child: ActionRef,
    lower: f64,
    upper: f64,
}

impl DeadzoneAction {
    fn shape(&self, value: i64) -> i64 {
        let normalized = value as f64 / STICK_PAD_MAX;
        let magnitude = normalized.abs();
        if magnitude < self.lower {
            0
        } else {
            let clamped = magnitude.min(self.upper);
            (clamped.copysign(normalized) * STICK_PAD_MAX) as i64
        }
    }
}

impl Action for DeadzoneAction {
    fn kind(&self) -> &'static str {
        "deadzone"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MOD_DEADZONE)
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, what: Pst) {
        self.child.axis(m, self.shape(value), what);
    }

    fn trigger(&self, m: &mut dyn Mapper, old_pos: i64, pos: i64, what: Pst) {
        self.child.trigger(m, self.shape(old_pos), self.shape(pos), what);
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: Pst) {
        self.child.whole(m, self.shape(x), self.shape(y), what);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("deadzone({}, {}, {})", self.child.to_text(), self.lower, self.upper)
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(DeadzoneAction {
                child,
                lower: self.lower,
                upper: self.upper,
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("af?f?").with_defaults(vec![Parameter::float(DEFAULT_LOWER), Parameter::float(1.0)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(DeadzoneAction {
        child: filled[0].as_action(),
        lower: filled[1].as_float(),
        upper: filled[2].as_float(),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("deadzone", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::leaves::axis::construct_axis;
    use crate::mapper::TestMapper;

    #[test]
    fn small_values_are_zeroed() {
        let child = construct_axis("axis", vec![Parameter::const_string("ABS_X")]).unwrap();
        let a = construct("deadzone", vec![Parameter::action(child)]).unwrap();
        let mut m = TestMapper::new();
        a.axis(&mut m, 100, Pst::Left);
        assert_eq!(m.axis_value(crate::constants::Axis::AbsX), -0.5);
        a.axis(&mut m, 30000, Pst::Left);
        assert!(m.axis_value(crate::constants::Axis::AbsX) > -0.5);
    }
}
