//! `axis(AXIS_NAME, min?, max?)` / `raxis(...)`: maps a stick/trigger axis
//! value onto an output axis, linearly rescaling from the controller's
//! native range into `[min, max]`. `raxis` is the same leaf with the input
//! value negated first.
//!
//! Grounded in `src/actions/modifiers.c`'s axis passthrough and distilled
//! spec §4.4.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::{self, Axis, Pst, STICK_PAD_MAX, STICK_PAD_MIN};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct AxisAction {
    axis: Axis,
    axis_name: &'static str,
    min: f64,
    max: f64,
    reversed: bool,
}

impl AxisAction {
    fn scale(&self, value: i64) -> f64 {
        let raw = if self.reversed { -value as f64 } else { value as f64 };
        let t = (raw - STICK_PAD_MIN) / (STICK_PAD_MAX - STICK_PAD_MIN);
        self.min + t.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

impl Action for AxisAction {
    fn kind(&self) -> &'static str {
        if self.reversed {
            "raxis"
        } else {
            "axis"
        }
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::AXIS)
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, _what: Pst) {
        m.set_axis(self.axis, self.scale(value));
    }

    fn trigger(&self, m: &mut dyn Mapper, _old_pos: i64, pos: i64, what: Pst) {
        self.axis(m, pos, what);
    }

    fn to_text(&self) -> String {
        let kw = if self.reversed { "raxis" } else { "axis" };
        if self.min == STICK_PAD_MIN && self.max == STICK_PAD_MAX {
            format!("{kw}({})", self.axis_name)
        } else {
            format!("{kw}({}, {}, {})", self.axis_name, self.min, self.max)
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("sf?f?").with_defaults(vec![Parameter::float(STICK_PAD_MIN), Parameter::float(STICK_PAD_MAX)])
}

fn build(keyword: &str, params: Vec<Parameter>, reversed: bool) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    let axis_name = filled[0].as_string().to_string();
    let axis = constants::string_to_axis(&axis_name).ok_or_else(|| ActionError::InvalidValue {
        keyword: keyword.to_string(),
        index: 0,
        detail: format!("unknown axis '{axis_name}'"),
    })?;
    // `string_to_axis` returns a `'static` name only through the table; recover it
    // so `to_text` never allocates a mismatched name.
    let axis_name_static = constants::axis_name(axis);
    Ok(std::rc::Rc::new(AxisAction {
        axis,
        axis_name: axis_name_static,
        min: filled[1].as_float(),
        max: filled[2].as_float(),
        reversed,
    }))
}

pub(crate) fn construct_axis(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    build(keyword, params, false)
}

fn construct_raxis(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    build(keyword, params, true)
}

pub fn register(reg: &mut dyn Register) {
    reg.register("axis", construct_axis);
    reg.register("raxis", construct_raxis);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn axis_scales_full_range() {
        let a = construct_axis("axis", vec![Parameter::const_string("ABS_X")]).unwrap();
        let mut m = TestMapper::new();
        a.axis(&mut m, 0, Pst::Left);
        assert!((m.axis_value(Axis::AbsX) - (-0.5)).abs() < 1.0);
    }

    #[test]
    fn raxis_negates_input() {
        let a = construct_raxis("raxis", vec![Parameter::const_string("ABS_X")]).unwrap();
        let mut m = TestMapper::new();
        a.axis(&mut m, 32767, Pst::Left);
        assert!(m.axis_value(Axis::AbsX) < 0.0);
    }
}
