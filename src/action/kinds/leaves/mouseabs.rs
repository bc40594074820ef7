//! `mouseabs()`: drives the mouse cursor to an absolute screen-space
//! position rather than moving it by a relative delta, rescaling the pad's
//! native coordinate range onto `[0.0, 1.0]` before handing it to the
//! `Mapper` as two independent axis writes (`ABS_X`/`ABS_Y`), matching how
//! the original reports absolute-positioned input.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::{Axis, Pst, STICK_PAD_MAX, STICK_PAD_MIN};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct MouseAbsAction;

impl Action for MouseAbsAction {
    fn kind(&self) -> &'static str {
        "mouseabs"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::AXIS)
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, _what: Pst) {
        let nx = (x as f64 - STICK_PAD_MIN) / (STICK_PAD_MAX - STICK_PAD_MIN);
        let ny = (y as f64 - STICK_PAD_MIN) / (STICK_PAD_MAX - STICK_PAD_MIN);
        m.set_axis(Axis::AbsX, nx.clamp(0.0, 1.0));
        m.set_axis(Axis::AbsY, ny.clamp(0.0, 1.0));
    }

    fn to_text(&self) -> String {
        "mouseabs()".to_string()
    }
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    ParamChecker::compile("").check(keyword, &params)?;
    Ok(std::rc::Rc::new(MouseAbsAction))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("mouseabs", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn center_position_maps_near_midpoint() {
        let a = construct("mouseabs", vec![]).unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 0, 0, Pst::Left);
        assert!((m.axis_value(Axis::AbsX) - 0.5).abs() < 0.01);
    }
}
