//! `mouse(axis?)` / `trackpad(axis?)`: drives the virtual mouse from whole-pad
//! motion. With no axis argument both x and y deltas move the mouse; with an
//! axis argument only that axis drives the mouse wheel.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s pad-to-
//! mouse passthrough.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::{self, Axis, Pst};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct MouseAction {
    keyword: &'static str,
    wheel_axis: Option<Axis>,
    sens_x: Cell<f64>,
    sens_y: Cell<f64>,
    last: Cell<(i64, i64)>,
}

impl Action for MouseAction {
    fn kind(&self) -> &'static str {
        self.keyword
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::AXIS)
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, _what: Pst) {
        let (lx, ly) = self.last.get();
        let (dx, dy) = (x - lx, y - ly);
        self.last.set((x, y));
        match self.wheel_axis {
            Some(_) => m.move_wheel(dy as f64 * self.sens_y.get(), 0.0),
            None => m.move_mouse(dx as f64 * self.sens_x.get(), dy as f64 * self.sens_y.get()),
        }
    }

    fn set_sensitivity(&self, x: f64, y: f64, _z: f64) {
        self.sens_x.set(x);
        self.sens_y.set(y);
    }

    fn to_text(&self) -> String {
        match self.wheel_axis {
            Some(a) => format!("{}({})", self.keyword, constants::axis_name(a)),
            None => format!("{}()", self.keyword),
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("s?")
}

fn build(keyword: &str, static_keyword: &'static str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let wheel_axis = match params.first() {
        Some(p) => {
            let name = p.as_string();
            Some(constants::string_to_axis(name).ok_or_else(|| ActionError::InvalidValue {
                keyword: keyword.to_string(),
                index: 0,
                detail: format!("unknown axis '{name}'"),
            })?)
        }
        None => None,
    };
    Ok(std::rc::Rc::new(MouseAction {
        keyword: static_keyword,
        wheel_axis,
        sens_x: Cell::new(1.0),
        sens_y: Cell::new(1.0),
        last: Cell::new((0, 0)),
    }))
}

pub(crate) fn construct_mouse(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    build(keyword, "mouse", params)
}

fn construct_trackpad(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    build(keyword, "trackpad", params)
}

pub fn register(reg: &mut dyn Register) {
    reg.register("mouse", construct_mouse);
    reg.register("trackpad", construct_trackpad);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn whole_pad_motion_moves_mouse_by_delta() {
        let a = construct_mouse("mouse", vec![]).unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 10, 20, Pst::Right);
        a.whole(&mut m, 15, 25, Pst::Right);
        assert_eq!(m.mouse_delta, (15.0, 25.0));
    }
}
