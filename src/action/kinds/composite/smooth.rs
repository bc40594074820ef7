//! `smooth(child, weight?)`: applies an exponential moving average to
//! axis/trigger/whole-pad values before forwarding them to `child`, damping
//! high-frequency jitter at the cost of added latency.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s
//! `SmoothModifier`.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

const DEFAULT_WEIGHT: f64 = 0.5;

pub struct SmoothAction {
    child: ActionRef,
    weight: f64,
    avg: Cell<(f64, f64)>,
}

impl SmoothAction {
    fn step(&self, x: f64, y: f64) -> (f64, f64) {
        let (ax, ay) = self.avg.get();
        let nx = ax * self.weight + x * (1.0 - self.weight);
        let ny = ay * self.weight + y * (1.0 - self.weight);
        self.avg.set((nx, ny));
        (nx, ny)
    }
}

impl Action for SmoothAction {
    fn kind(&self) -> &'static str {
        "smooth"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MOD_SMOOTH)
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, what: Pst) {
        let (sx, _) = self.step(value as f64, 0.0);
        self.child.axis(m, sx.round() as i64, what);
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: Pst) {
        let (sx, sy) = self.step(x as f64, y as f64);
        self.child.whole(m, sx.round() as i64, sy.round() as i64, what);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("smooth({}, {})", self.child.to_text(), self.weight)
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(SmoothAction {
                child,
                weight: self.weight,
                avg: Cell::new((0.0, 0.0)),
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("af?").with_defaults(vec![Parameter::float(DEFAULT_WEIGHT)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(SmoothAction {
        child: filled[0].as_action(),
        weight: filled[1].as_float(),
        avg: Cell::new((0.0, 0.0)),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("smooth", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::leaves::axis::construct_axis;
    use crate::mapper::TestMapper;

    #[test]
    fn step_change_is_damped_on_first_sample() {
        let child = construct_axis("axis", vec![Parameter::const_string("ABS_X")]).unwrap();
        let a = construct("smooth", vec![Parameter::action(child)]).unwrap();
        let mut m = TestMapper::new();
        a.axis(&mut m, 32767, Pst::Left);
        let damped = m.axis_value(crate::constants::Axis::AbsX);
        let mut raw_mapper = TestMapper::new();
        let raw_child = construct_axis("axis", vec![Parameter::const_string("ABS_X")]).unwrap();
        raw_child.axis(&mut raw_mapper, 32767, Pst::Left);
        assert!(damped < raw_mapper.axis_value(crate::constants::Axis::AbsX));
    }
}
