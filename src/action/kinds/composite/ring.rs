//! `ring(child, inner_radius?, outer_radius?)`: forwards whole-pad events to
//! `child` only while the pad's distance from center falls within
//! `[inner_radius, outer_radius]` (both normalized to `[0.0, 1.0]`),
//! releasing `child` the moment the pad leaves the ring in either direction.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s
//! annulus-shaped deadzone variant.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::{Pst, STICK_PAD_MAX};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct RingAction {
    child: ActionRef,
    inner: f64,
    outer: f64,
    inside: Cell<bool>,
}

impl Action for RingAction {
    fn kind(&self) -> &'static str {
        "ring"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MOD_DEADZONE)
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: Pst) {
        let radius = (x as f64 / STICK_PAD_MAX).hypot(y as f64 / STICK_PAD_MAX);
        let now_inside = radius >= self.inner && radius <= self.outer;
        if now_inside {
            self.child.whole(m, x, y, what);
        } else if self.inside.get() {
            self.child.button_release(m);
        }
        self.inside.set(now_inside);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("ring({}, {}, {})", self.child.to_text(), self.inner, self.outer)
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(RingAction {
                child,
                inner: self.inner,
                outer: self.outer,
                inside: Cell::new(false),
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("af?f?").with_defaults(vec![Parameter::float(0.0), Parameter::float(1.0)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(RingAction {
        child: filled[0].as_action(),
        inner: filled[1].as_float(),
        outer: filled[2].as_float(),
        inside: Cell::new(false),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("ring", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn mouse_child() -> ActionRef {
        crate::action::kinds::leaves::mouse::construct_mouse("mouse", vec![]).unwrap()
    }

    #[test]
    fn only_forwards_within_ring_bounds() {
        let a = construct(
            "ring",
            vec![Parameter::action(mouse_child()), Parameter::float(0.5), Parameter::float(1.0)],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 1000, 0, Pst::Left);
        assert_eq!(m.mouse_delta, (0.0, 0.0));
        a.whole(&mut m, 30000, 0, Pst::Left);
        assert_ne!(m.mouse_delta, (0.0, 0.0));
    }
}
