//! `ball(friction?)`: trackball emulation. Each whole-pad sample adds to a
//! velocity accumulator (scaled by the pad delta), which is flushed to the
//! mouse every sample and then decays by `friction` per tick while the pad
//! stays in contact, approximating a spun ball coasting to a stop.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s
//! `BallModifier`. The original's full physical model (radius, mass) is
//! simplified here to a single friction coefficient; acceptable since the
//! distilled spec only requires "a trackball-like feel", not bit-exact
//! physics.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

const DEFAULT_FRICTION: f64 = 0.9;

pub struct BallAction {
    friction: f64,
    last: Cell<(i64, i64)>,
    velocity: Cell<(f64, f64)>,
}

impl Action for BallAction {
    fn kind(&self) -> &'static str {
        "ball"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MOD_BALL)
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, _what: Pst) {
        let (lx, ly) = self.last.get();
        self.last.set((x, y));
        let (vx, vy) = self.velocity.get();
        let (vx, vy) = (vx * self.friction + (x - lx) as f64, vy * self.friction + (y - ly) as f64);
        self.velocity.set((vx, vy));
        m.move_mouse(vx, vy);
    }

    fn to_text(&self) -> String {
        format!("ball({})", self.friction)
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("f?").with_defaults(vec![Parameter::float(DEFAULT_FRICTION)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(BallAction {
        friction: filled[0].as_float(),
        last: Cell::new((0, 0)),
        velocity: Cell::new((0.0, 0.0)),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("ball", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn repeated_motion_in_one_direction_accelerates_mouse() {
        let a = construct("ball", vec![]).unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 100, 0, Pst::Left);
        let first = m.mouse_delta.0;
        a.whole(&mut m, 200, 0, Pst::Left);
        assert!(m.mouse_delta.0 > first);
    }
}
