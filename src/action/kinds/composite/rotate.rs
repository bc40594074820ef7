//! `rotate(angle, child)`: rotates a whole-pad `(x, y)` sample by `angle`
//! degrees before forwarding it, so a pad mounted or held at an angle still
//! maps "up" to "up".
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s
//! `RotateModifier`.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct RotateAction {
    angle_rad: f64,
    child: ActionRef,
}

impl Action for RotateAction {
    fn kind(&self) -> &'static str {
        "rotate"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MOD_ROTATE)
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: Pst) {
        let (fx, fy) = (x as f64, y as f64);
        let (s, c) = self.angle_rad.sin_cos();
        let rx = fx * c - fy * s;
        let ry = fx * s + fy * c;
        self.child.whole(m, rx.round() as i64, ry.round() as i64, what);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("rotate({}, {})", self.angle_rad.to_degrees(), self.child.to_text())
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(RotateAction {
                angle_rad: self.angle_rad,
                child,
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("fa")
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(RotateAction {
        angle_rad: params[0].as_float().to_radians(),
        child: params[1].as_action(),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("rotate", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::leaves::mouse::construct_mouse;
    use crate::mapper::TestMapper;

    #[test]
    fn ninety_degree_rotation_swaps_axes() {
        let child = construct_mouse("mouse", vec![]).unwrap();
        let a = construct("rotate", vec![Parameter::float(90.0), Parameter::action(child)]).unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 100, 0, Pst::Left);
        assert!(m.mouse_delta.1 > 90.0);
    }
}
