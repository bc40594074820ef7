//! `XY(x_action, y_action)`: splits a whole-pad/stick event into two
//! independent `axis()` dispatches, one per child. `relXY(x_action,
//! y_action)` does the same but with the delta from the previous sample
//! rather than the absolute position (for relative-mouse-style children).
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s
//! `SplitModifier`.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct XyAction {
    relative: bool,
    x_action: ActionRef,
    y_action: ActionRef,
    last: Cell<(i64, i64)>,
}

impl Action for XyAction {
    fn kind(&self) -> &'static str {
        if self.relative {
            "relXY"
        } else {
            "XY"
        }
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: Pst) {
        if self.relative {
            let (lx, ly) = self.last.get();
            self.last.set((x, y));
            self.x_action.axis(m, x - lx, what);
            self.y_action.axis(m, y - ly, what);
        } else {
            self.x_action.axis(m, x, what);
            self.y_action.axis(m, y, what);
        }
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.x_action))
    }

    fn to_text(&self) -> String {
        format!("{}({}, {})", self.kind(), self.x_action.to_text(), self.y_action.to_text())
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let x = crate::action::compress_tree(ActionRef::clone(&self.x_action));
        let y = crate::action::compress_tree(ActionRef::clone(&self.y_action));
        if std::rc::Rc::ptr_eq(&x, &self.x_action) && std::rc::Rc::ptr_eq(&y, &self.y_action) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(XyAction {
                relative: self.relative,
                x_action: x,
                y_action: y,
                last: Cell::new((0, 0)),
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("aa")
}

fn build(keyword: &str, params: Vec<Parameter>, relative: bool) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(XyAction {
        relative,
        x_action: params[0].as_action(),
        y_action: params[1].as_action(),
        last: Cell::new((0, 0)),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("XY", |k, p| build(k, p, false));
    reg.register("relXY", |k, p| build(k, p, true));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn axis_child(name: &'static str) -> ActionRef {
        crate::action::kinds::leaves::axis::construct_axis("axis", vec![Parameter::const_string(name)]).unwrap()
    }

    #[test]
    fn splits_whole_event_into_two_axis_dispatches() {
        let a = build("XY", vec![Parameter::action(axis_child("ABS_X")), Parameter::action(axis_child("ABS_Y"))], false)
            .unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 1000, -1000, Pst::Left);
        assert!(m.axis_value(crate::constants::Axis::AbsX) != 0.0);
        assert!(m.axis_value(crate::constants::Axis::AbsY) != 0.0);
    }
}
