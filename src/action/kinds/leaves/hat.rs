//! `hatup`/`hatdown`/`hatleft`/`hatright`: wrap a child action that fires
//! when a pad's hat axis crosses into one particular direction. Used inside
//! `dpad`-free bindings where a single axis is bound directly to one
//! direction rather than through the `dpad` composite.
//!
//! Grounded in distilled spec §4.4's hat-direction leaf family and
//! `src/actions/modifiers.c`'s edge-triggered button wrappers.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn keyword(self) -> &'static str {
        match self {
            Direction::Up => "hatup",
            Direction::Down => "hatdown",
            Direction::Left => "hatleft",
            Direction::Right => "hatright",
        }
    }

    /// True when `value` (raw stick/hat axis reading) lies in this
    /// direction's half of its axis.
    fn active(self, value: i64) -> bool {
        match self {
            Direction::Up | Direction::Left => value < 0,
            Direction::Down | Direction::Right => value > 0,
        }
    }
}

pub struct HatAction {
    direction: Direction,
    child: ActionRef,
    active: Cell<bool>,
}

impl Action for HatAction {
    fn kind(&self) -> &'static str {
        self.direction.keyword()
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MODIFIER)
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, _what: Pst) {
        let now_active = self.direction.active(value);
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
        format!("{}({})", self.direction.keyword(), self.child.to_text())
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let compressed_child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&compressed_child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(HatAction {
                direction: self.direction,
                child: compressed_child,
                active: Cell::new(false),
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("a")
}

fn build(keyword: &str, params: Vec<Parameter>, direction: Direction) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(HatAction {
        direction,
        child: params[0].as_action(),
        active: Cell::new(false),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("hatup", |k, p| build(k, p, Direction::Up));
    reg.register("hatdown", |k, p| build(k, p, Direction::Down));
    reg.register("hatleft", |k, p| build(k, p, Direction::Left));
    reg.register("hatright", |k, p| build(k, p, Direction::Right));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child() -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int("KEY_X", 45)])
            .unwrap()
    }

    #[test]
    fn hatup_fires_child_on_negative_crossing() {
        let a = build("hatup", vec![Parameter::action(button_child())], Direction::Up).unwrap();
        let mut m = TestMapper::new();
        a.axis(&mut m, -1000, Pst::Left);
        assert_eq!(m.key_log, vec![45]);
        a.axis(&mut m, 0, Pst::Left);
        assert_eq!(m.key_count(crate::constants::KeyCode::X), 0);
    }
}
