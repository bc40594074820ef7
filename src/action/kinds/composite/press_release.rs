//! `press(child)` / `release(child)`: forces `child`'s press or release leg
//! unconditionally, regardless of which edge the enclosing dispatch call
//! actually represents. Used inside `macro` steps that need to hold a key
//! down across several steps, e.g. `press(button(KEY_LEFTSHIFT)); ...;
//! release(button(KEY_LEFTSHIFT))`.
//!
//! Grounded in distilled spec §4.4 and `src/actions/macro.c`'s explicit
//! press/release pseudo-steps.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

#[derive(Clone, Copy, PartialEq)]
enum Force {
    Press,
    Release,
}

pub struct ForceAction {
    force: Force,
    child: ActionRef,
}

impl Action for ForceAction {
    fn kind(&self) -> &'static str {
        match self.force {
            Force::Press => "press",
            Force::Release => "release",
        }
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MODIFIER)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        match self.force {
            Force::Press => self.child.button_press(m),
            Force::Release => self.child.button_release(m),
        }
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        self.button_press(m);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("{}({})", self.kind(), self.child.to_text())
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(ForceAction { force: self.force, child })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("a")
}

fn build(keyword: &str, params: Vec<Parameter>, force: Force) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(ForceAction {
        force,
        child: params[0].as_action(),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("press", |k, p| build(k, p, Force::Press));
    reg.register("release", |k, p| build(k, p, Force::Release));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child() -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap()
    }

    #[test]
    fn press_forces_child_press_even_on_release_dispatch() {
        let a = build("press", vec![Parameter::action(button_child())], Force::Press).unwrap();
        let mut m = TestMapper::new();
        a.button_release(&mut m);
        assert_eq!(m.key_log, vec![45]);
    }
}
