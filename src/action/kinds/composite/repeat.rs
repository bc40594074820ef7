//! `repeat(child)`: while the physical button stays pressed, loops `child`
//! (synthesizing a single-step macro out of it if it isn't already a
//! `macro`) back to its first step every time it finishes its last one.
//!
//! Grounded in distilled spec §4.4 and `src/actions/repeat_sleep.c`'s `SoR`
//! struct (shared there with `sleep`; `leaves::sleep` here): `button_press`
//! sets the macro's repeat flag then forwards the press, `button_release`
//! only clears the flag so a pass already in flight finishes on its own
//! rather than being cut short.

use std::rc::Rc;

use crate::action::kinds::composite::macro_action;
use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct RepeatAction {
    macro_child: ActionRef,
}

impl Action for RepeatAction {
    fn kind(&self) -> &'static str {
        "repeat"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        self.macro_child.set_repeat(true);
        self.macro_child.button_press(m);
    }

    fn button_release(&self, _m: &mut dyn Mapper) {
        self.macro_child.set_repeat(false);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.macro_child))
    }

    fn to_text(&self) -> String {
        format!("repeat({})", self.macro_child.to_text())
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let compressed = crate::action::compress_tree(ActionRef::clone(&self.macro_child));
        let as_macro = as_macro_child(compressed);
        if Rc::ptr_eq(&as_macro, &self.macro_child) {
            Rc::clone(self_rc)
        } else {
            Rc::new(RepeatAction { macro_child: as_macro })
        }
    }
}

/// `repeat`'s child must always be a `macro` node so `set_repeat`/the
/// scheduled loop-back has somewhere to attach; a non-macro child is
/// wrapped in a single-step macro rather than rejected.
fn as_macro_child(child: ActionRef) -> ActionRef {
    if child.kind() == "macro" {
        child
    } else {
        macro_action::construct("macro", vec![Parameter::action(child)])
            .expect("single-action macro always constructs")
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("a")
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let child = params[0].as_action();
    Ok(Rc::new(RepeatAction { macro_child: as_macro_child(child) }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("repeat", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child(code: &'static str, v: i64) -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int(code, v)]).unwrap()
    }

    #[test]
    fn wraps_a_bare_action_in_a_single_step_macro() {
        let a = construct("repeat", vec![Parameter::action(button_child("KEY_Q", 16))]).unwrap();
        assert_eq!(a.get_child().unwrap().kind(), "macro");
    }

    #[test]
    fn press_loops_until_released() {
        let a = construct("repeat", vec![Parameter::action(button_child("KEY_Q", 16))]).unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(10);
        let count_while_held = m.key_log.iter().filter(|&&k| k == 16).count();
        assert!(count_while_held >= 2);
        a.button_release(&mut m);
        // the pass already scheduled finishes on its own; no further loop starts.
        m.advance_ticks(10);
        let settled = m.key_log.iter().filter(|&&k| k == 16).count();
        m.advance_ticks(10);
        assert_eq!(m.key_log.iter().filter(|&&k| k == 16).count(), settled);
    }

    #[test]
    fn round_trips_through_to_text() {
        let a = construct("repeat", vec![Parameter::action(button_child("KEY_Q", 16))]).unwrap();
        assert_eq!(a.to_text(), "repeat(button(KEY_Q))");
    }
}
