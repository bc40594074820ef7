//! `button(KEYCODE)`: presses/releases a single virtual key.
//!
//! Grounded in `src/actions/modifiers.c`'s simplest leaf shape and distilled
//! spec §4.4's button-leaf entry; this is the action Scenario 4's
//! `hold(button(KEY_X), button(KEY_Z), 0.45)` bottoms out at.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::KeyCode;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct ButtonAction {
    key: KeyCode,
    name: &'static str,
    held: Cell<bool>,
}

impl Action for ButtonAction {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::KEYCODE)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        m.key_press(self.key, false);
        self.held.set(true);
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        if self.held.get() {
            m.key_release(self.key);
            self.held.set(false);
        }
    }

    fn to_text(&self) -> String {
        format!("button({})", self.name)
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("c")
}

pub(crate) fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let name = match &params[0] {
        Parameter::ConstInt(name, _) => *name,
        _ => "KEY_UNKNOWN",
    };
    let key = crate::constants::get_int_constant(name).ok_or_else(|| ActionError::InvalidValue {
        keyword: keyword.to_string(),
        index: 0,
        detail: format!("unknown key constant '{name}'"),
    })?;
    Ok(std::rc::Rc::new(ButtonAction {
        key,
        name,
        held: Cell::new(false),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("button", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn press_and_release_toggle_key_count() {
        let a = construct("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert_eq!(m.key_count(KeyCode::X), 1);
        assert_eq!(m.key_log, vec![45]);
        a.button_release(&mut m);
        assert_eq!(m.key_count(KeyCode::X), 0);
    }

    #[test]
    fn to_text_renders_constant_name() {
        let a = construct("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap();
        assert_eq!(a.to_text(), "button(KEY_X)");
    }
}
