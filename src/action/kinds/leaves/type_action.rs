//! `type('text')`: presses and releases one virtual key per character of a
//! literal string, in order, with no inter-key timing.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s notion of
//! a string-driven key sequence.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::KeyCode;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct TypeAction {
    text: String,
    keys: Vec<KeyCode>,
}

impl Action for TypeAction {
    fn kind(&self) -> &'static str {
        "type"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::KEYCODE)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        for key in &self.keys {
            m.key_press(*key, true);
            m.key_release(*key);
        }
    }

    fn to_text(&self) -> String {
        format!("type('{}')", self.text.replace('\'', "\\'"))
    }
}

fn char_to_key(c: char) -> Option<KeyCode> {
    let upper = c.to_ascii_uppercase();
    crate::constants::get_int_constant(&format!("KEY_{upper}"))
}

fn schema() -> ParamChecker {
    ParamChecker::compile("s")
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let text = params[0].as_string().to_string();
    let keys: Vec<KeyCode> = text.chars().filter_map(char_to_key).collect();
    Ok(std::rc::Rc::new(TypeAction { text, keys }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("type", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn types_each_character_in_order() {
        let a = construct("type", vec![Parameter::string("aq")]).unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![30, 16]);
    }
}
