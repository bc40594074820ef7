//! `menu`, `profile`, `turnoff`, `keyboard`: leaves that forward a tagged
//! payload to `Mapper::special_action` instead of emitting input directly.
//! The core does not know how to display a menu or switch a profile; it
//! only knows how to ask the Mapper to do it.
//!
//! Grounded in distilled spec §4.4 "special actions" and §6 "Mapper
//! special-action payloads".

use crate::action::registry::Register;
use crate::action::{warn_unhandled, Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::{Mapper, SpecialActionPayload};
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct MenuAction {
    menu_id: String,
    size: i64,
}

impl Action for MenuAction {
    fn kind(&self) -> &'static str {
        "menu"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::SPECIAL)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        if !m.special_action(SpecialActionPayload::Menu {
            menu_id: self.menu_id.clone(),
            size: self.size,
        }) {
            warn_unhandled(self.kind(), "button_press");
        }
    }

    fn to_text(&self) -> String {
        format!("menu('{}', {})", self.menu_id, self.size)
    }
}

fn menu_schema() -> ParamChecker {
    ParamChecker::compile("si?").with_defaults(vec![Parameter::int(0)])
}

fn construct_menu(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    menu_schema().check(keyword, &params)?;
    let filled = menu_schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(MenuAction {
        menu_id: filled[0].as_string().to_string(),
        size: filled[1].as_int(),
    }))
}

pub struct ProfileAction {
    profile: String,
}

impl Action for ProfileAction {
    fn kind(&self) -> &'static str {
        "profile"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::SPECIAL)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        if !m.special_action(SpecialActionPayload::Profile(self.profile.clone())) {
            warn_unhandled(self.kind(), "button_press");
        }
    }

    fn to_text(&self) -> String {
        format!("profile('{}')", self.profile)
    }
}

fn profile_schema() -> ParamChecker {
    ParamChecker::compile("s")
}

fn construct_profile(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    profile_schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(ProfileAction {
        profile: params[0].as_string().to_string(),
    }))
}

pub struct TurnoffAction;

impl Action for TurnoffAction {
    fn kind(&self) -> &'static str {
        "turnoff"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::SPECIAL)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        if !m.special_action(SpecialActionPayload::Turnoff) {
            warn_unhandled(self.kind(), "button_press");
        }
    }

    fn to_text(&self) -> String {
        "turnoff()".to_string()
    }
}

pub struct KeyboardAction;

impl Action for KeyboardAction {
    fn kind(&self) -> &'static str {
        "keyboard"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::SPECIAL)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        if !m.special_action(SpecialActionPayload::Keyboard) {
            warn_unhandled(self.kind(), "button_press");
        }
    }

    fn to_text(&self) -> String {
        "keyboard()".to_string()
    }
}

fn empty_schema() -> ParamChecker {
    ParamChecker::compile("")
}

fn construct_turnoff(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    empty_schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(TurnoffAction))
}

fn construct_keyboard(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    empty_schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(KeyboardAction))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("menu", construct_menu);
    reg.register("profile", construct_profile);
    reg.register("turnoff", construct_turnoff);
    reg.register("keyboard", construct_keyboard);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn profile_forwards_string_payload() {
        let a = construct_profile("profile", vec![Parameter::string("racing")]).unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert_eq!(m.special_action_log.len(), 1);
    }

    #[test]
    fn turnoff_takes_no_params() {
        let a = construct_turnoff("turnoff", vec![]).unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert_eq!(m.special_action_log.len(), 1);
    }
}
