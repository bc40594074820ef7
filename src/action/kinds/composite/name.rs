//! `name('label', child)`: a purely cosmetic wrapper carrying a human label
//! for the GUI. Compression discards it unconditionally, returning the
//! (recursively compressed) child in its place — a compressed tree never
//! contains a `"name"` node (distilled spec §4.6/§8 structural invariant).
//!
//! Grounded in distilled spec §4.4/§4.6 and `src/actions/modifiers.c`'s
//! `NameModifier`.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef, DescribeContext};
use crate::error::ActionError;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct NameAction {
    label: String,
    child: ActionRef,
}

impl Action for NameAction {
    fn kind(&self) -> &'static str {
        "name"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::default()
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn get_property(&self, name: &str) -> Option<Parameter> {
        if name == "name" {
            Some(Parameter::string(self.label.clone()))
        } else {
            None
        }
    }

    fn describe(&self, _ctx: DescribeContext) -> String {
        self.label.clone()
    }

    fn to_text(&self) -> String {
        format!("name('{}', {})", self.label.replace('\'', "\\'"), self.child.to_text())
    }

    fn compress(&self, _self_rc: &ActionRef) -> ActionRef {
        crate::action::compress_tree(ActionRef::clone(&self.child))
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("sa")
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    Ok(std::rc::Rc::new(NameAction {
        label: params[0].as_string().to_string(),
        child: params[1].as_action(),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("name", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::leaves::button::construct as construct_button;

    #[test]
    fn compress_discards_wrapper_unconditionally() {
        let child = construct_button("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap();
        let a = construct("name", vec![Parameter::string("Jump"), Parameter::action(child)]).unwrap();
        assert_eq!(a.describe(DescribeContext::Plain), "Jump");
        let compressed = crate::action::compress_tree(a);
        assert_eq!(compressed.kind(), "button");
    }
}
