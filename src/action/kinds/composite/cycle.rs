//! `cycle(a1, a2, ...)`: each press fires the next action in the list as a
//! momentary click, wrapping back to the first after the last.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s
//! stateful click-rotation pattern.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionList, ActionRef};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct CycleAction {
    children: ActionList,
    next: Cell<usize>,
}

impl Action for CycleAction {
    fn kind(&self) -> &'static str {
        "cycle"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        if self.children.is_empty() {
            return;
        }
        let i = self.next.get();
        self.children[i].button_press(m);
        self.children[i].button_release(m);
        self.next.set((i + 1) % self.children.len());
    }

    fn get_children(&self) -> ActionList {
        self.children.clone()
    }

    fn to_text(&self) -> String {
        format!(
            "cycle({})",
            self.children.iter().map(|c| c.to_text()).collect::<Vec<_>>().join(", ")
        )
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let compressed: ActionList = self
            .children
            .iter()
            .map(|c| crate::action::compress_tree(ActionRef::clone(c)))
            .collect();
        let changed = compressed.iter().zip(self.children.iter()).any(|(a, b)| !std::rc::Rc::ptr_eq(a, b));
        if changed {
            std::rc::Rc::new(CycleAction {
                children: compressed,
                next: Cell::new(0),
            })
        } else {
            std::rc::Rc::clone(self_rc)
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("a*")
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let children = params.into_iter().map(|p| p.as_action()).collect();
    Ok(std::rc::Rc::new(CycleAction {
        children,
        next: Cell::new(0),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("cycle", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child(code: &'static str, v: i64) -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int(code, v)]).unwrap()
    }

    #[test]
    fn cycles_through_children_and_wraps() {
        let a = construct(
            "cycle",
            vec![
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(button_child("KEY_W", 17)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        a.button_press(&mut m);
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![16, 17, 16]);
    }
}
