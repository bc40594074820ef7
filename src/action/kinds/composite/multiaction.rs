//! `and`: forwards every dispatched event to every child simultaneously
//! (as opposed to `macro`, which runs its steps sequentially on press).
//!
//! Grounded in distilled spec §4.4/§4.6 and `src/actions/multiaction.c`.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionList, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::{GyroInput, Mapper};
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct MultiAction {
    children: ActionList,
}

impl Action for MultiAction {
    fn kind(&self) -> &'static str {
        "and"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        for c in &self.children {
            c.button_press(m);
        }
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        for c in &self.children {
            c.button_release(m);
        }
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, what: Pst) {
        for c in &self.children {
            c.axis(m, value, what);
        }
    }

    fn trigger(&self, m: &mut dyn Mapper, old_pos: i64, pos: i64, what: Pst) {
        for c in &self.children {
            c.trigger(m, old_pos, pos, what);
        }
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: Pst) {
        for c in &self.children {
            c.whole(m, x, y, what);
        }
    }

    fn gyro(&self, m: &mut dyn Mapper, value: &GyroInput) {
        for c in &self.children {
            c.gyro(m, value);
        }
    }

    fn get_children(&self) -> ActionList {
        self.children.clone()
    }

    fn to_text(&self) -> String {
        self.children
            .iter()
            .map(|c| c.to_text())
            .collect::<Vec<_>>()
            .join(" and ")
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let mut compressed: ActionList = Vec::new();
        for c in &self.children {
            let cc = crate::action::compress_tree(ActionRef::clone(c));
            if cc.kind() == "and" {
                compressed.extend(cc.get_children());
            } else if cc.kind() != "None" {
                compressed.push(cc);
            }
        }
        if compressed.len() == 1 {
            return compressed.into_iter().next().unwrap();
        }
        if compressed.is_empty() {
            return crate::action::noaction::no_action();
        }
        let changed = compressed.len() != self.children.len()
            || compressed.iter().zip(self.children.iter()).any(|(a, b)| !std::rc::Rc::ptr_eq(a, b));
        if changed {
            std::rc::Rc::new(MultiAction { children: compressed })
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
    Ok(std::rc::Rc::new(MultiAction { children }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("and", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child(code: &'static str, v: i64) -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int(code, v)]).unwrap()
    }

    #[test]
    fn press_forwards_to_every_child() {
        let a = construct(
            "and",
            vec![
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(button_child("KEY_W", 17)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![16, 17]);
    }

    #[test]
    fn nested_and_flattens_on_compress() {
        let inner = construct("and", vec![Parameter::action(button_child("KEY_Q", 16))]).unwrap();
        let outer = construct(
            "and",
            vec![Parameter::action(inner), Parameter::action(button_child("KEY_W", 17))],
        )
        .unwrap();
        let compressed = crate::action::compress_tree(outer);
        assert_eq!(compressed.get_children().len(), 2);
    }
}
