//! `tap(action, timeout?)`: fires `action` as a momentary press+release only
//! if the physical button is released again before `timeout` elapses;
//! a press held past the timeout is simply dropped (no long-press fallback —
//! that's what `hold` is for).
//!
//! Grounded in distilled spec §4.4/§4.8 and `src/actions/modifiers.c`'s
//! click-window pattern.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

const DEFAULT_TIMEOUT_TICKS: u64 = 200;

pub struct TapAction {
    child: ActionRef,
    timeout_ticks: u64,
    pressed_at: Cell<Option<u64>>,
}

impl Action for TapAction {
    fn kind(&self) -> &'static str {
        "tap"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MODIFIER)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        self.pressed_at.set(Some(m.now()));
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        if let Some(pressed_at) = self.pressed_at.take() {
            if m.now().saturating_sub(pressed_at) <= self.timeout_ticks {
                self.child.button_press(m);
                self.child.button_release(m);
            }
        }
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("tap({}, {})", self.child.to_text(), self.timeout_ticks as f64 / 1000.0)
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let compressed_child = crate::action::compress_tree(ActionRef::clone(&self.child));
        if std::rc::Rc::ptr_eq(&compressed_child, &self.child) {
            std::rc::Rc::clone(self_rc)
        } else {
            std::rc::Rc::new(TapAction {
                child: compressed_child,
                timeout_ticks: self.timeout_ticks,
                pressed_at: Cell::new(None),
            })
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("af?").with_defaults(vec![Parameter::float(DEFAULT_TIMEOUT_TICKS as f64 / 1000.0)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    let timeout_ticks = (filled[1].as_float() * 1000.0).round() as u64;
    Ok(std::rc::Rc::new(TapAction {
        child: filled[0].as_action(),
        timeout_ticks,
        pressed_at: Cell::new(None),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("tap", construct);
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
    fn quick_release_fires_child() {
        let a = construct("tap", vec![Parameter::action(button_child())]).unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(50);
        a.button_release(&mut m);
        assert_eq!(m.key_log, vec![45]);
    }

    #[test]
    fn release_past_timeout_drops_event() {
        let a = construct("tap", vec![Parameter::action(button_child())]).unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(500);
        a.button_release(&mut m);
        assert!(m.key_log.is_empty());
    }
}
