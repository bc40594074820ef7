//! `pressed(BUTTON, child)` / `released(BUTTON, child)` /
//! `touched(PST, child)` / `untouched(PST, child)` / `clicked(BUTTON,
//! child)`: gate forwarding of a dispatched event on some *other* physical
//! input's current state, for bindings like "only scroll the wheel while
//! the grip is held".
//!
//! `clicked` additionally debounces: it fires `child` once, as a momentary
//! click, on the press edge of `BUTTON`, rather than gating an in-flight
//! event.
//!
//! Grounded in distilled spec §4.4 and `src/actions/press_touch_release.c`
//! (`pressed`/`released`/`touched`/`untouched`) plus `src/actions/clicked.c`
//! (`clicked`'s debounced click-on-press behavior).

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::{self, Pst, SCButton};
use crate::error::ActionError;
use crate::mapper::{GyroInput, Mapper};
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Pressed,
    Released,
    Touched,
    Untouched,
    Clicked,
}

impl Kind {
    fn keyword(self) -> &'static str {
        match self {
            Kind::Pressed => "pressed",
            Kind::Released => "released",
            Kind::Touched => "touched",
            Kind::Untouched => "untouched",
            Kind::Clicked => "clicked",
        }
    }
}

enum Subject {
    Button(SCButton),
    Pst(Pst),
}

impl Subject {
    fn text(&self) -> String {
        match self {
            Subject::Button(b) => b.to_string(),
            Subject::Pst(p) => constants::what_to_string(*p).to_string(),
        }
    }

    fn gate(&self, m: &dyn Mapper, kind: Kind) -> bool {
        match (self, kind) {
            (Subject::Button(b), Kind::Pressed) => m.is_pressed(*b),
            (Subject::Button(b), Kind::Released) => m.was_pressed(*b) && !m.is_pressed(*b),
            (Subject::Pst(p), Kind::Touched) => m.is_touched(*p),
            (Subject::Pst(p), Kind::Untouched) => !m.is_touched(*p),
            _ => false,
        }
    }
}

pub struct ConditionalAction {
    kind: Kind,
    subject: Subject,
    child: ActionRef,
    was_pressed: Cell<bool>,
}

impl Action for ConditionalAction {
    fn kind(&self) -> &'static str {
        self.kind.keyword()
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MODIFIER)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        if self.kind == Kind::Clicked {
            if let Subject::Button(b) = &self.subject {
                let now = m.is_pressed(*b);
                if now && !self.was_pressed.get() {
                    self.child.button_press(m);
                    self.child.button_release(m);
                }
                self.was_pressed.set(now);
            }
            return;
        }
        if self.subject.gate(m, self.kind) {
            self.child.button_press(m);
        }
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        if self.kind != Kind::Clicked && self.subject.gate(m, self.kind) {
            self.child.button_release(m);
        }
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, what: Pst) {
        if self.subject.gate(m, self.kind) {
            self.child.axis(m, value, what);
        }
    }

    fn trigger(&self, m: &mut dyn Mapper, old_pos: i64, pos: i64, what: Pst) {
        if self.subject.gate(m, self.kind) {
            self.child.trigger(m, old_pos, pos, what);
        }
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: Pst) {
        if self.subject.gate(m, self.kind) {
            self.child.whole(m, x, y, what);
        }
    }

    fn gyro(&self, m: &mut dyn Mapper, value: &GyroInput) {
        if self.subject.gate(m, self.kind) {
            self.child.gyro(m, value);
        }
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("{}({}, {})", self.kind.keyword(), self.subject.text(), self.child.to_text())
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let _ = crate::action::compress_tree(ActionRef::clone(&self.child));
        std::rc::Rc::clone(self_rc)
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("sa")
}

fn build(keyword: &str, params: Vec<Parameter>, kind: Kind) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let name = params[0].as_string();
    let subject = match kind {
        Kind::Touched | Kind::Untouched => constants::string_to_pst(name)
            .map(Subject::Pst)
            .ok_or_else(|| ActionError::InvalidValue {
                keyword: keyword.to_string(),
                index: 0,
                detail: format!("unknown pad/stick/trigger '{name}'"),
            })?,
        _ => constants::string_to_button(name)
            .map(Subject::Button)
            .ok_or_else(|| ActionError::InvalidValue {
                keyword: keyword.to_string(),
                index: 0,
                detail: format!("unknown button '{name}'"),
            })?,
    };
    Ok(std::rc::Rc::new(ConditionalAction {
        kind,
        subject,
        child: params[1].as_action(),
        was_pressed: Cell::new(false),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("pressed", |k, p| build(k, p, Kind::Pressed));
    reg.register("released", |k, p| build(k, p, Kind::Released));
    reg.register("touched", |k, p| build(k, p, Kind::Touched));
    reg.register("untouched", |k, p| build(k, p, Kind::Untouched));
    reg.register("clicked", |k, p| build(k, p, Kind::Clicked));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child() -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap()
    }

    #[test]
    fn clicked_fires_once_per_press_edge() {
        let a = build("clicked", vec![Parameter::const_string("A"), Parameter::action(button_child())], Kind::Clicked)
            .unwrap();
        let mut m = TestMapper::new();
        m.set_pressed(SCButton::A, true);
        a.button_press(&mut m);
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![45]);
    }

    #[test]
    fn pressed_gates_forwarding_on_other_buttons_state() {
        let a = build("pressed", vec![Parameter::const_string("A"), Parameter::action(button_child())], Kind::Pressed)
            .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert!(m.key_log.is_empty());
        m.set_pressed(SCButton::A, true);
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![45]);
    }
}
