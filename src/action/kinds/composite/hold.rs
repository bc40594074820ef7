//! `hold(held_action, default_action?, timeout?)`: fires `held_action` if
//! the button is still pressed when `timeout` elapses, or `default_action`
//! as a momentary click if released first.
//!
//! `doubleclick(dbl_action, default_action?, timeout?)`: fires `dbl_action`
//! if a second press arrives before `timeout` after the first release,
//! otherwise fires `default_action` as a momentary click once the window
//! expires.
//!
//! Both keywords build the same merged node: a profile that nests one
//! inside the other on the same button (`hold(h, doubleclick(d, default,
//! t))`, `doubleclick(d, hold(h, default, t))`, `hold(h, doubleclick(d,
//! default), t)`) compresses to a single node carrying all of `hold_action`,
//! `dblclick_action`, `default_action` and `timeout`, so the button never
//! has to juggle two independent timers for the one press. Grounded in
//! distilled spec §4.4/§4.8 Scenario 4 and §8's merge invariant, and in
//! `src/actions/hold_doubleclick.c`'s `HoldDblClick`/`mergable`/`merge`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef, HoldDblClickParts};
use crate::constants::{Pst, TRIGGER_MAX};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;
use crate::scheduler::TaskId;

const DEFAULT_TIMEOUT_TICKS: u64 = 500;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    ButtonDown1,
    ButtonUp1,
    Executing,
}

struct Inner {
    hold_action: ActionRef,
    dblclick_action: ActionRef,
    default_action: ActionRef,
    timeout_ticks: u64,
    state: Cell<State>,
    task: Cell<Option<TaskId>>,
}

/// `hold`/`doubleclick` share this node; `primary_keyword` is only which
/// name the instance was parsed from, used to render `to_text` and to know
/// which slot a bare constructor call should fill.
pub struct HoldDblClickAction {
    primary_keyword: &'static str,
    inner: Rc<Inner>,
    trigger_active: Cell<bool>,
}

fn is_no_action(a: &ActionRef) -> bool {
    a.kind() == "None"
}

fn on_timeout(inner: &Rc<Inner>, m: &mut dyn Mapper) {
    match inner.state.get() {
        State::ButtonDown1 => {
            inner.state.set(State::Executing);
            if is_no_action(&inner.hold_action) {
                inner.default_action.button_press(m);
            } else {
                inner.hold_action.button_press(m);
            }
        }
        State::ButtonUp1 => {
            inner.state.set(State::Idle);
            inner.default_action.button_press(m);
            inner.default_action.button_release(m);
        }
        State::Idle | State::Executing => {}
    }
}

impl HoldDblClickAction {
    fn press(&self, m: &mut dyn Mapper) {
        let inner = &self.inner;
        match inner.state.get() {
            State::Idle => {
                inner.state.set(State::ButtonDown1);
                let id = m.schedule(
                    inner.timeout_ticks,
                    {
                        let inner = Rc::clone(inner);
                        Box::new(move |mapper: &mut dyn Mapper| on_timeout(&inner, mapper))
                    },
                );
                inner.task.set(Some(id));
            }
            State::ButtonUp1 => {
                if let Some(id) = inner.task.take() {
                    m.cancel(id);
                }
                inner.state.set(State::Idle);
                inner.dblclick_action.button_press(m);
                inner.dblclick_action.button_release(m);
            }
            State::ButtonDown1 | State::Executing => {}
        }
    }

    fn release(&self, m: &mut dyn Mapper) {
        let inner = &self.inner;
        match inner.state.get() {
            State::ButtonDown1 => {
                if let Some(id) = inner.task.take() {
                    m.cancel(id);
                }
                if is_no_action(&inner.dblclick_action) {
                    inner.state.set(State::Idle);
                    inner.default_action.button_press(m);
                    inner.default_action.button_release(m);
                } else {
                    inner.state.set(State::ButtonUp1);
                    let id = m.schedule(
                        inner.timeout_ticks,
                        {
                            let inner = Rc::clone(inner);
                            Box::new(move |mapper: &mut dyn Mapper| on_timeout(&inner, mapper))
                        },
                    );
                    inner.task.set(Some(id));
                }
            }
            State::Executing => {
                inner.state.set(State::Idle);
                inner.hold_action.button_release(m);
            }
            State::Idle | State::ButtonUp1 => {}
        }
    }
}

impl Action for HoldDblClickAction {
    fn kind(&self) -> &'static str {
        self.primary_keyword
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MODIFIER)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        self.press(m);
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        self.release(m);
    }

    /// Lets a `hold`/`doubleclick` node sit directly on an analog trigger:
    /// crossing `TRIGGER_MAX/2`'s edge is treated as a button press/release.
    /// Grounded in `hold_doubleclick.c`'s own `trigger()` override.
    fn trigger(&self, m: &mut dyn Mapper, _old_pos: i64, pos: i64, _what: Pst) {
        let now_active = pos as f64 >= TRIGGER_MAX / 2.0;
        let was_active = self.trigger_active.replace(now_active);
        if now_active && !was_active {
            self.press(m);
        } else if !now_active && was_active {
            self.release(m);
        }
    }

    fn set_haptic(&self, amplitude: f64, frequency: f64, period: f64) {
        self.inner.hold_action.set_haptic(amplitude, frequency, period);
        self.inner.dblclick_action.set_haptic(amplitude, frequency, period);
    }

    fn set_sensitivity(&self, x: f64, y: f64, z: f64) {
        self.inner.hold_action.set_sensitivity(x, y, z);
        self.inner.dblclick_action.set_sensitivity(x, y, z);
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(match self.primary_keyword {
            "doubleclick" => ActionRef::clone(&self.inner.dblclick_action),
            _ => ActionRef::clone(&self.inner.hold_action),
        })
    }

    fn get_property(&self, name: &str) -> Option<Parameter> {
        match name {
            "hold_action" => Some(Parameter::action(ActionRef::clone(&self.inner.hold_action))),
            "dblclick_action" => Some(Parameter::action(ActionRef::clone(&self.inner.dblclick_action))),
            "default_action" => Some(Parameter::action(ActionRef::clone(&self.inner.default_action))),
            "timeout" => Some(Parameter::float(self.inner.timeout_ticks as f64 / 1000.0)),
            _ => None,
        }
    }

    fn hold_dblclick_parts(&self) -> Option<HoldDblClickParts> {
        Some(HoldDblClickParts {
            hold_action: ActionRef::clone(&self.inner.hold_action),
            dblclick_action: ActionRef::clone(&self.inner.dblclick_action),
            default_action: ActionRef::clone(&self.inner.default_action),
            timeout_ticks: self.inner.timeout_ticks,
        })
    }

    fn to_text(&self) -> String {
        let (keyword, primary) = match self.primary_keyword {
            "doubleclick" => ("doubleclick", &self.inner.dblclick_action),
            _ => ("hold", &self.inner.hold_action),
        };
        format!(
            "{}({}, {}, {})",
            keyword,
            primary.to_text(),
            self.inner.default_action.to_text(),
            self.inner.timeout_ticks as f64 / 1000.0
        )
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let hold = crate::action::compress_tree(ActionRef::clone(&self.inner.hold_action));
        let dbl = crate::action::compress_tree(ActionRef::clone(&self.inner.dblclick_action));
        let default = crate::action::compress_tree(ActionRef::clone(&self.inner.default_action));
        let timeout = self.inner.timeout_ticks;

        let merged = RefCell::new((hold, dbl, default, timeout));

        // Three sequential checks, one per slot that might itself be a
        // mergable node, each reading the slot's *current* value -- a
        // prior check's adoption can feed the next, matching the original's
        // fresh re-read of `hdbl->hold_action`/`dblclick_action`/
        // `default_action` at each top-level check.
        try_merge_slot(&merged, |m| m.0.clone());
        try_merge_slot(&merged, |m| m.1.clone());
        try_merge_slot(&merged, |m| m.2.clone());

        let (hold, dbl, default, timeout) = merged.into_inner();
        let changed = !Rc::ptr_eq(&hold, &self.inner.hold_action)
            || !Rc::ptr_eq(&dbl, &self.inner.dblclick_action)
            || !Rc::ptr_eq(&default, &self.inner.default_action)
            || timeout != self.inner.timeout_ticks;
        if changed {
            build(self.primary_keyword, hold, dbl, default, timeout)
        } else {
            Rc::clone(self_rc)
        }
    }
}

/// Looks at whichever slot `pick` names for a mergable candidate, and if
/// one is found, adopts its `hold_action`/`dblclick_action`/`default_action`
/// fields into the other two slots by the same rule as `TRY_MERGE`:
/// adopt `from` into `current` when `from` isn't `no_action()` and either
/// `current` is `no_action()` *or* `current` is this very candidate node
/// (the self-slot-identity case: the candidate occupies the slot its own
/// field is being adopted into, e.g. a nested `doubleclick` sitting as
/// `hold`'s own `default_action`).
fn try_merge_slot(
    merged: &RefCell<(ActionRef, ActionRef, ActionRef, u64)>,
    pick: impl Fn(&(ActionRef, ActionRef, ActionRef, u64)) -> ActionRef,
) {
    let candidate = pick(&merged.borrow());
    let Some(parts) = candidate.hold_dblclick_parts() else { return };

    let mut m = merged.borrow_mut();
    adopt(&mut m.0, &parts.hold_action, &candidate);
    adopt(&mut m.1, &parts.dblclick_action, &candidate);
    adopt(&mut m.2, &parts.default_action, &candidate);
    if m.3 == DEFAULT_TIMEOUT_TICKS {
        m.3 = parts.timeout_ticks;
    }
}

fn adopt(current: &mut ActionRef, from: &ActionRef, candidate: &ActionRef) {
    if is_no_action(from) {
        return;
    }
    if is_no_action(current) || Rc::ptr_eq(current, candidate) {
        *current = ActionRef::clone(from);
    }
}

fn build(
    primary_keyword: &'static str,
    hold_action: ActionRef,
    dblclick_action: ActionRef,
    default_action: ActionRef,
    timeout_ticks: u64,
) -> ActionRef {
    Rc::new(HoldDblClickAction {
        primary_keyword,
        inner: Rc::new(Inner {
            hold_action,
            dblclick_action,
            default_action,
            timeout_ticks,
            state: Cell::new(State::Idle),
            task: Cell::new(None),
        }),
        trigger_active: Cell::new(false),
    })
}

fn schema() -> ParamChecker {
    ParamChecker::compile("aa?f?").with_defaults(vec![
        Parameter::action(crate::action::noaction::no_action()),
        Parameter::float(DEFAULT_TIMEOUT_TICKS as f64 / 1000.0),
    ])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    let timeout_ticks = (filled[2].as_float() * 1000.0).round() as u64;
    let primary = filled[0].as_action();
    let default_action = filled[1].as_action();
    let (hold_action, dblclick_action) = match keyword {
        "doubleclick" => (crate::action::noaction::no_action(), primary),
        _ => (primary, crate::action::noaction::no_action()),
    };
    let primary_keyword = if keyword == "doubleclick" { "doubleclick" } else { "hold" };
    Ok(build(primary_keyword, hold_action, dblclick_action, default_action, timeout_ticks))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("hold", construct);
    reg.register("doubleclick", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child(code: &'static str, v: i64) -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int(code, v)]).unwrap()
    }

    #[test]
    fn hold_past_timeout_fires_held_action() {
        let a = construct(
            "hold",
            vec![
                Parameter::action(button_child("KEY_X", 45)),
                Parameter::action(button_child("KEY_Z", 44)),
                Parameter::float(0.45),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(500);
        a.button_release(&mut m);
        assert_eq!(m.key_log, vec![45]);
    }

    #[test]
    fn release_before_timeout_fires_default_action() {
        let a = construct(
            "hold",
            vec![
                Parameter::action(button_child("KEY_X", 45)),
                Parameter::action(button_child("KEY_Z", 44)),
                Parameter::float(0.45),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(200);
        a.button_release(&mut m);
        assert_eq!(m.key_log, vec![44]);
    }

    #[test]
    fn doubleclick_within_window_fires_dbl_action() {
        let a = construct(
            "doubleclick",
            vec![
                Parameter::action(button_child("KEY_X", 45)),
                Parameter::action(button_child("KEY_Z", 44)),
                Parameter::float(0.5),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        a.button_release(&mut m);
        m.advance_ticks(50);
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![45]);
    }

    #[test]
    fn single_click_after_window_fires_default_action() {
        let a = construct(
            "doubleclick",
            vec![
                Parameter::action(button_child("KEY_X", 45)),
                Parameter::action(button_child("KEY_Z", 44)),
                Parameter::float(0.5),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        a.button_release(&mut m);
        m.advance_ticks(500);
        assert_eq!(m.key_log, vec![44]);
    }

    #[test]
    fn merges_doubleclick_nested_as_holds_default_action() {
        let inner = construct(
            "doubleclick",
            vec![
                Parameter::action(button_child("KEY_Z", 44)),
                Parameter::action(button_child("KEY_D", 32)),
                Parameter::float(0.3),
            ],
        )
        .unwrap();
        let outer = construct(
            "hold",
            vec![Parameter::action(button_child("KEY_X", 45)), Parameter::action(inner)],
        )
        .unwrap();
        let compressed = crate::action::compress_tree(outer);
        let parts = compressed.hold_dblclick_parts().unwrap();
        assert_eq!(parts.hold_action.to_text(), "button(KEY_X)");
        assert_eq!(parts.dblclick_action.to_text(), "button(KEY_Z)");
        assert_eq!(parts.default_action.to_text(), "button(KEY_D)");
    }

    #[test]
    fn merges_hold_nested_inside_doubleclick() {
        let inner = construct(
            "hold",
            vec![
                Parameter::action(button_child("KEY_Z", 44)),
                Parameter::action(button_child("KEY_D", 32)),
                Parameter::float(0.3),
            ],
        )
        .unwrap();
        let outer = construct(
            "doubleclick",
            vec![Parameter::action(button_child("KEY_X", 45)), Parameter::action(inner)],
        )
        .unwrap();
        let compressed = crate::action::compress_tree(outer);
        let parts = compressed.hold_dblclick_parts().unwrap();
        assert_eq!(parts.dblclick_action.to_text(), "button(KEY_X)");
        assert_eq!(parts.hold_action.to_text(), "button(KEY_Z)");
        assert_eq!(parts.default_action.to_text(), "button(KEY_D)");
    }

    #[test]
    fn merges_doubleclick_as_holds_own_default_with_explicit_timeout() {
        // hold(h, doubleclick(d, default), t): the nested doubleclick has no
        // timeout of its own, so it occupies `hold`'s `default_action` slot
        // outright until the merge adopts its `default_action` back out.
        let inner = construct(
            "doubleclick",
            vec![
                Parameter::action(button_child("KEY_Z", 44)),
                Parameter::action(button_child("KEY_D", 32)),
            ],
        )
        .unwrap();
        let outer = construct(
            "hold",
            vec![
                Parameter::action(button_child("KEY_X", 45)),
                Parameter::action(inner),
                Parameter::float(0.3),
            ],
        )
        .unwrap();
        let compressed = crate::action::compress_tree(outer);
        let parts = compressed.hold_dblclick_parts().unwrap();
        assert_eq!(parts.hold_action.to_text(), "button(KEY_X)");
        assert_eq!(parts.dblclick_action.to_text(), "button(KEY_Z)");
        assert_eq!(parts.default_action.to_text(), "button(KEY_D)");
        assert_eq!(parts.timeout_ticks, 300);
    }
}
