//! `mode(cond1, action1, cond2, action2, ..., default?)`: redirects dispatch
//! to whichever child's condition currently holds, first match wins, falling
//! back to `default` (or a no-op) when none do.
//!
//! A condition is either a button name (`"A"`, redirect active while that
//! button is held) or a range parameter (`"LEFT" >= 0.5`, redirect active
//! while the named pad/stick/trigger's last reported axis value satisfies
//! the comparison). The retrieved original leaves the range condition
//! (`MCT_RANGE`) as an unimplemented no-op; this engine implements it for
//! real, tracking each range condition's subject via its own `axis`/
//! `trigger` dispatch so `mode` can evaluate it without extra wiring from
//! the caller.
//!
//! Grounded in distilled spec §4.4 Scenario 5 ("mode-by-button first-match-
//! wins") and `src/actions/modifiers.c`'s `ModeModifier`.

use std::cell::{Cell, RefCell};

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::{Pst, SCButton};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::{Parameter, RangeCmp};

enum Condition {
    Button(SCButton),
    /// `lhs` is the parsed subject (often a non-numeric PST/button name
    /// such as `"LEFT"`) kept verbatim so `to_text` can re-render the
    /// original `lhs cmp rhs` comparison rather than just the threshold.
    Range { lhs: Parameter, cmp: RangeCmp, threshold: f64, last_value: Cell<f64> },
}

impl Condition {
    fn holds(&self, m: &dyn Mapper) -> bool {
        match self {
            Condition::Button(b) => m.is_pressed(*b),
            Condition::Range { cmp, threshold, last_value, .. } => cmp.apply(last_value.get(), *threshold),
        }
    }
}

struct Branch {
    condition: Condition,
    action: ActionRef,
}

pub struct ModeAction {
    branches: Vec<Branch>,
    default: ActionRef,
    /// Every branch index (plus `NONE_BRANCH` for the default slot) that
    /// received a press since the last full release, so `button_release`
    /// can release all of them rather than only the most recently selected
    /// one -- a mode switch mid-press must not leave a stuck key behind.
    active: RefCell<Vec<usize>>,
}

const NONE_BRANCH: usize = usize::MAX;

impl Action for ModeAction {
    fn kind(&self) -> &'static str {
        "mode"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        let target = self.select(m);
        self.active.borrow_mut().push(target);
        self.branch_action(target).button_press(m);
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        for target in self.active.borrow_mut().drain(..) {
            self.branch_action(target).button_release(m);
        }
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, what: Pst) {
        for branch in &self.branches {
            if let Condition::Range { last_value, .. } = &branch.condition {
                last_value.set(value as f64);
            }
        }
        let target = self.select(m);
        self.branch_action(target).axis(m, value, what);
    }

    fn to_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for branch in &self.branches {
            let cond = match &branch.condition {
                Condition::Button(b) => b.to_string(),
                Condition::Range { lhs, cmp, threshold, .. } => {
                    Parameter::Range(Box::new(lhs.clone()), *cmp, *threshold).to_text()
                }
            };
            parts.push(cond);
            parts.push(branch.action.to_text());
        }
        parts.push(self.default.to_text());
        format!("mode({})", parts.join(", "))
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        // Condition subjects carry per-instance runtime state (`last_value`),
        // so the branches themselves aren't rebuilt here; only each child
        // action is compressed in place.
        for branch in &self.branches {
            let _ = crate::action::compress_tree(ActionRef::clone(&branch.action));
        }
        std::rc::Rc::clone(self_rc)
    }
}

impl ModeAction {
    fn select(&self, m: &dyn Mapper) -> usize {
        self.branches
            .iter()
            .position(|b| b.condition.holds(m))
            .unwrap_or(NONE_BRANCH)
    }

    fn branch_action(&self, index: usize) -> &ActionRef {
        if index == NONE_BRANCH {
            &self.default
        } else {
            &self.branches[index].action
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile(".*")
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let mut branches = Vec::new();
    let mut default = crate::action::noaction::no_action();
    let mut i = 0;
    while i < params.len() {
        let remaining = params.len() - i;
        if remaining == 1 {
            default = params[i].as_action();
            i += 1;
            continue;
        }
        let condition = match &params[i] {
            Parameter::Str(s) => crate::constants::string_to_button(s)
                .map(Condition::Button)
                .ok_or_else(|| ActionError::InvalidValue {
                    keyword: keyword.to_string(),
                    index: i,
                    detail: format!("unknown button '{s}'"),
                })?,
            Parameter::ConstStr(s) => crate::constants::string_to_button(s)
                .map(Condition::Button)
                .ok_or_else(|| ActionError::InvalidValue {
                    keyword: keyword.to_string(),
                    index: i,
                    detail: format!("unknown button '{s}'"),
                })?,
            Parameter::Range(lhs, cmp, rhs) => Condition::Range {
                lhs: lhs.as_ref().clone(),
                cmp: *cmp,
                threshold: *rhs,
                // `lhs` typically names the watched PST ("LEFT" >= 0.5) and
                // carries no usable number of its own; the real value only
                // starts flowing once `axis`/`trigger` dispatch updates
                // `last_value`, so a non-numeric lhs just seeds at 0.
                last_value: Cell::new(match lhs.as_ref() {
                    Parameter::Float(f) => *f,
                    Parameter::Int(i) => *i as f64,
                    Parameter::ConstInt(_, i) => *i as f64,
                    _ => 0.0,
                }),
            },
            other => {
                return Err(ActionError::InvalidType {
                    keyword: keyword.to_string(),
                    index: i,
                    detail: format!("{other:?} is not a valid mode condition"),
                })
            }
        };
        let action = params[i + 1].as_action();
        branches.push(Branch { condition, action });
        i += 2;
    }
    Ok(std::rc::Rc::new(ModeAction {
        branches,
        default,
        active: RefCell::new(Vec::new()),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("mode", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child(code: &'static str, v: i64) -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int(code, v)]).unwrap()
    }

    #[test]
    fn first_matching_button_condition_wins() {
        let a = construct(
            "mode",
            vec![
                Parameter::const_string("A"),
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::const_string("B"),
                Parameter::action(button_child("KEY_W", 17)),
                Parameter::action(button_child("KEY_X", 45)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        m.set_pressed(SCButton::A, true);
        m.set_pressed(SCButton::B, true);
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![16]);
    }

    #[test]
    fn no_condition_holding_falls_back_to_default() {
        let a = construct(
            "mode",
            vec![
                Parameter::const_string("A"),
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(button_child("KEY_X", 45)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![45]);
    }

    #[test]
    fn range_condition_round_trips_through_to_text() {
        let a = construct(
            "mode",
            vec![
                Parameter::range(Parameter::const_string("LEFT"), RangeCmp::Ge, 0.5),
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(button_child("KEY_X", 45)),
            ],
        )
        .unwrap();
        assert_eq!(a.to_text(), "mode(LEFT >= 0.5, button(KEY_Q), button(KEY_X))");
    }

    #[test]
    fn button_release_releases_every_branch_pressed_since_last_release() {
        let a = construct(
            "mode",
            vec![
                Parameter::const_string("A"),
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::const_string("B"),
                Parameter::action(button_child("KEY_W", 17)),
                Parameter::action(button_child("KEY_X", 45)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        m.set_pressed(SCButton::A, true);
        a.button_press(&mut m);
        assert_eq!(m.key_count(crate::constants::KeyCode::Q), 1);

        // mode switches to B mid-press without an intervening release.
        m.set_pressed(SCButton::A, false);
        m.set_pressed(SCButton::B, true);
        a.button_press(&mut m);
        assert_eq!(m.key_count(crate::constants::KeyCode::W), 1);

        a.button_release(&mut m);
        assert_eq!(m.key_count(crate::constants::KeyCode::Q), 0, "stale Q branch must be released too");
        assert_eq!(m.key_count(crate::constants::KeyCode::W), 0);
    }
}
