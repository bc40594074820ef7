//! `;`: runs a fixed sequence of actions, pacing each step's
//! release->press->release transitions through the scheduler rather than
//! firing the whole sequence synchronously, so a profile that embeds a
//! `sleep(t)` between two steps actually waits `t` before the next one.
//! Nested macros are flattened at construction so the compression pass
//! never has to recurse through one macro wrapping another.
//!
//! Grounded in distilled spec §4.4/§4.6/§9 ("macros never nest — flattened
//! at construction or compression") and `src/actions/repeat_sleep.c`'s
//! macro-pacing/`macro_set_repeat` contract (`macro.c` itself did not
//! survive distillation into `original_source/`, only `macros.h`).

use std::cell::Cell;
use std::rc::Rc;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionList, ActionRef};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;
use crate::scheduler::TaskId;

/// Ticks held between a step's press and its release, and between a step's
/// release and the next step's press (on top of any `sleep` contribution).
/// Not derived from the original's distinct 10ms/tick-engine formula; kept
/// at this crate's own 1ms/tick convention (see DESIGN.md).
const PAUSE_TICKS: u64 = 2;

/// One real (non-`sleep`) step, with however many ticks of `sleep` delay
/// were embedded in front of it in the source sequence.
struct ScheduledStep {
    pre_delay: u64,
    action: ActionRef,
}

struct MacroState {
    schedule: Vec<ScheduledStep>,
    repeat: Cell<bool>,
    task: Cell<Option<TaskId>>,
}

pub struct MacroAction {
    steps: ActionList,
    state: Rc<MacroState>,
}

impl MacroAction {
    fn flatten(steps: Vec<ActionRef>) -> ActionList {
        let mut out = Vec::with_capacity(steps.len());
        for step in steps {
            if step.kind() == "macro" {
                out.extend(step.get_children());
            } else {
                out.push(step);
            }
        }
        out
    }

    /// Collapses a sequence into its executable schedule: `sleep` entries
    /// contribute no step of their own, only delay in front of whichever
    /// real step follows them.
    fn build_schedule(steps: &ActionList) -> Vec<ScheduledStep> {
        let mut out = Vec::new();
        let mut pending_delay = 0u64;
        for step in steps {
            if step.kind() == "sleep" {
                pending_delay += sleep_ticks(step);
            } else {
                out.push(ScheduledStep { pre_delay: pending_delay, action: ActionRef::clone(step) });
                pending_delay = 0;
            }
        }
        out
    }

    fn build(steps: ActionList) -> ActionRef {
        let schedule = MacroAction::build_schedule(&steps);
        Rc::new(MacroAction {
            steps,
            state: Rc::new(MacroState {
                schedule,
                repeat: Cell::new(false),
                task: Cell::new(None),
            }),
        })
    }
}

fn sleep_ticks(step: &ActionRef) -> u64 {
    step.get_property("sleep_ticks").map(|p| p.as_int() as u64).unwrap_or(0)
}

fn fire_press(state: &Rc<MacroState>, index: usize, m: &mut dyn Mapper) {
    let Some(step) = state.schedule.get(index) else { return };
    step.action.button_press(m);
    let next_state = Rc::clone(state);
    let id = m.schedule(
        PAUSE_TICKS,
        Box::new(move |mapper: &mut dyn Mapper| fire_release(&next_state, index, mapper)),
    );
    state.task.set(Some(id));
}

fn fire_release(state: &Rc<MacroState>, index: usize, m: &mut dyn Mapper) {
    let Some(step) = state.schedule.get(index) else { return };
    step.action.button_release(m);
    let next = index + 1;
    if next < state.schedule.len() {
        let gap = PAUSE_TICKS + state.schedule[next].pre_delay;
        let next_state = Rc::clone(state);
        let id = m.schedule(
            gap,
            Box::new(move |mapper: &mut dyn Mapper| fire_press(&next_state, next, mapper)),
        );
        state.task.set(Some(id));
    } else if state.repeat.get() {
        let next_state = Rc::clone(state);
        let id = m.schedule(
            PAUSE_TICKS,
            Box::new(move |mapper: &mut dyn Mapper| fire_press(&next_state, 0, mapper)),
        );
        state.task.set(Some(id));
    } else {
        state.task.set(None);
    }
}

impl Action for MacroAction {
    fn kind(&self) -> &'static str {
        "macro"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn button_press(&self, m: &mut dyn Mapper) {
        if self.state.schedule.is_empty() {
            return;
        }
        if let Some(id) = self.state.task.take() {
            m.cancel(id);
        }
        fire_press(&self.state, 0, m);
    }

    fn set_repeat(&self, value: bool) {
        self.state.repeat.set(value);
    }

    fn get_children(&self) -> ActionList {
        self.steps.clone()
    }

    fn to_text(&self) -> String {
        self.steps.iter().map(|s| s.to_text()).collect::<Vec<_>>().join("; ")
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let compressed: ActionList = self
            .steps
            .iter()
            .map(|s| crate::action::compress_tree(ActionRef::clone(s)))
            .filter(|s| s.kind() != "None")
            .collect();
        if compressed.is_empty() || compressed.iter().all(|s| s.kind() == "sleep") {
            return crate::action::noaction::no_action();
        }
        if compressed.len() == 1 && compressed[0].kind() != "sleep" {
            return compressed.into_iter().next().unwrap();
        }
        let changed = compressed.len() != self.steps.len()
            || compressed.iter().zip(self.steps.iter()).any(|(a, b)| !Rc::ptr_eq(a, b));
        if changed {
            MacroAction::build(compressed)
        } else {
            Rc::clone(self_rc)
        }
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("a*")
}

pub(crate) fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let steps = params.into_iter().map(|p| p.as_action()).collect();
    Ok(MacroAction::build(MacroAction::flatten(steps)))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("macro", construct);
    reg.register(";", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child(code: &'static str, v: i64) -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int(code, v)]).unwrap()
    }

    #[test]
    fn runs_steps_in_order() {
        let a = construct(
            "macro",
            vec![
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(button_child("KEY_W", 17)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(10);
        assert_eq!(m.key_log, vec![16, 17]);
    }

    #[test]
    fn nested_macro_is_flattened() {
        let inner = construct("macro", vec![Parameter::action(button_child("KEY_Q", 16))]).unwrap();
        let outer = construct(
            "macro",
            vec![Parameter::action(inner), Parameter::action(button_child("KEY_W", 17))],
        )
        .unwrap();
        assert_eq!(outer.get_children().len(), 2);
    }

    #[test]
    fn first_step_presses_immediately_and_paces_the_rest() {
        let a = construct(
            "macro",
            vec![
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(button_child("KEY_E", 18)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        assert_eq!(m.key_log, vec![16]);
        m.advance_ticks(PAUSE_TICKS);
        assert_eq!(m.key_count(crate::constants::KeyCode::Q), 0);
        assert_eq!(m.key_log, vec![16]);
        m.advance_ticks(PAUSE_TICKS);
        assert_eq!(m.key_log, vec![16, 18]);
        assert_eq!(m.key_count(crate::constants::KeyCode::E), 1);
        m.advance_ticks(PAUSE_TICKS);
        assert_eq!(m.key_count(crate::constants::KeyCode::E), 0);
    }

    #[test]
    fn sleep_step_delays_the_following_press() {
        let sleepy = crate::action::kinds::leaves::sleep::construct("sleep", vec![Parameter::float(0.05)]).unwrap();
        let a = construct(
            "macro",
            vec![
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(sleepy),
                Parameter::action(button_child("KEY_E", 18)),
            ],
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(PAUSE_TICKS + 1);
        assert_eq!(m.key_log, vec![16]);
        m.advance_ticks(60);
        assert_eq!(m.key_log, vec![16, 18]);
    }

    #[test]
    fn repeat_flag_loops_the_sequence() {
        let a = construct("macro", vec![Parameter::action(button_child("KEY_Q", 16))]).unwrap();
        a.set_repeat(true);
        let mut m = TestMapper::new();
        a.button_press(&mut m);
        m.advance_ticks(20);
        let presses_while_repeating = m.key_log.iter().filter(|&&k| k == 16).count();
        assert!(presses_while_repeating > 1, "expected more than one press while repeating, got {presses_while_repeating}");
        a.set_repeat(false);
        m.advance_ticks(PAUSE_TICKS * 2);
        let settled = m.key_log.iter().filter(|&&k| k == 16).count();
        m.advance_ticks(20);
        assert_eq!(m.key_log.iter().filter(|&&k| k == 16).count(), settled);
    }
}
