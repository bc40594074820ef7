//! `sleep(seconds)`: a pure delay marker consumed by an enclosing `macro`/
//! `repeat` to pace its own step sequencing. Used standalone (outside a
//! macro) it has nothing to attach its delay to, so it just warns and drops
//! the event, matching every other unhandled dispatch slot.
//!
//! Grounded in distilled spec §4.4 and `src/actions/repeat_sleep.c`'s `SoR`
//! struct (shared there with `repeat`; split here into this leaf plus
//! `composite::repeat` since the two have unrelated Rust struct shapes).

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct SleepAction {
    ticks: u64,
    seconds: f64,
}

impl Action for SleepAction {
    fn kind(&self) -> &'static str {
        "sleep"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn get_property(&self, name: &str) -> Option<Parameter> {
        match name {
            "sleep_ticks" => Some(Parameter::int(self.ticks as i64)),
            _ => None,
        }
    }

    fn to_text(&self) -> String {
        format!("sleep({})", Parameter::float(self.seconds).to_text())
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("f")
}

pub(crate) fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let seconds = params[0].as_float();
    let ticks = (seconds * 1000.0).round() as u64;
    Ok(std::rc::Rc::new(SleepAction { ticks, seconds }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("sleep", construct);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_seconds_to_ticks_at_1ms_per_tick() {
        let a = construct("sleep", vec![Parameter::float(0.1)]).unwrap();
        assert_eq!(a.get_property("sleep_ticks").unwrap().as_int(), 100);
    }

    #[test]
    fn round_trips_through_to_text() {
        let a = construct("sleep", vec![Parameter::float(0.1)]).unwrap();
        assert_eq!(a.to_text(), "sleep(0.1)");
    }

    #[test]
    fn used_standalone_just_warns_and_drops() {
        let a = construct("sleep", vec![Parameter::float(0.1)]).unwrap();
        let mut m = crate::mapper::TestMapper::new();
        a.button_press(&mut m);
        assert!(m.key_log.is_empty());
    }
}
