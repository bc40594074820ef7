//! `feedback(amplitude, frequency?, period?, child)`: pure configuration
//! wrapper, exactly like `sens` but for haptics. Compression pushes the
//! haptic parameters into the child via `set_haptic` and discards the
//! wrapper (distilled spec §4.6/§8: a compressed tree never contains a
//! `"feedback"` node).
//!
//! Grounded in distilled spec §4.4/§4.6 and `src/actions/modifiers.c`'s
//! `FeedbackModifier`.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct FeedbackAction {
    amplitude: f64,
    frequency: f64,
    period: f64,
    child: ActionRef,
}

impl Action for FeedbackAction {
    fn kind(&self) -> &'static str {
        "feedback"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MOD_FEEDBACK)
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!(
            "feedback({}, {}, {}, {})",
            self.amplitude,
            self.frequency,
            self.period,
            self.child.to_text()
        )
    }

    fn compress(&self, _self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        child.set_haptic(self.amplitude, self.frequency, self.period);
        child
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("ff?f?a").with_defaults(vec![Parameter::float(8.0), Parameter::float(0.1)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(FeedbackAction {
        amplitude: filled[0].as_float(),
        frequency: filled[1].as_float(),
        period: filled[2].as_float(),
        child: filled[3].as_action(),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("feedback", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::leaves::button::construct as construct_button;

    #[test]
    fn compress_discards_wrapper() {
        let child = construct_button("button", vec![Parameter::const_int("KEY_X", 45)]).unwrap();
        let a = construct("feedback", vec![Parameter::float(16.0), Parameter::action(child)]).unwrap();
        let compressed = crate::action::compress_tree(a);
        assert_eq!(compressed.kind(), "button");
    }
}
