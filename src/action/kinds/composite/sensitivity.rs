//! `sens(x, y?, z?, child)`: pure configuration wrapper. Compression pushes
//! the sensitivity values into the child via `set_sensitivity` and discards
//! the wrapper itself — a compressed tree never contains a `"sens"` node
//! (distilled spec §4.6/§8 structural invariant).
//!
//! Grounded in distilled spec §4.4/§4.6 and `src/actions/modifiers.c`'s
//! `SensitivityModifier`.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct SensitivityAction {
    x: f64,
    y: f64,
    z: f64,
    child: ActionRef,
}

impl Action for SensitivityAction {
    fn kind(&self) -> &'static str {
        "sens"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::MOD_SENSITIVITY)
    }

    fn get_child(&self) -> Option<ActionRef> {
        Some(ActionRef::clone(&self.child))
    }

    fn to_text(&self) -> String {
        format!("sens({}, {}, {}, {})", self.x, self.y, self.z, self.child.to_text())
    }

    fn compress(&self, _self_rc: &ActionRef) -> ActionRef {
        let child = crate::action::compress_tree(ActionRef::clone(&self.child));
        child.set_sensitivity(self.x, self.y, self.z);
        child
    }
}

fn schema() -> ParamChecker {
    ParamChecker::compile("ff?f?a").with_defaults(vec![Parameter::float(1.0), Parameter::float(1.0)])
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    schema().check(keyword, &params)?;
    let filled = schema().fill_defaults(&params);
    Ok(std::rc::Rc::new(SensitivityAction {
        x: filled[0].as_float(),
        y: filled[1].as_float(),
        z: filled[2].as_float(),
        child: filled[3].as_action(),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("sens", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::leaves::mouse::construct_mouse;
    use crate::mapper::TestMapper;

    #[test]
    fn compress_bakes_sensitivity_into_child_and_discards_wrapper() {
        let child = construct_mouse("mouse", vec![]).unwrap();
        let a = construct("sens", vec![Parameter::float(2.0), Parameter::action(child)]).unwrap();
        let compressed = crate::action::compress_tree(a);
        assert_eq!(compressed.kind(), "mouse");
        let mut m = TestMapper::new();
        compressed.whole(&mut m, 10, 0, crate::constants::Pst::Left);
        assert_eq!(m.mouse_delta.0, 20.0);
    }
}
