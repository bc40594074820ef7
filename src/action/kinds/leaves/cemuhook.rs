//! `cemuhook()`: forwards raw IMU samples to the Mapper's CemuHook special
//! action payload, untouched by sensitivity (the consumer of that UDP-style
//! payload expects raw sensor units).
//!
//! Grounded in distilled spec §4.4/§6 and `src/platform`'s notion of a
//! passthrough special-action sink; the CemuHookUDP server itself is out of
//! scope (distilled spec Non-goals), only the Mapper hand-off is implemented.

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::mapper::{GyroInput, Mapper, SpecialActionPayload};
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct CemuHookAction;

impl Action for CemuHookAction {
    fn kind(&self) -> &'static str {
        "cemuhook"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::AXIS)
    }

    fn gyro(&self, m: &mut dyn Mapper, value: &GyroInput) {
        let payload = SpecialActionPayload::CemuHook([
            value.gpitch as f32,
            value.gyaw as f32,
            value.groll as f32,
            value.accel_x as f32,
            value.accel_y as f32,
            value.accel_z as f32,
        ]);
        if !m.special_action(payload) {
            crate::action::warn_unhandled(self.kind(), "gyro");
        }
    }

    fn to_text(&self) -> String {
        "cemuhook()".to_string()
    }
}

fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    ParamChecker::compile("").check(keyword, &params)?;
    Ok(std::rc::Rc::new(CemuHookAction))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("cemuhook", construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn gyro_sample_is_forwarded_as_cemuhook_payload() {
        let a = construct("cemuhook", vec![]).unwrap();
        let mut m = TestMapper::new();
        a.gyro(&mut m, &GyroInput::default());
        assert_eq!(m.special_action_log.len(), 1);
    }
}
