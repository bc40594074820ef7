//! `gyro()` / `gyroabs()`: turns IMU pitch/yaw into mouse motion. `gyro`
//! moves the mouse by the per-tick delta; `gyroabs` drives an absolute
//! orientation pair of axes instead of the mouse.
//!
//! Grounded in distilled spec §4.4 and `src/actions/modifiers.c`'s gyro
//! passthrough.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::constants::Axis;
use crate::error::ActionError;
use crate::mapper::{GyroInput, Mapper};
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

pub struct GyroAction {
    absolute: bool,
    sens_x: Cell<f64>,
    sens_y: Cell<f64>,
}

impl Action for GyroAction {
    fn kind(&self) -> &'static str {
        if self.absolute {
            "gyroabs"
        } else {
            "gyro"
        }
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::AXIS)
    }

    fn gyro(&self, m: &mut dyn Mapper, value: &GyroInput) {
        if self.absolute {
            m.set_axis(Axis::AbsRx, value.gyaw * self.sens_x.get());
            m.set_axis(Axis::AbsRy, value.gpitch * self.sens_y.get());
        } else {
            m.move_mouse(value.gyaw * self.sens_x.get(), value.gpitch * self.sens_y.get());
        }
    }

    fn set_sensitivity(&self, x: f64, y: f64, _z: f64) {
        self.sens_x.set(x);
        self.sens_y.set(y);
    }

    fn to_text(&self) -> String {
        format!("{}()", self.kind())
    }
}

fn construct(keyword: &str, params: Vec<Parameter>, absolute: bool) -> Result<ActionRef, ActionError> {
    ParamChecker::compile("").check(keyword, &params)?;
    Ok(std::rc::Rc::new(GyroAction {
        absolute,
        sens_x: Cell::new(1.0),
        sens_y: Cell::new(1.0),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("gyro", |k, p| construct(k, p, false));
    reg.register("gyroabs", |k, p| construct(k, p, true));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    #[test]
    fn gyro_moves_mouse_from_pitch_yaw() {
        let a = construct("gyro", vec![], false).unwrap();
        let mut m = TestMapper::new();
        let g = GyroInput {
            gpitch: 1.0,
            gyaw: 2.0,
            ..Default::default()
        };
        a.gyro(&mut m, &g);
        assert_eq!(m.mouse_delta, (2.0, 1.0));
    }
}
