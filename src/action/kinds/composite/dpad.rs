//! `dpad(up, down, left, right)` / `dpad8(up, down, left, right, ul, ur, dl,
//! dr)`: splits whole-pad x/y position into 4 or 8 sectors, pressing the
//! sector's action when the pad enters it and releasing it when the pad
//! leaves, exactly as a real D-pad's per-direction switches would.
//!
//! Grounded in distilled spec §4.4/§4.8 Scenario 3 ("dpad sector table") and
//! `src/actions/modifiers.c`'s `DPadModifier`.

use std::cell::Cell;

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionList, ActionRef};
use crate::constants::Pst;
use crate::error::ActionError;
use crate::mapper::Mapper;
use crate::param_checker::ParamChecker;
use crate::parameter::Parameter;

/// Dead center counts as "no sector"; the pad must move out this far before
/// any direction engages.
const DEADZONE: f64 = 0.25;

pub struct DpadAction {
    eight_way: bool,
    children: ActionList,
    active: Cell<Option<usize>>,
}

impl DpadAction {
    /// Sector index for `(x, y)` normalized to `[-1.0, 1.0]`, or `None` when
    /// inside the dead center. Ordering matches the constructor's argument
    /// order: up, down, left, right[, up-left, up-right, down-left,
    /// down-right].
    fn sector(&self, x: f64, y: f64) -> Option<usize> {
        if x.hypot(y) < DEADZONE {
            return None;
        }
        if self.eight_way {
            let angle = y.atan2(x);
            let octant = (((angle + std::f64::consts::PI) / (std::f64::consts::PI / 4.0)).floor() as i64).rem_euclid(8);
            // Octants are measured counter-clockwise from due-west; remap
            // into this constructor's up/down/left/right/diag ordering.
            Some(match octant {
                0 => 2, // left
                1 => 6, // down-left
                2 => 1, // down
                3 => 7, // down-right
                4 => 3, // right
                5 => 5, // up-right
                6 => 0, // up
                7 => 4, // up-left
                _ => unreachable!(),
            })
        } else if x.abs() > y.abs() {
            Some(if x > 0.0 { 3 } else { 2 })
        } else {
            Some(if y > 0.0 { 1 } else { 0 })
        }
    }
}

impl Action for DpadAction {
    fn kind(&self) -> &'static str {
        if self.eight_way {
            "dpad8"
        } else {
            "dpad"
        }
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::new(ActionFlags::ACTION)
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, _what: Pst) {
        let nx = x as f64 / crate::constants::STICK_PAD_MAX;
        let ny = y as f64 / crate::constants::STICK_PAD_MAX;
        let new_sector = self.sector(nx, ny);
        let old_sector = self.active.get();
        if old_sector == new_sector {
            return;
        }
        if let Some(i) = old_sector {
            self.children[i].button_release(m);
        }
        if let Some(i) = new_sector {
            self.children[i].button_press(m);
        }
        self.active.set(new_sector);
    }

    fn get_children(&self) -> ActionList {
        self.children.clone()
    }

    fn to_text(&self) -> String {
        format!(
            "{}({})",
            self.kind(),
            self.children.iter().map(|c| c.to_text()).collect::<Vec<_>>().join(", ")
        )
    }

    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        let compressed: ActionList = self
            .children
            .iter()
            .map(|c| crate::action::compress_tree(ActionRef::clone(c)))
            .collect();
        let changed = compressed.iter().zip(self.children.iter()).any(|(a, b)| !std::rc::Rc::ptr_eq(a, b));
        if changed {
            std::rc::Rc::new(DpadAction {
                eight_way: self.eight_way,
                children: compressed,
                active: Cell::new(None),
            })
        } else {
            std::rc::Rc::clone(self_rc)
        }
    }
}

fn schema(eight_way: bool) -> ParamChecker {
    if eight_way {
        ParamChecker::compile("aaaaaaaa")
    } else {
        ParamChecker::compile("aaaa")
    }
}

fn build(keyword: &str, params: Vec<Parameter>, eight_way: bool) -> Result<ActionRef, ActionError> {
    schema(eight_way).check(keyword, &params)?;
    let children = params.into_iter().map(|p| p.as_action()).collect();
    Ok(std::rc::Rc::new(DpadAction {
        eight_way,
        children,
        active: Cell::new(None),
    }))
}

pub fn register(reg: &mut dyn Register) {
    reg.register("dpad", |k, p| build(k, p, false));
    reg.register("dpad8", |k, p| build(k, p, true));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TestMapper;

    fn button_child(code: &'static str, v: i64) -> ActionRef {
        crate::action::kinds::leaves::button::construct("button", vec![Parameter::const_int(code, v)]).unwrap()
    }

    #[test]
    fn moving_up_then_right_presses_and_releases_correct_sectors() {
        let a = build(
            "dpad",
            vec![
                Parameter::action(button_child("KEY_Q", 16)), // up
                Parameter::action(button_child("KEY_W", 17)), // down
                Parameter::action(button_child("KEY_E", 18)), // left
                Parameter::action(button_child("KEY_X", 45)), // right
            ],
            false,
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 0, 30000, Pst::Left);
        assert_eq!(m.key_log, vec![16]);
        a.whole(&mut m, 30000, 0, Pst::Left);
        assert_eq!(m.key_log, vec![16, 45]);
        assert_eq!(m.key_count(crate::constants::KeyCode::Q), 0);
    }

    #[test]
    fn returning_to_center_releases_active_sector() {
        let a = build(
            "dpad",
            vec![
                Parameter::action(button_child("KEY_Q", 16)),
                Parameter::action(button_child("KEY_W", 17)),
                Parameter::action(button_child("KEY_E", 18)),
                Parameter::action(button_child("KEY_X", 45)),
            ],
            false,
        )
        .unwrap();
        let mut m = TestMapper::new();
        a.whole(&mut m, 0, 30000, Pst::Left);
        a.whole(&mut m, 0, 0, Pst::Left);
        assert_eq!(m.key_count(crate::constants::KeyCode::Q), 0);
    }
}
