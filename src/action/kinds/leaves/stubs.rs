//! Keywords parsed and round-tripped but whose runtime effect belongs to an
//! external layer this crate does not implement: `circular`, `circularabs`,
//! `resetgyro`, `clearosd`, `osd`, `gestures`, `position`, `restart`,
//! `shell`, `area`, `relarea`, `winarea`, `relwinarea`, `quickmenu`.
//!
//! Each still compiles against its real param-checker schema and
//! round-trips through `to_text`; every dispatch slot falls through to the
//! `Action` trait's rate-limited-warning default.
//!
//! Grounded in distilled spec §4.4 "stubs".

use crate::action::registry::Register;
use crate::action::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::param_checker::ParamChecker;
use crate::parameter::{params_to_text, Parameter};

pub struct StubAction {
    keyword: &'static str,
    params: Vec<Parameter>,
}

impl Action for StubAction {
    fn kind(&self) -> &'static str {
        self.keyword
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::default()
    }

    fn to_text(&self) -> String {
        if self.params.is_empty() {
            format!("{}()", self.keyword)
        } else {
            format!("{}({})", self.keyword, params_to_text(&self.params))
        }
    }
}

struct StubSpec {
    keyword: &'static str,
    schema: &'static str,
}

const STUBS: &[StubSpec] = &[
    StubSpec { keyword: "circular", schema: "x?f?" },
    StubSpec { keyword: "circularabs", schema: "x?f?" },
    StubSpec { keyword: "resetgyro", schema: "" },
    StubSpec { keyword: "clearosd", schema: "" },
    StubSpec { keyword: "osd", schema: "s?" },
    StubSpec { keyword: "gestures", schema: "a*" },
    StubSpec { keyword: "position", schema: "i?i?" },
    StubSpec { keyword: "restart", schema: "" },
    StubSpec { keyword: "shell", schema: "s" },
    StubSpec { keyword: "area", schema: "i?i?i?i?" },
    StubSpec { keyword: "relarea", schema: "i?i?i?i?" },
    StubSpec { keyword: "winarea", schema: "s?i?i?i?i?" },
    StubSpec { keyword: "relwinarea", schema: "s?i?i?i?i?" },
    StubSpec { keyword: "quickmenu", schema: "s?" },
];

/// Single constructor shared by every stub keyword: looks its own schema up
/// in `STUBS` by the keyword the registry hands back, so no per-keyword
/// capturing closure (and thus no non-`fn`-pointer constructor) is needed.
fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    let stub = STUBS
        .iter()
        .find(|s| s.keyword == keyword)
        .unwrap_or_else(|| panic!("construct called for unregistered stub keyword '{keyword}'"));
    ParamChecker::compile(stub.schema).check(keyword, &params)?;
    Ok(std::rc::Rc::new(StubAction {
        keyword: stub.keyword,
        params,
    }))
}

pub fn register(reg: &mut dyn Register) {
    for stub in STUBS {
        reg.register(stub.keyword, construct);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_round_trips_its_single_string_argument() {
        let a = construct("shell", vec![Parameter::string("notify-send hi")]).unwrap();
        assert_eq!(a.to_text(), "shell('notify-send hi')");
    }

    #[test]
    fn restart_takes_no_arguments() {
        let a = construct("restart", vec![]).unwrap();
        assert_eq!(a.to_text(), "restart()");
    }
}
