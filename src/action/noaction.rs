//! `NoAction`: the singleton action of type `"None"` that discards every
//! event. Grounded in `include/scc/action.h`'s `NoAction` singleton and
//! distilled spec §3/§8 ("`parse(\"None\")` returns the NoAction singleton").

use std::rc::Rc;
use std::sync::OnceLock;

use super::registry::Register;
use super::{Action, ActionFlags, ActionRef};
use crate::error::ActionError;
use crate::parameter::Parameter;

pub struct NoAction;

impl Action for NoAction {
    fn kind(&self) -> &'static str {
        "None"
    }

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::default()
    }

    fn to_text(&self) -> String {
        "None".to_string()
    }
}

static SINGLETON: OnceLock<ActionRef> = OnceLock::new();

/// Returns a cheap clone of the process-wide `NoAction` singleton.
pub fn no_action() -> ActionRef {
    Rc::clone(SINGLETON.get_or_init(|| Rc::new(NoAction) as ActionRef))
}

fn construct(_keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    if !params.is_empty() {
        return Err(ActionError::InvalidArity {
            keyword: "None".to_string(),
        });
    }
    Ok(no_action())
}

pub fn register(reg: &mut dyn Register) {
    reg.register("None", construct);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_clones_share_identity() {
        let a = no_action();
        let b = no_action();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn has_zero_flags() {
        assert_eq!(NoAction.action_flags().0, 0);
    }
}
