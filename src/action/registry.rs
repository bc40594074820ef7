//! Process-wide keyword -> constructor registry.
//!
//! Grounded in `src/actions/actions.c`'s `scc_action_register` /
//! `scc_action_init`. Duplicate registration is fatal there (`FATAL` macro);
//! the same is true here via `panic!`, since it can only happen from a
//! programming error in this crate's own kind modules, never from
//! untrusted input.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::kinds;
use super::ActionRef;
use crate::error::ActionError;
use crate::parameter::Parameter;

/// A keyword constructor: validates/builds an action from its already
/// tokenized parameter list. Parameters are consumed (owned) by convention,
/// matching the distilled spec §3 invariant "Parameter lists handed to a
/// constructor are consumed."
pub type Constructor = fn(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError>;

struct Registry {
    constructors: HashMap<&'static str, Constructor>,
}

impl Registry {
    fn register(&mut self, keyword: &'static str, ctor: Constructor) {
        if self.constructors.insert(keyword, ctor).is_some() {
            panic!("duplicate action registration for keyword '{keyword}'");
        }
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut reg = Registry {
            constructors: HashMap::new(),
        };
        kinds::register_all(&mut reg as &mut dyn Register);
        reg
    })
}

/// Callback each kind module uses to register its keyword(s) during
/// `register_all`. A thin trait rather than a bare closure so kind modules
/// don't need to know about `Registry`'s internals.
pub trait Register {
    fn register(&mut self, keyword: &'static str, ctor: Constructor);
}

impl Register for Registry {
    fn register(&mut self, keyword: &'static str, ctor: Constructor) {
        Registry::register(self, keyword, ctor)
    }
}

/// Looks up and invokes the constructor for `keyword`, or returns
/// `ActionError::UnknownKeyword`. This is the parser's only entry point
/// into action construction.
pub fn construct(keyword: &str, params: Vec<Parameter>) -> Result<ActionRef, ActionError> {
    match registry().constructors.get(keyword) {
        Some(ctor) => ctor(keyword, params),
        None => Err(ActionError::UnknownKeyword(keyword.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keyword_is_reported() {
        let err = construct("not_a_real_keyword", Vec::new()).unwrap_err();
        match err {
            ActionError::UnknownKeyword(k) => assert_eq!(k, "not_a_real_keyword"),
            other => panic!("expected UnknownKeyword, got {other:?}"),
        }
    }

    #[test]
    fn none_keyword_constructs_noaction_singleton() {
        let a = construct("None", Vec::new()).expect("None always constructs");
        assert_eq!(a.kind(), "None");
    }
}
