//! Cell and variable name rules.
//!
//! Every name in the engine (cell names and formula variables) must match
//! `[A-Za-z_][A-Za-z0-9_]*`. On top of that lexical grammar a sheet may
//! install a [`NameRules`] strategy: a normalizer that canonicalizes names
//! (e.g. upper-casing) and a validator that narrows the accepted set
//! (e.g. "one letter followed by digits").
//!
//! # Examples
//!
//! ```
//! use cellflow_engine::engine::{NameRules, is_valid_name};
//!
//! let rules = NameRules::new(|s| s.to_uppercase(), |s| s.len() == 2);
//! assert_eq!(rules.normalize("a1"), "A1");
//! assert!(rules.accepts("a1"));
//! assert!(!rules.accepts("a10"));
//! assert!(is_valid_name("_x9"));
//! ```

use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

type NormalizeFn = dyn Fn(&str) -> String + Send + Sync;
type ValidateFn = dyn Fn(&str) -> bool + Send + Sync;

fn name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("cell name regex must compile")
    })
}

/// Check a name against the fixed lexical grammar only.
pub fn is_valid_name(name: &str) -> bool {
    name_re().is_match(name)
}

/// Normalizer + validator pair applied to every name the engine sees.
///
/// Cloning is cheap; the closures are shared.
#[derive(Clone)]
pub struct NameRules {
    normalize: Arc<NormalizeFn>,
    validate: Arc<ValidateFn>,
}

impl NameRules {
    pub fn new<N, V>(normalize: N, validate: V) -> NameRules
    where
        N: Fn(&str) -> String + Send + Sync + 'static,
        V: Fn(&str) -> bool + Send + Sync + 'static,
    {
        NameRules {
            normalize: Arc::new(normalize),
            validate: Arc::new(validate),
        }
    }

    /// Replace the normalizer, keeping the validator.
    pub fn with_normalizer<N>(mut self, normalize: N) -> NameRules
    where
        N: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.normalize = Arc::new(normalize);
        self
    }

    /// Replace the validator, keeping the normalizer.
    pub fn with_validator<V>(mut self, validate: V) -> NameRules
    where
        V: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validate = Arc::new(validate);
        self
    }

    pub fn normalize(&self, name: &str) -> String {
        (self.normalize)(name)
    }

    /// Run only the caller-supplied validator on an already normalized name.
    pub fn validate(&self, normalized: &str) -> bool {
        (self.validate)(normalized)
    }

    /// Normalize `name`, then require both the lexical grammar and the validator.
    pub fn accepts(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Normalize and check `name`, returning the canonical form when accepted.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let normalized = self.normalize(name);
        if is_valid_name(&normalized) && self.validate(&normalized) {
            Some(normalized)
        } else {
            None
        }
    }
}

impl Default for NameRules {
    /// Identity normalizer, accept-all validator.
    fn default() -> Self {
        NameRules::new(|s| s.to_string(), |_| true)
    }
}

impl fmt::Debug for NameRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameRules").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name_grammar() {
        assert!(is_valid_name("A1"));
        assert!(is_valid_name("a"));
        assert!(is_valid_name("_"));
        assert!(is_valid_name("A32_C3_F"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1A"));
        assert!(!is_valid_name("A 1"));
        assert!(!is_valid_name("A-1"));
        assert!(!is_valid_name("A1."));
    }

    #[test]
    fn test_default_rules_are_identity() {
        let rules = NameRules::default();
        assert_eq!(rules.normalize("xY"), "xY");
        assert_eq!(rules.resolve("xY"), Some("xY".to_string()));
        assert_eq!(rules.resolve("9x"), None);
    }

    #[test]
    fn test_resolve_applies_normalizer_before_checks() {
        let rules = NameRules::default()
            .with_normalizer(|s| s.to_uppercase())
            .with_validator(|s| s.chars().all(|c| !c.is_ascii_lowercase()));
        assert_eq!(rules.resolve("b7"), Some("B7".to_string()));
    }

    #[test]
    fn test_normalizer_producing_illegal_name_is_rejected() {
        let rules = NameRules::default().with_normalizer(|s| format!("{}!", s));
        assert_eq!(rules.resolve("A1"), None);
    }
}
