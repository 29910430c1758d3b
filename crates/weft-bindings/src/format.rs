#![forbid(unsafe_code)]

//! Formatter chains: the pre-render pipeline for incoming model values.
//!
//! A [`FormatterChain`] is an immutable, ordered list of pure
//! `String -> String` links applied to a raw model value before it is
//! written into a widget. The chain's fixed entry step coerces an absent
//! value (`None`) to the empty string, so a widget never observes the
//! absence directly. Later links receive the output of earlier ones.
//!
//! Chains are assembled with the builder before a binding session starts
//! and never mutated afterwards; cloning shares the link list.

use std::rc::Rc;

/// One pure formatting link.
pub type FormatterFn = Rc<dyn Fn(String) -> String>;

/// Immutable ordered pipeline applied to model values before they enter a
/// widget.
#[derive(Clone)]
pub struct FormatterChain {
    links: Rc<[FormatterFn]>,
}

impl FormatterChain {
    /// The empty chain: only the fixed `None -> ""` coercion runs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            links: Rc::from(Vec::new()),
        }
    }

    /// Build a chain from an explicit link list, applied in order.
    #[must_use]
    pub fn from_links(links: Vec<FormatterFn>) -> Self {
        Self {
            links: Rc::from(links),
        }
    }

    /// Return a new chain with `link` appended after the existing links.
    ///
    /// This builds a fresh chain; existing clones are unaffected.
    #[must_use]
    pub fn with_link(self, link: impl Fn(String) -> String + 'static) -> Self {
        let mut links: Vec<FormatterFn> = self.links.to_vec();
        links.push(Rc::new(link));
        Self {
            links: Rc::from(links),
        }
    }

    /// Apply the chain to a raw model value.
    ///
    /// `None` coerces to `""` before the first link runs; each link
    /// receives the output of the previous one.
    #[must_use]
    pub fn apply(&self, raw: Option<&str>) -> String {
        let mut value = raw.unwrap_or_default().to_owned();
        for link in self.links.iter() {
            value = link(value);
        }
        value
    }

    /// Number of user links (the entry coercion is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the chain has no user links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for FormatterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterChain")
            .field("links", &self.links.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_coerces_to_empty() {
        let chain = FormatterChain::new();
        assert_eq!(chain.apply(None), "");
    }

    #[test]
    fn identity_on_present_values() {
        let chain = FormatterChain::new();
        assert_eq!(chain.apply(Some("let x = 1;")), "let x = 1;");
    }

    #[test]
    fn links_run_in_order() {
        let chain = FormatterChain::new()
            .with_link(|v| format!("[{v}"))
            .with_link(|v| format!("{v}]"));
        assert_eq!(chain.apply(Some("mid")), "[mid]");
    }

    #[test]
    fn coercion_runs_before_user_links() {
        let chain = FormatterChain::new().with_link(|v| format!("<{v}>"));
        assert_eq!(chain.apply(None), "<>", "links must see \"\" for None");
    }

    #[test]
    fn with_link_leaves_clones_untouched() {
        let base = FormatterChain::new().with_link(|v| v.to_uppercase());
        let kept = base.clone();
        let extended = base.with_link(|v| format!("{v}!"));

        assert_eq!(kept.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(kept.apply(Some("ok")), "OK");
        assert_eq!(extended.apply(Some("ok")), "OK!");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn chain_equals_manual_composition(input in "\\PC{0,32}") {
                let chain = FormatterChain::new()
                    .with_link(|v| v.trim().to_owned())
                    .with_link(|v| format!("{v};"));
                let manual = format!("{};", input.trim());
                prop_assert_eq!(chain.apply(Some(&input)), manual);
            }

            #[test]
            fn empty_chain_is_identity(input in "\\PC{0,32}") {
                let chain = FormatterChain::new();
                prop_assert_eq!(chain.apply(Some(&input)), input);
            }
        }
    }
}
