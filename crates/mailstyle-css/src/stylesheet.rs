//! The extracted style sheet.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::ser::{Serialize, SerializeSeq, SerializeStruct, Serializer};

use crate::declaration::DeclarationBlock;
use crate::selector::Selector;

/// A declaration block referenced by every selector of the rule it came from.
pub type SharedDeclarations = Rc<RefCell<DeclarationBlock>>;

/// Selectors paired with their declarations, in source order.
///
/// Selectors of one rule (`a, b { ... }`) share a single
/// [`DeclarationBlock`]; a change made through one is seen through all.
#[derive(Debug, Default)]
pub struct StyleSheet {
    rules: Vec<(Selector, SharedDeclarations)>,
    /// Position of each selector in `rules`.
    index: HashMap<Selector, usize>,
}

impl StyleSheet {
    /// An empty style sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `declarations` for `selector`.
    ///
    /// If the selector is already present, the declarations are merged into
    /// the block it already points at. That block may be shared with other
    /// selectors of an earlier rule, which then see the merged declarations
    /// too: after `a, b { color: red } a { color: blue }` both are blue.
    pub fn add_selector_rule(&mut self, selector: Selector, declarations: &SharedDeclarations) {
        if let Some(existing) = self.declarations_for(&selector) {
            if !Rc::ptr_eq(existing, declarations) {
                existing.borrow_mut().merge_block(&declarations.borrow());
            }
            return;
        }
        let _ = self.index.insert(selector.clone(), self.rules.len());
        self.rules.push((selector, Rc::clone(declarations)));
    }

    /// The declarations registered for `selector`.
    #[must_use]
    pub fn declarations_for(&self, selector: &Selector) -> Option<&SharedDeclarations> {
        self.index.get(selector).map(|&i| &self.rules[i].1)
    }

    /// Selector and declaration pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Selector, &SharedDeclarations)> {
        self.rules.iter().map(|(s, d)| (s, d))
    }

    /// Number of selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no selector was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

struct Entry<'a>(&'a Selector, &'a SharedDeclarations);

impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entry = serializer.serialize_struct("Entry", 2)?;
        entry.serialize_field("selector", self.0)?;
        entry.serialize_field("declarations", &*self.1.borrow())?;
        entry.end()
    }
}

impl Serialize for StyleSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rules.len()))?;
        for (selector, declarations) in &self.rules {
            seq.serialize_element(&Entry(selector, declarations))?;
        }
        seq.end()
    }
}
