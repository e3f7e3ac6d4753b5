//! Memoized selectors over the editor state.
//!
//! A [`Selector`] splits a derivation into an input step, which picks the
//! slices it depends on out of the state, and a pure combine step. The last
//! inputs and result are cached; the combine step only runs again when an
//! input differs from the cached one. Shared slices compare by identity,
//! plain values by equality.

use crate::store::EditorState;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A selector input that can tell whether it changed.
pub trait SelectorInput: Clone {
    /// True if `other` is the same input as `self`.
    fn same_as(&self, other: &Self) -> bool;
}

impl<T: ?Sized> SelectorInput for Rc<T> {
    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

macro_rules! impl_selector_input_by_value {
    ($($ty:ty),*) => {
        $(
            impl SelectorInput for $ty {
                fn same_as(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_selector_input_by_value!(bool, usize, String, Option<String>);

macro_rules! impl_selector_input_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: SelectorInput),+> SelectorInput for ($($name,)+) {
            fn same_as(&self, other: &Self) -> bool {
                $(self.$idx.same_as(&other.$idx))&&+
            }
        }
    };
}

impl_selector_input_tuple!(A: 0, B: 1);
impl_selector_input_tuple!(A: 0, B: 1, C: 2);
impl_selector_input_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_selector_input_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_selector_input_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// A memoized derivation from editor state.
pub struct Selector<I, O> {
    name: &'static str,
    input: fn(&EditorState) -> I,
    combine: fn(&I) -> O,
    cache: RefCell<Option<(I, Rc<O>)>>,
    recomputations: Cell<usize>,
}

impl<I: SelectorInput, O> Selector<I, O> {
    /// Create a selector from an input step and a combine step.
    pub fn new(name: &'static str, input: fn(&EditorState) -> I, combine: fn(&I) -> O) -> Self {
        Self {
            name,
            input,
            combine,
            cache: RefCell::new(None),
            recomputations: Cell::new(0),
        }
    }

    /// Derive the result for the given state.
    ///
    /// Returns the cached result, the same `Rc`, when no input changed.
    pub fn select(&self, state: &EditorState) -> Rc<O> {
        let inputs = (self.input)(state);
        if let Some((cached_inputs, output)) = self.cache.borrow().as_ref() {
            if cached_inputs.same_as(&inputs) {
                return Rc::clone(output);
            }
        }

        log::trace!("Recomputing selector {}", self.name);
        let output = Rc::new((self.combine)(&inputs));
        self.recomputations.set(self.recomputations.get() + 1);
        *self.cache.borrow_mut() = Some((inputs, Rc::clone(&output)));
        output
    }

    /// Number of times the combine step has run.
    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }

    /// Drop the cached result.
    pub fn reset(&self) {
        self.cache.borrow_mut().take();
    }
}

impl<I, O> std::fmt::Debug for Selector<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("name", &self.name)
            .field("recomputations", &self.recomputations.get())
            .finish()
    }
}
