use std::rc::Rc;

use patientor_core::State;

/// Handle on a state snapshot that compares by pointer.
///
/// The reducer returns a new `Rc` for every change and the same one otherwise,
/// so pointer equality is a complete change check for hook dependencies.
#[derive(Debug, Clone, Default)]
pub struct Snapshot(pub Rc<State>);

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
