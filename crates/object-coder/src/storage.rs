//! Shared storage for the tree under construction.
//!
//! The root encoder owns one `Object` behind a shared cell. Every encoder and
//! container below it holds a [`StorageRef`]: a handle to that same cell plus
//! the address of its own slot (a chain of map entries and array elements).
//! Writes resolve the address from the root on every access, so a child's
//! mutation is immediately visible through its parent and the root, and no
//! container ever holds a detached copy.

use crate::error::{CoderError, Result};
use crate::key::CodingPath;
use crate::object::Object;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Entry(String),
    Element(usize),
}

/// Handle to one slot of the shared tree.
#[derive(Debug, Clone)]
pub(crate) struct StorageRef {
    root: Rc<RefCell<Object>>,
    address: Rc<[Step]>,
}

impl StorageRef {
    pub(crate) fn root() -> Self {
        Self {
            root: Rc::new(RefCell::new(Object::Null)),
            address: Rc::from(Vec::<Step>::new()),
        }
    }

    /// The slot of map entry `key` below this one.
    pub(crate) fn entry(&self, key: impl Into<String>) -> Self {
        self.child(Step::Entry(key.into()))
    }

    /// The slot of array element `index` below this one.
    pub(crate) fn element(&self, index: usize) -> Self {
        self.child(Step::Element(index))
    }

    /// Run `f` against this slot.
    ///
    /// Fails with a container conflict when the address no longer resolves,
    /// which happens when an ancestor entry was overwritten with a value of
    /// another shape after this handle was created.
    pub(crate) fn update<R>(&self, path: &CodingPath, f: impl FnOnce(&mut Object) -> R) -> Result<R> {
        let mut root = self.root.borrow_mut();
        match resolve(&mut root, &self.address) {
            Some(slot) => Ok(f(slot)),
            None => Err(CoderError::conflict(
                path,
                "storage slot was replaced by a later write",
            )),
        }
    }

    /// Move the finished tree out of the shared cell.
    pub(crate) fn take_root(&self) -> Object {
        std::mem::take(&mut *self.root.borrow_mut())
    }

    fn child(&self, step: Step) -> Self {
        let mut address = Vec::with_capacity(self.address.len() + 1);
        address.extend_from_slice(&self.address);
        address.push(step);
        Self {
            root: Rc::clone(&self.root),
            address: Rc::from(address),
        }
    }
}

fn resolve<'o>(mut node: &'o mut Object, address: &[Step]) -> Option<&'o mut Object> {
    for step in address {
        node = match (step, node) {
            (Step::Entry(key), Object::Map(map)) => map.get_mut(key)?,
            (Step::Element(index), Object::Array(items)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(node)
}
