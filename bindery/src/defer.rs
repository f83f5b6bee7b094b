//! Deferred work for delayed view intake.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use log::trace;

type Task = Box<dyn FnOnce()>;

/// A single-threaded queue of tasks run later, in order, by the host.
///
/// Widgets use it to postpone work until an event has finished applying,
/// e.g. reading a field's text after a keystroke has landed. Clones share
/// the same queue.
#[derive(Clone, Default)]
pub struct DeferQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl DeferQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run queued tasks until the queue is empty, including tasks deferred
    /// while flushing. Returns how many ran.
    pub fn flush(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!("defer queue flushed {} task(s)", ran);
        }
        ran
    }
}

impl fmt::Debug for DeferQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
