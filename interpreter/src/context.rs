use std::io::Write;

use crate::error::{Error, RuntimeResult};
use crate::limits::DEFAULT_MAX_CALL_DEPTH;

/// Execution context threaded through every evaluation. It owns nothing but a borrow of the
/// output sink `print` writes to and the bookkeeping for the call depth limit.
pub struct Context<'a> {
    output: &'a mut dyn Write,
    depth: usize,
    max_depth: usize,
}

impl<'a> Context<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        Context {
            output,
            depth: 0,
            max_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn output(&mut self) -> &mut (dyn Write + 'a) {
        &mut *self.output
    }

    /// Number of method calls currently executing.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter_call(&mut self) -> RuntimeResult<()> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimit {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_call(&mut self) {
        self.depth -= 1;
    }
}
