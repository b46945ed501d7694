//! Recording backend for unit tests.
//!
//! Hands out numbered handles and counts creations so cache behaviour can be
//! asserted without a GPU. Handles log their drops, so release order can be
//! asserted too.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::binding::BindingPlan;

use super::{BufferKind, GpuBackend, ResourceError};

/// A released handle, in the order handles were dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Released {
    Buffer(BufferKind, u32),
    Binding(u32),
}

/// Shared between a backend and every handle it created.
#[derive(Clone, Default)]
pub(crate) struct DropLog(Rc<RefCell<Vec<Released>>>);

impl DropLog {
    fn push(&self, released: Released) {
        self.0.borrow_mut().push(released);
    }

    pub fn entries(&self) -> Vec<Released> {
        self.0.borrow().clone()
    }
}

impl fmt::Debug for DropLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DropLog")
    }
}

// Handles compare by what they describe, not by the log they report to.
impl PartialEq for DropLog {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for DropLog {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedBuffer {
    pub id: u32,
    pub kind: BufferKind,
    pub contents: Vec<u8>,
    log: DropLog,
}

impl Drop for RecordedBuffer {
    fn drop(&mut self) {
        self.log.push(Released::Buffer(self.kind, self.id));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedBinding {
    pub id: u32,
    pub program: u32,
    pub plan: BindingPlan,
    log: DropLog,
}

impl Drop for RecordedBinding {
    fn drop(&mut self) {
        self.log.push(Released::Binding(self.id));
    }
}

#[derive(Default)]
pub(crate) struct RecordingBackend {
    next_id: Cell<u32>,

    pub buffers_created: Cell<usize>,
    pub programs_created: Cell<usize>,
    pub bindings_created: Cell<usize>,
    pub textures_created: Cell<usize>,

    /// Fail buffer creation once this many buffers exist.
    pub buffer_budget: Cell<Option<usize>>,
    /// Fail the next `n` binding creations.
    pub failing_bindings: Cell<usize>,

    pub plans: RefCell<Vec<BindingPlan>>,
    pub drops: DropLog,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn rejected(label: &str) -> ResourceError {
        ResourceError::Rejected {
            label: label.to_string(),
            message: "injected failure".to_string(),
        }
    }
}

impl GpuBackend for RecordingBackend {
    type Buffer = RecordedBuffer;
    type Program = u32;
    type Binding = RecordedBinding;
    type Texture = u32;

    fn create_buffer(
        &self,
        kind: BufferKind,
        label: &str,
        contents: &[u8],
    ) -> Result<RecordedBuffer, ResourceError> {
        if contents.is_empty() {
            return Err(ResourceError::EmptyBuffer {
                kind,
                label: label.to_string(),
            });
        }
        if let Some(budget) = self.buffer_budget.get() {
            if self.buffers_created.get() >= budget {
                return Err(Self::rejected(label));
            }
        }

        self.buffers_created.set(self.buffers_created.get() + 1);
        Ok(RecordedBuffer {
            id: self.next_id(),
            kind,
            contents: contents.to_vec(),
            log: self.drops.clone(),
        })
    }

    fn create_program(&self, _name: &str, _source: &str) -> Result<u32, ResourceError> {
        self.programs_created.set(self.programs_created.get() + 1);
        Ok(self.next_id())
    }

    fn create_binding(&self, program: &u32, plan: &BindingPlan) -> Result<RecordedBinding, ResourceError> {
        let failing = self.failing_bindings.get();
        if failing > 0 {
            self.failing_bindings.set(failing - 1);
            return Err(Self::rejected("binding"));
        }

        self.bindings_created.set(self.bindings_created.get() + 1);
        self.plans.borrow_mut().push(plan.clone());
        Ok(RecordedBinding {
            id: self.next_id(),
            program: *program,
            plan: plan.clone(),
            log: self.drops.clone(),
        })
    }

    fn create_texture(
        &self,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<u32, ResourceError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ResourceError::TextureSize {
                label: label.to_string(),
                expected,
                actual: rgba.len(),
            });
        }
        self.textures_created.set(self.textures_created.get() + 1);
        Ok(self.next_id())
    }
}
