//! In-memory template store shared between enrollment and verification.
//!
//! The original system kept templates in a process-global map with no
//! locking; here the store is an explicit object with interior
//! synchronization, passed by `Arc` to every handler. Readers observe
//! either the pre- or post-enrollment template for an identity, never a
//! partially written one: templates are stored behind `Arc` and swapped
//! atomically under the write lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{VerifyError, VerifyResult};
use crate::template::Template;

/// Keyed storage of identity → template. Zero or one template per
/// identity; `enroll` replaces, never merges.
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: RwLock<HashMap<String, Arc<Template>>>,
}

impl TemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the template for `template.identity_id`.
    pub fn enroll(&self, template: Template) {
        let mut guard = self.templates.write();
        guard.insert(template.identity_id.clone(), Arc::new(template));
    }

    /// Fetch the template for an identity.
    ///
    /// # Errors
    ///
    /// [`VerifyError::NotFound`] when no template is enrolled.
    pub fn get(&self, identity_id: &str) -> VerifyResult<Arc<Template>> {
        self.templates
            .read()
            .get(identity_id)
            .cloned()
            .ok_or_else(|| VerifyError::NotFound {
                identity_id: identity_id.to_string(),
            })
    }

    /// Remove the template for an identity. Returns whether one existed.
    pub fn remove(&self, identity_id: &str) -> bool {
        self.templates.write().remove(identity_id).is_some()
    }

    /// Number of enrolled identities.
    pub fn count(&self) -> usize {
        self.templates.read().len()
    }

    /// Enrolled identity keys, in no particular order.
    pub fn identities(&self) -> Vec<String> {
        self.templates.read().keys().cloned().collect()
    }
}
