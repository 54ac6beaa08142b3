use std::cell::RefCell;
use std::ops::Deref;
use std::ops::DerefMut;

use crate::builder::TagHelperDescriptorBuilder;
use crate::BuildError;
use crate::TagHelperDescriptor;
use crate::TagHelperKind;

const MAX_POOLED_BUILDERS: usize = 32;

thread_local! {
    static POOL: RefCell<Vec<TagHelperDescriptorBuilder>> = const { RefCell::new(Vec::new()) };
}

impl TagHelperDescriptorBuilder {
    /// Take a builder from this thread's pool.
    ///
    /// The guard returns the builder to the pool when it is built or
    /// dropped, on every exit path. [`PooledBuilder::build`] consumes the
    /// guard, so a released builder can never be touched again.
    #[must_use]
    pub fn get_pooled_instance(
        kind: TagHelperKind,
        name: impl Into<String>,
        assembly_name: impl Into<String>,
    ) -> PooledBuilder {
        let mut builder = POOL
            .with_borrow_mut(Vec::pop)
            .unwrap_or_else(TagHelperDescriptorBuilder::empty);
        builder.reset(kind, name.into(), assembly_name.into());
        PooledBuilder { builder }
    }
}

/// Scoped ownership of a pooled [`TagHelperDescriptorBuilder`].
#[derive(Debug)]
pub struct PooledBuilder {
    builder: TagHelperDescriptorBuilder,
}

impl PooledBuilder {
    pub fn build(mut self) -> Result<TagHelperDescriptor, BuildError> {
        self.builder.build()
    }
}

impl Deref for PooledBuilder {
    type Target = TagHelperDescriptorBuilder;

    fn deref(&self) -> &Self::Target {
        &self.builder
    }
}

impl DerefMut for PooledBuilder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.builder
    }
}

impl Drop for PooledBuilder {
    fn drop(&mut self) {
        let mut builder = std::mem::replace(&mut self.builder, TagHelperDescriptorBuilder::empty());
        builder.reset(TagHelperKind::Default, String::new(), String::new());
        // Thread-local storage may already be gone during thread teardown.
        let _ = POOL.try_with(|pool| {
            let mut pool = pool.borrow_mut();
            if pool.len() < MAX_POOLED_BUILDERS {
                pool.push(builder);
            }
        });
    }
}

#[cfg(test)]
pub(crate) fn pooled_count() -> usize {
    POOL.with_borrow(Vec::len)
}
