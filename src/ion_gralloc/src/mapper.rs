// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::gralloc_utils::GrallocResult;
use crate::handle::BufferHandle;

/// The mapping side of the allocator.  Every buffer is registered right after allocation so the
/// allocating process can lock it, and unregistered before it is freed.
pub trait BufferMapper: Send + Sync {
    fn register_buffer(&self, handle: &BufferHandle) -> GrallocResult<()>;
    fn unregister_buffer(&self, handle: &BufferHandle) -> GrallocResult<()>;
}

/// A mapper with nothing to track.
#[derive(Default)]
pub struct NullMapper(());

impl NullMapper {
    pub fn new() -> NullMapper {
        NullMapper(())
    }
}

impl BufferMapper for NullMapper {
    fn register_buffer(&self, _handle: &BufferHandle) -> GrallocResult<()> {
        Ok(())
    }

    fn unregister_buffer(&self, _handle: &BufferHandle) -> GrallocResult<()> {
        Ok(())
    }
}
