// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! A stand-in for ION on systems without the device: every request is served from a memfd,
//! ignoring heaps, alignment and flags.

use std::sync::Arc;

use log::debug;
use log::info;

use crate::gralloc_os::round_up_to_page_size;
use crate::gralloc_os::SafeDescriptor;
use crate::gralloc_os::SharedMemory;
use crate::gralloc_utils::*;
use crate::ion::IonAllocationRequest;
use crate::ion::IonConnection;
use crate::ion::IonDriver;

/// A driver allocating exportable system memory.
#[derive(Default)]
pub struct MemfdDriver(());

impl MemfdDriver {
    pub fn new() -> MemfdDriver {
        MemfdDriver(())
    }
}

impl IonDriver for MemfdDriver {
    fn connect(&self) -> GrallocResult<Arc<dyn IonConnection>> {
        info!("serving gralloc buffers from memfd");
        Ok(Arc::new(MemfdConnection(())))
    }
}

pub struct MemfdConnection(());

impl IonConnection for MemfdConnection {
    fn alloc_fd(&self, request: &IonAllocationRequest) -> GrallocResult<SafeDescriptor> {
        let size = round_up_to_page_size(request.len)?;
        let shm = SharedMemory::new("ion_gralloc", size).map_err(|e| match e {
            GrallocError::NixError(errno) => GrallocError::KernelAllocFailed {
                len: request.len,
                heap_mask: request.heap_mask.0,
                source: errno.into(),
            },
            e => e,
        })?;
        debug!("allocated a {} byte memfd", shm.size());
        Ok(shm.into())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;
    use crate::ion::select_heap;
    use crate::ion::IonFlags;
    use crate::usage::GrallocUsage;

    #[test]
    fn memfd_buffers_are_page_sized() {
        let connection = MemfdDriver::new().connect().unwrap();
        let request = IonAllocationRequest {
            len: 100,
            align: 0,
            heap_mask: select_heap(GrallocUsage::empty()),
            flags: IonFlags::empty(),
        };
        let fd = connection.alloc_fd(&request).unwrap();
        let file: File = fd.into();
        let len = file.metadata().unwrap().len();
        assert!(len >= 100);
        assert_eq!(len, round_up_to_page_size(100).unwrap());
    }
}
