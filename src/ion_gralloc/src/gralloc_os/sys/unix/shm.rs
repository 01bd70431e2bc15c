// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::convert::TryInto;
use std::ffi::CString;
use std::io::Error as IoError;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::OwnedFd;

use libc::off_t;
use nix::sys::memfd::memfd_create;
use nix::sys::memfd::MFdFlags;
use nix::unistd::ftruncate;
use nix::unistd::sysconf;
use nix::unistd::SysconfVar;
use vmm_sys_util::align_upwards;

use crate::gralloc_os::descriptor::AsRawDescriptor;
use crate::gralloc_os::RawDescriptor;
use crate::gralloc_os::SafeDescriptor;
use crate::gralloc_utils::GrallocError;
use crate::gralloc_utils::GrallocResult;

/// A memfd standing in for a dma-buf.  The size is sealed, so whoever the descriptor is shared
/// with sees a buffer of exactly the allocated length.
pub struct SharedMemory {
    fd: OwnedFd,
    size: u64,
}

impl SharedMemory {
    /// Creates a sealed memfd of `size` bytes.  `debug_name` shows up in `/proc/self/fd` and
    /// need not be unique.
    pub fn new(debug_name: &str, size: u64) -> GrallocResult<SharedMemory> {
        let debug_name = CString::new(debug_name)?;
        let fd = memfd_create(
            debug_name.as_c_str(),
            MFdFlags::MFD_CLOEXEC | MFdFlags::MFD_ALLOW_SEALING,
        )?;

        let size_off_t: off_t = size.try_into()?;
        ftruncate(&fd, size_off_t)?;

        let seals = libc::F_SEAL_SHRINK | libc::F_SEAL_GROW | libc::F_SEAL_SEAL;
        // Safe because this only changes the seals of a descriptor we own.
        if unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_ADD_SEALS, seals) } < 0 {
            return Err(IoError::last_os_error().into());
        }

        Ok(SharedMemory { fd, size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl AsRawDescriptor for SharedMemory {
    fn as_raw_descriptor(&self) -> RawDescriptor {
        self.fd.as_raw_descriptor()
    }
}

impl From<SharedMemory> for SafeDescriptor {
    fn from(shm: SharedMemory) -> SafeDescriptor {
        shm.fd.into()
    }
}

/// Rounds `v` up to the system page size.
pub fn round_up_to_page_size(v: u64) -> GrallocResult<u64> {
    let page_size = match sysconf(SysconfVar::PAGE_SIZE)? {
        Some(page_size) => page_size as u64,
        None => return Err(GrallocError::SpecViolation("no page size")),
    };

    checked_range!(v; <= u64::MAX - page_size)?;
    Ok(align_upwards!(v, page_size))
}
