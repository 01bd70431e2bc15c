// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Fakes for the kernel allocator and the mapper.  Fake buffers are one end of a socket pair, so
//! whether every copy of a buffer descriptor was closed can be observed on the other end.

use std::io::Error as IoError;
use std::io::ErrorKind as IoErrorKind;
use std::io::Read;
use std::os::unix::io::OwnedFd;
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::sync::Mutex;

use crate::gralloc_os::SafeDescriptor;
use crate::gralloc_utils::*;
use crate::handle::BufferHandle;
use crate::ion::IonAllocationRequest;
use crate::ion::IonConnection;
use crate::ion::IonDriver;
use crate::mapper::BufferMapper;

#[derive(Default)]
struct FakeIonState {
    requests: Vec<IonAllocationRequest>,
    probes: Vec<UnixStream>,
    calls: usize,
    fail_on_call: Option<usize>,
    fail_connect: bool,
    connects: usize,
    live_connections: usize,
}

impl FakeIonState {
    fn descriptor(&mut self) -> SafeDescriptor {
        let (probe, buffer) = UnixStream::pair().unwrap();
        probe.set_nonblocking(true).unwrap();
        self.probes.push(probe);
        OwnedFd::from(buffer).into()
    }
}

#[derive(Clone, Default)]
pub struct FakeIon {
    state: Arc<Mutex<FakeIonState>>,
}

impl FakeIon {
    pub fn new() -> FakeIon {
        Default::default()
    }

    /// Makes the `call`th allocation (counting from 1) fail with ENOMEM.
    pub fn fail_on_call(&self, call: usize) {
        self.state.lock().unwrap().fail_on_call = Some(call);
    }

    pub fn fail_connect(&self, fail: bool) {
        self.state.lock().unwrap().fail_connect = fail;
    }

    pub fn requests(&self) -> Vec<IonAllocationRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn live_connections(&self) -> usize {
        self.state.lock().unwrap().live_connections
    }

    /// Returns a tracked descriptor without going through a connection.
    pub fn descriptor(&self) -> SafeDescriptor {
        self.state.lock().unwrap().descriptor()
    }

    /// Counts buffers with at least one descriptor still open.
    pub fn open_descriptors(&self) -> usize {
        let state = self.state.lock().unwrap();
        state
            .probes
            .iter()
            .filter(|probe| {
                let mut probe: &UnixStream = probe;
                let mut buf = [0u8; 1];
                match probe.read(&mut buf) {
                    Ok(_) => false,
                    Err(e) => e.kind() == IoErrorKind::WouldBlock,
                }
            })
            .count()
    }
}

impl IonDriver for FakeIon {
    fn connect(&self) -> GrallocResult<Arc<dyn IonConnection>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_connect {
            return Err(IoError::from_raw_os_error(libc::ENODEV).into());
        }

        state.connects += 1;
        state.live_connections += 1;
        Ok(Arc::new(FakeConnection { ion: self.clone() }))
    }
}

struct FakeConnection {
    ion: FakeIon,
}

impl IonConnection for FakeConnection {
    fn alloc_fd(&self, request: &IonAllocationRequest) -> GrallocResult<SafeDescriptor> {
        let mut state = self.ion.state.lock().unwrap();
        state.calls += 1;
        state.requests.push(*request);
        if state.fail_on_call == Some(state.calls) {
            return Err(GrallocError::KernelAllocFailed {
                len: request.len,
                heap_mask: request.heap_mask.0,
                source: IoError::from_raw_os_error(libc::ENOMEM),
            });
        }
        Ok(state.descriptor())
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        if let Ok(mut state) = self.ion.state.lock() {
            state.live_connections -= 1;
        }
    }
}

#[derive(Default)]
struct FakeMapperState {
    registered: usize,
    unregistered: usize,
    fail_register: bool,
    fail_unregister: bool,
}

/// Counts registrations and can be told to reject them.
#[derive(Clone, Default)]
pub struct FakeMapper {
    state: Arc<Mutex<FakeMapperState>>,
}

impl FakeMapper {
    pub fn new() -> FakeMapper {
        Default::default()
    }

    pub fn fail_register(&self, fail: bool) {
        self.state.lock().unwrap().fail_register = fail;
    }

    pub fn fail_unregister(&self, fail: bool) {
        self.state.lock().unwrap().fail_unregister = fail;
    }

    pub fn registered(&self) -> usize {
        self.state.lock().unwrap().registered
    }

    pub fn unregistered(&self) -> usize {
        self.state.lock().unwrap().unregistered
    }
}

impl BufferMapper for FakeMapper {
    fn register_buffer(&self, _handle: &BufferHandle) -> GrallocResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_register {
            return Err(GrallocError::MapperFailed(-libc::EBUSY));
        }
        state.registered += 1;
        Ok(())
    }

    fn unregister_buffer(&self, _handle: &BufferHandle) -> GrallocResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_unregister {
            return Err(GrallocError::MapperFailed(-libc::EINVAL));
        }
        state.unregistered += 1;
        Ok(())
    }
}
