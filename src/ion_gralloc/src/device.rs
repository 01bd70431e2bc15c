// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! device: the process-wide allocator module and the client devices opened on it.  The kernel
//! connection is opened when the first client attaches and released when the last one detaches.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use log::debug;
use log::error;
use log::info;
use log::warn;

use crate::alloc::allocate;
use crate::formats::PixelFormat;
use crate::gralloc_utils::*;
use crate::handle::BufferHandle;
use crate::ion::IonConnection;
use crate::ion::IonDevice;
use crate::ion::IonDriver;
use crate::mapper::BufferMapper;
use crate::mapper::NullMapper;
use crate::usage::GrallocUsage;

/// The only device name the module serves.
pub const GRALLOC_HARDWARE_GPU0: &str = "gpu0";

struct ModuleState {
    connection: Option<Arc<dyn IonConnection>>,
    refcount: usize,
}

/// Shared allocator state: the kernel connection and the number of open clients.
pub struct GrallocModule {
    driver: Box<dyn IonDriver>,
    mapper: Box<dyn BufferMapper>,
    state: Mutex<ModuleState>,
}

impl GrallocModule {
    fn state(&self) -> MutexGuard<ModuleState> {
        match self.state.lock() {
            Ok(guard) => guard,
            // The counters are updated in single statements, so they are consistent even if a
            // holder panicked.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Opens the device called `name`.
    pub fn open_device(self: &Arc<Self>, name: &str) -> GrallocResult<GrallocDevice> {
        if name != GRALLOC_HARDWARE_GPU0 {
            return Err(GrallocError::InvalidDeviceName(name.to_string()));
        }
        self.open_client()
    }

    /// Attaches a client, connecting to the kernel allocator if it is the first one.  A failed
    /// connection leaves the module untouched.
    pub fn open_client(self: &Arc<Self>) -> GrallocResult<GrallocDevice> {
        let mut state = self.state();
        let connection = match &state.connection {
            Some(connection) => connection.clone(),
            None => {
                let connection = self.driver.connect().map_err(|e| {
                    error!("failed to connect to the kernel allocator: {}", e);
                    e
                })?;
                info!("connected to the kernel allocator");
                state.connection = Some(connection.clone());
                connection
            }
        };

        state.refcount += 1;
        debug!("gralloc client opened, {} open", state.refcount);
        Ok(GrallocDevice {
            module: self.clone(),
            connection: Some(connection),
        })
    }

    /// Detaches a client.  The client's reference to the connection is released under the lock,
    /// so the last client closes the kernel connection before another can open one.
    fn close_client(&self, connection: Option<Arc<dyn IonConnection>>) {
        let mut state = self.state();
        assert!(
            state.refcount > 0,
            "gralloc client closed with no clients open"
        );

        drop(connection);
        state.refcount -= 1;
        debug!("gralloc client closed, {} open", state.refcount);
        if state.refcount == 0 {
            state.connection = None;
            info!("disconnected from the kernel allocator");
        }
    }

    /// Returns the number of open clients.
    pub fn refcount(&self) -> usize {
        self.state().refcount
    }

    /// Returns true while the module holds a kernel connection.
    pub fn is_connected(&self) -> bool {
        self.state().connection.is_some()
    }
}

/// A client of the allocator module.  Dropping it detaches the client.
pub struct GrallocDevice {
    module: Arc<GrallocModule>,
    // Only `None` once dropped.
    connection: Option<Arc<dyn IonConnection>>,
}

impl GrallocDevice {
    /// Allocates and registers a buffer.  Returns the handle and its stride: in pixels for
    /// RGB-class formats, the luma row pitch for YUV.
    pub fn alloc(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        usage: GrallocUsage,
    ) -> GrallocResult<(BufferHandle, u32)> {
        let connection = self
            .connection
            .as_deref()
            .ok_or(GrallocError::SpecViolation("device is detached"))?;
        let (handle, stride) = allocate(connection, width, height, format, usage)?;

        // On failure the handle drops here, closing every plane.
        if let Err(e) = self.module.mapper.register_buffer(&handle) {
            error!("failed to register {:?}: {}", handle, e);
            return Err(e);
        }

        debug!(
            "allocated {}x{} {:?} for {:?}, stride {}",
            width,
            height,
            handle.format(),
            usage,
            stride
        );
        Ok((handle, stride))
    }

    /// Unregisters and releases a buffer.  Fails without unregistering if `handle` isn't a valid
    /// buffer handle.
    pub fn free(&self, handle: BufferHandle) -> GrallocResult<()> {
        handle.validate()?;

        if let Err(e) = self.module.mapper.unregister_buffer(&handle) {
            warn!("failed to unregister {:?}: {}", handle, e);
        }
        Ok(())
    }

    pub fn module(&self) -> &Arc<GrallocModule> {
        &self.module
    }
}

impl Drop for GrallocDevice {
    fn drop(&mut self) {
        self.module.close_client(self.connection.take());
    }
}

/// Configures a `GrallocModule`.
pub struct GrallocModuleBuilder {
    driver: Option<Box<dyn IonDriver>>,
    mapper: Option<Box<dyn BufferMapper>>,
    ion_device_path: PathBuf,
}

impl GrallocModuleBuilder {
    /// Creates a builder for a module on `/dev/ion` with no mapper.
    pub fn new() -> GrallocModuleBuilder {
        GrallocModuleBuilder {
            driver: None,
            mapper: None,
            ion_device_path: PathBuf::from(IonDevice::DEFAULT_PATH),
        }
    }

    /// Replaces the ION device with another kernel allocator backend.
    pub fn set_ion_driver(mut self, driver: Box<dyn IonDriver>) -> GrallocModuleBuilder {
        self.driver = Some(driver);
        self
    }

    /// Sets the mapper buffers are registered with.
    pub fn set_buffer_mapper(mut self, mapper: Box<dyn BufferMapper>) -> GrallocModuleBuilder {
        self.mapper = Some(mapper);
        self
    }

    /// Sets the ION device node.  Ignored when a driver was set.
    pub fn set_ion_device_path<P: AsRef<Path>>(mut self, path: P) -> GrallocModuleBuilder {
        self.ion_device_path = path.as_ref().to_path_buf();
        self
    }

    pub fn build(self) -> Arc<GrallocModule> {
        let driver: Box<dyn IonDriver> = match self.driver {
            Some(driver) => driver,
            None => Box::new(IonDevice::new(self.ion_device_path)),
        };
        let mapper: Box<dyn BufferMapper> = match self.mapper {
            Some(mapper) => mapper,
            None => Box::new(NullMapper::new()),
        };

        Arc::new(GrallocModule {
            driver,
            mapper,
            state: Mutex::new(ModuleState {
                connection: None,
                refcount: 0,
            }),
        })
    }
}

impl Default for GrallocModuleBuilder {
    fn default() -> GrallocModuleBuilder {
        GrallocModuleBuilder::new()
    }
}
