//! Bridged device state and change notification.
//!
//! A [`Device`] holds the canonical state for one bridged endpoint and
//! invokes its registered change callback once per effective mutation.
//! Writing a value equal to the current one never notifies.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use log::info;

use crate::bounded::BoundedString;

/// Storage capacity for a device name, matching the UserLabel attribute size.
pub const DEVICE_NAME_SIZE: usize = 32;
/// Storage capacity for a device location label.
pub const DEVICE_LOCATION_SIZE: usize = 32;

bitflags! {
    /// Which device fields changed in a notification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChangeMask: u8 {
        const REACHABLE = 0x01;
        const STATE = 0x02;
        const LOCATION = 0x04;
        const NAME = 0x08;
    }
}

/// Callback invoked synchronously on every effective state change.
///
/// The callback runs on the mutating call stack, before the mutator
/// returns. A device holds at most one; registering another replaces it.
pub type ChangeCallback = Arc<dyn Fn(&Device, ChangeMask)>;

/// State for one bridged endpoint.
///
/// Devices are plain value objects: constructed with a name and
/// location, handed an endpoint id by the registrar, then mutated
/// through the setters below. Every setter is an idempotent write that
/// notifies only when the stored value actually changed.
pub struct Device {
    name: BoundedString<DEVICE_NAME_SIZE>,
    location: BoundedString<DEVICE_LOCATION_SIZE>,
    endpoint_id: u16,
    on: bool,
    reachable: bool,
    callback: Option<ChangeCallback>,
}

impl Device {
    /// Create a device with the given name and location.
    ///
    /// The device starts off and unreachable, with no endpoint id; the
    /// registrar assigns one at registration time.
    pub fn new(name: &str, location: &str) -> Self {
        Self {
            name: BoundedString::new(name),
            location: BoundedString::new(location),
            endpoint_id: 0,
            on: false,
            reachable: false,
            callback: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    pub fn endpoint_id(&self) -> u16 {
        self.endpoint_id
    }

    /// Assign the endpoint id under which this device is exposed.
    ///
    /// Called by the registrar; the device itself performs no
    /// registration logic.
    pub fn set_endpoint_id(&mut self, endpoint_id: u16) {
        self.endpoint_id = endpoint_id;
    }

    /// Set the power state. Notifies iff the state actually changed.
    pub fn set_on_off(&mut self, on: bool) {
        let changed = self.on != on;
        self.on = on;
        info!("Device[{}]: {}", self.name, if on { "ON" } else { "OFF" });
        if changed {
            self.notify(ChangeMask::STATE);
        }
    }

    /// Set reachability. Notifies iff reachability actually changed.
    pub fn set_reachable(&mut self, reachable: bool) {
        let changed = self.reachable != reachable;
        self.reachable = reachable;
        info!(
            "Device[{}]: {}",
            self.name,
            if reachable { "ONLINE" } else { "OFFLINE" }
        );
        if changed {
            self.notify(ChangeMask::REACHABLE);
        }
    }

    /// Rename the device, truncating to [`DEVICE_NAME_SIZE`] bytes.
    ///
    /// The change comparison runs on the truncated value, so a rename
    /// that only differs past the storage capacity is a no-op.
    pub fn set_name(&mut self, name: &str) {
        info!("Device[{}]: new name \"{}\"", self.name, name);
        if self.name.set(name) {
            self.notify(ChangeMask::NAME);
        }
    }

    /// Relocate the device, truncating to [`DEVICE_LOCATION_SIZE`] bytes.
    pub fn set_location(&mut self, location: &str) {
        let changed = self.location.set(location);
        info!("Device[{}]: location \"{}\"", self.name, self.location);
        if changed {
            self.notify(ChangeMask::LOCATION);
        }
    }

    /// Register the change callback, replacing any prior registration.
    pub fn set_change_callback(&mut self, callback: ChangeCallback) {
        self.callback = Some(callback);
    }

    fn notify(&self, mask: ChangeMask) {
        if let Some(callback) = &self.callback {
            callback(self, mask);
        }
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name.as_str())
            .field("location", &self.location.as_str())
            .field("endpoint_id", &self.endpoint_id)
            .field("on", &self.on)
            .field("reachable", &self.reachable)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
