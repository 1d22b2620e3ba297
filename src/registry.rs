//! Owned device table with endpoint assignment.
//!
//! The registry owns every bridged device and hands out endpoint ids
//! at registration time. Capacity is fixed: the table mirrors the
//! dynamic endpoint range the framework reserves for the bridge.

use log::info;

use crate::device::Device;
use crate::error::{BridgeError, Result};

/// Number of dynamic endpoints reserved for bridged devices.
pub const MAX_BRIDGED_DEVICES: usize = 16;

/// Fixed-capacity table of bridged devices.
///
/// Devices are registered in order and keep their slot for the life of
/// the registry; endpoint ids are sequential from the configured first
/// id, so lookup is an index computation.
pub struct DeviceRegistry {
    devices: heapless::Vec<Device, MAX_BRIDGED_DEVICES>,
    first_endpoint_id: u16,
}

impl DeviceRegistry {
    /// Create an empty registry whose first assigned endpoint id is
    /// `first_endpoint_id`.
    pub fn new(first_endpoint_id: u16) -> Self {
        Self {
            devices: heapless::Vec::new(),
            first_endpoint_id,
        }
    }

    /// Take ownership of `device`, assign the next endpoint id, and
    /// return the assigned id.
    pub fn register(&mut self, mut device: Device) -> Result<u16> {
        let endpoint_id = self.first_endpoint_id + self.devices.len() as u16;
        device.set_endpoint_id(endpoint_id);
        info!(
            "Registered device \"{}\" on endpoint {}",
            device.name(),
            endpoint_id
        );
        self.devices
            .push(device)
            .map_err(|_| BridgeError::DeviceTableFull(MAX_BRIDGED_DEVICES))?;
        Ok(endpoint_id)
    }

    pub fn get(&self, endpoint_id: u16) -> Option<&Device> {
        let index = endpoint_id.checked_sub(self.first_endpoint_id)? as usize;
        self.devices.get(index)
    }

    pub fn get_mut(&mut self, endpoint_id: u16) -> Option<&mut Device> {
        let index = endpoint_id.checked_sub(self.first_endpoint_id)? as usize;
        self.devices.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.iter_mut()
    }
}
