//! Attribute change dispatch.
//!
//! Translates a device change notification into attribute reports for
//! the framework's reporting engine. Each set bit in the change mask
//! produces one report carrying the framework's binary value encoding.

use std::sync::Arc;

use log::info;

use crate::device::{ChangeCallback, ChangeMask, Device};
use crate::zcl::{
    self, attributes, clusters, types, AttributeMetadata, FIXED_LABEL_ATTRIBUTE_SIZE,
    USER_LABEL_MAX_LEN, USER_LABEL_SIZE,
};

/// Label under which a device's location appears in the LabelList.
pub const LOCATION_LABEL: &str = "room";

/// Reporting entry point exposed by the host framework.
///
/// Delivery is one way: reports are fire-and-forget, and failures
/// inside the framework are not visible to the caller.
pub trait AttributeReporter {
    fn notify_attribute_changed(
        &self,
        endpoint_id: u16,
        cluster_id: u16,
        attribute_id: u16,
        attribute_type: u8,
        value: &[u8],
    );
}

/// Maps device change masks to per-attribute reports.
///
/// Holds no state between calls; encoding scratch buffers live on the
/// stack of [`dispatch`].
///
/// [`dispatch`]: ChangeDispatcher::dispatch
pub struct ChangeDispatcher<R: AttributeReporter> {
    reporter: R,
}

impl<R: AttributeReporter> ChangeDispatcher<R> {
    pub fn new(reporter: R) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Report every changed attribute of `device`.
    pub fn dispatch(&self, device: &Device, mask: ChangeMask) {
        if mask.contains(ChangeMask::REACHABLE) {
            let reachable = [u8::from(device.is_reachable())];
            self.reporter.notify_attribute_changed(
                device.endpoint_id(),
                clusters::BRIDGED_DEVICE_BASIC,
                attributes::REACHABLE,
                types::BOOLEAN,
                &reachable,
            );
        }

        if mask.contains(ChangeMask::STATE) {
            let on = [u8::from(device.is_on())];
            self.reporter.notify_attribute_changed(
                device.endpoint_id(),
                clusters::ON_OFF,
                attributes::ON_OFF,
                types::BOOLEAN,
                &on,
            );
        }

        if mask.contains(ChangeMask::NAME) {
            let mut buf = [0u8; USER_LABEL_SIZE];
            let len = zcl::to_zcl_char_string(&mut buf, device.name(), USER_LABEL_MAX_LEN);
            self.reporter.notify_attribute_changed(
                device.endpoint_id(),
                clusters::BRIDGED_DEVICE_BASIC,
                attributes::USER_LABEL,
                types::CHAR_STRING,
                &buf[..len],
            );
        }

        if mask.contains(ChangeMask::LOCATION) {
            let mut buf = [0u8; FIXED_LABEL_ATTRIBUTE_SIZE];
            let metadata = AttributeMetadata {
                attribute_id: attributes::LABEL_LIST,
                size: FIXED_LABEL_ATTRIBUTE_SIZE as u16,
                default_value: None,
            };
            let len = zcl::encode_fixed_label(&mut buf, LOCATION_LABEL, device.location(), &metadata);
            self.reporter.notify_attribute_changed(
                device.endpoint_id(),
                clusters::FIXED_LABEL,
                attributes::LABEL_LIST,
                types::ARRAY,
                &buf[..len],
            );
        }
    }
}

impl<R: AttributeReporter + 'static> ChangeDispatcher<R> {
    /// Wrap a shared dispatcher as a device change callback.
    pub fn callback(self: Arc<Self>) -> ChangeCallback {
        Arc::new(move |device, mask| self.dispatch(device, mask))
    }
}

/// Reporter that logs each notification instead of delivering it.
///
/// Stands in for the framework's reporting engine in the demo binary
/// and in environments without a host stack attached.
#[derive(Debug, Default, Clone)]
pub struct LogReporter;

impl AttributeReporter for LogReporter {
    fn notify_attribute_changed(
        &self,
        endpoint_id: u16,
        cluster_id: u16,
        attribute_id: u16,
        attribute_type: u8,
        value: &[u8],
    ) {
        info!(
            "[Report] endpoint {}: cluster 0x{:04X} attribute 0x{:04X} type 0x{:02X} ({} bytes)",
            endpoint_id,
            cluster_id,
            attribute_id,
            attribute_type,
            value.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zcl::{FIXED_LABEL_OCTET_SIZE, LABEL_ENTRY_SIZE, LIST_COUNT_PREFIX};
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Report {
        endpoint_id: u16,
        cluster_id: u16,
        attribute_id: u16,
        attribute_type: u8,
        value: Vec<u8>,
    }

    #[derive(Default)]
    struct RecordingReporter {
        reports: RefCell<Vec<Report>>,
    }

    impl AttributeReporter for RecordingReporter {
        fn notify_attribute_changed(
            &self,
            endpoint_id: u16,
            cluster_id: u16,
            attribute_id: u16,
            attribute_type: u8,
            value: &[u8],
        ) {
            self.reports.borrow_mut().push(Report {
                endpoint_id,
                cluster_id,
                attribute_id,
                attribute_type,
                value: value.to_vec(),
            });
        }
    }

    fn test_device() -> Device {
        let mut device = Device::new("Light 1", "Office");
        device.set_endpoint_id(3);
        device
    }

    #[test]
    fn test_reachable_report() {
        let dispatcher = ChangeDispatcher::new(RecordingReporter::default());
        let mut device = test_device();
        device.set_reachable(true);

        dispatcher.dispatch(&device, ChangeMask::REACHABLE);

        let reports = dispatcher.reporter().reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0],
            Report {
                endpoint_id: 3,
                cluster_id: clusters::BRIDGED_DEVICE_BASIC,
                attribute_id: attributes::REACHABLE,
                attribute_type: types::BOOLEAN,
                value: vec![1],
            }
        );
    }

    #[test]
    fn test_state_report() {
        let dispatcher = ChangeDispatcher::new(RecordingReporter::default());
        let mut device = test_device();
        device.set_on_off(true);

        dispatcher.dispatch(&device, ChangeMask::STATE);

        let reports = dispatcher.reporter().reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cluster_id, clusters::ON_OFF);
        assert_eq!(reports[0].attribute_id, attributes::ON_OFF);
        assert_eq!(reports[0].value, vec![1]);
    }

    #[test]
    fn test_name_report_is_length_prefixed() {
        let dispatcher = ChangeDispatcher::new(RecordingReporter::default());
        let device = test_device();

        dispatcher.dispatch(&device, ChangeMask::NAME);

        let reports = dispatcher.reporter().reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].attribute_id, attributes::USER_LABEL);
        assert_eq!(reports[0].attribute_type, types::CHAR_STRING);
        assert_eq!(reports[0].value, b"\x07Light 1");
    }

    #[test]
    fn test_location_report_is_single_entry_list() {
        let dispatcher = ChangeDispatcher::new(RecordingReporter::default());
        let device = test_device();

        dispatcher.dispatch(&device, ChangeMask::LOCATION);

        let reports = dispatcher.reporter().reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cluster_id, clusters::FIXED_LABEL);
        assert_eq!(reports[0].attribute_type, types::ARRAY);

        let value = &reports[0].value;
        assert_eq!(value.len(), LIST_COUNT_PREFIX + LABEL_ENTRY_SIZE);
        assert_eq!(&value[..2], &[1, 0]);
        assert_eq!(&value[2..6], b"room");
        assert_eq!(&value[2 + FIXED_LABEL_OCTET_SIZE..][..6], b"Office");
    }

    #[test]
    fn test_multi_bit_mask_reports_each_attribute() {
        let dispatcher = ChangeDispatcher::new(RecordingReporter::default());
        let device = test_device();

        dispatcher.dispatch(&device, ChangeMask::REACHABLE | ChangeMask::STATE);

        let reports = dispatcher.reporter().reports.borrow();
        assert_eq!(reports.len(), 2);
        // Fixed dispatch order: reachable first
        assert_eq!(reports[0].attribute_id, attributes::REACHABLE);
        assert_eq!(reports[1].cluster_id, clusters::ON_OFF);
    }

    #[test]
    fn test_relocation_scenario() {
        // A bridged light moving rooms produces exactly one LabelList
        // report for its assigned endpoint.
        let dispatcher = Arc::new(ChangeDispatcher::new(RecordingReporter::default()));
        let mut device = Device::new("Light 1", "Office");
        device.set_endpoint_id(7);
        device.set_change_callback(dispatcher.clone().callback());

        device.set_location("Den");

        let reports = dispatcher.reporter().reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].endpoint_id, 7);
        assert_eq!(reports[0].cluster_id, clusters::FIXED_LABEL);
        assert_eq!(reports[0].attribute_id, attributes::LABEL_LIST);
        assert_eq!(&reports[0].value[2 + FIXED_LABEL_OCTET_SIZE..][..3], b"Den");
    }

    #[test]
    fn test_no_op_write_produces_no_report() {
        let dispatcher = Arc::new(ChangeDispatcher::new(RecordingReporter::default()));
        let mut device = test_device();
        device.set_change_callback(dispatcher.clone().callback());

        device.set_on_off(true);
        device.set_on_off(true);

        assert_eq!(dispatcher.reporter().reports.borrow().len(), 1);
    }
}
