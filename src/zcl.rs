//! ZCL-style attribute encoding.
//!
//! Values reported to the framework are serialized with the cluster
//! library's fixed binary conventions: length-prefixed character
//! strings and count-prefixed arrays of fixed-size structs.

use crate::bounded::truncate_to_boundary;

/// Cluster ids used by bridged devices.
pub mod clusters {
    /// On/Off cluster
    pub const ON_OFF: u16 = 0x0006;
    /// Bridged Device Basic cluster
    pub const BRIDGED_DEVICE_BASIC: u16 = 0x0039;
    /// Fixed Label cluster
    pub const FIXED_LABEL: u16 = 0x0040;
}

/// Attribute ids within the clusters above.
pub mod attributes {
    /// On/Off cluster, current power state
    pub const ON_OFF: u16 = 0x0000;
    /// Bridged Device Basic cluster, user-visible label
    pub const USER_LABEL: u16 = 0x0005;
    /// Bridged Device Basic cluster, reachability flag
    pub const REACHABLE: u16 = 0x0011;
    /// Fixed Label cluster, label list
    pub const LABEL_LIST: u16 = 0x0000;
}

/// ZCL attribute type discriminators.
pub mod types {
    /// Boolean, one byte
    pub const BOOLEAN: u8 = 0x10;
    /// Character string, length-prefixed
    pub const CHAR_STRING: u8 = 0x42;
    /// Array
    pub const ARRAY: u8 = 0x48;
}

/// Buffer size for an encoded UserLabel: one length byte plus payload.
pub const USER_LABEL_SIZE: usize = 32;
/// Maximum payload bytes in an encoded UserLabel string.
pub const USER_LABEL_MAX_LEN: usize = USER_LABEL_SIZE - 1;

/// Octet size of each span in a fixed-label entry.
pub const FIXED_LABEL_OCTET_SIZE: usize = 16;
/// Storage size of the LabelList attribute; struct arrays in the
/// cluster library are capped at 254 bytes.
pub const FIXED_LABEL_ATTRIBUTE_SIZE: usize = 254;

/// Byte length of the list-count prefix at the start of a list buffer.
pub const LIST_COUNT_PREFIX: usize = 2;
/// Byte length of one serialized label entry.
pub const LABEL_ENTRY_SIZE: usize = 2 * FIXED_LABEL_OCTET_SIZE;

/// Descriptor for an array-typed attribute, supplied by the caller.
///
/// Only `size` is consulted when encoding; it bounds how many bytes
/// the encoder may write into the destination buffer.
#[derive(Debug, Clone, Copy)]
pub struct AttributeMetadata {
    pub attribute_id: u16,
    pub size: u16,
    pub default_value: Option<&'static [u8]>,
}

/// Serialize `value` as a ZCL character string: one length byte
/// followed by exactly that many bytes, no terminator.
///
/// The length is clamped to `max_len`, to the room left in `dst`, and
/// to 255; clamping backs off to a UTF-8 character boundary. Returns
/// the number of bytes written including the length byte.
pub fn to_zcl_char_string(dst: &mut [u8], value: &str, max_len: usize) -> usize {
    if dst.is_empty() {
        return 0;
    }
    let max = max_len.min(dst.len() - 1).min(u8::MAX as usize);
    let clamped = truncate_to_boundary(value, max);
    dst[0] = clamped.len() as u8;
    dst[1..1 + clamped.len()].copy_from_slice(clamped.as_bytes());
    1 + clamped.len()
}

/// One entry of the Fixed Label cluster's LabelList attribute.
///
/// Label and value are fixed 16-byte octet spans. Shorter input is
/// zero-filled to the span size, longer input truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEntry {
    pub label: [u8; FIXED_LABEL_OCTET_SIZE],
    pub value: [u8; FIXED_LABEL_OCTET_SIZE],
}

impl LabelEntry {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: octet_span(label),
            value: octet_span(value),
        }
    }
}

/// Copy `value` into a zero-filled fixed-size octet span, truncating
/// at capacity.
fn octet_span(value: &str) -> [u8; FIXED_LABEL_OCTET_SIZE] {
    let mut span = [0u8; FIXED_LABEL_OCTET_SIZE];
    let len = value.len().min(FIXED_LABEL_OCTET_SIZE);
    span[..len].copy_from_slice(&value.as_bytes()[..len]);
    span
}

/// Write the element count at the start of a list attribute buffer.
///
/// The cluster library stores the count as a 16-bit little-endian
/// prefix in the same buffer that holds the elements. A destination
/// too small for the prefix is left untouched.
pub fn encode_list_count(dst: &mut [u8], count: u16) {
    if dst.len() < LIST_COUNT_PREFIX {
        return;
    }
    dst[..LIST_COUNT_PREFIX].copy_from_slice(&count.to_le_bytes());
}

/// Write fixed-size label entries after the count prefix.
///
/// Entries that would overrun `dst` are dropped whole, never split.
/// Returns the number of bytes used including the count prefix.
pub fn encode_list_elements(dst: &mut [u8], entries: &[LabelEntry]) -> usize {
    let mut offset = LIST_COUNT_PREFIX.min(dst.len());
    for entry in entries {
        if dst.len() - offset < LABEL_ENTRY_SIZE {
            break;
        }
        dst[offset..offset + FIXED_LABEL_OCTET_SIZE].copy_from_slice(&entry.label);
        offset += FIXED_LABEL_OCTET_SIZE;
        dst[offset..offset + FIXED_LABEL_OCTET_SIZE].copy_from_slice(&entry.value);
        offset += FIXED_LABEL_OCTET_SIZE;
    }
    offset
}

/// Encode a single-entry LabelList attribute into `dst`.
///
/// Builds one label entry from `label` and `value`, writes it after
/// the count prefix, then writes a count of 1. Writes are bounded by
/// the attribute's declared `size` and the destination length.
/// Returns the number of bytes used.
pub fn encode_fixed_label(
    dst: &mut [u8],
    label: &str,
    value: &str,
    metadata: &AttributeMetadata,
) -> usize {
    let limit = (metadata.size as usize).min(dst.len());
    let dst = &mut dst[..limit];
    let entry = LabelEntry::new(label, value);
    let written = encode_list_elements(dst, std::slice::from_ref(&entry));
    encode_list_count(dst, 1);
    written
}
