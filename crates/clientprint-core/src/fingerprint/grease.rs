/// RFC 8701 reserved value: both bytes equal and each ending in nibble `A`,
/// as in 2570 (0x0A0A) or 56026 (0xDADA).
pub fn is_grease_u16(value: u16) -> bool {
    let [high, low] = value.to_be_bytes();
    high == low && low & 0x0F == 0x0A
}

/// Drop GREASE values, keeping the order of everything else.
pub fn filter_grease_u16(values: Vec<u16>) -> Vec<u16> {
    values.into_iter().filter(|v| !is_grease_u16(*v)).collect()
}

/// Capture services label greased entries by name, e.g. `"TLS_GREASE (0xdada)"`.
pub fn is_grease_label(label: &str) -> bool {
    label.contains("GREASE")
}
