use colored::*;
use lanmap_common::network::device::Device;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn device_to_details(device: &Device) -> Vec<Detail> {
    let mac: ColoredString = if device.has_hardware_address() {
        device.hardware_address.color(colors::MAC_ADDR)
    } else {
        device.hardware_address.color(colors::UNKNOWN)
    };

    vec![
        ("IPv4".to_string(), device.address.color(colors::IPV4_ADDR)),
        ("MAC".to_string(), mac),
    ]
}

pub fn latency(ms: Option<f64>) -> ColoredString {
    match ms {
        Some(ms) => format!("{ms:.2} ms").bold().yellow(),
        None => "n/a".color(colors::UNKNOWN),
    }
}
