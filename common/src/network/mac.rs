//! Hardware address helpers and vendor lookup.

use std::sync::OnceLock;

use mac_oui::Oui;
use pnet::util::MacAddr;

/// Resolves a hardware address to the name of its manufacturer.
pub trait VendorRepository: Send + Sync {
    fn get_vendor(&self, mac: &str) -> Option<String>;
}

/// Never knows a vendor. Leaves display names at their placeholder.
pub struct NoVendors;

impl VendorRepository for NoVendors {
    fn get_vendor(&self, _mac: &str) -> Option<String> {
        None
    }
}

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

/// Retrieves or initializes the **Organizationally unique identifier** database.
fn oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                tracing::warn!("Failed to load OUI database: {e}");
                None
            }
        })
        .as_ref()
}

pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac: &str) -> Option<String> {
        let db = oui_db()?;
        match db.lookup_by_mac(mac) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            _ => None,
        }
    }
}

/// Canonical form of a colon separated hardware address: lower-case, every
/// group padded to two hex digits, so `0:1A:2b:3:4:5` becomes
/// `00:1a:2b:03:04:05`.
///
/// Returns `None` unless the input is exactly six hex groups.
pub fn normalize(mac: &str) -> Option<String> {
    mac.parse::<MacAddr>().ok().map(|m| m.to_string())
}

/// Whether the kernel marked this entry as incomplete.
pub fn is_zero(mac: &str) -> bool {
    mac.parse::<MacAddr>().is_ok_and(|m| m == MacAddr::zero())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
