//! Connectivity probing.
//!
//! The coordinator asks before every cycle; an offline device refuses
//! to sync instead of timing out against a server it cannot reach.

/// Reports whether the device believes it can reach the sync server.
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

/// Assumes a connection is always available.
///
/// Stands in where the host application has no platform probe; the
/// coordinator still turns transport failures into ordinary sync
/// errors, so the worst case is a slower failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}
