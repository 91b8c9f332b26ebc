//! The entity catalog: every type of record the suite synchronizes.
//!
//! The catalog is closed. Adding an entity type means adding a variant
//! here, which forces every match in the crate to account for it.

use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};

/// One synchronized entity type.
///
/// Wire names are camelCase and double as JSON object keys in push
/// bodies and pull responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Products,
    Categories,
    Units,
    Operators,
    Branches,
    Terminals,
    Sales,
    Customers,
    CashSessions,
    Suppliers,
    PurchaseOrders,
    StockMovements,
    Coupons,
    Settings,
    AuditLogs,
}

impl EntityKind {
    /// Every entity type, in catalog order.
    pub const ALL: [EntityKind; 15] = [
        EntityKind::Products,
        EntityKind::Categories,
        EntityKind::Units,
        EntityKind::Operators,
        EntityKind::Branches,
        EntityKind::Terminals,
        EntityKind::Sales,
        EntityKind::Customers,
        EntityKind::CashSessions,
        EntityKind::Suppliers,
        EntityKind::PurchaseOrders,
        EntityKind::StockMovements,
        EntityKind::Coupons,
        EntityKind::Settings,
        EntityKind::AuditLogs,
    ];

    /// Reference data a terminal cannot operate without. An empty
    /// in-memory collection of any of these forces a full pull.
    pub const FOUNDATIONAL: [EntityKind; 6] = [
        EntityKind::Products,
        EntityKind::Categories,
        EntityKind::Units,
        EntityKind::Operators,
        EntityKind::Branches,
        EntityKind::Terminals,
    ];

    /// The wire name of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Products => "products",
            EntityKind::Categories => "categories",
            EntityKind::Units => "units",
            EntityKind::Operators => "operators",
            EntityKind::Branches => "branches",
            EntityKind::Terminals => "terminals",
            EntityKind::Sales => "sales",
            EntityKind::Customers => "customers",
            EntityKind::CashSessions => "cashSessions",
            EntityKind::Suppliers => "suppliers",
            EntityKind::PurchaseOrders => "purchaseOrders",
            EntityKind::StockMovements => "stockMovements",
            EntityKind::Coupons => "coupons",
            EntityKind::Settings => "settings",
            EntityKind::AuditLogs => "auditLogs",
        }
    }

    /// Look up an entity type by wire name.
    ///
    /// Returns `None` for names outside the catalog; callers on tolerant
    /// paths (wire input) skip those, strict callers use [`EntityKind::parse`].
    pub fn from_name(name: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Strict variant of [`EntityKind::from_name`].
    pub fn parse(name: &str) -> Result<EntityKind> {
        EntityKind::from_name(name).ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// Whether this type must be present before a device is usable.
    pub fn is_foundational(&self) -> bool {
        EntityKind::FOUNDATIONAL.contains(self)
    }

    /// Fields of this entity type that hold structured data (arrays or
    /// nested objects) and travel as JSON strings on the wire.
    pub fn structured_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Products => &["variants", "options", "bundleItems", "branchStocks", "batches"],
            EntityKind::Sales => &["lineItems", "payments"],
            EntityKind::CashSessions => &["transactions"],
            EntityKind::Customers => &["address"],
            EntityKind::Suppliers => &["address"],
            EntityKind::PurchaseOrders => &["lineItems"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
