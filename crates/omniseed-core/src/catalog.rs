//! Built-in catalog for the omniship logistics dataset: 27 tables covering
//! commerce, fleet, delivery, and procurement, with default row counts up to
//! ten million and per-table partition sizes tuned for bulk load.

use std::collections::BTreeMap;

use crate::spec::{ColumnSpec, Sampled, TableSpec, ValueSpec};

/// Effective sizing for one table after configuration overrides.
#[derive(Debug, Clone, Copy)]
pub struct TableSizing {
    pub rows: u64,
    pub partition_size: u64,
}

/// Table name to effective sizing, threaded through every component by
/// parameter.
pub type SizingMap = BTreeMap<String, TableSizing>;

/// An immutable set of table specs plus the explicit load order.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<TableSpec>,
    load_order: Vec<&'static str>,
}

impl Catalog {
    pub fn new(tables: Vec<TableSpec>, load_order: Vec<&'static str>) -> Self {
        Self { tables, load_order }
    }

    /// The built-in omniship catalog.
    pub fn builtin() -> Self {
        Self::new(builtin_tables(), LOAD_ORDER.to_vec())
    }

    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn get(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Declared load order; validated against the dependency graph before a
    /// run starts.
    pub fn load_order(&self) -> &[&'static str] {
        &self.load_order
    }

    /// Load order reversed, for truncating dependents before their parents.
    pub fn reverse_order(&self) -> Vec<String> {
        self.load_order
            .iter()
            .rev()
            .map(|name| (*name).to_string())
            .collect()
    }

    /// Default sizing for every table. Callers overlay configuration
    /// overrides on the returned map.
    pub fn sizing(&self) -> SizingMap {
        self.tables
            .iter()
            .map(|table| {
                (
                    table.name.to_string(),
                    TableSizing {
                        rows: table.default_rows,
                        partition_size: table.default_partition_size,
                    },
                )
            })
            .collect()
    }
}

const LOAD_ORDER: &[&str] = &[
    "categories",
    "users",
    "roles",
    "permissions",
    "rolepermissions",
    "userroles",
    "warehouses",
    "suppliers",
    "products",
    "productvariants",
    "inventory",
    "promotions",
    "taxes",
    "orders",
    "payments",
    "orderitems",
    "vehicles",
    "drivers",
    "maintenancelogs",
    "deliveryshipments",
    "deliveryroutes",
    "routestops",
    "proofofdelivery",
    "purchaseorders",
    "purchaseorderitems",
    "shipments",
    "qualitychecks",
];

const CATEGORIES: &[ColumnSpec] = &[
    ColumnSpec::new("parent_id", ValueSpec::SelfParent { every: 10 }),
    ColumnSpec::new(
        "category_name",
        ValueSpec::Sequence {
            prefix: "category",
            width: 4,
        },
    ),
    ColumnSpec::with_sampled(
        "description",
        ValueSpec::Label {
            prefix: "Category desc ",
            suffix: "",
        },
        Sampled::Words(3),
    ),
];

const USERS: &[ColumnSpec] = &[
    ColumnSpec::with_sampled(
        "username",
        ValueSpec::Sequence {
            prefix: "user",
            width: 9,
        },
        Sampled::Username,
    ),
    ColumnSpec::new(
        "password_hash",
        ValueSpec::Sequence {
            prefix: "hash",
            width: 12,
        },
    ),
    ColumnSpec::with_sampled(
        "email",
        ValueSpec::Email {
            prefix: "user",
            width: 9,
            domain: "example.com",
        },
        Sampled::Email,
    ),
    ColumnSpec::with_sampled(
        "full_name",
        ValueSpec::Sequence {
            prefix: "UserFull",
            width: 9,
        },
        Sampled::FullName,
    ),
    ColumnSpec::new("user_type", ValueSpec::Literal("customer")),
    ColumnSpec::new("created_at", ValueSpec::Timestamp { offset_secs: 0 }),
];

const ROLES: &[ColumnSpec] = &[
    ColumnSpec::new(
        "role_name",
        ValueSpec::Sequence {
            prefix: "role",
            width: 0,
        },
    ),
    ColumnSpec::new(
        "description",
        ValueSpec::Label {
            prefix: "Role ",
            suffix: "",
        },
    ),
];

const PERMISSIONS: &[ColumnSpec] = &[
    ColumnSpec::new(
        "permission_name",
        ValueSpec::Sequence {
            prefix: "permission",
            width: 9,
        },
    ),
    ColumnSpec::new(
        "description",
        ValueSpec::Label {
            prefix: "Permission ",
            suffix: "",
        },
    ),
];

const ROLEPERMISSIONS: &[ColumnSpec] = &[
    ColumnSpec::new(
        "role_id",
        ValueSpec::CrossPairLeft {
            left: "roles",
            right: "permissions",
        },
    ),
    ColumnSpec::new(
        "permission_id",
        ValueSpec::CrossPairRight {
            left: "roles",
            right: "permissions",
        },
    ),
];

const USERROLES: &[ColumnSpec] = &[
    ColumnSpec::new("user_id", ValueSpec::ForeignKey { table: "users" }),
    ColumnSpec::new("role_id", ValueSpec::ForeignKey { table: "roles" }),
];

const WAREHOUSES: &[ColumnSpec] = &[
    ColumnSpec::with_sampled(
        "warehouse_name",
        ValueSpec::Sequence {
            prefix: "wh",
            width: 9,
        },
        Sampled::CompanyName,
    ),
    ColumnSpec::with_sampled(
        "location_country",
        ValueSpec::Cycle {
            prefix: "Country",
            modulo: 200,
        },
        Sampled::Country,
    ),
    ColumnSpec::with_sampled(
        "location_city",
        ValueSpec::Cycle {
            prefix: "City",
            modulo: 1000,
        },
        Sampled::City,
    ),
    ColumnSpec::with_sampled(
        "address",
        ValueSpec::Sequence {
            prefix: "Address",
            width: 9,
        },
        Sampled::StreetAddress,
    ),
    ColumnSpec::new(
        "capacity",
        ValueSpec::Int {
            base: 1000,
            modulo: 100_000,
        },
    ),
];

const SUPPLIERS: &[ColumnSpec] = &[
    ColumnSpec::with_sampled(
        "company_name",
        ValueSpec::Sequence {
            prefix: "supplier",
            width: 6,
        },
        Sampled::CompanyName,
    ),
    ColumnSpec::with_sampled(
        "contact_name",
        ValueSpec::Sequence {
            prefix: "Contact",
            width: 9,
        },
        Sampled::FullName,
    ),
    ColumnSpec::with_sampled(
        "contact_email",
        ValueSpec::Email {
            prefix: "supplier",
            width: 6,
            domain: "supplier.example",
        },
        Sampled::Email,
    ),
    ColumnSpec::with_sampled("phone", ValueSpec::Phone { prefix: "+100000" }, Sampled::Phone),
    ColumnSpec::with_sampled(
        "address",
        ValueSpec::Sequence {
            prefix: "Addr",
            width: 9,
        },
        Sampled::StreetAddress,
    ),
    ColumnSpec::with_sampled(
        "country",
        ValueSpec::Cycle {
            prefix: "Country",
            modulo: 200,
        },
        Sampled::Country,
    ),
];

const PRODUCTS: &[ColumnSpec] = &[
    ColumnSpec::new("category_id", ValueSpec::ForeignKey { table: "categories" }),
    ColumnSpec::with_sampled(
        "product_name",
        ValueSpec::Sequence {
            prefix: "product",
            width: 9,
        },
        Sampled::Words(2),
    ),
    ColumnSpec::new(
        "description",
        ValueSpec::Label {
            prefix: "Product ",
            suffix: " desc",
        },
    ),
    ColumnSpec::with_sampled(
        "brand",
        ValueSpec::SequenceMod {
            prefix: "brand",
            width: 9,
            modulo: 1000,
        },
        Sampled::CompanyName,
    ),
    ColumnSpec::new("created_at", ValueSpec::Timestamp { offset_secs: 0 }),
];

const PRODUCTVARIANTS: &[ColumnSpec] = &[
    ColumnSpec::new("product_id", ValueSpec::ForeignKey { table: "products" }),
    ColumnSpec::new(
        "sku",
        ValueSpec::Sequence {
            prefix: "SKU",
            width: 9,
        },
    ),
    ColumnSpec::new(
        "color",
        ValueSpec::Cycle {
            prefix: "Color",
            modulo: 140,
        },
    ),
    ColumnSpec::new("size", ValueSpec::OneOf(&["XS", "S", "M", "L", "XL"])),
    ColumnSpec::new(
        "weight",
        ValueSpec::Decimal {
            base: 0.1,
            modulo: 1000,
            step: 0.01,
        },
    ),
    ColumnSpec::new(
        "base_price",
        ValueSpec::Decimal {
            base: 5.0,
            modulo: 5000,
            step: 0.1,
        },
    ),
];

const INVENTORY: &[ColumnSpec] = &[
    ColumnSpec::new("warehouse_id", ValueSpec::ForeignKey { table: "warehouses" }),
    ColumnSpec::new(
        "variant_id",
        ValueSpec::ForeignKey {
            table: "productvariants",
        },
    ),
    ColumnSpec::new("quantity", ValueSpec::Int { base: 0, modulo: 2000 }),
    ColumnSpec::new("last_updated", ValueSpec::Timestamp { offset_secs: 0 }),
];

const PROMOTIONS: &[ColumnSpec] = &[
    ColumnSpec::new(
        "promo_name",
        ValueSpec::Sequence {
            prefix: "promo",
            width: 9,
        },
    ),
    ColumnSpec::new(
        "discount_percent",
        ValueSpec::Decimal {
            base: 1.0,
            modulo: 50,
            step: 1.0,
        },
    ),
    ColumnSpec::new("start_date", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new("end_date", ValueSpec::Timestamp { offset_secs: 1000 }),
];

const TAXES: &[ColumnSpec] = &[
    ColumnSpec::new(
        "region",
        ValueSpec::Cycle {
            prefix: "Region",
            modulo: 200,
        },
    ),
    ColumnSpec::new(
        "tax_rate",
        ValueSpec::Decimal {
            base: 0.5,
            modulo: 25,
            step: 1.0,
        },
    ),
];

const ORDERS: &[ColumnSpec] = &[
    ColumnSpec::new("user_id", ValueSpec::ForeignKey { table: "users" }),
    ColumnSpec::new("warehouse_id", ValueSpec::ForeignKey { table: "warehouses" }),
    ColumnSpec::new("order_date", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new(
        "region",
        ValueSpec::Cycle {
            prefix: "Region",
            modulo: 50,
        },
    ),
    ColumnSpec::new("currency_code", ValueSpec::Literal("USD")),
    ColumnSpec::new(
        "subtotal",
        ValueSpec::Decimal {
            base: 10.0,
            modulo: 1000,
            step: 0.5,
        },
    ),
    // Optional references to taxes/promotions, intentionally left NULL.
    ColumnSpec::new("tax_id", ValueSpec::Unpopulated),
    ColumnSpec::new("promo_id", ValueSpec::Unpopulated),
    ColumnSpec::new(
        "total_amount",
        ValueSpec::DecimalWithTax {
            base: 10.0,
            modulo: 1000,
            step: 0.5,
            rate: 0.17,
        },
    ),
    ColumnSpec::new("status", ValueSpec::OneOf(&["pending", "shipped", "delivered"])),
];

const ORDERITEMS: &[ColumnSpec] = &[
    ColumnSpec::new("order_id", ValueSpec::ForeignKey { table: "orders" }),
    ColumnSpec::new(
        "variant_id",
        ValueSpec::ForeignKey {
            table: "productvariants",
        },
    ),
    ColumnSpec::new("quantity", ValueSpec::Int { base: 1, modulo: 5 }),
    ColumnSpec::new(
        "unit_price",
        ValueSpec::Decimal {
            base: 5.0,
            modulo: 400,
            step: 0.25,
        },
    ),
];

const PAYMENTS: &[ColumnSpec] = &[
    ColumnSpec::new("order_id", ValueSpec::ForeignKey { table: "orders" }),
    ColumnSpec::new(
        "payment_method",
        ValueSpec::OneOf(&["card", "paypal", "transfer"]),
    ),
    ColumnSpec::new(
        "amount",
        ValueSpec::Decimal {
            base: 5.0,
            modulo: 2000,
            step: 0.5,
        },
    ),
    ColumnSpec::new("payment_date", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new(
        "transaction_ref",
        ValueSpec::Sequence {
            prefix: "TX",
            width: 9,
        },
    ),
];

const VEHICLES: &[ColumnSpec] = &[
    ColumnSpec::new("vehicle_type", ValueSpec::OneOf(&["truck", "van", "bike"])),
    ColumnSpec::new(
        "license_plate",
        ValueSpec::Sequence {
            prefix: "PLATE",
            width: 9,
        },
    ),
    ColumnSpec::new(
        "capacity_kg",
        ValueSpec::Int {
            base: 500,
            modulo: 20_000,
        },
    ),
    ColumnSpec::new(
        "status",
        ValueSpec::OneOf(&["available", "in_service", "maintenance"]),
    ),
];

const DRIVERS: &[ColumnSpec] = &[
    ColumnSpec::new("user_id", ValueSpec::ForeignKey { table: "users" }),
    ColumnSpec::new(
        "license_number",
        ValueSpec::Sequence {
            prefix: "LIC",
            width: 9,
        },
    ),
    ColumnSpec::with_sampled(
        "phone_number",
        ValueSpec::Phone { prefix: "+200000" },
        Sampled::Phone,
    ),
    ColumnSpec::new("assigned_vehicle", ValueSpec::ForeignKey { table: "vehicles" }),
];

const MAINTENANCELOGS: &[ColumnSpec] = &[
    ColumnSpec::new("vehicle_id", ValueSpec::ForeignKey { table: "vehicles" }),
    ColumnSpec::new("maintenance_date", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::with_sampled(
        "description",
        ValueSpec::Label {
            prefix: "Maintenance entry ",
            suffix: "",
        },
        Sampled::Words(4),
    ),
    ColumnSpec::new(
        "cost",
        ValueSpec::Decimal {
            base: 20.0,
            modulo: 1000,
            step: 0.5,
        },
    ),
    ColumnSpec::new("performed_by", ValueSpec::ForeignKey { table: "users" }),
];

const DELIVERYSHIPMENTS: &[ColumnSpec] = &[
    ColumnSpec::new("order_id", ValueSpec::ForeignKey { table: "orders" }),
    ColumnSpec::new("vehicle_id", ValueSpec::ForeignKey { table: "vehicles" }),
    ColumnSpec::new("driver_id", ValueSpec::ForeignKey { table: "drivers" }),
    ColumnSpec::new("start_time", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new("end_time", ValueSpec::Timestamp { offset_secs: 3600 }),
    ColumnSpec::new(
        "status",
        ValueSpec::OneOf(&["pending", "in_transit", "delivered"]),
    ),
];

const DELIVERYROUTES: &[ColumnSpec] = &[
    ColumnSpec::new(
        "delivery_id",
        ValueSpec::ForeignKey {
            table: "deliveryshipments",
        },
    ),
    ColumnSpec::new(
        "route_name",
        ValueSpec::Sequence {
            prefix: "route",
            width: 9,
        },
    ),
    ColumnSpec::new(
        "distance_km",
        ValueSpec::Decimal {
            base: 1.0,
            modulo: 1000,
            step: 0.1,
        },
    ),
    ColumnSpec::new(
        "estimated_time_min",
        ValueSpec::Int {
            base: 10,
            modulo: 1440,
        },
    ),
];

const ROUTESTOPS: &[ColumnSpec] = &[
    ColumnSpec::new(
        "route_id",
        ValueSpec::ForeignKey {
            table: "deliveryroutes",
        },
    ),
    ColumnSpec::new("stop_order", ValueSpec::Int { base: 1, modulo: 100 }),
    ColumnSpec::with_sampled(
        "address",
        ValueSpec::Sequence {
            prefix: "Addr",
            width: 9,
        },
        Sampled::StreetAddress,
    ),
    ColumnSpec::with_sampled(
        "city",
        ValueSpec::Cycle {
            prefix: "City",
            modulo: 1000,
        },
        Sampled::City,
    ),
    ColumnSpec::with_sampled(
        "country",
        ValueSpec::Cycle {
            prefix: "Country",
            modulo: 200,
        },
        Sampled::Country,
    ),
    ColumnSpec::new("arrival_time", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new("departure_time", ValueSpec::Timestamp { offset_secs: 600 }),
    ColumnSpec::new("status", ValueSpec::OneOf(&["pending", "completed"])),
];

const PROOFOFDELIVERY: &[ColumnSpec] = &[
    ColumnSpec::new("stop_id", ValueSpec::ForeignKey { table: "routestops" }),
    ColumnSpec::new(
        "signature_url",
        ValueSpec::Label {
            prefix: "http://cdn.example/sign_",
            suffix: ".png",
        },
    ),
    ColumnSpec::new(
        "photo_url",
        ValueSpec::Label {
            prefix: "http://cdn.example/photo_",
            suffix: ".jpg",
        },
    ),
    ColumnSpec::new("delivered_at", ValueSpec::Timestamp { offset_secs: 0 }),
];

const PURCHASEORDERS: &[ColumnSpec] = &[
    ColumnSpec::new("supplier_id", ValueSpec::ForeignKey { table: "suppliers" }),
    ColumnSpec::new("warehouse_id", ValueSpec::ForeignKey { table: "warehouses" }),
    ColumnSpec::new("order_date", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new("status", ValueSpec::OneOf(&["pending", "received"])),
    ColumnSpec::new(
        "total_amount",
        ValueSpec::Decimal {
            base: 100.0,
            modulo: 10_000,
            step: 1.5,
        },
    ),
];

const PURCHASEORDERITEMS: &[ColumnSpec] = &[
    ColumnSpec::new(
        "po_id",
        ValueSpec::ForeignKey {
            table: "purchaseorders",
        },
    ),
    ColumnSpec::new(
        "variant_id",
        ValueSpec::ForeignKey {
            table: "productvariants",
        },
    ),
    ColumnSpec::new("quantity_ordered", ValueSpec::Int { base: 1, modulo: 500 }),
    ColumnSpec::new(
        "unit_price",
        ValueSpec::Decimal {
            base: 1.0,
            modulo: 2000,
            step: 0.5,
        },
    ),
];

const SHIPMENTS: &[ColumnSpec] = &[
    ColumnSpec::new(
        "po_id",
        ValueSpec::ForeignKey {
            table: "purchaseorders",
        },
    ),
    ColumnSpec::new("shipped_date", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new("received_date", ValueSpec::Timestamp { offset_secs: 10_000 }),
    ColumnSpec::new(
        "tracking_number",
        ValueSpec::Sequence {
            prefix: "TRK",
            width: 9,
        },
    ),
    ColumnSpec::new("status", ValueSpec::OneOf(&["in_transit", "received"])),
];

const QUALITYCHECKS: &[ColumnSpec] = &[
    ColumnSpec::new("shipment_id", ValueSpec::ForeignKey { table: "shipments" }),
    ColumnSpec::new("checked_by", ValueSpec::ForeignKey { table: "users" }),
    ColumnSpec::new("qc_date", ValueSpec::Timestamp { offset_secs: 0 }),
    ColumnSpec::new("result", ValueSpec::OneOf(&["pass", "fail"])),
    ColumnSpec::with_sampled(
        "remarks",
        ValueSpec::Label {
            prefix: "QC remark ",
            suffix: "",
        },
        Sampled::Words(4),
    ),
];

fn builtin_tables() -> Vec<TableSpec> {
    vec![
        TableSpec {
            name: "categories",
            columns: CATEGORIES,
            default_rows: 50,
            default_partition_size: 50,
            predecessors: &[],
        },
        TableSpec {
            name: "users",
            columns: USERS,
            default_rows: 200_000,
            default_partition_size: 50_000,
            predecessors: &[],
        },
        TableSpec {
            name: "roles",
            columns: ROLES,
            default_rows: 5,
            default_partition_size: 5,
            predecessors: &[],
        },
        TableSpec {
            name: "permissions",
            columns: PERMISSIONS,
            default_rows: 15,
            default_partition_size: 15,
            predecessors: &[],
        },
        TableSpec {
            name: "rolepermissions",
            columns: ROLEPERMISSIONS,
            default_rows: 50,
            default_partition_size: 50,
            predecessors: &["roles", "permissions"],
        },
        TableSpec {
            name: "userroles",
            columns: USERROLES,
            default_rows: 200_000,
            default_partition_size: 50_000,
            predecessors: &["users", "roles"],
        },
        TableSpec {
            name: "warehouses",
            columns: WAREHOUSES,
            default_rows: 10,
            default_partition_size: 10,
            predecessors: &[],
        },
        TableSpec {
            name: "suppliers",
            columns: SUPPLIERS,
            default_rows: 1000,
            default_partition_size: 250,
            predecessors: &[],
        },
        TableSpec {
            name: "products",
            columns: PRODUCTS,
            default_rows: 4000,
            default_partition_size: 1000,
            predecessors: &["categories"],
        },
        TableSpec {
            name: "productvariants",
            columns: PRODUCTVARIANTS,
            default_rows: 20_000,
            default_partition_size: 5000,
            predecessors: &["products"],
        },
        TableSpec {
            name: "inventory",
            columns: INVENTORY,
            default_rows: 40_000,
            default_partition_size: 10_000,
            predecessors: &["warehouses", "productvariants"],
        },
        TableSpec {
            name: "promotions",
            columns: PROMOTIONS,
            default_rows: 200,
            default_partition_size: 200,
            predecessors: &[],
        },
        TableSpec {
            name: "taxes",
            columns: TAXES,
            default_rows: 200,
            default_partition_size: 200,
            predecessors: &[],
        },
        TableSpec {
            name: "orders",
            columns: ORDERS,
            default_rows: 1_000_000,
            default_partition_size: 100_000,
            predecessors: &["users", "warehouses"],
        },
        TableSpec {
            name: "orderitems",
            columns: ORDERITEMS,
            default_rows: 10_000_000,
            default_partition_size: 200_000,
            predecessors: &["orders", "productvariants"],
        },
        TableSpec {
            name: "payments",
            columns: PAYMENTS,
            default_rows: 1_000_000,
            default_partition_size: 100_000,
            predecessors: &["orders"],
        },
        TableSpec {
            name: "vehicles",
            columns: VEHICLES,
            default_rows: 200,
            default_partition_size: 200,
            predecessors: &[],
        },
        TableSpec {
            name: "drivers",
            columns: DRIVERS,
            default_rows: 500,
            default_partition_size: 250,
            predecessors: &["users", "vehicles"],
        },
        TableSpec {
            name: "maintenancelogs",
            columns: MAINTENANCELOGS,
            default_rows: 200_000,
            default_partition_size: 50_000,
            predecessors: &["vehicles", "users"],
        },
        TableSpec {
            name: "deliveryshipments",
            columns: DELIVERYSHIPMENTS,
            default_rows: 500_000,
            default_partition_size: 100_000,
            predecessors: &["orders", "vehicles", "drivers"],
        },
        TableSpec {
            name: "deliveryroutes",
            columns: DELIVERYROUTES,
            default_rows: 500_000,
            default_partition_size: 100_000,
            predecessors: &["deliveryshipments"],
        },
        TableSpec {
            name: "routestops",
            columns: ROUTESTOPS,
            default_rows: 400_000,
            default_partition_size: 100_000,
            predecessors: &["deliveryroutes"],
        },
        TableSpec {
            name: "proofofdelivery",
            columns: PROOFOFDELIVERY,
            default_rows: 400_000,
            default_partition_size: 100_000,
            predecessors: &["routestops"],
        },
        TableSpec {
            name: "purchaseorders",
            columns: PURCHASEORDERS,
            default_rows: 200_000,
            default_partition_size: 50_000,
            predecessors: &["suppliers", "warehouses"],
        },
        TableSpec {
            name: "purchaseorderitems",
            columns: PURCHASEORDERITEMS,
            default_rows: 1_000_000,
            default_partition_size: 100_000,
            predecessors: &["purchaseorders", "productvariants"],
        },
        TableSpec {
            name: "shipments",
            columns: SHIPMENTS,
            default_rows: 200_000,
            default_partition_size: 50_000,
            predecessors: &["purchaseorders"],
        },
        TableSpec {
            name: "qualitychecks",
            columns: QUALITYCHECKS,
            default_rows: 200_000,
            default_partition_size: 50_000,
            predecessors: &["shipments", "users"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_load_order_exactly() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.tables().len(), catalog.load_order().len());
        for name in catalog.load_order() {
            assert!(catalog.get(name).is_some(), "missing table spec for {name}");
        }
    }

    #[test]
    fn predecessors_reference_known_tables() {
        let catalog = Catalog::builtin();
        for table in catalog.tables() {
            for predecessor in table.predecessors {
                assert!(
                    catalog.get(predecessor).is_some(),
                    "{} references unknown predecessor {}",
                    table.name,
                    predecessor
                );
            }
        }
    }

    #[test]
    fn largest_table_is_orderitems() {
        let catalog = Catalog::builtin();
        let orderitems = catalog.get("orderitems").unwrap();
        assert_eq!(orderitems.default_rows, 10_000_000);
        for table in catalog.tables() {
            assert!(table.default_rows <= orderitems.default_rows);
        }
    }
}
