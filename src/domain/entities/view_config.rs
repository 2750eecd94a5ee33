use serde::{Deserialize, Serialize};

use crate::domain::entities::criteria::SortSpec;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
pub const INVENTORY_API_BASE: &str = "/api/v1/inventory/inventory";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregateDef {
    Count {
        name: String,
    },
    CountBy {
        name: String,
        field: String,
    },
    Sum {
        name: String,
        field: String,
    },
    Average {
        name: String,
        field: String,
        precision: u32,
    },
    Rate {
        name: String,
        field: String,
        values: Vec<String>,
        precision: u32,
    },
}

impl AggregateDef {
    pub fn name(&self) -> &str {
        match self {
            AggregateDef::Count { name }
            | AggregateDef::CountBy { name, .. }
            | AggregateDef::Sum { name, .. }
            | AggregateDef::Average { name, .. }
            | AggregateDef::Rate { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub header: String,
    pub field: String,
}

/// Everything one report screen needs: which fields exist, which of them
/// drive each filter dimension, what to summarise and what to export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub key: String,
    pub title: String,
    pub endpoint: String,
    pub fields: Vec<FieldDef>,
    pub date_fields: Vec<String>,
    pub status_field: Option<String>,
    pub search_fields: Vec<String>,
    pub category_fields: Vec<String>,
    pub aggregates: Vec<AggregateDef>,
    pub export_columns: Vec<ExportColumn>,
    pub default_sort: Option<SortSpec>,
    pub items_per_page: usize,
}

impl ViewConfig {
    pub fn builder(
        key: impl Into<String>,
        title: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> ViewConfigBuilder {
        ViewConfigBuilder {
            config: ViewConfig {
                key: key.into(),
                title: title.into(),
                endpoint: endpoint.into(),
                fields: Vec::new(),
                date_fields: Vec::new(),
                status_field: None,
                search_fields: Vec::new(),
                category_fields: Vec::new(),
                aggregates: Vec::new(),
                export_columns: Vec::new(),
                default_sort: None,
                items_per_page: DEFAULT_ITEMS_PER_PAGE,
            },
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn field_kind(&self, key: &str) -> FieldKind {
        self.field(key).map_or(FieldKind::Text, |field| field.kind)
    }

    pub fn export_file_name(&self) -> String {
        format!("{}_export.csv", self.key)
    }

    pub fn presets() -> Vec<ViewConfig> {
        vec![
            Self::transfers(),
            Self::stock(),
            Self::transactions(),
            Self::purchase_orders(),
            Self::sales(),
        ]
    }

    pub fn preset(key: &str) -> Option<ViewConfig> {
        Self::presets().into_iter().find(|config| config.key == key)
    }

    pub fn transfers() -> ViewConfig {
        ViewConfig::builder(
            "transfers",
            "Transfer Reports",
            format!("{INVENTORY_API_BASE}/warehouses/transfers"),
        )
        .field("created_at", "Date", FieldKind::Date)
        .field("id", "Transfer ID", FieldKind::Text)
        .field("transfer_number", "Transfer #", FieldKind::Text)
        .field("product_id", "Product", FieldKind::Category)
        .field("quantity", "Quantity", FieldKind::Number)
        .field("from_warehouse_id", "Source Warehouse", FieldKind::Category)
        .field("to_warehouse_id", "Destination Warehouse", FieldKind::Category)
        .field("status", "Status", FieldKind::Category)
        .date_fields(["created_at", "transfer_date"])
        .status_field("status")
        .search_fields(["id", "transfer_number", "product_id", "notes"])
        .category_fields(["from_warehouse_id", "to_warehouse_id", "product_id"])
        .aggregate(AggregateDef::Count {
            name: "total_transfers".into(),
        })
        .aggregate(AggregateDef::Sum {
            name: "total_quantity".into(),
            field: "quantity".into(),
        })
        .aggregate(AggregateDef::CountBy {
            name: "by_status".into(),
            field: "status".into(),
        })
        .aggregate(AggregateDef::Rate {
            name: "completion_rate".into(),
            field: "status".into(),
            values: vec!["completed".into()],
            precision: 1,
        })
        .export_column("Date", "created_at")
        .export_column("Transfer ID", "id")
        .export_column("Product", "product_id")
        .export_column("Quantity", "quantity")
        .export_column("Source Warehouse", "from_warehouse_id")
        .export_column("Destination Warehouse", "to_warehouse_id")
        .export_column("Status", "status")
        .build()
    }

    pub fn stock() -> ViewConfig {
        ViewConfig::builder(
            "stock",
            "Warehouse Stock",
            format!("{INVENTORY_API_BASE}/warehouse-stocks"),
        )
        .field("product_id", "Product", FieldKind::Category)
        .field("warehouse_id", "Warehouse", FieldKind::Category)
        .field("bin_location", "Bin", FieldKind::Text)
        .field("quantity", "Quantity", FieldKind::Number)
        .field("reserved_quantity", "Reserved", FieldKind::Number)
        .field("available_quantity", "Available", FieldKind::Number)
        .field("updated_at", "Last Updated", FieldKind::Date)
        .date_fields(["updated_at", "created_at"])
        .search_fields(["product_id", "bin_location", "notes"])
        .category_fields(["warehouse_id", "product_id"])
        .aggregate(AggregateDef::Count {
            name: "stock_entries".into(),
        })
        .aggregate(AggregateDef::Sum {
            name: "total_quantity".into(),
            field: "quantity".into(),
        })
        .aggregate(AggregateDef::Sum {
            name: "total_reserved".into(),
            field: "reserved_quantity".into(),
        })
        .aggregate(AggregateDef::CountBy {
            name: "by_warehouse".into(),
            field: "warehouse_id".into(),
        })
        .export_column("Product", "product_id")
        .export_column("Warehouse", "warehouse_id")
        .export_column("Bin", "bin_location")
        .export_column("Quantity", "quantity")
        .export_column("Reserved", "reserved_quantity")
        .export_column("Available", "available_quantity")
        .build()
    }

    pub fn transactions() -> ViewConfig {
        ViewConfig::builder(
            "transactions",
            "Inventory Transactions",
            format!("{INVENTORY_API_BASE}/transactions"),
        )
        .field("created_at", "Date", FieldKind::Date)
        .field("transaction_type", "Type", FieldKind::Category)
        .field("product_name", "Product", FieldKind::Text)
        .field("reference_id", "Reference", FieldKind::Text)
        .field("quantity", "Quantity", FieldKind::Number)
        .field("unit_price", "Unit Price", FieldKind::Number)
        .field("status", "Status", FieldKind::Category)
        .field("notes", "Notes", FieldKind::Text)
        .date_fields(["created_at"])
        .status_field("transaction_type")
        .search_fields(["product_name", "category", "notes"])
        .category_fields(["status", "category"])
        .aggregate(AggregateDef::Count {
            name: "total_transactions".into(),
        })
        .aggregate(AggregateDef::CountBy {
            name: "by_type".into(),
            field: "transaction_type".into(),
        })
        .aggregate(AggregateDef::Sum {
            name: "total_quantity".into(),
            field: "quantity".into(),
        })
        .aggregate(AggregateDef::Average {
            name: "average_unit_price".into(),
            field: "unit_price".into(),
            precision: 2,
        })
        .aggregate(AggregateDef::Rate {
            name: "inbound_rate".into(),
            field: "transaction_type".into(),
            values: vec!["inbound".into()],
            precision: 1,
        })
        .export_column("Date", "created_at")
        .export_column("Type", "transaction_type")
        .export_column("Reference", "reference_id")
        .export_column("Quantity", "quantity")
        .export_column("Notes", "notes")
        .default_sort(SortSpec::desc("created_at"))
        .items_per_page(8)
        .build()
    }

    pub fn purchase_orders() -> ViewConfig {
        ViewConfig::builder(
            "purchase_orders",
            "Purchase Orders",
            format!("{INVENTORY_API_BASE}/purchase-orders"),
        )
        .field("order_date", "Order Date", FieldKind::Date)
        .field("po_number", "PO Number", FieldKind::Text)
        .field("supplier.name", "Supplier", FieldKind::Text)
        .field("total_amount", "Total", FieldKind::Number)
        .field("status", "Status", FieldKind::Category)
        .date_fields(["order_date", "created_at"])
        .status_field("status")
        .search_fields(["po_number", "supplier.name", "supplier_id"])
        .category_fields(["supplier_id"])
        .aggregate(AggregateDef::Count {
            name: "total_orders".into(),
        })
        .aggregate(AggregateDef::Sum {
            name: "total_amount".into(),
            field: "total_amount".into(),
        })
        .aggregate(AggregateDef::CountBy {
            name: "by_status".into(),
            field: "status".into(),
        })
        .aggregate(AggregateDef::Rate {
            name: "received_rate".into(),
            field: "status".into(),
            values: vec!["received".into(), "completed".into()],
            precision: 1,
        })
        .export_column("Order Date", "order_date")
        .export_column("PO Number", "po_number")
        .export_column("Supplier", "supplier.name")
        .export_column("Total", "total_amount")
        .export_column("Status", "status")
        .default_sort(SortSpec::desc("order_date"))
        .build()
    }

    pub fn sales() -> ViewConfig {
        ViewConfig::builder("sales", "Sales Orders", format!("{INVENTORY_API_BASE}/sales"))
            .field("sale_date", "Sale Date", FieldKind::Date)
            .field("id", "Order ID", FieldKind::Text)
            .field("customer_name", "Customer", FieldKind::Text)
            .field("total_amount", "Total", FieldKind::Number)
            .field("status", "Status", FieldKind::Category)
            .date_fields(["sale_date", "created_at"])
            .status_field("status")
            .search_fields(["id", "customer_name", "notes"])
            .category_fields(["customer_name"])
            .aggregate(AggregateDef::Count {
                name: "total_sales".into(),
            })
            .aggregate(AggregateDef::Sum {
                name: "total_revenue".into(),
                field: "total_amount".into(),
            })
            .aggregate(AggregateDef::Average {
                name: "average_order_value".into(),
                field: "total_amount".into(),
                precision: 2,
            })
            .aggregate(AggregateDef::CountBy {
                name: "by_status".into(),
                field: "status".into(),
            })
            .export_column("Sale Date", "sale_date")
            .export_column("Order ID", "id")
            .export_column("Customer", "customer_name")
            .export_column("Total", "total_amount")
            .export_column("Status", "status")
            .build()
    }
}

pub struct ViewConfigBuilder {
    config: ViewConfig,
}

impl ViewConfigBuilder {
    pub fn field(mut self, key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        self.config.fields.push(FieldDef {
            key: key.into(),
            label: label.into(),
            kind,
        });
        self
    }

    pub fn date_fields<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.date_fields = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn status_field(mut self, key: impl Into<String>) -> Self {
        self.config.status_field = Some(key.into());
        self
    }

    pub fn search_fields<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.search_fields = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn category_fields<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.category_fields = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn aggregate(mut self, aggregate: AggregateDef) -> Self {
        self.config.aggregates.push(aggregate);
        self
    }

    pub fn export_column(mut self, header: impl Into<String>, field: impl Into<String>) -> Self {
        self.config.export_columns.push(ExportColumn {
            header: header.into(),
            field: field.into(),
        });
        self
    }

    pub fn default_sort(mut self, sort: SortSpec) -> Self {
        self.config.default_sort = Some(sort);
        self
    }

    pub fn items_per_page(mut self, items_per_page: usize) -> Self {
        self.config.items_per_page = items_per_page.max(1);
        self
    }

    pub fn build(self) -> ViewConfig {
        self.config
    }
}
