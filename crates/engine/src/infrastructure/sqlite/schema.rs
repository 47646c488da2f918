//! SQLite schema: one table per entity, all sharing the audit columns.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

/// `CREATE TABLE` for an entity with a surrogate key, an external id and the
/// status/audit columns around its own columns.
macro_rules! audited_table {
    ($name:literal, $($column:literal),* $(,)?) => {
        concat!(
            "CREATE TABLE IF NOT EXISTS ", $name, " (",
            "id INTEGER PRIMARY KEY AUTOINCREMENT, ",
            "uuid BLOB NOT NULL UNIQUE CHECK (length(uuid) = 16), ",
            $($column, ", ",)*
            "status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')), ",
            "created_by TEXT NOT NULL, ",
            "updated_by TEXT NOT NULL, ",
            "created_at TEXT NOT NULL, ",
            "updated_at TEXT NOT NULL)"
        )
    };
}

const TABLES: &[&str] = &[
    audited_table!(
        "addresses",
        "street_name TEXT",
        "additional_street_name TEXT",
        "building_number TEXT",
        "city_name TEXT",
        "postal_zone TEXT",
        "country_subentity TEXT",
        "country_code TEXT",
    ),
    audited_table!(
        "locations",
        "description TEXT NOT NULL",
        "conditions TEXT",
        "country_subentity TEXT",
        "latitude TEXT",
        "longitude TEXT",
    ),
    audited_table!(
        "tax_schemes",
        "code TEXT NOT NULL",
        "name TEXT",
        "tax_type_code TEXT",
        "currency_code TEXT",
    ),
    audited_table!(
        "parties",
        "name TEXT NOT NULL",
        "registration_name TEXT",
        "company_id TEXT",
        "endpoint_id TEXT",
        "industry_classification TEXT",
        "postal_address_id INTEGER REFERENCES addresses(id)",
        "party_tax_scheme_id INTEGER REFERENCES tax_schemes(id)",
        // 0 marks a root
        "parent_id INTEGER NOT NULL DEFAULT 0",
        "level INTEGER NOT NULL DEFAULT 0 CHECK (level >= 0)",
        "child_count INTEGER NOT NULL DEFAULT 0 CHECK (child_count >= 0)",
        "leaf INTEGER NOT NULL DEFAULT 0",
    ),
    audited_table!(
        "party_relationships",
        "parent_id INTEGER NOT NULL REFERENCES parties(id)",
        "child_id INTEGER NOT NULL UNIQUE REFERENCES parties(id)",
    ),
    audited_table!(
        "purchase_orders",
        "order_number TEXT NOT NULL",
        "issue_date TEXT NOT NULL",
        "note TEXT",
        "currency_code TEXT",
        "buyer_party_id INTEGER REFERENCES parties(id)",
        "seller_party_id INTEGER REFERENCES parties(id)",
        "delivery_address_id INTEGER REFERENCES addresses(id)",
    ),
    audited_table!(
        "purchase_order_lines",
        "purchase_order_id INTEGER NOT NULL REFERENCES purchase_orders(id)",
        "line_number TEXT NOT NULL",
        "item_name TEXT NOT NULL",
        "quantity TEXT NOT NULL",
        "unit_code TEXT",
        "price_amount TEXT",
    ),
    audited_table!(
        "shipments",
        "shipment_ref TEXT NOT NULL",
        "handling_code TEXT",
        "gross_weight TEXT",
        "delivery_instructions TEXT",
        "origin_address_id INTEGER REFERENCES addresses(id)",
        "delivery_address_id INTEGER REFERENCES addresses(id)",
        "exit_location_id INTEGER REFERENCES locations(id)",
    ),
    audited_table!(
        "goods_items",
        "shipment_id INTEGER NOT NULL REFERENCES shipments(id)",
        "sequence_number TEXT NOT NULL",
        "description TEXT NOT NULL",
        "quantity TEXT NOT NULL",
        "declared_value TEXT",
        "origin_address_id INTEGER REFERENCES addresses(id)",
    ),
    audited_table!(
        "despatch_advices",
        "despatch_number TEXT NOT NULL",
        "issue_date TEXT NOT NULL",
        "note TEXT",
        "order_reference TEXT",
        "despatch_address_id INTEGER REFERENCES addresses(id)",
    ),
    audited_table!(
        "despatch_lines",
        "despatch_advice_id INTEGER NOT NULL REFERENCES despatch_advices(id)",
        "line_number TEXT NOT NULL",
        "item_name TEXT NOT NULL",
        "delivered_quantity TEXT NOT NULL",
        "backorder_quantity TEXT",
        "outstanding_reason TEXT",
    ),
    audited_table!(
        "receipt_advices",
        "receipt_number TEXT NOT NULL",
        "issue_date TEXT NOT NULL",
        "note TEXT",
        "despatch_reference TEXT",
        "receipt_address_id INTEGER REFERENCES addresses(id)",
    ),
    audited_table!(
        "receipt_lines",
        "receipt_advice_id INTEGER NOT NULL REFERENCES receipt_advices(id)",
        "line_number TEXT NOT NULL",
        "item_name TEXT NOT NULL",
        "received_quantity TEXT NOT NULL",
        "short_quantity TEXT",
        "reject_reason TEXT",
    ),
    audited_table!(
        "consignments",
        "consignment_ref TEXT NOT NULL",
        "carrier_reference TEXT",
        "summary_description TEXT",
        "declared_value TEXT",
        "consignor_address_id INTEGER REFERENCES addresses(id)",
        "delivery_location_id INTEGER REFERENCES locations(id)",
        "tax_scheme_id INTEGER REFERENCES tax_schemes(id)",
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS parties_parent ON parties (parent_id)",
    "CREATE INDEX IF NOT EXISTS party_relationships_parent ON party_relationships (parent_id)",
    "CREATE INDEX IF NOT EXISTS purchase_order_lines_header ON purchase_order_lines (purchase_order_id)",
    "CREATE INDEX IF NOT EXISTS goods_items_header ON goods_items (shipment_id)",
    "CREATE INDEX IF NOT EXISTS despatch_lines_header ON despatch_lines (despatch_advice_id)",
    "CREATE INDEX IF NOT EXISTS receipt_lines_header ON receipt_lines (receipt_advice_id)",
];

/// Create every table and index. Idempotent; called once on startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in TABLES.iter().chain(INDEXES) {
        sqlx::query(*statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    tracing::info!(
        tables = TABLES.len(),
        indexes = INDEXES.len(),
        "SQLite schema initialized"
    );
    Ok(())
}
