use async_trait::async_trait;
use docstore_domain::{
    ExternalId, PurchaseOrder, PurchaseOrderKind, PurchaseOrderLine, PurchaseOrderUpdate, RowId,
    Stamp,
};
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;

use crate::infrastructure::ports::RepoError;
use crate::infrastructure::sqlite::document_repo::{DocumentSchema, LineTable};
use crate::infrastructure::sqlite::helpers::{insert_row, RowExt, NEW_ROW_COLUMNS, NEW_ROW_VALUES};

pub struct PurchaseOrderSchema;

#[async_trait]
impl DocumentSchema for PurchaseOrderSchema {
    type Kind = PurchaseOrderKind;

    const HEADER_TABLE: &'static str = "purchase_orders";
    const LINES: Option<LineTable> = Some(LineTable {
        table: "purchase_order_lines",
        header_column: "purchase_order_id",
    });

    async fn insert_header(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header: &PurchaseOrder,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO {} (order_number, issue_date, note, currency_code, buyer_party_id, \
             seller_party_id, delivery_address_id, {NEW_ROW_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})",
            Self::HEADER_TABLE
        );
        let query = sqlx::query(&sql)
            .bind(header.order_number.as_str())
            .bind(header.issue_date.as_str())
            .bind(header.note.as_deref())
            .bind(header.currency_code.as_deref())
            .bind(header.buyer_party_key.map(RowId::get))
            .bind(header.seller_party_key.map(RowId::get))
            .bind(header.delivery_address_key.map(RowId::get));
        insert_row(conn, query, id, stamp, "insert_purchase_order").await
    }

    async fn insert_line(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header_key: RowId,
        line: &PurchaseOrderLine,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO purchase_order_lines (purchase_order_id, line_number, item_name, \
             quantity, unit_code, price_amount, {NEW_ROW_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})"
        );
        let query = sqlx::query(&sql)
            .bind(header_key.get())
            .bind(line.line_number.as_str())
            .bind(line.item_name.as_str())
            .bind(line.quantity.as_str())
            .bind(line.unit_code.as_deref())
            .bind(line.price_amount.as_deref());
        insert_row(conn, query, id, stamp, "insert_purchase_order_line").await
    }

    fn header_fields(&self, row: &SqliteRow) -> Result<PurchaseOrder, RepoError> {
        Ok(PurchaseOrder {
            order_number: row.string("order_number")?,
            issue_date: row.string("issue_date")?,
            note: row.optional_string("note")?,
            currency_code: row.optional_string("currency_code")?,
            buyer_party_key: row.optional_key("buyer_party_id")?,
            seller_party_key: row.optional_key("seller_party_id")?,
            delivery_address_key: row.optional_key("delivery_address_id")?,
        })
    }

    fn line_fields(&self, row: &SqliteRow) -> Result<PurchaseOrderLine, RepoError> {
        Ok(PurchaseOrderLine {
            line_number: row.string("line_number")?,
            item_name: row.string("item_name")?,
            quantity: row.string("quantity")?,
            unit_code: row.optional_string("unit_code")?,
            price_amount: row.optional_string("price_amount")?,
        })
    }

    fn update_columns<'u>(
        &self,
        update: &'u PurchaseOrderUpdate,
    ) -> Vec<(&'static str, Option<&'u str>)> {
        vec![
            ("note", update.note.as_deref()),
            ("currency_code", update.currency_code.as_deref()),
        ]
    }
}
