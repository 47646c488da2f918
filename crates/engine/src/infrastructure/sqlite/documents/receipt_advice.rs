use async_trait::async_trait;
use docstore_domain::{
    ExternalId, ReceiptAdvice, ReceiptAdviceKind, ReceiptAdviceUpdate, ReceiptLine, RowId, Stamp,
};
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;

use crate::infrastructure::ports::RepoError;
use crate::infrastructure::sqlite::document_repo::{DocumentSchema, LineTable};
use crate::infrastructure::sqlite::helpers::{insert_row, RowExt, NEW_ROW_COLUMNS, NEW_ROW_VALUES};

pub struct ReceiptAdviceSchema;

#[async_trait]
impl DocumentSchema for ReceiptAdviceSchema {
    type Kind = ReceiptAdviceKind;

    const HEADER_TABLE: &'static str = "receipt_advices";
    const LINES: Option<LineTable> = Some(LineTable {
        table: "receipt_lines",
        header_column: "receipt_advice_id",
    });

    async fn insert_header(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header: &ReceiptAdvice,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO {} (receipt_number, issue_date, note, despatch_reference, \
             receipt_address_id, {NEW_ROW_COLUMNS}) VALUES (?, ?, ?, ?, ?, {NEW_ROW_VALUES})",
            Self::HEADER_TABLE
        );
        let query = sqlx::query(&sql)
            .bind(header.receipt_number.as_str())
            .bind(header.issue_date.as_str())
            .bind(header.note.as_deref())
            .bind(header.despatch_reference.as_deref())
            .bind(header.receipt_address_key.map(RowId::get));
        insert_row(conn, query, id, stamp, "insert_receipt_advice").await
    }

    async fn insert_line(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header_key: RowId,
        line: &ReceiptLine,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO receipt_lines (receipt_advice_id, line_number, item_name, \
             received_quantity, short_quantity, reject_reason, {NEW_ROW_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})"
        );
        let query = sqlx::query(&sql)
            .bind(header_key.get())
            .bind(line.line_number.as_str())
            .bind(line.item_name.as_str())
            .bind(line.received_quantity.as_str())
            .bind(line.short_quantity.as_deref())
            .bind(line.reject_reason.as_deref());
        insert_row(conn, query, id, stamp, "insert_receipt_line").await
    }

    fn header_fields(&self, row: &SqliteRow) -> Result<ReceiptAdvice, RepoError> {
        Ok(ReceiptAdvice {
            receipt_number: row.string("receipt_number")?,
            issue_date: row.string("issue_date")?,
            note: row.optional_string("note")?,
            despatch_reference: row.optional_string("despatch_reference")?,
            receipt_address_key: row.optional_key("receipt_address_id")?,
        })
    }

    fn line_fields(&self, row: &SqliteRow) -> Result<ReceiptLine, RepoError> {
        Ok(ReceiptLine {
            line_number: row.string("line_number")?,
            item_name: row.string("item_name")?,
            received_quantity: row.string("received_quantity")?,
            short_quantity: row.optional_string("short_quantity")?,
            reject_reason: row.optional_string("reject_reason")?,
        })
    }

    fn update_columns<'u>(
        &self,
        update: &'u ReceiptAdviceUpdate,
    ) -> Vec<(&'static str, Option<&'u str>)> {
        vec![("note", update.note.as_deref())]
    }
}
