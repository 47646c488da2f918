use async_trait::async_trait;
use docstore_domain::{
    Consignment, ConsignmentKind, ConsignmentUpdate, ExternalId, NoLines, RowId, Stamp,
};
use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;

use crate::infrastructure::ports::RepoError;
use crate::infrastructure::sqlite::document_repo::{DocumentSchema, LineTable};
use crate::infrastructure::sqlite::helpers::{insert_row, RowExt, NEW_ROW_COLUMNS, NEW_ROW_VALUES};

/// Header-only: consignments own sub-resources but no lines.
pub struct ConsignmentSchema;

#[async_trait]
impl DocumentSchema for ConsignmentSchema {
    type Kind = ConsignmentKind;

    const HEADER_TABLE: &'static str = "consignments";
    const LINES: Option<LineTable> = None;

    async fn insert_header(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header: &Consignment,
    ) -> Result<RowId, RepoError> {
        let sql = format!(
            "INSERT INTO {} (consignment_ref, carrier_reference, summary_description, \
             declared_value, consignor_address_id, delivery_location_id, tax_scheme_id, \
             {NEW_ROW_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})",
            Self::HEADER_TABLE
        );
        let query = sqlx::query(&sql)
            .bind(header.consignment_ref.as_str())
            .bind(header.carrier_reference.as_deref())
            .bind(header.summary_description.as_deref())
            .bind(header.declared_value.as_deref())
            .bind(header.consignor_address_key.map(RowId::get))
            .bind(header.delivery_location_key.map(RowId::get))
            .bind(header.tax_scheme_key.map(RowId::get));
        insert_row(conn, query, id, stamp, "insert_consignment").await
    }

    async fn insert_line(
        &self,
        _conn: &mut SqliteConnection,
        _id: ExternalId,
        _stamp: &Stamp,
        _header_key: RowId,
        line: &NoLines,
    ) -> Result<RowId, RepoError> {
        match *line {}
    }

    fn header_fields(&self, row: &SqliteRow) -> Result<Consignment, RepoError> {
        Ok(Consignment {
            consignment_ref: row.string("consignment_ref")?,
            carrier_reference: row.optional_string("carrier_reference")?,
            summary_description: row.optional_string("summary_description")?,
            declared_value: row.optional_string("declared_value")?,
            consignor_address_key: row.optional_key("consignor_address_id")?,
            delivery_location_key: row.optional_key("delivery_location_id")?,
            tax_scheme_key: row.optional_key("tax_scheme_id")?,
        })
    }

    fn line_fields(&self, _row: &SqliteRow) -> Result<NoLines, RepoError> {
        Err(RepoError::decode("lines", "consignments have no line table"))
    }

    fn update_columns<'u>(
        &self,
        update: &'u ConsignmentUpdate,
    ) -> Vec<(&'static str, Option<&'u str>)> {
        vec![
            ("carrier_reference", update.carrier_reference.as_deref()),
            ("summary_description", update.summary_description.as_deref()),
        ]
    }
}
