//! Sub-resource writer and lookups: addresses, locations, tax schemes.
//!
//! The insert functions run on a connection the caller already holds, usually
//! inside the caller's transaction, and never open one of their own.

use async_trait::async_trait;
use docstore_domain::{
    Address, Attachment, AttachmentKeys, ExternalId, Location, Record, RowId, Stamp, SubResource,
    TaxScheme,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{SqliteConnection, SqlitePool};

use super::helpers::{fetch_by_key, insert_row, RowExt, NEW_ROW_COLUMNS, NEW_ROW_VALUES};
use crate::infrastructure::ports::{RepoError, SubResourceRepo};

pub(crate) const ADDRESSES: &str = "addresses";
pub(crate) const LOCATIONS: &str = "locations";
pub(crate) const TAX_SCHEMES: &str = "tax_schemes";

// =============================================================================
// Writer
// =============================================================================

/// Insert one sub-resource and return its surrogate key.
pub(crate) async fn insert_sub_resource(
    conn: &mut SqliteConnection,
    resource: &SubResource,
    stamp: &Stamp,
) -> Result<RowId, RepoError> {
    match resource {
        SubResource::Address(address) => insert_address(conn, address, stamp).await,
        SubResource::Location(location) => insert_location(conn, location, stamp).await,
        SubResource::TaxScheme(scheme) => {
            insert_tax_scheme(conn, ExternalId::new(), scheme, stamp).await
        }
    }
}

/// Insert every attachment in order, collecting the generated keys by slot.
pub(crate) async fn insert_attachments(
    conn: &mut SqliteConnection,
    attachments: &[Attachment],
    stamp: &Stamp,
) -> Result<AttachmentKeys, RepoError> {
    let mut keys = AttachmentKeys::new();
    for attachment in attachments {
        let key = insert_sub_resource(conn, &attachment.resource, stamp).await?;
        tracing::debug!(
            slot = attachment.slot.as_str(),
            kind = attachment.resource.kind(),
            key = %key,
            "Inserted sub-resource"
        );
        keys = keys.with(attachment.slot, key);
    }
    Ok(keys)
}

pub(crate) async fn insert_address(
    conn: &mut SqliteConnection,
    address: &Address,
    stamp: &Stamp,
) -> Result<RowId, RepoError> {
    let sql = format!(
        "INSERT INTO {ADDRESSES} (street_name, additional_street_name, building_number, \
         city_name, postal_zone, country_subentity, country_code, {NEW_ROW_COLUMNS}) \
         VALUES (?, ?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})"
    );
    let query = sqlx::query(&sql)
        .bind(address.street_name.as_deref())
        .bind(address.additional_street_name.as_deref())
        .bind(address.building_number.as_deref())
        .bind(address.city_name.as_deref())
        .bind(address.postal_zone.as_deref())
        .bind(address.country_subentity.as_deref())
        .bind(address.country_code.as_deref());

    insert_row(conn, query, ExternalId::new(), stamp, "insert_address").await
}

pub(crate) async fn insert_location(
    conn: &mut SqliteConnection,
    location: &Location,
    stamp: &Stamp,
) -> Result<RowId, RepoError> {
    let sql = format!(
        "INSERT INTO {LOCATIONS} (description, conditions, country_subentity, latitude, \
         longitude, {NEW_ROW_COLUMNS}) VALUES (?, ?, ?, ?, ?, {NEW_ROW_VALUES})"
    );
    let query = sqlx::query(&sql)
        .bind(location.description.as_str())
        .bind(location.conditions.as_deref())
        .bind(location.country_subentity.as_deref())
        .bind(location.latitude.as_deref())
        .bind(location.longitude.as_deref());

    insert_row(conn, query, ExternalId::new(), stamp, "insert_location").await
}

/// Standalone tax schemes pass their own id; attached ones get a fresh one.
pub(crate) async fn insert_tax_scheme(
    conn: &mut SqliteConnection,
    id: ExternalId,
    scheme: &TaxScheme,
    stamp: &Stamp,
) -> Result<RowId, RepoError> {
    let sql = format!(
        "INSERT INTO {TAX_SCHEMES} (code, name, tax_type_code, currency_code, {NEW_ROW_COLUMNS}) \
         VALUES (?, ?, ?, ?, {NEW_ROW_VALUES})"
    );
    let query = sqlx::query(&sql)
        .bind(scheme.code.as_str())
        .bind(scheme.name.as_deref())
        .bind(scheme.tax_type_code.as_deref())
        .bind(scheme.currency_code.as_deref());

    insert_row(conn, query, id, stamp, "insert_tax_scheme").await
}

// =============================================================================
// Row conversion
// =============================================================================

pub(crate) fn row_to_address(row: &SqliteRow) -> Result<Record<Address>, RepoError> {
    row.record(Address {
        street_name: row.optional_string("street_name")?,
        additional_street_name: row.optional_string("additional_street_name")?,
        building_number: row.optional_string("building_number")?,
        city_name: row.optional_string("city_name")?,
        postal_zone: row.optional_string("postal_zone")?,
        country_subentity: row.optional_string("country_subentity")?,
        country_code: row.optional_string("country_code")?,
    })
}

pub(crate) fn row_to_location(row: &SqliteRow) -> Result<Record<Location>, RepoError> {
    row.record(Location {
        description: row.string("description")?,
        conditions: row.optional_string("conditions")?,
        country_subentity: row.optional_string("country_subentity")?,
        latitude: row.optional_string("latitude")?,
        longitude: row.optional_string("longitude")?,
    })
}

pub(crate) fn row_to_tax_scheme(row: &SqliteRow) -> Result<Record<TaxScheme>, RepoError> {
    row.record(TaxScheme {
        code: row.string("code")?,
        name: row.optional_string("name")?,
        tax_type_code: row.optional_string("tax_type_code")?,
        currency_code: row.optional_string("currency_code")?,
    })
}

// =============================================================================
// Lookups
// =============================================================================

pub struct SqliteSubResourceRepo {
    pool: SqlitePool,
}

impl SqliteSubResourceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubResourceRepo for SqliteSubResourceRepo {
    async fn get_address(&self, key: RowId) -> Result<Option<Record<Address>>, RepoError> {
        fetch_by_key(&self.pool, ADDRESSES, key)
            .await?
            .map(|row| row_to_address(&row))
            .transpose()
    }

    async fn get_location(&self, key: RowId) -> Result<Option<Record<Location>>, RepoError> {
        fetch_by_key(&self.pool, LOCATIONS, key)
            .await?
            .map(|row| row_to_location(&row))
            .transpose()
    }
}
