use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{ConsentDependent, ConsentRecord};

/// Inserts a consent row. Validates first, assigns id and creation time,
/// and returns the id with the stored copy.
pub fn insert_consent(
    conn: &Connection,
    record: &ConsentRecord,
) -> Result<(Uuid, ConsentRecord), StoreError> {
    record.validate()?;

    let mut stored = record.clone();
    let id = stored.id.unwrap_or_else(Uuid::new_v4);
    stored.id = Some(id);
    stored.created_at = Some(
        stored
            .created_at
            .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
    );

    conn.execute(
        "INSERT INTO consents (id, policy_number, name, contact, id_number, address,
         consent_confirmed, dependents, holder_signature_url, pdf_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            stored.id.map(|id| id.to_string()),
            stored.policy_number,
            stored.name,
            stored.contact,
            stored.id_number,
            stored.address,
            stored.consent_confirmed as i32,
            serde_json::to_string(&stored.dependents)?,
            stored.holder_signature_url,
            stored.pdf_url,
            stored.created_at.map(|t| t.to_string()),
        ],
    )?;
    Ok((id, stored))
}

pub fn get_consent(conn: &Connection, id: &Uuid) -> Result<Option<ConsentRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, policy_number, name, contact, id_number, address, consent_confirmed,
         dependents, holder_signature_url, pdf_url, created_at
         FROM consents WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], row_to_consent_row);
    match result {
        Ok(row) => Ok(Some(consent_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists consents, newest first.
pub fn list_consents(conn: &Connection) -> Result<Vec<ConsentRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, policy_number, name, contact, id_number, address, consent_confirmed,
         dependents, holder_signature_url, pdf_url, created_at
         FROM consents ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map([], row_to_consent_row)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(consent_from_row(row?)?);
    }
    Ok(records)
}

/// Attaches the generated PDF's address to an existing row.
pub fn set_consent_pdf(conn: &Connection, id: &Uuid, pdf_url: &str) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE consents SET pdf_url = ?2 WHERE id = ?1",
        params![id.to_string(), pdf_url],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound {
            entity_type: "Consent".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

struct ConsentRow {
    id: String,
    policy_number: String,
    name: String,
    contact: String,
    id_number: String,
    address: String,
    consent_confirmed: i32,
    dependents: String,
    holder_signature_url: Option<String>,
    pdf_url: Option<String>,
    created_at: String,
}

fn row_to_consent_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConsentRow> {
    Ok(ConsentRow {
        id: row.get(0)?,
        policy_number: row.get(1)?,
        name: row.get(2)?,
        contact: row.get(3)?,
        id_number: row.get(4)?,
        address: row.get(5)?,
        consent_confirmed: row.get(6)?,
        dependents: row.get(7)?,
        holder_signature_url: row.get(8)?,
        pdf_url: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn consent_from_row(row: ConsentRow) -> Result<ConsentRecord, StoreError> {
    let dependents: Vec<ConsentDependent> = serde_json::from_str(&row.dependents)?;

    Ok(ConsentRecord {
        id: Some(Uuid::parse_str(&row.id).map_err(|_| StoreError::InvalidEnum {
            field: "id".into(),
            value: row.id.clone(),
        })?),
        policy_number: row.policy_number,
        name: row.name,
        contact: row.contact,
        id_number: row.id_number,
        address: row.address,
        consent_confirmed: row.consent_confirmed != 0,
        dependents,
        holder_signature_url: row.holder_signature_url,
        pdf_url: row.pdf_url,
        created_at: Some(super::application::parse_created_at(&row.created_at)?),
    })
}
