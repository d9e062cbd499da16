use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{ApplicationRecord, Beneficiary, Dependent, DocumentKind, FileRef, PlanTier};

/// Inserts an application row. Validates first, assigns id and creation
/// time, and returns the id with the stored copy.
pub fn insert_application(
    conn: &Connection,
    record: &ApplicationRecord,
) -> Result<(Uuid, ApplicationRecord), StoreError> {
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
        "INSERT INTO applications (id, policy_no, plan, premium, title, status, sex,
         surname, first_name, cell_no, id_number, residential_address, dependents,
         beneficiary, capturer, checked_by, qualifying_date, documents, pdf_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            stored.id.map(|id| id.to_string()),
            stored.policy_no,
            stored.plan.map(|p| p.as_str()),
            stored.premium,
            stored.title,
            stored.status,
            stored.sex,
            stored.surname,
            stored.first_name,
            stored.cell_no,
            stored.id_number,
            stored.residential_address,
            serde_json::to_string(&stored.dependents)?,
            stored
                .beneficiary
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            stored.capturer,
            stored.checked_by,
            stored.qualifying_date,
            serde_json::to_string(&stored.documents)?,
            stored.pdf_url,
            stored.created_at.map(|t| t.to_string()),
        ],
    )?;
    Ok((id, stored))
}

pub fn get_application(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<ApplicationRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, policy_no, plan, premium, title, status, sex, surname, first_name,
         cell_no, id_number, residential_address, dependents, beneficiary, capturer,
         checked_by, qualifying_date, documents, pdf_url, created_at
         FROM applications WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], row_to_application_row);
    match result {
        Ok(row) => Ok(Some(application_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists applications, newest first.
pub fn list_applications(conn: &Connection) -> Result<Vec<ApplicationRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, policy_no, plan, premium, title, status, sex, surname, first_name,
         cell_no, id_number, residential_address, dependents, beneficiary, capturer,
         checked_by, qualifying_date, documents, pdf_url, created_at
         FROM applications ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map([], row_to_application_row)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(application_from_row(row?)?);
    }
    Ok(records)
}

/// Attaches the generated PDF's address to an existing row.
pub fn set_application_pdf(
    conn: &Connection,
    id: &Uuid,
    pdf_url: &str,
) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE applications SET pdf_url = ?2 WHERE id = ?1",
        params![id.to_string(), pdf_url],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound {
            entity_type: "Application".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

struct ApplicationRow {
    id: String,
    policy_no: String,
    plan: Option<String>,
    premium: String,
    title: String,
    status: String,
    sex: String,
    surname: String,
    first_name: String,
    cell_no: String,
    id_number: String,
    residential_address: String,
    dependents: String,
    beneficiary: Option<String>,
    capturer: String,
    checked_by: String,
    qualifying_date: String,
    documents: String,
    pdf_url: Option<String>,
    created_at: String,
}

fn row_to_application_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ApplicationRow> {
    Ok(ApplicationRow {
        id: row.get(0)?,
        policy_no: row.get(1)?,
        plan: row.get(2)?,
        premium: row.get(3)?,
        title: row.get(4)?,
        status: row.get(5)?,
        sex: row.get(6)?,
        surname: row.get(7)?,
        first_name: row.get(8)?,
        cell_no: row.get(9)?,
        id_number: row.get(10)?,
        residential_address: row.get(11)?,
        dependents: row.get(12)?,
        beneficiary: row.get(13)?,
        capturer: row.get(14)?,
        checked_by: row.get(15)?,
        qualifying_date: row.get(16)?,
        documents: row.get(17)?,
        pdf_url: row.get(18)?,
        created_at: row.get(19)?,
    })
}

fn application_from_row(row: ApplicationRow) -> Result<ApplicationRecord, StoreError> {
    let dependents: Vec<Dependent> = serde_json::from_str(&row.dependents)?;
    let beneficiary: Option<Beneficiary> = row
        .beneficiary
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;
    let documents: BTreeMap<DocumentKind, FileRef> = serde_json::from_str(&row.documents)?;

    Ok(ApplicationRecord {
        id: Some(Uuid::parse_str(&row.id).map_err(|_| StoreError::InvalidEnum {
            field: "id".into(),
            value: row.id.clone(),
        })?),
        policy_no: row.policy_no,
        plan: row.plan.as_deref().map(PlanTier::from_str).transpose()?,
        premium: row.premium,
        title: row.title,
        status: row.status,
        sex: row.sex,
        surname: row.surname,
        first_name: row.first_name,
        cell_no: row.cell_no,
        id_number: row.id_number,
        residential_address: row.residential_address,
        dependents,
        beneficiary,
        capturer: row.capturer,
        checked_by: row.checked_by,
        qualifying_date: row.qualifying_date,
        documents,
        pdf_url: row.pdf_url,
        created_at: Some(parse_created_at(&row.created_at)?),
    })
}

/// A stored timestamp that no longer parses is corruption, not a blank.
pub(super) fn parse_created_at(value: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|_| StoreError::MalformedTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn sample_record() -> ApplicationRecord {
        ApplicationRecord {
            policy_no: "TP 001".into(),
            plan: Some(PlanTier::Platinum),
            premium: "250".into(),
            title: "Mr".into(),
            surname: "Mokoena".into(),
            first_name: "Thabo".into(),
            cell_no: "071 000 0000".into(),
            id_number: "8001015009087".into(),
            residential_address: "12 Setsing St, Phuthaditjhaba".into(),
            dependents: vec![
                Dependent {
                    id_number: "0901016000000".into(),
                    surname: "Mokoena".into(),
                    name: "Lerato".into(),
                    relationship: "Daughter".into(),
                },
                Dependent::default(),
            ],
            beneficiary: Some(Beneficiary {
                name: "Naledi Mokoena".into(),
                id_number: "8203030000000".into(),
            }),
            capturer: "S. Nkosi".into(),
            checked_by: "T. Dlamini".into(),
            qualifying_date: "2026-09-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn insert_assigns_id_and_round_trips() {
        let conn = open_memory_database().unwrap();
        let (id, stored) = insert_application(&conn, &sample_record()).unwrap();
        assert_eq!(stored.id, Some(id));

        let fetched = get_application(&conn, &id).unwrap().unwrap();
        assert_eq!(fetched.policy_no, "TP 001");
        assert_eq!(fetched.plan, Some(PlanTier::Platinum));
        assert_eq!(fetched.dependents.len(), 2);
        assert!(fetched.dependents[1].is_blank());
        assert_eq!(fetched.beneficiary.unwrap().name, "Naledi Mokoena");
        assert!(fetched.pdf_url.is_none());
    }

    #[test]
    fn insert_rejects_oversized_dependents() {
        let conn = open_memory_database().unwrap();
        let mut record = sample_record();
        record.dependents = vec![Dependent::default(); 6];
        assert!(insert_application(&conn, &record).is_err());
    }

    #[test]
    fn patch_sets_pdf_url() {
        let conn = open_memory_database().unwrap();
        let (id, _) = insert_application(&conn, &sample_record()).unwrap();

        set_application_pdf(&conn, &id, "/files/TP_001/application_1.pdf").unwrap();
        let fetched = get_application(&conn, &id).unwrap().unwrap();
        assert_eq!(
            fetched.pdf_url.as_deref(),
            Some("/files/TP_001/application_1.pdf")
        );
    }

    #[test]
    fn patch_missing_row_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = set_application_pdf(&conn, &Uuid::new_v4(), "x").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn get_missing_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_application(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn list_returns_inserted_rows() {
        let conn = open_memory_database().unwrap();
        insert_application(&conn, &sample_record()).unwrap();
        insert_application(&conn, &sample_record()).unwrap();
        let all = list_applications(&conn).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn corrupt_created_at_is_surfaced_not_swallowed() {
        let conn = open_memory_database().unwrap();
        let (id, _) = insert_application(&conn, &sample_record()).unwrap();
        conn.execute(
            "UPDATE applications SET created_at = 'yesterday' WHERE id = ?1",
            params![id.to_string()],
        )
        .unwrap();

        let err = get_application(&conn, &id).unwrap_err();
        assert!(matches!(err, StoreError::MalformedTimestamp(_)));
    }
}
