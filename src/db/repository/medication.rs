use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DATETIME_FORMAT;
use crate::db::DatabaseError;
use crate::models::Medication;

/// Append a committed medication to the record.
pub fn insert_medication(conn: &Connection, medication: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, name, dosage, frequency, prescribing_doctor, date_added, override_reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            medication.id.to_string(),
            medication.name,
            medication.dosage,
            medication.frequency,
            medication.prescribing_doctor,
            medication.date_added.format(DATETIME_FORMAT).to_string(),
            medication.override_reason,
        ],
    )?;
    Ok(())
}

/// Fetch the full medication list in insertion order.
pub fn get_all_medications(conn: &Connection) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, dosage, frequency, prescribing_doctor, date_added, override_reason
         FROM medications
         ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, Option<String>>(6)?,
        ))
    })?;

    let mut medications = Vec::new();
    for row in rows {
        let (id, name, dosage, frequency, prescribing_doctor, date_added, override_reason) = row?;
        medications.push(Medication {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            name,
            dosage,
            frequency,
            prescribing_doctor,
            date_added: NaiveDateTime::parse_from_str(&date_added, DATETIME_FORMAT)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            override_reason,
        });
    }
    Ok(medications)
}
