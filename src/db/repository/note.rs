use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DATETIME_FORMAT;
use crate::db::DatabaseError;
use crate::models::ClinicalNote;

pub fn insert_note(conn: &Connection, note: &ClinicalNote) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO clinical_notes (id, content, doctor, date)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            note.id.to_string(),
            note.content,
            note.doctor,
            note.date.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_all_notes(conn: &Connection) -> Result<Vec<ClinicalNote>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, content, doctor, date
         FROM clinical_notes
         ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut notes = Vec::new();
    for row in rows {
        let (id, content, doctor, date) = row?;
        notes.push(ClinicalNote {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            content,
            doctor,
            date: NaiveDateTime::parse_from_str(&date, DATETIME_FORMAT)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        });
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn insert_and_fetch_round_trip() {
        let conn = open_memory_database().unwrap();
        let note = ClinicalNote {
            id: Uuid::new_v4(),
            content: "Patient responding well to diabetes management.".into(),
            doctor: "Dr. Sharma".into(),
            date: chrono::Local::now().naive_local(),
        };
        insert_note(&conn, &note).unwrap();

        let all = get_all_notes(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, note.id);
        assert_eq!(all[0].doctor, "Dr. Sharma");
    }

    #[test]
    fn empty_record_returns_no_notes() {
        let conn = open_memory_database().unwrap();
        assert!(get_all_notes(&conn).unwrap().is_empty());
    }
}
