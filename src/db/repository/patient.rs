use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::PatientProfile;

/// Write the single profile row, replacing any existing one.
pub fn save_profile(conn: &Connection, profile: &PatientProfile) -> Result<(), DatabaseError> {
    let conditions = serde_json::to_string(&profile.conditions)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    let allergies = serde_json::to_string(&profile.allergies)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    conn.execute(
        "INSERT INTO patient_profile (id, name, age, blood_group, conditions, allergies)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            age = excluded.age,
            blood_group = excluded.blood_group,
            conditions = excluded.conditions,
            allergies = excluded.allergies",
        params![
            profile.name,
            profile.age,
            profile.blood_group,
            conditions,
            allergies,
        ],
    )?;
    Ok(())
}

/// Fetch the profile row, if the record has been initialized.
pub fn get_profile(conn: &Connection) -> Result<Option<PatientProfile>, DatabaseError> {
    let result = conn.query_row(
        "SELECT name, age, blood_group, conditions, allergies
         FROM patient_profile
         WHERE id = 1",
        [],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        },
    );

    match result {
        Ok((name, age, blood_group, conditions, allergies)) => Ok(Some(PatientProfile {
            name,
            age,
            blood_group,
            conditions: serde_json::from_str(&conditions)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            allergies: serde_json::from_str(&allergies)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_profile() -> PatientProfile {
        PatientProfile {
            name: "Rajesh Kumar".into(),
            age: 67,
            blood_group: "B+".into(),
            conditions: vec!["Type 2 Diabetes".into(), "Hypertension".into()],
            allergies: vec!["Penicillin".into()],
        }
    }

    #[test]
    fn save_and_fetch_round_trip() {
        let conn = open_memory_database().unwrap();
        save_profile(&conn, &test_profile()).unwrap();

        let profile = get_profile(&conn).unwrap().unwrap();
        assert_eq!(profile.name, "Rajesh Kumar");
        assert_eq!(profile.age, 67);
        assert_eq!(profile.conditions.len(), 2);
        assert_eq!(profile.allergies, ["Penicillin"]);
    }

    #[test]
    fn save_replaces_existing_row() {
        let conn = open_memory_database().unwrap();
        save_profile(&conn, &test_profile()).unwrap();

        let mut updated = test_profile();
        updated.age = 68;
        updated.allergies.push("Sulfa".into());
        save_profile(&conn, &updated).unwrap();

        let profile = get_profile(&conn).unwrap().unwrap();
        assert_eq!(profile.age, 68);
        assert_eq!(profile.allergies.len(), 2);
    }

    #[test]
    fn uninitialized_record_has_no_profile() {
        let conn = open_memory_database().unwrap();
        assert!(get_profile(&conn).unwrap().is_none());
    }
}
