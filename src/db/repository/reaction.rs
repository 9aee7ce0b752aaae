use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::ReactionSeverity;
use crate::models::AllergyReaction;

/// Append a documented adverse reaction.
pub fn insert_reaction(conn: &Connection, reaction: &AllergyReaction) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO reactions (id, drug_name, reaction_type, severity, date_occurred, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            reaction.id.to_string(),
            reaction.drug_name,
            reaction.reaction_type,
            reaction.severity.as_str(),
            reaction.date_occurred.to_string(),
            reaction.description,
        ],
    )?;
    Ok(())
}

/// Fetch all documented reactions in the order they were reported.
pub fn get_all_reactions(conn: &Connection) -> Result<Vec<AllergyReaction>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, drug_name, reaction_type, severity, date_occurred, description
         FROM reactions
         ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut reactions = Vec::new();
    for row in rows {
        let (id, drug_name, reaction_type, severity, date_occurred, description) = row?;
        reactions.push(AllergyReaction {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            drug_name,
            reaction_type,
            severity: ReactionSeverity::from_str(&severity)?,
            date_occurred: NaiveDate::parse_from_str(&date_occurred, "%Y-%m-%d")
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            description,
        });
    }
    Ok(reactions)
}
