use super::DbConnection;
use crate::domain::error::DomainError;
use crate::domain::model::Prescription;
use crate::domain::repository::{PrescriptionRepository, Result};
use rusqlite::params;

const COLUMNS: &str = "id, patient_name, gender, age, phone, diagnosis, herbs, \
                       usage, doctor, doctor_phone, created_at, printed_at";

pub struct SqlitePrescriptionRepository {
    pub conn: DbConnection,
}

impl SqlitePrescriptionRepository {
    pub fn new(conn: DbConnection) -> Self {
        Self { conn }
    }
}

fn row_to_prescription(row: &rusqlite::Row) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        gender: row.get(2)?,
        age: row.get(3)?,
        phone: row.get(4)?,
        diagnosis: row.get(5)?,
        herbs: row.get(6)?,
        usage: row.get(7)?,
        doctor: row.get(8)?,
        doctor_phone: row.get(9)?,
        created_at: row.get(10)?,
        printed_at: row.get(11)?,
    })
}

impl PrescriptionRepository for SqlitePrescriptionRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Prescription>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM prescriptions WHERE id = ?",
            COLUMNS
        ))?;

        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(row_to_prescription(row)?))
        } else {
            Ok(None)
        }
    }

    fn find_all(&self) -> Result<Vec<Prescription>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM prescriptions ORDER BY created_at DESC, id DESC",
            COLUMNS
        ))?;

        let rows = stmt.query_map([], |row| row_to_prescription(row))?;

        let mut prescriptions = Vec::new();
        for prescription in rows {
            prescriptions.push(prescription?);
        }

        Ok(prescriptions)
    }

    fn search_by_patient(&self, fragment: &str) -> Result<Vec<Prescription>> {
        if fragment.is_empty() {
            return self.find_all();
        }

        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM prescriptions WHERE patient_name LIKE ?
             ORDER BY created_at DESC, id DESC",
            COLUMNS
        ))?;

        let pattern = format!("%{}%", fragment);
        let rows = stmt.query_map(params![pattern], |row| row_to_prescription(row))?;

        let mut prescriptions = Vec::new();
        for prescription in rows {
            prescriptions.push(prescription?);
        }

        Ok(prescriptions)
    }

    fn save(&self, prescription: &Prescription) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO prescriptions
             (id, patient_name, gender, age, phone, diagnosis, herbs,
              usage, doctor, doctor_phone, created_at, printed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                prescription.id,
                prescription.patient_name,
                prescription.gender,
                prescription.age,
                prescription.phone,
                prescription.diagnosis,
                prescription.herbs,
                prescription.usage,
                prescription.doctor,
                prescription.doctor_phone,
                prescription.created_at,
                prescription.printed_at,
            ],
        )?;

        Ok(())
    }

    fn mark_printed(&self, id: &str, printed_at: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        conn.execute(
            "UPDATE prescriptions SET printed_at = ? WHERE id = ?",
            params![printed_at, id],
        )?;

        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        conn.execute("DELETE FROM prescriptions WHERE id = ?", params![id])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::init_test_database;
    use super::*;

    fn repo() -> SqlitePrescriptionRepository {
        SqlitePrescriptionRepository::new(init_test_database())
    }

    fn sample(name: &str, created_at: &str) -> Prescription {
        let mut rx = Prescription::new(name.to_string(), "当归10克\n白芍15克".to_string());
        rx.created_at = created_at.to_string();
        rx
    }

    #[test]
    fn test_save_and_find_by_id() {
        let repo = repo();
        let mut rx = sample("张三", "2024-03-15 09:30:00");
        rx.diagnosis = "气血两虚".to_string();
        repo.save(&rx).unwrap();

        let found = repo.find_by_id(&rx.id).unwrap().unwrap();
        assert_eq!(found.patient_name, "张三");
        assert_eq!(found.diagnosis, "气血两虚");
        assert_eq!(found.herbs, "当归10克\n白芍15克");
        assert!(found.printed_at.is_none());
    }

    #[test]
    fn test_find_by_id_missing() {
        assert!(repo().find_by_id("no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_existing() {
        let repo = repo();
        let mut rx = sample("张三", "2024-03-15 09:30:00");
        repo.save(&rx).unwrap();
        rx.usage = "外用".to_string();
        repo.save(&rx).unwrap();

        assert_eq!(repo.find_all().unwrap().len(), 1);
        assert_eq!(repo.find_by_id(&rx.id).unwrap().unwrap().usage, "外用");
    }

    #[test]
    fn test_find_all_newest_first() {
        let repo = repo();
        repo.save(&sample("甲", "2024-01-01 08:00:00")).unwrap();
        repo.save(&sample("乙", "2024-06-01 08:00:00")).unwrap();
        repo.save(&sample("丙", "2024-03-01 08:00:00")).unwrap();

        let names: Vec<String> = repo
            .find_all()
            .unwrap()
            .into_iter()
            .map(|rx| rx.patient_name)
            .collect();
        assert_eq!(names, vec!["乙", "丙", "甲"]);
    }

    #[test]
    fn test_search_by_patient_fragment() {
        let repo = repo();
        repo.save(&sample("张三", "2024-01-01 08:00:00")).unwrap();
        repo.save(&sample("张四", "2024-01-02 08:00:00")).unwrap();
        repo.save(&sample("李五", "2024-01-03 08:00:00")).unwrap();

        let hits = repo.search_by_patient("张").unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|rx| rx.patient_name.contains('张')));

        // Empty fragment lists everything
        assert_eq!(repo.search_by_patient("").unwrap().len(), 3);
    }

    #[test]
    fn test_mark_printed() {
        let repo = repo();
        let rx = sample("张三", "2024-03-15 09:30:00");
        repo.save(&rx).unwrap();

        repo.mark_printed(&rx.id, "2024-03-15 10:00:00").unwrap();
        let found = repo.find_by_id(&rx.id).unwrap().unwrap();
        assert_eq!(found.printed_at.as_deref(), Some("2024-03-15 10:00:00"));
    }

    #[test]
    fn test_delete() {
        let repo = repo();
        let rx = sample("张三", "2024-03-15 09:30:00");
        repo.save(&rx).unwrap();
        repo.delete(&rx.id).unwrap();
        assert!(repo.find_by_id(&rx.id).unwrap().is_none());
    }
}
