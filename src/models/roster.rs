use serde::{Deserialize, Serialize};

/// One roster row as exchanged with the import/export collaborators and
/// the admin create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub first_name: String,
    pub last_name: String,
    pub employee_id: String,
    pub table_number: i64,
}

impl RosterRow {
    /// Trim fields and check the row invariants. Returns the normalized row.
    pub fn validate(&self) -> Result<RosterRow, String> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let employee_id = self.employee_id.trim();

        if first_name.is_empty() {
            return Err("missing first name".to_string());
        }
        if last_name.is_empty() {
            return Err("missing last name".to_string());
        }
        if employee_id.is_empty() {
            return Err("missing employee ID".to_string());
        }
        if self.table_number < 1 {
            return Err(format!(
                "table number must be >= 1, got {}",
                self.table_number
            ));
        }

        Ok(RosterRow {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            employee_id: employee_id.to_string(),
            table_number: self.table_number,
        })
    }
}

/// Result of a bulk roster import: how many rows landed, and one error
/// string per rejected row. Row failures never abort the batch.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<String>,
}
