#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use servicenow_schema::ColumnDescriptor;
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }
}

/// Descriptors for a trimmed-down ServiceNow `incident` table.
pub fn incident_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("sys_id", "GUID"),
        ColumnDescriptor::new("number", "string"),
        ColumnDescriptor::new("", "string"),
        ColumnDescriptor::new("priority", "integer"),
        ColumnDescriptor::new("active", "boolean"),
        ColumnDescriptor::new("opened_at", "glide_date_time"),
        ColumnDescriptor::new("due_date", "glide_date"),
        ColumnDescriptor::new("business_duration", "glide_time"),
        ColumnDescriptor::new("cost", "decimal"),
        ColumnDescriptor::unnamed("reference"),
        ColumnDescriptor::new("caller_id", "reference"),
        ColumnDescriptor::new("work_notes", "journal"),
    ]
}

/// The same table as a ServiceNow style JSON export.
pub const INCIDENT_JSON: &str = r#"{
  "table": "incident",
  "columns": [
    {"fieldName": "sys_id", "typeName": "GUID"},
    {"fieldName": "number", "typeName": "string"},
    {"fieldName": "", "typeName": "string"},
    {"fieldName": "priority", "typeName": "integer"},
    {"fieldName": "opened_at", "typeName": "GLIDE_DATE_TIME"},
    {"fieldName": "cost", "typeName": "decimal"}
  ]
}
"#;
