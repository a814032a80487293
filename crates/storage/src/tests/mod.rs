//! Test utilities and module declarations for storage tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use prompt_library_core::Prompt;
use tempfile::TempDir;

pub fn create_test_dir() -> TempDir {
    TempDir::new().unwrap()
}

pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap() + Duration::minutes(minute)
}

pub fn create_test_prompt(id: &str, minute: i64) -> Prompt {
    Prompt {
        id: id.to_owned(),
        title: format!("Prompt {id}"),
        content: format!("Body of {id}"),
        tag: "test".to_owned(),
        created_at: at(minute),
        updated_at: at(minute),
    }
}
