pub mod file;
pub mod stdin;

use serde_json::Value;

/// Investigation payload from `--input`, else piped stdin. `None` when
/// neither carries data; callers treat that as an absent result.
pub fn investigation_payload(
    path: Option<&str>,
) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => file::read_json_value(p).map(Some),
        None => stdin::read_stdin(),
    }
}
