//! Where each artifact lands, relative to the output root

use std::path::PathBuf;

use crate::extract::sanitize_filename;

pub const GUIDE_FILE: &str = "API_GUIDE.md";
pub const SNAPSHOT_FILE: &str = "docs/openapi.snapshot.json";
pub const COLLECTION_FILE: &str = "docs/postman_collection.json";
pub const INDEX_FILE: &str = "docs/endpoints.csv";
pub const REPORT_FILE: &str = "docs/report.txt";
pub const SCHEMAS_DIR: &str = "docs/schemas";
pub const EXAMPLES_DIR: &str = "docs/examples";

/// `docs/examples/<VERB>_<path>.md`, both parts sanitized
pub fn example_path(method: &str, path: &str) -> PathBuf {
    PathBuf::from(EXAMPLES_DIR).join(example_file_name(method, path))
}

pub fn example_file_name(method: &str, path: &str) -> String {
    format!(
        "{}_{}.md",
        sanitize_filename(&method.to_uppercase()),
        sanitize_filename(path)
    )
}

/// `docs/schemas/<name>.json`
pub fn schema_path(name: &str) -> PathBuf {
    PathBuf::from(SCHEMAS_DIR).join(format!("{}.json", sanitize_filename(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_path() {
        assert_eq!(
            example_path("get", "/items/{id}"),
            PathBuf::from("docs/examples/GET__items_id_.md")
        );
    }

    #[test]
    fn test_schema_path() {
        assert_eq!(
            schema_path("Body_login/token"),
            PathBuf::from("docs/schemas/Body_login_token.json")
        );
    }
}
