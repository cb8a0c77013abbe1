use serde::{Deserialize, Serialize};

/// Response body of both compare endpoints.
///
/// `diff_string == None` means the backend had no textual diff to offer;
/// that is not an error and the diff panel is simply left out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub html: String,

    #[serde(rename = "diffString", default)]
    pub diff_string: Option<String>,
}
