/// Review status given to every new submission.
pub const DEFAULT_REVIEW_STATUS: &str = "pending";

/// Statuses the review UI knows about. Updates are not restricted to these.
pub const KNOWN_REVIEW_STATUSES: [&str; 3] = ["pending", "approved", "rejected"];

#[derive(Debug, Clone)]
pub struct NewSignature {
    pub signature_file: Option<String>,
    pub consent: bool,
}

pub fn parse_consent(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("on") | Some("true")
    )
}
