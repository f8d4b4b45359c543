//! Administrator-account details parsed from the first-run bootstrap output.

/// Prefix of the structured status line newer application trees emit.
const STATUS_PREFIX: &str = "admin-account: ";

/// What the first-run bootstrap reported about the administrator account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminDetails {
    /// A new account was created; carries the line holding the credentials.
    Created(String),
    /// An account already existed or creation was skipped.
    AlreadyProvisioned,
    /// Output was produced but contained no recognized status line.
    NotFound,
    /// The bootstrap command produced no output at all.
    NotReported,
}

impl AdminDetails {
    /// Parse captured bootstrap stdout.
    ///
    /// A structured `admin-account:` status line wins over the legacy
    /// free-form patterns, which are kept for older application trees.
    /// Within the legacy patterns a creation line wins over a skip line.
    pub fn parse(stdout: &str) -> Self {
        if stdout.is_empty() {
            return Self::NotReported;
        }
        for line in stdout.lines() {
            if let Some(status) = line.trim().strip_prefix(STATUS_PREFIX) {
                if let Some(details) = status.strip_prefix("created ") {
                    return Self::Created(details.trim().to_string());
                }
                if status == "exists" || status == "skipped" {
                    return Self::AlreadyProvisioned;
                }
            }
        }
        if let Some(line) = line_with_prefix(stdout, "Created administrator account") {
            return Self::Created(line.to_string());
        }
        if line_with_prefix(stdout, "Skipping create admin account").is_some()
            || line_with_prefix(stdout, "[INFO] Superuser").is_some()
        {
            return Self::AlreadyProvisioned;
        }
        Self::NotFound
    }

    /// Reportable one-line summary, or `None` when the command said nothing.
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Created(line) => Some(line),
            Self::AlreadyProvisioned => Some("Administrator account(s) previously created."),
            Self::NotFound => Some("Administrator account details not found."),
            Self::NotReported => None,
        }
    }

    /// Whether the summary carries freshly generated credentials the user
    /// must write down.
    pub fn is_newly_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

fn line_with_prefix<'a>(output: &'a str, prefix: &str) -> Option<&'a str> {
    output.lines().find(|line| line.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::AdminDetails;

    #[test]
    fn creation_line_is_reported_verbatim() {
        let stdout =
            "Running migrations\nCreated administrator account 'admin' with password 'x7kq'\n";
        let details = AdminDetails::parse(stdout);
        assert_eq!(
            details,
            AdminDetails::Created(
                "Created administrator account 'admin' with password 'x7kq'".to_string()
            )
        );
        assert!(details.is_newly_created());
    }

    #[test]
    fn creation_line_on_the_first_line_is_found() {
        let details = AdminDetails::parse("Created administrator account 'admin'\nmore output\n");
        assert!(details.is_newly_created());
    }

    #[test]
    fn skip_line_means_previously_created() {
        let details = AdminDetails::parse("Skipping create admin account.\n");
        assert_eq!(details, AdminDetails::AlreadyProvisioned);
        assert_eq!(
            details.summary(),
            Some("Administrator account(s) previously created.")
        );
    }

    #[test]
    fn superuser_info_line_means_previously_created() {
        let details = AdminDetails::parse("[INFO] Superuser already exists.\n");
        assert_eq!(details, AdminDetails::AlreadyProvisioned);
    }

    #[test]
    fn creation_wins_over_a_skip_line() {
        let stdout = "Skipping create admin account.\nCreated administrator account 'admin'\n";
        assert!(AdminDetails::parse(stdout).is_newly_created());
    }

    #[test]
    fn structured_status_line_wins_over_legacy_patterns() {
        let stdout = "Created administrator account 'old style'\nadmin-account: exists\n";
        assert_eq!(AdminDetails::parse(stdout), AdminDetails::AlreadyProvisioned);
    }

    #[test]
    fn structured_creation_carries_only_the_details() {
        let details = AdminDetails::parse("admin-account: created username=admin password=x7kq\n");
        assert_eq!(
            details,
            AdminDetails::Created("username=admin password=x7kq".to_string())
        );
    }

    #[test]
    fn unrecognized_output_reports_details_not_found() {
        let details = AdminDetails::parse("Applied 12 migrations.\n");
        assert_eq!(details, AdminDetails::NotFound);
        assert_eq!(
            details.summary(),
            Some("Administrator account details not found.")
        );
    }

    #[test]
    fn empty_output_reports_nothing() {
        let details = AdminDetails::parse("");
        assert_eq!(details, AdminDetails::NotReported);
        assert_eq!(details.summary(), None);
    }
}
