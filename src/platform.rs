//! Host platform reporting.

use std::env::consts::{ARCH, OS};

/// One-line description of the host platform for install narration.
pub fn platform_report() -> String {
    format!("Platform is {} running on {}.", OS, ARCH)
}

#[cfg(test)]
mod tests {
    use super::platform_report;

    #[test]
    fn report_names_the_compile_time_platform() {
        let report = platform_report();
        assert!(report.starts_with("Platform is "));
        assert!(report.contains(std::env::consts::OS));
        assert!(report.contains(std::env::consts::ARCH));
    }
}
