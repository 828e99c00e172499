//! Fixed-width status table

use hostwatch_core::HostEntry;
use std::fmt::Write;

/// Width of the horizontal rules around the table
pub const RULE_WIDTH: usize = 50;

/// Render a snapshot as bordered text, one line per host
///
/// ```text
/// --------------------------------------------------
/// Host '127.0.0.1' is ONLINE
/// Host '203.0.113.1' is OFFLINE
/// --------------------------------------------------
///
/// ```
pub fn render_table(entries: &[HostEntry]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::with_capacity((entries.len() + 2) * (RULE_WIDTH + 1) + 1);

    let _ = writeln!(out, "{}", rule);
    for entry in entries {
        let _ = writeln!(out, "Host '{}' is {}", entry.host, entry.status);
    }
    let _ = writeln!(out, "{}", rule);
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostwatch_core::{Host, HostStatus};

    fn entry(addr: &str, status: HostStatus) -> HostEntry {
        HostEntry {
            host: Host::parse(addr).unwrap(),
            status,
            checked_at: None,
        }
    }

    #[test]
    fn renders_one_line_per_host() {
        let table = render_table(&[
            entry("127.0.0.1", HostStatus::Online),
            entry("203.0.113.1", HostStatus::Offline),
            entry("::1", HostStatus::Unknown),
        ]);

        let rule = "-".repeat(RULE_WIDTH);
        let expected = format!(
            "{rule}\nHost '127.0.0.1' is ONLINE\nHost '203.0.113.1' is OFFLINE\nHost '::1' is UNKNOWN\n{rule}\n\n"
        );
        assert_eq!(table, expected);
    }

    #[test]
    fn empty_table_is_just_borders() {
        let rule = "-".repeat(RULE_WIDTH);
        assert_eq!(render_table(&[]), format!("{rule}\n{rule}\n\n"));
    }
}
