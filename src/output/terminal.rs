// Colored terminal output for the follower table and audit details.

use colored::Colorize;

use crate::audit::{AuditState, FollowerAudit, FollowerRecord};

/// Display the follower summary table.
pub fn display_follower_table(records: &[FollowerRecord]) {
    if records.is_empty() {
        println!("No followers fetched yet. Run `varta audit` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Followers ({}) ===", records.len()).bold()
    );
    println!();

    println!(
        "  {:>4}  {:<26} {:>4}  {:>5}  {}",
        "#".dimmed(),
        "Name".dimmed(),
        "Bad".dimmed(),
        "Warn".dimmed(),
        "Status".dimmed(),
    );
    println!("  {}", "-".repeat(76).dimmed());

    for (i, record) in records.iter().enumerate() {
        let audit = &record.audit;
        let bad = if audit.bad_count > 0 {
            audit.bad_count.to_string().red().bold().to_string()
        } else {
            audit.bad_count.to_string()
        };
        let warning = if audit.warning_count > 0 {
            audit.warning_count.to_string().yellow().to_string()
        } else {
            audit.warning_count.to_string()
        };

        println!(
            "  {:>4}. {:<26} {:>4}  {:>5}  {}",
            i + 1,
            record.follower.user_name,
            bad,
            warning,
            audit.status_text(),
        );
    }

    println!();

    let flagged = records
        .iter()
        .filter(|r| r.audit.bad_count > 0 || r.audit.warning_count > 0)
        .count();
    let failed = records
        .iter()
        .filter(|r| r.audit.state == AuditState::Failed)
        .count();

    if flagged > 0 {
        println!("  {} {} followers with flagged follows", "!!".red().bold(), flagged);
    }
    if failed > 0 {
        println!("  {} {} audits failed (rerun to retry)", "~".yellow(), failed);
    }
}

/// Display one follower's audit detail rows.
pub fn display_audit_detail(user_name: &str, audit: &FollowerAudit) {
    println!("\n{}", format!("=== Audit for {} ===", user_name).bold());
    println!("  Status: {}", audit.status_text());

    if audit.details.is_empty() {
        return;
    }

    println!();
    for row in &audit.details {
        if row.reason.is_empty() {
            println!("  {}", row.channel_name.dimmed());
            continue;
        }
        println!(
            "  {} {:<26} {:<16} {}",
            row.icon,
            row.channel_name,
            row.follow_date.dimmed(),
            super::truncate_chars(&row.reason, 120).dimmed(),
        );
    }
}
