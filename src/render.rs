//! TUI rendering traits for contest-sync types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to contest-sync-core types using owo_colors.

use std::collections::BTreeMap;

use chrono::Local;
use contest_sync_core::{Contest, SyncStats, View};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Contest {
    fn render(&self) -> String {
        let mut line = format!("{} {} {}", "+".green(), self.platform.bold(), self.title);

        if let Some(start) = self.start {
            let local = start.with_timezone(&Local).format("%a %b %-d, %H:%M");
            line.push_str(&format!(" {}", local.to_string().dimmed()));
        }
        if let Some(url) = &self.url {
            line.push_str(&format!("\n     {}", url.dimmed()));
        }

        line
    }
}

/// Threshold for compact view (show per-platform counts instead of individual contests)
const COMPACT_THRESHOLD: usize = 5;

/// Render the contest list, using compact view if there are many contests and verbose is false
fn render_contest_list(contests: &[Contest], verbose: bool, lines: &mut Vec<String>) {
    if verbose || contests.len() <= COMPACT_THRESHOLD {
        for contest in contests {
            lines.push(format!("   {}", contest.render()));
        }
        return;
    }

    let mut by_platform: BTreeMap<&str, usize> = BTreeMap::new();
    for contest in contests {
        *by_platform.entry(contest.platform.as_str()).or_default() += 1;
    }

    for (platform, count) in by_platform {
        let label = format!("({} new {})", count, pluralize("contest", count));
        lines.push(format!("   {} {} {}", "+".green(), platform.bold(), label.green()));
    }
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn render_stats(stats: &SyncStats) -> Option<String> {
    if stats.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    if let Some(added) = stats.new_contests_added {
        parts.push(format!("{added} added"));
    }
    if let Some(checked) = stats.total_contests_checked {
        parts.push(format!("{checked} checked"));
    }
    Some(format!("   {}", parts.join(", ").dimmed()))
}

/// Rendering for View, with an option to list every contest
pub trait ViewRender {
    fn render(&self, verbose: bool) -> String;
}

impl ViewRender for View {
    fn render(&self, verbose: bool) -> String {
        match self {
            View::AuthLoading => "Checking your session...".dimmed().to_string(),
            View::LoginPrompt { login_url, notice } => {
                let mut lines = Vec::new();
                if let Some(notice) = notice {
                    lines.push(notice.yellow().to_string());
                    lines.push(String::new());
                }
                lines.push("You are not logged in.".bold().to_string());
                lines.push(format!("Log in with Google at {}", login_url.cyan()));
                lines.push(format!("then run {}", "contest-sync login".bold()));
                lines.join("\n")
            }
            View::Ready { email } => format!(
                "Logged in as {}\nRun {} to add upcoming contests to your calendar.",
                email.bold(),
                "contest-sync sync".bold()
            ),
            View::Syncing { email } => {
                format!("Syncing contests for {}...", email.bold())
            }
            View::SyncComplete {
                email,
                message,
                contests,
                stats,
            } => {
                let mut lines = vec![
                    format!("{} {}", "Sync complete".green().bold(), format!("({email})").dimmed()),
                    format!("   {message}"),
                ];
                lines.extend(render_stats(stats));

                if contests.is_empty() {
                    lines.push("   No new contests".dimmed().to_string());
                } else {
                    lines.push(String::new());
                    render_contest_list(contests, verbose, &mut lines);
                }
                lines.join("\n")
            }
            View::SyncFailed { email, message } => format!(
                "{} {}\n   {}",
                "Sync failed".red().bold(),
                format!("({email})").dimmed(),
                message.red()
            ),
        }
    }
}
