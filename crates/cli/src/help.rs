//! Static help table for the `help` command.

use std::fmt::{self, Write};

/// One top-level command and its actions.
pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
    pub actions: &'static [(&'static str, &'static str)],
}

pub static COMMAND_TABLE: &[CommandHelp] = &[
    CommandHelp {
        name: "config",
        description: "Configuration management for the Tube Archivist connection",
        actions: &[
            ("set", "Set the Tube Archivist URL and API token"),
            ("get", "Display the current configuration"),
        ],
    },
    CommandHelp {
        name: "help",
        description: "Show available commands",
        actions: &[],
    },
    CommandHelp {
        name: "redownload",
        description: "Redownload videos based on resolution or download state",
        actions: &[
            ("resolution", "Redownload all videos with the specified resolution"),
            ("failed", "Redownload videos that previously failed to download"),
        ],
    },
    CommandHelp {
        name: "search",
        description: "Search the local cache",
        actions: &[
            ("videos", "Search videos by title, description or tags"),
            ("channels", "Search channels by name or description"),
            ("playlists", "Search playlists by name or description"),
            ("all", "Search across videos, channels and playlists"),
        ],
    },
    CommandHelp {
        name: "stats",
        description: "Display statistics about cached data",
        actions: &[
            ("overview", "Overview of all cached data"),
            ("videos", "Detailed video statistics"),
            ("channels", "Detailed channel statistics"),
            ("playlists", "Detailed playlist statistics"),
            ("database", "Database file information and table sizes"),
        ],
    },
    CommandHelp {
        name: "sync",
        description: "Synchronize data from Tube Archivist to the local cache",
        actions: &[
            ("video", "Sync all videos to the local cache"),
            ("playlist", "Sync all playlists to the local cache"),
            ("channel", "Sync all channels to the local cache"),
            ("all", "Sync videos, playlists and channels"),
        ],
    },
];

pub fn find(name: &str) -> Option<&'static CommandHelp> {
    COMMAND_TABLE.iter().find(|c| c.name == name)
}

fn write_actions(out: &mut String, command: &CommandHelp) -> fmt::Result {
    for (action, description) in command.actions {
        writeln!(out, "  {} {:<12} - {}", command.name, action, description)?;
    }
    Ok(())
}

/// Help for every command.
pub fn render_overview() -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Tube Archivist CLI - Available Commands:")?;
    writeln!(out, "{}", "=".repeat(50))?;

    for command in COMMAND_TABLE {
        writeln!(out, "\n{}:", command.name.to_uppercase())?;
        writeln!(out, "  {}", command.description)?;
        write_actions(&mut out, command)?;
    }

    writeln!(out, "\nUsage: tubearchive <command> <action>")?;
    writeln!(out, "Example: tubearchive config set")?;
    Ok(out)
}

/// Help for one command, or an unknown-command notice.
pub fn render_command(name: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match find(name) {
        Some(command) => {
            writeln!(
                out,
                "{} - {}",
                command.name.to_uppercase(),
                command.description
            )?;
            writeln!(out, "{}", "=".repeat(50))?;
            write_actions(&mut out, command)?;
            writeln!(out, "\nUsage: tubearchive {} <action>", command.name)?;
        }
        None => {
            writeln!(out, "Unknown command: {}", name)?;
            writeln!(out, "Use 'tubearchive help' to see all available commands.")?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    #[test]
    fn test_table_matches_parser() {
        let cli = Cli::command();

        let mut parsed: Vec<&str> = cli.get_subcommands().map(|c| c.get_name()).collect();
        let mut table: Vec<&str> = COMMAND_TABLE.iter().map(|c| c.name).collect();
        parsed.sort_unstable();
        table.sort_unstable();
        assert_eq!(parsed, table);

        for sub in cli.get_subcommands() {
            let entry = find(sub.get_name()).unwrap();
            let mut actions: Vec<&str> = sub
                .get_subcommands()
                .map(|c| c.get_name())
                .filter(|name| *name != "help")
                .collect();
            let mut listed: Vec<&str> = entry.actions.iter().map(|(a, _)| *a).collect();
            actions.sort_unstable();
            listed.sort_unstable();
            assert_eq!(actions, listed, "actions of `{}`", sub.get_name());
        }
    }

    #[test]
    fn test_render_overview_lists_every_action() {
        let text = render_overview().unwrap();
        assert!(text.contains("SYNC:"));
        assert!(text.contains("  redownload resolution   - "));
        assert!(text.contains("  search all          "));
    }

    #[test]
    fn test_render_command() {
        let text = render_command("stats").unwrap();
        assert!(text.starts_with("STATS - Display statistics about cached data"));
        assert!(text.contains("stats database"));
        assert!(!text.contains("sync video"));
    }

    #[test]
    fn test_render_unknown_command() {
        let text = render_command("export").unwrap();
        assert!(text.starts_with("Unknown command: export"));
    }
}
