use clap::{Parser, Subcommand};

/// SessionDeck: tabbed, split and grid layouts for profile sessions.
#[derive(Parser, Debug)]
#[command(name = "sessiondeck", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage saved layouts.
    #[command(subcommand)]
    Layouts(LayoutsCommand),

    /// Apply a saved layout against a headless host and print the result.
    Apply {
        /// Layout id.
        id: String,

        /// Window size as WIDTHxHEIGHT, e.g. 1920x1080.
        #[arg(long, value_parser = parse_window)]
        window: Option<(u32, u32)>,

        /// Known profile ids. Without them every id is opened as given.
        #[arg(long, value_delimiter = ',')]
        profiles: Vec<String>,

        /// Skip the pacing delay between opens.
        #[arg(long)]
        fast: bool,
    },

    /// Print the effective configuration as JSON.
    Config,
}

#[derive(Subcommand, Debug)]
pub enum LayoutsCommand {
    List,
    Show { id: String },
    Delete { id: String },
    Rename { id: String, name: String },
}

fn parse_window(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let width = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    if width == 0 || height == 0 {
        return Err("window size must be non-zero".to_string());
    }
    Ok((width, height))
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_size_parses() {
        assert_eq!(parse_window("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_window("800X600"), Ok((800, 600)));
        assert!(parse_window("1920").is_err());
        assert!(parse_window("0x600").is_err());
        assert!(parse_window("ax600").is_err());
    }

    #[test]
    fn apply_command_parses() {
        let args = Args::try_parse_from([
            "sessiondeck",
            "--log-level",
            "debug",
            "apply",
            "abc",
            "--window",
            "1280x720",
            "--profiles",
            "p1,p2",
            "--fast",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Command::Apply {
                id,
                window,
                profiles,
                fast,
            } => {
                assert_eq!(id, "abc");
                assert_eq!(window, Some((1280, 720)));
                assert_eq!(profiles, vec!["p1", "p2"]);
                assert!(fast);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn layouts_rename_parses() {
        let args = Args::try_parse_from(["sessiondeck", "layouts", "rename", "abc", "Evening"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Layouts(LayoutsCommand::Rename { ref id, ref name }) if id == "abc" && name == "Evening"
        ));
    }
}
