//! CLI argument parsing with clap.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::params::OutputFormat;

/// Virtual try-on: dress a person in a garment with Gemini image models,
/// then re-pose and remix the look.
#[derive(Parser, Debug)]
#[command(name = "tryon", version, about)]
pub struct Cli {
    /// Photo of the person (file path or data URL).
    #[arg(required_unless_present = "list_presets")]
    pub person: Option<String>,

    /// Photo of the garment (file path or data URL).
    #[arg(required_unless_present = "list_presets")]
    pub garment: Option<String>,

    /// Edit applied after the first look, in order: `pose:<preset|text>`,
    /// `remix:<preset|text>`, `garment:<path>` or `undo`. Repeatable.
    #[arg(short, long = "edit", value_name = "EDIT")]
    pub edits: Vec<Edit>,

    /// Re-render the person as a standing model before the first try-on.
    #[arg(long)]
    pub restage: bool,

    /// Model name or short alias.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the base look and every layer into this directory.
    #[arg(long, value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// Print the final look as a data URL on stdout.
    #[arg(long)]
    pub print_data_url: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// List the built-in pose and remix presets and exit.
    #[arg(long)]
    pub list_presets: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// One step of the edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Try another garment on the current look.
    Garment(PathBuf),
    /// Re-pose using a preset label or free text.
    Pose(String),
    /// Remix using a preset label or free text.
    Remix(String),
    /// Remove the latest layer.
    Undo,
}

impl FromStr for Edit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("undo") {
            return Ok(Self::Undo);
        }
        let Some((kind, arg)) = s.split_once(':') else {
            return Err(format!(
                "Unknown edit '{s}'. Use pose:<..>, remix:<..>, garment:<path> or undo"
            ));
        };
        let arg = arg.trim();
        if arg.is_empty() {
            return Err(format!("Edit '{kind}' needs a value after ':'"));
        }
        match kind.trim().to_ascii_lowercase().as_str() {
            "pose" => Ok(Self::Pose(arg.to_string())),
            "remix" => Ok(Self::Remix(arg.to_string())),
            "garment" => Ok(Self::Garment(PathBuf::from(arg))),
            other => Err(format!(
                "Unknown edit kind '{other}'. Use pose:<..>, remix:<..>, garment:<path> or undo"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_photos() {
        let cli = Cli::parse_from(["tryon", "me.jpg", "shirt.png"]);
        assert_eq!(cli.person.as_deref(), Some("me.jpg"));
        assert_eq!(cli.garment.as_deref(), Some("shirt.png"));
        assert!(cli.edits.is_empty());
    }

    #[test]
    fn default_values() {
        let cli = Cli::parse_from(["tryon", "me.jpg", "shirt.png"]);
        assert!(cli.model.is_none());
        assert!(cli.format.is_none());
        assert!(cli.output.is_none());
        assert!(cli.history_dir.is_none());
        assert!(!cli.restage);
        assert!(!cli.print_data_url);
        assert!(!cli.verbose);
    }

    #[test]
    fn edits_keep_their_order() {
        let cli = Cli::parse_from([
            "tryon",
            "-e",
            "pose:walking",
            "--edit",
            "remix:Neon",
            "-e",
            "undo",
            "-e",
            "garment:hat.jpg",
            "me.jpg",
            "shirt.png",
        ]);
        assert_eq!(
            cli.edits,
            vec![
                Edit::Pose("walking".into()),
                Edit::Remix("Neon".into()),
                Edit::Undo,
                Edit::Garment(PathBuf::from("hat.jpg")),
            ]
        );
    }

    #[test]
    fn all_options() {
        let cli = Cli::parse_from([
            "tryon",
            "-m",
            "nano-banana-pro",
            "-f",
            "png",
            "-o",
            "out.png",
            "--history-dir",
            "looks",
            "--restage",
            "--print-data-url",
            "-v",
            "me.jpg",
            "shirt.png",
        ]);
        assert_eq!(cli.model.as_deref(), Some("nano-banana-pro"));
        assert_eq!(cli.format, Some(OutputFormat::Png));
        assert_eq!(cli.output, Some(PathBuf::from("out.png")));
        assert_eq!(cli.history_dir, Some(PathBuf::from("looks")));
        assert!(cli.restage);
        assert!(cli.print_data_url);
        assert!(cli.verbose);
    }

    #[test]
    fn photos_required_unless_listing() {
        assert!(Cli::try_parse_from(["tryon"]).is_err());
        assert!(Cli::try_parse_from(["tryon", "me.jpg"]).is_err());
        let cli = Cli::try_parse_from(["tryon", "--list-presets"]).unwrap();
        assert!(cli.list_presets);
    }

    #[test]
    fn bad_edits_rejected() {
        assert!(Cli::try_parse_from(["tryon", "-e", "spin:fast", "a", "b"]).is_err());
        assert!("pose:".parse::<Edit>().is_err());
        assert!("walking".parse::<Edit>().is_err());
    }

    #[test]
    fn edit_parsing_is_lenient_about_case_and_space() {
        assert_eq!("UNDO".parse::<Edit>().unwrap(), Edit::Undo);
        assert_eq!(
            " Remix: golden hour ".parse::<Edit>().unwrap(),
            Edit::Remix("golden hour".into())
        );
        assert_eq!(
            "pose:sitting: legs crossed".parse::<Edit>().unwrap(),
            Edit::Pose("sitting: legs crossed".into())
        );
    }
}
