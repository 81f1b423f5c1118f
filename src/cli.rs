//! CLI argument parsing for the manifest generator.
//!
//! There is one job to do, so there are no subcommands: discover the catalog,
//! ask the operator, write the manifest.
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Title shown above the question list.
pub const DEFAULT_TITLE: &str = "System Manifest:";

#[derive(Parser, Debug)]
#[command(
    name = "hw-manifest",
    version,
    about = "Generate a hardware manifest file for the job-provider catalog",
    after_help = "Keys (terminal mode):\n  j/k, arrows     move between questions\n  tab/shift-tab   jump between sections\n  y/n/space       answer yes/no, toggle\n  0-9, backspace  edit a numeric answer\n  s, delete       skip (leave unanswered)\n  T               generate the manifest file\n  q, esc          quit without saving\n\nExamples:\n  hw-manifest --output-file /var/tmp/checkbox-manifest.json\n  PROVIDERPATH=/opt/providers hw-manifest -o manifest.json --no-tui"
)]
pub struct RootArgs {
    /// Manifest JSON file to create or update
    #[arg(
        short = 'o',
        long = "output-file",
        visible_alias = "output_file",
        value_name = "PATH"
    )]
    pub output_file: PathBuf,

    /// Colon-separated directories holding *.provider files
    #[arg(long, env = "PROVIDERPATH", value_name = "DIRS")]
    pub provider_path: Option<String>,

    /// Title shown above the questions
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Ask questions line by line instead of the full-screen browser
    #[arg(long)]
    pub no_tui: bool,

    /// Raise log verbosity (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_file_is_required() {
        let err = RootArgs::try_parse_from(["hw-manifest"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn accepts_short_and_underscore_forms() {
        let args = RootArgs::try_parse_from(["hw-manifest", "-o", "a.json"]).unwrap();
        assert_eq!(args.output_file, PathBuf::from("a.json"));
        assert_eq!(args.title, DEFAULT_TITLE);
        assert!(!args.no_tui);

        let args =
            RootArgs::try_parse_from(["hw-manifest", "--output_file", "b.json", "-vv"]).unwrap();
        assert_eq!(args.output_file, PathBuf::from("b.json"));
        assert_eq!(args.verbose, 2);
    }
}
