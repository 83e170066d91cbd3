use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "introviewer",
    version,
    about = "fetch and browse a class introductions roster",
    long_about = "introviewer fetches a class roster from a JSON endpoint, normalizes each student's introduction and lets you search and page through it.\n\nExamples:\n  introviewer\n  introviewer -s lee --all\n  introviewer -i --policy clamp --hide image,links\n  introviewer -o roster.json\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help_heading = "Input",
        help = "Roster endpoint returning a JSON array of students."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.introviewer/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "media-origin",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Origin for relative image paths (defaults to the roster URL's origin)."
    )]
    pub media_origin: Option<String>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TERM",
        help_heading = "Browse",
        help = "Only show students whose name contains TERM (case-insensitive)."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'p',
        long = "policy",
        visible_alias = "mode",
        value_name = "POLICY",
        help_heading = "Browse",
        help = "Next/previous behavior at the ends: wrap or clamp."
    )]
    pub policy: Option<String>,

    #[arg(
        short = 'H',
        long = "hide",
        value_name = "FIELDS",
        action = ArgAction::Append,
        help_heading = "Browse",
        help = "Hide card fields (comma-separated, repeatable), e.g. image,links."
    )]
    pub hide: Vec<String>,

    #[arg(
        short = 'a',
        long = "all",
        help_heading = "Browse",
        help = "Print every matching student instead of one card."
    )]
    pub all: bool,

    #[arg(
        short = 'i',
        long = "interactive",
        help_heading = "Browse",
        help = "Browse interactively (n/p/s/t/m/q commands on stdin)."
    )]
    pub interactive: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the matching students to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json); inferred from the file extension when omitted."
    )]
    pub output_format: Option<String>,
}
