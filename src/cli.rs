use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rjlink")]
#[command(author, version)]
#[command(about = "Turns DLsite RJ work numbers in HTML into catalog links")]
#[command(
    long_about = "rjlink finds DLsite work numbers (RJ followed by six or more digits) in the \
    text of HTML documents and wraps each one in a link to its catalog page. Text inside \
    links, scripts and styles is left alone, and converting a document twice gives the same \
    result as converting it once."
)]
#[command(after_help = "\
EXAMPLES:

    # Convert a page to stdout
    rjlink convert page.html

    # Convert from stdin
    cat page.html | rjlink convert

    # Check whether a page still has unconverted numbers
    rjlink convert --check page.html

    # Convert in place
    rjlink convert --write page.html

    # List the numbers found in a page
    rjlink tokens page.html

CONFIGURATION:

rjlink looks for configuration files in this order:
  1. Explicit --config path
  2. rjlink.toml or .rjlink.toml in current/parent directories
  3. ~/.config/rjlink/config.toml (XDG)
  4. Built-in defaults

Example .rjlink.toml:

    base_url = \"https://www.dlsite.com/maniax/work/=/product_id/\"
    excluded_tags = [\"a\", \"script\", \"style\", \"noscript\", \"code\"]

    [link_style]
    color = \"#0066cc\"
    text_decoration = \"underline\"")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, rjlink will \
        search for .rjlink.toml or rjlink.toml in the current directory and its parents, \
        then fall back to ~/.config/rjlink/config.toml."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert RJ numbers in an HTML document into links
    #[command(
        long_about = "Convert RJ numbers in an HTML document into links to their catalog \
        pages. By default the text of <body> is processed and the result is written to \
        stdout. Use --write to convert in place or --check to verify that nothing is left \
        to convert."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Convert to stdout
    rjlink convert page.html

    # Convert a snippet without <body>
    echo '<p>RJ123456</p>' | rjlink convert --fragment

    # Check (exit code 1 if something would be converted)
    rjlink convert --check page.html

    # Convert in place
    rjlink convert --write page.html")]
    Convert {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,

        /// Check if the document is already converted
        #[arg(long, conflicts_with = "write")]
        #[arg(help = "Check if the document is converted (exit code 1 if not)")]
        #[arg(
            long_help = "Check whether the document still contains RJ numbers that would be \
            converted. If so, displays a diff and exits with code 1. Useful for CI pipelines."
        )]
        check: bool,

        /// Convert the file in place
        #[arg(long)]
        #[arg(help = "Write the converted document back to the input file")]
        #[arg(
            long_help = "Write the converted document back to the input file, modifying it in \
            place. Cannot be used with stdin input."
        )]
        write: bool,

        /// Treat the input as a fragment
        #[arg(long)]
        #[arg(help = "Process the whole input instead of requiring <body>")]
        fragment: bool,
    },
    /// List RJ numbers found in an HTML document
    #[command(
        long_about = "List every RJ number found in the text of <body>, together with the \
        element it appears in, its catalog URL, and whether it would be converted. Use \
        --fragment to list the whole input, as convert --fragment would process it."
    )]
    Tokens {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Treat the input as a fragment
        #[arg(long)]
        #[arg(help = "List tokens in the whole input instead of only in <body>")]
        fragment: bool,
    },
}
