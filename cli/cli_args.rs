use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigFileOpts {
    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: ./xamalgam.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config_file",
        help_heading = "Configuration"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config_file",
        help_heading = "Configuration"
    )]
    pub disable_config_file: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceOpts {
    #[arg(
        short,
        long,
        help = "Folder holding the sources to amalgamate.",
        value_name = "DIR",
        help_heading = "Sources"
    )]
    pub source: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Path of the generated single-file header.",
        value_name = "FILE",
        help_heading = "Sources"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Space-separated file names to leave out (exact names, no globs).",
        value_name = "NAMES",
        allow_hyphen_values = true,
        help_heading = "Sources"
    )]
    pub excluded: Option<String>,

    #[arg(
        short,
        long,
        help = "Descend into subfolders of the source folder.",
        conflicts_with = "flat",
        help_heading = "Sources"
    )]
    pub recursive: bool,

    #[arg(
        long,
        help = "Only scan the top level of the source folder [default].",
        conflicts_with = "recursive",
        help_heading = "Sources"
    )]
    pub flat: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MergeOpts {
    #[arg(
        long,
        help = "Emit an #ifndef/#define guard for NAME at the top of the output.",
        value_name = "NAME",
        help_heading = "Merging"
    )]
    pub define: Option<String>,

    #[arg(
        long,
        help = "Rewrite uses of the macro NAME to 'inline'.",
        value_name = "NAME",
        help_heading = "Merging"
    )]
    pub inline_macro: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Print the plan in a structured format instead of a table.", value_name = "FORMAT", value_parser = ["json", "yaml", "xml"], help_heading = "Output Formatting")]
    pub format: Option<String>,

    #[arg(
        long,
        help = "Print compact (minified) JSON.",
        help_heading = "Output Formatting"
    )]
    pub enable_json_minify: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Merge a C/C++ source tree into one dependency-ordered header.",
    long_about = "xamalgam scans a source folder, strips local #include \"...\" directives, orders the \nfiles so every dependency comes before the files that include it, and writes them \ninto a single header. Include cycles are broken deterministically.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  xamalgam generate -s Source -o include/mylib.hpp -e \"Main.cpp clara.hpp\" -r\n  xamalgam generate --define MYLIB_HEADER_ONLY --inline-macro inline_t\n  xamalgam plan -s Source -o include/mylib.hpp -f json\n  xamalgam config --save",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Generate the amalgamated header."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "p",
        about = "Show the merge order and dependencies without writing anything."
    )]
    Plan(PlanArgs),

    #[command(about = "Show or save the default configuration file structure.")]
    Config(ConfigArgs),

    #[command(about = "Print a shell completion script.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub config_file: ConfigFileOpts,
    #[clap(flatten)]
    pub sources: SourceOpts,
    #[clap(flatten)]
    pub merge: MergeOpts,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub config_file: ConfigFileOpts,
    #[clap(flatten)]
    pub sources: SourceOpts,
    #[clap(flatten)]
    pub merge: MergeOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (bash, zsh, fish, powershell, elvish) [default: fish]"
    )]
    pub shell: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Save the default config to ./xamalgam.toml (prompts overwrite)."
    )]
    pub save: bool,
}
