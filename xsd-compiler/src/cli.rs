//! Grounded on `generator/src/cli.rs` (clap derive struct, `ValueEnum`
//! flags), adapted to the flag set spec.md §6.3 concretizes.

use clap::Parser;

#[derive(Parser)]
#[clap(version, about = "Compiles an XML Schema into a generated Rust binding")]
pub struct Cli {
    /// The XSD source file
    #[clap(value_parser)]
    pub input: String,

    /// Output directory for the generated module (default: current directory)
    #[clap(short = 'o', long = "out-dir", default_value = ".")]
    pub out_dir: String,

    /// Overrides the default output module name (XSD file stem)
    #[clap(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Suppresses emission of types in the named namespace URI. May repeat.
    #[clap(short = 'e', long = "exclude-namespace")]
    pub exclude_namespace: Vec<String>,

    /// Forces resolution of a named type even if unreferenced. May repeat.
    #[clap(short = 't', long = "force-type")]
    pub force_type: Vec<String>,

    /// Allow a XML Document Type Definition (DTD) to occur
    #[clap(long)]
    pub allow_dtd: bool,
}
