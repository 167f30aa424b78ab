use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "l3d",
    about = "l3d: sanitize and compile declarative 3D part definitions",
    version
)]
pub struct Cli {
    /// Log kernel diagnostics (field demotion, reference expansion) to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered definition types, or print one merged template
    Templates {
        /// Print the merged template for this type
        #[arg(long = "type")]
        type_name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the names defined in a catalog file
    Catalog {
        /// Path to catalog JSON (object of name -> definition)
        #[arg(long)]
        catalog: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the catalog entry for one reference name
    Resolve {
        /// Reference name
        name: String,

        /// Path to catalog JSON (object of name -> definition)
        #[arg(long)]
        catalog: String,
    },

    /// Sanitize a definition document against its type templates
    Sanitize {
        /// Path to definition JSON
        document: String,
    },

    /// Compile a definition document into a reference- and repeat-free tree
    Compile {
        /// Path to definition JSON
        document: String,

        /// Path to catalog JSON (empty catalog when omitted)
        #[arg(long)]
        catalog: Option<String>,

        /// Sanitize the document before compiling
        #[arg(long)]
        sanitize: bool,
    },
}
