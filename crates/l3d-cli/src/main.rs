//! l3d CLI: the `l3d` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logging(cli.verbose);

    match cli.command {
        Commands::Templates { type_name, json } => commands::templates::run(type_name, json),

        Commands::Catalog { catalog, json } => commands::catalog::run(catalog, json),

        Commands::Resolve { name, catalog } => commands::resolve::run(name, catalog),

        Commands::Sanitize { document } => commands::sanitize::run(document),

        Commands::Compile {
            document,
            catalog,
            sanitize,
        } => commands::compile::run(document, catalog, sanitize),
    }
}
