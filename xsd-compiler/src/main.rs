//! Grounded on `generator/src/main.rs`'s load → resolve → generate →
//! write pipeline, with `env_logger`/`log` replacing the teacher's raw
//! `eprintln!` progress lines per SPEC_FULL.md's ambient stack.

mod cli;

use std::path::Path;

use clap::Parser;

fn module_name(cli: &cli::Cli) -> String {
    if let Some(name) = &cli.name {
        return name.clone();
    }
    Path::new(&cli.input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string())
}

fn main() {
    env_logger::init();
    let cli = cli::Cli::parse();

    log::info!("Reading '{}'...", cli.input);
    let graph = match xsd_resolver::resolve(&cli.input, &cli.force_type, cli.allow_dtd) {
        Ok(graph) => graph,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };
    log::info!("Resolved {} type(s)", graph.len());

    let options = xsd_generator::EmitOptions { exclude_namespaces: cli.exclude_namespace.clone() };
    let generated = xsd_generator::generate(&graph, &options);

    let module_name = module_name(&cli);
    let out_dir = Path::new(&cli.out_dir);
    if let Err(err) = std::fs::create_dir_all(out_dir) {
        log::error!("Failed to create output directory '{}': {err}", out_dir.display());
        std::process::exit(1);
    }
    let out_path = out_dir.join(format!("{module_name}.rs"));
    if let Err(err) = std::fs::write(&out_path, generated) {
        log::error!("Failed to write '{}': {err}", out_path.display());
        std::process::exit(1);
    }
    log::info!("Wrote '{}'", out_path.display());
}
