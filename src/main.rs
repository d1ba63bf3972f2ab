use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use crust_model::config::{self, ProjectManifest};
use crust_model::environment::{Language, System};
use crust_model::{Build, BuildTarget};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crust", about = "Meson-like build system CLI", version, propagate_version = true)]
struct Cli {
    /// Project manifest to evaluate
    #[arg(long, global = true, default_value = "crust.toml")]
    manifest: PathBuf,
    /// Name artifacts for this system instead of the manifest's or the host's
    #[arg(long, global = true)]
    system: Option<System>,
    /// Log registry events
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the project and list every artifact it declares
    Configure,
    /// Show everything known about one target
    Target {
        /// Target name
        name: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_summary(out: &mut impl Write, build: &Build) -> io::Result<()> {
    writeln!(
        out,
        "Project {}: {} targets, {} tests, {} configure files",
        build.get_project().unwrap_or("<unnamed>"),
        build.get_targets().len(),
        build.get_tests().len(),
        build.get_configure_files().len()
    )?;
    for target in build.get_targets().values() {
        let aliases = target.get_aliaslist();
        if aliases.is_empty() {
            writeln!(out, "  {} ({}) -> {}", target.name(), target.kind(), target.get_filename())?;
        } else {
            writeln!(
                out,
                "  {} ({}) -> {} [{}]",
                target.name(),
                target.kind(),
                target.get_filename(),
                aliases.join(", ")
            )?;
        }
        let rpaths = target.get_rpaths();
        if !rpaths.is_empty() {
            writeln!(out, "      rpaths: {}", rpaths.join(" "))?;
        }
        for list in target.get_generated_sources() {
            writeln!(
                out,
                "      generated: {} -> {}",
                list.get_generator().get_exe().name(),
                list.get_outfilelist().join(" ")
            )?;
        }
    }
    Ok(())
}

fn print_target(target: &BuildTarget) {
    println!("{} ({})", target.name(), target.kind());
    println!("  subdir:    {}", target.get_subdir());
    println!("  filename:  {}", target.get_filename());
    println!("  aliases:   {}", target.get_aliaslist().join(" "));
    println!("  install:   {}", target.should_install());
    println!("  sources:   {}", target.get_sources().join(" "));
    for list in target.get_generated_sources() {
        println!(
            "  generated: {} -> {}",
            list.get_generator().get_exe().name(),
            list.get_outfilelist().join(" ")
        );
    }
    println!("  objects:   {}", target.get_objects().join(" "));
    let links: Vec<_> = target.get_dependencies().iter().map(|t| t.name()).collect();
    println!("  links:     {}", links.join(" "));
    println!("  rpaths:    {}", target.get_rpaths().join(" "));
    for language in Language::ALL {
        let args = target.get_extra_args(language);
        if !args.is_empty() {
            println!("  {}: {}", language.args_key(), args.join(" "));
        }
        if let Some(pch) = target.get_pch(language) {
            println!("  {}: {}", language.pch_key(), pch.files().join(" "));
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let manifest = ProjectManifest::load(&cli.manifest)?;
    let build = config::declare(&manifest, cli.system)?;

    match cli.command {
        Commands::Configure => write_summary(&mut io::stdout().lock(), &build)?,
        Commands::Target { name } => {
            let target = build
                .get_target(&name)
                .ok_or_else(|| anyhow!("No target named '{}'", name))?;
            print_target(target);
        }
    }
    Ok(())
}
