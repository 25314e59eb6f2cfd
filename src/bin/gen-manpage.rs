//! Writes lanreg man pages: `lanreg.1` plus one `lanreg-<command>.1` per
//! subcommand
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

fn render(cmd: clap::Command, dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join(format!("{}.1", cmd.get_name()));
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd).render(&mut buffer)?;
    fs::write(&path, buffer)?;
    Ok(path)
}

fn main() -> std::io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("man"), PathBuf::from);
    fs::create_dir_all(&output_dir)?;

    let mut cmd = cli::Cli::command();
    cmd.build();

    let mut pages = vec![render(cmd.clone(), &output_dir)?];
    for sub in cmd.get_subcommands() {
        let name = format!("lanreg-{}", sub.get_name());
        pages.push(render(sub.clone().name(name), &output_dir)?);
    }

    for page in &pages {
        println!("Generated {}", page.display());
    }
    println!("\nTo view: man -l {}", pages[0].display());
    println!(
        "To install: sudo install -m 644 {}/lanreg*.1 /usr/local/share/man/man1/ && sudo mandb",
        output_dir.display()
    );

    Ok(())
}
