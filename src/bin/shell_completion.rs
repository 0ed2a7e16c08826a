mod opt;

use crate::opt::Opt;

use std::{
    env::var_os,
    fs::{create_dir_all, File},
    io::{stdout, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, shells::*, Generator};
use dirs::{data_dir, home_dir};
use strum::{Display, EnumString};

#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    EnumString,
    ValueEnum,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "lowercase")]
enum Shell {
    Bash,
    Elvish,
    Fish,
    #[allow(clippy::enum_variant_names)]
    PowerShell,
    Zsh,
}

#[derive(Debug, Parser)]
#[clap(about = "Generate shell completions for histcmp")]
struct ShellSelect {
    /// Shell for which to generate completions
    ///
    /// Completions for bash and fish are installed in the user's
    /// completion directory, for all other shells they are written to
    /// standard output.
    #[clap(value_enum)]
    shell: Shell,
}

fn gen_completion<S: Generator, W: Write>(shell: S, mut to: W) {
    generate(shell, &mut Opt::command(), "histcmp", &mut to);
}

fn main() -> Result<()> {
    let shell = ShellSelect::parse().shell;
    eprintln!("Generating {shell} completions");
    match shell {
        Shell::Bash => gen_completion(Bash, gen_bash_outfile()?),
        Shell::Elvish => gen_completion(Elvish, stdout()),
        Shell::Fish => gen_completion(Fish, gen_fish_outfile()?),
        Shell::PowerShell => gen_completion(PowerShell, stdout()),
        Shell::Zsh => gen_completion(Zsh, stdout()),
    }
    Ok(())
}

fn user_data_dir() -> Result<PathBuf> {
    if let Some(dir) = var_os("XDG_DATA_HOME") {
        return Ok(PathBuf::from(dir));
    }
    data_dir()
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .ok_or_else(|| anyhow!("No home directory found"))
}

fn gen_bash_outfile() -> Result<File> {
    let mut outfile = match var_os("BASH_COMPLETION_USER_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => user_data_dir()?.join("bash-completion"),
    };
    outfile.push("completions");
    outfile.push("histcmp");
    create_file(outfile)
}

fn gen_fish_outfile() -> Result<File> {
    let mut outfile = user_data_dir()?;
    for part in ["fish", "vendor_completions.d", "histcmp.fish"] {
        outfile.push(part);
    }
    create_file(outfile)
}

fn create_file<P: AsRef<Path>>(name: P) -> Result<File> {
    let name = name.as_ref();
    if let Some(dir) = name.parent() {
        create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {dir:?}"))?;
    }
    eprintln!("Writing completions to {name:?}");
    File::create(name).with_context(|| format!("Failed to create {name:?}"))
}
