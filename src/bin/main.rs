mod opt;

use crate::opt::Opt;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use histcmp::{
    comparison::{labels_for, ComparisonSet},
    file,
    prelude::*,
    GIT_BRANCH, GIT_REV, VERSION,
};
use log::{debug, info};

fn main() -> Result<()> {
    let args = argfile::expand_args_from(
        std::env::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )
    .with_context(|| "Failed to read argument file")?;
    let opt = Opt::parse_from(args);

    let env = Env::default().filter_or("HISTCMP_LOG", &opt.loglevel);
    env_logger::init_from_env(env);

    if let (Some(rev), Some(branch)) = (GIT_REV, GIT_BRANCH) {
        info!("histcmp {VERSION} rev {rev} ({branch})");
    } else {
        info!("histcmp {VERSION}");
    }

    debug!("settings: {:#?}", opt);

    let config = opt.run_config()?;
    let labels = labels_for(&opt.infiles, opt.labels.clone())?;
    let mut containers = Vec::with_capacity(opt.infiles.len());
    for infile in &opt.infiles {
        let container = file::open(infile, &opt.folder)
            .with_context(|| format!("Failed to load {infile:?}"))?;
        containers.push(container);
    }
    let set = ComparisonSet::new(containers, labels, &config)?;

    let output = output_file(&opt);
    let archive = Archive::builder()
        .filename(&output)
        .compression(opt.compression)
        .build();
    let mut writer = archive.create()?;
    let summary = ComparisonDriver::new(&config)
        .with_progress(true)
        .run(&set, &mut writer)?;
    let written = writer.finish()?;

    for omitted in &summary.omitted {
        info!("{}: skipped {}", omitted.path, omitted.reason);
    }
    info!("Wrote {written} comparisons to {output:?}");
    Ok(())
}

fn output_file(opt: &Opt) -> PathBuf {
    let Some(compression) = opt.compression else {
        return opt.output.clone();
    };
    let suffix = compression.suffix();
    if opt.output.to_string_lossy().ends_with(suffix) {
        opt.output.clone()
    } else {
        let mut output = opt.output.clone().into_os_string();
        output.push(suffix);
        output.into()
    }
}
