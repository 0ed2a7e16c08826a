use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use histcmp::compression::Compression;
use histcmp::config::{AxisName, AxisRanges, NamePattern, RunConfig, DEFAULT_MAX_DEPTH};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub(crate) enum ParseRangeErr {
    #[error("Expected two comma-separated numbers, got `{0}`")]
    Format(String),
    #[error("`{0}` is not a number")]
    NotANumber(String),
}

/// Parse an axis range given as `low,high`
fn parse_range(s: &str) -> Result<(f64, f64), ParseRangeErr> {
    let Some((low, high)) = s.split_once(',') else {
        return Err(ParseRangeErr::Format(s.to_owned()));
    };
    let parse = |x: &str| {
        x.trim()
            .parse::<f64>()
            .map_err(|_| ParseRangeErr::NotANumber(x.to_owned()))
    };
    Ok((parse(low)?, parse(high)?))
}

#[derive(Debug, Default, Copy, Clone, Parser)]
pub(crate) struct RangeOpt {
    /// Range of the x axis as `low,high`.
    #[clap(long, value_parser = parse_range, allow_hyphen_values = true)]
    pub(crate) x_range: Option<(f64, f64)>,

    /// Range of the y axis as `low,high`.
    #[clap(long, value_parser = parse_range, allow_hyphen_values = true)]
    pub(crate) y_range: Option<(f64, f64)>,

    /// Range of the z axis as `low,high`.
    #[clap(long, value_parser = parse_range, allow_hyphen_values = true)]
    pub(crate) z_range: Option<(f64, f64)>,

    /// Range of the ratio axis as `low,high`. The default is `-4,4`.
    #[clap(long, value_parser = parse_range, allow_hyphen_values = true)]
    pub(crate) ratio_range: Option<(f64, f64)>,
}

impl From<RangeOpt> for AxisRanges {
    fn from(opt: RangeOpt) -> Self {
        let mut ranges = AxisRanges::default();
        let settings = [
            (AxisName::X, opt.x_range),
            (AxisName::Y, opt.y_range),
            (AxisName::Z, opt.z_range),
            (AxisName::Ratio, opt.ratio_range),
        ];
        for (axis, range) in settings {
            if let Some((low, high)) = range {
                ranges.set(axis, low, high);
            }
        }
        ranges
    }
}

#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub(crate) struct Opt {
    /// Output file.
    #[clap(long, short, default_value = "comp.yaml", value_parser)]
    pub(crate) output: PathBuf,

    /// Comma-separated labels, one for each input file.
    ///
    /// By default, labels are derived from the file names.
    #[clap(long, short, value_delimiter = ',')]
    pub(crate) labels: Option<Vec<String>>,

    /// Directory inside the input files where the search starts.
    #[clap(long, short, default_value = "/")]
    pub(crate) folder: String,

    /// Maximum depth of the directory search.
    #[clap(long, short, default_value_t = DEFAULT_MAX_DEPTH)]
    pub(crate) depth: usize,

    /// Compute ratios to the first file.
    #[clap(long, short)]
    pub(crate) ratio: bool,

    /// Do not rescale histograms to the integral of the first file.
    #[clap(long)]
    pub(crate) no_rescale: bool,

    /// Comma-separated names of directories to skip.
    #[clap(long, short, value_delimiter = ',')]
    pub(crate) exclude: Vec<String>,

    /// Only compare objects whose full path matches this regular expression.
    ///
    /// The expression has to match the whole path, e.g. `jets/.*` for
    /// all objects in the `jets` directory.
    #[clap(long = "match", short = 'm')]
    pub(crate) pattern: Option<String>,

    /// Also compare objects that are empty in all files.
    #[clap(long)]
    pub(crate) keep_empty: bool,

    /// Fail on ratios of collections with different numbers of members.
    ///
    /// By default, only the members present in both collections are
    /// divided.
    #[clap(long)]
    pub(crate) strict_collections: bool,

    /// Allow ratios of histograms with the same number of bins but
    /// different bin edges.
    #[clap(long)]
    pub(crate) allow_edge_mismatch: bool,

    #[clap(flatten)]
    pub(crate) ranges: RangeOpt,

    /// Do not draw a line at one in ratio plots.
    #[clap(long)]
    pub(crate) no_reference_line: bool,

    #[clap(long,
           help = "Compress output file.
Possible settings are 'bzip2', 'gzip', 'zstd', 'lz4'.
Compression levels can be set with algorithm_level e.g. 'zstd_5'.
Maximum levels are 'gzip_9', 'zstd_19', 'lz4_16'.")]
    pub(crate) compression: Option<Compression>,

    /// Verbosity level
    #[clap(
        short = 'v',
        long,
        default_value = "Info",
        help = "Verbosity level.
Possible values with increasing amount of output are
'off', 'error', 'warn', 'info', 'debug', 'trace'.\n"
    )]
    pub(crate) loglevel: String,

    /// Input files. The first file is the reference.
    #[clap(name = "INFILES", value_parser, required = true)]
    pub(crate) infiles: Vec<PathBuf>,
}

impl Opt {
    /// Settings for the comparison
    pub(crate) fn run_config(&self) -> Result<RunConfig> {
        let excluded: HashSet<String> = self.exclude.iter().cloned().collect();
        let builder = RunConfig::builder()
            .excluded(excluded)
            .max_depth(self.depth)
            .rescale(!self.no_rescale)
            .ratio(self.ratio)
            .keep_empty(self.keep_empty)
            .strict_collections(self.strict_collections)
            .require_equal_edges(!self.allow_edge_mismatch)
            .ranges(self.ranges.into())
            .reference_line(!self.no_reference_line);
        let config = match &self.pattern {
            Some(pattern) => {
                let pattern = NamePattern::new(pattern)
                    .with_context(|| format!("Invalid pattern `{pattern}`"))?;
                builder.include(pattern).build()
            }
            None => builder.build(),
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use histcmp::config::Range;

    #[test]
    fn ranges() {
        assert_eq!(parse_range("-1, 2.5").unwrap(), (-1., 2.5));
        assert!(matches!(parse_range("1"), Err(ParseRangeErr::Format(_))));
        assert!(matches!(parse_range("a,1"), Err(ParseRangeErr::NotANumber(_))));
    }

    #[test]
    fn options() {
        let opt = Opt::parse_from([
            "histcmp",
            "-r",
            "--ratio-range",
            "0,2",
            "--x-range",
            "3,1",
            "-m",
            "jets/.*",
            "-e",
            "a,b",
            "ref.yaml",
            "new.yaml.gz",
        ]);
        assert_eq!(opt.infiles.len(), 2);
        let config = opt.run_config().unwrap();
        assert!(config.ratio);
        assert!(config.rescale);
        assert_eq!(config.ranges.ratio, Some(Range { low: 0., high: 2. }));
        assert_eq!(config.ranges.x, None);
        assert_eq!(config.excluded.len(), 2);
        assert!(config.include.unwrap().is_match("jets/pt"));

        let opt = Opt::parse_from(["histcmp", "-m", "(", "ref.yaml"]);
        assert!(opt.run_config().is_err());
    }
}
