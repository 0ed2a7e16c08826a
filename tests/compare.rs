use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use histcmp::{
    comparison::{labels_for, ComparisonSet},
    compression::{compress_writer, Compression},
    driver::Omission,
    file,
    prelude::*,
};
use serde::Deserialize;
use serde_yaml::Value;

const REFERENCE: &str = r#"
h1:
  type: TH1D
  axis: {bins: 2, low: 0, high: 2}
  contents: [1, 3]
h2:
  type: TProfile
  axis: {edges: [0, 1, 3]}
  contents: [0.5, 0.7]
  errors: [0.1, 0.1]
dir:
  type: TDirectoryFile
  keys:
    h3:
      type: TH1F
      axis: {bins: 2, low: 0, high: 2}
      contents: [2, 2]
    cube:
      type: TH3D
skip:
  type: TDirectoryFile
  keys:
    h4:
      type: TH1D
      axis: {bins: 1, low: 0, high: 1}
      contents: [1]
"#;

const SECOND: &str = r#"
h1:
  type: TH1D
  axis: {bins: 2, low: 0, high: 2}
  contents: [2, 6]
h2:
  type: TProfile
  axis: {edges: [0, 1, 3]}
  contents: [0.5, 1.4]
  errors: [0.1, 0.1]
dir:
  type: TDirectoryFile
  keys:
    h3:
      type: TH1F
      axis: {bins: 2, low: 0, high: 2}
      contents: [1, 1]
"#;

const THIRD: &str = r#"
h1:
  type: TH1D
  axis: {bins: 2, low: 0, high: 2}
  contents: [1, 3]
h2:
  type: TProfile
  axis: {edges: [0, 1, 3]}
  contents: [0.5, 0.7]
  errors: [0.1, 0.1]
"#;

fn log_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_file(
    dir: &Path,
    name: &str,
    content: &str,
    compression: Option<Compression>,
) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut w = compress_writer(file, compression).unwrap();
    w.write_all(content.as_bytes()).unwrap();
    path
}

fn documents(path: &Path) -> Vec<Value> {
    let yaml = std::fs::read_to_string(path).unwrap();
    serde_yaml::Deserializer::from_str(&yaml)
        .map(|doc| Value::deserialize(doc).unwrap())
        .collect()
}

#[test]
fn three_files() {
    log_init();
    let tmp = tempfile::tempdir().unwrap();
    let files = [
        write_file(tmp.path(), "reference.yaml", REFERENCE, None),
        write_file(tmp.path(), "second.yaml.gz", SECOND, Some(Compression::Gzip(6))),
        write_file(tmp.path(), "third.yml.bz2", THIRD, Some(Compression::Bzip2)),
    ];

    let config = RunConfig::builder()
        .excluded(["skip".to_owned()])
        .ratio(true)
        .build();
    let labels = labels_for(&files, None).unwrap();
    assert_eq!(labels, ["reference", "second", "third"]);
    let containers: Vec<Directory> = files
        .iter()
        .map(|f| file::open(f, "/").unwrap())
        .collect();
    let set = ComparisonSet::new(containers, labels, &config).unwrap();
    assert_eq!(set.paths(), ["h1", "h2", "dir/h3"]);
    assert_eq!(set.skipped().len(), 2);

    let output = tmp.path().join("comp.yaml");
    let mut writer = Archive::builder()
        .filename(&output)
        .build()
        .create()
        .unwrap();
    let summary = ComparisonDriver::new(&config)
        .run(&set, &mut writer)
        .unwrap();
    assert_eq!(writer.finish().unwrap(), 3);
    assert_eq!(summary.emitted, ["h1", "h2", "dir/h3"]);
    assert_eq!(summary.omitted.len(), 1);
    assert_eq!(summary.omitted[0].path, "dir/h3");
    assert!(matches!(
        &summary.omitted[0].reason,
        Omission::MissingObject { label, .. } if label == "third"
    ));

    let docs = documents(&output);
    assert_eq!(docs.len(), 3);

    // second histogram has twice the integral
    let h1 = &docs[0];
    assert_eq!(h1["path"], "h1");
    assert_eq!(h1["overlay"].as_sequence().unwrap().len(), 3);
    assert_eq!(h1["overlay"][1]["scale"], 0.5);
    assert_eq!(h1["ratio"]["members"].as_sequence().unwrap().len(), 2);
    assert_eq!(h1["ratio"]["range"]["low"], -4.);

    // profiles are never rescaled
    let h2 = &docs[1];
    assert_eq!(h2["overlay"][1]["scale"], 1.);

    let h3 = &docs[2];
    assert_eq!(h3["path"], "dir/h3");
    let overlay = h3["overlay"].as_sequence().unwrap();
    assert_eq!(overlay.len(), 2);
    assert_eq!(overlay[1]["label"], "second");
    assert_eq!(overlay[1]["scale"], 2.);
    let ratio = h3["ratio"]["members"].as_sequence().unwrap();
    assert_eq!(ratio.len(), 1);
    assert_eq!(ratio[0]["label"], "second");
}

#[test]
fn start_folder_and_pattern() {
    log_init();
    let tmp = tempfile::tempdir().unwrap();
    let reference = write_file(tmp.path(), "a.yaml", REFERENCE, None);
    let other = write_file(tmp.path(), "b.yaml", SECOND, None);

    let config = RunConfig::builder()
        .include(NamePattern::new("h.*").unwrap())
        .build();
    let containers = vec![
        file::open(&reference, "dir").unwrap(),
        file::open(&other, "dir").unwrap(),
    ];
    let labels = vec!["a".to_owned(), "b".to_owned()];
    let set = ComparisonSet::new(containers, labels, &config).unwrap();
    assert_eq!(set.paths(), ["h3"]);

    let mut out = Vec::new();
    let summary = ComparisonDriver::new(&config).run(&set, &mut out).unwrap();
    assert!(summary.omitted.is_empty());
    assert_eq!(out.len(), 1);
    assert!(out[0].ratio.is_none());
    assert_eq!(out[0].kind, PlotKind::Histogram1D);
}
