use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use log::debug;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::compression::{compress_writer, Compression};
use crate::driver::Comparison;
use crate::traits::Sink;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create {0:?}")]
    Create(PathBuf, #[source] std::io::Error),
    #[error("Failed to serialise comparison of `{0}`")]
    Serialise(String, #[source] serde_yaml::Error),
    #[error("Failed to write output")]
    Io(#[from] std::io::Error),
}

/// Output archive for comparisons
///
/// Each comparison is written as a separate YAML document.
#[derive(Clone, Debug, TypedBuilder)]
pub struct Archive {
    #[builder(setter(into))]
    filename: PathBuf,
    #[builder(default)]
    compression: Option<Compression>,
}

impl Archive {
    /// Create the output file
    pub fn create(&self) -> Result<ArchiveWriter<'static>, WriteError> {
        let file = File::create(&self.filename)
            .map_err(|err| WriteError::Create(self.filename.clone(), err))?;
        let writer = compress_writer(BufWriter::new(file), self.compression)
            .map_err(|err| WriteError::Create(self.filename.clone(), err))?;
        debug!("Writing comparisons to {:?}", self.filename);
        Ok(ArchiveWriter::new(writer))
    }
}

/// Sink writing comparisons as YAML documents
pub struct ArchiveWriter<'a> {
    writer: Box<dyn Write + 'a>,
    written: usize,
}

impl<'a> ArchiveWriter<'a> {
    pub fn new<W: Write + 'a>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            written: 0,
        }
    }

    /// Flush all output and return the number of comparisons written
    pub fn finish(mut self) -> Result<usize, WriteError> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

impl<'a> Sink<Comparison> for ArchiveWriter<'a> {
    type Error = WriteError;

    fn emit(&mut self, comparison: Comparison) -> Result<(), Self::Error> {
        let doc = serde_yaml::to_string(&comparison)
            .map_err(|err| WriteError::Serialise(comparison.path.clone(), err))?;
        self.writer.write_all(b"---\n")?;
        self.writer.write_all(doc.as_bytes())?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;

    use serde::Deserialize;
    use serde_yaml::Value;

    use crate::comparison::Labelled;
    use crate::config::{AxisRanges, Range};
    use crate::object::{Graph, PlotKind, PlotObject, Point};
    use crate::ratio::RatioView;

    fn comparison(path: &str) -> Comparison {
        let graph = Graph::new(vec![Point::new(0., 1.), Point::new(1., f64::NAN)]);
        let labelled = Labelled {
            label: "ref".to_owned(),
            scale: 1.,
            object: PlotObject::Curve(graph),
        };
        Comparison {
            path: path.to_owned(),
            kind: PlotKind::Curve,
            overlay: vec![labelled.clone()],
            ratio: Some(RatioView {
                reference: "ref".to_owned(),
                range: Range { low: 0., high: 2. },
                reference_line: true,
                members: vec![labelled],
            }),
            ranges: AxisRanges::default(),
        }
    }

    fn documents(yaml: &str) -> Vec<Value> {
        serde_yaml::Deserializer::from_str(yaml)
            .map(|doc| Value::deserialize(doc).unwrap())
            .collect()
    }

    #[test]
    fn one_document_per_comparison() {
        let mut out = Vec::new();
        let mut writer = ArchiveWriter::new(&mut out);
        writer.emit(comparison("a")).unwrap();
        writer.emit(comparison("dir/b")).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let docs = documents(std::str::from_utf8(&out).unwrap());
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["path"], "a");
        assert_eq!(docs[1]["path"], "dir/b");
        assert_eq!(docs[1]["kind"], "Curve");
        assert_eq!(docs[0]["ratio"]["range"]["high"], 2.);
    }

    #[test]
    fn compressed_archive() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("comp.yaml.gz");
        let archive = Archive::builder()
            .filename(&filename)
            .compression(Some(Compression::Gzip(6)))
            .build();
        let mut writer = archive.create().unwrap();
        writer.emit(comparison("h")).unwrap();
        writer.finish().unwrap();

        let file = File::open(&filename).unwrap();
        let mut yaml = String::new();
        flate2::read::GzDecoder::new(file)
            .read_to_string(&mut yaml)
            .unwrap();
        let docs = documents(&yaml);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["overlay"][0]["label"], "ref");
    }
}
