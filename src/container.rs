use log::trace;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::object::{Collection, Graph, PlotKind, PlotObject, ShapeError};
use crate::traits::Container;

/// Type tag of sub-directories
pub const DIRECTORY_TAG: &str = "TDirectoryFile";

/// A key in a container, i.e. a name together with a type tag
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Key {
    pub name: String,
    pub type_tag: String,
}

/// Whether a type tag denotes a sub-container
pub fn is_directory_tag(tag: &str) -> bool {
    tag.starts_with("TDirectory")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("No object with name `{0}`")]
    Missing(String),
    #[error("`{0}` is not a directory")]
    NotADirectory(String),
    #[error("`{0}` is a directory")]
    IsADirectory(String),
    #[error("`{path}` has unsupported type `{type_tag}`")]
    Unsupported { path: String, type_tag: String },
    #[error("`{path}` could not be read: {reason}")]
    Unreadable { path: String, reason: String },
}

/// An entry inside a [Directory]
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Directory(Directory),
    Object(PlotObject),
    /// Something we know the type tag of, but cannot compare
    Unsupported,
    /// An object that failed to load, with the reason
    Unreadable(String),
}

#[derive(Clone, Debug, PartialEq)]
struct Node {
    name: String,
    type_tag: String,
    entry: Entry,
}

/// In-memory hierarchical container
///
/// Keys are kept in insertion order, which is the order in which they
/// appear in the input file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Directory {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Key {0:?} is not a string")]
    KeyNotString(Value),
    #[error("Entry `{0}` is not a mapping")]
    NotAMapping(String),
    #[error("Entry `{0}` has no type tag")]
    MissingType(String),
    #[error("Directory `{0}` has no `keys`")]
    MissingKeys(String),
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, using the canonical type tag for its kind
    pub fn with_object(mut self, name: impl Into<String>, obj: PlotObject) -> Self {
        let type_tag = obj.kind().type_tag().to_owned();
        self.insert(name, type_tag, Entry::Object(obj));
        self
    }

    /// Add a sub-directory
    pub fn with_directory(mut self, name: impl Into<String>, dir: Directory) -> Self {
        self.insert(name, DIRECTORY_TAG.to_owned(), Entry::Directory(dir));
        self
    }

    /// Add an arbitrary entry
    ///
    /// An existing entry with the same name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, type_tag: String, entry: Entry) {
        let name = name.into();
        let node = Node { name, type_tag, entry };
        match self.nodes.iter_mut().find(|n| n.name == node.name) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    fn lookup(&self, path: &str) -> Result<&Node, LookupError> {
        let mut segments = split_path(path);
        let Some(first) = segments.next() else {
            return Err(LookupError::Missing(path.to_owned()));
        };
        let mut node = self
            .node(first)
            .ok_or_else(|| LookupError::Missing(path.to_owned()))?;
        for segment in segments {
            let Entry::Directory(dir) = &node.entry else {
                return Err(LookupError::NotADirectory(node.name.clone()));
            };
            node = dir
                .node(segment)
                .ok_or_else(|| LookupError::Missing(path.to_owned()))?;
        }
        Ok(node)
    }

    /// Parse a directory from its YAML representation
    ///
    /// Each key maps to an entry with a `type` tag. Directories list
    /// their content under `keys`, all other entries are parsed as the
    /// object given by the type. Objects that fail to parse do not
    /// make the whole directory fail, they are kept as
    /// [Entry::Unreadable] instead.
    pub fn from_mapping(mapping: Mapping) -> Result<Self, ParseError> {
        let mut dir = Directory::new();
        for (key, value) in mapping {
            let Value::String(name) = key else {
                return Err(ParseError::KeyNotString(key));
            };
            let Value::Mapping(mut body) = value else {
                return Err(ParseError::NotAMapping(name));
            };
            let type_tag = match body.remove("type") {
                Some(Value::String(tag)) => tag,
                _ => return Err(ParseError::MissingType(name)),
            };
            let entry = if is_directory_tag(&type_tag) {
                let keys = match body.remove("keys") {
                    Some(Value::Mapping(keys)) => keys,
                    Some(Value::Null) => Mapping::new(),
                    _ => return Err(ParseError::MissingKeys(name)),
                };
                Entry::Directory(Directory::from_mapping(keys)?)
            } else {
                parse_object(&type_tag, body)
            };
            trace!("Read `{name}` of type {type_tag}");
            dir.insert(name, type_tag, entry);
        }
        Ok(dir)
    }
}

fn parse_object(type_tag: &str, body: Mapping) -> Entry {
    use PlotKind::*;

    let Some(kind) = PlotKind::from_type_tag(type_tag) else {
        return Entry::Unsupported;
    };
    let obj = match kind {
        CurveCollection | HistogramStack => {
            return match parse_collection(kind, body) {
                Ok(obj) => Entry::Object(obj),
                Err(err) => Entry::Unreadable(err),
            }
        }
        Histogram1D => from_body(body).map(PlotObject::Histogram1D),
        Histogram2D => from_body(body).map(PlotObject::Histogram2D),
        Profile1D => from_body(body).map(PlotObject::Profile1D),
        Profile2D => from_body(body).map(PlotObject::Profile2D),
        Curve => from_body(body).map(|g: Graph| PlotObject::Curve(g.without_errors())),
        CurveSymmetric => from_body(body).map(PlotObject::CurveSymmetric),
        CurveAsymmetric => from_body(body).map(PlotObject::CurveAsymmetric),
    };
    match obj {
        Ok(obj) => Entry::Object(obj),
        Err(err) => Entry::Unreadable(err.to_string()),
    }
}

fn from_body<T: serde::de::DeserializeOwned>(body: Mapping) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_value(Value::Mapping(body))
}

fn parse_collection(kind: PlotKind, mut body: Mapping) -> Result<PlotObject, String> {
    let title = match body.remove("title") {
        Some(Value::String(title)) => title,
        _ => String::new(),
    };
    let members = match body.remove("members") {
        Some(Value::Sequence(members)) => members,
        _ => return Err("collection has no `members` list".to_owned()),
    };
    let mut objects = Vec::with_capacity(members.len());
    for (n, member) in members.into_iter().enumerate() {
        let Value::Mapping(mut member) = member else {
            return Err(format!("member {n} is not a mapping"));
        };
        let Some(Value::String(tag)) = member.remove("type") else {
            return Err(format!("member {n} has no type tag"));
        };
        match PlotKind::from_type_tag(&tag) {
            Some(k) if !k.is_collection() => {}
            _ => return Err(format!("member {n} has unsupported type `{tag}`")),
        }
        match parse_object(&tag, member) {
            Entry::Object(obj) => objects.push(obj),
            Entry::Unreadable(err) => return Err(format!("member {n}: {err}")),
            _ => return Err(format!("member {n} has unsupported type `{tag}`")),
        }
    }
    let collection = match kind {
        PlotKind::CurveCollection => {
            Collection::curves(objects).map(PlotObject::CurveCollection)
        }
        _ => Collection::histograms(objects).map(PlotObject::HistogramStack),
    };
    let mut collection = collection.map_err(|err: ShapeError| err.to_string())?;
    collection.set_title(title);
    Ok(collection)
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl Container for Directory {
    fn keys(&self) -> Vec<Key> {
        self.nodes
            .iter()
            .map(|n| Key {
                name: n.name.clone(),
                type_tag: n.type_tag.clone(),
            })
            .collect()
    }

    fn get_directory(&self, path: &str) -> Result<&Self, LookupError> {
        if split_path(path).next().is_none() {
            return Ok(self);
        }
        let node = self.lookup(path)?;
        match &node.entry {
            Entry::Directory(dir) => Ok(dir),
            _ => Err(LookupError::NotADirectory(path.to_owned())),
        }
    }

    fn get(&self, path: &str) -> Result<PlotObject, LookupError> {
        let node = self.lookup(path)?;
        match &node.entry {
            Entry::Object(obj) => Ok(obj.clone()),
            Entry::Directory(_) => Err(LookupError::IsADirectory(path.to_owned())),
            Entry::Unsupported => Err(LookupError::Unsupported {
                path: path.to_owned(),
                type_tag: node.type_tag.clone(),
            }),
            Entry::Unreadable(reason) => Err(LookupError::Unreadable {
                path: path.to_owned(),
                reason: reason.clone(),
            }),
        }
    }
}
