//! Installed distribution records

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core_metadata::CoreMetadata;
use crate::entry_point::{EntryPoint, EntryPoints};
use crate::errors::MetadataError;
use crate::normalize::{normalize_name, split_metadata_dir_name};
use crate::requirement::Requirement;

const DIST_INFO_SUFFIX: &str = ".dist-info";
const EGG_INFO_SUFFIX: &str = ".egg-info";
const ENTRY_POINTS_TXT: &str = "entry_points.txt";
const UNKNOWN_VERSION: &str = "unknown";

/// On-disk shape of a metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    /// `name-version.dist-info/` with `METADATA`
    DistInfo,
    /// `name-version.egg-info/` with `PKG-INFO` and `requires.txt`
    EggInfo,
    /// A bare `name-version.egg-info` file holding `PKG-INFO` content
    EggInfoFile,
}

impl MetadataFormat {
    /// Classify a directory entry by name and type; `None` for anything else
    pub fn detect(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if file_name.ends_with(DIST_INFO_SUFFIX) {
            return path.is_dir().then_some(MetadataFormat::DistInfo);
        }
        if file_name.ends_with(EGG_INFO_SUFFIX) {
            if path.is_dir() {
                return Some(MetadataFormat::EggInfo);
            }
            if path.is_file() {
                return Some(MetadataFormat::EggInfoFile);
            }
        }
        None
    }

    fn suffix(self) -> &'static str {
        match self {
            MetadataFormat::DistInfo => DIST_INFO_SUFFIX,
            MetadataFormat::EggInfo | MetadataFormat::EggInfoFile => EGG_INFO_SUFFIX,
        }
    }
}

/// An installed package: identity, requirements and declared entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    name: String,
    key: String,
    version: String,
    location: PathBuf,
    metadata_path: Option<PathBuf>,
    requires: Vec<Requirement>,
    entry_points: EntryPoints,
}

impl Distribution {
    pub fn new(name: &str, version: &str, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            key: normalize_name(name),
            version: version.to_string(),
            location: location.into(),
            metadata_path: None,
            requires: Vec::new(),
            entry_points: EntryPoints::new(),
        }
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    pub fn with_entry_point(mut self, entry_point: EntryPoint) -> Self {
        self.entry_points.push(entry_point);
        self
    }

    /// Read a `.dist-info` / `.egg-info` record
    pub fn from_metadata_path(path: &Path) -> Result<Self, MetadataError> {
        let format = MetadataFormat::detect(path).ok_or_else(|| {
            MetadataError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a metadata record"),
            )
        })?;
        Self::read(path, format)
    }

    pub(crate) fn read(path: &Path, format: MetadataFormat) -> Result<Self, MetadataError> {
        let (metadata_file, requires_txt) = match format {
            MetadataFormat::DistInfo => (path.join("METADATA"), None),
            MetadataFormat::EggInfo => (path.join("PKG-INFO"), Some(path.join("requires.txt"))),
            MetadataFormat::EggInfoFile => (path.to_path_buf(), None),
        };

        let metadata = read_optional(&metadata_file)?
            .map(|content| CoreMetadata::parse(&content))
            .unwrap_or_default();

        let stem = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(format.suffix()))
            .unwrap_or_default();
        let (dir_name, dir_version) = split_metadata_dir_name(stem);

        let name = metadata
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| (!dir_name.is_empty()).then(|| dir_name.to_string()))
            .ok_or_else(|| MetadataError::MissingName(path.to_path_buf()))?;
        let version = metadata
            .version
            .clone()
            .or_else(|| dir_version.map(ToString::to_string))
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        let mut requires = metadata
            .requires_dist
            .iter()
            .map(|raw| Requirement::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(requires_txt) = requires_txt {
            if let Some(content) = read_optional(&requires_txt)? {
                requires.extend(parse_requires_txt(&content)?);
            }
        }

        let entry_points = match format {
            MetadataFormat::EggInfoFile => EntryPoints::new(),
            _ => read_optional(&path.join(ENTRY_POINTS_TXT))?
                .map(|content| EntryPoints::parse(&content))
                .unwrap_or_default(),
        };

        let location = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        debug!("Read distribution {} {} from {:?}", name, version, path);

        Ok(Self {
            key: normalize_name(&name),
            name,
            version,
            location,
            metadata_path: Some(path.to_path_buf()),
            requires,
            entry_points,
        })
    }

    /// Name as declared in metadata
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized name, the identity used for lookups
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory the distribution is installed into (its site-packages)
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn metadata_path(&self) -> Option<&Path> {
        self.metadata_path.as_deref()
    }

    pub fn requires(&self) -> &[Requirement] {
        &self.requires
    }

    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }
}

/// setuptools `requires.txt`: unsectioned lines apply always, `[:marker]`
/// sections conditionally, `[extra]` and `[extra:marker]` only with the extra.
fn parse_requires_txt(content: &str) -> Result<Vec<Requirement>, MetadataError> {
    let mut requires = Vec::new();
    let mut section: Option<(String, String)> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let inner = &line[1..line.len() - 1];
            let (extra, marker) = inner.split_once(':').unwrap_or((inner, ""));
            section = Some((extra.trim().to_string(), marker.trim().to_string()));
            continue;
        }

        let requirement = Requirement::parse(line)?;
        let requirement = match &section {
            None => requirement,
            Some((extra, marker)) if extra.is_empty() => requirement.with_marker(marker)?,
            Some((extra, marker)) => requirement
                .with_marker(&format!("extra == \"{}\"", extra))?
                .with_marker(marker)?,
        };
        requires.push(requirement);
    }

    Ok(requires)
}

fn read_optional(path: &Path) -> Result<Option<String>, MetadataError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(MetadataError::io(path, err)),
    }
}
