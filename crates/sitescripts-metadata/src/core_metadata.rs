//! Core metadata (`METADATA` / `PKG-INFO`) header parsing
//!
//! Only the header block is read: it ends at the first blank line, after
//! which the long description follows.

/// Fields of interest from a core metadata file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub requires_dist: Vec<String>,
}

impl CoreMetadata {
    pub fn parse(content: &str) -> Self {
        let mut metadata = CoreMetadata::default();

        for (key, value) in headers(content) {
            match key.to_ascii_lowercase().as_str() {
                "name" if metadata.name.is_none() => metadata.name = Some(value),
                "version" if metadata.version.is_none() => metadata.version = Some(value),
                "requires-dist" => metadata.requires_dist.push(value),
                _ => {}
            }
        }

        metadata
    }
}

/// Header fields in order, with continuation lines folded into their field
fn headers(content: &str) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = fields.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            fields.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    fields
}
