//! Map definition sources
//!
//! A map definition is a JSON document `{"map": [[code; W]; H]}` keyed by a
//! small index. Sources only retrieve the raw text; parsing and validation
//! happen in [`crate::sim::map`].

use std::path::PathBuf;

use crate::consts::MAP_POOL_SIZE;
use crate::error::LoadError;

/// Something that can hand out map definitions by index
pub trait MapSource {
    /// Raw JSON for map `index`
    fn fetch(&self, index: usize) -> Result<String, LoadError>;

    /// Number of maps available (indices `0..pool_size()`)
    fn pool_size(&self) -> usize {
        MAP_POOL_SIZE
    }
}

const EMBEDDED: [&str; MAP_POOL_SIZE] = [
    include_str!("../assets/maps/map0.json"),
    include_str!("../assets/maps/map1.json"),
    include_str!("../assets/maps/map2.json"),
    include_str!("../assets/maps/map3.json"),
    include_str!("../assets/maps/map4.json"),
    include_str!("../assets/maps/map5.json"),
    include_str!("../assets/maps/map6.json"),
    include_str!("../assets/maps/map7.json"),
    include_str!("../assets/maps/map8.json"),
    include_str!("../assets/maps/map9.json"),
];

/// The shipped map pool, compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedMaps;

impl MapSource for EmbeddedMaps {
    fn fetch(&self, index: usize) -> Result<String, LoadError> {
        EMBEDDED
            .get(index)
            .map(|json| json.to_string())
            .ok_or(LoadError::UnknownMap {
                index,
                pool: MAP_POOL_SIZE,
            })
    }
}

/// Reads `map{index}.json` from a directory
#[derive(Debug, Clone)]
pub struct DirMapSource {
    dir: PathBuf,
}

impl DirMapSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MapSource for DirMapSource {
    fn fetch(&self, index: usize) -> Result<String, LoadError> {
        if index >= MAP_POOL_SIZE {
            return Err(LoadError::UnknownMap {
                index,
                pool: MAP_POOL_SIZE,
            });
        }
        let path = self.dir.join(format!("map{index}.json"));
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io { index, source })
    }
}

/// In-memory definitions, for tools and tests that build their own pool
#[derive(Debug, Clone, Default)]
pub struct MemoryMaps {
    maps: Vec<String>,
}

impl MemoryMaps {
    pub fn new(maps: Vec<String>) -> Self {
        Self { maps }
    }
}

impl MapSource for MemoryMaps {
    fn fetch(&self, index: usize) -> Result<String, LoadError> {
        self.maps.get(index).cloned().ok_or(LoadError::UnknownMap {
            index,
            pool: self.maps.len(),
        })
    }

    fn pool_size(&self) -> usize {
        self.maps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_pool_is_complete() {
        for i in 0..MAP_POOL_SIZE {
            assert!(EmbeddedMaps.fetch(i).unwrap().contains("\"map\""));
        }
        assert!(matches!(
            EmbeddedMaps.fetch(MAP_POOL_SIZE),
            Err(LoadError::UnknownMap { .. })
        ));
    }

    #[test]
    fn test_dir_source_missing_file() {
        let source = DirMapSource::new("/nonexistent/recoil-island-maps");
        assert!(matches!(source.fetch(2), Err(LoadError::Io { index: 2, .. })));
    }

    #[test]
    fn test_dir_source_reads_shipped_maps() {
        let source = DirMapSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/maps"));
        assert_eq!(source.fetch(4).unwrap(), EmbeddedMaps.fetch(4).unwrap());
    }
}
