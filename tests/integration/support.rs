use milka::sketch::config::SidecarLoader;
use milka::{IndexOptions, SketchIndex};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary sketches root populated file by file
pub struct SketchRoot {
    temp: TempDir,
}

impl SketchRoot {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .fold(self.temp.path().to_path_buf(), |acc, seg| acc.join(seg))
    }

    pub fn file(&self, rel: &str, contents: &str) -> &Self {
        let path = self.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    pub fn dir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.join(rel)).unwrap();
        self
    }

    pub fn index(&self) -> SketchIndex {
        SketchIndex::build(IndexOptions::new(self.path()), &SidecarLoader)
    }
}
