//! Filesystem walk configuration

/// Walker configuration shared by the tree builder and the entry planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    pub follow_symlinks: bool,
    /// Maximum directory depth below the root; `None` walks everything
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

impl WalkerConfig {
    /// Sorted, depth-limited walkdir iterator rooted at `root`
    pub(crate) fn walk(&self, root: &std::path::Path) -> walkdir::WalkDir {
        let mut walker = walkdir::WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }
        walker
    }
}
