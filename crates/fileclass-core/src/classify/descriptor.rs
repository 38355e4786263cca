use std::path::{Component, Path, PathBuf};

/// Facts about a file derived once per classification call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: PathBuf,
    /// Lowercased, with the leading dot (`.ts`); empty when absent
    pub extension: String,
    pub basename: String,
    /// Parent directory, `.` for a bare file name
    pub dirname: String,
}

impl FileDescriptor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dirname = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().into_owned(),
            _ => ".".to_string(),
        };

        Self {
            path: path.to_path_buf(),
            extension,
            basename,
            dirname,
        }
    }

    /// Segments of the lexically normalized path.
    ///
    /// `..` removes the preceding segment; `.` and roots are dropped.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        for component in self.path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
                Component::ParentDir => {
                    segments.pop();
                }
                _ => {}
            }
        }
        segments
    }

    /// Substitute `${filename}` and `${ext}` in a rule target path
    pub fn resolve_target(&self, target_path: &str) -> String {
        let mut resolved = target_path.to_string();
        if !self.basename.is_empty() {
            resolved = resolved.replacen("${filename}", &self.basename, 1);
        }
        if !self.extension.is_empty() {
            resolved = resolved.replacen("${ext}", &self.extension, 1);
        }
        resolved
    }
}
