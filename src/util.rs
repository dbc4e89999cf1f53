//! Small filesystem helpers.

use std::fs;
use std::path::Path;

use crate::error::Error;

/// Read a text resource (typically shader source) from disk.
///
/// # Errors
///
/// Returns [`Error::Load`] naming the path when the file cannot be read
/// or is not valid UTF-8.
pub fn load_resource(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| Error::load(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_reports_the_path() {
        let err = load_resource("no/such/resource.vert").unwrap_err();
        assert!(err.to_string().contains("no/such/resource.vert"));
    }

    #[test]
    fn reads_existing_file() {
        let path = std::env::temp_dir().join("glint-util-read-test.txt");
        fs::write(&path, "void main() {}").unwrap();
        let text = load_resource(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(text, "void main() {}");
    }
}
