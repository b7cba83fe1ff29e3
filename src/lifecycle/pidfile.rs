//! Pid file support.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Append this process's pid to `path`, creating the file if needed.
pub fn write_pidfile(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", std::process::id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failover.pid");

        write_pidfile(&path).unwrap();
        write_pidfile(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let expected = format!("{}\n", std::process::id());
        assert_eq!(content, expected.repeat(2));
    }
}
