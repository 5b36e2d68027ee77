//! File and console I/O around the core. The core itself only sees byte slices.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, error};
use tempfile::NamedTempFile;

use super::cli::{output_path, HpOpts, Output};
use crate::error::Result;

/// Read the whole input file into memory.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Strip trailing ASCII whitespace in place. Vertical tab (0x0B) counts as whitespace
/// here, although `u8::is_ascii_whitespace` leaves it out.
pub fn trim_trailing_whitespace(data: &mut Vec<u8>) {
    let keep = data
        .iter()
        .rposition(|&b| !is_space(b))
        .map_or(0, |idx| idx + 1);
    data.truncate(keep);
}

fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}

/// Write the result to stdout or to the output file. Returns the path written, if any.
/// An existing file is only replaced when force_overwrite is set.
pub fn write_output(opts: &HpOpts, data: &[u8]) -> Result<Option<PathBuf>> {
    match opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(data)?;
            lock.flush()?;
            Ok(None)
        }
        Output::File => {
            let path = output_path(opts);
            write_file(&path, opts.force_overwrite, |f_out| f_out.write_all(data))?;
            debug!("Wrote {} bytes to {}", data.len(), path.display());
            Ok(Some(path))
        }
    }
}

/// Fill a temp file next to `path`, then move it into place. If `fill` fails the
/// temp file is dropped (and removed), so the target is never left half written.
fn write_file<F>(path: &Path, force: bool, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    if !force && path.exists() {
        return Err(already_exists(path));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    fill(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;

    let placed = if force {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    match placed {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Err(already_exists(path)),
        Err(e) => Err(e.error),
    }
}

fn already_exists(path: &Path) -> io::Error {
    error!(
        "Output file {} already exists. Use --force to overwrite it.",
        path.display()
    );
    io::Error::new(
        ErrorKind::AlreadyExists,
        format!("{} already exists", path.display()),
    )
}
