//! Loading input text from plain files or from (possibly nested) zip packages.

use crate::error::{Error, Result};
use crate::FileKind;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Text of one input file, with the name it was found under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

/// Reads `path`, or a member of it when it is a `.zip` archive. Without a
/// `member` the first entry whose kind can be told from its name is used.
/// Bytes that are not UTF-8 are replaced.
pub fn load(path: &Path, member: Option<&str>) -> Result<Source> {
    let is_zip = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("zip"));

    if !is_zip {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        return Ok(Source {
            name: path.display().to_string(),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
    let (name, bytes) = select(&mut archive, member)?;
    Ok(Source {
        name,
        text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

fn select<R: Read + Seek>(archive: &mut ZipArchive<R>, member: Option<&str>) -> Result<(String, Vec<u8>)> {
    if let Some(member) = member {
        let bytes = read_entry(archive, member)?;
        if member.to_ascii_lowercase().ends_with(".zip") {
            return select(&mut ZipArchive::new(Cursor::new(bytes))?, None);
        }
        return Ok((member.to_owned(), bytes));
    }

    let names = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_owned()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if let Some(name) = names.iter().find(|n| FileKind::from_path(n).is_some()) {
        debug!(member = %name, "picked archive member");
        let bytes = read_entry(archive, name)?;
        return Ok((name.clone(), bytes));
    }

    // Packages sometimes wrap the data in another archive.
    for name in names.iter().filter(|n| n.to_ascii_lowercase().ends_with(".zip")) {
        let inner = read_entry(archive, name)?;
        if let Ok(found) = select(&mut ZipArchive::new(Cursor::new(inner))?, None) {
            return Ok(found);
        }
    }

    Err(Error::MissingMember {
        name: "*.sct, *.sct2, *.pos, *.ese or whazzup".to_owned(),
    })
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let mut file = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => Error::MissingMember {
            name: name.to_owned(),
        },
        e => e.into(),
    })?;

    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}
