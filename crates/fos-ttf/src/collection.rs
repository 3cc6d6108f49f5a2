//! TrueType Collection (TTC) support
//!
//! A collection starts with a `ttcf` header listing the offsets of its
//! member table directories. Members are told apart by the full name in
//! their `name` tables, so resolving and listing both read every member's
//! directory and names, resetting the name scratch in between.

use std::collections::BTreeSet;

use crate::directory::{TableDirectory, Tag};
use crate::parser::name::read_name;
use crate::parser::FontReader;
use crate::{FontError, Result};

pub use crate::parser::name::FontNameScratch;

/// Names of one font, as listed for discovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FontInfo {
    pub postscript_name: String,
    pub family_names: BTreeSet<String>,
    pub subfamily_name: String,
    pub full_name: String,
    pub notice: String,
}

impl From<&FontNameScratch> for FontInfo {
    fn from(names: &FontNameScratch) -> Self {
        Self {
            postscript_name: names.resolved_postscript_name(),
            family_names: names.family_names.clone(),
            subfamily_name: names.subfamily_name.clone(),
            full_name: names.full_name.clone(),
            notice: names.notice.clone(),
        }
    }
}

/// Collection header
#[derive(Debug, Clone)]
pub struct Collection {
    offsets: Vec<u32>,
}

impl Collection {
    /// Whether `data` starts with a collection header
    pub fn is_collection(data: &[u8]) -> bool {
        data.starts_with(&Tag::TTCF.to_bytes())
    }

    /// Read the collection header at the start of the data, or `None` for a
    /// single font
    pub fn read(r: &mut FontReader<'_>) -> Result<Option<Self>> {
        r.seek(0)?;
        let tag = r
            .read_tag()
            .map_err(|_| FontError::MalformedHeader("file too short for a font header".into()))?;
        if tag != Tag::TTCF {
            return Ok(None);
        }

        r.skip(4)?; // version
        let count = r.read_u32()? as usize;
        r.ensure(count.saturating_mul(4))
            .map_err(|_| FontError::MalformedHeader(format!("{count} collection offsets do not fit")))?;

        let mut offsets = Vec::with_capacity(count);
        for i in 0..count {
            let offset = r.read_u32()?;
            if offset as usize >= r.len() {
                return Err(FontError::MalformedHeader(format!(
                    "collection member {i} at {offset} lies outside the file"
                )));
            }
            offsets.push(offset);
        }

        tracing::debug!("Read collection header: {} fonts", offsets.len());
        Ok(Some(Self { offsets }))
    }

    /// Directory offsets of the members, in header order
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Select the member whose full name equals `name`.
    ///
    /// The first match wins. No name is an error, as is a name no member
    /// carries.
    pub fn resolve(&self, r: &mut FontReader<'_>, name: Option<&str>) -> Result<TableDirectory> {
        let name = name.ok_or(FontError::AmbiguousCollectionSelection)?;
        let mut names = FontNameScratch::default();

        for &offset in &self.offsets {
            names.reset();
            let directory = self.read_member(r, offset, &mut names)?;
            if names.full_name == name {
                tracing::debug!("Selected collection member {:?} at {}", name, offset);
                return Ok(directory);
            }
        }

        Err(FontError::FontNotFoundInCollection(name.to_string()))
    }

    /// Full names of every member
    pub fn font_names(&self, r: &mut FontReader<'_>) -> Result<Vec<String>> {
        Ok(self
            .font_infos(r)?
            .into_iter()
            .map(|info| info.full_name)
            .collect())
    }

    /// Names of every member
    pub fn font_infos(&self, r: &mut FontReader<'_>) -> Result<Vec<FontInfo>> {
        let mut names = FontNameScratch::default();
        let mut infos = Vec::with_capacity(self.offsets.len());
        for &offset in &self.offsets {
            names.reset();
            self.read_member(r, offset, &mut names)?;
            infos.push(FontInfo::from(&names));
        }
        Ok(infos)
    }

    fn read_member(
        &self,
        r: &mut FontReader<'_>,
        offset: u32,
        names: &mut FontNameScratch,
    ) -> Result<TableDirectory> {
        r.seek(offset as usize)?;
        let directory = TableDirectory::read(r)?;
        read_name(r, &directory, names)?;
        Ok(directory)
    }
}

/// Names of every font in `data`: one entry for a single font, one per
/// member for a collection
pub fn font_infos(data: &[u8]) -> Result<Vec<FontInfo>> {
    let mut r = FontReader::new(data);
    if let Some(collection) = Collection::read(&mut r)? {
        return collection.font_infos(&mut r);
    }

    r.seek(0)?;
    let directory = TableDirectory::read(&mut r)?;
    let mut names = FontNameScratch::default();
    read_name(&mut r, &directory, &mut names)?;
    Ok(vec![FontInfo::from(&names)])
}

/// Full names of every font in `data`
pub fn font_names(data: &[u8]) -> Result<Vec<String>> {
    Ok(font_infos(data)?.into_iter().map(|info| info.full_name).collect())
}
