//! Pager: page-level I/O for the single backing file.
//!
//! Pages are cached in memory by index, at most one frame per index and at
//! most `TABLE_MAX_PAGES` frames in total. There is no eviction; every page
//! stays cached until the pager is dropped.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{DbError, Result};
use crate::{PAGE_SIZE, ROW_SIZE, TABLE_MAX_PAGES};

/// Raw bytes of one page.
pub type Page = [u8; PAGE_SIZE];

/// A cached page and whether it differs from what is on disk.
struct Frame {
    data: Box<Page>,
    dirty: bool,
}

pub struct Pager {
    file: File,
    file_length: u64,
    pages: Vec<Option<Frame>>,
}

impl Pager {
    /// Open or create a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let file_length = file.metadata()?.len();
        check_file_length(file_length)?;

        Ok(Self {
            file,
            file_length,
            pages: (0..TABLE_MAX_PAGES).map(|_| None).collect(),
        })
    }

    /// Length of the backing file, including everything flushed so far.
    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Returns the cached page at `index`, loading it on first access.
    ///
    /// Pages past the end of the file come back zeroed; they only reach the
    /// disk once flushed.
    pub fn get_page(&mut self, index: usize) -> Result<&mut Page> {
        if index >= TABLE_MAX_PAGES {
            return Err(DbError::PageOutOfBounds {
                index,
                max: TABLE_MAX_PAGES,
            });
        }

        let frame = match &mut self.pages[index] {
            Some(frame) => frame,
            slot @ None => {
                let data = read_page(&mut self.file, self.file_length, index)?;
                slot.insert(Frame { data, dirty: false })
            }
        };
        Ok(&mut frame.data)
    }

    /// Records that the cached page at `index` has been written to.
    pub fn mark_dirty(&mut self, index: usize) {
        if let Some(Some(frame)) = self.pages.get_mut(index) {
            frame.dirty = true;
        }
    }

    pub fn is_dirty(&self, index: usize) -> bool {
        matches!(self.pages.get(index), Some(Some(frame)) if frame.dirty)
    }

    #[cfg(test)]
    fn is_cached(&self, index: usize) -> bool {
        matches!(self.pages.get(index), Some(Some(_)))
    }

    /// Writes the first `bytes_used` bytes of page `index` at its file offset.
    pub fn flush(&mut self, index: usize, bytes_used: usize) -> Result<()> {
        debug_assert!(
            bytes_used <= PAGE_SIZE,
            "flush of {bytes_used} bytes overruns a page"
        );
        let frame = self
            .pages
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(DbError::FlushUncached { index })?;

        let offset = (index * PAGE_SIZE) as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&frame.data[..bytes_used])?;
        frame.dirty = false;

        self.file_length = self.file_length.max(offset + bytes_used as u64);
        Ok(())
    }

    /// Forces flushed pages down to the device.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

fn read_page(file: &mut File, file_length: u64, index: usize) -> Result<Box<Page>> {
    let mut data = Box::new([0u8; PAGE_SIZE]);
    let offset = (index * PAGE_SIZE) as u64;
    if offset < file_length {
        // The last page may be short.
        let available = (file_length - offset).min(PAGE_SIZE as u64) as usize;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut data[..available])?;
    }
    Ok(data)
}

/// Rejects files this layout could never have produced.
fn check_file_length(file_length: u64) -> Result<()> {
    let page_size = PAGE_SIZE as u64;
    let tail = file_length % page_size;
    if tail % ROW_SIZE as u64 != 0 {
        return Err(DbError::Corrupt {
            reason: format!("last page holds {tail} bytes, not a whole number of rows"),
        });
    }

    let pages = file_length.div_ceil(page_size);
    if pages > TABLE_MAX_PAGES as u64 {
        return Err(DbError::Corrupt {
            reason: format!("file spans {pages} pages, limit is {TABLE_MAX_PAGES}"),
        });
    }
    Ok(())
}
