use std::path::Path;

use crate::error::{DbError, Result};
use crate::pager::Pager;
use crate::row::Row;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_ROWS};

/// The one table of the database, backed by a single file.
pub struct Table {
    pager: Pager,
    num_rows: usize,
}

/// A position in the table, addressed by row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    row_num: usize,
    end_of_table: bool,
}

impl Cursor {
    pub fn end_of_table(&self) -> bool {
        self.end_of_table
    }

    /// Page index and byte offset inside that page of the current row.
    pub fn location(&self) -> (usize, usize) {
        let page_num = self.row_num / ROWS_PER_PAGE;
        let byte_offset = (self.row_num % ROWS_PER_PAGE) * ROW_SIZE;
        (page_num, byte_offset)
    }

    pub fn advance(&mut self, table: &Table) {
        self.row_num += 1;
        if self.row_num >= table.num_rows {
            self.end_of_table = true;
        }
    }
}

impl Table {
    /// Opens the table stored at `path`, creating the file if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pager = Pager::open(path)?;
        let file_length = pager.file_length() as usize;
        let num_rows =
            (file_length / PAGE_SIZE) * ROWS_PER_PAGE + (file_length % PAGE_SIZE) / ROW_SIZE;

        Ok(Self {
            pager,
            num_rows,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn table_start(&self) -> Cursor {
        Cursor {
            row_num: 0,
            end_of_table: self.num_rows == 0,
        }
    }

    pub fn table_end(&self) -> Cursor {
        Cursor {
            row_num: self.num_rows,
            end_of_table: true,
        }
    }

    /// Appends a row after the last one.
    pub fn insert(&mut self, row: &Row) -> Result<()> {
        if self.num_rows >= TABLE_MAX_ROWS {
            return Err(DbError::TableFull);
        }

        let (page_num, offset) = self.table_end().location();
        let page = self.pager.get_page(page_num)?;
        row.serialize(&mut page[offset..offset + ROW_SIZE]);
        self.pager.mark_dirty(page_num);
        self.num_rows += 1;
        Ok(())
    }

    /// Reads the row under `cursor`.
    pub fn row_at(&mut self, cursor: &Cursor) -> Result<Row> {
        let (page_num, offset) = cursor.location();
        let page = self.pager.get_page(page_num)?;
        Ok(Row::deserialize(&page[offset..offset + ROW_SIZE]))
    }

    /// Scans every row in insertion order. Each call starts from row 0.
    pub fn select_all(&mut self) -> Rows<'_> {
        let cursor = self.table_start();
        Rows {
            table: self,
            cursor,
        }
    }

    /// Writes back every dirty page and releases the file.
    ///
    /// Rows inserted since the last close only reach the disk here.
    pub fn close(mut self) -> Result<()> {
        let full_pages = self.num_rows / ROWS_PER_PAGE;
        for page_num in 0..full_pages {
            if self.pager.is_dirty(page_num) {
                self.pager.flush(page_num, PAGE_SIZE)?;
            }
        }

        let additional_rows = self.num_rows % ROWS_PER_PAGE;
        if additional_rows > 0 && self.pager.is_dirty(full_pages) {
            self.pager.flush(full_pages, additional_rows * ROW_SIZE)?;
        }

        self.pager.sync()
    }
}

/// Lazy full scan returned by [`Table::select_all`].
pub struct Rows<'a> {
    table: &'a mut Table,
    cursor: Cursor,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.end_of_table() {
            return None;
        }
        let row = self.table.row_at(&self.cursor);
        if row.is_err() {
            self.cursor.end_of_table = true;
        } else {
            self.cursor.advance(self.table);
        }
        Some(row)
    }
}
