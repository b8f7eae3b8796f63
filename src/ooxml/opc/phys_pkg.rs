//! Physical package writer (the ZIP layer of an OPC package).
//!
//! Entries carry a fixed timestamp so that the same parts always produce
//! the same archive bytes.

use crate::common::error::Result;
use std::io::{Cursor, Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

/// Writes package members into a ZIP archive.
pub struct PhysPkgWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    compression: CompressionMethod,
    entries: usize,
}

impl PhysPkgWriter<Cursor<Vec<u8>>> {
    /// Create an in-memory writer.
    pub fn new(compress: bool) -> Self {
        Self::with_writer(Cursor::new(Vec::new()), compress)
    }

    /// Finish the archive and return its bytes.
    pub fn finish_to_bytes(self) -> Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl<W: Write + Seek> PhysPkgWriter<W> {
    /// Create a writer over any seekable sink.
    ///
    /// # Arguments
    /// * `writer` - Destination of the archive bytes
    /// * `compress` - Deflate entries instead of storing them
    pub fn with_writer(writer: W, compress: bool) -> Self {
        let compression = if compress {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        Self {
            zip_writer: ZipWriter::new(writer),
            compression,
            entries: 0,
        }
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression)
            .last_modified_time(DateTime::default())
    }

    /// Add a directory entry. `name` must end with `/`.
    pub fn add_directory(&mut self, name: &str) -> Result<()> {
        let options = self.options();
        self.zip_writer.add_directory(name, options)?;
        self.entries += 1;
        Ok(())
    }

    /// Add a file entry.
    ///
    /// # Arguments
    /// * `name` - Member name without a leading slash (e.g. `ppt/slides/slide1.xml`)
    /// * `content` - Member bytes
    pub fn write(&mut self, name: &str, content: &[u8]) -> Result<()> {
        log::trace!(name = name, bytes = content.len(); "Writing package member");
        let options = self.options();
        self.zip_writer.start_file(name, options)?;
        self.zip_writer.write_all(content)?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Write the central directory and return the sink.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip_writer.finish()?)
    }
}
