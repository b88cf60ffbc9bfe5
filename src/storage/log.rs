//! Append-only file backend.
//!
//! Writes are appended to a record log and mirrored into an in-memory
//! ordered map; opening an existing log replays it to rebuild the map. The
//! index never deletes keys, so the log carries a single record kind and
//! needs no compaction beyond upsert-on-replay.

use crate::error::{RawGeoError, Result};
use crate::storage::{MemoryBackend, OrderedStore, StorageStats};
use bytes::{BufMut, Bytes, BytesMut};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const RECORD_SET: u8 = 0;
const SCRATCH_INITIAL_CAPACITY: usize = 4 * 1024;

/// Durable ordered backend: an in-memory map fronted by an append-only log.
pub struct LogBackend {
    memory: MemoryBackend,
    log: LogFile,
}

impl LogBackend {
    /// Open the log at `path`, creating it if absent, and replay it into
    /// memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut log = LogFile::open(path)?;
        let mut memory = MemoryBackend::new();
        for (key, value) in log.replay()? {
            memory.set(&key, &value)?;
        }
        Ok(Self { memory, log })
    }

    /// Path of the backing log file.
    pub fn path(&self) -> &Path {
        self.log.path()
    }
}

impl OrderedStore for LogBackend {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        // Log first for durability, then mirror into memory.
        self.log.write_set(key, value)?;
        self.memory.set(key, value)
    }

    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        self.memory.get(key)
    }

    fn seek(&self, from: &[u8]) -> Result<Box<dyn Iterator<Item = (Bytes, Bytes)> + '_>> {
        self.memory.seek(from)
    }

    fn len(&self) -> Result<usize> {
        self.memory.len()
    }

    fn sync(&mut self) -> Result<()> {
        self.log.sync()
    }

    fn close(&mut self) -> Result<()> {
        self.log.sync()?;
        self.memory.close()
    }

    fn destroy(&mut self) -> Result<()> {
        self.memory.destroy()?;
        let path = self.log.path().to_path_buf();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn stats(&self) -> Result<StorageStats> {
        self.memory.stats()
    }
}

/// The record log itself: `[tag][u32 key_len][key][u32 value_len][value]`,
/// big-endian lengths.
struct LogFile {
    file: File,
    writer: BufWriter<File>,
    path: PathBuf,
    size: u64,
    scratch: BytesMut,
}

impl LogFile {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&path)?;

        let size = file.metadata()?.len();
        let writer_file = file.try_clone()?;
        let writer = BufWriter::new(writer_file);

        Ok(LogFile {
            file,
            writer,
            path,
            size,
            scratch: BytesMut::with_capacity(SCRATCH_INITIAL_CAPACITY),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write_set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.scratch.clear();
        let needed = 1 + 4 + key.len() + 4 + value.len();
        if self.scratch.capacity() < needed {
            self.scratch.reserve(needed - self.scratch.capacity());
        }

        self.scratch.put_u8(RECORD_SET);
        self.scratch.put_u32(key.len() as u32);
        self.scratch.put(key);
        self.scratch.put_u32(value.len() as u32);
        self.scratch.put(value);

        self.writer.write_all(&self.scratch)?;
        self.size += self.scratch.len() as u64;
        Ok(())
    }

    /// Read every record back from the start of the file.
    ///
    /// A clean end-of-file between records terminates the replay; an
    /// end-of-file inside a record means the log was truncated mid-write and
    /// is reported as corruption.
    fn replay(&mut self) -> Result<Vec<(Bytes, Bytes)>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::new(&mut self.file);
        let mut records = Vec::new();

        loop {
            let mut tag = [0u8; 1];
            match reader.read_exact(&mut tag) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err.into()),
            }
            if tag[0] != RECORD_SET {
                return Err(RawGeoError::CorruptEntry(format!(
                    "unknown record tag {}",
                    tag[0]
                )));
            }

            let key = Self::read_chunk(&mut reader)?;
            let value = Self::read_chunk(&mut reader)?;
            records.push((key, value));
        }

        Ok(records)
    }

    fn read_chunk(reader: &mut BufReader<&mut File>) -> Result<Bytes> {
        let mut len_buf = [0u8; 4];
        Self::record_read(reader, &mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;

        let mut buf = vec![0u8; len];
        Self::record_read(reader, &mut buf)?;
        Ok(Bytes::from(buf))
    }

    fn record_read(reader: &mut BufReader<&mut File>, buf: &mut [u8]) -> Result<()> {
        reader.read_exact(buf).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                RawGeoError::CorruptEntry("truncated record".to_string())
            } else {
                RawGeoError::from(err)
            }
        })
    }

    fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        // Best effort flush on drop, ignore errors.
        let _ = self.writer.flush();
    }
}
