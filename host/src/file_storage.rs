use {
    bioloid_driver::Storage,
    std::{
        fs::{File, OpenOptions},
        io::{self, Read, Seek, SeekFrom, Write},
        path::{Path, PathBuf},
    },
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("storage file ends before {len} bytes at offset {offset}")]
    ShortRead { offset: u8, len: usize },
}

/// Keeps the persistent range in a file, one byte per register.
///
/// Loading fails until something has been saved, since the file doesn't exist yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    type Error = Error;

    #[inline]
    fn load(&mut self, offset: u8, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let len = bytes.len();
        let mut file = File::open(&self.path)?;
        let _ = file.seek(SeekFrom::Start(offset.into()))?;
        file.read_exact(bytes).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::ShortRead { offset, len },
            _ => Error::Io(e),
        })
    }

    #[inline]
    fn save(&mut self, offset: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        let _ = file.seek(SeekFrom::Start(offset.into()))?;
        file.write_all(bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::test_util::SilentPort,
        bioloid_driver::{ControlTable, Loaded},
        bioloid_packet::control_table::{BaudRate, Id},
    };

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("table.bin"));
        let mut bytes = [0; 4];
        assert!(matches!(storage.load(0, &mut bytes), Err(Error::Io(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("table.bin"));
        storage.save(0, &[1, 2, 3, 4]).unwrap();
        storage.save(2, &[0x33]).unwrap();
        let mut bytes = [0; 3];
        storage.load(1, &mut bytes).unwrap();
        assert_eq!(bytes, [2, 0x33, 4]);
        assert_eq!(std::fs::read(storage.path()).unwrap(), [1, 2, 0x33, 4]);
    }

    #[test]
    fn short_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("table.bin"));
        storage.save(0, &[1, 2]).unwrap();
        let mut bytes = [0; 4];
        let error = storage.load(0, &mut bytes).unwrap_err();
        assert!(matches!(error, Error::ShortRead { offset: 0, len: 4 }));
        assert_eq!(
            error.to_string(),
            "storage file ends before 4 bytes at offset 0",
        );
    }

    #[test]
    fn control_table_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bin");

        let mut bytes = [0; 0x20];
        let mut table = ControlTable::new(&mut bytes, 0x10, FileStorage::new(&path), SilentPort);
        assert_eq!(table.load(), Loaded::InitialValues);
        table.write::<Id>(0x05);
        table.write::<BaudRate>(34);
        table.save().unwrap();

        let mut bytes = [0; 0x20];
        let mut table = ControlTable::new(&mut bytes, 0x10, FileStorage::new(&path), SilentPort);
        assert_eq!(table.load(), Loaded::FromStorage);
        assert_eq!(table.read::<Id>(), 0x05);
        assert_eq!(table.read::<BaudRate>(), 34);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0x10);
    }
}
