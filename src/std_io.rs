extern crate std;

use std::io::{self, IoSlice, Write};

use crate::SpillVec;

/// Write is implemented for `SpillVec<u8, N>` by appending to the vector.
///
/// Each call is one bulk insertion at the end, so it migrates at most once.
impl<const N: usize> Write for SpillVec<u8, N> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.try_insert_from_slice(self.len(), buf)
            .map_err(|err| io::Error::new(io::ErrorKind::OutOfMemory, err))?;
        Ok(buf.len())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let num = bufs.iter().map(|b| b.len()).sum::<usize>();
        let bytes = bufs.iter().flat_map(|b| b.iter().copied());
        self.try_insert_many(self.len(), bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::OutOfMemory, err))?;
        Ok(num)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write(self, buf)?;
        Ok(())
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
