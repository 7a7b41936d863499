use crate::error::{Result, SorterError};
use crate::models::{ByteRange, PdfBytes};
use crate::paths;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Reads a whole PDF, or the inclusive `range` of it. An open-ended or
/// overlong range is clamped to the end of the file.
pub fn read_pdf(path: &Path, range: Option<ByteRange>) -> Result<PdfBytes> {
    let path = paths::existing_file(path)?;
    let ctx = |e| SorterError::io(format!("read {}", path.display()), e);
    let mut file = File::open(&path).map_err(ctx)?;
    let total_len = file.metadata().map_err(ctx)?.len();

    let Some(range) = range else {
        let mut data = Vec::with_capacity(total_len as usize);
        file.read_to_end(&mut data).map_err(ctx)?;
        return Ok(PdfBytes {
            data,
            total_len,
            range: None,
        });
    };

    let last = total_len.checked_sub(1);
    let end = match (range.end, last) {
        (_, None) => None,
        (Some(end), Some(last)) => Some(end.min(last)),
        (None, Some(last)) => Some(last),
    };
    let end = match end {
        Some(end) if range.start <= end => end,
        _ => {
            return Err(SorterError::InvalidRange {
                start: range.start,
                end: range.end,
                len: total_len,
            })
        }
    };

    file.seek(SeekFrom::Start(range.start)).map_err(ctx)?;
    let mut data = vec![0u8; (end - range.start + 1) as usize];
    file.read_exact(&mut data).map_err(ctx)?;
    Ok(PdfBytes {
        data,
        total_len,
        range: Some((range.start, end)),
    })
}
