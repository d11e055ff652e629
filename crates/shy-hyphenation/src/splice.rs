//! Splicing break markers into a text run.
//!
//! Positions are character offsets. A position `n` places a marker directly
//! before the `n`-th character; `0` and the run length are both legal.
//! Positions must be strictly increasing and in range, otherwise nothing is
//! emitted and a [`SpliceError`] is returned.

use thiserror::Error;

/// Marker written at every break position: the HTML soft-hyphen entity.
pub const SOFT_HYPHEN: &str = "&shy;";

/// One piece of spliced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Original text between two break positions. Never empty.
    Text(&'a str),
    Marker,
}

/// Break positions that cannot belong to the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("break position {offset} is past the end of a {len}-character run")]
    OutOfRange { offset: usize, len: usize },

    #[error("break position {offset} does not follow {previous}")]
    NotIncreasing { previous: usize, offset: usize },
}

/// Check `breaks` against `text` without emitting anything.
///
/// # Errors
///
/// The first offending position.
pub fn check_break_positions(text: &str, breaks: &[usize]) -> Result<(), SpliceError> {
    let len = text.chars().count();
    let mut previous: Option<usize> = None;
    for &offset in breaks {
        if offset > len {
            return Err(SpliceError::OutOfRange { offset, len });
        }
        if let Some(previous) = previous
            && offset <= previous
        {
            return Err(SpliceError::NotIncreasing { previous, offset });
        }
        previous = Some(offset);
    }
    Ok(())
}

/// Feed `emit` the text slices and markers of `text` split at `breaks`, in
/// order.
///
/// # Errors
///
/// Malformed `breaks` are rejected before the first call to `emit`; errors
/// from `emit` stop the splice and are returned unchanged.
pub fn splice_segments<'a, E, F>(text: &'a str, breaks: &[usize], mut emit: F) -> Result<(), E>
where
    E: From<SpliceError>,
    F: FnMut(Segment<'a>) -> Result<(), E>,
{
    check_break_positions(text, breaks)?;

    // Byte index of every char, then of the end of the run.
    let mut boundaries = text
        .char_indices()
        .map(|(at, _)| at)
        .chain(std::iter::once(text.len()));
    let mut consumed = 0usize;
    let mut last = 0usize;
    for &offset in breaks {
        let Some(at) = boundaries.nth(offset - consumed) else {
            return Err(SpliceError::OutOfRange {
                offset,
                len: text.chars().count(),
            }
            .into());
        };
        consumed = offset + 1;
        if at > last {
            emit(Segment::Text(&text[last..at]))?;
        }
        emit(Segment::Marker)?;
        last = at;
    }
    if last < text.len() {
        emit(Segment::Text(&text[last..]))?;
    }
    Ok(())
}

/// `text` with [`SOFT_HYPHEN`] inserted at every break position.
///
/// # Errors
///
/// See [`check_break_positions`].
pub fn splice(text: &str, breaks: &[usize]) -> Result<String, SpliceError> {
    let mut out = String::with_capacity(text.len() + breaks.len() * SOFT_HYPHEN.len());
    splice_segments(text, breaks, |segment| {
        out.push_str(match segment {
            Segment::Text(slice) => slice,
            Segment::Marker => SOFT_HYPHEN,
        });
        Ok::<(), SpliceError>(())
    })?;
    Ok(out)
}
