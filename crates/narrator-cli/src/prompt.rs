//! Interactive overwrite confirmation.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask whether `path` may be overwritten
///
/// Only `y` or `Y` confirms; anything else, including end of input, declines.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or the answer read
pub fn confirm_overwrite<R, W>(input: &mut R, output: &mut W, path: &Path) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(output, "File '{}' exists. Overwrite? (y/n): ", path.display())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "y" | "Y"))
}
