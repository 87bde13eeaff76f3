//! Glue for the `toyhash` binary: turn the first argument into bytes and print one line.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};

use log::debug;

use crate::toy_hash;

/// Printed when no input is given.
pub const USAGE: &str = "usage: toyhash \"some input\"";

/// Raw bytes of a command-line argument.
///
/// On unix these are exactly the bytes the OS handed over. Elsewhere the argument is
/// converted to UTF-8, replacing anything unrepresentable.
#[cfg(unix)]
pub fn arg_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(arg.as_bytes())
}

#[cfg(not(unix))]
pub fn arg_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    match arg.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// The output line for `input`, without the trailing newline.
pub fn hash_line(input: &[u8]) -> String {
    format!("ToyHash=0x{:08x}", toy_hash(input))
}

/// Runs the CLI over `args` (program name already stripped).
///
/// Only the first argument is hashed; anything after it is ignored.
pub fn run<I, W>(args: I, out: &mut W) -> io::Result<()>
where
    I: IntoIterator<Item = OsString>,
    W: Write,
{
    let mut args = args.into_iter();
    match args.next() {
        None => writeln!(out, "{}", USAGE),
        Some(arg) => {
            let ignored = args.count();
            if ignored > 0 {
                debug!("ignoring {} extra argument(s)", ignored);
            }
            writeln!(out, "{}", hash_line(&arg_bytes(&arg)))
        }
    }
}
