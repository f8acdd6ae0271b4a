//! Reading whole files into an arena.
//!
//! Frame-oriented programs slurp assets and config files into scratch
//! memory, work on them, and roll the scope back. These helpers read a
//! file in one go and hand back an arena handle instead of a heap
//! buffer.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use loam_arena::{Arena, ArenaSlice, ArenaStr};

/// Reads a file's bytes into the arena.
///
/// The allocation is sized from the file's metadata; a file that shrinks
/// mid-read surfaces as an I/O error.
pub fn read_entire_file(arena: &mut Arena, path: impl AsRef<Path>) -> io::Result<ArenaSlice> {
    let mut file = File::open(path)?;
    let len = usize::try_from(file.metadata()?.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "file too large for this arena"))?;
    let span = arena.alloc_uninit(len);
    file.read_exact(arena.bytes_mut(span))?;
    Ok(span)
}

/// Reads a UTF-8 file into the arena as a string.
pub fn read_entire_text_file(arena: &Arena, path: impl AsRef<Path>) -> io::Result<ArenaStr> {
    let text = std::fs::read_to_string(path)?;
    Ok(arena.push_str(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_bytes_land_in_the_arena() {
        let mut path = std::env::temp_dir();
        path.push(format!("loam-fs-test-{}", std::process::id()));
        let payload = b"arena-bound payload\n";
        File::create(&path).unwrap().write_all(payload).unwrap();

        let mut arena = Arena::new(4096);
        let span = read_entire_file(&mut arena, &path).unwrap();
        assert_eq!(&*arena.bytes(span), payload);

        let text = read_entire_text_file(&arena, &path).unwrap();
        assert_eq!(&*arena.str_at(text), "arena-bound payload\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_error_not_a_fault() {
        let mut arena = Arena::new(4096);
        let before = arena.used_bytes();
        assert!(read_entire_file(&mut arena, "/nonexistent/loam-test").is_err());
        assert_eq!(arena.used_bytes(), before);
    }
}
