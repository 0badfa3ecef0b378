//! File output for generated blocks: raw binaries, hex dumps and the
//! stable default-name alias.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::edid::{EDID_LEN, PanelProfile};

/// Bytes rendered per hex dump line.
const HEX_LINE_BYTES: usize = 16;

/// Paths written for one refresh rate.
#[derive(Clone, Debug)]
pub struct ModeFiles {
    pub bin: PathBuf,
    pub hex: PathBuf,
}

/// File name stem for one generated mode, e.g. `msi_mpg491cqpx_60hz`.
pub fn mode_file_stem(profile: &PanelProfile, refresh_rate_hz: u16) -> String {
    format!("{}_{}hz", profile.file_stem, refresh_rate_hz)
}

/// Render a block as lowercase hex, 16 bytes per line.
pub fn hex_dump(block: &[u8]) -> String {
    let mut dump = String::with_capacity(block.len() * 2 + block.len().div_ceil(HEX_LINE_BYTES));
    for line in block.chunks(HEX_LINE_BYTES) {
        for byte in line {
            dump.push_str(&format!("{byte:02x}"));
        }
        dump.push('\n');
    }
    dump
}

/// Write the raw block and its hex dump next to each other in `out_dir`.
pub fn write_mode_files(
    out_dir: &Path,
    stem: &str,
    block: &[u8; EDID_LEN],
) -> io::Result<ModeFiles> {
    let bin = out_dir.join(format!("{stem}.bin"));
    fs::write(&bin, block)?;

    let hex = out_dir.join(format!("{stem}.hex"));
    fs::write(&hex, hex_dump(block))?;

    Ok(ModeFiles { bin, hex })
}

/// Point a stable alias name at one generated binary so existing consumers
/// keep working across regenerations. Uses a relative symlink where the
/// platform supports them and falls back to a plain copy otherwise.
pub fn write_default_alias(out_dir: &Path, alias: &str, target_name: &str) -> io::Result<PathBuf> {
    let link = out_dir.join(alias);

    // remove_file also clears a dangling symlink, which `exists` hides
    match fs::remove_file(&link) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    #[cfg(unix)]
    if std::os::unix::fs::symlink(target_name, &link).is_ok() {
        return Ok(link);
    }

    fs::copy(out_dir.join(target_name), &link)?;
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edid::{DisplayMode, encode};

    #[test]
    fn hex_dump_formats_sixteen_bytes_per_line() {
        let block = encode(DisplayMode {
            horizontal_active: 5120,
            vertical_active: 1440,
            refresh_rate_hz: 60,
        })
        .unwrap();

        let dump = hex_dump(&block);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|line| line.len() == 32));
        assert!(dump.ends_with('\n'));
        assert_eq!(&lines[0][..16], "00ffffffffffff00");
    }

    #[test]
    fn hex_dump_is_lowercase() {
        assert_eq!(hex_dump(&[0x00, 0xAB, 0xFF]), "00abff\n");
    }

    #[test]
    fn mode_files_land_with_exact_sizes() {
        let dir = std::env::temp_dir().join("edidgen_output_test");
        fs::create_dir_all(&dir).unwrap();

        let block = encode(DisplayMode {
            horizontal_active: 5120,
            vertical_active: 1440,
            refresh_rate_hz: 60,
        })
        .unwrap();

        let files = write_mode_files(&dir, "output_test_60hz", &block).unwrap();
        assert_eq!(fs::read(&files.bin).unwrap().len(), EDID_LEN);
        // 8 lines of 32 hex chars plus newlines
        assert_eq!(fs::read(&files.hex).unwrap().len(), 8 * 33);

        let alias = write_default_alias(&dir, "output_test_default.bin", "output_test_60hz.bin")
            .unwrap();
        assert_eq!(fs::read(&alias).unwrap(), block.to_vec());

        // replacing an existing alias must succeed
        write_default_alias(&dir, "output_test_default.bin", "output_test_60hz.bin").unwrap();

        for path in [&files.bin, &files.hex, &alias] {
            fs::remove_file(path).unwrap();
        }
    }
}
