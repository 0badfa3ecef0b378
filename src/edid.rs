//! EDID base block assembly and validation.

use thiserror::Error;

use crate::checksum::{block_checksum, byte_sum};
use crate::timing::{
    BlankingProfile, ClockRounding, DetailedTiming, clock_units_10khz,
};

/// Size of one EDID base block.
pub const EDID_LEN: usize = 128;

/// Fixed 8-byte signature every base block starts with.
pub const HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Refresh rates the generator knows how to emit.
pub const SUPPORTED_REFRESH_RATES: [u16; 4] = [60, 120, 144, 240];

/// Byte offset of the computed detailed timing descriptor within a block.
pub const DETAILED_TIMING_OFFSET: usize = 54;

/// Widest value the 12-bit active pixel fields can hold.
pub const MAX_ACTIVE: u16 = 0x0FFF;

/// Widest pixel clock the 16-bit field can hold, in 10 kHz units.
const MAX_CLOCK_10KHZ: u32 = 0xFFFF;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EdidError {
    #[error("unsupported refresh rate {0} Hz (supported: {SUPPORTED_REFRESH_RATES:?})")]
    UnsupportedRefreshRate(u16),
    #[error("{field} value {value} exceeds the field maximum {max}")]
    FieldOverflow {
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("block is {actual} bytes, expected 128")]
    LengthMismatch { actual: usize },
    #[error("block does not start with the EDID header signature")]
    HeaderMismatch,
    #[error("byte sum is {computed} modulo 256, expected 0")]
    ChecksumMismatch { computed: u8 },
}

/// One requested video mode: active pixel counts plus the refresh rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayMode {
    pub horizontal_active: u16,
    pub vertical_active: u16,
    pub refresh_rate_hz: u16,
}

/// Identity and fixed byte tables for one physical panel model. Everything
/// here is literal vendor data; only the detailed timing descriptor is
/// computed per mode.
#[derive(Clone, Copy, Debug)]
pub struct PanelProfile {
    /// Human-readable model name, for reporting only.
    pub model_name: &'static str,
    /// Lowercase stem used to build output file names.
    pub file_stem: &'static str,
    pub manufacturer_id: [u8; 2],
    pub product_id: [u8; 2],
    pub serial_number: [u8; 4],
    /// Week and year of manufacture.
    pub week_year: [u8; 2],
    pub edid_version: [u8; 2],
    pub display_params: [u8; 5],
    pub color_characteristics: [u8; 10],
    pub established_timings: [u8; 3],
    pub standard_timings: [u8; 16],
    /// Physical image size bytes of the detailed timing descriptor.
    pub image_size: [u8; 3],
    /// 18-byte display product name descriptor (tag 0xFC).
    pub display_name: [u8; 18],
    /// 18-byte range limits descriptor (tag 0xFD).
    pub range_limits: [u8; 18],
    pub blanking: BlankingProfile,
}

/// MSI MPG 491CQPX QD-OLED, the 5120x1440 ultrawide this tool was written
/// for. Identity bytes match the vendor EDID.
pub const MPG491CQPX: PanelProfile = PanelProfile {
    model_name: "MSI MPG 491CQPX QD-OLED",
    file_stem: "msi_mpg491cqpx",
    manufacturer_id: [0x36, 0xC9],
    product_id: [0x91, 0x04],
    serial_number: [0x01, 0x00, 0x00, 0x00],
    week_year: [0x01, 0x20],
    edid_version: [0x01, 0x04],
    display_params: [0x80, 0x73, 0x2E, 0x78, 0x2A],
    color_characteristics: [0xEE, 0x91, 0xA3, 0x54, 0x4C, 0x99, 0x26, 0x0F, 0x50, 0x54],
    established_timings: [0x00, 0x00, 0x00],
    // all eight standard timing slots unused
    standard_timings: [
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, //
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    ],
    image_size: [0x97, 0x21, 0x00],
    // "MPG491CQPX"
    display_name: [
        0x00, 0x00, 0x00, 0xFC, 0x00, //
        0x4D, 0x50, 0x47, 0x34, 0x39, //
        0x31, 0x43, 0x51, 0x50, 0x58, //
        0x0A, 0x20, 0x20,
    ],
    // vertical 48-240 Hz, horizontal 30-135 kHz, max pixel clock 600 MHz
    range_limits: [
        0x00, 0x00, 0x00, 0xFD, 0x00, //
        0x30, 0xF0, 0x1E, 0x87, 0x3C, //
        0x00, 0x0A, 0x20, 0x20, 0x20, //
        0x20, 0x20, 0x20,
    ],
    blanking: BlankingProfile {
        h_blanking: 160,
        v_blanking: 45,
        h_sync_offset: 48,
        h_sync_pulse: 32,
        v_sync_offset: 3,
        v_sync_pulse: 5,
    },
};

/// Encode `mode` against the built-in panel profile with round-to-nearest
/// clock conversion.
pub fn encode(mode: DisplayMode) -> Result<[u8; EDID_LEN], EdidError> {
    encode_with(&MPG491CQPX, mode, ClockRounding::RoundNearest)
}

/// Encode one mode into a complete 128-byte base block.
///
/// The returned block always passes [`validate`]: the header, length and
/// checksum invariants hold by construction. On error no partial block is
/// produced.
pub fn encode_with(
    profile: &PanelProfile,
    mode: DisplayMode,
    rounding: ClockRounding,
) -> Result<[u8; EDID_LEN], EdidError> {
    if !SUPPORTED_REFRESH_RATES.contains(&mode.refresh_rate_hz) {
        return Err(EdidError::UnsupportedRefreshRate(mode.refresh_rate_hz));
    }
    if mode.horizontal_active > MAX_ACTIVE {
        return Err(EdidError::FieldOverflow {
            field: "horizontal active",
            value: mode.horizontal_active as u32,
            max: MAX_ACTIVE as u32,
        });
    }
    if mode.vertical_active > MAX_ACTIVE {
        return Err(EdidError::FieldOverflow {
            field: "vertical active",
            value: mode.vertical_active as u32,
            max: MAX_ACTIVE as u32,
        });
    }

    let blanking = &profile.blanking;
    let total_h = mode.horizontal_active as u64 + blanking.h_blanking as u64;
    let total_v = mode.vertical_active as u64 + blanking.v_blanking as u64;
    let pixel_clock_hz = total_h * total_v * mode.refresh_rate_hz as u64;
    let clock_units = clock_units_10khz(pixel_clock_hz, rounding);
    if clock_units > MAX_CLOCK_10KHZ {
        return Err(EdidError::FieldOverflow {
            field: "pixel clock",
            value: clock_units,
            max: MAX_CLOCK_10KHZ,
        });
    }

    log::debug!(
        "{}x{} @ {} Hz: total {}x{}, pixel clock {} Hz ({} x 10 kHz)",
        mode.horizontal_active,
        mode.vertical_active,
        mode.refresh_rate_hz,
        total_h,
        total_v,
        pixel_clock_hz,
        clock_units
    );

    let timing = DetailedTiming {
        pixel_clock_10khz: clock_units as u16,
        h_active: mode.horizontal_active,
        h_blanking: blanking.h_blanking,
        v_active: mode.vertical_active,
        v_blanking: blanking.v_blanking,
        h_sync_offset: blanking.h_sync_offset,
        h_sync_pulse: blanking.h_sync_pulse,
        v_sync_offset: blanking.v_sync_offset,
        v_sync_pulse: blanking.v_sync_pulse,
        image_size: profile.image_size,
    };

    let mut block = [0u8; EDID_LEN];
    let mut at = 0;
    at = put(&mut block, at, &HEADER);
    at = put(&mut block, at, &profile.manufacturer_id);
    at = put(&mut block, at, &profile.product_id);
    at = put(&mut block, at, &profile.serial_number);
    at = put(&mut block, at, &profile.week_year);
    at = put(&mut block, at, &profile.edid_version);
    at = put(&mut block, at, &profile.display_params);
    at = put(&mut block, at, &profile.color_characteristics);
    at = put(&mut block, at, &profile.established_timings);
    at = put(&mut block, at, &profile.standard_timings);
    debug_assert_eq!(at, DETAILED_TIMING_OFFSET);
    at = put(&mut block, at, &timing.to_bytes());
    at = put(&mut block, at, &profile.display_name);
    at = put(&mut block, at, &profile.range_limits);
    // one unused descriptor slot, then the extension count (no extensions)
    at = put(&mut block, at, &[0u8; 18]);
    at = put(&mut block, at, &[0x00]);
    debug_assert_eq!(at, EDID_LEN - 1);
    block[at] = block_checksum(&block[..at]);

    Ok(block)
}

/// Check the structural invariants of a base block: exact length, header
/// signature, zero byte sum. Fails on the first violation found.
pub fn validate(block: &[u8]) -> Result<(), EdidError> {
    if block.len() != EDID_LEN {
        return Err(EdidError::LengthMismatch {
            actual: block.len(),
        });
    }

    if block[..HEADER.len()] != HEADER {
        return Err(EdidError::HeaderMismatch);
    }

    let computed = byte_sum(block);
    if computed != 0 {
        return Err(EdidError::ChecksumMismatch { computed });
    }

    Ok(())
}

fn put(block: &mut [u8], at: usize, bytes: &[u8]) -> usize {
    block[at..at + bytes.len()].copy_from_slice(bytes);
    at + bytes.len()
}
