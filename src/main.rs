use clap::Parser;
use std::fs;
use std::path::PathBuf;

use edidgen::edid::{DisplayMode, EDID_LEN, MPG491CQPX, encode_with, validate};
use edidgen::output::{mode_file_stem, write_default_alias, write_mode_files};
use edidgen::timing::ClockRounding;

/// Refresh rate the default alias prefers when it was generated.
const DEFAULT_ALIAS_RATE: u16 = 60;

#[derive(Parser, Debug)]
#[command(name = "edidgen", about = "Custom EDID generator for ultrawide display modes")]
struct Args {
    /// Output directory for generated files
    #[arg(value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Horizontal active pixels
    #[arg(long, value_name = "PIXELS", env = "EDIDGEN_WIDTH", default_value_t = 5120)]
    width: u16,

    /// Vertical active pixels
    #[arg(long, value_name = "PIXELS", env = "EDIDGEN_HEIGHT", default_value_t = 1440)]
    height: u16,

    /// Refresh rates to generate, in Hz
    #[arg(
        long,
        value_name = "HZ",
        env = "EDIDGEN_RATES",
        value_delimiter = ',',
        default_values_t = [60u16, 120, 144, 240]
    )]
    rates: Vec<u16>,

    /// Truncate the pixel clock toward zero instead of rounding to nearest
    /// (matches files produced by older generators)
    #[arg(long, env = "EDIDGEN_TRUNCATE_CLOCK")]
    truncate_clock: bool,
    // Blanking profile and panel identity are fixed; no user configuration needed.
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let profile = &MPG491CQPX;
    let rounding = if args.truncate_clock {
        ClockRounding::Truncate
    } else {
        ClockRounding::RoundNearest
    };

    fs::create_dir_all(&args.out_dir).expect("Failed to create output directory");

    println!(
        "Creating custom EDID for {} ({}x{})...",
        profile.model_name, args.width, args.height
    );

    let mut written: Vec<(u16, String)> = Vec::new();

    for &rate in &args.rates {
        println!("\nGenerating EDID for {rate}Hz...");

        let mode = DisplayMode {
            horizontal_active: args.width,
            vertical_active: args.height,
            refresh_rate_hz: rate,
        };

        let block = match encode_with(profile, mode, rounding) {
            Ok(block) => block,
            Err(e) => {
                eprintln!("Failed to encode {rate}Hz: {e}");
                continue;
            }
        };

        // The encoder guarantees this; check anyway before anything is
        // written to disk.
        if let Err(e) = validate(&block) {
            eprintln!("Generated block failed validation for {rate}Hz: {e}");
            continue;
        }
        println!("EDID validation passed");

        let stem = mode_file_stem(profile, rate);
        match write_mode_files(&args.out_dir, &stem, &block) {
            Ok(files) => {
                println!("Created {} ({} bytes)", files.bin.display(), EDID_LEN);
                println!("Created {} (human-readable format)", files.hex.display());
                written.push((rate, format!("{stem}.bin")));
            }
            Err(e) => {
                eprintln!("Failed to write files for {rate}Hz: {e}");
            }
        }
    }

    if written.is_empty() {
        eprintln!("\nNo EDID files were generated.");
        std::process::exit(1);
    }

    // Stable default name for consumers that do not care about the rate,
    // pointing at 60Hz when available.
    let (alias_rate, target_name) = written
        .iter()
        .find(|(rate, _)| *rate == DEFAULT_ALIAS_RATE)
        .unwrap_or(&written[0]);
    let alias_name = format!("ultrawide_{}x{}.bin", args.width, args.height);

    match write_default_alias(&args.out_dir, &alias_name, target_name) {
        Ok(link) => println!("\nCreated {} ({alias_rate}Hz default)", link.display()),
        Err(e) => eprintln!("\nFailed to create default alias {alias_name}: {e}"),
    }

    println!("\nEDID information:");
    println!("- Panel: {}", profile.model_name);
    println!("- Resolution: {}x{}", args.width, args.height);
    println!(
        "- Refresh rates: {}Hz",
        written
            .iter()
            .map(|(rate, _)| rate.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("- File size: {EDID_LEN} bytes each");
    println!("- Default file: {alias_name}");
}
