use crate::cli::{Cli, Commands};
use ffshrink::config::Config;
use ffshrink::engine::{self, CompressJob, EncodeOptions, EncodePlan};
use ffshrink::error::ShrinkError;
use std::io::Write;
use std::path::PathBuf;
use std::process;

pub fn run(cli: Cli) {
    // Handle subcommands first
    if let Some(command) = cli.command {
        match command {
            Commands::CheckTools => handle_check_tools(),
            Commands::Probe { file } => handle_probe(file),
            Commands::DryRun {
                input,
                output,
                size,
            } => handle_dry_run(input, output, size),
            Commands::InitConfig => handle_init_config(),
        }
        return;
    }

    let Some(input) = cli.input else {
        eprintln!("Usage: ffshrink <INPUT> [OUTPUT] [--size MB]");
        eprintln!("Run 'ffshrink --help' for details.");
        process::exit(2);
    };

    let config = Config::load().unwrap_or_default();
    let output = cli
        .output
        .unwrap_or_else(|| engine::derive_output_path(&input));
    let size_mb = cli.size.unwrap_or(config.defaults.target_size_mb);

    // Refuse to clobber an existing output before any filesystem write
    if output.exists() && !cli.overwrite {
        eprintln!(
            "Output file {} already exists. Pass --overwrite to replace it.",
            output.display()
        );
        process::exit(1);
    }

    if let Err(e) = compress(&config, input, output, size_mb, cli.overwrite) {
        if let ShrinkError::EncodeFailed { stderr_tail, .. } = &e {
            if !stderr_tail.is_empty() {
                eprintln!("{}", stderr_tail);
            }
        }
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// The whole pipeline for one file: check tools, probe, plan, encode.
fn compress(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    size_mb: f64,
    overwrite: bool,
) -> Result<(), ShrinkError> {
    engine::ffmpeg_version(&config.tools.ffmpeg)?;
    engine::ffprobe_version(&config.tools.ffprobe)?;

    let media = engine::probe_media(&config.tools.ffprobe, &input)?;

    let plan = EncodePlan::new(&media, size_mb, config.defaults.max_height);

    println!("Video resolution: {}x{}", media.width, media.height);
    println!(
        "Original bitrate: {:.2} kbps",
        media.bitrate_bps as f64 / 1024.0
    );
    println!(
        "Target bitrate: {:.2} kbps",
        plan.target_bitrate as f64 / 1024.0
    );
    if plan.is_degenerate() {
        eprintln!(
            "Warning: target bitrate of {} bps is too low to be watchable; \
             consider a larger --size",
            plan.target_bitrate
        );
    }

    let mut job = CompressJob::new(input, output, size_mb);
    job.duration_s = Some(media.duration_s);

    let opts = EncodeOptions::from_config(config, overwrite);
    let cmd = engine::build_ffmpeg_cmd(&job, &plan, &opts);

    let _ = engine::write_debug_log(&format!(
        "=== Compressing {} ===\n{}",
        job.input_path.display(),
        engine::format_ffmpeg_cmd(&cmd)
    ));

    let result = engine::run_encode(&mut job, cmd, |job, parser| {
        print!("\rProgress: {}%", job.progress_pct);
        if let Some(fps) = parser.fps {
            print!(" | FPS: {:.1}", fps);
        }
        if let Some(speed) = parser.speed {
            print!(" | Speed: {:.2}x", speed);
        }
        std::io::stdout().flush().ok();
    });
    println!();

    if let Err(e) = result {
        let _ = engine::write_debug_log(&format!("Compression failed: {}", e));
        return Err(e);
    }

    println!("Compression completed successfully!");
    if let Ok(meta) = std::fs::metadata(&job.output_path) {
        println!(
            "Output file size: {:.2} MB",
            meta.len() as f64 / (1024.0 * 1024.0)
        );
    }
    let _ = engine::write_debug_log(&format!(
        "Compression finished: {}",
        job.output_path.display()
    ));

    Ok(())
}

fn handle_check_tools() {
    let config = Config::load().unwrap_or_default();

    match engine::ffmpeg_version(&config.tools.ffmpeg) {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
            match engine::ffprobe_version(&config.tools.ffprobe) {
                Ok(probe_version) => {
                    println!("ffprobe found: {}", probe_version);
                    process::exit(0);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(e.exit_code());
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn handle_probe(file: PathBuf) {
    let config = Config::load().unwrap_or_default();

    match engine::probe_media(&config.tools.ffprobe, &file) {
        Ok(info) => {
            println!("Duration: {:.2} seconds", info.duration_s);
            println!("Bitrate: {:.2} kbps", info.bitrate_bps as f64 / 1024.0);
            println!("Resolution: {}x{}", info.width, info.height);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn handle_dry_run(input: PathBuf, output: Option<PathBuf>, size: Option<f64>) {
    let config = Config::load().unwrap_or_default();
    let output = output.unwrap_or_else(|| engine::derive_output_path(&input));
    let size_mb = size.unwrap_or(config.defaults.target_size_mb);

    match engine::probe_media(&config.tools.ffprobe, &input) {
        Ok(media) => {
            let plan = EncodePlan::new(&media, size_mb, config.defaults.max_height);
            let job = CompressJob::new(input, output, size_mb);
            let opts = EncodeOptions::from_config(&config, false);
            let cmd = engine::build_ffmpeg_cmd(&job, &plan, &opts);
            println!("{}", engine::format_ffmpeg_cmd(&cmd));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn handle_init_config() {
    match Config::load() {
        Ok(cfg) => {
            match Config::config_path() {
                Ok(path) => println!("Config loaded successfully from {}", path.display()),
                Err(e) => println!("Config loaded, but config path unknown: {:#}", e),
            }
            println!("{:#?}", cfg);
        }
        Err(e) => {
            println!("Config missing or invalid: {:#}", e);
            println!("Creating default config...");

            let cfg = Config::default();
            if let Err(err) = cfg.save() {
                eprintln!("Failed to save default config: {:#}", err);
                process::exit(1);
            } else {
                match Config::config_path() {
                    Ok(path) => println!("Default config saved to {}", path.display()),
                    Err(e) => println!("Default config saved (path unknown): {:#}", e),
                }
            }
        }
    }
}
