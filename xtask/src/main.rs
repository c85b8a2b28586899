// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use std::env;
use std::path::PathBuf;
use std::process::Command;

const FIRMWARE_PACKAGE: &str = "clock-firmware";
const FIRMWARE_DIR: &str = "clock-firmware";
const FIRMWARE_TARGET: &str = "thumbv6m-none-eabi";

#[derive(Debug, Clone, Copy)]
enum Receiver {
    Gps,
    Dcf77,
}

impl Receiver {
    fn feature(&self) -> &'static str {
        match self {
            Receiver::Gps => "gps",
            Receiver::Dcf77 => "dcf77",
        }
    }
}

#[derive(Debug)]
enum Command_ {
    Build(Receiver),
    Flash(Receiver),
    Run(Receiver),
    Attach,
    Test,
    Help,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = match parse_command(&args[1..]) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error parsing command: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(command) {
        eprintln!("Error executing command: {}", e);
        std::process::exit(1);
    }
}

fn parse_command(args: &[String]) -> Result<Command_, String> {
    if args.is_empty() {
        return Err("No command provided".to_string());
    }

    let receiver = || match args.get(1) {
        Some(name) => parse_receiver(name),
        None => Ok(Receiver::Dcf77),
    };

    match args[0].as_str() {
        "build" => Ok(Command_::Build(receiver()?)),
        "flash" => Ok(Command_::Flash(receiver()?)),
        "run" => Ok(Command_::Run(receiver()?)),
        "attach" => Ok(Command_::Attach),
        "test" => Ok(Command_::Test),
        "help" => Ok(Command_::Help),
        _ => Err(format!("Unknown command: {}", args[0])),
    }
}

fn parse_receiver(name: &str) -> Result<Receiver, String> {
    match name {
        "gps" => Ok(Receiver::Gps),
        "dcf77" => Ok(Receiver::Dcf77),
        _ => Err(format!("Unknown receiver: {}", name)),
    }
}

fn execute_command(cmd: Command_) -> Result<(), String> {
    match cmd {
        Command_::Build(receiver) => {
            println!("Building firmware for {} receiver...", receiver.feature());
            run_firmware_cargo("build", receiver)?;
            generate_bin()?;
            println!("✓ Firmware built successfully");
        }
        Command_::Flash(receiver) => {
            println!("Building and flashing firmware for {} receiver...", receiver.feature());
            run_firmware_cargo("build", receiver)?;
            run_probe_rs_download()?;
            println!("✓ Firmware flashed successfully");
        }
        Command_::Run(receiver) => {
            println!("Building and running firmware for {} receiver...", receiver.feature());
            run_firmware_cargo("run", receiver)?;
        }
        Command_::Attach => run_probe_rs_attach()?,
        Command_::Test => {
            println!("Testing clock-sync on the host...");
            run_status(Command::new("cargo").arg("test"), "cargo test")?;
            println!("✓ Tests passed");
        }
        Command_::Help => print_usage(),
    }
    Ok(())
}

fn firmware_args(subcommand: &str, receiver: Receiver) -> Vec<String> {
    [
        subcommand,
        "--release",
        "--target",
        FIRMWARE_TARGET,
        "--no-default-features",
        "--features",
        receiver.feature(),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// Run from the firmware directory so its .cargo/config.toml supplies the runner and log level.
fn run_firmware_cargo(subcommand: &str, receiver: Receiver) -> Result<(), String> {
    run_status(
        Command::new("cargo")
            .current_dir(FIRMWARE_DIR)
            .args(firmware_args(subcommand, receiver)),
        &format!("cargo {}", subcommand),
    )
}

fn run_probe_rs_download() -> Result<(), String> {
    run_status(
        Command::new("probe-rs")
            .args(["download", "--chip", "RP2040"])
            .arg(elf_path()),
        "probe-rs download",
    )
}

fn run_status(cmd: &mut Command, name: &str) -> Result<(), String> {
    let status = cmd
        .status()
        .map_err(|e| format!("Failed to run {}: {}", name, e))?;

    if !status.success() {
        return Err(format!("{} failed for {}", name, FIRMWARE_PACKAGE));
    }
    Ok(())
}

fn elf_path() -> PathBuf {
    PathBuf::from(format!(
        "{}/target/{}/release/{}",
        FIRMWARE_DIR, FIRMWARE_TARGET, FIRMWARE_PACKAGE
    ))
}

fn generate_bin() -> Result<(), String> {
    let elf_path = elf_path();
    let bin_path = elf_path.with_extension("bin");

    if !elf_path.exists() {
        return Err(format!("ELF binary not found at {}", elf_path.display()));
    }

    let output = Command::new("arm-none-eabi-objcopy")
        .arg("-O")
        .arg("binary")
        .arg(&elf_path)
        .arg(&bin_path)
        .output()
        .map_err(|e| {
            format!(
                "Failed to run arm-none-eabi-objcopy: {}. Make sure arm-none-eabi-objcopy is installed.",
                e
            )
        })?;

    if !output.status.success() {
        return Err(format!(
            "Failed to generate .bin file:\n{}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    println!("✓ Generated {}", bin_path.display());
    Ok(())
}

fn run_probe_rs_attach() -> Result<(), String> {
    let elf_path = elf_path();
    if !elf_path.exists() {
        return Err(format!(
            "ELF binary not found at {}. Build the firmware first using 'cargo xtask build'.",
            elf_path.display()
        ));
    }

    run_status(
        Command::new("probe-rs")
            .args(["attach", "--chip", "RP2040"])
            .arg(&elf_path),
        "probe-rs attach",
    )
}

fn print_usage() {
    eprintln!(
        "Usage: cargo xtask <COMMAND> [RECEIVER]\n\
         \n\
         Commands:\n\
         \tbuild       Build the firmware (generates a .bin file)\n\
         \tflash       Build and flash the firmware\n\
         \trun         Build and run the firmware with probe-rs\n\
         \tattach      Attach to the running firmware with probe-rs\n\
         \ttest        Run the clock-sync host tests\n\
         \thelp        Show this help message\n\
         \n\
         Receivers:\n\
         \tdcf77       Long-wave time code receiver on a GPIO (default)\n\
         \tgps         Satellite receiver sentences on UART0\n\
         \n\
         Examples:\n\
         \tcargo xtask build gps        # Build the satellite receiver firmware\n\
         \tcargo xtask flash            # Flash the time code receiver firmware\n\
         \tcargo xtask test             # Run the host tests"
    );
}
