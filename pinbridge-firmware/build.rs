//! Build script for pinbridge-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` from it

use std::collections::BTreeSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// RP2040 user GPIOs are 0-29
const GPIO_COUNT: i64 = 30;

/// I2C0 SDA / SCL
const I2C_PINS: [i64; 2] = [16, 17];

/// GPIOs behind ADC channels 0-3; channel 4 is the temperature sensor
const ADC_PINS: [i64; 4] = [26, 27, 28, 29];

const ADC_CHANNELS: i64 = 5;

fn main() {
    setup_linker();
    let board = validate_config();
    generate_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validated contents of board.toml
struct Board {
    vid: u16,
    pid: u16,
    manufacturer: String,
    product: String,
    interface: String,
    pins: Vec<u8>,
    bootloader_button: bool,
    i2c_enabled: bool,
    adc_channels: u8,
}

/// Validate board.toml configuration at compile time
fn validate_config() -> Board {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the pinbridge-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);

    let mut errors = Vec::new();
    let (vid, pid, manufacturer, product, interface) = validate_usb(&config, &mut errors);
    let bootloader_button = validate_button(&config, &mut errors);
    let i2c_enabled = validate_i2c(&config, &mut errors);
    let adc_channels = validate_adc(&config, &mut errors);
    let pins = validate_pins(&config, i2c_enabled, adc_channels, &mut errors);

    report("Invalid board configuration in board.toml", &errors);

    println!("cargo:warning=board.toml validated successfully");

    Board {
        vid,
        pid,
        manufacturer,
        product,
        interface,
        pins,
        bootloader_button,
        i2c_enabled,
        adc_channels,
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with a boxed list of errors, if there are any
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_required_sections(config: &toml::Value) {
    let errors: Vec<String> = ["usb", "gpio", "button", "i2c", "adc"]
        .iter()
        .filter(|section| !matches!(config.get(**section), Some(toml::Value::Table(_))))
        .map(|section| format!("Missing [{}] section", section))
        .collect();

    report("Missing required sections in board.toml", &errors);
}

fn get_integer(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(value)) => Some(*value),
        Some(_) => {
            errors.push(format!("[{}] '{}' must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

fn get_string(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> String {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::String(value)) if !value.is_empty() => value.clone(),
        Some(toml::Value::String(_)) => {
            errors.push(format!("[{}] '{}' must not be empty", section, key));
            String::new()
        }
        Some(_) => {
            errors.push(format!("[{}] '{}' must be a string", section, key));
            String::new()
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            String::new()
        }
    }
}

fn get_bool(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> bool {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Boolean(value)) => *value,
        Some(_) => {
            errors.push(format!("[{}] '{}' must be true or false", section, key));
            false
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            false
        }
    }
}

fn validate_usb(config: &toml::Value, errors: &mut Vec<String>) -> (u16, u16, String, String, String) {
    let mut id = |key: &str| {
        let value = get_integer(config, "usb", key, errors)?;
        match u16::try_from(value) {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(format!("[usb] '{}' must be 0x0000-0xFFFF", key));
                None
            }
        }
    };
    let vid = id("vid").unwrap_or(0);
    let pid = id("pid").unwrap_or(0);

    let manufacturer = get_string(config, "usb", "manufacturer", errors);
    let product = get_string(config, "usb", "product", errors);
    let interface = get_string(config, "usb", "interface", errors);

    (vid, pid, manufacturer, product, interface)
}

/// Returns true for bootloader mode
fn validate_button(config: &toml::Value, errors: &mut Vec<String>) -> bool {
    let mode = get_string(config, "button", "mode", errors);
    match mode.as_str() {
        "report" => false,
        "bootloader" => true,
        "" => false,
        _ => {
            errors.push("[button] mode must be 'report' or 'bootloader'".to_string());
            false
        }
    }
}

fn validate_i2c(config: &toml::Value, errors: &mut Vec<String>) -> bool {
    get_bool(config, "i2c", "enabled", errors)
}

fn validate_adc(config: &toml::Value, errors: &mut Vec<String>) -> u8 {
    match get_integer(config, "adc", "channels", errors) {
        Some(count) if (1..=ADC_CHANNELS).contains(&count) => count as u8,
        Some(_) => {
            errors.push(format!("[adc] channels must be 1-{}", ADC_CHANNELS));
            1
        }
        None => 1,
    }
}

fn validate_pins(config: &toml::Value, i2c_enabled: bool, adc_channels: u8, errors: &mut Vec<String>) -> Vec<u8> {
    let entries = match config.get("gpio").and_then(|s| s.get("pins")) {
        Some(toml::Value::Array(entries)) => entries,
        Some(_) => {
            errors.push("[gpio] 'pins' must be an array of GPIO numbers".to_string());
            return Vec::new();
        }
        None => {
            errors.push("[gpio] missing 'pins'".to_string());
            return Vec::new();
        }
    };

    let first_adc = ADC_CHANNELS - adc_channels as i64;
    let adc_pins: Vec<i64> = ADC_PINS
        .iter()
        .enumerate()
        .filter(|(channel, _)| *channel as i64 >= first_adc)
        .map(|(_, pin)| *pin)
        .collect();

    let mut seen = BTreeSet::new();
    let mut pins = Vec::new();

    for entry in entries {
        let pin = match entry {
            toml::Value::Integer(pin) => *pin,
            other => {
                errors.push(format!("[gpio] pin {} is not an integer", other));
                continue;
            }
        };

        if !(0..GPIO_COUNT).contains(&pin) {
            errors.push(format!("[gpio] pin {} out of range (0-{})", pin, GPIO_COUNT - 1));
            continue;
        }
        if !seen.insert(pin) {
            errors.push(format!("[gpio] pin {} listed twice", pin));
            continue;
        }
        if i2c_enabled && I2C_PINS.contains(&pin) {
            errors.push(format!("[gpio] pin {} is used by I2C", pin));
            continue;
        }
        if adc_pins.contains(&pin) {
            errors.push(format!("[gpio] pin {} is used by an ADC channel", pin));
            continue;
        }

        pins.push(pin as u8);
    }

    pins
}

/// Write `board_config.rs` for the firmware to `include!`
fn generate_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let pins = board
        .pins
        .iter()
        .map(|pin| pin.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let button_mode = if board.bootloader_button {
        "ButtonMode::Bootloader"
    } else {
        "ButtonMode::Report"
    };

    let source = format!(
        "// Generated by build.rs from board.toml\n\
        pub const USB_VID: u16 = {:#06x};\n\
        pub const USB_PID: u16 = {:#06x};\n\
        pub const USB_MANUFACTURER: &str = {:?};\n\
        pub const USB_PRODUCT: &str = {:?};\n\
        pub const USB_INTERFACE: &str = {:?};\n\
        pub const GPIO_PINS: &[u8] = &[{}];\n\
        pub const BUTTON_MODE: ButtonMode = {};\n\
        pub const I2C_ENABLED: bool = {};\n\
        pub const ADC_CHANNELS: u8 = {};\n",
        board.vid,
        board.pid,
        board.manufacturer,
        board.product,
        board.interface,
        pins,
        button_mode,
        board.i2c_enabled,
        board.adc_channels,
    );

    fs::write(out_dir.join("board_config.rs"), source).unwrap();
}
