// SPDX-License-Identifier: Apache-2.0
//! Bring up an MLX90640 and dump raw frame words.
//!
//! This exercises the full transport sequence (reset, clock request, EEPROM dump, frame polling)
//! without a calibration library attached, so it prints raw register words rather than
//! temperatures.

use std::env;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;
use linux_embedded_hal::{Delay, I2cdev};

use mlx90640_i2c::{mlx90640, Mlx90640Bus};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        anyhow::bail!("Two arguments required: <I2C bus> <camera address>");
    }
    let address: u8 = if args[2].starts_with("0x") {
        let hex_digits = args[2].split_at(2).1;
        u8::from_str_radix(hex_digits, 16)
            .context("If the address starts with 0x, its a base-16 number")?
    } else {
        args[2].parse().context("The address to be an integer")?
    };
    let bus_path = Path::new(&args[1]);

    let channel = I2cdev::new(bus_path)
        .with_context(|| format!("opening {} as an I2C device", bus_path.display()))?;
    let mut bus = Mlx90640Bus::new(channel);
    let mut delay = Delay {};

    bus.general_reset(&mut delay)
        .context("resetting devices on the bus")?;
    // 400kHz is the recommended clock for this camera; on the Jetson Nano it has to be applied
    // through sysfs, so this only records the request.
    bus.set_frequency(400_000);

    let mut eeprom = [0u16; mlx90640::EEPROM_LENGTH];
    mlx90640::dump_eeprom(&mut bus, address, &mut eeprom).context("dumping the EEPROM image")?;
    println!(
        "EEPROM dumped, first words: {:04X} {:04X} {:04X} {:04X}",
        eeprom[0], eeprom[1], eeprom[2], eeprom[3]
    );

    let mut frame = [0u16; mlx90640::FRAME_LENGTH];
    // Default refresh rate is 2Hz; poll a few frames, skipping failed reads the way a real
    // acquisition loop would.
    for cycle in 0..8 {
        sleep(Duration::from_millis(500));
        if let Err(error) = mlx90640::read_frame(&mut bus, address, &mut frame) {
            eprintln!("frame {} skipped: {}", cycle, error);
            continue;
        }
        let pixels = &frame[..mlx90640::NUM_PIXELS];
        let min = pixels.iter().min().unwrap();
        let max = pixels.iter().max().unwrap();
        println!(
            "frame {}: status {:04X}, raw pixel words {:04X}..{:04X}",
            cycle,
            frame[833],
            min,
            max
        );
    }
    Ok(())
}
