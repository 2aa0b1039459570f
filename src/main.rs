use dmgboy::cartridge::Cartridge;
use dmgboy::motherboard::MotherBoard;
use std::path::PathBuf;

struct Options {
    rom: String,
    debug: bool,
    trace: bool,
    silent: bool,
    exit_on_infinite_jr: bool,
    scale: u32,
}

fn parse_options() -> Options {
    let mut opts = Options {
        rom: String::new(),
        debug: false,
        trace: false,
        silent: false,
        exit_on_infinite_jr: false,
        scale: 2,
    };
    {
        let mut ap = argparse::ArgumentParser::new();
        ap.set_description("Original Game Boy (DMG) emulator");
        ap.refer(&mut opts.debug)
            .add_option(&["--debug"], argparse::StoreTrue, "Enable debug logging");
        ap.refer(&mut opts.trace)
            .add_option(&["--trace"], argparse::StoreTrue, "Enable per-component trace logging");
        ap.refer(&mut opts.silent)
            .add_option(&["--silent"], argparse::StoreTrue, "Disable logging");
        ap.refer(&mut opts.exit_on_infinite_jr).add_option(
            &["--exit-on-infinite-jr"],
            argparse::StoreTrue,
            "Stop when the cpu spins on a jr to itself",
        );
        ap.refer(&mut opts.scale).add_option(
            &["-x", "--scale-factor"],
            argparse::Store,
            "Scale the video by a factor of 1, 2, 4, or 8",
        );
        ap.refer(&mut opts.rom).add_argument("rom", argparse::Store, "Rom file");
        ap.parse_args_or_exit();
    }
    if !opts.silent {
        rog::reg("dmgboy");
        rog::reg("dmgboy::cartridge");
    }
    if opts.debug || opts.trace {
        rog::reg("dmgboy::cpu");
        rog::reg("dmgboy::mmu");
        rog::reg("dmgboy::ppu");
        rog::reg("dmgboy::motherboard");
    }
    opts
}

// Builds the board from the ROM file, restoring battery RAM from the .sav
// file next to it when the cartridge has one.
fn power_up(opts: &Options) -> (MotherBoard, PathBuf) {
    let rom = std::fs::read(&opts.rom).unwrap_or_else(|e| {
        eprintln!("Cannot read rom {}: {}", opts.rom, e);
        std::process::exit(1);
    });
    let mut cart = Cartridge::from_rom(rom).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    let sav_path = PathBuf::from(&opts.rom).with_extension("sav");
    if cart.info().battery {
        if let Ok(data) = std::fs::read(&sav_path) {
            rog::debugln!("Restoring battery ram from {:?}", sav_path);
            cart.restore_ram(&data);
        }
    }
    let mut mbrd = MotherBoard::power_up(cart);
    mbrd.exit_on_infinite_jr = opts.exit_on_infinite_jr;
    (mbrd, sav_path)
}

fn save_battery_ram(mbrd: &MotherBoard, sav_path: &PathBuf) {
    if !mbrd.mmu.cartridge.info().battery {
        return;
    }
    rog::debugln!("Persisting battery ram to {:?}", sav_path);
    if let Err(e) = std::fs::write(sav_path, mbrd.mmu.cartridge.ram()) {
        eprintln!("Cannot write {:?}: {}", sav_path, e);
    }
}

#[cfg(feature = "gui")]
fn main() {
    use dmgboy::ppu::{SCREEN_H, SCREEN_W};
    use std::cell::RefCell;

    let opts = parse_options();
    let (mut mbrd, sav_path) = power_up(&opts);

    let mut option = minifb::WindowOptions::default();
    option.resize = true;
    option.scale = match opts.scale {
        1 => minifb::Scale::X1,
        2 => minifb::Scale::X2,
        4 => minifb::Scale::X4,
        8 => minifb::Scale::X8,
        _ => {
            eprintln!("Supported scale: 1, 2, 4 or 8");
            std::process::exit(1);
        }
    };
    let title = mbrd.mmu.cartridge.info().title.clone();
    let window =
        minifb::Window::new(format!("DMG - {}", title).as_str(), SCREEN_W, SCREEN_H, option).unwrap();
    let window = RefCell::new(window);
    let window_buffer = RefCell::new(vec![0x00u32; SCREEN_W * SCREEN_H]);

    mbrd.run(
        || {
            let window = window.borrow();
            !window.is_open() || window.is_key_down(minifb::Key::Escape)
        },
        |frame| {
            let mut buffer = window_buffer.borrow_mut();
            for y in 0..SCREEN_H {
                for x in 0..SCREEN_W {
                    let g = u32::from(frame.get_pixel(x, y).shade());
                    buffer[y * SCREEN_W + x] = 0xff00_0000 | (g << 16) | (g << 8) | g;
                }
            }
            window.borrow_mut().update_with_buffer(buffer.as_slice()).unwrap();
        },
    );

    save_battery_ram(&mbrd, &sav_path);
}

// Without a window backend the harness runs a fixed number of frames, which
// is enough to smoke-test a ROM from a terminal.
#[cfg(not(feature = "gui"))]
fn main() {
    use std::cell::Cell;

    let opts = parse_options();
    let (mut mbrd, sav_path) = power_up(&opts);

    let frames = Cell::new(0u32);
    mbrd.run(
        || frames.get() >= 60,
        |_| {
            frames.set(frames.get() + 1);
            rog::debugln!("Frame {} delivered", frames.get());
        },
    );

    save_battery_ram(&mbrd, &sav_path);
}
