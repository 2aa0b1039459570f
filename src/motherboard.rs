// Ties the pieces together and drives the tick loop: one CPU instruction,
// then the same cycle grant to the PPU through the memory unit. Exactly one
// logical thread runs this; the callbacks execute synchronously on it.
use super::cartridge::Cartridge;
use super::cpu::Cpu;
use super::mmu::Mmu;
use super::ppu::FrameBuffer;

pub struct MotherBoard {
    pub mmu: Mmu,
    pub cpu: Cpu,
    // Advisory CLI hint: stop the loop once the CPU latches a jump-to-self.
    pub exit_on_infinite_jr: bool,
}

impl MotherBoard {
    pub fn power_up(cartridge: Cartridge) -> Self {
        Self { mmu: Mmu::power_up(cartridge), cpu: Cpu::power_up(), exit_on_infinite_jr: false }
    }

    // Executes one instruction and hands its cycles to the PPU, so every
    // instruction's cycles are visible there before the next one begins.
    pub fn next(&mut self) -> u32 {
        let cycles = self.cpu.next(&mut self.mmu);
        self.mmu.next(cycles);
        cycles
    }

    // Runs until `should_close` answers true. The poll happens between tick
    // pairs, so a cancel observed during v-blank still has its frame
    // delivered first. `on_vblank` receives the frame as a borrow that
    // cannot outlive the call; the buffer is cleared right after.
    pub fn run(&mut self, mut should_close: impl FnMut() -> bool, mut on_vblank: impl FnMut(&FrameBuffer)) {
        while !should_close() {
            self.next();
            if self.mmu.ppu.check_and_reset_frame_ready() {
                on_vblank(&self.mmu.ppu.frame);
                self.mmu.ppu.frame.reset();
            }
            if self.exit_on_infinite_jr && self.cpu.stuck_jr {
                rog::debugln!("Detected a jr to itself, stopping the tick loop");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MotherBoard;
    use crate::cartridge::Cartridge;
    use crate::ppu::{SCREEN_H, SCREEN_W};
    use std::cell::Cell;

    // 32KB of NOPs with a ROM-only header.
    fn nop_board() -> MotherBoard {
        let mut rom = vec![0x00; 0x8000];
        rom[0x147] = 0x00;
        MotherBoard::power_up(Cartridge::from_rom(rom).unwrap())
    }

    #[test]
    fn frame_is_delivered_after_a_frame_of_nops() {
        // A NOP takes 4 cycles, so 17556 instructions make one 70224 cycle
        // frame and exactly one callback.
        let mut mbrd = nop_board();
        let ticks = Cell::new(0u32);
        let frames = Cell::new(0u32);
        mbrd.run(
            || ticks.replace(ticks.get() + 1) >= 17556,
            |frame| {
                frames.set(frames.get() + 1);
                assert_eq!(frame.get_pixel(SCREEN_W - 1, SCREEN_H - 1), crate::ppu::Color::White);
            },
        );
        assert_eq!(frames.get(), 1);
    }

    #[test]
    fn cancel_before_first_tick() {
        let mut mbrd = nop_board();
        let frames = Cell::new(0u32);
        mbrd.run(|| true, |_| frames.set(frames.get() + 1));
        assert_eq!(frames.get(), 0);
        assert_eq!(mbrd.cpu.reg.pc, 0x0100);
    }

    #[test]
    fn infinite_jr_stops_the_loop() {
        let mut rom = vec![0x00; 0x8000];
        rom[0x147] = 0x00;
        rom[0x100] = 0x18;
        rom[0x101] = 0xfe;
        let mut mbrd = MotherBoard::power_up(Cartridge::from_rom(rom).unwrap());
        mbrd.exit_on_infinite_jr = true;
        // Without the hint this loop would never come back.
        mbrd.run(|| false, |_| {});
        assert!(mbrd.cpu.stuck_jr);
    }
}
