//! Bus-level W25Q emulator for driver tests
//!
//! Models what the driver must get right on the wire:
//! - commands are framed by chip select
//! - erase/program need the write enable latch, which auto-clears
//! - the device reports BUSY for a while after erase/program
//! - programming ANDs into the array and wraps inside the page
//!
//! Protocol misuse is recorded in `violations` rather than panicking.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use biofet_hal::select::ChipSelect;
use biofet_hal::spi::SpiBus;
use embedded_hal::delay::DelayNs;

use super::w25q::{cmd, STATUS_BUSY, STATUS_WEL};

const CAPACITY: usize = 0x40_0000;
const SECTOR: usize = 4096;
const PAGE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

struct Chip {
    mem: Vec<u8>,
    wel: bool,
    /// Status reads left before BUSY clears
    busy_left: u32,
    /// Status reads reported after each erase/program
    busy_polls: u32,
    stuck: bool,
    bus_fault: bool,
    selected: bool,
    /// Bytes written in the current transaction
    command: Vec<u8>,
    /// Bytes already returned in the current transaction's data phase
    read_pos: usize,
    transactions: Vec<Vec<u8>>,
    violations: Vec<&'static str>,
}

impl Chip {
    fn busy(&self) -> bool {
        self.stuck || self.busy_left > 0
    }

    fn status(&mut self) -> u8 {
        let mut status = 0;
        if self.busy() {
            status |= STATUS_BUSY;
        }
        if self.wel {
            status |= STATUS_WEL;
        }
        self.busy_left = self.busy_left.saturating_sub(1);
        status
    }

    fn next_read_byte(&mut self) -> u8 {
        let pos = self.read_pos;
        self.read_pos += 1;

        match self.command.first().copied() {
            Some(cmd::READ_STATUS_1) => self.status(),
            Some(cmd::JEDEC_ID) => [0xEF, 0x40, 0x16].get(pos).copied().unwrap_or(0xFF),
            Some(cmd::READ_DATA) if self.command.len() >= 4 => {
                self.mem[(address(&self.command) + pos) % CAPACITY]
            }
            _ => {
                self.violations.push("read without a read command");
                0xFF
            }
        }
    }

    /// Execute the write commands, which take effect when select is released
    fn complete(&mut self) {
        let command = core::mem::take(&mut self.command);
        let Some(&opcode) = command.first() else {
            return;
        };

        if self.busy() && opcode != cmd::READ_STATUS_1 {
            self.violations.push("command issued while busy");
        }

        match opcode {
            cmd::WRITE_ENABLE => self.wel = true,
            cmd::SECTOR_ERASE | cmd::CHIP_ERASE | cmd::PAGE_PROGRAM => {
                if !self.wel {
                    self.violations.push("write without write enable");
                } else {
                    self.write(opcode, &command);
                    self.wel = false;
                    self.busy_left = self.busy_polls;
                }
            }
            _ => {}
        }

        self.transactions.push(command);
    }

    fn write(&mut self, opcode: u8, command: &[u8]) {
        if opcode == cmd::CHIP_ERASE {
            self.mem.fill(0xFF);
            return;
        }
        if command.len() < 4 {
            self.violations.push("missing address");
            return;
        }
        let addr = address(command);

        if opcode == cmd::SECTOR_ERASE {
            let base = addr - addr % SECTOR;
            self.mem[base..base + SECTOR].fill(0xFF);
            return;
        }

        let page = addr - addr % PAGE;
        for (i, &byte) in command[4..].iter().enumerate() {
            let cell = page + (addr + i) % PAGE;
            if byte & !self.mem[cell] != 0 {
                self.violations.push("program over unerased bits");
            }
            self.mem[cell] &= byte;
        }
    }
}

/// 24-bit address following the opcode
fn address(command: &[u8]) -> usize {
    ((command[1] as usize) << 16) | ((command[2] as usize) << 8) | command[3] as usize
}

/// Shared handle to the emulated device
#[derive(Clone)]
pub struct Emulator(Rc<RefCell<Chip>>);

impl Emulator {
    /// Blank device, reports BUSY for 3 polls after each erase/program
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Chip {
            mem: std::vec![0xFF; CAPACITY],
            wel: false,
            busy_left: 0,
            busy_polls: 3,
            stuck: false,
            bus_fault: false,
            selected: false,
            command: Vec::new(),
            read_pos: 0,
            transactions: Vec::new(),
            violations: Vec::new(),
        })))
    }

    pub fn spi(&self) -> EmulatorSpi {
        EmulatorSpi(self.clone())
    }

    pub fn select(&self) -> EmulatorSelect {
        EmulatorSelect(self.clone())
    }

    /// Bytes written in every completed transaction, in order
    pub fn transactions(&self) -> Vec<Vec<u8>> {
        self.0.borrow().transactions.clone()
    }

    pub fn violations(&self) -> Vec<&'static str> {
        self.0.borrow().violations.clone()
    }

    pub fn is_selected(&self) -> bool {
        self.0.borrow().selected
    }

    pub fn set_busy_polls(&self, polls: u32) {
        self.0.borrow_mut().busy_polls = polls;
    }

    /// Keep BUSY set forever
    pub fn set_stuck(&self, stuck: bool) {
        self.0.borrow_mut().stuck = stuck;
    }

    /// Fail every bus transfer
    pub fn set_bus_fault(&self, fault: bool) {
        self.0.borrow_mut().bus_fault = fault;
    }

    /// Overwrite the whole array
    pub fn fill(&self, byte: u8) {
        self.0.borrow_mut().mem.fill(byte);
    }
}

pub struct EmulatorSpi(Emulator);

impl SpiBus for EmulatorSpi {
    type Error = BusFault;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut chip = (self.0).0.borrow_mut();
        if chip.bus_fault {
            return Err(BusFault);
        }
        if !chip.selected {
            chip.violations.push("write while deselected");
        }
        chip.command.extend_from_slice(data);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut chip = (self.0).0.borrow_mut();
        if chip.bus_fault {
            return Err(BusFault);
        }
        if !chip.selected {
            chip.violations.push("read while deselected");
        }
        for byte in buf.iter_mut() {
            *byte = chip.next_read_byte();
        }
        Ok(())
    }
}

pub struct EmulatorSelect(Emulator);

impl ChipSelect for EmulatorSelect {
    type Error = core::convert::Infallible;

    fn select(&mut self) -> Result<(), Self::Error> {
        let mut chip = (self.0).0.borrow_mut();
        if chip.selected {
            chip.violations.push("nested select");
        }
        chip.selected = true;
        chip.command.clear();
        chip.read_pos = 0;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        let mut chip = (self.0).0.borrow_mut();
        chip.selected = false;
        chip.complete();
        Ok(())
    }
}

/// Delay that only accumulates the requested time
#[derive(Default)]
pub struct EmulatorDelay {
    pub total_us: u64,
}

impl DelayNs for EmulatorDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_us += (ns / 1000) as u64;
    }
}
