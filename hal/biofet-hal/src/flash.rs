//! NOR flash storage abstractions
//!
//! Provides the erase/program/read device model shared by the storage
//! driver and the persistence layer.
//!
//! Erase sets every bit of a sector to 1. Programming can only clear bits,
//! so a byte range must be erased before it is written with data that needs
//! a 0 -> 1 transition. A single program transaction must stay inside one
//! page; [`NorFlash::program`] splits longer writes for the caller.

/// Value of every byte after an erase
pub const ERASED_BYTE: u8 = 0xFF;

/// Errors from flash operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Bus transfer failed
    Bus,
    /// Device select could not be driven
    Select,
    /// Device stayed busy past the bounded wait
    Timeout,
    /// Address range lies outside the device
    OutOfBounds,
    /// Program request crosses a page boundary
    PageBoundary,
}

/// JEDEC identification returned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JedecId {
    /// Manufacturer code (0xEF for Winbond)
    pub manufacturer: u8,
    /// Memory type
    pub memory_type: u8,
    /// Capacity code (log2 of size in bytes)
    pub capacity: u8,
}

impl JedecId {
    /// Build from the three id bytes in wire order
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            manufacturer: bytes[0],
            memory_type: bytes[1],
            capacity: bytes[2],
        }
    }

    /// Packed 24-bit id, manufacturer in the top byte
    pub fn as_u32(&self) -> u32 {
        (self.manufacturer as u32) << 16 | (self.memory_type as u32) << 8 | self.capacity as u32
    }

    /// A floating or shorted bus reads all zeros or all ones
    pub fn is_present(&self) -> bool {
        !matches!(self.as_u32(), 0x00_0000 | 0xFF_FFFF)
    }
}

/// Erase/program/read storage device
///
/// Every operation waits for the device to be ready first and returns only
/// once the device has finished, so no operation is ever outstanding when
/// a call returns. Waits are bounded and fail with [`FlashError::Timeout`].
pub trait NorFlash {
    /// Device size in bytes
    const CAPACITY: u32;

    /// Erase granularity in bytes
    const SECTOR_SIZE: u32;

    /// Program granularity in bytes
    const PAGE_SIZE: u32;

    /// Read the JEDEC id
    fn read_id(&mut self) -> Result<JedecId, FlashError>;

    /// Read `buf.len()` bytes starting at `addr`
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), FlashError>;

    /// Erase the sector containing `addr`
    fn erase_sector(&mut self, addr: u32) -> Result<(), FlashError>;

    /// Erase the whole device
    fn erase_chip(&mut self) -> Result<(), FlashError>;

    /// Program data inside a single page
    ///
    /// Returns [`FlashError::PageBoundary`] if `addr..addr + data.len()`
    /// does not fit in the page that contains `addr`.
    fn program_page(&mut self, addr: u32, data: &[u8]) -> Result<(), FlashError>;

    /// Program data of any length, split into page-bounded transactions
    fn program(&mut self, addr: u32, data: &[u8]) -> Result<(), FlashError> {
        check_range(addr, data.len(), Self::CAPACITY)?;
        for (chunk_addr, chunk) in PageChunks::new(addr, data, Self::PAGE_SIZE) {
            self.program_page(chunk_addr, chunk)?;
        }
        Ok(())
    }
}

/// Check that `addr..addr + len` lies inside a device of `capacity` bytes
pub fn check_range(addr: u32, len: usize, capacity: u32) -> Result<(), FlashError> {
    let end = addr as u64 + len as u64;
    if end > capacity as u64 {
        Err(FlashError::OutOfBounds)
    } else {
        Ok(())
    }
}

/// Check if a write of `len` bytes at `addr` runs past the end of its page
pub fn crosses_page(addr: u32, len: usize, page_size: u32) -> bool {
    (addr % page_size) as usize + len > page_size as usize
}

/// Start address of the sector containing `addr`
pub fn sector_base(addr: u32, sector_size: u32) -> u32 {
    addr - addr % sector_size
}

/// Iterator splitting a write into page-bounded pieces
///
/// Yields `(address, bytes)` pairs in address order. Each piece ends at a
/// page boundary except possibly the last.
#[derive(Debug, Clone)]
pub struct PageChunks<'a> {
    addr: u32,
    data: &'a [u8],
    page_size: u32,
}

impl<'a> PageChunks<'a> {
    /// Split `data` destined for `addr`
    pub fn new(addr: u32, data: &'a [u8], page_size: u32) -> Self {
        Self {
            addr,
            data,
            page_size,
        }
    }
}

impl<'a> Iterator for PageChunks<'a> {
    type Item = (u32, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }

        let room = (self.page_size - self.addr % self.page_size) as usize;
        let (head, tail) = self.data.split_at(room.min(self.data.len()));
        let addr = self.addr;

        self.addr += head.len() as u32;
        self.data = tail;
        Some((addr, head))
    }
}
