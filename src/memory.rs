use crate::error::OOB_MEMORY_ACCESS;

/// Flat, fixed-size, byte-addressed storage. Values cross the boundary
/// as 8-byte little-endian IEEE-754 doubles; there is no allocator and
/// no alignment requirement, addresses are caller-managed.
pub struct LinearMemory {
    data: Vec<u8>,
}

impl LinearMemory {
    pub const DEFAULT_SIZE: usize = 65536;
    pub const VALUE_SIZE: usize = 8;

    pub fn new(size: usize) -> Self {
        Self { data: vec![0; size] }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn load_f64(&self, addr: usize) -> Result<f64, &'static str> {
        let end = addr.checked_add(Self::VALUE_SIZE).ok_or(OOB_MEMORY_ACCESS)?;
        if end > self.data.len() {
            return Err(OOB_MEMORY_ACCESS);
        }
        let bytes: [u8; Self::VALUE_SIZE] = self.data[addr..end].try_into().unwrap();
        Ok(f64::from_le_bytes(bytes))
    }

    #[inline]
    pub fn store_f64(&mut self, addr: usize, v: f64) -> Result<(), &'static str> {
        let end = addr.checked_add(Self::VALUE_SIZE).ok_or(OOB_MEMORY_ACCESS)?;
        if end > self.data.len() {
            return Err(OOB_MEMORY_ACCESS);
        }
        self.data[addr..end].copy_from_slice(&v.to_le_bytes());
        Ok(())
    }
}
