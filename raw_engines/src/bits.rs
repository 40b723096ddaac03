/// MSB-first bit writer used by the Rice engine.
pub struct BitWriter {
    buffer: Vec<u8>,
    acc: u64,
    n_bits: u32,
}

impl BitWriter {
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(bytes),
            acc: 0,
            n_bits: 0,
        }
    }

    /// Append the low `nbits` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, nbits: u32) {
        debug_assert!(nbits <= 56);
        if nbits == 0 {
            return;
        }
        let mask = (1u64 << nbits) - 1;
        self.acc = (self.acc << nbits) | (value & mask);
        self.n_bits += nbits;
        while self.n_bits >= 8 {
            self.n_bits -= 8;
            self.buffer.push((self.acc >> self.n_bits) as u8);
        }
        self.acc &= (1u64 << self.n_bits) - 1;
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u64, 1);
    }

    /// Write `count` one bits.
    pub fn write_ones(&mut self, count: u32) {
        let mut left = count;
        while left > 0 {
            let chunk = left.min(32);
            self.write_bits(u64::MAX, chunk);
            left -= chunk;
        }
    }

    /// Flush the partial byte, zero padded.
    pub fn finish(mut self) -> Vec<u8> {
        if self.n_bits > 0 {
            self.buffer.push((self.acc << (8 - self.n_bits)) as u8);
        }
        self.buffer
    }
}

/// MSB-first bit reader over a borrowed payload.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn read_bit(&mut self) -> anyhow::Result<bool> {
        let byte = self
            .data
            .get(self.pos / 8)
            .ok_or_else(|| anyhow::anyhow!("payload ended after {} bits", self.pos))?;
        let bit = (byte >> (7 - self.pos % 8)) & 1 == 1;
        self.pos += 1;
        Ok(bit)
    }

    pub fn read_bits(&mut self, nbits: u32) -> anyhow::Result<u64> {
        let mut v = 0u64;
        for _ in 0..nbits {
            v = (v << 1) | self.read_bit()? as u64;
        }
        Ok(v)
    }

    /// Count leading one bits, stopping after `limit` ones without consuming a
    /// terminating zero.
    pub fn read_ones(&mut self, limit: u32) -> anyhow::Result<u32> {
        let mut q = 0;
        while q < limit {
            if !self.read_bit()? {
                break;
            }
            q += 1;
        }
        Ok(q)
    }

    pub fn remaining_bits(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.pos)
    }
}
