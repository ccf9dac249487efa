use std::fmt;

/// A raw 16-bit instruction word, as fetched big-endian from two bytes of memory.
///
/// The accessors name the fields an instruction may read:
/// ```text
/// [o x y n]   o: category   x, y: register indices   n: 4-bit immediate
/// [_ _ nn ]   8-bit immediate
/// [_ nnn  ]   12-bit address
/// ```
/// Which of them are meaningful depends on the category, so `Instruction::decode`
/// picks them apart by matching on `nibbles`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Opcode(u16::from_be_bytes(bytes))
    }

    /// All four nibbles, most significant first.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        ((self.0 >> 12) as u8, self.x(), self.y(), self.n())
    }

    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl From<u16> for Opcode {
    fn from(raw: u16) -> Self {
        Opcode(raw)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
