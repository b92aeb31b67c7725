// Licensed under the Apache-2.0 license

//! Algorithm parameter tables for every mode the SHA engine supports.

/// Hash variant selected for a session
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ShaMode {
    Sha1 = 0,
    Sha224 = 1,
    Sha256 = 2,
    Sha384 = 3,
    Sha512 = 4,
}

/// Algorithm family: modes within a family share block size, word width
/// and compression function, differing only in initial constants and
/// digest truncation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaFamily {
    Sha1,
    Sha256,
    Sha512,
}

impl ShaFamily {
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            ShaFamily::Sha1 | ShaFamily::Sha256 => 64,
            ShaFamily::Sha512 => 128,
        }
    }

    /// Width of a state word in bytes
    #[must_use]
    pub const fn word_size(self) -> usize {
        match self {
            ShaFamily::Sha1 | ShaFamily::Sha256 => 4,
            ShaFamily::Sha512 => 8,
        }
    }

    #[must_use]
    pub const fn state_words(self) -> usize {
        match self {
            ShaFamily::Sha1 => 5,
            ShaFamily::Sha256 | ShaFamily::Sha512 => 8,
        }
    }

    /// Size of the trailing bit-length field appended during padding
    #[must_use]
    pub const fn length_field_size(self) -> usize {
        self.word_size() * 2
    }

    /// Number of 32-bit working registers holding the intermediate state
    #[must_use]
    pub const fn register_words(self) -> usize {
        self.state_words() * self.word_size() / 4
    }
}

impl ShaMode {
    pub const ALL: [ShaMode; 5] = [
        ShaMode::Sha1,
        ShaMode::Sha224,
        ShaMode::Sha256,
        ShaMode::Sha384,
        ShaMode::Sha512,
    ];

    #[must_use]
    pub const fn family(self) -> ShaFamily {
        match self {
            ShaMode::Sha1 => ShaFamily::Sha1,
            ShaMode::Sha224 | ShaMode::Sha256 => ShaFamily::Sha256,
            ShaMode::Sha384 | ShaMode::Sha512 => ShaFamily::Sha512,
        }
    }

    #[must_use]
    pub const fn block_size(self) -> usize {
        self.family().block_size()
    }

    #[must_use]
    pub const fn digest_size(self) -> usize {
        match self {
            ShaMode::Sha1 => 20,
            ShaMode::Sha224 => 28,
            ShaMode::Sha256 => 32,
            ShaMode::Sha384 => 48,
            ShaMode::Sha512 => 64,
        }
    }

    /// Value programmed into the peripheral's mode register
    #[must_use]
    pub const fn hw_code(self) -> u32 {
        self as u32
    }
}

pub const SHA1_IV: [u32; 5] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

pub const SHA224_IV: [u32; 8] = [
    0xc105_9ed8, 0x367c_d507, 0x3070_dd17, 0xf70e_5939,
    0xffc0_0b31, 0x6858_1511, 0x64f9_8fa7, 0xbefa_4fa4,
];

pub const SHA256_IV: [u32; 8] = [
    0x6a09_e667, 0xbb67_ae85, 0x3c6e_f372, 0xa54f_f53a,
    0x510e_527f, 0x9b05_688c, 0x1f83_d9ab, 0x5be0_cd19,
];

pub const SHA384_IV: [u64; 8] = [
    0xcbbb_9d5d_c105_9ed8, 0x629a_292a_367c_d507, 0x9159_015a_3070_dd17, 0x152f_ecd8_f70e_5939,
    0x6733_2667_ffc0_0b31, 0x8eb4_4a87_6858_1511, 0xdb0c_2e0d_64f9_8fa7, 0x47b5_481d_befa_4fa4,
];

pub const SHA512_IV: [u64; 8] = [
    0x6a09_e667_f3bc_c908, 0xbb67_ae85_84ca_a73b, 0x3c6e_f372_fe94_f82b, 0xa54f_f53a_5f1d_36f1,
    0x510e_527f_ade6_82d1, 0x9b05_688c_2b3e_6c1f, 0x1f83_d9ab_fb41_bd6b, 0x5be0_cd19_137e_2179,
];
