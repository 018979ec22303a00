//! Packet type and packet parameters (`SetPacketType`, `SetPacketParam`).

/// The modem selected with `SetPacketType`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PacketType {
    None = 0x00,
    GFSK = 0x01,
    LoRa = 0x02,
    /// Sigfox compatible BPSK, TX only.
    BPSK = 0x03,
    /// LR-FHSS, TX only.
    LrFhss = 0x04,
}

/// Raw `SetPacketParam` payload, as built from [`LoRaPacketParams`] (6 bytes)
/// or [`GfskPacketParams`] (9 bytes).
pub struct PacketParams {
    inner: [u8; 9],
    len: usize,
}

impl PacketParams {
    fn new(raw: &[u8]) -> Self {
        let mut inner = [0u8; 9];
        inner[..raw.len()].copy_from_slice(raw);
        Self {
            inner,
            len: raw.len(),
        }
    }

    /// The bytes sent after the opcode.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner[..self.len]
    }
}

/// Explicit (variable length) or implicit (fixed length) LoRa header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoRaHeaderType {
    VarLen = 0x00,
    FixedLen = 0x01,
}

/// Payload CRC of LoRa packets.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoRaCrcType {
    CrcOff = 0x00,
    CrcOn = 0x01,
}

/// IQ polarity. Uplinks and downlinks of a LoRaWAN network use opposite values.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoRaInvertIq {
    Standard = 0x00,
    Inverted = 0x01,
}

/// LoRa packet parameters.
///
/// Defaults to an 8 symbol preamble, explicit header, CRC on and standard IQ.
/// The payload length is the maximum one; with an explicit header it only
/// bounds what the receiver accepts.
#[derive(Copy, Clone, Debug)]
pub struct LoRaPacketParams {
    /// Preamble length in symbols.
    pub preamble_len: u16,
    pub header_type: LoRaHeaderType,
    /// Payload length in bytes.
    pub payload_len: u8,
    pub crc_type: LoRaCrcType,
    pub invert_iq: LoRaInvertIq,
}

impl Default for LoRaPacketParams {
    fn default() -> Self {
        Self {
            preamble_len: 8,
            header_type: LoRaHeaderType::VarLen,
            payload_len: u8::MAX,
            crc_type: LoRaCrcType::CrcOn,
            invert_iq: LoRaInvertIq::Standard,
        }
    }
}

impl LoRaPacketParams {
    pub fn set_preamble_len(mut self, preamble_len: u16) -> Self {
        self.preamble_len = preamble_len;
        self
    }

    pub fn set_header_type(mut self, header_type: LoRaHeaderType) -> Self {
        self.header_type = header_type;
        self
    }

    pub fn set_payload_len(mut self, payload_len: u8) -> Self {
        self.payload_len = payload_len;
        self
    }

    pub fn set_crc_type(mut self, crc_type: LoRaCrcType) -> Self {
        self.crc_type = crc_type;
        self
    }

    pub fn set_invert_iq(mut self, invert_iq: LoRaInvertIq) -> Self {
        self.invert_iq = invert_iq;
        self
    }
}

impl From<LoRaPacketParams> for PacketParams {
    fn from(params: LoRaPacketParams) -> Self {
        let [preamble_msb, preamble_lsb] = params.preamble_len.to_be_bytes();
        PacketParams::new(&[
            preamble_msb,
            preamble_lsb,
            params.header_type as u8,
            params.payload_len,
            params.crc_type as u8,
            params.invert_iq as u8,
        ])
    }
}

/// Minimum preamble length the GFSK receiver must see before it looks for the
/// sync word.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GfskPreambleDetector {
    Off = 0x00,
    Min8Bits = 0x04,
    Min16Bits = 0x05,
    Min24Bits = 0x06,
    Min32Bits = 0x07,
}

/// Address byte filtering of received GFSK packets.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GfskAddressFiltering {
    Disabled = 0x00,
    Node = 0x01,
    NodeAndBroadcast = 0x02,
}

/// Fixed length packets, or a length byte in front of the payload.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GfskHeaderType {
    FixedLen = 0x00,
    VarLen = 0x01,
}

/// GFSK payload CRC.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GfskCrcType {
    CrcOff = 0x01,
    Crc1Byte = 0x00,
    Crc2Bytes = 0x02,
    Crc1ByteInv = 0x04,
    Crc2BytesInv = 0x06,
}

impl GfskCrcType {
    /// Number of CRC bytes appended to the payload.
    pub const fn len_in_bytes(self) -> u32 {
        match self {
            Self::CrcOff => 0,
            Self::Crc1Byte | Self::Crc1ByteInv => 1,
            Self::Crc2Bytes | Self::Crc2BytesInv => 2,
        }
    }
}

/// DC free encoding of GFSK packets.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GfskDcFree {
    Off = 0x00,
    Whitening = 0x01,
}

/// GFSK packet parameters.
///
/// Defaults to a 32 bit preamble, a 40 bit sync word, a length byte, a 2 byte
/// inverted CRC and whitening.
#[derive(Copy, Clone, Debug)]
pub struct GfskPacketParams {
    /// Preamble length in bits.
    pub preamble_len_in_bits: u16,
    pub preamble_detector: GfskPreambleDetector,
    /// Sync word length in bits, at most 64.
    pub sync_word_len_in_bits: u8,
    pub address_filtering: GfskAddressFiltering,
    pub header_type: GfskHeaderType,
    /// Payload length in bytes.
    pub payload_len: u8,
    pub crc_type: GfskCrcType,
    pub dc_free: GfskDcFree,
}

impl Default for GfskPacketParams {
    fn default() -> Self {
        Self {
            preamble_len_in_bits: 32,
            preamble_detector: GfskPreambleDetector::Min8Bits,
            sync_word_len_in_bits: 40,
            address_filtering: GfskAddressFiltering::Disabled,
            header_type: GfskHeaderType::VarLen,
            payload_len: u8::MAX,
            crc_type: GfskCrcType::Crc2BytesInv,
            dc_free: GfskDcFree::Whitening,
        }
    }
}

impl GfskPacketParams {
    pub fn set_preamble_len_in_bits(mut self, preamble_len_in_bits: u16) -> Self {
        self.preamble_len_in_bits = preamble_len_in_bits;
        self
    }

    pub fn set_preamble_detector(mut self, preamble_detector: GfskPreambleDetector) -> Self {
        self.preamble_detector = preamble_detector;
        self
    }

    pub fn set_sync_word_len_in_bits(mut self, sync_word_len_in_bits: u8) -> Self {
        self.sync_word_len_in_bits = sync_word_len_in_bits;
        self
    }

    pub fn set_address_filtering(mut self, address_filtering: GfskAddressFiltering) -> Self {
        self.address_filtering = address_filtering;
        self
    }

    pub fn set_header_type(mut self, header_type: GfskHeaderType) -> Self {
        self.header_type = header_type;
        self
    }

    pub fn set_payload_len(mut self, payload_len: u8) -> Self {
        self.payload_len = payload_len;
        self
    }

    pub fn set_crc_type(mut self, crc_type: GfskCrcType) -> Self {
        self.crc_type = crc_type;
        self
    }

    pub fn set_dc_free(mut self, dc_free: GfskDcFree) -> Self {
        self.dc_free = dc_free;
        self
    }
}

impl From<GfskPacketParams> for PacketParams {
    fn from(params: GfskPacketParams) -> Self {
        let [preamble_msb, preamble_lsb] = params.preamble_len_in_bits.to_be_bytes();
        PacketParams::new(&[
            preamble_msb,
            preamble_lsb,
            params.preamble_detector as u8,
            params.sync_word_len_in_bits,
            params.address_filtering as u8,
            params.header_type as u8,
            params.payload_len,
            params.crc_type as u8,
            params.dc_free as u8,
        ])
    }
}
