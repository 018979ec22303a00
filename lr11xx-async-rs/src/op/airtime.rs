//! LoRa and GFSK time-on-air calculation.
//!
//! Integer form of the time-on-air formulas of the LR11xx user manual, so it can
//! run without a floating point unit.

use super::modulation::{GfskModParams, LoRaSpreadFactor, LoraModParams};
use super::packet::{
    GfskAddressFiltering, GfskHeaderType, GfskPacketParams, LoRaCrcType, LoRaHeaderType,
    LoRaPacketParams,
};

/// Returns the number of LoRa symbols of a packet, multiplied by 4.
///
/// The preamble carries a fractional 4.25 (or 6.25 for SF5 and SF6) symbols, hence
/// the quarter-symbol unit.
pub fn lora_symbols_x4(mod_params: &LoraModParams, pkt_params: &LoRaPacketParams) -> u32 {
    let sf = mod_params.spread_factor() as i64;
    let cr = mod_params.coding_rate().denominator() as i64;
    let pl = pkt_params.payload_len as i64;
    let crc = (pkt_params.crc_type == LoRaCrcType::CrcOn) as i64;
    let ih = (pkt_params.header_type == LoRaHeaderType::FixedLen) as i64;
    let de = mod_params.low_dr_opt() as i64;

    let short_sf = matches!(
        mod_params.spread_factor(),
        LoRaSpreadFactor::SF5 | LoRaSpreadFactor::SF6
    );

    let (numerator, denominator, preamble_extra_x4) = if short_sf {
        (8 * pl - 4 * sf + 8 + 16 * crc - 20 * ih, 4 * sf, 25)
    } else {
        (
            8 * pl - 4 * sf + 28 + 16 * crc - 20 * ih,
            4 * (sf - 2 * de),
            17,
        )
    };

    let blocks = if numerator <= 0 {
        0
    } else {
        (numerator + denominator - 1) / denominator
    };
    let payload_symbols = 8 + blocks * cr;

    (pkt_params.preamble_len as i64 * 4 + preamble_extra_x4 + payload_symbols * 4) as u32
}

/// Calculates the LoRa packet time on air in microseconds.
pub fn lora_time_on_air_us(mod_params: &LoraModParams, pkt_params: &LoRaPacketParams) -> u64 {
    let symbols_x4 = lora_symbols_x4(mod_params, pkt_params) as u64;
    let bw = mod_params.bandwidth().hz() as u64;
    symbols_x4 * (1u64 << mod_params.spread_factor() as u8) * 1_000_000 / (4 * bw)
}

/// Calculates the LoRa packet time on air in milliseconds, rounded up.
pub fn lora_time_on_air_ms(mod_params: &LoraModParams, pkt_params: &LoRaPacketParams) -> u32 {
    lora_time_on_air_us(mod_params, pkt_params).div_ceil(1000) as u32
}

/// Returns the number of bits of a GFSK packet on air.
pub fn gfsk_bits(pkt_params: &GfskPacketParams) -> u32 {
    let header_bits = match pkt_params.header_type {
        GfskHeaderType::VarLen => 8,
        GfskHeaderType::FixedLen => 0,
    };
    let address_bytes = match pkt_params.address_filtering {
        GfskAddressFiltering::Disabled => 0,
        _ => 1,
    };
    let body_bytes =
        u32::from(pkt_params.payload_len) + address_bytes + pkt_params.crc_type.len_in_bytes();

    u32::from(pkt_params.preamble_len_in_bits)
        + header_bits
        + u32::from(pkt_params.sync_word_len_in_bits)
        + (body_bytes << 3)
}

/// Calculates the GFSK packet time on air in milliseconds, rounded up.
///
/// Returns 0 for a zero bit rate.
pub fn gfsk_time_on_air_ms(mod_params: &GfskModParams, pkt_params: &GfskPacketParams) -> u32 {
    let bitrate = u64::from(mod_params.bitrate_bps);
    if bitrate == 0 {
        return 0;
    }
    (u64::from(gfsk_bits(pkt_params)) * 1000).div_ceil(bitrate) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{GfskCrcType, LoRaBandWidth, LoraCodingRate};

    fn sf7() -> LoraModParams {
        LoraModParams::default()
            .set_spread_factor(LoRaSpreadFactor::SF7)
            .set_bandwidth(LoRaBandWidth::BW125)
            .set_coding_rate(LoraCodingRate::CR4_5)
    }

    #[test]
    fn sf7_bw125_sixteen_bytes() {
        let pkt = LoRaPacketParams::default().set_payload_len(16);
        assert_eq!(lora_symbols_x4(&sf7(), &pkt), 201);
        assert_eq!(lora_time_on_air_us(&sf7(), &pkt), 51_456);
        assert_eq!(lora_time_on_air_ms(&sf7(), &pkt), 52);
    }

    #[test]
    fn longer_payload_takes_longer() {
        let short = LoRaPacketParams::default().set_payload_len(10);
        let long = LoRaPacketParams::default().set_payload_len(200);
        assert_eq!(lora_time_on_air_us(&sf7(), &short), 41_216);
        assert!(lora_time_on_air_ms(&sf7(), &long) > lora_time_on_air_ms(&sf7(), &short));
    }

    #[test]
    fn ldro_reduces_bits_per_symbol() {
        let pkt = LoRaPacketParams::default().set_payload_len(16);
        let sf12 = sf7().set_spread_factor(LoRaSpreadFactor::SF12);
        let with_ldro = sf12.set_low_dr_opt(true);
        assert!(lora_symbols_x4(&with_ldro, &pkt) > lora_symbols_x4(&sf12, &pkt));
    }

    #[test]
    fn gfsk_sixteen_bytes_at_50_kbps() {
        // 32 preamble + 8 length + 40 sync + (16 + 2 CRC) * 8 = 224 bits.
        let pkt = GfskPacketParams::default().set_payload_len(16);
        assert_eq!(gfsk_bits(&pkt), 224);
        assert_eq!(gfsk_time_on_air_ms(&GfskModParams::default(), &pkt), 5);

        let no_crc = pkt.set_crc_type(GfskCrcType::CrcOff);
        assert_eq!(gfsk_bits(&no_crc), 208);
    }

    #[test]
    fn gfsk_zero_bitrate_has_no_time_on_air() {
        let slow = GfskModParams::default().set_bitrate_bps(0);
        assert_eq!(gfsk_time_on_air_ms(&slow, &GfskPacketParams::default()), 0);
    }
}
