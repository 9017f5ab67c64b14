//! Symbolic names accepted in topology sources and the values they map to.

use crate::error::{TypeError, TypeResult};

fn find(table: &[(&str, u32)], what: &'static str, name: &str) -> TypeResult<u32> {
    table
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| *v)
        .ok_or_else(|| TypeError::UnknownName {
            what,
            name: name.to_string(),
        })
}

const CHANNELS: &[(&str, u32)] = &[
    ("unknown", 0),
    ("na", 1),
    ("mono", 2),
    ("fl", 3),
    ("fr", 4),
    ("rl", 5),
    ("rr", 6),
    ("fc", 7),
    ("lfe", 8),
    ("sl", 9),
    ("sr", 10),
    ("rc", 11),
    ("flc", 12),
    ("frc", 13),
    ("rlc", 14),
    ("rrc", 15),
    ("flw", 16),
    ("frw", 17),
    ("flh", 18),
    ("fch", 19),
    ("frh", 20),
    ("tc", 21),
    ("tfl", 22),
    ("tfr", 23),
    ("tfc", 24),
    ("trl", 25),
    ("trr", 26),
    ("trc", 27),
];

/// Channel position id for a channel name such as `FL` or `mono`.
pub fn channel_id(name: &str) -> TypeResult<u32> {
    find(CHANNELS, "channel", name)
}

const CONTROL_OPS: &[(&str, u32)] = &[
    ("volsw", 1),
    ("volsw_sx", 2),
    ("volsw_xr_sx", 3),
    ("enum", 4),
    ("bytes", 5),
    ("enum_value", 6),
    ("range", 7),
    ("strobe", 8),
    ("volsw_dapm", 64),
    ("enum_dapm", 65),
    ("enum_virt", 66),
    ("enum_value_dapm", 67),
    ("pin", 68),
];

/// Handler id for a control operation. Numeric strings pass through.
pub fn control_op(name: &str) -> TypeResult<u32> {
    if let Some(value) = parse_number(name) {
        return Ok(value);
    }
    find(CONTROL_OPS, "control op", name)
}

const FORMATS: &[(&str, u32)] = &[
    ("S8", 0),
    ("U8", 1),
    ("S16_LE", 2),
    ("S16_BE", 3),
    ("U16_LE", 4),
    ("U16_BE", 5),
    ("S24_LE", 6),
    ("S24_BE", 7),
    ("U24_LE", 8),
    ("U24_BE", 9),
    ("S32_LE", 10),
    ("S32_BE", 11),
    ("U32_LE", 12),
    ("U32_BE", 13),
    ("FLOAT_LE", 14),
    ("FLOAT_BE", 15),
    ("FLOAT64_LE", 16),
    ("FLOAT64_BE", 17),
    ("IEC958_SUBFRAME_LE", 18),
    ("IEC958_SUBFRAME_BE", 19),
    ("MU_LAW", 20),
    ("A_LAW", 21),
    ("IMA_ADPCM", 22),
    ("S24_3LE", 32),
    ("S24_3BE", 33),
    ("U24_3LE", 34),
    ("U24_3BE", 35),
    ("S20_3LE", 36),
    ("S20_3BE", 37),
    ("S18_3LE", 40),
    ("S18_3BE", 41),
    ("DSD_U8", 48),
    ("DSD_U16_LE", 49),
    ("DSD_U32_LE", 50),
];

/// Sample format index for a format name such as `S16_LE`.
pub fn pcm_format(name: &str) -> TypeResult<u32> {
    find(FORMATS, "sample format", name)
}

const RATES: &[(u32, u32)] = &[
    (5512, 1 << 0),
    (8000, 1 << 1),
    (11025, 1 << 2),
    (16000, 1 << 3),
    (22050, 1 << 4),
    (32000, 1 << 5),
    (44100, 1 << 6),
    (48000, 1 << 7),
    (64000, 1 << 8),
    (88200, 1 << 9),
    (96000, 1 << 10),
    (176400, 1 << 11),
    (192000, 1 << 12),
];

/// Rate bit for a sample rate, or the continuous/knot bits for the named
/// pseudo-rates.
pub fn pcm_rate_bit(name: &str) -> TypeResult<u32> {
    match name.to_ascii_lowercase().as_str() {
        "continuous" => return Ok(1 << 30),
        "knot" => return Ok(1 << 31),
        _ => {}
    }
    name.parse::<u32>()
        .ok()
        .and_then(|hz| RATES.iter().find(|(r, _)| *r == hz).map(|(_, bit)| *bit))
        .ok_or_else(|| TypeError::UnknownName {
            what: "sample rate",
            name: name.to_string(),
        })
}

const HW_FORMATS: &[(&str, u32)] = &[
    ("I2S", 1),
    ("RIGHT_J", 2),
    ("LEFT_J", 3),
    ("DSP_A", 4),
    ("DSP_B", 5),
    ("AC97", 6),
    ("PDM", 7),
];

/// DAI hardware format id for names such as `I2S` or `DSP_A`.
pub fn hw_format(name: &str) -> TypeResult<u32> {
    find(HW_FORMATS, "hw format", name)
}

fn parse_number(text: &str) -> Option<u32> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
